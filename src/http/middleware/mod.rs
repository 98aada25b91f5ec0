//! Request middleware.

pub mod observe;

pub use observe::{observe_request, RequestObserver};
