//! Target endpoint access: client construction and the add-widget call.
mod client;
mod execution;
mod target;


pub use client::{DEFAULT_REQUEST_TIMEOUT, build_target_client};
pub use execution::send_add_widget;
pub use target::{ADD_WIDGET_PATH, DEFAULT_TARGET_URL, EndpointTarget, join_endpoint};
