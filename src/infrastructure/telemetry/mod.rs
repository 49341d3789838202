mod http;
mod poller;

pub use http::*;
pub use poller::*;
