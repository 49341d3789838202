mod orchestrator;
mod rate;
mod sessions;
mod store;

pub use orchestrator::*;
pub use rate::*;
pub use sessions::*;
pub use store::*;
