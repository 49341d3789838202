mod answer;
mod author;
mod error;
mod event;
mod gateway;
mod identity;
mod message;
mod session;
mod telemetry;

pub use answer::*;
pub use author::*;
pub use error::*;
pub use event::*;
pub use gateway::*;
pub use identity::*;
pub use message::*;
pub use session::*;
pub use telemetry::*;
