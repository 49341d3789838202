pub mod inference;
pub mod telemetry;
