pub mod app_state;
pub mod config;
pub mod errors;
pub mod request_cancel;
pub mod startup;
pub mod telemetry;
