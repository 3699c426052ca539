//! HTTP and RPC front-ends for the user service.
//!
//! The binary in `main.rs` wires these together; integration tests build the
//! routers directly over an in-memory collection.

pub mod handlers;
pub mod infra;
pub mod routes;
pub mod rpc;

pub use infra::app_state::AppState;
pub use routes::{create_http_router, create_rpc_router};
