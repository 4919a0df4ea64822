//! RPC adapter over the catalog: parses requests, calls the catalog and
//! maps results and errors onto JSON replies.

pub mod errors;
pub mod messages;
pub mod routes;
pub mod startup;
pub mod state;

pub use startup::{run, serve};
pub use state::ServerState;
