//! simcheck proxy - relays every HTTP request to a per-request backend process
//!
//! Any method on any path spawns the configured backend with the backend port
//! in its environment, waits for it to exit, and answers with what it printed:
//! parsed JSON when stdout is JSON, plain text otherwise. A failed spawn or a
//! non-zero exit becomes a 500 with the reason (and the backend's stderr).

pub mod backend;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod server;
pub mod state;

pub use config::ProxyConfig;
pub use error::{ProxyError, ProxyResult};
pub use server::{build_router, start_proxy};
pub use state::ProxyState;
