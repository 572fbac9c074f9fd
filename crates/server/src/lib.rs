//! simcheck server - HTTP API in front of the MOSS similarity service
//!
//! # API Endpoints
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `POST /check-plagiarism` - Multipart upload (`files`, optional `language`);
//!   runs MOSS and returns `{url, results}`
//! - `POST /fetch-comparison` - JSON `{url}`; returns the two file names on a
//!   pairwise comparison page
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
