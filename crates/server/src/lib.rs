//! HTTP server infrastructure for Tickerwire
//!
//! The [`Server`] trait gives a uniform run/shutdown lifecycle; [`HttpServer`]
//! implements it over an axum [`Router`](axum::Router). Shutdown is
//! coordinated through `CancellationToken`, so cancelling the controller's
//! token drains in-flight requests and stops the listener.
//!
//! ```ignore
//! use server::{HttpServer, Server, ServerConfig, ShutdownController};
//!
//! let shutdown = ShutdownController::with_signals();
//! let server = HttpServer::new(ServerConfig::new("0.0.0.0", 8080), router);
//! server.run(shutdown.token()).await?;
//! ```

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod shutdown;
pub mod traits;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use health::{health_routes, HealthState, HealthStatus};
pub use http::HttpServer;
pub use shutdown::ShutdownController;
pub use traits::{Server, ServerExt};
