//! Pose streaming HTTP service.
//!
//! Exposes the building blocks (config, state, error handling, router,
//! session registry, streaming worker) so integration tests and the binary
//! entrypoint share the same wiring.

pub mod config;
pub mod error;
pub mod handlers;
pub mod pipeline_factory;
pub mod router;
pub mod session_registry;
pub mod state;
pub mod streaming;
pub mod upload;
