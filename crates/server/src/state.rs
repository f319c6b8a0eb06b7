use std::sync::Arc;

use crate::config::ServerConfig;
use crate::pipeline_factory::PipelineFactory;
use crate::session_registry::SessionRegistry;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Builds fresh pipeline components for every upload.
    pub factory: Arc<dyn PipelineFactory>,
    /// Pause/cancel handles of the streams currently running.
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(config: ServerConfig, factory: Arc<dyn PipelineFactory>) -> Self {
        Self {
            config: Arc::new(config),
            factory,
            sessions: Arc::new(SessionRegistry::new()),
        }
    }
}
