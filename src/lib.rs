// Allow non-snake_case names for JSON serialization compatibility with the MCP and UI clients
#![allow(non_snake_case)]

pub mod analytics;
pub mod calendar;
pub mod commands;
pub mod error;
pub mod mcp;
pub mod models;
pub mod persistence;
pub mod query;
pub mod storage;
pub mod store;

use std::sync::Arc;
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;

pub use error::StorageError;
pub use models::{Priority, Project, Task, TaskDraft, TaskStats};
pub use persistence::{JsonFileBackend, MemoryBackend, Persistence};
pub use storage::{Storage, StorageState};
pub use store::{TaskStore, Toggle};

// MCP Server state
pub struct MCPServerManager {
    is_running: Arc<RwLock<bool>>,
    cancel_token: Arc<RwLock<Option<CancellationToken>>>,
}

impl Default for MCPServerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MCPServerManager {
    pub fn new() -> Self {
        Self {
            is_running: Arc::new(RwLock::new(false)),
            cancel_token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn is_running(&self) -> bool {
        *self.is_running.read()
    }

    /// Bind `bindAddress` and serve MCP in the background until `stop` is called
    pub async fn start(&self, storage: StorageState, bindAddress: &str) -> Result<(), String> {
        use rmcp::transport::streamable_http_server::{
            StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
        };

        if *self.is_running.read() {
            return Err("MCP server is already running".to_string());
        }

        tracing::info!("[MCP] Starting server on {}...", bindAddress);

        let tcp_listener = tokio::net::TcpListener::bind(bindAddress)
            .await
            .map_err(|e| format!("Failed to bind {}: {}", bindAddress, e))?;

        let ct = CancellationToken::new();
        *self.cancel_token.write() = Some(ct.clone());

        // Create the MCP service
        let service = StreamableHttpService::new(
            move || Ok(mcp::TaskdeckServer::new(storage.clone())),
            LocalSessionManager::default().into(),
            StreamableHttpServerConfig {
                cancellation_token: ct.child_token(),
                ..Default::default()
            },
        );

        let router = axum::Router::new().fallback_service(service);

        let is_running = self.is_running.clone();
        *is_running.write() = true;
        tracing::info!("[MCP] Server started successfully on {}", bindAddress);

        // Serve in background
        tokio::spawn(async move {
            if let Err(e) = axum::serve(tcp_listener, router)
                .with_graceful_shutdown(async move {
                    ct.cancelled().await;
                })
                .await
            {
                tracing::error!("[MCP] Server error: {}", e);
            }

            *is_running.write() = false;
            tracing::info!("[MCP] Server stopped");
        });

        Ok(())
    }

    pub fn stop(&self) {
        tracing::info!("[MCP] Stopping server...");
        if let Some(ct) = self.cancel_token.read().as_ref() {
            ct.cancel();
        }
        *self.cancel_token.write() = None;
    }
}

/// Install the fmt subscriber at the configured level
pub fn initLogging(level: &str) {
    let level = level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    let _ = tracing_subscriber::fmt().with_max_level(level).with_target(false).try_init();
}

/// Open storage, log a summary and serve
pub async fn run() -> Result<(), String> {
    let configPath = storage::globalConfigPath().map_err(|e| e.to_string())?;
    let settings = storage::loadGlobalConfig(&configPath);
    initLogging(&settings.logLevel);

    let storage = storage::initStorage()?;
    {
        let stats = storage.store.read().getTaskStats();
        tracing::info!(
            "Tasks: {} total, {} completed, {} pending, {} overdue",
            stats.total, stats.completed, stats.pending, stats.overdue
        );
    }

    serve(storage).await
}

/// Serve MCP until Ctrl-C; returns at once when auto-start is off
pub async fn serve(storage: StorageState) -> Result<(), String> {
    let settings = storage.effectiveSettings();
    if !settings.mcpAutoStart {
        tracing::info!("[serve] MCP server disabled by config (mcpAutoStart: false), nothing to serve; exiting");
        return Ok(());
    }

    let manager = MCPServerManager::new();
    manager.start(storage, &settings.mcpBindAddress).await?;

    tokio::signal::ctrl_c().await.map_err(|e| e.to_string())?;
    manager.stop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Settings;

    #[tokio::test]
    async fn manager_refuses_double_start_and_stops() {
        let storage = Arc::new(Storage::withBackend(Settings::default(), Box::new(MemoryBackend::new())));
        let manager = MCPServerManager::new();
        assert!(!manager.is_running());

        manager.start(storage.clone(), "127.0.0.1:0").await.unwrap();
        assert!(manager.is_running());
        assert!(manager.start(storage, "127.0.0.1:0").await.is_err());

        manager.stop();
        for _ in 0..50 {
            if !manager.is_running() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        assert!(!manager.is_running());
    }

    #[tokio::test]
    async fn serve_returns_when_auto_start_is_off() {
        let settings = Settings { mcpAutoStart: false, ..Default::default() };
        let storage = Arc::new(Storage::withBackend(settings, Box::new(MemoryBackend::new())));
        let finished = tokio::time::timeout(std::time::Duration::from_secs(1), serve(storage)).await;
        assert!(matches!(finished, Ok(Ok(()))));
    }
}
