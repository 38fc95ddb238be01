//! Server runtime integration.
//!
//! Owns the tokio runtime that hosts the HTTP API and the AI tool server while
//! the terminal loop stays synchronous on the main thread.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{error, info};
use tokio::runtime::Runtime;
use tokio::sync::oneshot;

use crate::adapter::{run_server, AdapterStatus, ServerConfig};
use crate::bus::GameController;
use crate::http::{serve, HttpConfig};
use crate::term::{AiStatusView, StatusView};

/// Which servers to start, and where
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub http: HttpConfig,
    /// `None` disables the AI tool server.
    pub ai: Option<ServerConfig>,
}

/// Running servers.
///
/// Dropping this shuts the runtime down and with it both servers.
pub struct Services {
    rt: Runtime,
    http_addr: Option<SocketAddr>,
    ai_addr: Option<SocketAddr>,
    status: Arc<AdapterStatus>,
}

impl Services {
    /// Start the servers and wait until each is listening or has failed.
    ///
    /// A server that fails to bind is logged and reported as absent; the game
    /// keeps running without it.
    pub fn start(config: ServiceConfig, controller: &GameController) -> Result<Self> {
        let rt = Runtime::new().context("failed to create tokio runtime")?;
        let status = Arc::new(AdapterStatus::new());

        let (http_tx, http_rx) = oneshot::channel();
        let http_ctl = controller.clone();
        rt.spawn(async move {
            if let Err(e) = serve(config.http, http_ctl, Some(http_tx)).await {
                error!("HTTP API stopped: {:#}", e);
            }
        });
        let http_addr = rt.block_on(http_rx).ok();

        let ai_addr = match config.ai {
            Some(ai) => {
                let (ai_tx, ai_rx) = oneshot::channel();
                let ai_ctl = controller.clone();
                let ai_status = Arc::clone(&status);
                rt.spawn(async move {
                    if let Err(e) = run_server(ai, ai_ctl, ai_status, Some(ai_tx)).await {
                        error!("AI tool server stopped: {:#}", e);
                    }
                });
                rt.block_on(ai_rx).ok()
            }
            None => {
                info!("AI tool server disabled");
                None
            }
        };

        Ok(Self {
            rt,
            http_addr,
            ai_addr,
            status,
        })
    }

    pub fn http_addr(&self) -> Option<SocketAddr> {
        self.http_addr
    }

    pub fn ai_addr(&self) -> Option<SocketAddr> {
        self.ai_addr
    }

    pub fn adapter_status(&self) -> &AdapterStatus {
        &self.status
    }

    /// Side-panel view of the servers.
    pub fn status_view(&self, last_event: Option<String>) -> StatusView {
        StatusView {
            http_url: self.http_addr.map(|addr| format!("http://{}", addr)),
            ai: self.ai_addr.map(|addr| AiStatusView {
                addr: addr.to_string(),
                connected: self.status.connected(),
                streaming: self.status.streaming(),
            }),
            last_event,
        }
    }

    /// Block the calling thread until Ctrl-C.
    pub fn wait_for_shutdown(&self) -> Result<()> {
        self.rt
            .block_on(tokio::signal::ctrl_c())
            .context("failed to listen for Ctrl-C")?;
        info!("shutting down");
        Ok(())
    }
}
