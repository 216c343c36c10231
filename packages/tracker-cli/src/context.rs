//! Application context with shared state and utilities

use anyhow::{Context, Result};
use console::style;
use std::sync::Arc;
use tokio::task::JoinHandle;

use job_tracker::messaging::spawn_responder;
use job_tracker::{
    ApplicationStatus, ApplicationStore, BackgroundContext, Extractor, JsonFileBackend,
    MessageClient, SignalRelay,
};

use crate::config::Config;

/// Application context passed to all commands
pub struct AppContext {
    pub quiet: bool,
    pub config: Config,
    backend: Arc<JsonFileBackend>,
}

/// A running background responder.
pub struct Background {
    pub client: MessageClient,
    handle: JoinHandle<()>,
}

impl Background {
    /// Wait for queued notifications to be handled. Every other clone of
    /// the client must already be dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.client);
        self.handle.await.context("Background task failed")
    }
}

impl AppContext {
    pub fn new(quiet: bool) -> Result<Self> {
        let config = Config::from_env().context("Failed to load configuration")?;
        let backend = Arc::new(JsonFileBackend::new(config.storage_path()));
        Ok(Self {
            quiet,
            config,
            backend,
        })
    }

    pub fn store(&self) -> ApplicationStore<JsonFileBackend> {
        ApplicationStore::new(self.backend.clone())
    }

    pub fn extractor(&self) -> Result<Arc<Extractor>> {
        let config = self.config.extractor_config()?;
        let extractor = Extractor::new(&config).context("Invalid extractor configuration")?;
        Ok(Arc::new(extractor))
    }

    /// Background context on this process's storage, startup steps done.
    pub async fn background_context(&self) -> Result<BackgroundContext<JsonFileBackend>> {
        let relay = SignalRelay::new(self.config.relay_config());
        BackgroundContext::start(self.backend.clone(), relay)
            .await
            .context("Failed to start background context")
    }

    /// Serve the background context on its own task.
    pub async fn background(&self) -> Result<Background> {
        let (client, handle) = spawn_responder(self.background_context().await?);
        Ok(Background { client, handle })
    }

    pub fn print_header(&self, msg: &str) {
        if !self.quiet {
            println!();
            println!("{}", style(msg).bold());
        }
    }

    pub fn print_success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).green());
        }
    }

    pub fn print_warning(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).yellow());
        }
    }

    pub fn print_info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).cyan());
        }
    }

    /// Status label coloured by outcome.
    pub fn styled_status(&self, status: &ApplicationStatus) -> String {
        let label = status.display_label();
        match status.as_str() {
            ApplicationStatus::OFFERED | ApplicationStatus::ACCEPTED => {
                style(label).green().to_string()
            }
            ApplicationStatus::REJECTED | ApplicationStatus::WITHDRAWN => {
                style(label).red().to_string()
            }
            ApplicationStatus::INTERVIEWING => style(label).magenta().to_string(),
            _ => style(label).yellow().to_string(),
        }
    }
}
