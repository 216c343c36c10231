//! In-process message delivery between contexts.
//!
//! Each responder owns the receiving end of an mpsc channel and handles
//! requests one at a time, in arrival order. Senders get a [`MessageClient`].
//! A request that expects a reply carries a oneshot sender; the client waits
//! for it with a timeout and never retries.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::protocol::{CorrelationId, Request, Response};
use crate::error::{Result, TrackerError};
use crate::traits::page::SignalSink;
use crate::types::signal::{PageInfo, PageSignal, TabInfo};

/// How long a client waits for a reply by default.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

const CHANNEL_CAPACITY: usize = 64;

/// A request in flight.
#[derive(Debug)]
pub struct Envelope {
    pub cid: CorrelationId,
    pub request: Request,
    /// Absent for notifications
    pub reply: Option<oneshot::Sender<Result<Response>>>,
}

/// A context that answers requests.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, request: Request) -> Result<Response>;
}

#[async_trait]
impl<H: MessageHandler + ?Sized> MessageHandler for Arc<H> {
    async fn handle(&self, request: Request) -> Result<Response> {
        (**self).handle(request).await
    }
}

/// Sending half of a responder channel.
#[derive(Debug, Clone)]
pub struct MessageClient {
    tx: mpsc::Sender<Envelope>,
    timeout: Duration,
}

/// Create a client and the receiver a responder will serve.
pub fn channel() -> (MessageClient, mpsc::Receiver<Envelope>) {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    (
        MessageClient {
            tx,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        },
        rx,
    )
}

/// Serve `handler` on a new task.
pub fn spawn_responder<H>(handler: H) -> (MessageClient, JoinHandle<()>)
where
    H: MessageHandler + 'static,
{
    let (client, rx) = channel();
    let handle = tokio::spawn(serve(handler, rx));
    (client, handle)
}

/// Handle envelopes until every client is dropped.
pub async fn serve<H: MessageHandler>(handler: H, mut rx: mpsc::Receiver<Envelope>) {
    while let Some(envelope) = rx.recv().await {
        let Envelope { cid, request, reply } = envelope;
        let action = request.action();
        debug!(cid = %cid, action, "Handling request");

        let result = handler.handle(request).await;

        match reply {
            Some(reply) => {
                if reply.send(result).is_err() {
                    debug!(cid = %cid, action, "Requester went away before the reply");
                }
            }
            None => {
                if let Err(e) = result {
                    warn!(cid = %cid, action, error = %e, "Notification failed");
                }
            }
        }
    }
    debug!("Responder channel closed");
}

impl MessageClient {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send a request and wait for its reply.
    pub async fn send(&self, request: Request) -> Result<Response> {
        let cid = CorrelationId::new();
        let action = request.action();
        let (reply_tx, reply_rx) = oneshot::channel();

        self.tx
            .send(Envelope {
                cid,
                request,
                reply: Some(reply_tx),
            })
            .await
            .map_err(|_| TrackerError::Transport(format!("no responder for `{action}`")))?;

        match timeout(self.timeout, reply_rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(TrackerError::Transport(format!(
                "responder dropped the reply to `{action}`"
            ))),
            Err(_) => {
                warn!(cid = %cid, action, timeout = ?self.timeout, "Request timed out");
                Err(TrackerError::Timeout {
                    action: action.to_string(),
                    timeout: self.timeout,
                })
            }
        }
    }

    /// Send a request without waiting for any reply.
    pub async fn notify(&self, request: Request) -> Result<()> {
        let action = request.action();
        self.tx
            .send(Envelope {
                cid: CorrelationId::new(),
                request,
                reply: None,
            })
            .await
            .map_err(|_| TrackerError::Transport(format!("no responder for `{action}`")))
    }

    pub async fn get_page_info(&self) -> Result<PageInfo> {
        self.send(Request::GetPageInfo).await?.into_page_info()
    }

    pub async fn get_auto_fill_data(&self) -> Result<Option<PageSignal>> {
        self.send(Request::GetAutoFillData).await?.into_auto_fill_data()
    }

    pub async fn get_current_tab(&self) -> Result<Option<TabInfo>> {
        self.send(Request::GetCurrentTab).await?.into_current_tab()
    }

    pub async fn get_current_domain(&self) -> Result<String> {
        self.send(Request::GetCurrentDomain).await?.into_current_domain()
    }
}

/// Pages push their signals to the background as `autoFillJobData`.
#[async_trait]
impl SignalSink for MessageClient {
    async fn push(&self, signal: PageSignal) -> Result<()> {
        self.notify(Request::AutoFillJobData { data: signal }).await
    }
}
