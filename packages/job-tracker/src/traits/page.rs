//! Seams between the page watcher and its host.
//!
//! - `DocumentSource`: reads the live page on demand
//! - `SignalSink`: receives signals from positive extraction runs

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::signal::{PageSignal, PageSnapshot};

/// Read access to the page the extractor runs in.
pub trait DocumentSource: Send + Sync {
    /// Whether the page is already interactive.
    ///
    /// When false, the watcher waits for a `ContentReady` event before the
    /// first extraction.
    fn is_loaded(&self) -> bool;

    /// Current address and markup.
    fn snapshot(&self) -> Result<PageSnapshot>;
}

/// Destination for extracted signals.
#[async_trait]
pub trait SignalSink: Send + Sync {
    async fn push(&self, signal: PageSignal) -> Result<()>;
}

impl<D: DocumentSource + ?Sized> DocumentSource for Arc<D> {
    fn is_loaded(&self) -> bool {
        (**self).is_loaded()
    }

    fn snapshot(&self) -> Result<PageSnapshot> {
        (**self).snapshot()
    }
}

#[async_trait]
impl<S: SignalSink + ?Sized> SignalSink for Arc<S> {
    async fn push(&self, signal: PageSignal) -> Result<()> {
        (**self).push(signal).await
    }
}
