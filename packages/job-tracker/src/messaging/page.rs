//! The page context's responder.

use std::sync::Arc;

use async_trait::async_trait;

use super::protocol::{Request, Response};
use super::transport::MessageHandler;
use crate::error::{Result, TrackerError};
use crate::extractor::Extractor;
use crate::traits::page::DocumentSource;

/// Answers `getPageInfo` from a fresh snapshot of the page.
pub struct PageContext<D> {
    extractor: Arc<Extractor>,
    source: D,
}

impl<D: DocumentSource> PageContext<D> {
    pub fn new(extractor: Arc<Extractor>, source: D) -> Self {
        Self { extractor, source }
    }
}

#[async_trait]
impl<D: DocumentSource> MessageHandler for PageContext<D> {
    async fn handle(&self, request: Request) -> Result<Response> {
        match request {
            Request::GetPageInfo => {
                let snapshot = self.source.snapshot()?;
                Ok(Response::PageInfo(self.extractor.page_info(&snapshot)))
            }
            other => Err(TrackerError::UnsupportedAction(other.action().to_string())),
        }
    }
}
