//! The long-lived background context.
//!
//! Owns the signal relay and answers every request except `getPageInfo`.
//! The relay slot is mirrored to the backend under `autoFillData` and
//! `autoFillTimestamp` so a fresh signal survives a restart.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::protocol::{Request, Response};
use super::transport::MessageHandler;
use crate::error::{Result, TrackerError};
use crate::extractor::extract_domain;
use crate::relay::{CacheEntry, SignalRelay};
use crate::store::ApplicationStore;
use crate::traits::clock::{Clock, SystemClock};
use crate::traits::store::{
    KeyValueBackend, KeyValueExt, AUTO_FILL_DATA_KEY, AUTO_FILL_TIMESTAMP_KEY, CURRENT_DOMAIN_KEY,
};
use crate::types::signal::{PageSignal, TabInfo};

pub struct BackgroundContext<B: ?Sized, C = SystemClock> {
    backend: Arc<B>,
    relay: SignalRelay<C>,
    current_tab: RwLock<Option<TabInfo>>,
}

impl<B, C> BackgroundContext<B, C>
where
    B: KeyValueBackend + ?Sized,
    C: Clock,
{
    /// A context with nothing loaded from the backend yet.
    pub fn new(backend: Arc<B>, relay: SignalRelay<C>) -> Self {
        Self {
            backend,
            relay,
            current_tab: RwLock::new(None),
        }
    }

    /// Build the context and run the startup steps: create the empty
    /// application collection if absent, then restore the relay slot.
    pub async fn start(backend: Arc<B>, relay: SignalRelay<C>) -> Result<Self> {
        ApplicationStore::new(backend.clone()).initialize().await?;

        let context = Self::new(backend, relay);
        context.restore_relay().await?;
        Ok(context)
    }

    /// Re-seed the relay from the persisted slot. Returns whether an entry
    /// was found; a restored entry may already be stale.
    ///
    /// A half-written or undecodable slot is removed so it is not retried
    /// on every start.
    pub async fn restore_relay(&self) -> Result<bool> {
        let slot = self
            .backend
            .get_many(&[AUTO_FILL_DATA_KEY, AUTO_FILL_TIMESTAMP_KEY])
            .await?;
        if slot.is_empty() {
            return Ok(false);
        }

        match decode_slot(slot) {
            Some(entry) => {
                debug!(url = %entry.signal.url, "Restored relay entry");
                self.relay.restore(entry);
                Ok(true)
            }
            None => {
                warn!("Discarding incomplete persisted relay slot");
                self.backend.remove(AUTO_FILL_DATA_KEY).await?;
                self.backend.remove(AUTO_FILL_TIMESTAMP_KEY).await?;
                Ok(false)
            }
        }
    }

    /// Store a page's signal in the relay and persist the slot.
    pub async fn accept_signal(&self, signal: PageSignal) -> Result<()> {
        let entry = self.relay.push(signal);
        self.backend.save(AUTO_FILL_DATA_KEY, &entry.signal).await?;
        self.backend
            .save(AUTO_FILL_TIMESTAMP_KEY, &entry.captured_at.timestamp_millis())
            .await
    }

    /// Tab lifecycle hook. Only completed loads count; a URL with no
    /// parseable host leaves the stored domain untouched.
    pub async fn tab_updated(&self, tab: TabInfo, complete: bool) -> Result<()> {
        if !complete {
            return Ok(());
        }

        match extract_domain(&tab.url) {
            Some(domain) => {
                self.backend.save(CURRENT_DOMAIN_KEY, &domain).await?;
                info!(tab = tab.id, domain = %domain, "Current domain updated");
            }
            None => debug!(tab = tab.id, url = %tab.url, "Ignoring tab without a domain"),
        }

        *self
            .current_tab
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(tab);
        Ok(())
    }

    /// Last stored domain, empty if none.
    pub async fn current_domain(&self) -> Result<String> {
        Ok(self
            .backend
            .load::<String>(CURRENT_DOMAIN_KEY)
            .await?
            .unwrap_or_default())
    }

    pub fn current_tab(&self) -> Option<TabInfo> {
        self.current_tab
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn relay(&self) -> &SignalRelay<C> {
        &self.relay
    }
}

#[async_trait]
impl<B, C> MessageHandler for BackgroundContext<B, C>
where
    B: KeyValueBackend + ?Sized,
    C: Clock,
{
    async fn handle(&self, request: Request) -> Result<Response> {
        match request {
            Request::AutoFillJobData { data } => {
                self.accept_signal(data).await?;
                Ok(Response::Ack)
            }
            Request::GetAutoFillData => Ok(Response::AutoFillData {
                data: self.relay.query(),
            }),
            Request::GetCurrentTab => Ok(Response::CurrentTab {
                tab: self.current_tab(),
            }),
            Request::GetCurrentDomain => Ok(Response::CurrentDomain {
                domain: self.current_domain().await?,
            }),
            other @ Request::GetPageInfo => {
                Err(TrackerError::UnsupportedAction(other.action().to_string()))
            }
        }
    }
}

fn decode_slot(slot: Vec<(String, Value)>) -> Option<CacheEntry> {
    let mut signal = None;
    let mut millis = None;
    for (key, value) in slot {
        match key.as_str() {
            AUTO_FILL_DATA_KEY => signal = serde_json::from_value::<PageSignal>(value).ok(),
            AUTO_FILL_TIMESTAMP_KEY => millis = value.as_i64(),
            _ => {}
        }
    }
    let captured_at = Utc.timestamp_millis_opt(millis?).single()?;
    Some(CacheEntry {
        signal: signal?,
        captured_at,
    })
}
