//! Single-slot, time-bounded signal relay.
//!
//! The relay holds at most one [`PageSignal`]. Every push replaces the slot,
//! consumed or not. A query returns the signal only while
//! `now - captured_at < ttl`; at exactly `ttl` the entry is stale. Queries
//! never clear or extend the entry, and stale entries are not purged, only
//! ignored.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::traits::clock::{Clock, SystemClock};
use crate::traits::page::SignalSink;
use crate::types::config::RelayConfig;
use crate::types::signal::PageSignal;

/// The relay slot: a signal and when the relay received it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub signal: PageSignal,
    pub captured_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Whether the entry is still inside the freshness window at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now.signed_duration_since(self.captured_at) < ttl
    }
}

/// Owned single-slot cache with an injected time source.
pub struct SignalRelay<C = SystemClock> {
    slot: RwLock<Option<CacheEntry>>,
    ttl: chrono::Duration,
    clock: C,
}

impl SignalRelay<SystemClock> {
    /// Relay on the system clock.
    pub fn new(config: RelayConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> SignalRelay<C> {
    pub fn with_clock(config: RelayConfig, clock: C) -> Self {
        let ttl = chrono::Duration::from_std(config.ttl()).unwrap_or(chrono::Duration::MAX);
        Self {
            slot: RwLock::new(None),
            ttl,
            clock,
        }
    }

    /// Replace the slot with `signal`, stamped with the relay's `now`.
    ///
    /// Returns the stored entry.
    pub fn push(&self, signal: PageSignal) -> CacheEntry {
        let entry = CacheEntry {
            captured_at: self.clock.now(),
            signal,
        };

        let previous = self
            .slot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(entry.clone());

        info!(
            url = %entry.signal.url,
            company = %entry.signal.company_name,
            replaced = previous.is_some(),
            "Signal pushed to relay"
        );
        entry
    }

    /// The current signal if it is still fresh.
    pub fn query(&self) -> Option<PageSignal> {
        let now = self.clock.now();
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);

        match slot.as_ref() {
            Some(entry) if entry.is_fresh(now, self.ttl) => Some(entry.signal.clone()),
            Some(entry) => {
                debug!(
                    url = %entry.signal.url,
                    age_secs = now.signed_duration_since(entry.captured_at).num_seconds(),
                    "Relay entry is stale"
                );
                None
            }
            None => None,
        }
    }

    /// The raw slot, fresh or not.
    pub fn entry(&self) -> Option<CacheEntry> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-seed the slot with a previously persisted entry, keeping its
    /// original capture time.
    pub fn restore(&self, entry: CacheEntry) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(entry);
    }

    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }
}

#[async_trait]
impl<C: Clock> SignalSink for SignalRelay<C> {
    async fn push(&self, signal: PageSignal) -> Result<()> {
        SignalRelay::push(self, signal);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockClock;
    use chrono::Duration;
    use std::sync::Arc;

    fn relay() -> (SignalRelay<Arc<MockClock>>, Arc<MockClock>) {
        let clock = Arc::new(MockClock::at_millis(1_700_000_000_000));
        (SignalRelay::with_clock(RelayConfig::default(), clock.clone()), clock)
    }

    fn signal(company: &str) -> PageSignal {
        PageSignal::new(format!("https://{company}.com/jobs")).with_company(company)
    }

    #[test]
    fn test_empty_relay() {
        let (relay, _) = relay();
        assert!(relay.query().is_none());
        assert!(relay.entry().is_none());
    }

    #[test]
    fn test_fresh_just_inside_window() {
        let (relay, clock) = relay();
        relay.push(signal("acme"));

        clock.advance(Duration::minutes(4) + Duration::seconds(59));
        assert_eq!(relay.query().unwrap().company_name, "acme");
    }

    #[test]
    fn test_stale_at_exactly_ttl() {
        let (relay, clock) = relay();
        relay.push(signal("acme"));

        clock.advance(Duration::minutes(5));
        assert!(relay.query().is_none());
    }

    #[test]
    fn test_stale_after_window() {
        let (relay, clock) = relay();
        relay.push(signal("acme"));

        clock.advance(Duration::minutes(5) + Duration::seconds(1));
        assert!(relay.query().is_none());
        // Stale entries are ignored, not purged
        assert!(relay.entry().is_some());
    }

    #[test]
    fn test_repeated_queries_do_not_consume() {
        let (relay, clock) = relay();
        relay.push(signal("acme"));

        for _ in 0..3 {
            clock.advance(Duration::minutes(1));
            assert!(relay.query().is_some());
        }
        // Queries did not extend the window
        clock.advance(Duration::minutes(2));
        assert!(relay.query().is_none());
    }

    #[test]
    fn test_last_push_wins() {
        let (relay, clock) = relay();
        relay.push(signal("acme"));
        clock.advance(Duration::seconds(10));
        relay.push(signal("globex"));

        assert_eq!(relay.query().unwrap().company_name, "globex");
        assert_eq!(relay.entry().unwrap().signal.company_name, "globex");
    }

    #[test]
    fn test_push_restarts_window() {
        let (relay, clock) = relay();
        relay.push(signal("acme"));
        clock.advance(Duration::minutes(4));
        relay.push(signal("globex"));
        clock.advance(Duration::minutes(4));

        assert_eq!(relay.query().unwrap().company_name, "globex");
    }

    #[test]
    fn test_restore_keeps_capture_time() {
        let (relay, clock) = relay();
        let entry = CacheEntry {
            signal: signal("initech"),
            captured_at: clock.now() - Duration::minutes(3),
        };
        relay.restore(entry);

        assert!(relay.query().is_some());
        clock.advance(Duration::minutes(2));
        assert!(relay.query().is_none());
    }

    #[test]
    fn test_custom_ttl() {
        let clock = Arc::new(MockClock::at_millis(0));
        let relay = SignalRelay::with_clock(
            RelayConfig::new().with_ttl(std::time::Duration::from_secs(30)),
            clock.clone(),
        );
        relay.push(signal("acme"));
        clock.advance(Duration::seconds(31));

        assert!(relay.query().is_none());
    }
}
