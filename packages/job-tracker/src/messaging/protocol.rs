//! Wire protocol between the page, background and UI contexts.
//!
//! Requests are tagged by `action`:
//!
//! ```json
//! {"action": "autoFillJobData", "data": {"companyName": "Acme", ...}}
//! {"action": "getCurrentDomain"}
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{Result, TrackerError};
use crate::types::signal::{PageInfo, PageSignal, TabInfo};

/// Traces one request through the responder logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A message addressed to another context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// Page responder: describe the current page
    GetPageInfo,
    /// Background: a page produced a signal. No reply.
    AutoFillJobData { data: PageSignal },
    /// Background: the relay's signal, if fresh
    GetAutoFillData,
    /// Background: the last completed tab
    GetCurrentTab,
    /// Background: the domain of the last completed tab
    GetCurrentDomain,
}

impl Request {
    /// The `action` tag as it appears on the wire.
    pub fn action(&self) -> &'static str {
        match self {
            Request::GetPageInfo => "getPageInfo",
            Request::AutoFillJobData { .. } => "autoFillJobData",
            Request::GetAutoFillData => "getAutoFillData",
            Request::GetCurrentTab => "getCurrentTab",
            Request::GetCurrentDomain => "getCurrentDomain",
        }
    }

    /// Whether the sender waits for a reply.
    pub fn expects_reply(&self) -> bool {
        !matches!(self, Request::AutoFillJobData { .. })
    }
}

/// A responder's answer. Each variant serialises to its bare payload.
///
/// Decoding tries the variants in order, so every payload key is required:
/// `{"tab": ...}` must not decode as an empty `AutoFillData`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    PageInfo(PageInfo),
    AutoFillData {
        #[serde(deserialize_with = "present")]
        data: Option<PageSignal>,
    },
    CurrentTab {
        #[serde(deserialize_with = "present")]
        tab: Option<TabInfo>,
    },
    CurrentDomain { domain: String },
    /// Reply to a notification; serialises as `null`
    Ack,
}

impl Response {
    pub fn into_page_info(self) -> Result<PageInfo> {
        match self {
            Response::PageInfo(info) => Ok(info),
            other => Err(unexpected("getPageInfo", &other)),
        }
    }

    pub fn into_auto_fill_data(self) -> Result<Option<PageSignal>> {
        match self {
            Response::AutoFillData { data } => Ok(data),
            other => Err(unexpected("getAutoFillData", &other)),
        }
    }

    pub fn into_current_tab(self) -> Result<Option<TabInfo>> {
        match self {
            Response::CurrentTab { tab } => Ok(tab),
            other => Err(unexpected("getCurrentTab", &other)),
        }
    }

    pub fn into_current_domain(self) -> Result<String> {
        match self {
            Response::CurrentDomain { domain } => Ok(domain),
            other => Err(unexpected("getCurrentDomain", &other)),
        }
    }
}

/// An `Option` field that may be `null` but not absent.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

fn unexpected(action: &str, response: &Response) -> TrackerError {
    TrackerError::Transport(format!("unexpected reply to `{action}`: {response:?}"))
}
