//! Request/response messaging between the page, background and UI contexts.
//!
//! - [`protocol`]: the `action`-tagged request set and its replies
//! - [`transport`]: channel delivery with correlation ids and timeouts
//! - [`background`]: relay owner and tab tracker
//! - [`page`]: answers `getPageInfo`

pub mod background;
pub mod page;
pub mod protocol;
pub mod transport;

pub use background::BackgroundContext;
pub use page::PageContext;
pub use protocol::{CorrelationId, Request, Response};
pub use transport::{
    channel, serve, spawn_responder, Envelope, MessageClient, MessageHandler,
    DEFAULT_REQUEST_TIMEOUT,
};
