//! Data types shared by the extractor, relay, store and protocol.

pub mod application;
pub mod config;
pub mod signal;
