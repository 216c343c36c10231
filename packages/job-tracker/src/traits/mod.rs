//! Core trait abstractions for the job tracker.
//!
//! These traits define the interfaces the host provides: durable storage,
//! a time source, and access to the live page.

pub mod clock;
pub mod page;
pub mod store;
