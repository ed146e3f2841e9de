//! Subsync - subscription billing service.
//!
//! Synchronizes local subscription state with Stripe via signed webhooks and
//! keeps an in-process pricing cache invalidated by the same event stream.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
