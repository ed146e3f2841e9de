//! Adapters - infrastructure implementations of the ports.

pub mod cache;
pub mod http;
pub mod postgres;
pub mod stripe;
