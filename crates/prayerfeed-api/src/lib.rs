//! API client library for prayerfeed.
//!
//! Provides a client for the London Unified Prayer Times API.

/// London Unified Prayer Times API client.
pub mod london;
