//! Adaptive Delivery - network-aware loading for the analytics dashboard
//!
//! Reads connection quality and device capability, maps them to a
//! [`LoadingStrategy`](policy::LoadingStrategy), and applies that strategy
//! to paged fetching, retries, lazy loading, image fallback and a shared
//! response cache.

pub mod adapters;
pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod image;
pub mod policy;
pub mod prelude;
pub mod progressive;
pub mod recent_searches;
pub mod retry;
pub mod sensor;
pub mod sse;
pub mod traits;
pub mod visibility;
