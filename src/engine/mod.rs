//! Batch scrape engine.
//!
//! - `retry`: bounded, cancellable retry with linear backoff
//! - `scrape`: worker pool, admission ceiling, result aggregation

pub mod retry;
pub mod scrape;

pub use retry::fetch_with_retry;
pub use scrape::{EngineOutcome, ScrapeEngine};
