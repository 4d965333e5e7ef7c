// src/models/mod.rs

//! Domain models for the event crawler.

mod config;
mod event;
mod site;

// Re-export all public types
pub use config::{Config, EngineConfig, RendererConfig};
pub use event::Event;
pub use site::SiteConfig;
