//! Service layer for the event crawler.
//!
//! - Render service client (`RenderClient`, `Renderer`)
//! - Selector-driven event extraction (`extract_events`)

mod extract;
mod render;

pub use extract::extract_events;
pub use render::{RenderClient, Renderer};
