// src/models/site.rs

//! Scrape target definitions.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Configuration for a single scrape target: one page of event cards.
///
/// All field selectors are scoped to the element matched by
/// `ancestor_selector`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Page to render and scrape
    pub url_to_visit: String,

    /// Category tag copied verbatim onto every extracted event
    pub event_type: String,

    /// Selector for each repeating event card
    pub ancestor_selector: String,

    /// Selector for the title element within a card
    pub title_selector: String,

    /// Selector for the date element within a card
    pub date_selector: String,

    /// Selector for the venue/location element within a card
    pub location_selector: String,

    /// Selector for the link element within a card
    pub link_selector: String,
}

/// Shape of a sites file: a list of `[[sites]]` tables.
#[derive(Debug, Deserialize)]
struct SitesFile {
    #[serde(default)]
    sites: Vec<SiteConfig>,
}

impl SiteConfig {
    /// Load all site configurations from a TOML file.
    pub fn load_all(path: impl AsRef<Path>) -> Result<Vec<Self>> {
        let content = fs::read_to_string(path)?;
        let file: SitesFile = toml::from_str(&content)?;
        for site in &file.sites {
            site.validate()?;
        }
        Ok(file.sites)
    }

    /// Validate the target for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if url::Url::parse(&self.url_to_visit).is_err() {
            return Err(AppError::validation(format!(
                "url_to_visit is not an absolute URL: {}",
                self.url_to_visit
            )));
        }
        if self.ancestor_selector.trim().is_empty() {
            return Err(AppError::validation(format!(
                "ancestor_selector is empty for {}",
                self.url_to_visit
            )));
        }
        Ok(())
    }
}
