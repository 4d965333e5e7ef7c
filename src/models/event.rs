//! Extracted event data structure.

use serde::{Deserialize, Serialize};

/// One event extracted from a rendered page.
///
/// `title` and `date` are free text; source pages are too inconsistent
/// to parse dates into a calendar type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    /// Event title
    pub title: String,

    /// Event date, as displayed on the page
    pub date: String,

    /// Venue or location text
    pub location: String,

    /// Absolute URL of the event page
    pub link: String,

    /// Category tag from the owning site configuration
    #[serde(rename = "eventType")]
    pub event_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_event_type_in_camel_case() {
        let event = Event {
            title: "Quartet night".to_string(),
            date: "12 March".to_string(),
            location: "Philharmonic hall".to_string(),
            link: "https://example.com/events/1".to_string(),
            event_type: "concert".to_string(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""eventType":"concert""#));
    }
}
