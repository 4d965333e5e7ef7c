// src/services/extract.rs

//! Selector-driven event extraction.
//!
//! Walks every element matched by the site's ancestor selector and
//! pulls title, date, location, and link out of it. A card that cannot
//! be extracted is logged and skipped; it never aborts the remaining
//! cards.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{Event, SiteConfig};
use crate::utils::resolve_href;

/// Extract all events from rendered HTML according to a site
/// configuration.
///
/// Fails only when the payload is not a document at all or when one of
/// the configured selectors does not parse; both are job-level errors.
/// Cards are processed sequentially, in document order.
pub fn extract_events(html: &str, site: &SiteConfig) -> Result<Vec<Event>> {
    // scraper will happily build a document out of any byte soup, so
    // reject payloads that plainly are not markup.
    if !html.contains('<') {
        return Err(AppError::document_parse(
            &site.url_to_visit,
            "rendered payload contains no markup",
        ));
    }

    let document = Html::parse_document(html);

    let ancestor_sel = parse_selector(&site.ancestor_selector)?;
    let title_sel = parse_selector(&site.title_selector)?;
    let date_sel = parse_selector(&site.date_selector)?;
    let location_sel = parse_selector(&site.location_selector)?;
    let link_sel = parse_selector(&site.link_selector)?;

    let base_url = url::Url::parse(&site.url_to_visit)?;

    let mut events = Vec::new();
    for card in document.select(&ancestor_sel) {
        match extract_event_from_card(
            &card,
            &title_sel,
            &date_sel,
            &location_sel,
            &link_sel,
            &base_url,
            site,
        ) {
            Ok(event) => events.push(event),
            Err(error) => {
                log::warn!(
                    "Skipping one card on {}: {}",
                    site.url_to_visit,
                    error
                );
            }
        }
    }

    Ok(events)
}

/// Extract a single event from one card element.
fn extract_event_from_card(
    card: &ElementRef,
    title_sel: &Selector,
    date_sel: &Selector,
    location_sel: &Selector,
    link_sel: &Selector,
    base_url: &url::Url,
    site: &SiteConfig,
) -> Result<Event> {
    // The link element may be a child of the card or the card itself.
    let href = card
        .select(link_sel)
        .next()
        .and_then(|el| el.value().attr("href"))
        .or_else(|| card.value().attr("href"));

    let link = match href {
        Some(href) => resolve_href(base_url, href)
            .ok_or_else(|| AppError::field("link", format!("unresolvable href '{href}'")))?,
        None => site.url_to_visit.clone(),
    };

    Ok(Event {
        title: select_text(card, title_sel),
        date: select_text(card, date_sel),
        location: select_text(card, location_sel),
        link,
        event_type: site.event_type.clone(),
    })
}

/// Trimmed inner text of the first match within a card, or an empty
/// string when nothing matches.
fn select_text(card: &ElementRef, selector: &Selector) -> String {
    card.select(selector)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteConfig {
        SiteConfig {
            url_to_visit: "https://example.com/bar/".to_string(),
            event_type: "concert".to_string(),
            ancestor_selector: "div.events-elem".to_string(),
            title_selector: "a.title".to_string(),
            date_selector: "div.date".to_string(),
            location_selector: "div.place".to_string(),
            link_selector: "a.img-wrap".to_string(),
        }
    }

    const PAGE: &str = r#"
        <html><body>
          <div class="events-elem">
            <a class="title">  Quartet night </a>
            <div class="date"> 12 March </div>
            <div class="place"> Philharmonic hall </div>
            <a class="img-wrap" href="/foo"></a>
          </div>
          <div class="events-elem">
            <a class="title">Open air cinema</a>
            <div class="date">13 March</div>
            <div class="place">City park</div>
          </div>
        </body></html>
    "#;

    #[test]
    fn extracts_cards_in_document_order() {
        let events = extract_events(PAGE, &site()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Quartet night");
        assert_eq!(events[1].title, "Open air cinema");
    }

    #[test]
    fn extraction_is_idempotent() {
        let first = extract_events(PAGE, &site()).unwrap();
        let second = extract_events(PAGE, &site()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn every_event_carries_the_site_event_type() {
        let events = extract_events(PAGE, &site()).unwrap();
        assert!(events.iter().all(|e| e.event_type == "concert"));
    }

    #[test]
    fn resolves_relative_href_against_page_url() {
        let events = extract_events(PAGE, &site()).unwrap();
        assert_eq!(events[0].link, "https://example.com/foo");
    }

    #[test]
    fn missing_href_falls_back_to_page_url() {
        let events = extract_events(PAGE, &site()).unwrap();
        assert_eq!(events[1].link, "https://example.com/bar/");
    }

    #[test]
    fn location_is_scoped_text_not_selector() {
        // One historical version of this crawler wrote the literal
        // selector string into the location field. Pin the fix.
        let events = extract_events(PAGE, &site()).unwrap();
        assert_eq!(events[0].location, "Philharmonic hall");
        assert_ne!(events[0].location, "div.place");
    }

    #[test]
    fn unmatched_field_selectors_yield_empty_strings() {
        let html = r#"<div class="events-elem"><a class="img-wrap" href="/x"></a></div>"#;
        let events = extract_events(html, &site()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "");
        assert_eq!(events[0].date, "");
        assert_eq!(events[0].location, "");
    }

    #[test]
    fn card_own_href_is_used_when_link_selector_misses() {
        let html = r#"
            <a class="events-elem" href="/direct">
              <span class="title">Inline card</span>
            </a>
        "#;
        let mut config = site();
        config.ancestor_selector = "a.events-elem".to_string();
        config.title_selector = "span.title".to_string();

        let events = extract_events(html, &config).unwrap();
        assert_eq!(events[0].link, "https://example.com/direct");
    }

    #[test]
    fn unresolvable_href_skips_only_that_card() {
        let html = r#"
            <div class="events-elem">
              <a class="title">Broken</a>
              <a class="img-wrap" href="http://["></a>
            </div>
            <div class="events-elem">
              <a class="title">Fine</a>
              <a class="img-wrap" href="/ok"></a>
            </div>
        "#;
        let events = extract_events(html, &site()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Fine");
    }

    #[test]
    fn zero_matches_is_not_an_error() {
        let events = extract_events("<html><body></body></html>", &site()).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn non_markup_payload_is_a_document_parse_error() {
        let result = extract_events("renderer crashed, sorry", &site());
        assert!(matches!(result, Err(AppError::DocumentParse { .. })));
    }

    #[test]
    fn invalid_selector_is_a_job_error() {
        let mut config = site();
        config.ancestor_selector = "[[invalid".to_string();
        assert!(matches!(
            extract_events(PAGE, &config),
            Err(AppError::Selector { .. })
        ));
    }
}
