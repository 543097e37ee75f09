//! Markup extractor
//!
//! Turns catalog pages into typed records. Each record is read from a single
//! root element (one list item, one notation block) and every field is
//! queried relative to that root, so fields cannot drift out of alignment
//! with each other when the site's markup changes.
//!
//! A page whose structure no longer matches produces fewer or empty records,
//! never an error. An empty list is a valid, displayable result.

use crate::notation;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use tunes_common::{Tune, TuneSetting};

/// Field queries for one tune list layout
struct TuneListLayout {
    /// Record root, one per listed tune
    root: Selector,
    /// Link carrying the name as text and the id as `data-tuneid`
    link: Selector,
    tune_type: Selector,
    /// Search results wrap the type label in newlines
    trim_type_newlines: bool,
}

struct Layouts {
    popular: TuneListLayout,
    search: TuneListLayout,
    setting_notes: Selector,
}

const TUNE_ID_ATTR: &str = "data-tuneid";

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector is valid CSS")
}

fn layouts() -> &'static Layouts {
    static LAYOUTS: OnceLock<Layouts> = OnceLock::new();
    LAYOUTS.get_or_init(|| Layouts {
        popular: TuneListLayout {
            root: selector(r#"span[class="manifest-item-title"]"#),
            link: selector("a[data-tuneid]"),
            tune_type: selector(r#"a[class="detail"]"#),
            trim_type_newlines: false,
        },
        search: TuneListLayout {
            root: selector(r#"li[class="manifest-item"]"#),
            link: selector("a[data-tuneid]"),
            tune_type: selector(r#"span[class="manifest-item-title detail"]"#),
            trim_type_newlines: true,
        },
        setting_notes: selector(r#"div[class="setting-abc"] > div[class="notes"]"#),
    })
}

/// Tunes listed on the popular-tunes page
pub fn extract_popular(markup: &str) -> Vec<Tune> {
    extract_tunes(markup, &layouts().popular)
}

/// Tunes listed on a search results page
pub fn extract_search(markup: &str) -> Vec<Tune> {
    extract_tunes(markup, &layouts().search)
}

/// Settings (notation blocks) on a tune detail page, in page order
pub fn extract_settings(markup: &str) -> Vec<TuneSetting> {
    let document = Html::parse_document(markup);
    let settings: Vec<TuneSetting> = document
        .select(&layouts().setting_notes)
        .map(|notes| notation::parse_setting(&text_content(notes)))
        .collect();

    tracing::debug!(count = settings.len(), "Extracted tune settings");
    settings
}

fn extract_tunes(markup: &str, layout: &TuneListLayout) -> Vec<Tune> {
    let document = Html::parse_document(markup);
    let mut tunes = Vec::new();

    for (position, root) in document.select(&layout.root).enumerate() {
        match tune_from_root(root, layout) {
            Some(tune) => tunes.push(tune),
            None => tracing::warn!(position, "Skipping list entry without a tune link"),
        }
    }

    tracing::debug!(count = tunes.len(), "Extracted tunes");
    tunes
}

fn tune_from_root(root: ElementRef<'_>, layout: &TuneListLayout) -> Option<Tune> {
    let link = root.select(&layout.link).next()?;
    let id = link.value().attr(TUNE_ID_ATTR)?;
    let name = text_content(link);

    let tune_type = root
        .select(&layout.tune_type)
        .next()
        .map(text_content)
        .unwrap_or_default();
    let tune_type = if layout.trim_type_newlines {
        tune_type.trim_matches('\n').to_string()
    } else {
        tune_type
    };

    Some(Tune::new(name, id, tune_type))
}

/// All descendant text of an element, concatenated in document order
fn text_content(element: ElementRef<'_>) -> String {
    element.text().collect()
}
