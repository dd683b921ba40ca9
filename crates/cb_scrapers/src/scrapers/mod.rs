pub mod soccernews;

pub use soccernews::SoccerNewsScraper;

/// Common utilities for scrapers
pub(crate) mod utils {
    use cb_core::{Error, Result};
    use scraper::{ElementRef, Html, Selector};

    pub fn selector(css: &str) -> Result<Selector> {
        Selector::parse(css).map_err(|e| Error::Parse(format!("Invalid selector {}: {}", css, e)))
    }

    pub fn element_text(el: ElementRef<'_>) -> String {
        el.text().collect::<String>().trim().to_string()
    }

    /// Trimmed text of the first non-empty match among `selectors`, tried in order.
    pub fn first_text(document: &Html, selectors: &[&str]) -> Result<Option<String>> {
        for css in selectors {
            let sel = selector(css)?;
            let found = document
                .select(&sel)
                .map(element_text)
                .find(|text| !text.is_empty());
            if found.is_some() {
                return Ok(found);
            }
        }
        Ok(None)
    }

    pub fn meta_content(document: &Html, name: &str) -> Result<Option<String>> {
        let sel = selector(&format!("meta[name=\"{}\"]", name))?;
        Ok(document
            .select(&sel)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(str::to_string))
    }

    /// Splits a comma separated list, dropping blanks and repeats.
    pub fn split_list(raw: &str) -> Vec<String> {
        let mut items: Vec<String> = Vec::new();
        for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if !items.iter().any(|seen| seen == item) {
                items.push(item.to_string());
            }
        }
        items
    }
}
