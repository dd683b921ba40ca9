use cb_core::{Article, Attribution, Caption, HashtagTable};
use serde::{Deserialize, Serialize};

const OPENING_QUOTES: [char; 4] = ['\'', '"', '‘', '“'];
const CLOSING_QUOTES: [char; 4] = ['\'', '"', '’', '”'];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionConfig {
    /// Glyph placed before a source link
    pub link_marker: String,
    /// Also put the marker before a bare handle
    pub mark_handles: bool,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            link_marker: "📝".to_string(),
            mark_handles: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CaptionComposer {
    config: CaptionConfig,
}

impl CaptionComposer {
    pub fn new(config: CaptionConfig) -> Self {
        Self { config }
    }

    pub fn marker(&self) -> &str {
        &self.config.link_marker
    }

    /// Builds the post text: the quoted title with inline hashtags, then the
    /// attribution, then any keywords that could not be placed in the title.
    pub fn compose(&self, article: &Article, attribution: &Attribution, hashtags: &HashtagTable) -> Caption {
        let mut title = quote_title(article.title.trim());
        let mut overflow = Vec::new();

        for keyword in &article.keywords {
            match hashtags.get(keyword) {
                Some(hashtag) => {
                    let single_word = keyword.split_whitespace().count() == 1;
                    match find_case_insensitive(&title, keyword) {
                        Some(index) if single_word => title.insert(index, '#'),
                        _ => overflow.push(as_hashtag(hashtag)),
                    }
                }
                None => {
                    if !keyword.split_whitespace().any(|word| title.contains(word)) {
                        overflow.push(keyword.clone());
                    }
                }
            }
        }

        let mut paragraphs = vec![title];
        if let Some(line) = self.attribution_line(attribution) {
            paragraphs.push(line);
        }
        if !overflow.is_empty() {
            paragraphs.push(format!("({})", overflow.join(", ")));
        }

        Caption(paragraphs.join("\n\n"))
    }

    fn attribution_line(&self, attribution: &Attribution) -> Option<String> {
        match attribution {
            Attribution::None => None,
            Attribution::SourceLink(link) => Some(self.marked(link.as_str())),
            Attribution::SourceHandle(handle) if self.config.mark_handles => Some(self.marked(handle)),
            Attribution::SourceHandle(handle) => Some(handle.clone()),
        }
    }

    fn marked(&self, text: &str) -> String {
        if self.config.link_marker.is_empty() {
            text.to_string()
        } else {
            format!("{} {}", self.config.link_marker, text)
        }
    }
}

fn quote_title(title: &str) -> String {
    let quoted = title.chars().count() > 1
        && title.starts_with(&OPENING_QUOTES[..])
        && title.ends_with(&CLOSING_QUOTES[..]);
    if quoted {
        title.to_string()
    } else {
        format!("'{}'", title)
    }
}

fn as_hashtag(hashtag: &str) -> String {
    if hashtag.starts_with('#') {
        hashtag.to_string()
    } else {
        format!("#{}", hashtag)
    }
}

/// Byte offset of the first case-insensitive occurrence of `needle`.
fn find_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let needle: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return None;
    }
    haystack.char_indices().map(|(i, _)| i).find(|&i| {
        let mut rest = haystack[i..].chars().flat_map(char::to_lowercase);
        needle.iter().all(|c| rest.next() == Some(*c))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn article(title: &str, keywords: &[&str]) -> Article {
        Article {
            url: "https://www.soccernews.nl/news/3".to_string(),
            title: title.to_string(),
            preface: String::new(),
            body: vec![],
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn table() -> HashtagTable {
        [("PSV", "psv"), ("Ajax", "#ajax"), ("Feyenoord", "feyenoord"), ("Eredivisie", "eredivisie"), ("Champions League", "UCL")]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_hashtag_spliced_in_title() {
        let caption = CaptionComposer::default().compose(&article("PSV wint", &["PSV"]), &Attribution::None, &table());
        assert_eq!(caption.as_str(), "'#PSV wint'");
    }

    #[test]
    fn test_case_insensitive_splice_keeps_title_casing() {
        let caption = CaptionComposer::default().compose(&article("Zo speelt ajax", &["Ajax"]), &Attribution::None, &table());
        assert_eq!(caption.as_str(), "'Zo speelt #ajax'");
    }

    #[test]
    fn test_overflow_paragraph() {
        let caption = CaptionComposer::default().compose(
            &article("PSV wint", &["PSV", "Eredivisie", "Champions League", "Luuk de Jong", "wint"]),
            &Attribution::None,
            &table(),
        );
        assert_eq!(caption.as_str(), "'#PSV wint'\n\n(#eredivisie, #UCL, Luuk de Jong)");
    }

    #[test]
    fn test_already_quoted_title() {
        let composer = CaptionComposer::default();
        let caption = composer.compose(&article("‘Ik blijf bij PSV’", &[]), &Attribution::None, &table());
        assert_eq!(caption.as_str(), "‘Ik blijf bij PSV’");

        let caption = composer.compose(&article("\"Ik blijf\", zegt hij", &[]), &Attribution::None, &table());
        assert_eq!(caption.as_str(), "'\"Ik blijf\", zegt hij'");
    }

    #[test]
    fn test_attribution_paragraphs() {
        let composer = CaptionComposer::default();
        let link = Attribution::SourceLink(Url::parse("https://www.ad.nl/psv/1").unwrap());
        let caption = composer.compose(&article("PSV wint", &["PSV", "Feyenoord"]), &link, &table());
        assert_eq!(caption.as_str(), "'#PSV wint'\n\n📝 https://www.ad.nl/psv/1\n\n(#feyenoord)");

        let handle = Attribution::SourceHandle("@ADnl".to_string());
        let caption = composer.compose(&article("PSV wint", &[]), &handle, &table());
        assert_eq!(caption.as_str(), "'PSV wint'\n\n@ADnl");

        let marking = CaptionComposer::new(CaptionConfig {
            mark_handles: true,
            ..CaptionConfig::default()
        });
        let caption = marking.compose(&article("PSV wint", &[]), &handle, &table());
        assert_eq!(caption.as_str(), "'PSV wint'\n\n📝 @ADnl");
    }

    #[test]
    fn test_find_case_insensitive() {
        assert_eq!(find_case_insensitive("Één PSV", "psv"), Some(6));
        assert_eq!(find_case_insensitive("Ajax", "feyenoord"), None);
        assert_eq!(find_case_insensitive("Ajax", ""), None);
    }
}
