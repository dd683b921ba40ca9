use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub url: String,
    pub title: String,
    pub preface: String,
    pub body: Vec<String>,
    pub keywords: Vec<String>,
}

impl Article {
    /// Body paragraphs joined with single spaces.
    pub fn body_text(&self) -> String {
        self.body.join(" ")
    }

    /// Title, preface and body as one haystack for name lookups.
    pub fn full_text(&self) -> String {
        format!("{} {} {}", self.title, self.preface, self.body_text())
    }

    /// Character count of preface plus joined body.
    pub fn text_length(&self) -> usize {
        self.preface.chars().count() + self.body_text().chars().count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    TooShort,
    TooLong,
    TweetRoundup,
    MatchReport,
    Lineup,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::TooShort => "too_short",
            RejectReason::TooLong => "too_long",
            RejectReason::TweetRoundup => "tweet_roundup",
            RejectReason::MatchReport => "match_report",
            RejectReason::Lineup => "lineup",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationResult {
    pub accepted: bool,
    pub reason: Option<RejectReason>,
}

impl ClassificationResult {
    pub fn accept() -> Self {
        Self {
            accepted: true,
            reason: None,
        }
    }

    pub fn reject(reason: RejectReason) -> Self {
        Self {
            accepted: false,
            reason: Some(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attribution {
    None,
    SourceHandle(String),
    SourceLink(Url),
}

impl Attribution {
    pub fn is_none(&self) -> bool {
        matches!(self, Attribution::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontRole {
    Title,
    Preface,
    Body,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrappedText {
    pub lines: Vec<String>,
    pub pixel_height: u32,
}

impl WrappedText {
    /// Lines joined with newlines, ready for drawing.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    pub role: FontRole,
    pub x: u32,
    pub y: u32,
    pub text: WrappedText,
}

/// Positions of every text block on the final image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLayout {
    pub width: u32,
    pub height: u32,
    pub band_height: u32,
    pub background: Rgb,
    pub highlight: Rgb,
    pub text_color: Rgb,
    pub blocks: Vec<TextBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption(pub String);

impl Caption {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Caption with the attribution marker glyph and its trailing space removed.
    pub fn without_marker(&self, marker: &str) -> String {
        if marker.is_empty() {
            return self.0.clone();
        }
        self.0.replace(&format!("{} ", marker), "")
    }
}

impl fmt::Display for Caption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashtagTable(HashMap<String, String>);

impl HashtagTable {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self(entries)
    }

    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.0.get(keyword).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HashtagTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub link: Url,
    pub published_at: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    pub id: Option<String>,
    pub url: Option<String>,
}
