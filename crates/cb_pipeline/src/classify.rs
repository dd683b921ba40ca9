use cb_core::{Article, ClassificationResult, RejectReason};
use serde::{Deserialize, Serialize};
use tracing::debug;

const ROUNDUP_MARKER: &str = "greep uit de reacties";
const TWITTER_MARKER: &str = "twitter";
const MATCH_REPORT_MARKER: &str = "scoreverloop";
const LINEUP_PREFIXES: [&str; 2] = ["de 11", "opstelling"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Minimum combined preface and body length, in characters
    pub min_length: usize,
    /// Maximum combined preface and body length, in characters
    pub max_length: usize,
    /// Rules to apply, in order
    pub rules: Vec<RejectReason>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_length: 400,
            max_length: 2000,
            rules: vec![
                RejectReason::TooShort,
                RejectReason::TooLong,
                RejectReason::TweetRoundup,
                RejectReason::MatchReport,
                RejectReason::Lineup,
            ],
        }
    }
}

/// Editorial filter deciding whether an article is worth posting.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Applies the configured rules in order; the first match rejects.
    pub fn classify(&self, article: &Article) -> ClassificationResult {
        let length = article.text_length();
        let title = article.title.to_lowercase();
        let body = article.body_text().to_lowercase();

        for rule in &self.config.rules {
            let rejected = match rule {
                RejectReason::TooShort => length < self.config.min_length,
                RejectReason::TooLong => length > self.config.max_length,
                RejectReason::TweetRoundup => {
                    body.contains(ROUNDUP_MARKER) || title.contains(TWITTER_MARKER)
                }
                RejectReason::MatchReport => body.contains(MATCH_REPORT_MARKER),
                RejectReason::Lineup => LINEUP_PREFIXES.iter().any(|p| title.starts_with(p)),
            };
            if rejected {
                debug!("🚫 Rejected {} ({}, {} characters)", article.url, rule, length);
                return ClassificationResult::reject(*rule);
            }
        }

        ClassificationResult::accept()
    }
}
