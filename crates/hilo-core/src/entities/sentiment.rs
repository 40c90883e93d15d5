use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SentimentLabel;

/// Contribution of one polar token to a sentence score.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TokenContribution {
    pub token: String,
    pub base_polarity: f64,
    pub multiplier: f64,
    pub contribution: f64,
}

/// An adversative conjunction and the weight it applied to its sentence.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AdversativeWeight {
    pub token: String,
    pub weight: f64,
    /// Sum of the sentence's contributions before weighting.
    pub sentence_score: f64,
}

/// Sentiment of one text.
///
/// `score` is the sum of sentence scores, where a sentence containing an
/// adversative is scaled by that adversative's weight. The per-token
/// `details` are unweighted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub score: f64,
    pub details: Vec<TokenContribution>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub adversatives: Vec<AdversativeWeight>,
}

impl SentimentResult {
    /// Result for empty or unscorable text.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            score: 0.0,
            details: Vec::new(),
            adversatives: Vec::new(),
        }
    }

    /// First contribution recorded for `token`.
    #[must_use]
    pub fn detail_for(&self, token: &str) -> Option<&TokenContribution> {
        self.details.iter().find(|d| d.token == token)
    }
}

/// Sentiment of one message, the record type of the sentiments artifact.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct MessageSentiment {
    pub message_id: i64,
    pub sender_id: i64,
    pub sender_display_name: String,
    pub result: SentimentResult,
}

/// Aggregate over a set of message sentiments. `per_user` is only filled at
/// the top level and keyed by user node id (`user:<sender_id>`); each entry
/// carries the sender's display name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SentimentSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub total_messages: usize,
    pub average_score: f64,
    pub distribution: BTreeMap<SentimentLabel, usize>,
    pub percentages: BTreeMap<SentimentLabel, f64>,
    pub most_common_sentiment: Option<SentimentLabel>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub per_user: BTreeMap<String, SentimentSummary>,
}

/// The sentiments artifact: per-message results plus their aggregate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SentimentsDocument {
    pub messages: Vec<MessageSentiment>,
    pub summary: SentimentSummary,
}
