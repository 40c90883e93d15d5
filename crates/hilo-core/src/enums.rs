//! Closed-set enums for chats, link content, sentiment, intents, graph edges,
//! pattern categories and persisted artifacts.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and expose `as_str()` so the same spelling is used in JSON, node IDs and logs.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ChatKind
// ---------------------------------------------------------------------------

/// Kind of chat as reported by the chat platform.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ChatKind {
    User,
    SmallGroup,
    MegaGroup,
    Channel,
    #[default]
    Unknown,
}

impl ChatKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::SmallGroup => "small_group",
            Self::MegaGroup => "mega_group",
            Self::Channel => "channel",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ChatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FileKind
// ---------------------------------------------------------------------------

/// File category detected from a URL extension or a media attachment.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Image,
    Video,
    Audio,
    Document,
    Compressed,
    Executable,
    Code,
    #[default]
    Unknown,
}

impl FileKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Document => "document",
            Self::Compressed => "compressed",
            Self::Executable => "executable",
            Self::Code => "code",
            Self::Unknown => "unknown",
        }
    }

    /// Emoji used when a file label replaces a URL in message text.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Image => "🖼️",
            Self::Video => "🎬",
            Self::Audio => "🎵",
            Self::Document => "📄",
            Self::Compressed => "🗜️",
            Self::Executable => "⚙️",
            Self::Code => "💻",
            Self::Unknown => "📎",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SentimentLabel
// ---------------------------------------------------------------------------

/// Polarity label derived from a sentiment score by thresholds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// All labels in reporting order.
    pub const ALL: [Self; 3] = [Self::Positive, Self::Negative, Self::Neutral];

    /// Derive a label from a score: `score >= pos` is positive,
    /// `score <= neg` is negative, anything in between is neutral.
    #[must_use]
    pub fn from_score(score: f64, pos_threshold: f64, neg_threshold: f64) -> Self {
        if score >= pos_threshold {
            Self::Positive
        } else if score <= neg_threshold {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Intent
// ---------------------------------------------------------------------------

/// Closed-set communicative intent assigned to every message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Question,
    Statement,
    Offer,
    Greeting,
    Information,
    Request,
}

impl Intent {
    pub const ALL: [Self; 6] = [
        Self::Question,
        Self::Statement,
        Self::Offer,
        Self::Greeting,
        Self::Information,
        Self::Request,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Statement => "statement",
            Self::Offer => "offer",
            Self::Greeting => "greeting",
            Self::Information => "information",
            Self::Request => "request",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EdgeKind
// ---------------------------------------------------------------------------

/// Relation carried by a knowledge-graph edge.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    AuthoredBy,
    ReplyTo,
    Mentions,
    TemporalNear,
    SemanticSim,
    SameAuthorSequence,
}

impl EdgeKind {
    pub const ALL: [Self; 6] = [
        Self::AuthoredBy,
        Self::ReplyTo,
        Self::Mentions,
        Self::TemporalNear,
        Self::SemanticSim,
        Self::SameAuthorSequence,
    ];

    /// Inferred edges link two messages without an explicit reply.
    #[must_use]
    pub const fn is_inferred(self) -> bool {
        matches!(
            self,
            Self::TemporalNear | Self::SemanticSim | Self::SameAuthorSequence
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthoredBy => "authored_by",
            Self::ReplyTo => "reply_to",
            Self::Mentions => "mentions",
            Self::TemporalNear => "temporal_near",
            Self::SemanticSim => "semantic_sim",
            Self::SameAuthorSequence => "same_author_sequence",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PatternCategory
// ---------------------------------------------------------------------------

/// Category a scanner pattern belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum PatternCategory {
    Contact,
    Finance,
    Network,
    Content,
    Geo,
    Codes,
    Time,
    Custom,
}

impl PatternCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Finance => "finance",
            Self::Network => "network",
            Self::Content => "content",
            Self::Geo => "geo",
            Self::Codes => "codes",
            Self::Time => "time",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TimeOfDay
// ---------------------------------------------------------------------------

/// Four six-hour buckets used by the temporal analysis.
///
/// ```text
/// night 00-06 | morning 06-12 | afternoon 12-18 | evening 18-24
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub const ALL: [Self; 4] = [Self::Morning, Self::Afternoon, Self::Evening, Self::Night];

    /// Bucket for an hour in `0..24`.
    #[must_use]
    pub const fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => Self::Morning,
            12..=17 => Self::Afternoon,
            18..=23 => Self::Evening,
            _ => Self::Night,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PriceTrend
// ---------------------------------------------------------------------------

/// Direction of a currency's price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PriceTrend {
    Rising,
    Falling,
    Stable,
}

impl PriceTrend {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rising => "rising",
            Self::Falling => "falling",
            Self::Stable => "stable",
        }
    }
}

impl fmt::Display for PriceTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ArtifactKind
// ---------------------------------------------------------------------------

/// Named per-chat artifacts handed to the persistence collaborator.
///
/// Each artifact lands as `<base>_<suffix>.json`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Normalized,
    Patterns,
    Sentiments,
    Graph,
    Threads,
    Analysis,
    Trends,
}

impl ArtifactKind {
    pub const ALL: [Self; 7] = [
        Self::Normalized,
        Self::Patterns,
        Self::Sentiments,
        Self::Graph,
        Self::Threads,
        Self::Analysis,
        Self::Trends,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normalized => "normalized",
            Self::Patterns => "patterns",
            Self::Sentiments => "sentiments",
            Self::Graph => "graph",
            Self::Threads => "threads",
            Self::Analysis => "analysis",
            Self::Trends => "trends",
        }
    }

    /// File name for this artifact under a chat's base name.
    #[must_use]
    pub fn file_name(self, base: &str) -> String {
        format!("{base}_{}.json", self.as_str())
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
