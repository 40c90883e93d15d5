//! Entity structs for chats, messages and every derived artifact.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` so each
//! persisted artifact can be validated against its generated schema.

mod analysis;
mod chat;
mod file_type;
mod graph;
mod link;
mod message;
mod patterns;
mod report;
mod sentiment;
mod thread;
mod trends;

pub use analysis::{
    ContentAnalysis, ConversationAnalysis, ConversationPatterns, GraphMetrics, IntentBigram,
    TemporalAnalysis, ThreadMetrics, UserEngagement, UserEngagementEntry,
};
pub use chat::Chat;
pub use file_type::FileTypeDescriptor;
pub use graph::{EdgeData, EdgeRecord, GraphDocument, GraphMetadata, MessageNode, NodeAttrs, UserNode};
pub use link::{DisplayField, LinkDescriptor};
pub use message::{MediaRef, Mention, NormalizedMessage, RawMessage};
pub use patterns::{MatchPayload, MessageEnrichment, PatternContext, PatternMatchSet};
pub use report::{BatchReport, ChatOutcome, ChatStatus};
pub use sentiment::{
    AdversativeWeight, MessageSentiment, SentimentResult, SentimentSummary, SentimentsDocument, TokenContribution,
};
pub use thread::{MessageRef, Thread, ThreadEntry, ThreadsDocument, ThreadsMetadata};
pub use trends::{
    Anomalies, ContactTechnicalCorrelation, Correlations, ExecutiveSummary,
    FinancialTemporalCorrelation, HourBreakdown, PriceStats, SocialFinancialCorrelation,
    SuspiciousMessage, TemporalPatterns, TrendReport, UnusualActivity, VolatileCurrency,
};
