use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::PriceTrend;

/// Aggregate trend report over a chat's pattern-match corpus.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TrendReport {
    pub total_messages: usize,
    /// Statistics keyed by ISO currency code.
    pub price_analysis: BTreeMap<String, PriceStats>,
    pub temporal_patterns: TemporalPatterns,
    pub anomalies: Anomalies,
    pub correlations: Correlations,
    pub executive_summary: ExecutiveSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PriceStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub stdev: f64,
    pub trend: PriceTrend,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TemporalPatterns {
    /// Message counts for hours `0..24` (every hour present).
    pub hourly_activity: BTreeMap<u32, usize>,
    /// Message counts per weekday, keyed by lowercase English name.
    pub daily_activity: BTreeMap<String, usize>,
    pub hourly_breakdown: BTreeMap<u32, HourBreakdown>,
    pub peak_hours: Vec<u32>,
    pub recommended_engagement_hours: Vec<u32>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HourBreakdown {
    pub financial: usize,
    pub temporal_reference: usize,
    pub url: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Anomalies {
    pub price_volatility: Vec<VolatileCurrency>,
    pub unusual_activity: Vec<UnusualActivity>,
    pub suspicious_patterns: Vec<SuspiciousMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct VolatileCurrency {
    pub currency: String,
    pub mean: f64,
    pub stdev: f64,
    /// `stdev / mean`.
    pub volatility: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UnusualActivity {
    pub hour: u32,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SuspiciousMessage {
    pub message_id: i64,
    pub phones: usize,
    pub emails: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Correlations {
    pub financial_temporal: FinancialTemporalCorrelation,
    pub social_financial: SocialFinancialCorrelation,
    pub contact_technical: ContactTechnicalCorrelation,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FinancialTemporalCorrelation {
    pub most_active_weekday: Option<String>,
    pub financial_by_weekday: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SocialFinancialCorrelation {
    pub financial_messages: usize,
    pub with_social_markers: usize,
    pub ratio: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ContactTechnicalCorrelation {
    pub contact_messages: usize,
    pub with_technical_markers: usize,
    pub ratio: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExecutiveSummary {
    pub key_findings: Vec<String>,
    pub recommendations: Vec<String>,
    pub risk_factors: Vec<String>,
}
