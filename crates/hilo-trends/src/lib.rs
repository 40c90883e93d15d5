//! # hilo-trends
//!
//! Aggregates per-message pattern matches of one chat into a
//! [`TrendReport`]: price statistics per currency, hourly and weekday
//! activity, anomalies, correlations between pattern groups and an
//! executive summary. Every threshold comes from [`TrendsConfig`].

pub mod anomalies;
pub mod correlations;
pub mod prices;
pub mod summary;
pub mod temporal;

use hilo_config::TrendsConfig;
use hilo_core::entities::{MessageEnrichment, TrendReport};

pub use prices::{currency_code, extract_prices, parse_amount};

/// Build the trend report for one chat's enrichment records.
///
/// Records may arrive in any order; they are read chronologically (ties by
/// message id), so the report does not depend on input order.
#[must_use]
pub fn analyze_trends(records: &[MessageEnrichment], config: &TrendsConfig) -> TrendReport {
    let mut ordered: Vec<&MessageEnrichment> = records.iter().collect();
    ordered.sort_by_key(|r| (r.timestamp, r.message_id));

    let price_analysis = prices::price_analysis(&ordered, config.stable_band);
    let temporal_patterns = temporal::temporal_patterns(&ordered, config.top_hours);
    let anomalies = anomalies::detect_anomalies(
        &ordered,
        &price_analysis,
        &temporal_patterns.hourly_activity,
        config,
    );
    let correlations = correlations::correlations(&ordered);

    let mut report = TrendReport {
        total_messages: ordered.len(),
        price_analysis,
        temporal_patterns,
        anomalies,
        correlations,
        executive_summary: hilo_core::entities::ExecutiveSummary::default(),
    };
    report.executive_summary = summary::executive_summary(&report, config.suspicious_contacts);

    tracing::debug!(
        messages = report.total_messages,
        currencies = report.price_analysis.len(),
        anomalies = report.anomalies.unusual_activity.len()
            + report.anomalies.price_volatility.len()
            + report.anomalies.suspicious_patterns.len(),
        "trend report built"
    );
    report
}

pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
