//! Chat-level and per-user sentiment summaries.

use std::collections::BTreeMap;

use hilo_core::entities::{MessageSentiment, SentimentResult, SentimentSummary};
use hilo_core::enums::SentimentLabel;
use hilo_core::ids::NodeId;

/// Summary over `records`, with a nested summary per sender keyed by the
/// sender's user node id. Senders sharing a display name stay apart.
#[must_use]
pub fn summarize(records: &[MessageSentiment]) -> SentimentSummary {
    let mut by_user: BTreeMap<i64, (&str, Vec<&SentimentResult>)> = BTreeMap::new();
    for record in records {
        by_user
            .entry(record.sender_id)
            .or_insert_with(|| (record.sender_display_name.as_str(), Vec::new()))
            .1
            .push(&record.result);
    }

    let mut summary = summarize_results(records.iter().map(|r| &r.result));
    summary.per_user = by_user
        .into_iter()
        .map(|(sender_id, (name, results))| {
            let mut user = summarize_results(results);
            user.display_name = Some(name.to_string());
            (NodeId::User(sender_id).to_string(), user)
        })
        .collect();
    summary
}

/// Flat summary without the per-user breakdown.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn summarize_results<'a>(results: impl IntoIterator<Item = &'a SentimentResult>) -> SentimentSummary {
    let mut distribution: BTreeMap<SentimentLabel, usize> =
        SentimentLabel::ALL.iter().map(|&l| (l, 0)).collect();
    let mut total = 0usize;
    let mut score_sum = 0.0;
    for result in results {
        total += 1;
        score_sum += result.score;
        *distribution.entry(result.label).or_insert(0) += 1;
    }

    if total == 0 {
        return SentimentSummary {
            distribution,
            percentages: SentimentLabel::ALL.iter().map(|&l| (l, 0.0)).collect(),
            ..SentimentSummary::default()
        };
    }

    let percentages = distribution
        .iter()
        .map(|(&label, &count)| (label, round2(count as f64 / total as f64 * 100.0)))
        .collect();
    // Ties resolve in reporting order: positive, negative, neutral.
    let most_common = SentimentLabel::ALL
        .iter()
        .copied()
        .max_by_key(|l| (distribution[l], std::cmp::Reverse(*l)));

    SentimentSummary {
        display_name: None,
        total_messages: total,
        average_score: round4(score_sum / total as f64),
        distribution,
        percentages,
        most_common_sentiment: most_common,
        per_user: BTreeMap::new(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
