//! Volatile prices, activity at unusual hours and contact-heavy messages.

use std::collections::BTreeMap;

use hilo_config::TrendsConfig;
use hilo_core::entities::{
    Anomalies, MessageEnrichment, PriceStats, SuspiciousMessage, UnusualActivity,
    VolatileCurrency,
};
use hilo_scan::names;

use crate::round4;
use crate::temporal::count_all;

#[must_use]
pub fn detect_anomalies(
    records: &[&MessageEnrichment],
    prices: &BTreeMap<String, PriceStats>,
    hourly_activity: &BTreeMap<u32, usize>,
    config: &TrendsConfig,
) -> Anomalies {
    Anomalies {
        price_volatility: price_volatility(prices, config.volatility_ratio),
        unusual_activity: unusual_activity(hourly_activity, config),
        suspicious_patterns: suspicious_patterns(records, config.suspicious_contacts),
    }
}

fn price_volatility(prices: &BTreeMap<String, PriceStats>, ratio: f64) -> Vec<VolatileCurrency> {
    prices
        .iter()
        .filter(|(_, s)| s.mean > 0.0 && s.stdev > ratio * s.mean)
        .map(|(currency, s)| VolatileCurrency {
            currency: currency.clone(),
            mean: s.mean,
            stdev: s.stdev,
            volatility: round4(s.stdev / s.mean),
        })
        .collect()
}

fn unusual_activity(
    hourly_activity: &BTreeMap<u32, usize>,
    config: &TrendsConfig,
) -> Vec<UnusualActivity> {
    let (start, end) = config.unusual_hours;
    if start > end {
        return Vec::new();
    }
    hourly_activity
        .range(start..=end)
        .filter(|&(_, &count)| count > config.unusual_min_messages)
        .map(|(&hour, &count)| UnusualActivity { hour, count })
        .collect()
}

fn suspicious_patterns(records: &[&MessageEnrichment], limit: usize) -> Vec<SuspiciousMessage> {
    records
        .iter()
        .filter_map(|record| {
            let phones = count_all(&record.matches, names::PHONES);
            let emails = record.matches.count(names::EMAIL);
            (phones > limit || emails > limit).then_some(SuspiciousMessage {
                message_id: record.message_id,
                phones,
                emails,
            })
        })
        .collect()
}
