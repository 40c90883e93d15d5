//! Plain-language findings derived from the other report sections.

use hilo_core::entities::{ExecutiveSummary, PriceStats, TrendReport};
use hilo_core::enums::PriceTrend;

/// Fill `executive_summary` from the rest of `report`.
#[must_use]
pub fn executive_summary(report: &TrendReport, suspicious_contacts: usize) -> ExecutiveSummary {
    let mut key_findings = vec![format!("{} messages analyzed", report.total_messages)];
    let mut recommendations = Vec::new();
    let mut risk_factors = Vec::new();

    if let Some((currency, stats)) = most_referenced_currency(report) {
        let noun = if stats.count == 1 { "price" } else { "prices" };
        key_findings.push(format!(
            "Most referenced currency: {currency} ({} {noun})",
            stats.count
        ));
    }

    for (currency, stats) in &report.price_analysis {
        key_findings.push(format!(
            "{currency}: {} prices, mean {:.2}, median {:.2}, {}",
            stats.count, stats.mean, stats.median, stats.trend
        ));
        if stats.trend != PriceTrend::Stable {
            recommendations.push(format!(
                "Review {currency} pricing: prices are {}",
                stats.trend
            ));
        }
    }

    let temporal = &report.temporal_patterns;
    if !temporal.peak_hours.is_empty() {
        key_findings.push(format!(
            "Peak activity hours (UTC): {}",
            hours(&temporal.peak_hours)
        ));
    }
    if let Some(day) = &report.correlations.financial_temporal.most_active_weekday {
        key_findings.push(format!("Financial messages concentrate on {day}"));
    }
    if !temporal.recommended_engagement_hours.is_empty() {
        recommendations.push(format!(
            "Schedule offers around {} UTC, the hours with the most financial activity",
            hours(&temporal.recommended_engagement_hours)
        ));
    }
    let social = &report.correlations.social_financial;
    if social.financial_messages > 0 && social.ratio >= 0.5 {
        recommendations.push(format!(
            "{:.0}% of financial messages carry hashtags or mentions; track them alongside prices",
            social.ratio * 100.0
        ));
    }

    let anomalies = &report.anomalies;
    for volatile in &anomalies.price_volatility {
        risk_factors.push(format!(
            "{} prices are volatile (stdev/mean {:.2})",
            volatile.currency, volatile.volatility
        ));
    }
    for unusual in &anomalies.unusual_activity {
        risk_factors.push(format!(
            "Unusual activity at {:02}:00 UTC ({} messages)",
            unusual.hour, unusual.count
        ));
    }
    if !anomalies.suspicious_patterns.is_empty() {
        risk_factors.push(format!(
            "{} messages carry more than {suspicious_contacts} phones or emails",
            anomalies.suspicious_patterns.len()
        ));
    }
    let contact = &report.correlations.contact_technical;
    if contact.with_technical_markers > 0 {
        risk_factors.push(format!(
            "{} contact messages also share coordinates or IP addresses",
            contact.with_technical_markers
        ));
    }

    ExecutiveSummary {
        key_findings,
        recommendations,
        risk_factors,
    }
}

/// Currency with the most prices; ties go to the alphabetically first code.
fn most_referenced_currency(report: &TrendReport) -> Option<(&str, &PriceStats)> {
    report
        .price_analysis
        .iter()
        .max_by_key(|(currency, stats)| (stats.count, std::cmp::Reverse(currency.as_str())))
        .map(|(currency, stats)| (currency.as_str(), stats))
}

fn hours(hours: &[u32]) -> String {
    hours
        .iter()
        .map(|h| format!("{h:02}:00"))
        .collect::<Vec<_>>()
        .join(", ")
}
