//! Trend reports over scanned Spanish chat messages.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, Duration, TimeZone, Utc};
use hilo_config::TrendsConfig;
use hilo_core::entities::{MessageEnrichment, NormalizedMessage, RawMessage, UnusualActivity};
use hilo_core::enums::PriceTrend;
use hilo_scan::{PatternScanner, ScanOptions};
use hilo_trends::analyze_trends;
use pretty_assertions::assert_eq;

static SCANNER: LazyLock<PatternScanner> =
    LazyLock::new(|| PatternScanner::builtin(ScanOptions::default()).expect("builtin catalog"));

/// Friday 2024-05-10, 00:00 UTC.
fn midnight() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 0, 0, 0).unwrap()
}

fn message(id: i64, at: DateTime<Utc>, body: &str) -> NormalizedMessage {
    NormalizedMessage::passthrough(RawMessage {
        id,
        chat_id: 1,
        sender_id: 100 + id % 3,
        sender_display_name: format!("user{}", id % 3),
        sender_handle: None,
        text: body.to_string(),
        timestamp: at,
        reply_to_id: None,
        reactions: BTreeMap::new(),
        mentions: Vec::new(),
        media: None,
    })
}

fn enrich(messages: &[NormalizedMessage]) -> Vec<MessageEnrichment> {
    SCANNER.scan_messages(messages)
}

#[test]
fn fifteen_messages_at_three_am_are_unusual() {
    let messages: Vec<_> = (0..15)
        .map(|i| message(i, midnight() + Duration::hours(3) + Duration::seconds(i), "hola"))
        .collect();
    let report = analyze_trends(&enrich(&messages), &TrendsConfig::default());

    assert_eq!(report.total_messages, 15);
    assert_eq!(report.temporal_patterns.hourly_activity.get(&3), Some(&15));
    assert_eq!(
        report.anomalies.unusual_activity,
        [UnusualActivity { hour: 3, count: 15 }]
    );
    assert!(
        report
            .executive_summary
            .risk_factors
            .iter()
            .any(|r| r.contains("03:00")),
        "{:?}",
        report.executive_summary.risk_factors
    );
}

#[test]
fn ten_messages_in_the_watched_hours_are_not_unusual() {
    let messages: Vec<_> = (0..10)
        .map(|i| message(i, midnight() + Duration::hours(4), "hola"))
        .collect();
    let report = analyze_trends(&enrich(&messages), &TrendsConfig::default());
    assert!(report.anomalies.unusual_activity.is_empty());
}

fn priced_messages() -> Vec<NormalizedMessage> {
    let bodies = [
        "vendo bici en 100 usd",
        "la dejo en 110 dólares",
        "última oferta $ 130 #remate",
        "rango $140-160 por la otra",
        "ahora 1.500,50 pesos",
    ];
    bodies
        .iter()
        .zip(0i64..)
        .map(|(body, i)| message(i, midnight() + Duration::hours(10 + i), body))
        .collect()
}

#[test]
fn prices_are_grouped_by_currency_code() {
    let report = analyze_trends(&enrich(&priced_messages()), &TrendsConfig::default());

    let usd = &report.price_analysis["USD"];
    assert_eq!(usd.count, 4);
    assert_eq!(usd.min, 100.0);
    assert_eq!(usd.max, 150.0);
    assert_eq!(usd.mean, 122.5);
    assert_eq!(usd.median, 120.0);
    assert_eq!(usd.trend, PriceTrend::Rising);

    let mxn = &report.price_analysis["MXN"];
    assert_eq!(mxn.count, 1);
    assert_eq!(mxn.mean, 1500.5);
    assert_eq!(mxn.trend, PriceTrend::Stable);

    assert!(report.anomalies.price_volatility.is_empty());
}

#[test]
fn symbol_price_with_a_trailing_code_counts_once() {
    let messages = vec![
        message(1, midnight() + Duration::hours(9), "vendo la bici en $50 usd"),
        message(2, midnight() + Duration::hours(10), "y la otra en $70 USD"),
    ];
    let report = analyze_trends(&enrich(&messages), &TrendsConfig::default());

    let usd = &report.price_analysis["USD"];
    assert_eq!(usd.count, 2);
    assert_eq!(usd.mean, 60.0);
    assert_eq!(report.price_analysis.len(), 1);
}

#[test]
fn most_referenced_currency_is_a_key_finding() {
    let bodies = [
        "vendo en 300 pesos",
        "la otra en 20 usd",
        "o 350 pesos",
        "también 5 eur",
        "último precio 280 pesos",
        "o 25 usd",
    ];
    let messages: Vec<_> = bodies
        .iter()
        .zip(0i64..)
        .map(|(body, i)| message(i, midnight() + Duration::hours(8 + i), body))
        .collect();
    let report = analyze_trends(&enrich(&messages), &TrendsConfig::default());

    assert_eq!(report.price_analysis["MXN"].count, 3);
    assert!(
        report
            .executive_summary
            .key_findings
            .contains(&"Most referenced currency: MXN (3 prices)".to_string()),
        "{:?}",
        report.executive_summary.key_findings
    );
}

#[test]
fn most_referenced_currency_ties_go_to_the_first_code() {
    let messages = vec![
        message(1, midnight() + Duration::hours(8), "en 20 usd"),
        message(2, midnight() + Duration::hours(9), "o 15 eur"),
    ];
    let report = analyze_trends(&enrich(&messages), &TrendsConfig::default());
    assert!(
        report
            .executive_summary
            .key_findings
            .contains(&"Most referenced currency: EUR (1 price)".to_string()),
        "{:?}",
        report.executive_summary.key_findings
    );
}

#[test]
fn unrelated_messages_leave_price_stats_unchanged() {
    let priced = priced_messages();
    let baseline = analyze_trends(&enrich(&priced), &TrendsConfig::default());

    let mut noisy = priced;
    for i in 0..20 {
        noisy.push(message(
            100 + i,
            midnight() + Duration::minutes(37 * i),
            "¿alguien va a la reunión? saludos a todos",
        ));
    }
    let report = analyze_trends(&enrich(&noisy), &TrendsConfig::default());

    assert_eq!(report.price_analysis, baseline.price_analysis);
    assert_eq!(report.total_messages, 25);
}

#[test]
fn input_order_does_not_change_the_report() {
    let enriched = enrich(&priced_messages());
    let mut reversed = enriched.clone();
    reversed.reverse();
    let config = TrendsConfig::default();
    assert_eq!(
        serde_json::to_string(&analyze_trends(&reversed, &config)).unwrap(),
        serde_json::to_string(&analyze_trends(&enriched, &config)).unwrap()
    );
}

#[test]
fn temporal_breakdown_and_recommended_hours() {
    let messages = vec![
        message(1, midnight() + Duration::hours(10), "100 usd el viernes"),
        message(2, midnight() + Duration::hours(10), "vale 90 usd"),
        message(3, midnight() + Duration::hours(12), "mira https://example.com"),
        message(4, midnight() + Duration::hours(12), "hola"),
        message(5, midnight() + Duration::hours(12), "hoy no"),
        message(6, midnight() + Duration::hours(18), "80 eur"),
    ];
    let report = analyze_trends(&enrich(&messages), &TrendsConfig::default());
    let temporal = &report.temporal_patterns;

    assert_eq!(temporal.hourly_activity.len(), 24);
    assert_eq!(temporal.daily_activity.get("friday"), Some(&6));
    assert_eq!(temporal.daily_activity.get("monday"), Some(&0));
    assert_eq!(temporal.peak_hours, [12, 10, 18]);
    assert_eq!(temporal.recommended_engagement_hours, [10, 18]);

    let ten = temporal.hourly_breakdown[&10];
    assert_eq!((ten.financial, ten.temporal_reference, ten.url), (2, 1, 0));
    let noon = temporal.hourly_breakdown[&12];
    assert_eq!((noon.financial, noon.temporal_reference, noon.url), (0, 1, 1));

    assert_eq!(
        report.correlations.financial_temporal.most_active_weekday.as_deref(),
        Some("friday")
    );
}

#[test]
fn contact_heavy_messages_are_suspicious() {
    let messages = vec![
        message(
            1,
            midnight() + Duration::hours(9),
            "llamen al 55 1234 5678, al 55 2345 6789 o al 55 3456 7890",
        ),
        message(2, midnight() + Duration::hours(9), "escribe a ana@example.com"),
    ];
    let report = analyze_trends(&enrich(&messages), &TrendsConfig::default());

    let suspicious = &report.anomalies.suspicious_patterns;
    assert_eq!(suspicious.len(), 1);
    assert_eq!(suspicious[0].message_id, 1);
    assert_eq!(suspicious[0].phones, 3);
    assert_eq!(suspicious[0].emails, 0);

    let contact = &report.correlations.contact_technical;
    assert_eq!(contact.contact_messages, 2);
    assert_eq!(contact.with_technical_markers, 0);
    assert_eq!(contact.ratio, 0.0);
}

#[test]
fn social_markers_on_financial_messages() {
    let messages = vec![
        message(1, midnight(), "#oferta 200 usd"),
        message(2, midnight() + Duration::minutes(1), "300 usd"),
        message(3, midnight() + Duration::minutes(2), "#hola sin precio"),
    ];
    let report = analyze_trends(&enrich(&messages), &TrendsConfig::default());
    let social = &report.correlations.social_financial;
    assert_eq!(social.financial_messages, 2);
    assert_eq!(social.with_social_markers, 1);
    assert_eq!(social.ratio, 0.5);
}

#[test]
fn empty_input_gives_an_empty_report() {
    let report = analyze_trends(&[], &TrendsConfig::default());
    assert_eq!(report.total_messages, 0);
    assert!(report.price_analysis.is_empty());
    assert!(report.temporal_patterns.peak_hours.is_empty());
    assert_eq!(report.correlations.financial_temporal.most_active_weekday, None);
    assert_eq!(report.executive_summary.key_findings, ["0 messages analyzed"]);
}
