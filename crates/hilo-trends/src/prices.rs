//! Price extraction from pattern matches and per-currency statistics.

use std::collections::BTreeMap;

use hilo_core::entities::{MatchPayload, MessageEnrichment, PatternMatchSet, PriceStats};
use hilo_core::enums::PriceTrend;
use hilo_scan::names;

use crate::round4;

/// One price seen in a message, already mapped to a currency code.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceObservation {
    pub currency: String,
    pub amount: f64,
}

/// Parse an amount written with `.` or `,` as decimal or thousands
/// separator.
///
/// When both separators appear the later one is the decimal point. A single
/// kind of separator followed by groups of exactly three digits is read as
/// thousands (`1.500`, `1,500,000`), otherwise as a decimal point (`2,5`).
#[must_use]
pub fn parse_amount(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let canonical = match (raw.rfind('.'), raw.rfind(',')) {
        (Some(dot), Some(comma)) => {
            let (decimal, thousands) = if dot > comma { ('.', ',') } else { (',', '.') };
            raw.replace(thousands, "").replace(decimal, ".")
        }
        (None, Some(_)) => single_separator(raw, ','),
        (Some(_), None) => single_separator(raw, '.'),
        (None, None) => raw.to_string(),
    };
    canonical.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn single_separator(raw: &str, sep: char) -> String {
    let parts: Vec<&str> = raw.split(sep).collect();
    let grouped = parts[0] != "0" && parts[1..].iter().all(|p| p.len() == 3);
    if parts.len() > 2 || grouped {
        parts.concat()
    } else {
        raw.replace(sep, ".")
    }
}

/// ISO code for a currency word, code or symbol. Unknown currencies keep
/// their uppercased spelling.
#[must_use]
pub fn currency_code(raw: &str) -> String {
    let code = match raw.trim().to_lowercase().as_str() {
        "usd" | "dólares" | "dolares" | "$" => "USD",
        "eur" | "euros" | "€" => "EUR",
        "mxn" | "pesos" => "MXN",
        "pen" | "soles" => "PEN",
        "gbp" | "libras" | "£" => "GBP",
        "¥" => "JPY",
        other => return other.to_uppercase(),
    };
    code.to_string()
}

/// Prices in one message.
///
/// Ranges count once, at their midpoint, and a symbol price with the symbol
/// and amount of a range bound is the range's own text and is skipped.
/// A symbol or range followed by a currency code (`$50 usd`) is one price in
/// that code; the code-only match over the same text is dropped.
#[must_use]
pub fn extract_prices(matches: &PatternMatchSet) -> Vec<PriceObservation> {
    let mut prices = Vec::new();
    let mut bounds: Vec<(&str, f64)> = Vec::new();
    // (amount text, code) already counted through a symbol or range match.
    let mut claimed: Vec<(&str, &str)> = Vec::new();

    for m in matches.get(names::PRICE_RANGE).unwrap_or_default() {
        let (Some(symbol), Some(high_text)) = (m.group(0), m.group(2)) else {
            continue;
        };
        let (Some(low), Some(high)) = (m.group(1).and_then(parse_amount), parse_amount(high_text))
        else {
            continue;
        };
        let code = trailing_code(m, 3);
        let currency = currency_code(code.unwrap_or(symbol));
        if let Some(code) = code {
            claimed.push((high_text, code));
        }
        bounds.extend([(symbol, low), (symbol, high)]);
        prices.push(PriceObservation {
            currency,
            amount: f64::midpoint(low, high),
        });
    }

    for m in matches.get(names::PRICE_SYMBOL).unwrap_or_default() {
        let (Some(symbol), Some(amount_text)) = (m.group(0), m.group(1)) else {
            continue;
        };
        let Some(amount) = parse_amount(amount_text) else {
            continue;
        };
        let is_bound = bounds
            .iter()
            .any(|(s, b)| *s == symbol && (b - amount).abs() < f64::EPSILON);
        if is_bound {
            continue;
        }
        let code = trailing_code(m, 2);
        if let Some(code) = code {
            claimed.push((amount_text, code));
        }
        prices.push(PriceObservation {
            currency: currency_code(code.unwrap_or(symbol)),
            amount,
        });
    }

    for m in matches.get(names::PRICE_CURRENCY).unwrap_or_default() {
        let (Some(amount_text), Some(code)) = (m.group(0), m.group(1)) else {
            continue;
        };
        if let Some(pos) = claimed
            .iter()
            .position(|(a, c)| *a == amount_text && c.eq_ignore_ascii_case(code))
        {
            claimed.swap_remove(pos);
            continue;
        }
        if let Some(amount) = parse_amount(amount_text) {
            prices.push(PriceObservation {
                currency: currency_code(code),
                amount,
            });
        }
    }
    prices
}

/// Non-empty currency code captured at `index`.
fn trailing_code(payload: &MatchPayload, index: usize) -> Option<&str> {
    payload.group(index).filter(|c| !c.is_empty())
}

/// Statistics per currency over records already in chronological order.
#[must_use]
pub fn price_analysis(
    records: &[&MessageEnrichment],
    stable_band: f64,
) -> BTreeMap<String, PriceStats> {
    let mut series: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for record in records {
        for price in extract_prices(&record.matches) {
            series.entry(price.currency).or_default().push(price.amount);
        }
    }
    series
        .into_iter()
        .filter_map(|(currency, values)| Some((currency, price_stats(&values, stable_band)?)))
        .collect()
}

/// Summary statistics of a chronological series; `None` when empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn price_stats(values: &[f64], stable_band: f64) -> Option<PriceStats> {
    let count = values.len();
    if count == 0 {
        return None;
    }
    let mean = mean(values);
    let stdev = if count > 1 {
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        var.sqrt()
    } else {
        0.0
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let median = if count % 2 == 0 {
        f64::midpoint(sorted[count / 2 - 1], sorted[count / 2])
    } else {
        sorted[count / 2]
    };

    Some(PriceStats {
        count,
        min: sorted[0],
        max: sorted[count - 1],
        mean: round4(mean),
        median: round4(median),
        stdev: round4(stdev),
        trend: trend(values, stable_band),
    })
}

/// Compare the mean of the second half of the series with the first.
#[must_use]
pub fn trend(values: &[f64], stable_band: f64) -> PriceTrend {
    if values.len() < 2 {
        return PriceTrend::Stable;
    }
    let (first, second) = values.split_at(values.len() / 2);
    let before = mean(first);
    if before.abs() < f64::EPSILON {
        return PriceTrend::Stable;
    }
    let change = (mean(second) - before) / before.abs();
    if change > stable_band {
        PriceTrend::Rising
    } else if change < -stable_band {
        PriceTrend::Falling
    } else {
        PriceTrend::Stable
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
