//! Hourly and weekday activity histograms.

use std::collections::BTreeMap;

use chrono::{Datelike, Timelike, Weekday};
use hilo_core::entities::{HourBreakdown, MessageEnrichment, PatternMatchSet, TemporalPatterns};
use hilo_scan::names;

/// Weekdays in report order.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[must_use]
pub const fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Zero counts for every weekday.
pub(crate) fn empty_weekdays() -> BTreeMap<String, usize> {
    WEEKDAYS
        .iter()
        .map(|&d| (weekday_name(d).to_string(), 0))
        .collect()
}

pub(crate) fn has_any(matches: &PatternMatchSet, group: &[&str]) -> bool {
    group.iter().any(|name| matches.has(name))
}

pub(crate) fn count_all(matches: &PatternMatchSet, group: &[&str]) -> usize {
    group.iter().map(|name| matches.count(name)).sum()
}

/// Histograms and ranked hours. Hours are UTC.
#[must_use]
pub fn temporal_patterns(records: &[&MessageEnrichment], top_hours: usize) -> TemporalPatterns {
    let mut hourly_activity: BTreeMap<u32, usize> = (0..24).map(|h| (h, 0)).collect();
    let mut hourly_breakdown: BTreeMap<u32, HourBreakdown> =
        (0..24).map(|h| (h, HourBreakdown::default())).collect();
    let mut daily_activity = empty_weekdays();

    for record in records {
        let hour = record.timestamp.hour();
        *hourly_activity.entry(hour).or_insert(0) += 1;
        *daily_activity
            .entry(weekday_name(record.timestamp.weekday()).to_string())
            .or_insert(0) += 1;

        let slot = hourly_breakdown.entry(hour).or_default();
        if has_any(&record.matches, names::FINANCIAL) {
            slot.financial += 1;
        }
        if has_any(&record.matches, names::TEMPORAL) {
            slot.temporal_reference += 1;
        }
        if has_any(&record.matches, names::LINKS) {
            slot.url += 1;
        }
    }

    let peak_hours = top(hourly_activity.iter().map(|(&h, &c)| (h, c)), top_hours);
    let recommended_engagement_hours = top(
        hourly_breakdown.iter().map(|(&h, b)| (h, b.financial)),
        top_hours,
    );

    TemporalPatterns {
        hourly_activity,
        daily_activity,
        hourly_breakdown,
        peak_hours,
        recommended_engagement_hours,
    }
}

/// Hours with a non-zero count, busiest first, earlier hour on ties.
fn top(counts: impl Iterator<Item = (u32, usize)>, n: usize) -> Vec<u32> {
    let mut ranked: Vec<(u32, usize)> = counts.filter(|&(_, c)| c > 0).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.into_iter().take(n).map(|(h, _)| h).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn top_hours_break_ties_by_hour() {
        let counts = [(9, 4), (3, 4), (14, 7), (20, 0), (1, 1)];
        assert_eq!(top(counts.into_iter(), 3), [14, 3, 9]);
        assert_eq!(top(counts.into_iter(), 10), [14, 3, 9, 1]);
        assert!(top([(5, 0)].into_iter(), 3).is_empty());
    }

    #[test]
    fn every_weekday_has_a_slot() {
        let days = empty_weekdays();
        assert_eq!(days.len(), 7);
        assert_eq!(days.get("monday"), Some(&0));
        assert_eq!(days.get("sunday"), Some(&0));
    }
}
