//! Co-occurrence of pattern groups across messages.

use chrono::Datelike;
use hilo_core::entities::{
    ContactTechnicalCorrelation, Correlations, FinancialTemporalCorrelation, MessageEnrichment,
    SocialFinancialCorrelation,
};
use hilo_scan::names;

use crate::round4;
use crate::temporal::{WEEKDAYS, empty_weekdays, has_any, weekday_name};

#[must_use]
pub fn correlations(records: &[&MessageEnrichment]) -> Correlations {
    let mut financial_by_weekday = empty_weekdays();
    let mut financial = 0usize;
    let mut financial_social = 0usize;
    let mut contact = 0usize;
    let mut contact_technical = 0usize;

    for record in records {
        let matches = &record.matches;
        if has_any(matches, names::FINANCIAL) {
            financial += 1;
            *financial_by_weekday
                .entry(weekday_name(record.timestamp.weekday()).to_string())
                .or_insert(0) += 1;
            if has_any(matches, names::SOCIAL) {
                financial_social += 1;
            }
        }
        if has_any(matches, names::CONTACT) {
            contact += 1;
            if has_any(matches, names::TECHNICAL) {
                contact_technical += 1;
            }
        }
    }

    // Earliest weekday wins ties.
    let mut most_active_weekday = None;
    let mut best = 0usize;
    for day in WEEKDAYS {
        let name = weekday_name(day);
        let count = financial_by_weekday.get(name).copied().unwrap_or(0);
        if count > best {
            best = count;
            most_active_weekday = Some(name.to_string());
        }
    }

    Correlations {
        financial_temporal: FinancialTemporalCorrelation {
            most_active_weekday,
            financial_by_weekday,
        },
        social_financial: SocialFinancialCorrelation {
            financial_messages: financial,
            with_social_markers: financial_social,
            ratio: ratio(financial_social, financial),
        },
        contact_technical: ContactTechnicalCorrelation {
            contact_messages: contact,
            with_technical_markers: contact_technical,
            ratio: ratio(contact_technical, contact),
        },
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round4(part as f64 / whole as f64)
    }
}
