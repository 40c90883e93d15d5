//! The builtin pattern catalog, in scan order.
//!
//! Payload shape follows the capture groups of each regex: no group yields
//! the whole match, one group yields that group, several yield all of them.
//! Patterns that must stay case-sensitive open with `(?-i)`.

use hilo_core::enums::PatternCategory;

use crate::names;

/// A catalog entry before compilation.
#[derive(Debug, Clone, Copy)]
pub struct PatternSpec {
    pub name: &'static str,
    pub category: PatternCategory,
    pub regex: &'static str,
}

const fn spec(name: &'static str, category: PatternCategory, regex: &'static str) -> PatternSpec {
    PatternSpec {
        name,
        category,
        regex,
    }
}

macro_rules! currency_codes {
    () => {
        "usd|eur|mxn|ars|cop|clp|pen|gbp|btc|eth|dólares|dolares|euros|pesos|soles|libras"
    };
}

const CURRENCY_CODES: &str = currency_codes!();

pub const BUILTIN: &[PatternSpec] = &[
    // contact
    spec(
        names::EMAIL,
        PatternCategory::Contact,
        r"[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}",
    ),
    spec(
        names::PHONE_INTERNATIONAL,
        PatternCategory::Contact,
        r"\+\d{1,3}[ .-]?\(?\d{1,4}\)?(?:[ .-]?\d{2,4}){2,4}",
    ),
    spec(
        names::PHONE,
        PatternCategory::Contact,
        r"(?:\(\d{2,3}\)|\b\d{2,3})[ .-]?\d{3,4}[ .-]\d{4}\b",
    ),
    // finance
    spec(
        names::PRICE_CURRENCY,
        PatternCategory::Finance,
        concat!(r"\b(\d+(?:[.,]\d+)*)\s?(", currency_codes!(), r")\b"),
    ),
    // A trailing code ("$50 usd") is captured as the last group, empty when
    // absent.
    spec(
        names::PRICE_SYMBOL,
        PatternCategory::Finance,
        concat!(
            r"([$€£¥])\s?(\d+(?:[.,]\d+)*)(?:\s?(",
            currency_codes!(),
            r")\b)?"
        ),
    ),
    spec(
        names::PRICE_RANGE,
        PatternCategory::Finance,
        concat!(
            r"([$€£¥])\s?(\d+(?:[.,]\d+)*)\s?(?:-|–|a|hasta)\s?[$€£¥]?\s?(\d+(?:[.,]\d+)*)(?:\s?(",
            currency_codes!(),
            r")\b)?"
        ),
    ),
    spec(
        names::CREDIT_CARD,
        PatternCategory::Finance,
        r"\b(?:\d{4}[ -]?){3}\d{4}\b",
    ),
    // network
    spec(names::URL, PatternCategory::Network, r"https?://[^\s\[\]]+"),
    spec(
        names::LINK_LABEL,
        PatternCategory::Network,
        r"\[\S+ [^\[\]\n]+? de [^\[\]\n]+\]",
    ),
    spec(
        names::SOCIAL_URL,
        PatternCategory::Network,
        r"\b(?:www\.)?(instagram\.com|facebook\.com|fb\.com|twitter\.com|x\.com|tiktok\.com|t\.me|wa\.me|youtube\.com|youtu\.be|linkedin\.com)/([\w.@+-]+)",
    ),
    // content
    spec(
        names::HASHTAG,
        PatternCategory::Content,
        r"(?:^|[^\w&#])(#[\p{L}\p{N}_]*\p{L}[\p{L}\p{N}_]*)",
    ),
    spec(
        names::MENTION,
        PatternCategory::Content,
        r"(?:^|[^\w.@])(@[A-Za-z0-9_]{3,32})\b",
    ),
    spec(
        names::PERCENTAGE,
        PatternCategory::Content,
        r"\b\d+(?:[.,]\d+)?\s?%",
    ),
    // geo
    spec(
        names::COORDINATES,
        PatternCategory::Geo,
        r"(-?\d{1,2}\.\d{3,}),\s?(-?\d{1,3}\.\d{3,})",
    ),
    spec(
        names::IPV4,
        PatternCategory::Geo,
        r"\b(?:(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\.){3}(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\b",
    ),
    spec(
        names::VEHICLE_PLATE,
        PatternCategory::Geo,
        r"(?-i)\b[A-Z]{3}-?\d{3,4}(?:-?[A-Z])?\b",
    ),
    // codes
    spec(
        names::ISBN,
        PatternCategory::Codes,
        r"\bISBN(?:-1[03])?:?\s?((?:97[89][ -]?)?\d{1,5}[ -]?\d{1,7}[ -]?\d{1,7}[ -]?[\dX])\b",
    ),
    spec(
        names::BITCOIN_ADDRESS,
        PatternCategory::Codes,
        r"(?-i)\b(?:bc1[ac-hj-np-z02-9]{25,59}|[13][a-km-zA-HJ-NP-Z1-9]{25,34})\b",
    ),
    spec(
        names::ETHEREUM_ADDRESS,
        PatternCategory::Codes,
        r"\b0x[a-fA-F0-9]{40}\b",
    ),
    // time
    spec(
        names::DATE_ISO,
        PatternCategory::Time,
        r"\b(\d{4})-(\d{2})-(\d{2})\b",
    ),
    spec(
        names::DATE_NUMERIC,
        PatternCategory::Time,
        r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{2,4})\b",
    ),
    spec(
        names::DATE_SPANISH,
        PatternCategory::Time,
        r"\b(\d{1,2})\s+de\s+(enero|febrero|marzo|abril|mayo|junio|julio|agosto|septiembre|setiembre|octubre|noviembre|diciembre)(?:\s+del?\s+(\d{4}))?\b",
    ),
    spec(
        names::WEEKDAY,
        PatternCategory::Time,
        r"\b(lunes|martes|miércoles|miercoles|jueves|viernes|sábado|sabado|domingo)\b",
    ),
    spec(
        names::RELATIVE_TIME,
        PatternCategory::Time,
        r"\b(pasado mañana|pasado manana|este fin de semana|la próxima semana|la proxima semana|el próximo mes|el proximo mes|esta noche|esta semana|hoy|mañana|manana|ayer|anoche)\b",
    ),
    spec(
        names::CLOCK_TIME,
        PatternCategory::Time,
        r"\b([01]?\d|2[0-3]):([0-5]\d)(?:\s?(am|pm|hrs|h)\b)?",
    ),
    spec(
        names::MEASURE,
        PatternCategory::Time,
        r"\b(\d+(?:[.,]\d+)?)\s?(kg|gr|g|mg|km|cm|mm|m²|m2|m|ml|l|lb|oz|gb|mb|tb)\b",
    ),
];

/// Currency codes and words recognized after an amount, lowercase.
#[must_use]
pub fn currency_codes() -> impl Iterator<Item = &'static str> {
    CURRENCY_CODES.split('|')
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_are_unique() {
        let mut seen = HashSet::new();
        for spec in BUILTIN {
            assert!(seen.insert(spec.name), "duplicate pattern {}", spec.name);
        }
    }

    #[test]
    fn every_group_name_is_in_the_catalog() {
        let catalog: HashSet<_> = BUILTIN.iter().map(|s| s.name).collect();
        for group in [
            names::FINANCIAL,
            names::TEMPORAL,
            names::LINKS,
            names::PHONES,
            names::SOCIAL,
            names::TECHNICAL,
            names::CONTACT,
        ] {
            for name in group {
                assert!(catalog.contains(name), "{name}");
            }
        }
    }

    #[test]
    fn currency_list_matches_the_price_regexes() {
        for name in names::FINANCIAL {
            let price = BUILTIN.iter().find(|s| s.name == *name).unwrap();
            for code in currency_codes() {
                assert!(price.regex.contains(code), "{name}: {code}");
            }
        }
    }
}
