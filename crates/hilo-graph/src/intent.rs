//! Deterministic intent heuristics over normalized message text.
//!
//! Rules are checked in order and the first hit wins, so every message gets
//! exactly one label.

use std::sync::LazyLock;

use hilo_core::enums::Intent;
use regex::Regex;

static GREETING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\W*(hola|holi|buen(os)? d[ií]as?|buenas( tardes| noches)?|saludos|qu[eé] tal|hey|hello|hi)\b",
    )
    .expect("valid regex")
});

static PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)[$€£¥]\s?\d|\b\d+(?:[.,]\d+)*\s?(usd|eur|mxn|ars|cop|clp|pen|pesos|d[oó]lares|euros|soles)\b|\b(vendo|precio|oferta|descuento|promo(ci[oó]n)?|remate|rebaja)\b",
    )
    .expect("valid regex")
});

/// A rendered link label, or a raw URL that escaped normalization.
static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\S+ [^\[\]\n]+? de [^\[\]\n]+\]|https?://\S+").expect("valid regex")
});

static FACTUAL_CONNECTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(seg[uú]n|aqu[ií] (est[aá]|les dejo|va)|les comparto|comparto|m[aá]s info(rmaci[oó]n)?|info|fuente|dato|noticia|art[ií]culo|sab[ií]an que|resulta que|de acuerdo con)\b",
    )
    .expect("valid regex")
});

static IMPERATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(por ?favor|porfa|favor de|necesito|ocupo|m[aá]ndame|manda|env[ií]a(me)?|p[aá]same|dime|d[ée]jame|ay[uú]da(me)?|av[ií]same|revisa|confirma|compartan|env[ií]en|manden|escr[ií]beme|ll[aá]mame)\b",
    )
    .expect("valid regex")
});

/// Classify one normalized message.
#[must_use]
pub fn classify_intent(text: &str) -> Intent {
    if text.contains('?') {
        Intent::Question
    } else if GREETING.is_match(text) {
        Intent::Greeting
    } else if PRICE.is_match(text) {
        Intent::Offer
    } else if LINK.is_match(text) && FACTUAL_CONNECTOR.is_match(text) {
        Intent::Information
    } else if IMPERATIVE.is_match(text) {
        Intent::Request
    } else {
        Intent::Statement
    }
}
