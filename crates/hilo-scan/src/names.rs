//! Builtin pattern names and the groups downstream aggregations read.

pub const EMAIL: &str = "email";
pub const PHONE_INTERNATIONAL: &str = "phone_international";
pub const PHONE: &str = "phone";

pub const PRICE_CURRENCY: &str = "price_currency";
pub const PRICE_SYMBOL: &str = "price_symbol";
pub const PRICE_RANGE: &str = "price_range";
pub const CREDIT_CARD: &str = "credit_card";

pub const URL: &str = "url";
pub const LINK_LABEL: &str = "link_label";
pub const SOCIAL_URL: &str = "social_url";

pub const HASHTAG: &str = "hashtag";
pub const MENTION: &str = "mention";
pub const PERCENTAGE: &str = "percentage";

pub const COORDINATES: &str = "coordinates";
pub const IPV4: &str = "ipv4";
pub const VEHICLE_PLATE: &str = "vehicle_plate";

pub const ISBN: &str = "isbn";
pub const BITCOIN_ADDRESS: &str = "bitcoin_address";
pub const ETHEREUM_ADDRESS: &str = "ethereum_address";

pub const DATE_ISO: &str = "date_iso";
pub const DATE_NUMERIC: &str = "date_numeric";
pub const DATE_SPANISH: &str = "date_spanish";
pub const WEEKDAY: &str = "weekday";
pub const RELATIVE_TIME: &str = "relative_time";
pub const CLOCK_TIME: &str = "clock_time";
pub const MEASURE: &str = "measure";

/// Patterns whose matches carry a price.
pub const FINANCIAL: &[&str] = &[PRICE_CURRENCY, PRICE_SYMBOL, PRICE_RANGE];

/// Patterns that refer to a point in time.
pub const TEMPORAL: &[&str] = &[
    DATE_ISO,
    DATE_NUMERIC,
    DATE_SPANISH,
    WEEKDAY,
    RELATIVE_TIME,
    CLOCK_TIME,
];

/// Patterns that indicate a link, raw or already replaced by a label.
pub const LINKS: &[&str] = &[URL, LINK_LABEL, SOCIAL_URL];

pub const PHONES: &[&str] = &[PHONE_INTERNATIONAL, PHONE];

/// Social markers used by the social/financial correlation.
pub const SOCIAL: &[&str] = &[HASHTAG, MENTION];

/// Technical markers used by the contact/technical correlation.
pub const TECHNICAL: &[&str] = &[COORDINATES, IPV4];

pub const CONTACT: &[&str] = &[EMAIL, PHONE_INTERNATIONAL, PHONE];
