//! Trend engine thresholds.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_stable_band() -> f64 {
    0.10
}

const fn default_volatility_ratio() -> f64 {
    0.5
}

const fn default_unusual_hours() -> (u32, u32) {
    (2, 5)
}

const fn default_unusual_min_messages() -> usize {
    10
}

const fn default_suspicious_contacts() -> usize {
    2
}

const fn default_top_hours() -> usize {
    3
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrendsConfig {
    /// Relative change between half means still considered `stable`.
    #[serde(default = "default_stable_band")]
    pub stable_band: f64,

    /// A currency is volatile when `stdev > volatility_ratio * mean`.
    #[serde(default = "default_volatility_ratio")]
    pub volatility_ratio: f64,

    /// Inclusive hour range watched for unusual activity.
    #[serde(default = "default_unusual_hours")]
    pub unusual_hours: (u32, u32),

    /// Hours in the watched range are flagged above this many messages.
    #[serde(default = "default_unusual_min_messages")]
    pub unusual_min_messages: usize,

    /// A message is suspicious above this many phones or emails.
    #[serde(default = "default_suspicious_contacts")]
    pub suspicious_contacts: usize,

    /// Length of the peak and recommended hour lists.
    #[serde(default = "default_top_hours")]
    pub top_hours: usize,
}

impl Default for TrendsConfig {
    fn default() -> Self {
        Self {
            stable_band: default_stable_band(),
            volatility_ratio: default_volatility_ratio(),
            unusual_hours: default_unusual_hours(),
            unusual_min_messages: default_unusual_min_messages(),
            suspicious_contacts: default_suspicious_contacts(),
            top_hours: default_top_hours(),
        }
    }
}

impl TrendsConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let (start, end) = self.unusual_hours;
        if start > end || end > 23 {
            return Err(ConfigError::invalid(
                "trends.unusual_hours",
                format!("[{start}, {end}] is not an hour range within 0..=23"),
            ));
        }
        if self.stable_band < 0.0 {
            return Err(ConfigError::invalid(
                "trends.stable_band",
                "must not be negative",
            ));
        }
        Ok(())
    }
}
