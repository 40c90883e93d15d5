//! On-disk shape of extractor records (`data/sites/<name>.toml`) and of the
//! registry order file (`data/registry.toml`).

use std::collections::BTreeMap;

use hilo_core::entities::DisplayField;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RegistryOrder {
    pub order: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SiteRecord {
    pub site_name: String,
    /// Emoji of the fallback descriptor when a claimed host matches no pattern.
    pub emoji: String,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub suffixes: Vec<String>,
    #[serde(default)]
    pub reserved_slugs: Vec<String>,
    #[serde(default)]
    pub display: Vec<DisplayField>,
    #[serde(default)]
    pub content: Vec<ContentRecord>,
    #[serde(default, rename = "pattern")]
    pub patterns: Vec<PatternRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ContentRecord {
    pub content_type: String,
    pub emoji: String,
    pub label: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PatternRecord {
    pub content_type: String,
    /// Regex over the URL path; named groups become fields.
    pub path: String,
    /// Regex the lowercase host must match.
    #[serde(default)]
    pub host: Option<String>,
    /// Regex over the URL fragment; the pattern is rejected when the URL has
    /// no fragment. Named groups become fields.
    #[serde(default)]
    pub fragment: Option<String>,
    /// Query parameter -> field.
    #[serde(default)]
    pub query: BTreeMap<String, String>,
    /// Query parameters that must be present and non-empty.
    #[serde(default)]
    pub requires: Vec<String>,
    /// Field whose value must not be a reserved slug.
    #[serde(default)]
    pub guard: Option<String>,
    /// Constant fields.
    #[serde(default)]
    pub set: BTreeMap<String, String>,
    #[serde(default)]
    pub post: Option<PostProcessor>,
}

/// Named post-match step for the few rules a regex cannot express.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub(crate) enum PostProcessor {
    /// Replace the content type according to the value of a query parameter.
    QueryVariant {
        param: String,
        variants: BTreeMap<String, String>,
    },
    /// Prefix the content type with the first host label when it is listed.
    SubdomainPrefix { subdomains: Vec<String> },
    /// Store the host's publication label in `field`: the first label under a
    /// claimed suffix, the registrable label on any other host. Reject the
    /// match when the label is excluded.
    HostLabel {
        field: String,
        #[serde(default)]
        exclude: Vec<String>,
    },
}
