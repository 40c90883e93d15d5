use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

static URL_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://").expect("valid regex"));

/// Emoji of the generic descriptor.
pub const GENERIC_EMOJI: &str = "🔗";
/// Content type of the generic descriptor.
pub const GENERIC_CONTENT_TYPE: &str = "generic";

/// A field shown in the rendered label, in order.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DisplayField {
    pub field: String,
    pub label: String,
}

/// Human-readable classification of a URL.
///
/// Renders as `<emoji> <label> de <site_name>[ - <Field>: <value>]...`, e.g.
/// `🎥 Video de YouTube - ID: dQw4w9WgXcQ`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LinkDescriptor {
    pub site_name: String,
    pub emoji: String,
    pub content_type: String,
    /// Spanish label of the content type (e.g. `Video`, `Perfil`).
    pub label: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    /// Fields included in the rendered label, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub display: Vec<DisplayField>,
}

impl LinkDescriptor {
    /// Descriptor for URLs no extractor claims.
    #[must_use]
    pub fn generic(site_name: &str) -> Self {
        Self {
            site_name: site_name.to_string(),
            emoji: GENERIC_EMOJI.to_string(),
            content_type: GENERIC_CONTENT_TYPE.to_string(),
            label: "Enlace".to_string(),
            fields: BTreeMap::new(),
            display: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_generic(&self) -> bool {
        self.content_type == GENERIC_CONTENT_TYPE
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Render the label without surrounding brackets.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!("{} {} de {}", self.emoji, self.label, self.site_name);
        for shown in &self.display {
            if let Some(value) = self.fields.get(&shown.field).filter(|v| !v.is_empty()) {
                let _ = write!(out, " - {}: {}", shown.label, sanitize_value(value));
            }
        }
        out
    }

    /// Render the bracketed form substituted into message text.
    #[must_use]
    pub fn render_bracketed(&self) -> String {
        format!("[{}]", self.render())
    }
}

/// Strip URL schemes and square brackets from a field value so a rendered
/// label never contains anything the normalizer would rewrite again.
fn sanitize_value(value: &str) -> String {
    URL_SCHEME
        .replace_all(value, "")
        .chars()
        .map(|c| match c {
            '[' => '(',
            ']' => ')',
            c if c.is_whitespace() => ' ',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}
