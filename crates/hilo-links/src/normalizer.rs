//! URL substitution plus markdown stripping for message text.

use std::sync::{Arc, LazyLock};

use hilo_core::entities::{NormalizedMessage, RawMessage};
use regex::Regex;

use crate::error::RegistryError;
use crate::file_type;
use crate::markdown::strip_markdown;
use crate::registry::LinkRegistry;

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://[^\s]+").expect("valid regex"));

/// Characters never kept at the end of a URL found in prose.
const TRAILING: &[char] = &['.', ',', ';', ':', '!', '?', '\'', '"', '`', '*', '_', '~', '>'];

/// Upper bound on rewrite passes; real text converges in two.
const MAX_PASSES: usize = 8;

/// Normalized text together with the labels substituted for its URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    pub links: Vec<String>,
}

/// Rewrites message text: every URL becomes a bracketed label, markdown is
/// stripped and the result trimmed.
///
/// The output is a fixed point: normalizing it again returns it unchanged.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    registry: Arc<LinkRegistry>,
}

impl TextNormalizer {
    #[must_use]
    pub const fn new(registry: Arc<LinkRegistry>) -> Self {
        Self { registry }
    }

    /// Normalizer over the builtin registry.
    pub fn builtin() -> Result<Self, RegistryError> {
        Ok(Self::new(Arc::new(LinkRegistry::builtin()?)))
    }

    #[must_use]
    pub fn registry(&self) -> &LinkRegistry {
        &self.registry
    }

    /// Bracketed label for one URL: the file label when the extension is
    /// recognized, otherwise the link descriptor.
    #[must_use]
    pub fn label_for(&self, url: &str) -> String {
        let file = file_type::detect(url);
        if file.is_unknown() {
            self.registry.classify(url).render_bracketed()
        } else {
            file.render_bracketed()
        }
    }

    #[must_use]
    pub fn normalize(&self, text: &str) -> String {
        self.normalize_with_links(text).text
    }

    #[must_use]
    pub fn normalize_with_links(&self, text: &str) -> Normalized {
        let mut links = Vec::new();
        let mut current = text.to_string();
        for _ in 0..MAX_PASSES {
            let replaced = self.replace_urls(&current, &mut links);
            let next = strip_markdown(&replaced).trim().to_string();
            if next == current {
                break;
            }
            current = next;
        }
        Normalized {
            text: current,
            links,
        }
    }

    /// Normalize a message's text, keeping every other field.
    #[must_use]
    pub fn normalize_message(&self, message: RawMessage) -> NormalizedMessage {
        let original_length = message.text.chars().count();
        let Normalized { text, links } = self.normalize_with_links(&message.text);
        NormalizedMessage {
            message: RawMessage { text, ..message },
            links,
            original_length,
        }
    }

    fn replace_urls(&self, text: &str, links: &mut Vec<String>) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for m in URL.find_iter(text) {
            let url = trim_url(m.as_str());
            if url.len() <= "https://".len() {
                continue;
            }
            let label = self.label_for(url);
            out.push_str(&text[last..m.start()]);
            out.push_str(&label);
            links.push(label);
            last = m.start() + url.len();
        }
        out.push_str(&text[last..]);
        out
    }
}

/// Cut a raw `https?://\S+` match down to the URL a reader would see: a
/// markdown `](` ends it, trailing punctuation and unbalanced closing
/// brackets are left outside.
fn trim_url(candidate: &str) -> &str {
    let mut url = candidate
        .find("](")
        .map_or(candidate, |i| &candidate[..i]);
    loop {
        let before = url.len();
        url = url.trim_end_matches(TRAILING);
        for (open, close) in [('(', ')'), ('[', ']')] {
            if url.ends_with(close)
                && url.matches(open).count() < url.matches(close).count()
            {
                url = &url[..url.len() - 1];
            }
        }
        if url.len() == before {
            return url;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn normalizer() -> TextNormalizer {
        TextNormalizer::builtin().expect("builtin registry compiles")
    }

    #[test]
    fn trims_trailing_punctuation_and_unbalanced_brackets() {
        assert_eq!(trim_url("https://a.com/x."), "https://a.com/x");
        assert_eq!(trim_url("https://a.com/x),"), "https://a.com/x");
        assert_eq!(trim_url("https://en.wikipedia.org/wiki/Rust_(lenguaje)"), "https://en.wikipedia.org/wiki/Rust_(lenguaje)");
        assert_eq!(trim_url("https://a.com**"), "https://a.com");
        assert_eq!(trim_url("https://a.com](https://b.com)"), "https://a.com");
    }

    #[test]
    fn replaces_urls_and_keeps_surrounding_text() {
        let out = normalizer()
            .normalize_with_links("mira esto https://www.youtube.com/watch?v=dQw4w9WgXcQ, ¿qué tal?");
        assert_eq!(
            out.text,
            "mira esto [🎥 Video de YouTube - ID: dQw4w9WgXcQ], ¿qué tal?"
        );
        assert_eq!(out.links, ["[🎥 Video de YouTube - ID: dQw4w9WgXcQ]"]);
    }

    #[test]
    fn file_labels_take_precedence() {
        assert_eq!(
            normalizer().normalize("el informe: https://example.com/docs/informe.pdf"),
            "el informe: [📄 Documento PDF: informe.pdf]"
        );
    }

    #[test]
    fn markdown_links_keep_their_text() {
        assert_eq!(
            normalizer().normalize("**Ojo**: [mi blog](https://example.com/post)"),
            "Ojo: mi blog [🔗 Enlace de Example]"
        );
    }

    #[test]
    fn bare_scheme_is_left_alone() {
        assert_eq!(normalizer().normalize("escribe https:// y listo"), "escribe https:// y listo");
    }

    #[test]
    fn normalize_message_keeps_metadata() {
        let raw = RawMessage {
            id: 7,
            chat_id: 1,
            sender_id: 2,
            sender_display_name: "Ana".into(),
            sender_handle: None,
            text: "  *hola* https://t.me/canal  ".into(),
            timestamp: chrono::DateTime::<chrono::Utc>::UNIX_EPOCH,
            reply_to_id: Some(3),
            reactions: std::collections::BTreeMap::new(),
            mentions: Vec::new(),
            media: None,
        };
        let normalized = normalizer().normalize_message(raw);
        assert_eq!(normalized.text(), "hola [📢 Canal de Telegram - Usuario: canal]");
        assert_eq!(normalized.original_length, 29);
        assert_eq!(normalized.message.reply_to_id, Some(3));
        assert_eq!(normalized.links.len(), 1);
    }
}
