//! Per-pattern context summaries: counts, occurrences and example windows.

use hilo_core::entities::PatternContext;
use hilo_core::enums::PatternCategory;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Context summaries keyed by pattern name, in catalog order. Patterns
/// without matches are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextSummary {
    entries: Vec<(String, PatternContext)>,
}

impl ContextSummary {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PatternContext> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PatternContext)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), c))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ContextSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, context) in &self.entries {
            map.serialize_entry(name, context)?;
        }
        map.end()
    }
}

/// Accumulates matches for a fixed list of patterns, possibly across many texts.
#[derive(Debug)]
pub(crate) struct ContextAccumulator {
    window: usize,
    max_examples: usize,
    slots: Vec<(String, PatternContext)>,
}

impl ContextAccumulator {
    pub(crate) fn new<'a>(
        patterns: impl IntoIterator<Item = (&'a str, PatternCategory)>,
        window: usize,
        max_examples: usize,
    ) -> Self {
        let slots = patterns
            .into_iter()
            .map(|(name, category)| {
                (
                    name.to_string(),
                    PatternContext {
                        total_count: 0,
                        occurrences: std::collections::BTreeMap::new(),
                        example_contexts: Vec::new(),
                        category,
                    },
                )
            })
            .collect();
        Self {
            window,
            max_examples,
            slots,
        }
    }

    /// Record one match of slot `index` spanning `start..end` bytes of `text`.
    pub(crate) fn record(&mut self, index: usize, text: &str, start: usize, end: usize) {
        let (window, max_examples) = (self.window, self.max_examples);
        let Some((_, slot)) = self.slots.get_mut(index) else {
            return;
        };
        slot.total_count += 1;
        *slot
            .occurrences
            .entry(text[start..end].to_string())
            .or_insert(0) += 1;
        if slot.example_contexts.len() < max_examples {
            slot.example_contexts
                .push(context_window(text, start, end, window));
        }
    }

    pub(crate) fn finish(self) -> ContextSummary {
        ContextSummary {
            entries: self
                .slots
                .into_iter()
                .filter(|(_, c)| c.total_count > 0)
                .collect(),
        }
    }
}

/// Up to `window` characters on each side of `start..end`, on one line.
/// Truncated sides are marked with `...`.
#[must_use]
pub fn context_window(text: &str, start: usize, end: usize, window: usize) -> String {
    let from = text[..start]
        .char_indices()
        .rev()
        .take(window)
        .last()
        .map_or(start, |(i, _)| i);
    let to = text[end..]
        .char_indices()
        .nth(window)
        .map_or(text.len(), |(i, _)| end + i);

    let snippet: String = text[from..to]
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();
    format!(
        "{}{}{}",
        if from > 0 { "..." } else { "" },
        snippet.trim(),
        if to < text.len() { "..." } else { "" }
    )
}
