//! Pattern registration and scanning.

use std::collections::HashSet;

use hilo_config::PatternsConfig;
use hilo_core::entities::{MatchPayload, MessageEnrichment, NormalizedMessage, PatternMatchSet};
use hilo_core::enums::PatternCategory;
use rayon::prelude::*;
use regex::{Captures, Regex, RegexBuilder};

use crate::catalog::BUILTIN;
use crate::context::{ContextAccumulator, ContextSummary};
use crate::error::ScanError;

/// Scanner behavior, usually taken from [`PatternsConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    pub case_insensitive: bool,
    /// Emit every pattern, matched or not.
    pub dense: bool,
    pub context_chars: usize,
    pub examples_per_name: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from(&PatternsConfig::default())
    }
}

impl From<&PatternsConfig> for ScanOptions {
    fn from(config: &PatternsConfig) -> Self {
        Self {
            case_insensitive: config.case_insensitive,
            dense: config.dense,
            context_chars: config.pattern_context_window_chars,
            examples_per_name: config.pattern_examples_per_name,
        }
    }
}

#[derive(Debug)]
struct CompiledPattern {
    name: String,
    category: PatternCategory,
    regex: Regex,
    groups: usize,
}

impl CompiledPattern {
    fn payload(&self, caps: &Captures<'_>) -> MatchPayload {
        let group = |i: usize| caps.get(i).map_or_else(String::new, |m| m.as_str().to_string());
        match self.groups {
            0 => MatchPayload::Text(group(0)),
            1 => MatchPayload::Text(group(1)),
            n => MatchPayload::Groups((1..=n).map(group).collect()),
        }
    }
}

/// Collects patterns; every regex is compiled when it is registered.
#[derive(Debug)]
pub struct ScannerBuilder {
    options: ScanOptions,
    patterns: Vec<CompiledPattern>,
    disabled: HashSet<String>,
}

impl ScannerBuilder {
    #[must_use]
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            patterns: Vec::new(),
            disabled: HashSet::new(),
        }
    }

    /// Register the builtin catalog, in catalog order.
    pub fn with_builtin(mut self) -> Result<Self, ScanError> {
        for spec in BUILTIN {
            self.register(spec.name, spec.category, spec.regex)?;
        }
        Ok(self)
    }

    /// Append a pattern. Invalid regexes and duplicate names are rejected here.
    pub fn register(
        &mut self,
        name: &str,
        category: PatternCategory,
        regex: &str,
    ) -> Result<&mut Self, ScanError> {
        if self.patterns.iter().any(|p| p.name == name) {
            return Err(ScanError::DuplicatePattern {
                name: name.to_string(),
            });
        }
        let compiled = RegexBuilder::new(regex)
            .case_insensitive(self.options.case_insensitive)
            .build()
            .map_err(|source| ScanError::InvalidPattern {
                name: name.to_string(),
                source,
            })?;
        let groups = compiled.captures_len() - 1;
        self.patterns.push(CompiledPattern {
            name: name.to_string(),
            category,
            regex: compiled,
            groups,
        });
        Ok(self)
    }

    /// Skip a pattern by name. Unknown names are ignored.
    pub fn disable(&mut self, name: &str) -> &mut Self {
        self.disabled.insert(name.to_string());
        self
    }

    #[must_use]
    pub fn build(self) -> PatternScanner {
        let Self {
            options,
            patterns,
            disabled,
        } = self;
        let patterns: Vec<_> = patterns
            .into_iter()
            .filter(|p| !disabled.contains(&p.name))
            .collect();
        tracing::debug!(patterns = patterns.len(), "pattern scanner built");
        PatternScanner { options, patterns }
    }
}

/// Immutable pattern catalog. Share by reference across threads.
#[derive(Debug)]
pub struct PatternScanner {
    options: ScanOptions,
    patterns: Vec<CompiledPattern>,
}

impl PatternScanner {
    pub fn builtin(options: ScanOptions) -> Result<Self, ScanError> {
        Ok(ScannerBuilder::new(options).with_builtin()?.build())
    }

    /// Builtin catalog with the configured options and disabled patterns.
    pub fn from_config(config: &PatternsConfig) -> Result<Self, ScanError> {
        let mut builder = ScannerBuilder::new(ScanOptions::from(config)).with_builtin()?;
        for name in &config.disabled {
            builder.disable(name);
        }
        Ok(builder.build())
    }

    #[must_use]
    pub const fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Enabled pattern names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.name.as_str())
    }

    #[must_use]
    pub fn category(&self, name: &str) -> Option<PatternCategory> {
        self.patterns
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.category)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Apply every enabled pattern once, dense or sparse per the options.
    #[must_use]
    pub fn scan(&self, text: &str) -> PatternMatchSet {
        self.scan_with(text, self.options.dense)
    }

    #[must_use]
    pub fn scan_with(&self, text: &str, dense: bool) -> PatternMatchSet {
        let mut set = PatternMatchSet::new();
        for pattern in &self.patterns {
            let matches: Vec<MatchPayload> = pattern
                .regex
                .captures_iter(text)
                .map(|caps| pattern.payload(&caps))
                .collect();
            if dense || !matches.is_empty() {
                set.insert(pattern.name.clone(), matches);
            }
        }
        set
    }

    /// Context summary for `names` (every enabled pattern when empty).
    pub fn scan_with_context(
        &self,
        text: &str,
        names: &[&str],
    ) -> Result<ContextSummary, ScanError> {
        let selected = self.select(names)?;
        let mut acc = self.accumulator(&selected);
        self.accumulate(&mut acc, &selected, text);
        Ok(acc.finish())
    }

    /// Pattern matches for each message of a chat, in input order.
    #[must_use]
    pub fn scan_messages(&self, messages: &[NormalizedMessage]) -> Vec<MessageEnrichment> {
        messages
            .par_iter()
            .map(|m| MessageEnrichment {
                message_id: m.id(),
                sender_id: m.sender_id(),
                timestamp: m.timestamp(),
                matches: self.scan(m.text()),
            })
            .collect()
    }

    /// Context summary aggregated over every message of a chat.
    pub fn corpus_summary(
        &self,
        messages: &[NormalizedMessage],
        names: &[&str],
    ) -> Result<ContextSummary, ScanError> {
        let selected = self.select(names)?;
        let mut acc = self.accumulator(&selected);
        for message in messages {
            self.accumulate(&mut acc, &selected, message.text());
        }
        Ok(acc.finish())
    }

    fn select(&self, names: &[&str]) -> Result<Vec<usize>, ScanError> {
        if names.is_empty() {
            return Ok((0..self.patterns.len()).collect());
        }
        let mut selected = Vec::with_capacity(names.len());
        for (index, pattern) in self.patterns.iter().enumerate() {
            if names.contains(&pattern.name.as_str()) {
                selected.push(index);
            }
        }
        if let Some(unknown) = names
            .iter()
            .find(|n| !self.patterns.iter().any(|p| p.name == **n))
        {
            return Err(ScanError::UnknownPattern((*unknown).to_string()));
        }
        Ok(selected)
    }

    fn accumulator(&self, selected: &[usize]) -> ContextAccumulator {
        ContextAccumulator::new(
            selected.iter().map(|&i| {
                let p = &self.patterns[i];
                (p.name.as_str(), p.category)
            }),
            self.options.context_chars,
            self.options.examples_per_name,
        )
    }

    /// Single-group patterns are keyed by their group, so boundary
    /// characters a regex consumes never split occurrences.
    fn accumulate(&self, acc: &mut ContextAccumulator, selected: &[usize], text: &str) {
        for (slot, &index) in selected.iter().enumerate() {
            let pattern = &self.patterns[index];
            let keyed = usize::from(pattern.groups == 1);
            for caps in pattern.regex.captures_iter(text) {
                if let Some(m) = caps.get(keyed).or_else(|| caps.get(0)) {
                    acc.record(slot, text, m.start(), m.end());
                }
            }
        }
    }
}
