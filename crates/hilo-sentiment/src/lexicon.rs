//! Sentiment lexicon: word, emoji and idiom polarities plus the modifier
//! tables (intensifiers, negators, adversatives).

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::error::LexiconError;

const BUILTIN_LEXICON: &str = include_str!("../data/lexicon.toml");

/// Characters that only change how the previous glyph renders.
const PRESENTATION_MARKS: [char; 2] = ['\u{FE0F}', '\u{200D}'];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LexiconFile {
    #[serde(default)]
    negators: Vec<String>,
    #[serde(default)]
    positive: HashMap<String, f64>,
    #[serde(default)]
    negative: HashMap<String, f64>,
    #[serde(default)]
    intensifiers: HashMap<String, f64>,
    #[serde(default)]
    adversatives: HashMap<String, f64>,
    #[serde(default)]
    emoji: HashMap<String, f64>,
    #[serde(default)]
    idioms: HashMap<String, f64>,
}

/// Compiled lexicon. Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Lexicon {
    polarity: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
    negators: HashSet<String>,
    adversatives: HashMap<String, f64>,
    /// Multi-word keys split into words, longest first.
    phrases: Vec<Vec<String>>,
}

impl Lexicon {
    /// Lexicon embedded in this crate.
    pub fn builtin() -> Result<Self, LexiconError> {
        Self::from_toml(BUILTIN_LEXICON)
    }

    /// Replacement lexicon read from a TOML file with the builtin layout.
    pub fn from_path(path: &Path) -> Result<Self, LexiconError> {
        let text = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, LexiconError> {
        let file: LexiconFile = toml::from_str(text)?;

        let mut polarity = HashMap::new();
        insert_checked(&mut polarity, "positive", file.positive, 0.5, 2.0)?;
        for (entry, value) in file.negative {
            check_range("negative", &entry, value, -2.0, -0.5)?;
            let key = normalize_key(&entry);
            if polarity.contains_key(&key) {
                return Err(LexiconError::Conflict { entry });
            }
            polarity.insert(key, value);
        }
        insert_checked(&mut polarity, "emoji", file.emoji, -2.0, 2.0)?;
        insert_checked(&mut polarity, "idioms", file.idioms, -2.0, 2.0)?;

        let mut intensifiers = HashMap::new();
        insert_checked(&mut intensifiers, "intensifiers", file.intensifiers, 0.2, 1.8)?;
        let mut adversatives = HashMap::new();
        insert_checked(&mut adversatives, "adversatives", file.adversatives, 1.2, 2.0)?;

        let negators = file.negators.iter().map(|n| normalize_key(n)).collect();

        let mut phrases: Vec<Vec<String>> = polarity
            .keys()
            .chain(adversatives.keys())
            .filter(|k| k.contains(' '))
            .map(|k| k.split(' ').map(str::to_string).collect())
            .collect();
        phrases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        tracing::debug!(
            entries = polarity.len(),
            phrases = phrases.len(),
            "sentiment lexicon compiled"
        );
        Ok(Self {
            polarity,
            intensifiers,
            negators,
            adversatives,
            phrases,
        })
    }

    /// Base polarity of a lowercase token, if it carries one.
    #[must_use]
    pub fn polarity(&self, token: &str) -> Option<f64> {
        self.polarity.get(token).copied()
    }

    #[must_use]
    pub fn intensifier(&self, token: &str) -> Option<f64> {
        self.intensifiers.get(token).copied()
    }

    #[must_use]
    pub fn is_negator(&self, token: &str) -> bool {
        self.negators.contains(token)
    }

    /// Post-clause weight of an adversative conjunction.
    #[must_use]
    pub fn adversative(&self, token: &str) -> Option<f64> {
        self.adversatives.get(token).copied()
    }

    /// Whether `token` only modifies its neighbours and never carries polarity.
    #[must_use]
    pub fn is_modifier(&self, token: &str) -> bool {
        self.polarity(token).is_none()
            && (self.is_negator(token)
                || self.intensifier(token).is_some()
                || self.adversative(token).is_some())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.polarity.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polarity.is_empty()
    }

    /// Merge multi-word idioms and adversatives into single tokens, longest
    /// match first, left to right.
    #[must_use]
    pub fn merge_phrases(&self, tokens: Vec<String>) -> Vec<String> {
        if self.phrases.is_empty() {
            return tokens;
        }
        let mut merged = Vec::with_capacity(tokens.len());
        let mut i = 0;
        while i < tokens.len() {
            let hit = self.phrases.iter().find(|phrase| {
                tokens
                    .get(i..i + phrase.len())
                    .is_some_and(|window| window == phrase.as_slice())
            });
            if let Some(phrase) = hit {
                merged.push(phrase.join(" "));
                i += phrase.len();
            } else {
                merged.push(tokens[i].clone());
                i += 1;
            }
        }
        merged
    }
}

/// Lowercase a key and drop emoji presentation marks so lookups match tokens.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !PRESENTATION_MARKS.contains(c))
        .flat_map(char::to_lowercase)
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn check_range(
    section: &'static str,
    entry: &str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), LexiconError> {
    if value.is_nan() || value < min || value > max || value.abs() < f64::EPSILON {
        return Err(LexiconError::OutOfRange {
            section,
            entry: entry.to_string(),
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn insert_checked(
    target: &mut HashMap<String, f64>,
    section: &'static str,
    entries: HashMap<String, f64>,
    min: f64,
    max: f64,
) -> Result<(), LexiconError> {
    for (entry, value) in entries {
        check_range(section, &entry, value, min, max)?;
        target.insert(normalize_key(&entry), value);
    }
    Ok(())
}
