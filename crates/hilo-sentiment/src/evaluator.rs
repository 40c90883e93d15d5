//! Lexicon-driven sentiment scoring with negation, intensifier and
//! adversative handling.

use std::sync::{Arc, Once};

use hilo_config::SentimentConfig;
use hilo_core::entities::{
    AdversativeWeight, MessageSentiment, NormalizedMessage, SentimentResult, TokenContribution,
};
use hilo_core::enums::SentimentLabel;
use rayon::prelude::*;

use crate::error::LexiconError;
use crate::lexicon::Lexicon;
use crate::parser::{CLITICS, DependencyParser, ShallowParser};
use crate::tokens::{sentences, tokenize};

static FALLBACK_NOTICE: Once = Once::new();

/// Tokens the window fallback looks back over before a polar token.
const MAX_MODIFIER_CHAIN: usize = 3;

#[derive(Debug, Clone)]
pub struct SentimentEvaluator {
    lexicon: Arc<Lexicon>,
    parser: Option<Arc<dyn DependencyParser>>,
    pos_threshold: f64,
    neg_threshold: f64,
}

impl SentimentEvaluator {
    /// Evaluator over `lexicon`, with the shallow parser when the config
    /// enables parsing.
    #[must_use]
    pub fn new(lexicon: Arc<Lexicon>, config: &SentimentConfig) -> Self {
        let parser: Option<Arc<dyn DependencyParser>> = config
            .use_parser
            .then(|| Arc::new(ShallowParser::new(Arc::clone(&lexicon))) as Arc<dyn DependencyParser>);
        Self {
            lexicon,
            parser,
            pos_threshold: config.sentiment_pos_threshold,
            neg_threshold: config.sentiment_neg_threshold,
        }
    }

    /// Load the configured lexicon (builtin unless `lexicon_path` is set).
    pub fn from_config(config: &SentimentConfig) -> Result<Self, LexiconError> {
        let lexicon = if config.has_custom_lexicon() {
            Lexicon::from_path(std::path::Path::new(&config.lexicon_path))?
        } else {
            Lexicon::builtin()?
        };
        Ok(Self::new(Arc::new(lexicon), config))
    }

    /// Replace the parser, e.g. with an adapter over an external model.
    #[must_use]
    pub fn with_parser(mut self, parser: Arc<dyn DependencyParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    #[must_use]
    pub fn without_parser(mut self) -> Self {
        self.parser = None;
        self
    }

    #[must_use]
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    #[must_use]
    pub fn parser_name(&self) -> Option<&str> {
        self.parser.as_deref().map(|p| p.name())
    }

    /// Score `text`. Empty or unscorable text is neutral; never fails.
    ///
    /// Each sentence's contributions are summed; a sentence containing an
    /// adversative is then scaled by that adversative's weight.
    #[must_use]
    pub fn evaluate(&self, text: &str) -> SentimentResult {
        let mut details = Vec::new();
        let mut adversatives = Vec::new();
        let mut score = 0.0;
        for sentence in sentences(text) {
            let tokens = self.lexicon.merge_phrases(tokenize(sentence));
            if tokens.is_empty() {
                continue;
            }
            let first = details.len();
            match self.parse(&tokens) {
                Some(heads) => self.score_tree(&tokens, &heads, &mut details),
                None => {
                    FALLBACK_NOTICE.call_once(|| {
                        tracing::info!("no dependency parse available, using token-window scoring");
                    });
                    self.score_window(&tokens, &mut details);
                }
            }
            if details.len() == first {
                continue;
            }

            let sentence_score: f64 = details[first..].iter().map(|d| d.contribution).sum();
            match self.sentence_adversative(&tokens) {
                Some((token, weight)) => {
                    score += sentence_score * weight;
                    adversatives.push(AdversativeWeight {
                        token: token.to_string(),
                        weight,
                        sentence_score: round4(sentence_score),
                    });
                }
                None => score += sentence_score,
            }
        }

        if details.is_empty() {
            return SentimentResult::neutral();
        }
        let score = round4(score);
        SentimentResult {
            label: SentimentLabel::from_score(score, self.pos_threshold, self.neg_threshold),
            score,
            details,
            adversatives,
        }
    }

    /// Score every message, preserving input order.
    #[must_use]
    pub fn evaluate_messages(&self, messages: &[NormalizedMessage]) -> Vec<MessageSentiment> {
        messages
            .par_iter()
            .map(|m| MessageSentiment {
                message_id: m.id(),
                sender_id: m.sender_id(),
                sender_display_name: m.message.sender_display_name.clone(),
                result: self.evaluate(m.text()),
            })
            .collect()
    }

    /// Heads from the parser, discarded when malformed.
    fn parse(&self, tokens: &[String]) -> Option<Vec<Option<usize>>> {
        let heads = self.parser.as_ref()?.parse(tokens)?;
        let well_formed = heads.len() == tokens.len()
            && heads.iter().flatten().all(|&h| h < tokens.len());
        if !well_formed {
            tracing::debug!(tokens = tokens.len(), "discarding malformed dependency parse");
            return None;
        }
        Some(heads)
    }

    /// The adversative that weights a sentence: the last one, which
    /// introduces the clause being emphasized.
    fn sentence_adversative<'t>(&self, tokens: &'t [String]) -> Option<(&'t str, f64)> {
        tokens
            .iter()
            .rev()
            .find_map(|t| self.lexicon.adversative(t).map(|w| (t.as_str(), w)))
    }

    fn score_tree(
        &self,
        tokens: &[String],
        heads: &[Option<usize>],
        details: &mut Vec<TokenContribution>,
    ) {
        for (i, token) in tokens.iter().enumerate() {
            let Some(polarity) = self.lexicon.polarity(token) else {
                continue;
            };
            let mut multiplier = 1.0;
            for child in (0..tokens.len()).filter(|&c| heads[c] == Some(i)) {
                if let Some(w) = self.lexicon.intensifier(&tokens[child]) {
                    multiplier *= w;
                }
                if self.lexicon.is_negator(&tokens[child]) {
                    multiplier *= -1.0;
                }
            }
            // Bounded walk so a cyclic parse cannot loop.
            let mut ancestor = heads[i];
            for _ in 0..tokens.len() {
                let Some(a) = ancestor else { break };
                if self.lexicon.is_negator(&tokens[a]) {
                    multiplier *= -1.0;
                    break;
                }
                ancestor = heads[a];
            }
            details.push(contribution(token, polarity, multiplier));
        }
    }

    fn score_window(&self, tokens: &[String], details: &mut Vec<TokenContribution>) {
        for (i, token) in tokens.iter().enumerate() {
            let Some(polarity) = self.lexicon.polarity(token) else {
                continue;
            };
            let mut multiplier = 1.0;
            for prev in tokens[..i].iter().rev().take(MAX_MODIFIER_CHAIN) {
                if self.lexicon.is_negator(prev) {
                    multiplier *= -1.0;
                } else if let Some(w) = self.lexicon.intensifier(prev) {
                    multiplier *= w;
                } else if !CLITICS.contains(&prev.as_str()) {
                    break;
                }
            }
            details.push(contribution(token, polarity, multiplier));
        }
    }
}

fn contribution(token: &str, base_polarity: f64, multiplier: f64) -> TokenContribution {
    TokenContribution {
        token: token.to_string(),
        base_polarity,
        multiplier: round4(multiplier),
        contribution: round4(base_polarity * multiplier),
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
