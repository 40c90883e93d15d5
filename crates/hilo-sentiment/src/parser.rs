//! Dependency parser seam and the rule-based Spanish shallow parser.

use std::sync::Arc;

use crate::lexicon::Lexicon;

/// Produces a dependency tree over the tokens of one sentence.
///
/// The result holds one head per token, `None` marking the root. Returning
/// `None` means the sentence could not be parsed; the evaluator then falls
/// back to token-window scoring for it.
pub trait DependencyParser: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    fn parse(&self, tokens: &[String]) -> Option<Vec<Option<usize>>>;
}

pub(crate) const CLITICS: &[&str] = &["me", "te", "se", "le", "les", "lo", "la", "los", "las", "nos", "os"];

const FUNCTION_WORDS: &[&str] = &[
    // articles and contractions
    "el", "la", "los", "las", "un", "una", "unos", "unas", "al", "del",
    // prepositions
    "a", "ante", "bajo", "con", "contra", "de", "desde", "en", "entre", "hacia", "hasta", "para",
    "por", "según", "sobre", "tras",
    // conjunctions
    "y", "e", "o", "u", "que", "porque", "como", "si", "cuando",
    // determiners
    "este", "esta", "estos", "estas", "ese", "esa", "esos", "esas", "aquel", "aquella", "mi",
    "mis", "tu", "tus", "su", "sus", "nuestro", "nuestra",
    // pronouns
    "yo", "tú", "él", "ella", "ellos", "ellas", "usted", "ustedes", "nosotros",
];

const COPULAS: &[&str] = &[
    "es", "son", "era", "eran", "fue", "fueron", "ser", "sea", "soy", "eres", "somos", "estar",
    "está", "están", "estan", "estoy", "estaba", "estuvo", "parece", "parecen",
];

/// Deterministic head assignment for Spanish chat text.
///
/// Function words, copulas, clitics and modifiers attach to the next content
/// word (or the last one when none follows). The first content word is the
/// root and every other content word hangs from it.
#[derive(Debug, Clone)]
pub struct ShallowParser {
    lexicon: Arc<Lexicon>,
}

impl ShallowParser {
    #[must_use]
    pub const fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    fn is_content(&self, token: &str) -> bool {
        if self.lexicon.polarity(token).is_some() {
            return true;
        }
        !(self.lexicon.is_modifier(token)
            || FUNCTION_WORDS.contains(&token)
            || COPULAS.contains(&token)
            || CLITICS.contains(&token))
    }
}

impl DependencyParser for ShallowParser {
    fn name(&self) -> &str {
        "shallow"
    }

    fn parse(&self, tokens: &[String]) -> Option<Vec<Option<usize>>> {
        let content: Vec<usize> = (0..tokens.len())
            .filter(|&i| self.is_content(&tokens[i]))
            .collect();

        let Some(&root) = content.first() else {
            return Some((0..tokens.len()).map(|i| (i > 0).then_some(0)).collect());
        };

        let heads = (0..tokens.len())
            .map(|i| {
                if i == root {
                    None
                } else if content.contains(&i) {
                    Some(root)
                } else {
                    content
                        .iter()
                        .copied()
                        .find(|&c| c > i)
                        .or_else(|| content.last().copied())
                }
            })
            .collect();
        Some(heads)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(text: &str) -> Vec<Option<usize>> {
        let parser = ShallowParser::new(Arc::new(Lexicon::builtin().unwrap()));
        let tokens: Vec<String> = text.split(' ').map(str::to_string).collect();
        parser.parse(&tokens).unwrap()
    }

    #[test]
    fn negator_and_clitic_attach_to_the_verb() {
        assert_eq!(
            parse("no me gusta este producto"),
            [Some(2), Some(2), None, Some(4), Some(2)]
        );
    }

    #[test]
    fn trailing_function_words_attach_backwards() {
        assert_eq!(parse("bueno no"), [None, Some(0)]);
    }

    #[test]
    fn sentence_without_content_words_roots_at_first_token() {
        assert_eq!(parse("y de la"), [None, Some(0), Some(0)]);
    }
}
