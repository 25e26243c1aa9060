//! Lexicon-based polarity scoring

use crate::nlp::lexicon::{SentimentLexicon, SpanishLexicon};
use crate::nlp::tokenizer::Tokenizer;

/// Scale applied to a scored word that follows a negation
const NEGATION_SCALE: f64 = -0.5;

/// Maps text to a polarity in [-1, 1]
#[derive(Debug, Clone)]
pub struct SentimentAnalyzer<L = SpanishLexicon> {
    tokenizer: Tokenizer,
    lexicon: L,
    /// How many tokens after a negation it still applies to
    negation_window: usize,
}

impl Default for SentimentAnalyzer<SpanishLexicon> {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentAnalyzer<SpanishLexicon> {
    pub fn new() -> Self {
        Self::with_lexicon(SpanishLexicon::new())
    }
}

impl<L: SentimentLexicon> SentimentAnalyzer<L> {
    pub fn with_lexicon(lexicon: L) -> Self {
        Self {
            tokenizer: Tokenizer::keep_all(),
            lexicon,
            negation_window: 3,
        }
    }

    pub fn with_negation_window(mut self, window: usize) -> Self {
        self.negation_window = window;
        self
    }

    /// Mean score of the lexicon words in `text`, 0.0 when none match
    pub fn polarity(&self, text: &str) -> f64 {
        let mut total = 0.0;
        let mut scored = 0usize;
        let mut modifier = 1.0;
        let mut negation_active = false;
        let mut since_negation = 0usize;

        for token in self.tokenizer.tokenize(text) {
            if self.lexicon.is_negation(&token) {
                negation_active = true;
                since_negation = 0;
                continue;
            }

            if let Some(m) = self.lexicon.modifier(&token) {
                modifier = m;
                continue;
            }

            if let Some(base) = self.lexicon.score(&token) {
                let mut score = base * modifier;
                if negation_active && since_negation < self.negation_window {
                    score *= NEGATION_SCALE;
                }
                total += score;
                scored += 1;
            }
            // An intensifier only reaches the token right after it
            modifier = 1.0;

            if negation_active {
                since_negation += 1;
                if since_negation >= self.negation_window {
                    negation_active = false;
                }
            }
        }

        if scored == 0 {
            return 0.0;
        }
        (total / scored as f64).clamp(-1.0, 1.0)
    }

    pub fn score_all<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> Vec<f64> {
        texts.into_iter().map(|t| self.polarity(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_positive_post_with_intensifier() {
        let analyzer = SentimentAnalyzer::new();
        let score = analyzer.polarity("Me encanta el concierto en el centro, mucha alegría!");
        // (0.8 + 0.8 * 1.3) / 2
        assert!(approx(score, 0.92), "got {}", score);
    }

    #[test]
    fn test_negative_post() {
        let analyzer = SentimentAnalyzer::new();
        let score = analyzer.polarity("El tráfico en Chamartín es insoportable");
        assert!(approx(score, -0.6), "got {}", score);
    }

    #[test]
    fn test_negation_flips_and_dampens() {
        let analyzer = SentimentAnalyzer::new();
        assert!(approx(analyzer.polarity("No me gusta"), -0.3));
    }

    #[test]
    fn test_negation_window_expires() {
        let analyzer = SentimentAnalyzer::new().with_negation_window(1);
        // "me" consumes the window before "gusta"
        assert!(approx(analyzer.polarity("No me gusta"), 0.6));
    }

    #[test]
    fn test_intensifier_only_boosts_next_token() {
        let analyzer = SentimentAnalyzer::new();
        assert!(approx(analyzer.polarity("muy gran"), 0.65));
        assert!(approx(analyzer.polarity("mucha gente comentando, gran evento"), 0.5));
    }

    #[test]
    fn test_unknown_text_is_neutral() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(analyzer.polarity("Calle Mayor 12"), 0.0);
        assert_eq!(analyzer.polarity(""), 0.0);
    }

    #[test]
    fn test_result_is_clamped() {
        let lexicon = SpanishLexicon::new().with_score("brutal", 1.0);
        let analyzer = SentimentAnalyzer::with_lexicon(lexicon);
        assert_eq!(analyzer.polarity("muchísimo brutal"), 1.0);
    }
}
