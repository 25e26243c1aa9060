//! Polarity lexicons
//!
//! Scores are in [-1, 1]. Modifiers scale the next scored word; negations flip
//! words that follow them within a short window.

use ahash::AHashMap;

/// Word-level polarity source for [`SentimentAnalyzer`](crate::nlp::SentimentAnalyzer)
pub trait SentimentLexicon {
    /// Polarity of a lowercase word, if the lexicon knows it
    fn score(&self, word: &str) -> Option<f64>;

    /// Intensity multiplier for words such as "muy"
    fn modifier(&self, word: &str) -> Option<f64>;

    fn is_negation(&self, word: &str) -> bool;
}

/// Small Spanish lexicon tuned for city-life posts (events, transport, crowds)
#[derive(Debug, Clone)]
pub struct SpanishLexicon {
    scores: AHashMap<String, f64>,
    modifiers: AHashMap<String, f64>,
    negations: Vec<String>,
}

impl Default for SpanishLexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl SpanishLexicon {
    pub fn new() -> Self {
        let positive = [
            ("encanta", 0.8),
            ("alegría", 0.8),
            ("genial", 0.8),
            ("excelente", 0.9),
            ("fantástico", 0.9),
            ("increíble", 0.8),
            ("feliz", 0.8),
            ("divertido", 0.7),
            ("gusta", 0.6),
            ("bueno", 0.6),
            ("buena", 0.6),
            ("bonito", 0.6),
            ("mejor", 0.6),
            ("gran", 0.5),
            ("fiesta", 0.5),
            ("ambiente", 0.4),
            ("cultural", 0.2),
        ];

        let negative = [
            ("horrible", -0.9),
            ("terrible", -0.9),
            ("insoportable", -0.9),
            ("fatal", -0.8),
            ("odio", -0.8),
            ("caos", -0.7),
            ("peor", -0.7),
            ("quejas", -0.6),
            ("queja", -0.6),
            ("atasco", -0.6),
            ("malo", -0.6),
            ("mala", -0.6),
            ("triste", -0.6),
            ("cancelado", -0.6),
            ("retrasos", -0.5),
            ("retraso", -0.5),
            ("problema", -0.5),
            ("lento", -0.4),
            ("tráfico", -0.3),
            ("afluencia", -0.2),
        ];

        let modifiers = [
            ("muchísimo", 1.6),
            ("super", 1.5),
            ("muy", 1.3),
            ("mucho", 1.3),
            ("mucha", 1.3),
            ("bastante", 1.2),
            ("algo", 0.7),
            ("poco", 0.5),
        ];

        let negations = ["no", "nunca", "ni", "sin", "tampoco", "jamás"];

        Self {
            scores: positive
                .iter()
                .chain(negative.iter())
                .map(|(w, s)| (w.to_string(), *s))
                .collect(),
            modifiers: modifiers.iter().map(|(w, m)| (w.to_string(), *m)).collect(),
            negations: negations.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Add or override a word score
    pub fn with_score(mut self, word: &str, score: f64) -> Self {
        self.scores.insert(word.to_lowercase(), score.clamp(-1.0, 1.0));
        self
    }
}

impl SentimentLexicon for SpanishLexicon {
    fn score(&self, word: &str) -> Option<f64> {
        self.scores.get(word).copied()
    }

    fn modifier(&self, word: &str) -> Option<f64> {
        self.modifiers.get(word).copied()
    }

    fn is_negation(&self, word: &str) -> bool {
        self.negations.iter().any(|n| n == word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_are_bounded() {
        let lexicon = SpanishLexicon::new();
        for score in lexicon.scores.values() {
            assert!((-1.0..=1.0).contains(score));
        }
    }

    #[test]
    fn test_with_score_clamps() {
        let lexicon = SpanishLexicon::new().with_score("Brutal", 3.0);
        assert_eq!(lexicon.score("brutal"), Some(1.0));
    }

    #[test]
    fn test_negations_and_modifiers() {
        let lexicon = SpanishLexicon::new();
        assert!(lexicon.is_negation("nunca"));
        assert!(!lexicon.is_negation("muy"));
        assert_eq!(lexicon.modifier("muy"), Some(1.3));
        assert_eq!(lexicon.score("muy"), None);
    }
}
