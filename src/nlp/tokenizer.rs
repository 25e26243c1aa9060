//! Lowercasing word tokenizer with a Spanish stopword list

use ahash::AHashSet;

/// Spanish function words that carry no topic signal
const SPANISH_STOPWORDS: &[&str] = &[
    "a", "al", "algo", "ante", "antes", "como", "con", "contra", "cual", "cuando", "de", "del",
    "desde", "donde", "durante", "e", "el", "ella", "ellas", "ellos", "en", "entre", "era", "es",
    "esa", "ese", "eso", "esta", "está", "estaba", "estado", "estar", "este", "esto", "estos",
    "fue", "ha", "han", "hasta", "hay", "hoy", "la", "las", "le", "les", "lo", "los", "me", "mi",
    "mis", "muy", "más", "ni", "no", "nos", "o", "os", "otra", "otro", "para", "pero", "poco",
    "por", "porque", "que", "qué", "se", "sea", "ser", "si", "sin", "sobre", "son", "su", "sus",
    "también", "te", "tiene", "todo", "todos", "tu", "tus", "un", "una", "uno", "unos", "y", "ya",
    "yo",
];

/// Splits text into lowercase alphanumeric tokens
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stopwords: AHashSet<String>,
    min_len: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    /// Tokenizer that drops Spanish stopwords and single characters
    pub fn new() -> Self {
        Self {
            stopwords: SPANISH_STOPWORDS.iter().map(|w| w.to_string()).collect(),
            min_len: 2,
        }
    }

    /// Tokenizer that keeps every word (sentiment needs negations)
    pub fn keep_all() -> Self {
        Self {
            stopwords: AHashSet::new(),
            min_len: 1,
        }
    }

    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.chars().count() >= self.min_len)
            .filter(|w| !self.stopwords.contains(*w))
            .map(str::to_string)
            .collect()
    }
}
