//! Text analysis: tokenization, sentiment and topics

pub mod lexicon;
pub mod nmf;
pub mod sentiment;
pub mod tokenizer;
pub mod topics;
pub mod vectorizer;

pub use lexicon::{SentimentLexicon, SpanishLexicon};
pub use nmf::{Nmf, NmfConfig, NmfResult};
pub use sentiment::SentimentAnalyzer;
pub use tokenizer::Tokenizer;
pub use topics::{Topic, TopicLabeler, TopicModel};
pub use vectorizer::TfIdfVectorizer;

use crate::core::error::Result;
use crate::core::types::{Post, ScoredPost};

/// Score sentiment and assign a topic to every post
pub fn enrich_posts(
    posts: Vec<Post>,
    analyzer: &SentimentAnalyzer,
    labeler: &TopicLabeler,
) -> Result<(Vec<ScoredPost>, TopicModel)> {
    let texts: Vec<&str> = posts.iter().map(|p| p.text.as_str()).collect();
    let model = labeler.fit(&texts)?;
    let sentiments = analyzer.score_all(texts.iter().copied());

    let scored = posts
        .into_iter()
        .zip(sentiments)
        .zip(model.assignments.iter().copied())
        .map(|((post, sentiment), topic)| ScoredPost {
            post,
            sentiment,
            topic,
        })
        .collect();

    Ok((scored, model))
}
