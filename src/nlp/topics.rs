//! Topic labelling on top of TF-IDF + NMF
//!
//! NMF components come out in arbitrary order, so a component is named by how
//! strongly it loads on each label's seed vocabulary rather than by its index.

use ndarray::Array2;
use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::core::config::TopicConfig;
use crate::core::error::Result;
use crate::core::types::{TopicAssignment, TopicLabel};
use crate::nlp::nmf::{Nmf, NmfConfig};
use crate::nlp::vectorizer::TfIdfVectorizer;

/// Words that identify each topic label
pub fn seed_vocabulary(label: TopicLabel) -> &'static [&'static str] {
    match label {
        TopicLabel::EventsCulture => &[
            "concierto", "evento", "eventos", "cultural", "cultura", "ambiente", "alegría",
            "gente", "encanta", "música", "fiesta", "festival", "gran", "exposición", "teatro",
        ],
        TopicLabel::TransportMobility => &[
            "transporte", "retrasos", "retraso", "tráfico", "afluencia", "quejas", "metro",
            "autobús", "atasco", "movilidad", "público", "insoportable", "fatal", "tren", "cercanías",
        ],
    }
}

/// One fitted NMF component
#[derive(Debug, Clone, Serialize)]
pub struct Topic {
    pub id: usize,
    pub label: TopicLabel,
    /// Highest-weighted terms, strongest first
    pub top_terms: Vec<(String, f64)>,
    /// Keyword overlap score behind the label; 0 when it fell back to the index
    pub label_score: f64,
}

#[derive(Debug, Clone)]
pub struct TopicModel {
    pub topics: Vec<Topic>,
    pub assignments: Vec<TopicAssignment>,
    pub document_topic: Array2<f64>,
}

impl TopicModel {
    pub fn label_of(&self, topic_id: usize) -> Option<TopicLabel> {
        self.topics.iter().find(|t| t.id == topic_id).map(|t| t.label)
    }
}

pub struct TopicLabeler {
    nmf: NmfConfig,
    top_n: usize,
}

impl Default for TopicLabeler {
    fn default() -> Self {
        Self::new(&TopicConfig::default())
    }
}

impl TopicLabeler {
    pub fn new(config: &TopicConfig) -> Self {
        Self {
            nmf: NmfConfig {
                components: config.components,
                max_iter: config.max_iter,
                tolerance: config.tolerance,
                seed: config.seed,
            },
            top_n: 5,
        }
    }

    pub fn fit(&self, texts: &[&str]) -> Result<TopicModel> {
        let mut vectorizer = TfIdfVectorizer::default();
        let x = vectorizer.fit_transform(texts)?;
        let factors = Nmf::new(self.nmf).fit(&x)?;

        let labels = label_components(&factors.h, &vectorizer);
        let topics: Vec<Topic> = labels
            .into_iter()
            .enumerate()
            .map(|(id, (label, label_score))| Topic {
                id,
                label,
                top_terms: top_terms(&factors.h, id, vectorizer.terms(), self.top_n),
                label_score,
            })
            .collect();

        let assignments = factors
            .dominant_components()
            .into_iter()
            .map(|topic_id| TopicAssignment {
                topic_id,
                label: topics[topic_id].label,
            })
            .collect();

        for topic in &topics {
            tracing::debug!(
                id = topic.id,
                label = %topic.label,
                score = topic.label_score,
                terms = ?topic.top_terms.iter().map(|(t, _)| t.as_str()).collect::<Vec<_>>(),
                "Fitted topic"
            );
        }

        Ok(TopicModel {
            topics,
            assignments,
            document_topic: factors.w,
        })
    }
}

/// Greedy match of components to labels by descending vocabulary overlap.
///
/// Components left without a positive match fall back to the index
/// convention (0 = events, 1 = transport).
fn label_components(h: &Array2<f64>, vectorizer: &TfIdfVectorizer) -> Vec<(TopicLabel, f64)> {
    let k = h.nrows();

    let mut candidates: Vec<(usize, TopicLabel, f64)> = Vec::new();
    for component in 0..k {
        for label in TopicLabel::ALL {
            let score: f64 = seed_vocabulary(label)
                .iter()
                .filter_map(|term| vectorizer.term_index(term))
                .map(|col| h[[component, col]])
                .sum();
            if score > 0.0 {
                candidates.push((component, label, score));
            }
        }
    }
    candidates.sort_by_key(|(component, _, score)| (std::cmp::Reverse(OrderedFloat(*score)), *component));

    let mut assigned: Vec<Option<(TopicLabel, f64)>> = vec![None; k];
    let mut used: Vec<TopicLabel> = Vec::new();
    for (component, label, score) in candidates {
        if assigned[component].is_none() && !used.contains(&label) {
            assigned[component] = Some((label, score));
            used.push(label);
        }
    }

    assigned
        .into_iter()
        .enumerate()
        .map(|(component, slot)| {
            slot.unwrap_or_else(|| {
                let fallback = TopicLabel::by_index(component);
                tracing::warn!(
                    component,
                    label = %fallback,
                    "No vocabulary overlap for topic; using index convention"
                );
                (fallback, 0.0)
            })
        })
        .collect()
}

fn top_terms(h: &Array2<f64>, component: usize, terms: &[String], n: usize) -> Vec<(String, f64)> {
    let mut weighted: Vec<(String, f64)> = terms
        .iter()
        .enumerate()
        .map(|(col, term)| (term.clone(), h[[component, col]]))
        .filter(|(_, w)| *w > 0.0)
        .collect();
    weighted.sort_by_key(|(_, w)| std::cmp::Reverse(OrderedFloat(*w)));
    weighted.truncate(n);
    weighted
}
