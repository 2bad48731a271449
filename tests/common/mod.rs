//! Lightweight model stand-ins shared by the integration tests

use resume_scorer::error::Result;
use resume_scorer::processing::embeddings::Embedder;
use resume_scorer::processing::keywords::{PartOfSpeech, PosTagger, TaggedToken};
use resume_scorer::processing::models::ModelLoader;
use std::sync::Arc;

const NOUNS: &[&str] = &[
    "developer", "engineer", "engineers", "experience", "machine", "learning", "data", "science",
    "analysis", "team", "services", "pipelines", "storage", "dashboard", "events", "skills",
];

const PROPER_NOUNS: &[&str] = &[
    "python", "streamlit", "pandas", "scikit-learn", "react", "node.js", "postgres", "kafka",
    "docker",
];

pub struct WordListTagger;

impl PosTagger for WordListTagger {
    fn model_name(&self) -> &str {
        "word-list"
    }

    fn tag(&self, text: &str) -> Vec<TaggedToken> {
        text.split_whitespace()
            .map(|raw| raw.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|word| !word.is_empty())
            .map(|word| {
                let pos = if PROPER_NOUNS.contains(&word) {
                    PartOfSpeech::ProperNoun
                } else if NOUNS.contains(&word) {
                    PartOfSpeech::Noun
                } else {
                    PartOfSpeech::Other
                };
                TaggedToken::new(word, pos)
            })
            .collect()
    }
}

/// Every text maps to the same direction, so semantic similarity is always 100.
pub struct UniformEmbedder;

impl Embedder for UniformEmbedder {
    fn model_name(&self) -> &str {
        "uniform"
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![1.0, 2.0, 3.0]).collect())
    }
}

/// Letter-frequency embedder: cheap, deterministic and text dependent.
pub struct LetterEmbedder;

impl Embedder for LetterEmbedder {
    fn model_name(&self) -> &str {
        "letters"
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| {
                let mut counts = vec![0.0f32; 26];
                for c in text.chars().filter(char::is_ascii_alphabetic) {
                    counts[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1.0;
                }
                counts
            })
            .collect())
    }
}

pub struct StubLoader {
    pub uniform: bool,
}

impl ModelLoader for StubLoader {
    fn load_tagger(&self) -> Result<Arc<dyn PosTagger>> {
        Ok(Arc::new(WordListTagger))
    }

    fn load_embedder(&self) -> Result<Arc<dyn Embedder>> {
        if self.uniform {
            Ok(Arc::new(UniformEmbedder))
        } else {
            Ok(Arc::new(LetterEmbedder))
        }
    }
}

pub fn stub_loader(uniform: bool) -> Arc<dyn ModelLoader> {
    Arc::new(StubLoader { uniform })
}
