//! Deterministic model stand-ins for unit tests

use crate::error::{Result, ResumeScorerError};
use crate::processing::embeddings::Embedder;
use crate::processing::keywords::{PartOfSpeech, PosTagger, TaggedToken};
use crate::processing::models::ModelLoader;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const NOUNS: &[&str] = &[
    "developer", "background", "machine", "learning", "data", "science", "engineer",
    "experience", "analysis", "team", "years", "services", "pipelines",
];

const PROPER_NOUNS: &[&str] = &[
    "python", "streamlit", "pandas", "scikit-learn", "rust", "kafka", "java", "tokio",
    "postgres",
];

/// Tags by dictionary lookup; unknown words are `Other`.
pub struct LexiconTagger {
    lexicon: HashMap<String, PartOfSpeech>,
}

impl Default for LexiconTagger {
    fn default() -> Self {
        let mut lexicon = HashMap::new();
        for noun in NOUNS {
            lexicon.insert(noun.to_string(), PartOfSpeech::Noun);
        }
        for noun in PROPER_NOUNS {
            lexicon.insert(noun.to_string(), PartOfSpeech::ProperNoun);
        }
        Self { lexicon }
    }
}

impl PosTagger for LexiconTagger {
    fn model_name(&self) -> &str {
        "lexicon"
    }

    fn tag(&self, text: &str) -> Vec<TaggedToken> {
        text.split_whitespace()
            .map(|raw| raw.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|word| !word.is_empty())
            .map(|word| {
                let pos = self
                    .lexicon
                    .get(word)
                    .copied()
                    .unwrap_or(PartOfSpeech::Other);
                TaggedToken::new(word, pos)
            })
            .collect()
    }
}

/// Bag-of-words embedder hashing each lowercased word into a fixed bucket.
pub struct HashingEmbedder {
    dimension: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self { dimension: 32 }
    }
}

impl HashingEmbedder {
    fn bucket(&self, word: &str) -> usize {
        let mut hash: u64 = 0xcbf29ce484222325;
        for byte in word.bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
        (hash % self.dimension as u64) as usize
    }
}

impl Embedder for HashingEmbedder {
    fn model_name(&self) -> &str {
        "hashing-bow"
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| {
                let mut vector = vec![0.0f32; self.dimension];
                for word in text.split_whitespace() {
                    let word = word
                        .trim_matches(|c: char| !c.is_alphanumeric())
                        .to_lowercase();
                    if !word.is_empty() {
                        vector[self.bucket(&word)] += 1.0;
                    }
                }
                vector
            })
            .collect())
    }
}

/// Returns the same vector for every text, so every cosine is 1.0.
pub struct ConstantEmbedder;

impl Embedder for ConstantEmbedder {
    fn model_name(&self) -> &str {
        "constant"
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![0.5, 0.5, 0.5, 0.5]).collect())
    }
}

/// Hands out the stand-ins and counts how often each model is built.
#[derive(Default)]
pub struct CountingLoader {
    pub tagger_loads: AtomicUsize,
    pub embedder_loads: AtomicUsize,
    pub fail_embedder: bool,
}

impl CountingLoader {
    pub fn failing_embedder() -> Self {
        Self {
            fail_embedder: true,
            ..Self::default()
        }
    }
}

impl ModelLoader for CountingLoader {
    fn load_tagger(&self) -> Result<Arc<dyn PosTagger>> {
        self.tagger_loads.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(std::time::Duration::from_millis(20));
        Ok(Arc::new(LexiconTagger::default()))
    }

    fn load_embedder(&self) -> Result<Arc<dyn Embedder>> {
        self.embedder_loads.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(std::time::Duration::from_millis(20));
        if self.fail_embedder {
            return Err(ResumeScorerError::ModelInitialization(
                "embedding assets missing".to_string(),
            ));
        }
        Ok(Arc::new(HashingEmbedder::default()))
    }
}
