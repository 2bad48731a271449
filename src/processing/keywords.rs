//! Keyword extraction via part-of-speech tagging
//!
//! A keyword is the lowercased surface form of any token tagged as a noun or
//! proper noun. No stemming, no fuzzy matching: two keywords are equal only
//! when their strings are equal.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Coarse part-of-speech categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartOfSpeech {
    Noun,
    ProperNoun,
    Verb,
    Adjective,
    Other,
}

impl PartOfSpeech {
    /// Map a Penn Treebank tag to its coarse category.
    pub fn from_penn_tag(tag: &str) -> Self {
        match tag {
            "NN" | "NNS" => PartOfSpeech::Noun,
            "NNP" | "NNPS" => PartOfSpeech::ProperNoun,
            t if t.starts_with("VB") => PartOfSpeech::Verb,
            "JJ" | "JJR" | "JJS" => PartOfSpeech::Adjective,
            _ => PartOfSpeech::Other,
        }
    }

    pub fn is_nominal(&self) -> bool {
        matches!(self, PartOfSpeech::Noun | PartOfSpeech::ProperNoun)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub text: String,
    pub pos: PartOfSpeech,
}

impl TaggedToken {
    pub fn new(text: impl Into<String>, pos: PartOfSpeech) -> Self {
        Self {
            text: text.into(),
            pos,
        }
    }
}

/// A loaded tagging model. Inference must be safe to call concurrently.
pub trait PosTagger: Send + Sync {
    fn model_name(&self) -> &str;

    fn tag(&self, text: &str) -> Vec<TaggedToken>;
}

/// Set of keyword strings; iteration order is lexicographic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSet(BTreeSet<String>);

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.0.contains(keyword)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Members of `self` that `other` lacks.
    pub fn missing_from(&self, other: &KeywordSet) -> Vec<String> {
        self.0.difference(&other.0).cloned().collect()
    }

    pub fn overlap_count(&self, other: &KeywordSet) -> usize {
        self.0.intersection(&other.0).count()
    }
}

impl FromIterator<String> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}

#[derive(Clone)]
pub struct KeywordExtractor {
    tagger: Arc<dyn PosTagger>,
}

impl KeywordExtractor {
    pub fn new(tagger: Arc<dyn PosTagger>) -> Self {
        Self { tagger }
    }

    pub fn model_name(&self) -> &str {
        self.tagger.model_name()
    }

    /// Lowercase the text, tag it, and keep every noun or proper noun.
    pub fn extract(&self, text: &str) -> KeywordSet {
        if text.trim().is_empty() {
            return KeywordSet::new();
        }

        let lowered = text.to_lowercase();
        self.tagger
            .tag(&lowered)
            .into_iter()
            .filter(|token| token.pos.is_nominal() && !token.text.trim().is_empty())
            .map(|token| token.text)
            .collect()
    }
}
