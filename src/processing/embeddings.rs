//! Semantic embeddings using Model2Vec

use crate::error::{Result, ResumeScorerError};
use log::info;
use model2vec_rs::model::StaticModel;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// A loaded embedding model. Inference must be safe to call concurrently.
pub trait Embedder: Send + Sync {
    fn model_name(&self) -> &str;

    /// One vector per input text, all of the same dimension.
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Dense embedding of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityVector(Vec<f32>);

impl SimilarityVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

/// Model2Vec static embedding model.
pub struct Model2VecEmbedder {
    model: StaticModel,
    model_name: String,
}

impl Model2VecEmbedder {
    /// Load from a local model folder or a HuggingFace repo id.
    pub fn load(repo_or_path: &Path, model_name: &str) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model from: {}", repo_or_path.display());

        let model = StaticModel::from_pretrained(repo_or_path, None, None, None).map_err(|e| {
            ResumeScorerError::ModelInitialization(format!(
                "Failed to load embedding model {}: {:#}",
                repo_or_path.display(),
                e
            ))
        })?;

        info!("Embedding model loaded in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            model_name: model_name.to_string(),
        })
    }
}

impl Embedder for Model2VecEmbedder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(self.model.encode(texts))
    }
}

#[derive(Clone)]
pub struct SemanticEncoder {
    embedder: Arc<dyn Embedder>,
}

impl SemanticEncoder {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }

    pub fn encode(&self, text: &str) -> Result<SimilarityVector> {
        let mut vectors = self.encode_batch(&[text.to_string()])?;
        vectors.pop().ok_or_else(|| {
            ResumeScorerError::Embedding("Model returned no embedding".to_string())
        })
    }

    /// Encode both texts in a single model call.
    pub fn encode_pair(&self, first: &str, second: &str) -> Result<(SimilarityVector, SimilarityVector)> {
        let mut vectors = self
            .encode_batch(&[first.to_string(), second.to_string()])?
            .into_iter();
        match (vectors.next(), vectors.next()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(ResumeScorerError::Embedding(
                "Model returned fewer embeddings than inputs".to_string(),
            )),
        }
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<SimilarityVector>> {
        let vectors = self.embedder.embed(texts)?;
        if vectors.len() != texts.len() {
            return Err(ResumeScorerError::Embedding(format!(
                "Model returned {} embeddings for {} inputs",
                vectors.len(),
                texts.len()
            )));
        }
        Ok(vectors.into_iter().map(SimilarityVector::new).collect())
    }

    pub fn similarity(&self, a: &SimilarityVector, b: &SimilarityVector) -> Result<f32> {
        cosine_similarity(a.as_slice(), b.as_slice())
    }
}

/// Cosine similarity in [-1, 1]; zero-norm vectors score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(ResumeScorerError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    if a.is_empty() {
        return Ok(0.0);
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    let score = dot_product / (norm_a * norm_b);
    if !score.is_finite() {
        return Err(ResumeScorerError::Embedding(
            "Cosine similarity is not a finite number".to_string(),
        ));
    }

    // rounding can push identical vectors a hair past 1.0
    Ok(score.clamp(-1.0, 1.0))
}
