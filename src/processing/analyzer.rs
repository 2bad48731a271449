//! Analysis engine: keyword extraction, semantic similarity, and score fusion

use crate::config::Config;
use crate::error::{Result, ResumeScorerError};
use crate::processing::document::{DocumentRole, TextDocument};
use crate::processing::embeddings::{SemanticEncoder, SimilarityVector};
use crate::processing::fusion::{AnalysisResult, ScoreFusion};
use crate::processing::keywords::{KeywordExtractor, KeywordSet};
use crate::processing::models::{ModelLoader, ModelRegistry};
use crate::processing::ranker::{BatchOutcome, BatchRanker, ResumeSubmission};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Non-fatal input problems that make a score less trustworthy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputWarning {
    EmptyResume,
    EmptyJobDescription,
    /// The job description has text but no nouns, so keyword match is 0.
    NoJobKeywords,
}

impl fmt::Display for InputWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputWarning::EmptyResume => write!(f, "resume text is empty"),
            InputWarning::EmptyJobDescription => write!(f, "job description text is empty"),
            InputWarning::NoJobKeywords => {
                write!(f, "no keywords found in the job description; keyword match forced to 0")
            }
        }
    }
}

/// A single analysis together with the warnings raised for its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub result: AnalysisResult,
    pub warnings: Vec<InputWarning>,
}

/// Job-description features, computed once and shared across resumes.
#[derive(Debug, Clone)]
pub struct JobProfile {
    pub keywords: KeywordSet,
    pub vector: SimilarityVector,
    pub warnings: Vec<InputWarning>,
}

/// Synchronous pipeline over already-loaded models.
#[derive(Clone)]
pub struct ResumeAnalyzer {
    keywords: KeywordExtractor,
    encoder: SemanticEncoder,
    fusion: ScoreFusion,
}

impl ResumeAnalyzer {
    pub fn new(keywords: KeywordExtractor, encoder: SemanticEncoder, fusion: ScoreFusion) -> Self {
        Self {
            keywords,
            encoder,
            fusion,
        }
    }

    pub fn keyword_extractor(&self) -> &KeywordExtractor {
        &self.keywords
    }

    pub fn profile_job(&self, job_description: &str) -> Result<JobProfile> {
        let keywords = self.keywords.extract(job_description);
        let vector = self.encoder.encode(job_description)?;
        let warnings = Self::job_warnings(job_description, &keywords);

        debug!("Job description yields {} keywords", keywords.len());

        Ok(JobProfile {
            keywords,
            vector,
            warnings,
        })
    }

    /// Score one resume against a prepared job profile.
    pub fn analyze_against(&self, job: &JobProfile, resume_text: &str) -> Result<AnalysisResult> {
        let resume_keywords = self.keywords.extract(resume_text);
        let resume_vector = self.encoder.encode(resume_text)?;
        let cosine = self.encoder.similarity(&resume_vector, &job.vector)?;

        Ok(self.fusion.fuse(&resume_keywords, &job.keywords, cosine))
    }

    /// Score one resume against one job description, encoding both together.
    pub fn analyze(&self, resume_text: &str, job_description: &str) -> Result<Analysis> {
        let jd_keywords = self.keywords.extract(job_description);
        let resume_keywords = self.keywords.extract(resume_text);

        let (resume_vector, jd_vector) = self.encoder.encode_pair(resume_text, job_description)?;
        let cosine = self.encoder.similarity(&resume_vector, &jd_vector)?;

        let mut warnings = Vec::new();
        if resume_text.trim().is_empty() {
            warnings.push(InputWarning::EmptyResume);
        }
        warnings.extend(Self::job_warnings(job_description, &jd_keywords));

        Ok(Analysis {
            result: self.fusion.fuse(&resume_keywords, &jd_keywords, cosine),
            warnings,
        })
    }

    fn job_warnings(job_description: &str, keywords: &KeywordSet) -> Vec<InputWarning> {
        if job_description.trim().is_empty() {
            vec![InputWarning::EmptyJobDescription]
        } else if keywords.is_empty() {
            vec![InputWarning::NoJobKeywords]
        } else {
            Vec::new()
        }
    }
}

/// Root service object: owns the model registry and hands out analyzers.
pub struct AnalysisEngine {
    registry: ModelRegistry,
    fusion: ScoreFusion,
    max_concurrency: usize,
}

impl AnalysisEngine {
    /// Models are not loaded until first use.
    pub fn new(config: &Config) -> Self {
        Self {
            registry: ModelRegistry::from_config(config),
            fusion: ScoreFusion::default(),
            max_concurrency: config.processing.max_concurrency.max(1),
        }
    }

    pub fn with_loader(loader: Arc<dyn ModelLoader>, max_concurrency: usize) -> Self {
        Self {
            registry: ModelRegistry::new(loader),
            fusion: ScoreFusion::default(),
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Build an analyzer, loading both models if this is the first call.
    pub async fn analyzer(&self) -> Result<ResumeAnalyzer> {
        let tagger = self.registry.tagger().await?;
        let embedder = self.registry.embedder().await?;

        Ok(ResumeAnalyzer::new(
            KeywordExtractor::new(tagger),
            SemanticEncoder::new(embedder),
            self.fusion.clone(),
        ))
    }

    pub async fn analyze(&self, resume: &TextDocument, job: &TextDocument) -> Result<Analysis> {
        Self::check_role(resume, DocumentRole::Resume)?;
        Self::check_role(job, DocumentRole::JobDescription)?;

        let analyzer = self.analyzer().await?;
        let resume_text = resume.content().to_string();
        let job_text = job.content().to_string();

        let analysis =
            tokio::task::spawn_blocking(move || analyzer.analyze(&resume_text, &job_text)).await??;

        for warning in &analysis.warnings {
            warn!("{}", warning);
        }
        Ok(analysis)
    }

    pub async fn rank(&self, job: &TextDocument, resumes: Vec<ResumeSubmission>) -> Result<BatchOutcome> {
        Self::check_role(job, DocumentRole::JobDescription)?;

        let analyzer = self.analyzer().await?;
        BatchRanker::new(analyzer, self.max_concurrency)
            .rank(job.content(), resumes)
            .await
    }

    /// Ranker with a progress bar for interactive use.
    pub async fn ranker(&self) -> Result<BatchRanker> {
        Ok(BatchRanker::new(self.analyzer().await?, self.max_concurrency))
    }

    fn check_role(document: &TextDocument, expected: DocumentRole) -> Result<()> {
        if document.role() != expected {
            return Err(ResumeScorerError::InvalidInput(format!(
                "Expected a {} but got a {}",
                expected,
                document.role()
            )));
        }
        Ok(())
    }
}
