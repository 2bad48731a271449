//! Batch ranking of many resumes against one job description

use crate::error::{Result, ResumeScorerError};
use crate::processing::analyzer::{InputWarning, JobProfile, ResumeAnalyzer};
use crate::processing::document::TextDocument;
use crate::processing::fusion::AnalysisResult;
use indicatif::ProgressBar;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// One resume entering a batch. Loading may already have failed.
pub struct ResumeSubmission {
    pub id: String,
    pub document: Result<TextDocument>,
}

impl ResumeSubmission {
    pub fn text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            document: Ok(TextDocument::resume(text)),
        }
    }

    pub fn from_loaded(id: impl Into<String>, document: Result<TextDocument>) -> Self {
        Self {
            id: id.into(),
            document,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FailureReason {
    EmptyText,
    Extraction(String),
    Analysis(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::EmptyText => write!(f, "no text could be extracted"),
            FailureReason::Extraction(msg) => write!(f, "extraction failed: {}", msg),
            FailureReason::Analysis(msg) => write!(f, "analysis failed: {}", msg),
        }
    }
}

impl From<ResumeScorerError> for FailureReason {
    fn from(err: ResumeScorerError) -> Self {
        match err {
            ResumeScorerError::Extraction(msg) => FailureReason::Extraction(msg),
            other => FailureReason::Extraction(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    /// Position in the submitted sequence.
    pub index: usize,
    pub id: String,
    pub reason: FailureReason,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub id: String,
    pub result: AnalysisResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedBatchResult {
    pub entries: Vec<RankedEntry>,
    pub failures: Vec<BatchFailure>,
    pub warnings: Vec<InputWarning>,
}

/// Outcome of one batch: a ranking, or an explicit "no results".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    Ranked(RankedBatchResult),
    NoResults {
        failures: Vec<BatchFailure>,
        warnings: Vec<InputWarning>,
    },
}

impl BatchOutcome {
    pub fn failures(&self) -> &[BatchFailure] {
        match self {
            BatchOutcome::Ranked(ranked) => &ranked.failures,
            BatchOutcome::NoResults { failures, .. } => failures,
        }
    }

    pub fn warnings(&self) -> &[InputWarning] {
        match self {
            BatchOutcome::Ranked(ranked) => &ranked.warnings,
            BatchOutcome::NoResults { warnings, .. } => warnings,
        }
    }

    pub fn entries(&self) -> &[RankedEntry] {
        match self {
            BatchOutcome::Ranked(ranked) => &ranked.entries,
            BatchOutcome::NoResults { .. } => &[],
        }
    }
}

/// A scored resume still carrying its submission index.
struct Scored {
    index: usize,
    id: String,
    result: AnalysisResult,
}

/// Score descending, then submission order ascending.
fn ranking_order(a: &Scored, b: &Scored) -> Ordering {
    b.result
        .final_score
        .total_cmp(&a.result.final_score)
        .then(a.index.cmp(&b.index))
}

fn into_ranked(mut scored: Vec<Scored>) -> Vec<RankedEntry> {
    scored.sort_by(ranking_order);
    scored
        .into_iter()
        .enumerate()
        .map(|(position, s)| RankedEntry {
            rank: position + 1,
            id: s.id,
            result: s.result,
        })
        .collect()
}

pub struct BatchRanker {
    analyzer: Arc<ResumeAnalyzer>,
    semaphore: Arc<Semaphore>,
    progress: Option<ProgressBar>,
}

impl BatchRanker {
    /// `max_concurrency` bounds how many resumes are analysed at once.
    pub fn new(analyzer: ResumeAnalyzer, max_concurrency: usize) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            semaphore: Arc::new(Semaphore::new(max_concurrency.max(1))),
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub async fn rank(&self, job_description: &str, resumes: Vec<ResumeSubmission>) -> Result<BatchOutcome> {
        let submitted = resumes.len();
        info!("Ranking {} resumes", submitted);

        let job = {
            let analyzer = Arc::clone(&self.analyzer);
            let text = job_description.to_string();
            tokio::task::spawn_blocking(move || analyzer.profile_job(&text)).await??
        };
        for warning in &job.warnings {
            warn!("{}", warning);
        }
        let job = Arc::new(job);

        let mut failures = Vec::new();
        let mut tasks = JoinSet::new();

        for (index, submission) in resumes.into_iter().enumerate() {
            let text = match submission.document {
                Ok(document) if document.is_blank() => {
                    failures.push(BatchFailure {
                        index,
                        id: submission.id,
                        reason: FailureReason::EmptyText,
                    });
                    self.tick();
                    continue;
                }
                Ok(document) => document.into_content(),
                Err(e) => {
                    failures.push(BatchFailure {
                        index,
                        id: submission.id,
                        reason: FailureReason::from(e),
                    });
                    self.tick();
                    continue;
                }
            };

            let permit = Arc::clone(&self.semaphore)
                .acquire_owned()
                .await
                .map_err(|e| ResumeScorerError::Processing(format!("Worker pool closed: {}", e)))?;
            let analyzer = Arc::clone(&self.analyzer);
            let job = Arc::clone(&job);
            let id = submission.id;

            tasks.spawn_blocking(move || {
                let _permit = permit;
                let outcome = Self::analyze_one(&analyzer, &job, &text);
                (index, id, outcome)
            });
        }

        let mut scored = Vec::with_capacity(submitted);
        while let Some(joined) = tasks.join_next().await {
            let (index, id, outcome) = joined?;
            self.tick();
            match outcome {
                Ok(result) => scored.push(Scored { index, id, result }),
                Err(reason) => failures.push(BatchFailure { index, id, reason }),
            }
        }

        failures.sort_by_key(|failure| failure.index);
        for failure in &failures {
            warn!("Skipping {}: {}", failure.id, failure.reason);
        }
        if let Some(progress) = &self.progress {
            progress.finish_and_clear();
        }

        let warnings = job.warnings.clone();
        if scored.is_empty() {
            info!("No resumes could be ranked ({} failures)", failures.len());
            return Ok(BatchOutcome::NoResults { failures, warnings });
        }

        info!("Ranked {} of {} resumes", scored.len(), submitted);
        Ok(BatchOutcome::Ranked(RankedBatchResult {
            entries: into_ranked(scored),
            failures,
            warnings,
        }))
    }

    fn analyze_one(
        analyzer: &ResumeAnalyzer,
        job: &JobProfile,
        text: &str,
    ) -> std::result::Result<AnalysisResult, FailureReason> {
        match std::panic::catch_unwind(AssertUnwindSafe(|| analyzer.analyze_against(job, text))) {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => Err(FailureReason::Analysis(e.to_string())),
            Err(_) => Err(FailureReason::Analysis("analysis panicked".to_string())),
        }
    }

    fn tick(&self) {
        if let Some(progress) = &self.progress {
            progress.inc(1);
        }
    }
}
