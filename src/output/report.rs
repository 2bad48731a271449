//! Report structures wrapping analysis and ranking results for output

use crate::processing::analyzer::Analysis;
use crate::processing::ranker::BatchOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Presentation band for a final score. Display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBand {
    Strong,
    Moderate,
    Weak,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreBand::Strong
        } else if score >= 60.0 {
            ScoreBand::Moderate
        } else if score >= 40.0 {
            ScoreBand::Weak
        } else {
            ScoreBand::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "STRONG MATCH",
            ScoreBand::Moderate => "MODERATE MATCH",
            ScoreBand::Weak => "WEAK MATCH",
            ScoreBand::Poor => "POOR MATCH",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "score-strong",
            ScoreBand::Moderate => "score-moderate",
            ScoreBand::Weak => "score-weak",
            ScoreBand::Poor => "score-poor",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub scorer_version: String,
    pub job_file: String,
    pub embedding_model: String,
    pub tagger_model: String,
}

impl ReportMetadata {
    pub fn new(job_file: impl Into<String>, embedding_model: impl Into<String>, tagger_model: impl Into<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            scorer_version: env!("CARGO_PKG_VERSION").to_string(),
            job_file: job_file.into(),
            embedding_model: embedding_model.into(),
            tagger_model: tagger_model.into(),
        }
    }
}

/// One resume scored against one job description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    pub resume_file: String,
    pub band: ScoreBand,
    pub analysis: Analysis,
}

impl AnalysisReport {
    pub fn new(metadata: ReportMetadata, resume_file: impl Into<String>, analysis: Analysis) -> Self {
        Self {
            metadata,
            resume_file: resume_file.into(),
            band: ScoreBand::from_score(analysis.result.final_score),
            analysis,
        }
    }
}

/// Many resumes ranked against one job description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingReport {
    pub metadata: ReportMetadata,
    /// Entries shown; `None` shows all.
    pub top: Option<usize>,
    pub outcome: BatchOutcome,
}

impl RankingReport {
    pub fn new(metadata: ReportMetadata, outcome: BatchOutcome, top: Option<usize>) -> Self {
        Self {
            metadata,
            top,
            outcome,
        }
    }

    pub fn visible_entries(&self) -> &[crate::processing::ranker::RankedEntry] {
        let entries = self.outcome.entries();
        match self.top {
            Some(n) => &entries[..n.min(entries.len())],
            None => entries,
        }
    }
}
