//! Resume scorer library
//!
//! Scores resumes against a job description by keyword overlap and semantic
//! similarity, and ranks batches of resumes deterministically.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{Result, ResumeScorerError};
pub use processing::analyzer::{Analysis, AnalysisEngine, InputWarning, ResumeAnalyzer};
pub use processing::fusion::{AnalysisResult, ScoreFusion, ScoreWeights};
pub use processing::ranker::{BatchOutcome, BatchRanker, RankedBatchResult, ResumeSubmission};
