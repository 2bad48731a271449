//! Score fusion: keyword overlap plus semantic similarity
//!
//! ```text
//! missing          = jd_keywords - resume_keywords
//! keyword_ratio    = (|jd| - |missing|) / |jd|      (0.0 when |jd| == 0)
//! final_ratio      = keyword_ratio * 0.37 + cosine * 0.63
//! *_score          = round2(ratio * 100)
//! ```
//!
//! `round2` rounds half away from zero. `final_score` is never clamped.

use crate::processing::keywords::KeywordSet;
use serde::{Deserialize, Serialize};

pub const KEYWORD_WEIGHT: f64 = 0.37;
pub const SEMANTIC_WEIGHT: f64 = 0.63;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub keyword: f64,
    pub semantic: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            keyword: KEYWORD_WEIGHT,
            semantic: SEMANTIC_WEIGHT,
        }
    }
}

/// Scores for one resume against one job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub final_score: f64,
    pub keyword_match_score: f64,
    pub semantic_similarity_score: f64,
    pub missing_keywords: Vec<String>,
    pub total_keywords_in_jd: usize,
    pub matched_keywords: usize,
}

/// Round to two decimal places, half away from zero. Never returns `-0.0`.
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Share of job-description keywords present in the resume, in [0, 1].
pub fn keyword_match_ratio(resume_keywords: &KeywordSet, jd_keywords: &KeywordSet) -> f64 {
    if jd_keywords.is_empty() {
        return 0.0;
    }
    jd_keywords.overlap_count(resume_keywords) as f64 / jd_keywords.len() as f64
}

#[derive(Debug, Clone, Default)]
pub struct ScoreFusion {
    weights: ScoreWeights,
}

impl ScoreFusion {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> ScoreWeights {
        self.weights
    }

    /// Weighted ratio before scaling and rounding.
    pub fn final_ratio(&self, keyword_ratio: f64, cosine_similarity: f64) -> f64 {
        keyword_ratio * self.weights.keyword + cosine_similarity * self.weights.semantic
    }

    pub fn fuse(
        &self,
        resume_keywords: &KeywordSet,
        jd_keywords: &KeywordSet,
        cosine_similarity: f32,
    ) -> AnalysisResult {
        let missing_keywords = jd_keywords.missing_from(resume_keywords);
        let total_keywords_in_jd = jd_keywords.len();
        let matched_keywords = total_keywords_in_jd - missing_keywords.len();

        let keyword_ratio = keyword_match_ratio(resume_keywords, jd_keywords);
        let cosine = cosine_similarity as f64;
        let final_ratio = self.final_ratio(keyword_ratio, cosine);

        AnalysisResult {
            final_score: round2(final_ratio * 100.0),
            keyword_match_score: round2(keyword_ratio * 100.0),
            semantic_similarity_score: round2(cosine * 100.0),
            missing_keywords,
            total_keywords_in_jd,
            matched_keywords,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn set(words: &[&str]) -> KeywordSet {
        words.iter().copied().collect()
    }

    #[test]
    fn test_default_weights_are_pinned() {
        let weights = ScoreWeights::default();
        assert_eq!(weights.keyword, 0.37);
        assert_eq!(weights.semantic, 0.63);
    }

    #[test]
    fn test_round2_is_half_away_from_zero() {
        // 0.125 and 12.5 are exact in binary, so these sit on the boundary
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(68.899999), 68.9);
    }

    #[test]
    fn test_round2_has_no_negative_zero() {
        let rounded = round2(-0.00004);
        assert_eq!(rounded, 0.0);
        assert!(rounded.is_sign_positive());

        let result = ScoreFusion::default().fuse(&set(&[]), &set(&["rust"]), -1e-5);
        assert!(result.final_score.is_sign_positive());
        assert!(result.semantic_similarity_score.is_sign_positive());
    }

    #[test]
    fn test_empty_jd_keywords_force_zero_ratio() {
        let fusion = ScoreFusion::default();
        let result = fusion.fuse(&set(&["python"]), &set(&[]), 0.5);

        assert_eq!(result.keyword_match_score, 0.0);
        assert_eq!(result.total_keywords_in_jd, 0);
        assert_eq!(result.matched_keywords, 0);
        assert!(result.missing_keywords.is_empty());
        assert_eq!(result.final_score, round2(0.5 * 0.63 * 100.0));
    }

    #[test]
    fn test_missing_keywords_are_set_difference() {
        let fusion = ScoreFusion::default();
        let jd = set(&["python", "rust", "kafka", "team"]);
        let resume = set(&["python", "team", "java"]);

        let result = fusion.fuse(&resume, &jd, 0.7);

        let missing: BTreeSet<String> = result.missing_keywords.iter().cloned().collect();
        let expected: BTreeSet<String> = ["kafka", "rust"].iter().map(|s| s.to_string()).collect();
        assert_eq!(missing, expected);
        assert_eq!(result.matched_keywords + result.missing_keywords.len(), result.total_keywords_in_jd);
        assert_eq!(result.keyword_match_score, 50.0);
    }

    #[test]
    fn test_final_score_identity_over_grid() {
        let fusion = ScoreFusion::default();
        let jd = set(&["a", "b", "c", "d", "e", "f", "g", "h"]);
        let pools = ["a", "b", "c", "d", "e", "f", "g", "h"];

        for matched in 0..=pools.len() {
            let resume = set(&pools[..matched]);
            for cosine in [-1.0f32, -0.3, 0.0, 0.41, 0.77, 0.93, 1.0] {
                let result = fusion.fuse(&resume, &jd, cosine);
                let ratio = matched as f64 / 8.0;
                let expected = round2((ratio * 0.37 + cosine as f64 * 0.63) * 100.0);

                assert_eq!(result.final_score, expected);
                assert_eq!(result.keyword_match_score, round2(keyword_match_ratio(&resume, &jd) * 100.0));
            }
        }
    }

    #[test]
    fn test_final_score_not_clamped() {
        let fusion = ScoreFusion::default();
        let result = fusion.fuse(&set(&[]), &set(&["rust"]), -1.0);
        assert_eq!(result.final_score, -63.0);
        assert_eq!(result.semantic_similarity_score, -100.0);
    }

    #[test]
    fn test_final_lies_between_keyword_score_and_100() {
        let fusion = ScoreFusion::default();
        let jd = set(&["python", "streamlit", "machine", "analysis"]);
        let resume = set(&["python", "streamlit"]);

        let result = fusion.fuse(&resume, &jd, 0.8);

        assert!(result.semantic_similarity_score > result.keyword_match_score);
        assert!(result.final_score > result.keyword_match_score);
        assert!(result.final_score < 100.0);
    }
}
