//! Integration tests for the resume scorer

mod common;

use resume_scorer::config::Config;
use resume_scorer::input::manager::InputManager;
use resume_scorer::processing::analyzer::AnalysisEngine;
use resume_scorer::processing::document::DocumentRole;
use resume_scorer::processing::ranker::{FailureReason, ResumeSubmission};
use resume_scorer::{BatchOutcome, ResumeScorerError};
use std::path::{Path, PathBuf};

const JOB: &str = "tests/fixtures/job_description.txt";

fn fixture(name: &str) -> PathBuf {
    Path::new("tests/fixtures").join(name)
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let result = manager.extract_text(path).await;
    assert!(result.is_ok());

    let text = result.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.md");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
    // Markdown markup is gone
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text1 = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let text2 = manager.extract_text(path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);

    let mut uncached = InputManager::new().with_cache(false);
    uncached.extract_text(path).await.unwrap();
    assert_eq!(uncached.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    let result = manager.extract_text(Path::new("tests/fixtures/unsupported.xyz")).await;

    assert!(matches!(result, Err(ResumeScorerError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let result = manager.extract_text(Path::new("tests/fixtures/nonexistent.txt")).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_resume_is_normalized_but_job_is_not() {
    let mut manager = InputManager::new();
    let resume = manager
        .load_document(&fixture("sample_resume.txt"), DocumentRole::Resume)
        .await
        .unwrap();
    let job = manager
        .load_document(Path::new(JOB), DocumentRole::JobDescription)
        .await
        .unwrap();

    assert!(!resume.content().contains('\n'));
    assert!(job.content().contains('\n'));
}

#[tokio::test]
async fn test_score_single_resume_end_to_end() {
    let engine = AnalysisEngine::with_loader(common::stub_loader(true), 2);
    let mut manager = InputManager::new();
    let resume = manager
        .load_document(&fixture("python_resume.txt"), DocumentRole::Resume)
        .await
        .unwrap();
    let job = manager
        .load_document(Path::new(JOB), DocumentRole::JobDescription)
        .await
        .unwrap();

    let analysis = engine.analyze(&resume, &job).await.unwrap();
    let result = analysis.result;

    assert!(analysis.warnings.is_empty());
    assert_eq!(result.total_keywords_in_jd, 8);
    assert_eq!(result.matched_keywords, 5);
    assert_eq!(result.keyword_match_score, 62.5);
    assert_eq!(result.semantic_similarity_score, 100.0);
    assert_eq!(result.missing_keywords, vec!["analysis", "engineer", "experience"]);
    assert!(result.final_score > result.keyword_match_score);
    assert!(result.final_score <= 100.0);
}

#[tokio::test]
async fn test_rank_files_with_failures() {
    let engine = AnalysisEngine::with_loader(common::stub_loader(true), 2);
    let mut manager = InputManager::new();
    let job = manager
        .load_document(Path::new(JOB), DocumentRole::JobDescription)
        .await
        .unwrap();
    let paths = vec![
        fixture("sample_resume.txt"),
        fixture("empty_resume.txt"),
        fixture("python_resume.txt"),
        fixture("unsupported.xyz"),
    ];
    let submissions = manager.load_resumes(&paths).await;

    let outcome = engine.rank(&job, submissions).await.unwrap();
    let BatchOutcome::Ranked(ranked) = outcome else {
        panic!("expected ranked results");
    };

    let ids: Vec<&str> = ranked.entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["python_resume.txt", "sample_resume.txt"]);
    assert_eq!(ranked.entries[0].rank, 1);
    assert_eq!(ranked.entries[1].rank, 2);
    assert_eq!(ranked.entries[1].result.keyword_match_score, 50.0);
    assert_eq!(
        ranked.entries[1].result.missing_keywords,
        vec!["analysis", "learning", "machine", "streamlit"]
    );

    assert_eq!(ranked.failures.len(), 2);
    assert_eq!(ranked.failures[0].index, 1);
    assert_eq!(ranked.failures[0].reason, FailureReason::EmptyText);
    assert_eq!(ranked.failures[1].id, "unsupported.xyz");
    assert!(matches!(ranked.failures[1].reason, FailureReason::Extraction(_)));
}

#[tokio::test]
async fn test_rank_without_any_usable_resume() {
    let engine = AnalysisEngine::with_loader(common::stub_loader(true), 2);
    let mut manager = InputManager::new();
    let job = manager
        .load_document(Path::new(JOB), DocumentRole::JobDescription)
        .await
        .unwrap();
    let submissions = manager
        .load_resumes(&[fixture("empty_resume.txt"), fixture("missing.pdf")])
        .await;

    let outcome = engine.rank(&job, submissions).await.unwrap();

    assert!(matches!(outcome, BatchOutcome::NoResults { .. }));
    assert!(outcome.entries().is_empty());
    assert_eq!(outcome.failures().len(), 2);
}

#[tokio::test]
async fn test_batch_scores_match_single_scores() {
    let engine = AnalysisEngine::with_loader(common::stub_loader(false), 4);
    let mut manager = InputManager::new();
    let job = manager
        .load_document(Path::new(JOB), DocumentRole::JobDescription)
        .await
        .unwrap();
    let paths = vec![
        fixture("sample_resume.txt"),
        fixture("sample_resume.md"),
        fixture("python_resume.txt"),
    ];
    let submissions = manager.load_resumes(&paths).await;

    let outcome = engine.rank(&job, submissions).await.unwrap();
    assert_eq!(outcome.entries().len(), 3);

    for entry in outcome.entries() {
        let resume = manager
            .load_document(&fixture(&entry.id), DocumentRole::Resume)
            .await
            .unwrap();
        let single = engine.analyze(&resume, &job).await.unwrap();
        assert_eq!(single.result, entry.result, "{} scored differently", entry.id);
    }

    let scores: Vec<f64> = outcome.entries().iter().map(|e| e.result.final_score).collect();
    assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[tokio::test]
async fn test_in_memory_submissions_rank_identically_twice() {
    let engine = AnalysisEngine::with_loader(common::stub_loader(false), 3);
    let job = resume_scorer::processing::document::TextDocument::job_description(
        "Rust engineer for data pipelines. Kafka and Postgres experience.",
    );
    let make = || {
        vec![
            ResumeSubmission::text("a", "Python developer, machine learning"),
            ResumeSubmission::text("b", "Data engineer building Kafka pipelines in Rust"),
            ResumeSubmission::text("c", "Postgres storage engineer"),
        ]
    };

    let first = engine.rank(&job, make()).await.unwrap();
    let second = engine.rank(&job, make()).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
#[ignore = "needs the embedding model and tagger binary under the configured models directory"]
async fn test_score_with_pretrained_models() {
    let config = Config::default();
    let engine = AnalysisEngine::new(&config);
    let mut manager = InputManager::new();
    let resume = manager
        .load_document(&fixture("python_resume.txt"), DocumentRole::Resume)
        .await
        .unwrap();
    let job = manager
        .load_document(Path::new(JOB), DocumentRole::JobDescription)
        .await
        .unwrap();

    let result = engine.analyze(&resume, &job).await.unwrap().result;

    assert!(result.total_keywords_in_jd > 0);
    assert!(result.missing_keywords.iter().all(|k| k == &k.to_lowercase()));
    assert!(result.semantic_similarity_score > 0.0);
    assert!(result.final_score <= 100.0);
}
