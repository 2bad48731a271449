//! Scoring pipeline: keywords, embeddings, fusion, and batch ranking

pub mod analyzer;
pub mod document;
pub mod embedding_manager;
pub mod embeddings;
pub mod fusion;
pub mod keywords;
pub mod models;
pub mod ranker;
pub mod tagger;

#[cfg(test)]
pub(crate) mod test_support;
