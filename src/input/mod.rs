//! Input processing module
//! Handles file detection, text extraction, normalization, and input management

pub mod file_detector;
pub mod manager;
pub mod normalizer;
pub mod text_extractor;
