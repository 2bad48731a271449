//! Input manager for handling different file types

use crate::error::{Result, ResumeScorerError};
use crate::input::file_detector::FileType;
use crate::input::normalizer::TextNormalizer;
use crate::input::text_extractor::{
    DocumentTextExtractor, MarkdownExtractor, PdfExtractor, PlainTextExtractor,
};
use crate::processing::document::{DocumentRole, TextDocument};
use crate::processing::ranker::ResumeSubmission;
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct InputManager {
    cache: HashMap<PathBuf, String>,
    enable_cache: bool,
    normalizer: TextNormalizer,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
            normalizer: TextNormalizer::new(),
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Raw extracted text, before any normalization.
    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(path) {
                debug!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(ResumeScorerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let extractor: &dyn DocumentTextExtractor = match FileType::from_path(path) {
            FileType::Pdf => &PdfExtractor,
            FileType::Text => &PlainTextExtractor,
            FileType::Markdown => &MarkdownExtractor,
            FileType::Unknown => {
                return Err(ResumeScorerError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        info!("Extracting text from: {}", path.display());
        let bytes = fs::read(path).await?;
        let text = extractor.extract(&bytes).map_err(|e| match e {
            ResumeScorerError::Extraction(msg) => {
                ResumeScorerError::Extraction(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;

        if self.enable_cache {
            self.cache.insert(path.to_path_buf(), text.clone());
        }

        Ok(text)
    }

    /// Load a document for the given role.
    ///
    /// Resumes are normalized; job descriptions are taken as written.
    pub async fn load_document(&mut self, path: &Path, role: DocumentRole) -> Result<TextDocument> {
        let text = self.extract_text(path).await?;
        let content = match role {
            DocumentRole::Resume => self.normalizer.normalize(&text),
            DocumentRole::JobDescription => text,
        };
        Ok(TextDocument::new(role, content))
    }

    /// Load every resume, keeping per-file failures instead of stopping.
    pub async fn load_resumes(&mut self, paths: &[PathBuf]) -> Vec<ResumeSubmission> {
        let mut submissions = Vec::with_capacity(paths.len());
        for path in paths {
            let id = Self::submission_id(path);
            let document = self.load_document(path, DocumentRole::Resume).await;
            submissions.push(ResumeSubmission::from_loaded(id, document));
        }
        submissions
    }

    fn submission_id(path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string())
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
