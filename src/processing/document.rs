//! Plain-text documents fed into the scoring pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentRole {
    Resume,
    JobDescription,
}

impl fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentRole::Resume => write!(f, "resume"),
            DocumentRole::JobDescription => write!(f, "job description"),
        }
    }
}

/// Immutable text of one resume or job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextDocument {
    role: DocumentRole,
    content: String,
}

impl TextDocument {
    pub fn new(role: DocumentRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn resume(content: impl Into<String>) -> Self {
        Self::new(DocumentRole::Resume, content)
    }

    pub fn job_description(content: impl Into<String>) -> Self {
        Self::new(DocumentRole::JobDescription, content)
    }

    pub fn role(&self) -> DocumentRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }

    /// True when nothing but whitespace is left.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}
