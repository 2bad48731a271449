//! Embedding model management for downloading and managing Model2Vec models

use crate::error::{Result, ResumeScorerError};
use hf_hub::api::tokio::Api;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files a Model2Vec folder needs before it can be loaded offline.
const REQUIRED_FILES: [&str; 3] = ["model.safetensors", "tokenizer.json", "config.json"];
const OPTIONAL_FILES: [&str; 1] = ["README.md"];

/// Information about an available embedding model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingModelInfo {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub description: String,
    pub dimensions: u32,
}

/// Known Model2Vec models keyed by catalog id.
pub fn embedding_catalog() -> BTreeMap<String, EmbeddingModelInfo> {
    let mut catalog = BTreeMap::new();

    catalog.insert(
        "potion-base-8M".to_string(),
        EmbeddingModelInfo {
            name: "Potion Base 8M".to_string(),
            repo_id: "minishlab/potion-base-8M".to_string(),
            size_mb: 33,
            description: "General-purpose static embeddings distilled from a sentence transformer".to_string(),
            dimensions: 256,
        },
    );

    catalog.insert(
        "potion-retrieval-32M".to_string(),
        EmbeddingModelInfo {
            name: "Potion Retrieval 32M".to_string(),
            repo_id: "minishlab/potion-retrieval-32M".to_string(),
            size_mb: 128,
            description: "Larger static model tuned for retrieval".to_string(),
            dimensions: 512,
        },
    );

    catalog.insert(
        "m2v-base".to_string(),
        EmbeddingModelInfo {
            name: "Model2Vec Base".to_string(),
            repo_id: "minishlab/M2V_base_output".to_string(),
            size_mb: 90,
            description: "Legacy Model2Vec base embeddings model".to_string(),
            dimensions: 256,
        },
    );

    catalog
}

/// Resolve a catalog id, repo id, or display name (case-insensitive).
pub fn resolve_catalog_entry(input: &str) -> Option<(String, EmbeddingModelInfo)> {
    let catalog = embedding_catalog();
    let input_lower = input.to_lowercase();

    catalog.into_iter().find(|(id, info)| {
        id == input || info.repo_id == input || info.name.to_lowercase() == input_lower
    })
}

/// Manager for embedding models - handles download, removal, and inspection
pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    available_models: BTreeMap<String, EmbeddingModelInfo>,
    downloaded_models: BTreeSet<String>,
}

impl EmbeddingModelManager {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).await?;
        }

        let mut manager = Self {
            models_dir,
            available_models: embedding_catalog(),
            downloaded_models: BTreeSet::new(),
        };

        manager.scan_downloaded_models().await?;

        Ok(manager)
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() && Self::is_complete_model_dir(&entry.path()).await {
                self.downloaded_models
                    .insert(entry.file_name().to_string_lossy().to_string());
            }
        }

        Ok(())
    }

    async fn is_complete_model_dir(path: &Path) -> bool {
        for file in REQUIRED_FILES {
            if fs::metadata(path.join(file)).await.is_err() {
                return false;
            }
        }
        true
    }

    /// Download a catalog model into `models_dir/<id>`.
    pub async fn download_model(&mut self, model_id: &str, force: bool) -> Result<PathBuf> {
        let (model_id, model_info) = resolve_catalog_entry(model_id).ok_or_else(|| {
            ResumeScorerError::InvalidInput(format!("Unknown embedding model: {}", model_id))
        })?;

        let model_dir = self.models_dir.join(&model_id);

        if self.downloaded_models.contains(&model_id) && !force {
            info!("Embedding model {} already present", model_id);
            return Ok(model_dir);
        }

        info!(
            "Downloading embedding model {} ({} MB) from {}",
            model_info.name, model_info.size_mb, model_info.repo_id
        );

        fs::create_dir_all(&model_dir).await?;

        let api = Api::new().map_err(|e| {
            ResumeScorerError::ModelInitialization(format!("Failed to initialize HF API: {}", e))
        })?;
        let repo = api.model(model_info.repo_id.clone());

        for file in REQUIRED_FILES.iter().chain(OPTIONAL_FILES.iter()) {
            match repo.get(file).await {
                Ok(cached_path) => {
                    fs::copy(&cached_path, model_dir.join(file)).await?;
                    info!("  downloaded {}", file);
                }
                Err(e) if OPTIONAL_FILES.contains(file) => {
                    info!("  optional file {} not found: {}", file, e);
                }
                Err(e) => {
                    return Err(ResumeScorerError::ModelInitialization(format!(
                        "Failed to download required file {}: {}",
                        file, e
                    )));
                }
            }
        }

        self.downloaded_models.insert(model_id.clone());
        Ok(model_dir)
    }

    pub async fn remove_model(&mut self, model_id: &str) -> Result<()> {
        let model_id = resolve_catalog_entry(model_id)
            .map(|(id, _)| id)
            .unwrap_or_else(|| model_id.to_string());

        if !self.downloaded_models.remove(&model_id) {
            return Err(ResumeScorerError::InvalidInput(format!(
                "Model is not downloaded: {}",
                model_id
            )));
        }

        fs::remove_dir_all(self.models_dir.join(&model_id)).await?;
        Ok(())
    }

    pub fn get_model_path(&self, model_id: &str) -> Option<PathBuf> {
        self.downloaded_models
            .contains(model_id)
            .then(|| self.models_dir.join(model_id))
    }

    pub fn list_available_models(&self) -> Vec<(&str, &EmbeddingModelInfo)> {
        self.available_models
            .iter()
            .map(|(id, info)| (id.as_str(), info))
            .collect()
    }

    pub fn list_downloaded_models(&self) -> Vec<String> {
        self.downloaded_models.iter().cloned().collect()
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        self.downloaded_models.contains(model_id)
    }
}
