//! Process-wide model instances with guarded lazy construction

use crate::config::Config;
use crate::error::{Result, ResumeScorerError};
use crate::processing::embedding_manager::resolve_catalog_entry;
use crate::processing::embeddings::{Embedder, Model2VecEmbedder};
use crate::processing::keywords::PosTagger;
use crate::processing::tagger::{download_tagger, NlpruleTagger};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Builds the tagging and embedding models. Called on the blocking pool.
pub trait ModelLoader: Send + Sync {
    fn load_tagger(&self) -> Result<Arc<dyn PosTagger>>;

    fn load_embedder(&self) -> Result<Arc<dyn Embedder>>;
}

/// Loads nlprule and Model2Vec assets from the models directory, fetching each
/// model once when it is missing locally and downloads are allowed.
pub struct PretrainedModelLoader {
    models_dir: PathBuf,
    embedding_model: String,
    tagger_model: PathBuf,
    allow_download: bool,
}

impl PretrainedModelLoader {
    pub fn from_config(config: &Config) -> Self {
        Self {
            models_dir: config.models.models_dir.clone(),
            embedding_model: config.models.embedding_model.clone(),
            tagger_model: config.models.tagger_model.clone(),
            allow_download: config.models.allow_download,
        }
    }

    fn local_embedding_dir(&self) -> Option<PathBuf> {
        let local_path = self.models_dir.join(&self.embedding_model);
        let complete = ["tokenizer.json", "model.safetensors", "config.json"]
            .iter()
            .all(|file| local_path.join(file).exists());
        complete.then_some(local_path)
    }

    fn remote_repo_id(&self) -> String {
        resolve_catalog_entry(&self.embedding_model)
            .map(|(_, info)| info.repo_id)
            .unwrap_or_else(|| self.embedding_model.clone())
    }
}

impl ModelLoader for PretrainedModelLoader {
    fn load_tagger(&self) -> Result<Arc<dyn PosTagger>> {
        let local_error = match NlpruleTagger::load(&self.tagger_model) {
            Ok(tagger) => return Ok(Arc::new(tagger)),
            Err(e) => e.to_string(),
        };

        if !self.allow_download {
            return Err(ResumeScorerError::ModelInitialization(format!(
                "{} and downloads are disabled",
                local_error
            )));
        }

        warn!("Tagging model unavailable locally ({}); fetching it once", local_error);

        // runs on the blocking pool, so the runtime handle may be blocked on
        let handle = tokio::runtime::Handle::try_current().map_err(|e| {
            ResumeScorerError::ModelInitialization(format!(
                "{}; cannot fetch without an async runtime: {}",
                local_error, e
            ))
        })?;
        handle.block_on(download_tagger(&self.tagger_model, true))?;

        Ok(Arc::new(NlpruleTagger::load(&self.tagger_model)?))
    }

    fn load_embedder(&self) -> Result<Arc<dyn Embedder>> {
        let local_error = match self.local_embedding_dir() {
            Some(path) => match Model2VecEmbedder::load(&path, &self.embedding_model) {
                Ok(model) => return Ok(Arc::new(model)),
                Err(e) => e.to_string(),
            },
            None => format!(
                "{} is not present in {}",
                self.embedding_model,
                self.models_dir.display()
            ),
        };

        if !self.allow_download {
            return Err(ResumeScorerError::ModelInitialization(format!(
                "{} and downloads are disabled",
                local_error
            )));
        }

        let repo_id = self.remote_repo_id();
        warn!("Embedding model unavailable locally ({}); fetching {}", local_error, repo_id);

        let model = Model2VecEmbedder::load(Path::new(&repo_id), &self.embedding_model)?;
        Ok(Arc::new(model))
    }
}

/// Owns the single tagging model and single embedding model of the process.
///
/// Each model is built on first request; concurrent first requests wait for
/// one construction. A failed construction leaves the slot empty.
pub struct ModelRegistry {
    loader: Arc<dyn ModelLoader>,
    tagger: OnceCell<Arc<dyn PosTagger>>,
    embedder: OnceCell<Arc<dyn Embedder>>,
}

impl ModelRegistry {
    pub fn new(loader: Arc<dyn ModelLoader>) -> Self {
        Self {
            loader,
            tagger: OnceCell::new(),
            embedder: OnceCell::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(PretrainedModelLoader::from_config(config)))
    }

    pub async fn tagger(&self) -> Result<Arc<dyn PosTagger>> {
        let tagger = self
            .tagger
            .get_or_try_init(|| async {
                let loader = Arc::clone(&self.loader);
                info!("Initializing part-of-speech tagger");
                tokio::task::spawn_blocking(move || loader.load_tagger())
                    .await
                    .map_err(|e| {
                        ResumeScorerError::ModelInitialization(format!(
                            "Tagger loader task failed: {}",
                            e
                        ))
                    })?
            })
            .await?;
        Ok(Arc::clone(tagger))
    }

    pub async fn embedder(&self) -> Result<Arc<dyn Embedder>> {
        let embedder = self
            .embedder
            .get_or_try_init(|| async {
                let loader = Arc::clone(&self.loader);
                info!("Initializing embedding model");
                tokio::task::spawn_blocking(move || loader.load_embedder())
                    .await
                    .map_err(|e| {
                        ResumeScorerError::ModelInitialization(format!(
                            "Embedding loader task failed: {}",
                            e
                        ))
                    })?
            })
            .await?;
        Ok(Arc::clone(embedder))
    }

    pub fn is_initialized(&self) -> bool {
        self.tagger.initialized() && self.embedder.initialized()
    }
}
