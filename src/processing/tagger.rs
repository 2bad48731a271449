//! Part-of-speech tagging backed by nlprule's English tokenizer

use crate::error::{Result, ResumeScorerError};
use crate::processing::keywords::{PartOfSpeech, PosTagger, TaggedToken};
use flate2::read::GzDecoder;
use log::info;
use nlprule::Tokenizer;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs;

/// Catalog id under which `models download` provisions the tagger.
pub const TAGGER_MODEL_ID: &str = "en-tokenizer";

/// nlprule release whose binary format matches the linked crate.
const NLPRULE_RELEASE: &str = "0.6.4";

pub fn tagger_download_url() -> String {
    format!(
        "https://github.com/bminixhofer/nlprule/releases/download/{}/en_tokenizer.bin.gz",
        NLPRULE_RELEASE
    )
}

/// Inflate a gzipped release asset into the raw tokenizer binary.
pub fn decompress_tagger(compressed: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(compressed);
    let mut binary = Vec::new();
    decoder.read_to_end(&mut binary).map_err(|e| {
        ResumeScorerError::ModelInitialization(format!("Tagging model archive is corrupt: {}", e))
    })?;
    Ok(binary)
}

/// Fetch the English tokenizer binary into `destination`.
///
/// An existing file is kept unless `force` is set. The binary is written to a
/// sibling temp file first so an interrupted download never leaves a partial model.
pub async fn download_tagger(destination: &Path, force: bool) -> Result<PathBuf> {
    if destination.exists() && !force {
        info!("Tagging model already present at {}", destination.display());
        return Ok(destination.to_path_buf());
    }

    let url = tagger_download_url();
    info!("Downloading tagging model from {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(300))
        .build()
        .map_err(|e| ResumeScorerError::ModelInitialization(format!("Failed to build HTTP client: {}", e)))?;

    let response = client.get(&url).send().await.map_err(|e| {
        ResumeScorerError::ModelInitialization(format!("Failed to download tagging model: {}", e))
    })?;
    if !response.status().is_success() {
        return Err(ResumeScorerError::ModelInitialization(format!(
            "Tagging model download returned {}",
            response.status()
        )));
    }
    let compressed = response.bytes().await.map_err(|e| {
        ResumeScorerError::ModelInitialization(format!("Failed to read tagging model: {}", e))
    })?;

    let binary = decompress_tagger(&compressed)?;

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).await?;
    }
    let partial = destination.with_extension("bin.part");
    fs::write(&partial, &binary).await?;
    fs::rename(&partial, destination).await?;

    info!("Tagging model saved to {} ({} bytes)", destination.display(), binary.len());
    Ok(destination.to_path_buf())
}

pub struct NlpruleTagger {
    tokenizer: Tokenizer,
    model_name: String,
}

impl NlpruleTagger {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ResumeScorerError::ModelInitialization(format!(
                "Tagging model not found at {} (run `resume-scorer models download {}`)",
                path.display(),
                TAGGER_MODEL_ID
            )));
        }

        let start_time = Instant::now();
        info!("Loading part-of-speech model from: {}", path.display());

        let tokenizer = Tokenizer::new(path).map_err(|e| {
            ResumeScorerError::ModelInitialization(format!(
                "Failed to load tagging model {}: {}",
                path.display(),
                e
            ))
        })?;

        info!("Tagging model loaded in {:.2?}", start_time.elapsed());

        let model_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| "nlprule".to_string());

        Ok(Self {
            tokenizer,
            model_name,
        })
    }
}

impl PosTagger for NlpruleTagger {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn tag(&self, text: &str) -> Vec<TaggedToken> {
        let mut tokens = Vec::new();

        for sentence in self.tokenizer.pipe(text) {
            for token in sentence.tokens() {
                let word = token.word();
                let surface = word.text().as_str();
                if surface.trim().is_empty() {
                    continue;
                }

                // first surviving reading after disambiguation
                let pos = word
                    .tags()
                    .iter()
                    .map(|data| data.pos().as_str())
                    .find(|tag| !tag.is_empty())
                    .map(PartOfSpeech::from_penn_tag)
                    .unwrap_or(PartOfSpeech::Other);

                tokens.push(TaggedToken::new(surface, pos));
            }
        }

        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn test_decompress_tagger_round_trips_release_archive() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"nlprule tokenizer bytes").unwrap();
        let archive = encoder.finish().unwrap();

        assert_eq!(decompress_tagger(&archive).unwrap(), b"nlprule tokenizer bytes");
    }

    #[test]
    fn test_corrupt_archive_is_initialization_failure() {
        let err = decompress_tagger(b"not gzip").err().unwrap();
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_download_keeps_existing_model_without_force() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("en_tokenizer.bin");
        std::fs::write(&path, b"local copy").unwrap();

        let kept = download_tagger(&path, false).await.unwrap();

        assert_eq!(kept, path);
        assert_eq!(std::fs::read(&path).unwrap(), b"local copy");
    }

    #[test]
    fn test_download_url_points_at_release_asset() {
        assert!(tagger_download_url().ends_with("/0.6.4/en_tokenizer.bin.gz"));
    }

    #[test]
    fn test_missing_model_is_initialization_failure() {
        let result = NlpruleTagger::load(Path::new("/nonexistent/en_tokenizer.bin"));
        assert!(matches!(
            result,
            Err(ResumeScorerError::ModelInitialization(_))
        ));
    }
}
