//! Cache disque des pistes audio
//!
//! Un fichier `{root}/{item_id}.mp3` présent est toujours complet : les
//! extractions se font dans `{root}/.partial/{uuid}/` puis le résultat est
//! renommé dans le cache. Un échec ne laisse donc aucun fichier final, et
//! la requête suivante retente l'extraction.
//!
//! Chaque extraction tourne dans sa propre tâche : une requête abandonnée
//! par le client n'interrompt pas l'extraction, qui va jusqu'au succès ou
//! à l'échec. Les requêtes simultanées pour un même élément absent
//! attendent la même tâche via un canal `watch`.
//! Aucune éviction n'est faite, le cache croît sans limite.

use crate::error::{AudioCacheError, Result};
use crate::extractor::AudioExtractor;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

/// Extension des fichiers du cache
pub const AUDIO_EXTENSION: &str = "mp3";

/// Sous-répertoire des extractions en cours
pub const STAGING_DIR: &str = ".partial";

/// Résultat publié par une tâche d'extraction (`None` tant qu'elle tourne)
type Completion = watch::Receiver<Option<Result<PathBuf>>>;

type InFlight = Arc<Mutex<HashMap<String, Completion>>>;

/// Cache audio
///
/// Note : ce type est conçu pour être partagé derrière un `Arc<AudioCache>`.
pub struct AudioCache {
    root: PathBuf,
    extractor: Arc<dyn AudioExtractor>,
    /// Extractions en cours, par identifiant
    in_flight: InFlight,
}

impl AudioCache {
    /// Ouvre le cache dans `root`
    ///
    /// Crée le répertoire si besoin et supprime les restes d'extractions
    /// interrompues lors d'une exécution précédente.
    pub fn new(root: impl Into<PathBuf>, extractor: Arc<dyn AudioExtractor>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;

        let staging = root.join(STAGING_DIR);
        if staging.exists() {
            info!("Removing leftover partial extractions in {:?}", staging);
            std::fs::remove_dir_all(&staging)?;
        }

        Ok(Self {
            root,
            extractor,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Chemin du fichier audio d'un élément (qu'il existe ou non)
    pub fn file_path(&self, item_id: &str) -> PathBuf {
        self.root.join(format!("{}.{}", item_id, AUDIO_EXTENSION))
    }

    /// Vérifie qu'un identifiant ne contient que `[A-Za-z0-9_-]`
    ///
    /// Empêche toute traversée de chemin via l'identifiant.
    pub fn validate_id(item_id: &str) -> Result<()> {
        let valid = !item_id.is_empty()
            && item_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(())
        } else {
            Err(AudioCacheError::InvalidId(item_id.to_string()))
        }
    }

    pub async fn is_cached(&self, item_id: &str) -> bool {
        if Self::validate_id(item_id).is_err() {
            return false;
        }
        is_file(&self.file_path(item_id)).await
    }

    /// Garantit la présence du fichier audio et retourne son chemin
    ///
    /// Si le fichier est déjà en cache, aucune extraction n'a lieu. Sinon
    /// l'appelant attend la tâche d'extraction de l'élément, lancée au
    /// besoin ; abandonner cette attente ne l'annule pas.
    pub async fn ensure(&self, item_id: &str) -> Result<PathBuf> {
        Self::validate_id(item_id)?;

        let path = self.file_path(item_id);
        if is_file(&path).await {
            debug!("Serving cached audio file for {}", item_id);
            return Ok(path);
        }

        let mut completion = {
            let mut in_flight = self.in_flight.lock().await;
            // Un émetteur fermé sans résultat : la tâche a disparu
            let running = in_flight
                .get(item_id)
                .filter(|rx| rx.has_changed().is_ok())
                .cloned();

            match running {
                Some(rx) => {
                    debug!("Waiting for the running extraction of {}", item_id);
                    rx
                }
                None => {
                    // Une extraction a pu aboutir depuis la première vérification
                    if is_file(&path).await {
                        return Ok(path);
                    }
                    let rx = self.spawn_extraction(item_id, path);
                    in_flight.insert(item_id.to_string(), rx.clone());
                    rx
                }
            }
        };

        let outcome = completion
            .wait_for(Option::is_some)
            .await
            .map(|done| done.clone());

        match outcome {
            Ok(Some(result)) => result,
            _ => Err(AudioCacheError::extraction(
                item_id,
                "extraction task ended without a result",
            )),
        }
    }

    /// Lance l'extraction dans une tâche détachée
    ///
    /// La tâche publie son résultat puis retire l'élément de la map.
    fn spawn_extraction(&self, item_id: &str, path: PathBuf) -> Completion {
        let (tx, rx) = watch::channel(None);
        let extractor = self.extractor.clone();
        let staging = self
            .root
            .join(STAGING_DIR)
            .join(uuid::Uuid::new_v4().to_string());
        let in_flight = self.in_flight.clone();
        let item_id = item_id.to_string();

        tokio::spawn(async move {
            let result = extract_into_cache(extractor.as_ref(), &item_id, &staging, path).await;
            tx.send_replace(Some(result));
            in_flight.lock().await.remove(&item_id);
        });

        rx
    }
}

async fn extract_into_cache(
    extractor: &dyn AudioExtractor,
    item_id: &str,
    staging: &Path,
    path: PathBuf,
) -> Result<PathBuf> {
    tokio::fs::create_dir_all(staging).await?;

    let outcome = match extractor.extract(item_id, staging).await {
        Ok(produced) => promote(item_id, &produced, &path).await,
        Err(e) => Err(e),
    };

    if let Err(e) = tokio::fs::remove_dir_all(staging).await {
        warn!("Failed to remove staging directory {:?}: {}", staging, e);
    }

    match outcome {
        Ok(()) => {
            info!("✅ Audio for {} cached at {:?}", item_id, path);
            Ok(path)
        }
        Err(e) => {
            warn!("Error downloading audio for {}: {}", item_id, e);
            Err(e)
        }
    }
}

/// Déplace un fichier extrait, non vide, à son emplacement définitif
async fn promote(item_id: &str, produced: &Path, path: &Path) -> Result<()> {
    let size = match tokio::fs::metadata(produced).await {
        Ok(meta) if meta.is_file() => meta.len(),
        _ => 0,
    };
    if size == 0 {
        return Err(AudioCacheError::MissingOutput(item_id.to_string()));
    }

    tokio::fs::rename(produced, path).await?;
    Ok(())
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}
