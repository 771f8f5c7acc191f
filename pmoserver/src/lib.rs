//! # pmoserver - Serveur web haut niveau basé sur Axum
//!
//! Cette crate fournit une abstraction simple pour démarrer le serveur HTTP
//! de la passerelle de podcasts avec Axum.
//!
//! ## Fonctionnalités
//!
//! - 🚀 **API de haut niveau** : montage de routers Axum avec `add_router()`
//! - 🔎 **Traçage des requêtes** : chaque requête est tracée via `tower-http`
//! - 📝 **Logging** : initialisation de `tracing-subscriber` avec filtre configurable
//! - ⚡ **Arrêt gracieux** : gestion propre de l'arrêt sur Ctrl+C
//!
//! ## Architecture
//!
//! - [`server`] : Implémentation du serveur principal et du builder
//! - [`logs`] : Initialisation du système de logs
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use pmoserver::{ServerBuilder, logs::{LoggingOptions, init_logging}};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     init_logging(LoggingOptions::default());
//!
//!     let mut server = ServerBuilder::new("MyServer", "http://localhost:8080", 8080).build();
//!     server
//!         .add_router("/", Router::new().route("/health", get(|| async {})))
//!         .await;
//!
//!     server.start().await?;
//!     server.wait().await;
//!     Ok(())
//! }
//! ```

pub mod logs;
pub mod server;

pub use logs::{LoggingOptions, init_logging};
pub use server::{Server, ServerBuilder, ServerInfo};
