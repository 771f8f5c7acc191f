// logs.rs
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Options d'initialisation du système de logging
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Directive de filtrage par défaut (ex: "info", "pmoyoutube=debug")
    ///
    /// `RUST_LOG` est prioritaire lorsqu'elle est définie.
    pub level: String,
    /// Activer la sortie couleur sur la console
    pub enable_ansi: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_ansi: true,
        }
    }
}

/// Initialise le système de logging
///
/// Retourne `false` si un subscriber global était déjà installé (cas des
/// tests qui initialisent plusieurs fois).
///
/// # Exemple
/// ```rust,no_run
/// use pmoserver::logs::{init_logging, LoggingOptions};
///
/// init_logging(LoggingOptions {
///     level: "debug".to_string(),
///     enable_ansi: false,
/// });
/// ```
pub fn init_logging(options: LoggingOptions) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&options.level))
        .unwrap_or_else(|e| {
            eprintln!("❌ Invalid log level '{}': {}, using info", options.level, e);
            EnvFilter::new("info")
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(options.enable_ansi),
        )
        .try_init()
        .is_ok()
}
