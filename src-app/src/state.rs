//! Application state management.

use anyhow::Context;
use qrkit_core::AppConfig;
use qrkit_engine::{EncodeOptions, Generator, QrCodeEngine, RqrrDecoder};
use qrkit_history::{HistoryStore, JsonFileStore, KeyValueStore, MemoryStore, Preferences};
use std::sync::Arc;

/// Everything a command needs, wired once at startup.
pub struct AppState {
    /// Loaded configuration
    pub config: AppConfig,

    /// Shared key/value store behind history and preferences
    pub store: Arc<dyn KeyValueStore>,

    pub history: HistoryStore,
    pub preferences: Preferences,
    pub generator: Generator,
    pub decoder: RqrrDecoder,
}

impl AppState {
    /// State backed by the JSON store file the config points at.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let path = config
            .store_path()
            .context("failed to determine store location")?;
        tracing::info!("Store file: {}", path.display());
        Ok(Self::with_store(config, Arc::new(JsonFileStore::open(path))))
    }

    /// State over an in-process store; nothing touches disk.
    pub fn in_memory(config: AppConfig) -> Self {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    /// State over an explicit store.
    pub fn with_store(config: AppConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let history = HistoryStore::new(Arc::clone(&store));
        let preferences = Preferences::new(Arc::clone(&store));
        let generator = Generator::from_config(
            Arc::new(QrCodeEngine::new()),
            history.clone(),
            &config.generator,
        );

        Self {
            config,
            store,
            history,
            preferences,
            generator,
            decoder: RqrrDecoder::new(),
        }
    }

    /// Encode options from config, coloured with the saved preferences.
    pub fn encode_options(&self) -> anyhow::Result<EncodeOptions> {
        let colors = self.preferences.colors();
        Ok(EncodeOptions::from_config(&self.config.generator)?.with_colors(colors.dark, colors.light))
    }
}
