use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::Result;
use super::theme_models::Theme;

pub const THEME_KEY: &str = "god-services-theme";

/// File-backed string key/value store for UI preferences.
#[derive(Clone)]
pub struct ThemeStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl ThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(key))
    }

    pub async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut items = self.read_all().await?;
        items.insert(key.to_string(), value.to_string());
        self.write_all(&items).await
    }

    async fn write_all(&self, items: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_string_pretty(items)?).await?;
        Ok(())
    }

    fn saved_theme(saved: Option<&String>) -> Theme {
        match saved {
            Some(saved) => saved.parse().unwrap_or_else(|e| {
                warn!("Ignoring saved theme: {}", e);
                Theme::default()
            }),
            None => Theme::default(),
        }
    }

    /// Saved theme, falling back to dark when nothing usable is stored.
    pub async fn init_theme(&self) -> Theme {
        match self.get_item(THEME_KEY).await {
            Ok(saved) => Self::saved_theme(saved.as_ref()),
            Err(e) => {
                warn!("Could not read preferences from {}: {}", self.path.display(), e);
                Theme::default()
            }
        }
    }

    /// Flips and saves the theme under one lock, so concurrent toggles
    /// each see the previous one's result.
    pub async fn toggle_theme(&self) -> Result<Theme> {
        let _guard = self.lock.lock().await;
        let mut items = self.read_all().await?;

        let theme = Self::saved_theme(items.get(THEME_KEY)).toggled();
        items.insert(THEME_KEY.to_string(), theme.as_str().to_string());
        self.write_all(&items).await?;

        debug!("Theme switched to {}", theme);
        Ok(theme)
    }
}
