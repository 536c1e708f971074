use std::sync::Arc;

use time::OffsetDateTime;

use crate::config::AppConfig;

/// Shared handler state. Read-only after start-up.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        Ok(Self { config })
    }

    pub fn from_config(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Current instant in the configured reference offset.
    pub fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.config.utc_offset)
    }

    /// `requested` if the caller pinned one, otherwise [`AppState::now`].
    pub fn reference_instant(&self, requested: Option<OffsetDateTime>) -> OffsetDateTime {
        requested.unwrap_or_else(|| self.now())
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::from_config(AppConfig {
            page_size: 4,
            ..AppConfig::default()
        })
    }
}
