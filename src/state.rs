use crate::ai::{GeminiClient, Generator};
use crate::config::AppConfig;
use crate::meals::MealRecord;
use crate::progress::ProgressRecord;
use crate::store::{MemoryStore, RecordStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub ai: Arc<dyn Generator>,
    pub meals: Arc<dyn RecordStore<MealRecord>>,
    pub progress: Arc<dyn RecordStore<ProgressRecord>>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let ai = Arc::new(GeminiClient::new(config.ai.clone())?) as Arc<dyn Generator>;

        Ok(Self::from_parts(
            config,
            ai,
            Arc::new(MemoryStore::<MealRecord>::new()),
            Arc::new(MemoryStore::<ProgressRecord>::new()),
        ))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        ai: Arc<dyn Generator>,
        meals: Arc<dyn RecordStore<MealRecord>>,
        progress: Arc<dyn RecordStore<ProgressRecord>>,
    ) -> Self {
        Self {
            config,
            ai,
            meals,
            progress,
        }
    }

    #[cfg(test)]
    pub fn fake(ai: Arc<dyn Generator>) -> Self {
        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            ai: crate::config::AiConfig {
                api_key: "test".into(),
                ..Default::default()
            },
        });
        Self::from_parts(
            config,
            ai,
            Arc::new(MemoryStore::<MealRecord>::new()),
            Arc::new(MemoryStore::<ProgressRecord>::new()),
        )
    }
}
