use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use super::{
    config::{Config, StoreBackend},
    database::{MemoryStore, RecordStore, RedisStore},
    predictor::{HttpPredictor, Predictor},
    service::PredictionService,
};

pub struct State {
    pub config: Config,
    pub service: PredictionService,
}

impl State {
    pub async fn new(config: Config) -> Result<Arc<Self>> {
        let predictor: Arc<dyn Predictor> = Arc::new(HttpPredictor::from_config(&config)?);

        let store: Arc<dyn RecordStore> = match config.store_backend {
            StoreBackend::Redis => Arc::new(RedisStore::connect(&config.redis_url).await?),
            StoreBackend::Memory => {
                info!("Using in-memory store, records are lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::with_parts(config, predictor, store))
    }

    pub fn with_parts(
        config: Config,
        predictor: Arc<dyn Predictor>,
        store: Arc<dyn RecordStore>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            service: PredictionService::new(predictor, store),
        })
    }
}
