// Engine interactor - Waits for the streaming engine before capturing

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::ports::*;

/// Polls the engine health port until it answers or the budget runs out
pub struct EngineInteractor {
    health_port: Arc<dyn EngineHealthPort>,
    log_port: Arc<dyn LogPort>,
}

impl EngineInteractor {
    pub fn new(health_port: Arc<dyn EngineHealthPort>, log_port: Arc<dyn LogPort>) -> Self {
        Self {
            health_port,
            log_port,
        }
    }

    /// `true` once the engine answered within `budget`
    pub async fn wait_until_ready(&self, budget: Duration, poll_interval: Duration) -> bool {
        let started = Instant::now();
        loop {
            if self.health_port.is_ready().await {
                self.log_port.info("Streaming engine is ready").await;
                return true;
            }
            if started.elapsed() + poll_interval > budget {
                self.log_port
                    .error("Streaming engine did not become ready in time")
                    .await;
                return false;
            }
            self.log_port.info("Waiting for streaming engine to start...").await;
            sleep(poll_interval).await;
        }
    }
}
