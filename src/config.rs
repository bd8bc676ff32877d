use crate::image_classifier::models::model_config::ModelConfig;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub logger_timezone: chrono::FixedOffset,
    pub model: ModelConfig,
    /// Simulated latency of the fake camera and fake classifier.
    pub fake_device_latency: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logger_timezone: local_timezone(),
            model: ModelConfig::default(),
            fake_device_latency: Duration::from_millis(750),
        }
    }
}

fn local_timezone() -> chrono::FixedOffset {
    *chrono::Local::now().offset()
}
