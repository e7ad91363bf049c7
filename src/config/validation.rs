use thiserror::Error;

use super::models::Config;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("backend.base_url must be an http or https URL, got '{0}'")]
    InvalidBaseUrl(String),

    #[error("session.health_poll_secs must be greater than zero")]
    ZeroHealthPollInterval,

    #[error("limits.latency_window must be greater than zero")]
    ZeroLatencyWindow,

    #[error("limits.event_log_capacity must be greater than zero")]
    ZeroEventLogCapacity,
}

pub fn validate(config: &Config) -> Result<(), ValidationError> {
    let base_url = config.backend.base_url.trim();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ValidationError::InvalidBaseUrl(base_url.to_string()));
    }

    if config.session.health_poll_secs == 0 {
        return Err(ValidationError::ZeroHealthPollInterval);
    }

    if config.limits.latency_window == 0 {
        return Err(ValidationError::ZeroLatencyWindow);
    }

    if config.limits.event_log_capacity == 0 {
        return Err(ValidationError::ZeroEventLogCapacity);
    }

    Ok(())
}
