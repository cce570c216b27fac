use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub retry: RetryConfig,
    pub repair: RepairConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

/// Bounded retry policy for idempotent reads. Writes are never auto-retried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

/// Counter-drift repair pass settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairConfig {
    pub auto_repair: bool,
    pub interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite:data/campus_events.db".to_string(),
                max_connections: 5,
                connection_timeout: 30,
            },
            retry: RetryConfig::default(),
            repair: RepairConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_ms: 200,
        }
    }
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            auto_repair: true,
            interval_secs: 300, // 5 minutes
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("CAMPUS_DATABASE_URL") {
            if !v.trim().is_empty() {
                cfg.database.url = v;
            }
        }
        if let Ok(v) = std::env::var("CAMPUS_DATABASE_MAX_CONNECTIONS") {
            if let Some(value) = parse_u32(&v) {
                cfg.database.max_connections = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("CAMPUS_RETRY_MAX_ATTEMPTS") {
            if let Some(value) = parse_u32(&v) {
                cfg.retry.max_attempts = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("CAMPUS_RETRY_BACKOFF_MS") {
            if let Some(value) = parse_u64(&v) {
                cfg.retry.backoff_ms = value;
            }
        }
        if let Ok(v) = std::env::var("CAMPUS_AUTO_REPAIR") {
            cfg.repair.auto_repair = parse_bool(&v, cfg.repair.auto_repair);
        }
        if let Ok(v) = std::env::var("CAMPUS_REPAIR_INTERVAL_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.repair.interval_secs = value.max(1);
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.url.trim().is_empty() {
            return Err("Database url must not be empty".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if self.retry.max_attempts == 0 {
            return Err("Retry max_attempts must be greater than 0".to_string());
        }
        if self.repair.auto_repair && self.repair.interval_secs == 0 {
            return Err("Repair interval_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_u32(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok()
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_max_connections_rejected() {
        let mut cfg = AppConfig::default();
        cfg.database.max_connections = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_repair_interval_rejected_when_auto_repair_on() {
        let mut cfg = AppConfig::default();
        cfg.repair.interval_secs = 0;
        assert!(cfg.validate().is_err());
        cfg.repair.auto_repair = false;
        assert!(cfg.validate().is_ok());
    }
}
