use std::collections::HashMap;
use tracing::Level;

/// Global log level plus per-scope overrides
#[derive(Debug, Clone)]
pub struct LogConfig {
    global_level: Level,
    scope_levels: HashMap<String, Level>,
}

impl LogConfig {
    pub fn new() -> Self {
        Self {
            global_level: Level::WARN,
            scope_levels: HashMap::new(),
        }
    }

    pub fn from_env(env_var_name: &str) -> Self {
        match std::env::var(env_var_name) {
            Ok(log_config) => Self::parse(&log_config),
            Err(_) => Self::new(),
        }
    }

    /// Parse a config string such as `"info,gait=debug,physics=trace"`.
    /// Unknown levels are skipped.
    pub fn parse(config_str: &str) -> Self {
        let mut config = Self::new();

        for part in config_str.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('=') {
                Some((scope, level)) => {
                    if let Some(level) = parse_level(level.trim()) {
                        config.scope_levels.insert(scope.trim().to_string(), level);
                    }
                }
                None => {
                    if let Some(level) = parse_level(part) {
                        config.global_level = level;
                    }
                }
            }
        }

        config
    }

    pub fn should_log(&self, scope: &str, level: Level) -> bool {
        let target_level = self.scope_levels.get(scope).unwrap_or(&self.global_level);
        level <= *target_level
    }

    /// Most verbose level any scope asks for
    pub fn max_level(&self) -> Level {
        self.scope_levels
            .values()
            .copied()
            .fold(self.global_level, |acc, level| acc.max(level))
    }

    pub fn global_level(&self) -> Level {
        self.global_level
    }

    pub fn set_scope_level(&mut self, scope: impl Into<String>, level: Level) {
        self.scope_levels.insert(scope.into(), level);
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_level(level_str: &str) -> Option<Level> {
    match level_str.to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

/// Initialize logging with the specified environment variable name.
/// `RUST_LOG` still drives the subscriber filter; `env_var_name` drives the
/// scoped macros (`gait_log!`, `motion_log!`, ...).
/// Example: init_logging("LOCOMOTION_LOG") or init_logging("SIM_LOG")
pub fn init_logging(env_var_name: &str) -> LogConfig {
    let config = LogConfig::from_env(env_var_name);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.max_level().as_str().to_lowercase().into()),
        )
        .try_init();

    super::set_log_config(config.clone());
    config
}
