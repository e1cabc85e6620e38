use crate::adapters::json_rpc::{JsonRpcApplier, DEFAULT_METHOD, DEFAULT_MODEL};
use crate::core::trigger::{TriggerEngine, DEFAULT_DEBOUNCE};
use crate::domain::ports::Notifier;
use crate::utils::error::{Result, Rg5329Error};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const MAX_DEBOUNCE_MS: u64 = 60_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub rpc: RpcConfig,
    pub trigger: Option<TriggerConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    pub endpoint: String,
    pub model: Option<String>,
    pub method: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    pub debounce_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(Rg5329Error::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| Rg5329Error::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ERP_SESSION})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| Rg5329Error::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("rpc.endpoint", &self.rpc.endpoint)?;

        if let Some(model) = &self.rpc.model {
            validate_non_empty_string("rpc.model", model)?;
        }
        if let Some(method) = &self.rpc.method {
            validate_non_empty_string("rpc.method", method)?;
        }
        if let Some(timeout) = self.rpc.timeout_seconds {
            validate_range("rpc.timeout_seconds", timeout, 1, 600)?;
        }
        if let Some(debounce) = self.trigger.as_ref().and_then(|t| t.debounce_ms) {
            validate_range("trigger.debounce_ms", debounce, 0, MAX_DEBOUNCE_MS)?;
        }
        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            format
                .parse::<LogFormat>()
                .map_err(|reason| Rg5329Error::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: format.to_string(),
                    reason,
                })?;
        }

        Ok(())
    }

    pub fn model(&self) -> &str {
        self.rpc.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn method(&self) -> &str {
        self.rpc.method.as_deref().unwrap_or(DEFAULT_METHOD)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.rpc.timeout_seconds.unwrap_or(30))
    }

    /// Session ids left as an unresolved `${VAR}` placeholder are ignored.
    pub fn session_id(&self) -> Option<String> {
        self.rpc
            .session_id
            .clone()
            .filter(|s| !s.is_empty() && !s.starts_with("${"))
    }

    /// Quiet period used by [`TriggerEngine::run`]. A one-off `evaluate` does not wait.
    pub fn debounce(&self) -> Duration {
        self.trigger
            .as_ref()
            .and_then(|t| t.debounce_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_DEBOUNCE)
    }

    pub fn log_format(&self) -> Option<LogFormat> {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .and_then(|f| f.parse().ok())
    }

    pub fn build_applier(&self) -> Result<JsonRpcApplier> {
        Ok(JsonRpcApplier::new(&self.rpc.endpoint, self.timeout())?
            .with_model(self.model())
            .with_method(self.method())
            .with_session(self.session_id()))
    }

    /// Trigger wired to the configured ERP and debounce, for hosts that stream
    /// order changes into [`TriggerEngine::run`].
    pub fn build_trigger<N: Notifier>(&self, notifier: N) -> Result<TriggerEngine<JsonRpcApplier, N>> {
        Ok(TriggerEngine::with_debounce(
            self.build_applier()?,
            notifier,
            self.debounce(),
        ))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
