use crate::core::EngineSettings;
use crate::utils::error::{CodecError, Result};
use crate::utils::validation::{validate_path, validate_required_field, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodecConfig {
    #[serde(default)]
    pub mapper: EngineSettings,
    pub fixtures: Option<FixturesConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixturesConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    /// 本 crate 的日誌等級；`--verbose` 時提升為 debug
    #[serde(default = "default_log_level")]
    pub level: String,
}

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    /// 未設定 `RUST_LOG` 時使用的 EnvFilter 指令
    pub fn filter_directive(&self, verbose: bool) -> String {
        if verbose {
            format!("bank_json_codec=debug,{}", self.level)
        } else {
            format!("bank_json_codec={}", self.level)
        }
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.level.as_str()) {
            return Err(CodecError::InvalidConfigValueError {
                field: "logging.level".to_string(),
                value: self.level.clone(),
                reason: format!("Expected one of {}", LOG_LEVELS.join(", ")),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl CodecConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CodecError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CodecError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BANK_FIXTURES})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CodecError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 取得固定資料檔路徑；未設定 `[fixtures]` 時回傳錯誤
    pub fn fixtures_path(&self) -> Result<&str> {
        validate_required_field("fixtures", &self.fixtures).map(|f| f.path.as_str())
    }
}

impl Validate for CodecConfig {
    fn validate(&self) -> Result<()> {
        self.mapper.validate()?;
        self.logging.validate()?;
        if let Some(fixtures) = &self.fixtures {
            validate_path("fixtures.path", &fixtures.path)?;
        }
        Ok(())
    }
}
