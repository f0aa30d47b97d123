use crate::utils::error::{CodecError, Result};
use crate::utils::validation::{validate_range, validate_whitespace, Validate};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

pub const MAX_INDENT_WIDTH: usize = 16;

fn default_indent() -> String {
    "  ".to_string()
}

/// 基礎 JSON 引擎的輸出設定，對應設定檔的 `[mapper]` 區段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    #[serde(default)]
    pub pretty: bool,
    #[serde(default = "default_indent")]
    pub indent: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: default_indent(),
        }
    }
}

impl EngineSettings {
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }
}

impl Validate for EngineSettings {
    fn validate(&self) -> Result<()> {
        validate_whitespace("mapper.indent", &self.indent)?;
        validate_range("mapper.indent", self.indent.len(), 0, MAX_INDENT_WIDTH)?;
        Ok(())
    }
}

/// 尚未安裝任何 codec 的基礎引擎：只負責把 `Value` 寫成位元組
#[derive(Debug, Clone)]
pub struct JsonEngine {
    settings: EngineSettings,
}

impl JsonEngine {
    pub fn new(settings: EngineSettings) -> Result<Self> {
        settings
            .validate()
            .map_err(|e| CodecError::construction(format!("invalid engine settings: {}", e)))?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn write(&self, value: &Value) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(128);
        if self.settings.pretty {
            let formatter = PrettyFormatter::with_indent(self.settings.indent.as_bytes());
            let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
            value.serialize(&mut serializer)?;
        } else {
            serde_json::to_writer(&mut buf, value)?;
        }
        Ok(buf)
    }
}

impl Default for JsonEngine {
    fn default() -> Self {
        Self {
            settings: EngineSettings::default(),
        }
    }
}
