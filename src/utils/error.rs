use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    /// 啟動階段建立 mapper 失敗，程序不應繼續啟動
    #[error("Mapper construction failed: {message}")]
    ConstructionFailure { message: String },

    /// 線上 JSON 與實體預期的形狀不符（缺欄位、型別錯誤、參照無法解析）
    #[error("Malformed {entity} payload: {reason}")]
    MalformedPayload { entity: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

impl CodecError {
    pub fn malformed(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        CodecError::MalformedPayload {
            entity: entity.into(),
            reason: reason.into(),
        }
    }

    pub fn construction(message: impl Into<String>) -> Self {
        CodecError::ConstructionFailure {
            message: message.into(),
        }
    }

    /// 是否為客戶端送來的錯誤資料（框架應轉成 4xx 回應）
    pub fn is_client_error(&self) -> bool {
        matches!(self, CodecError::MalformedPayload { .. })
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
