use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` 優先，否則依 `[logging].level` 建立過濾器
pub fn build_filter(config: &LoggingConfig, verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directive(verbose)))
}

/// 依 `[logging].format` 選擇輸出格式：compact 寫到 stderr，json 供服務部署的日誌收集系統解析
pub fn init(config: &LoggingConfig, verbose: bool) {
    let filter = build_filter(config, verbose);
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().with_target(false).json())
            .init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_follows_config_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig {
            format: LogFormat::Json,
            level: "warn".to_string(),
        };
        assert_eq!(build_filter(&config, false).to_string(), "bank_json_codec=warn");
    }
}
