use anyhow::Context;
use bank_json_codec::app::batch::{decode_document, decode_files};
use bank_json_codec::config::Command;
use bank_json_codec::utils::{logger, validation::Validate};
use bank_json_codec::{
    bank_provider, BankDirectory, CliConfig, CodecConfig, InMemoryDirectory, MapperProvider,
};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入 TOML 配置，檔案不存在時使用預設值
    let mut config = if cli.config.exists() {
        CodecConfig::from_file(&cli.config)
            .with_context(|| format!("Failed to load config file '{}'", cli.config.display()))?
    } else {
        CodecConfig::default()
    };

    // 初始化日誌
    logger::init(&config.logging, cli.verbose);

    tracing::info!("🚀 Starting bank-codec");
    if !cli.config.exists() {
        tracing::warn!(
            "Config file '{}' not found, using defaults",
            cli.config.display()
        );
    }

    // 應用命令列覆蓋設定
    if let Some(pretty) = cli.pretty {
        config.mapper.pretty = pretty;
        tracing::info!("🔧 Pretty output overridden to: {}", pretty);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let directory: Arc<InMemoryDirectory> = match &config.fixtures {
        Some(fixtures) => Arc::new(InMemoryDirectory::from_fixture_file(&fixtures.path)?),
        None => {
            tracing::warn!("No [fixtures] configured, references will not resolve");
            Arc::new(InMemoryDirectory::new())
        }
    };

    // 在處理任何請求之前同步建立唯一的 mapper
    let provider = match bank_provider(directory.clone(), config.mapper.clone()) {
        Ok(provider) => provider,
        Err(e) => {
            tracing::error!("❌ {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(3);
        }
    };

    run(cli.command, &config, directory.as_ref(), &provider).await
}

async fn run(
    command: Command,
    config: &CodecConfig,
    directory: &InMemoryDirectory,
    provider: &MapperProvider,
) -> anyhow::Result<()> {
    let mapper = provider.get_instance();

    match command {
        Command::Encode { customer, account } => {
            config.fixtures_path()?;
            let output = match (customer, account) {
                (Some(id), _) => {
                    let customer = directory
                        .find_customer(id)
                        .with_context(|| format!("Customer {} not found in fixtures", id))?;
                    mapper.to_json_string(&customer)?
                }
                (None, Some(id)) => {
                    let account = directory
                        .find_account(id)
                        .with_context(|| format!("Account {} not found in fixtures", id))?;
                    mapper.to_json_string(&account)?
                }
                (None, None) => anyhow::bail!("Either --customer or --account is required"),
            };
            println!("{}", output);
        }
        Command::Decode { entity, file } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read '{}'", file.display()))?;
            let value = decode_document(&mapper, entity, &bytes)?;
            println!("{}", String::from_utf8(provider.mapper().to_json_vec(&value)?)?);
        }
        Command::Batch { entity, files } => {
            let total = files.len();
            let outcomes = decode_files(mapper, entity, files).await;
            let mut failed = 0;
            for outcome in outcomes {
                match outcome.result {
                    Ok(value) => println!("✅ {}: {}", outcome.path.display(), value),
                    Err(e) => {
                        failed += 1;
                        eprintln!("❌ {}: {}", outcome.path.display(), e);
                    }
                }
            }
            tracing::info!("📊 Decoded {}/{} file(s)", total - failed, total);
            if failed > 0 {
                std::process::exit(2);
            }
        }
    }

    Ok(())
}
