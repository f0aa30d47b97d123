pub mod toml_config;

pub use toml_config::{CodecConfig, FixturesConfig, LogFormat, LoggingConfig};

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};

#[cfg(feature = "cli")]
mod cli {
    use crate::app::batch::EntityKind;
    use clap::{Parser, Subcommand};
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "bank-codec")]
    #[command(about = "Encode and decode simple-bank entities with the shared JSON mapper")]
    pub struct CliConfig {
        /// Path to TOML configuration file
        #[arg(short, long, default_value = "bank-codec.toml")]
        pub config: PathBuf,

        /// Override the pretty-print setting from config
        #[arg(long)]
        pub pretty: Option<bool>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Print the wire JSON of a fixture entity
        Encode {
            #[arg(long, conflicts_with = "account", required_unless_present = "account")]
            customer: Option<i64>,
            #[arg(long)]
            account: Option<i64>,
        },
        /// Decode a wire JSON file and print its canonical form
        Decode {
            #[arg(long, value_enum)]
            entity: EntityKind,
            file: PathBuf,
        },
        /// Decode many files concurrently with the same mapper
        Batch {
            #[arg(long, value_enum)]
            entity: EntityKind,
            #[arg(required = true)]
            files: Vec<PathBuf>,
        },
    }
}
