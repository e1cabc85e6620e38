pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{Cli, Command};

#[cfg(feature = "cli")]
mod cli {
    use crate::app::report::ReportFormat;
    use crate::utils::logger::LogFormat;
    use clap::{Parser, Subcommand};
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "rg5329")]
    #[command(about = "RG5329 perception preview and trigger for ERP orders")]
    pub struct Cli {
        /// Enable verbose output
        #[arg(short, long, global = true)]
        pub verbose: bool,

        /// Log output format; overrides [logging] in the config file
        #[arg(long, value_enum, global = true)]
        pub log_format: Option<LogFormat>,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Compute the RG5329 preview for an order snapshot
        Compute {
            /// Path to the JSON order snapshot
            #[arg(short, long)]
            order: PathBuf,

            #[arg(short, long, value_enum, default_value = "text")]
            format: ReportFormat,

            /// Write the report to a file instead of stdout
            #[arg(long)]
            output: Option<PathBuf>,
        },
        /// Ask the ERP to apply RG5329 to the order when it qualifies
        Apply {
            /// Path to the JSON order snapshot
            #[arg(short, long)]
            order: PathBuf,

            /// Path to TOML configuration file
            #[arg(short, long, default_value = "rg5329.toml")]
            config: PathBuf,

            /// Show what would happen without calling the ERP
            #[arg(long)]
            dry_run: bool,
        },
    }
}
