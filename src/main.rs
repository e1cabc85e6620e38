use clap::Parser;
use rg5329_perception::app::commands::{run_apply, run_compute, ApplyReport};
use rg5329_perception::utils::error::Rg5329Error;
use rg5329_perception::utils::logger::{self, LogFormat};
use rg5329_perception::{Cli, Command, TomlConfig, TriggerOutcome};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let outcome = match &cli.command {
        Command::Compute {
            order,
            format,
            output,
        } => {
            logger::init_logger(cli.verbose, cli.log_format.unwrap_or_default());
            tracing::info!("Starting rg5329 compute");

            run_compute(order, *format, output.as_deref()).map(|report| {
                if output.is_none() {
                    print!("{}", report);
                }
            })
        }
        Command::Apply {
            order,
            config,
            dry_run,
        } => {
            // 載入 TOML 配置
            let config = match TomlConfig::from_file(config) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", config.display(), e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            };

            let format: LogFormat = cli
                .log_format
                .or_else(|| config.log_format())
                .unwrap_or_default();
            logger::init_logger(cli.verbose, format);
            tracing::info!("🚀 Starting rg5329 apply");
            if cli.verbose {
                tracing::debug!("Config: {:?}", config);
            }

            run_apply(order, &config, *dry_run).await.map(print_apply_report)
        }
    };

    if let Err(e) = outcome {
        exit_with(e);
    }

    Ok(())
}

fn print_apply_report(report: ApplyReport) {
    match report {
        ApplyReport::DryRun(plan) => println!("🔍 Dry run: {:?}", plan),
        ApplyReport::Done(TriggerOutcome::Applied { order_id, new_total }) => match new_total {
            Some(total) => println!("✅ RG5329 applied to order {} (new total ${})", order_id, total.round_dp(2)),
            None => println!("✅ RG5329 applied to order {}", order_id),
        },
        ApplyReport::Done(TriggerOutcome::Skipped(status)) => println!("✔️ No action needed: {}", status),
        ApplyReport::Done(TriggerOutcome::AlreadyApplied { order_id }) => {
            println!("✔️ RG5329 already applied to order {}", order_id)
        }
        ApplyReport::Done(TriggerOutcome::Fallback { reason, .. }) => {
            println!("⚠️ RG5329 not applied: {}", reason);
            println!("💡 Save the order in the ERP so its taxes are recalculated");
            std::process::exit(2);
        }
    }
}

fn exit_with(e: Rg5329Error) -> ! {
    tracing::error!(
        "❌ rg5329 failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    std::process::exit(e.exit_code());
}
