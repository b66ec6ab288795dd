use clap::Parser;
use ration_calc::app::commands;
use ration_calc::utils::logger;
use ration_calc::{Cli, OutputFormat};

fn main() {
    let cli = Cli::parse();

    // 初始化日誌
    match cli.format {
        OutputFormat::Text => logger::init_cli_logger(cli.verbose),
        OutputFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("Starting ration-calc");
    if cli.verbose {
        tracing::debug!("CLI args: {:?}", cli);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match commands::execute(&cli, &mut out) {
        Ok(verdict) => {
            if let Some(verdict) = verdict {
                tracing::info!("✅ Check completed with verdict {}", verdict);
            }
        }
        Err(e) => {
            tracing::error!("❌ Command failed: {} (Category: {:?})", e, e.category());
            tracing::debug!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("{}", e.user_friendly_message());
            std::process::exit(1);
        }
    }
}
