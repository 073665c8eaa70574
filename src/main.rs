use clap::Parser;
use reality_check::app::session;
use reality_check::utils::error::{CheckError, ErrorSeverity};
use reality_check::utils::logger;
use reality_check::{build_engine, CliConfig, EvaluationRequest, OutputFormat};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.format == OutputFormat::Json && !cli.verbose {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting reality-check");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 設定與金鑰錯誤在啟動時即為致命
    let engine = match cli.load_app_config().and_then(|config| build_engine(&config)) {
        Ok(engine) => engine,
        Err(e) => exit_with(&e),
    };

    let mut stdout = tokio::io::stdout();

    if cli.interactive {
        let stdin = BufReader::new(tokio::io::stdin());
        session::run_session(&engine, stdin, &mut stdout, &cli.location, cli.format).await?;
        return Ok(());
    }

    let request = EvaluationRequest::new(cli.idea.clone().unwrap_or_default(), cli.location.clone());
    if let Err(e) = session::submit(&engine, &request, cli.format, &mut stdout).await {
        exit_with(&e);
    }

    Ok(())
}

fn exit_with(e: &CheckError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
