use bond_autopilot::cli::{build_orchestrator, print_json, Cli, Commands};
use bond_autopilot::config::Config;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            toml::from_str(include_str!("../config.toml.example"))?
        }
    };

    // Initialize telemetry
    let _telemetry = bond_autopilot::telemetry::init_telemetry(&config.telemetry)?;

    if let Commands::Config = cli.command {
        println!("Current configuration:");
        println!("  Execution: {:?}", config.execution.mode);
        println!("  Data dir: {}", config.storage.data_dir.display());
        println!(
            "  Engine: stop loss {}%, limit buffer {}%, proposal TTL {}m",
            config.engine.stop_loss_pct,
            config.engine.limit_buffer_pct,
            config.engine.proposal_ttl_minutes
        );
        println!(
            "  Initial level: {} (enabled: {})",
            config.automation.level, config.automation.enabled
        );
        return Ok(());
    }

    let orchestrator = build_orchestrator(&config).await?;

    match cli.command {
        Commands::Status => print_json(&orchestrator.status().await)?,
        Commands::Signal(args) => args.execute(&orchestrator).await?,
        Commands::Run(args) => {
            tracing::info!("Starting signal processing");
            args.execute(orchestrator.clone(), &config.engine).await?;
        }
        Commands::Proposals(args) => args.execute(&orchestrator).await?,
        Commands::Approve(args) => args.execute(&orchestrator).await?,
        Commands::Reject(args) => args.execute(&orchestrator).await?,
        Commands::KillSwitch => print_json(&orchestrator.kill_switch().await)?,
        Commands::Set(args) => args.execute(&orchestrator).await?,
        Commands::ResetStats => print_json(&orchestrator.reset_daily_stats().await)?,
        Commands::Outcome(args) => args.execute(&orchestrator).await?,
        Commands::Config => {}
    }

    Ok(())
}
