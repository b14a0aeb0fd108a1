//! Concierge CLI binary entry point.

use clap::Parser;
use concierge::chef::ChefAssistant;
use concierge::cli::{ChefArgs, Cli, Commands, WeddingArgs};
use concierge::config::ConciergeConfig;
use concierge::planner::WeddingPlanner;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match load_config(&cli) {
        Ok(config) => match cli.command {
            Commands::Chef(args) => handle_chef(&config, args).await,
            Commands::Wedding(args) => handle_wedding(&config, args).await,
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<ConciergeConfig, Box<dyn std::error::Error>> {
    let mut config = ConciergeConfig::load(cli.config.as_deref())?;
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    tracing::info!(model = %config.model, "config loaded");
    Ok(config)
}

fn thread_id(requested: Option<String>) -> String {
    requested.unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

async fn handle_chef(
    config: &ConciergeConfig,
    args: ChefArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let chef = ChefAssistant::from_config(config)?;
    let thread_id = thread_id(args.thread_id);
    let answer = chef.ask(&thread_id, &args.prompt).await?;
    println!("{answer}");
    Ok(())
}

async fn handle_wedding(
    config: &ConciergeConfig,
    args: WeddingArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let planner = WeddingPlanner::from_config(config)?;

    let Some(prompt) = args.prompt else {
        let report = planner.plan_direct(&args.state.into_state()).await;
        println!("{report}");
        return Ok(());
    };
    let thread_id = thread_id(args.thread_id);
    tracing::info!(%thread_id, "starting coordinator turn");
    let answer = planner.plan(&thread_id, &prompt).await?;
    println!("{answer}");
    Ok(())
}
