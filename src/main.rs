use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use taskdesk::cli::{Cli, Commands};
use taskdesk::commands;
use taskdesk::config::Config;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = Config::from_env();

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::run(args, config).await,
        Commands::Migrate(args) => commands::migrate::run(args, config).await,
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("taskdesk={},tower_http=info", default_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
