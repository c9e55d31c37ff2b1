use clap::Parser;
use overscribe::app;
use overscribe::cli::{Cli, Commands};
use overscribe::config::Config;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path).with_env_overrides();

    let result = match &cli.command {
        Some(Commands::Devices) => app::run_devices_command(),
        None => app::run_listen_command(config, &cli).await,
    };

    if let Err(e) = result {
        eprintln!("overscribe: {}", e);
        std::process::exit(1);
    }
}
