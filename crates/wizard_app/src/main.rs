mod platform;

use std::path::PathBuf;

use clap::Parser;
use platform::logging::LogDestination;
use wizard_client::{ApiSettings, ENV_API_URL};

/// Terminal front-end for the EEG preprocessing backend.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Backend base URL
    #[arg(long, env = ENV_API_URL)]
    api_url: Option<String>,
    /// Directory where fetched visualizations are saved
    #[arg(long, default_value = "visualizations")]
    output_dir: PathBuf,
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    log_to: LogDestination,
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    platform::logging::initialize(cli.log_to, cli.verbose);

    let mut api = ApiSettings::from_env();
    if let Some(url) = cli.api_url {
        api = api.with_base_url(url);
    }

    platform::run_app(platform::AppConfig {
        api,
        output_dir: cli.output_dir,
    })
}
