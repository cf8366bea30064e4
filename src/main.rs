// Stats probe - command line entry point

use clap::Parser;
use stats_probe::config::{self, ConfigOverrides, ProbeConfig};
use stats_probe::range::{self, parse_date};
use stats_probe::verbosity::set_verbosity_level;
use stats_probe::{StatsProbe, TimeTrackerClient, v_error, v_summary};

#[derive(Parser, Debug)]
#[command(name = "stats_probe", version, about = "Diagnostic check of the time-tracking stats API")]
struct Cli {
    /// Service root, e.g. http://localhost:8000
    #[arg(long, env = config::BASE_URL_ENV)]
    base_url: Option<String>,

    /// Bearer token used for every request
    #[arg(long, env = config::TOKEN_ENV, hide_env_values = true)]
    token: Option<String>,

    /// TOML configuration file
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: String,

    /// Start of the primary stats window (YYYY-MM-DD), defaults to the first of this month
    #[arg(long, value_parser = parse_date)]
    start_date: Option<chrono::NaiveDate>,

    /// End of the primary stats window (YYYY-MM-DD), defaults to today
    #[arg(long, value_parser = parse_date)]
    end_date: Option<chrono::NaiveDate>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Append raw requests and responses to this file
    #[arg(long)]
    api_log: Option<String>,

    /// More output (-v request details, -vv debug traces)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Exit with status 1 if any check failed
    #[arg(long)]
    strict: bool,

    /// Write a default configuration file to --config and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.init_config {
        ProbeConfig::default().save(&cli.config)?;
        println!("📋 Default configuration written to {}", cli.config);
        println!("💡 Supply the token through {} rather than the file", config::TOKEN_ENV);
        return Ok(());
    }

    let mut probe_config = match ProbeConfig::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            v_error!("❌ {}", e);
            std::process::exit(2);
        }
    };
    // clap already folded the environment into base_url/token
    probe_config.apply(ConfigOverrides {
        base_url: cli.base_url,
        token: cli.token,
        timeout_seconds: cli.timeout,
        verbosity: (cli.verbose > 0).then_some(cli.verbose),
        api_log_path: cli.api_log,
    });

    set_verbosity_level(probe_config.output.verbosity);

    if let Err(e) = probe_config.validate() {
        v_error!("❌ {}", e);
        std::process::exit(2);
    }
    probe_config.print_summary();

    let client = match TimeTrackerClient::new(&probe_config) {
        Ok(client) => client,
        Err(e) => {
            v_error!("❌ {}", e);
            std::process::exit(2);
        }
    };
    let probe = StatsProbe::new(client, range::today()).with_range(cli.start_date, cli.end_date);

    let outcome = probe.run().await;

    if cli.strict && !outcome.is_success() {
        v_summary!("🛑 Strict mode: {} check(s) failed", outcome.failures.len());
        std::process::exit(1);
    }

    Ok(())
}
