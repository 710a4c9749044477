use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info, warn};

use crop_advisor::config::{self, Config, ConfigLoadStatus, LoadedConfig};
use crop_advisor::{RawInput, RngSource, ValidationPolicy, logging, report};

/// Contract a path by replacing the home directory with `~` for display.
fn contract_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(suffix) = path.strip_prefix(&home)
    {
        return format!("~/{}", suffix.display());
    }
    path.display().to_string()
}

#[derive(Debug, Parser)]
#[command(name = "crop-advisor", version, about = "Recommend a crop from soil and weather readings")]
struct Cli {
    /// Config file to use instead of the platform default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze readings and recommend a crop
    Recommend(RecommendArgs),
    /// List the crops that can be recommended
    Catalog {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show each reading's unit, accepted range, step, and default
    Fields,
    /// Inspect or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the config file path
    Path,
    /// Print the effective configuration as TOML
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    Reject,
    Clamp,
}

impl From<PolicyArg> for ValidationPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Reject => ValidationPolicy::Reject,
            PolicyArg::Clamp => ValidationPolicy::Clamp,
        }
    }
}

/// Readings default to 50 / 50 / 50 ppm, pH 6.5, 25.0°C, 60.0%, 200.0 mm.
#[derive(Debug, Args)]
struct RecommendArgs {
    /// Nitrogen, ppm [0, 140]
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    nitrogen: Option<i64>,
    /// Phosphorus, ppm [5, 145]
    #[arg(short = 'p', long, allow_negative_numbers = true)]
    phosphorus: Option<i64>,
    /// Potassium, ppm [5, 205]
    #[arg(short = 'k', long, allow_negative_numbers = true)]
    potassium: Option<i64>,
    /// Soil pH [0.0, 14.0]
    #[arg(long, allow_negative_numbers = true)]
    ph: Option<f64>,
    /// Temperature, °C [-10.0, 50.0]
    #[arg(long, allow_negative_numbers = true)]
    temperature: Option<f64>,
    /// Relative humidity, % [0.0, 100.0]
    #[arg(long, allow_negative_numbers = true)]
    humidity: Option<f64>,
    /// Rainfall, mm [0.0, 500.0]
    #[arg(long, allow_negative_numbers = true)]
    rainfall: Option<f64>,

    /// Seed for a reproducible recommendation
    #[arg(long)]
    seed: Option<u64>,
    /// Handling of out-of-range readings (overrides config)
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl RecommendArgs {
    fn raw_input(&self) -> RawInput {
        let defaults = RawInput::default();
        RawInput {
            nitrogen: self.nitrogen.unwrap_or(defaults.nitrogen),
            phosphorus: self.phosphorus.unwrap_or(defaults.phosphorus),
            potassium: self.potassium.unwrap_or(defaults.potassium),
            ph: self.ph.unwrap_or(defaults.ph),
            temperature_c: self.temperature.unwrap_or(defaults.temperature_c),
            humidity_pct: self.humidity.unwrap_or(defaults.humidity_pct),
            rainfall_mm: self.rainfall.unwrap_or(defaults.rainfall_mm),
        }
    }
}

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();

    // Initialize logging before anything else
    let logging_ctx = match logging::init() {
        Ok(ctx) => {
            logging::cleanup_old_logs(&ctx.log_directory);
            Some(ctx)
        }
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            None
        }
    };

    let loaded_config =
        config::load_config(cli.config.as_deref(), creates_missing_config(&cli.command));
    debug!(
        config_path = %loaded_config.config_path.display(),
        status = ?loaded_config.status,
        "config_loaded"
    );

    if let Some(ctx) = &logging_ctx
        && !ctx.filter_from_env
        && let Err(e) =
            logging::update_log_level(&ctx.reload_handle, &loaded_config.config.logging.level)
    {
        warn!(error = %e, "log_level_update_failed");
    }

    let result = run(cli.command, cli.config.is_some(), &loaded_config);

    if let Err(ref e) = result {
        warn!(error = %e, "command_failed");
    }
    if let Some(ctx) = &logging_ctx {
        info!(
            session_id = %ctx.session_id,
            duration_secs = start_time.elapsed().as_secs_f64(),
            "session_end"
        );
    }

    result
}

/// Whether loading config for `command` may write a default file.
/// `config` subcommands manage the file themselves.
fn creates_missing_config(command: &Command) -> bool {
    !matches!(command, Command::Config { .. })
}

fn run(command: Command, explicit_config: bool, loaded: &LoadedConfig) -> Result<()> {
    match command {
        Command::Recommend(args) => {
            let config = usable_config(loaded, explicit_config)?;
            run_recommend(&args, config)
        }
        Command::Catalog { format } => {
            let config = usable_config(loaded, explicit_config)?;
            let advisor = config
                .build_advisor()
                .context("Invalid configuration")?;
            let output = match format {
                OutputFormat::Text => report::render_catalog_text(advisor.catalog()),
                OutputFormat::Json => report::render_catalog_json(advisor.catalog())?,
            };
            println!("{}", output);
            Ok(())
        }
        Command::Fields => {
            println!("{}", report::render_fields_text(&RawInput::default()));
            Ok(())
        }
        Command::Config { action } => run_config(action, loaded),
    }
}

/// The loaded config, or an error when an explicitly requested file could not be used.
fn usable_config(loaded: &LoadedConfig, explicit_config: bool) -> Result<&Config> {
    if let ConfigLoadStatus::Error(ref message) = loaded.status {
        if explicit_config {
            bail!("{}: {}", loaded.config_path.display(), message);
        }
        eprintln!(
            "Warning: {} ({}); using defaults",
            message,
            contract_path(&loaded.config_path)
        );
    }
    Ok(&loaded.config)
}

fn run_recommend(args: &RecommendArgs, config: &Config) -> Result<()> {
    let mut advisor = config
        .build_advisor()
        .context("Invalid configuration")?;
    if let Some(policy) = args.policy {
        advisor = advisor.with_policy(policy.into());
    }

    let raw = args.raw_input();
    debug!(?raw, seed = ?args.seed, policy = advisor.policy().as_str(), "recommend_requested");

    let recommendation = match args.seed {
        Some(seed) => advisor.recommend_raw(raw, &mut RngSource::seeded(seed)),
        None => advisor.recommend_raw(raw, &mut RngSource::thread()),
    }?;

    let output = match args.format {
        OutputFormat::Text => report::render_text(&recommendation, advisor.optimal_conditions()),
        OutputFormat::Json => report::render_json(&recommendation, advisor.optimal_conditions())?,
    };
    println!("{}", output);
    Ok(())
}

fn run_config(action: ConfigAction, loaded: &LoadedConfig) -> Result<()> {
    match action {
        ConfigAction::Path => {
            println!("{}", loaded.config_path.display());
            if let Some(ref project) = loaded.project_config_path {
                println!("{}", project.display());
            }
            Ok(())
        }
        ConfigAction::Show => {
            let text = toml::to_string_pretty(&loaded.config)
                .context("Failed to serialize configuration")?;
            print!("{}", text);
            Ok(())
        }
        ConfigAction::Init { force } => {
            let path = &loaded.config_path;
            config::init_config(path, force).map_err(anyhow::Error::msg)?;
            println!("Wrote default config to {}", contract_path(path));
            Ok(())
        }
    }
}
