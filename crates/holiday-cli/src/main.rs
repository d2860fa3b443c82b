//! `calcomp`: resolve calendar events and write the holiday audit export.
//!
//! ## Usage
//!
//! ```sh
//! # Resolve the settings' year, writing holiday_export_<YEAR>.csv to the current directory
//! calcomp resolve --settings settings.json --rules country_rules.json
//!
//! # Several years, extra countries and a provider cache
//! calcomp resolve -s settings.json -r country_rules.json --provider-dir cache/ \
//!     --year 2026 --year 2027 --countries DE,RO --export-dir out/
//!
//! # Resolved events as JSON
//! calcomp resolve -s settings.json -r country_rules.json --json
//!
//! # Date of one named rule
//! calcomp feast mothering_sunday --year 2026
//!
//! # Colour legend
//! calcomp legend -s settings.json -r country_rules.json
//! ```
//!
//! Exit status is 0 on success, 1 on a fatal error or failed export, and 2 when
//! any region referenced an unknown rule.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use holiday_engine::audit::audit_file_name;
use holiday_engine::error::EngineError;
use holiday_engine::settings::InternationalDays;
use holiday_engine::{
    compute_moveable_feast, EngineConfig, HolidayProvider, JsonDirProvider, NoProvider, Resolution,
    Resolver, RuleSet, Settings,
};
use tracing_subscriber::EnvFilter;

const EXIT_FAILURE: u8 = 1;
const EXIT_UNKNOWN_RULE: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "calcomp",
    version,
    about = "Holiday and event rule resolution for print calendars"
)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve events and write holiday_export_<YEAR>.csv for each year
    Resolve {
        #[command(flatten)]
        run: RunArgs,
        /// Directory that receives the audit export
        #[arg(long, default_value = ".")]
        export_dir: PathBuf,
        /// Print the resolved events as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Print the colour legend for the resolved events
    Legend {
        #[command(flatten)]
        run: RunArgs,
    },
    /// Print the date of a moveable feast or weekday rule
    Feast {
        /// Rule identifier, e.g. easter_sunday or third_sunday_june
        rule: String,
        #[arg(short, long)]
        year: i32,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Settings document (JSON)
    #[arg(short, long)]
    settings: Option<PathBuf>,
    /// Country rule set (JSON)
    #[arg(short, long)]
    rules: Option<PathBuf>,
    /// Directory of cached provider dumps named <REGION>_<kind>_<YEAR>.json
    #[arg(long)]
    provider_dir: Option<PathBuf>,
    /// Target year; repeat to resolve several years (overrides the settings)
    #[arg(short, long = "year")]
    years: Vec<i32>,
    /// Local country or region code
    #[arg(long)]
    local: Option<String>,
    /// Comma-separated extra region codes; switches the country list on
    #[arg(long, value_delimiter = ',')]
    countries: Vec<String>,
    /// Include every international day subset
    #[arg(long)]
    international: bool,
    /// Include retro-computing anniversaries
    #[arg(long)]
    retro: bool,
    /// Include religious holidays and Christian feasts
    #[arg(long)]
    religious: bool,
    /// Include the local region's public holidays and cultural observances
    #[arg(long)]
    national: bool,
    /// Custom events file; repeatable, switches custom events on
    #[arg(long = "custom")]
    custom_files: Vec<PathBuf>,
    /// Merge identical holidays across regions
    #[arg(long, conflicts_with = "no_merge")]
    merge: bool,
    /// Keep one record per region
    #[arg(long)]
    no_merge: bool,
}

impl RunArgs {
    /// The settings document with command-line overrides applied.
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.settings {
            Some(path) => Settings::load(path)
                .with_context(|| format!("Failed to load settings: {}", path.display()))?,
            None => Settings::default(),
        };

        if let Some(local) = &self.local {
            settings.local_country = local.clone();
        }
        if !self.countries.is_empty() {
            settings
                .include_country_list
                .countries
                .extend(self.countries.iter().cloned());
            settings.include_days.country_list = true;
        }
        if !self.custom_files.is_empty() {
            settings.custom_event_files.extend(self.custom_files.iter().cloned());
            settings.include_days.custom_events = true;
        }
        if self.international {
            settings.include_days.international = InternationalDays::all();
        }
        settings.include_days.retro |= self.retro;
        settings.include_days.religious |= self.religious;
        settings.include_days.national |= self.national;
        if self.merge {
            settings.merge_identical_holidays = true;
        }
        if self.no_merge {
            settings.merge_identical_holidays = false;
        }
        Ok(settings)
    }

    fn configs(&self) -> Result<Vec<EngineConfig>> {
        let settings = self.settings()?;
        if self.years.is_empty() {
            let config = settings
                .to_config(None)
                .context("No usable target year: pass --year or set \"year\" in the settings")?;
            return Ok(vec![config]);
        }
        self.years
            .iter()
            .map(|year| {
                settings
                    .to_config(Some(*year))
                    .with_context(|| format!("Invalid configuration for {year}"))
            })
            .collect()
    }

    fn rules(&self) -> Result<RuleSet> {
        match &self.rules {
            Some(path) => RuleSet::load(path)
                .with_context(|| format!("Failed to load rule set: {}", path.display())),
            None => Ok(RuleSet::default()),
        }
    }

    fn provider(&self) -> Box<dyn HolidayProvider> {
        match &self.provider_dir {
            Some(dir) => Box::new(JsonDirProvider::new(dir.clone())),
            None => Box::new(NoProvider),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr so `--json` output stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Resolve {
            run,
            export_dir,
            json,
        } => run_resolve(run, export_dir, *json),
        Commands::Legend { run } => run_legend(run),
        Commands::Feast { rule, year } => run_feast(rule, *year),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// Resolve every requested year, optionally writing the audit export.
fn resolve_years(run: &RunArgs, export_dir: Option<&Path>) -> Result<Vec<Resolution>> {
    let configs = run.configs()?;
    let rules = run.rules()?;
    let provider = run.provider();
    let resolver = Resolver::new(&rules, provider.as_ref());

    configs
        .iter()
        .map(|config| {
            let resolution = match export_dir {
                Some(dir) => resolver.resolve_and_export(config, dir),
                None => resolver.resolve(config),
            };
            resolution.with_context(|| format!("Failed to resolve {}", config.year))
        })
        .collect()
}

/// Exit status for a set of resolutions: unknown rules outrank export failures.
fn exit_code(resolutions: &[Resolution]) -> u8 {
    let mut code = 0;
    for resolution in resolutions {
        if let Err(e) = resolution.ensure_rules_resolved() {
            tracing::error!(year = resolution.year, "{e}");
            return EXIT_UNKNOWN_RULE;
        }
        if resolution
            .issues
            .iter()
            .any(|issue| matches!(issue.error, EngineError::AuditWrite { .. }))
        {
            code = EXIT_FAILURE;
        }
    }
    code
}

fn run_resolve(run: &RunArgs, export_dir: &Path, json: bool) -> Result<u8> {
    let resolutions = resolve_years(run, Some(export_dir))?;

    if json {
        let doc: Vec<serde_json::Value> = resolutions
            .iter()
            .map(|r| serde_json::json!({ "year": r.year, "events": r.events }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        for resolution in &resolutions {
            println!(
                "{}: {} events, {} issues -> {}",
                resolution.year,
                resolution.events.len(),
                resolution.issues.len(),
                export_dir.join(audit_file_name(resolution.year)).display()
            );
        }
    }

    Ok(exit_code(&resolutions))
}

fn run_legend(run: &RunArgs) -> Result<u8> {
    let resolutions = resolve_years(run, None)?;
    let mut entries: Vec<_> = resolutions.iter().flat_map(Resolution::legend).collect();
    entries.sort();
    entries.dedup();

    for entry in &entries {
        let region = entry.region.as_ref().map(|r| r.as_str()).unwrap_or("-");
        println!(
            "{:<16} {:<8} {}",
            entry.category.as_str(),
            region,
            entry.colour.as_str()
        );
    }
    Ok(exit_code(&resolutions))
}

fn run_feast(rule: &str, year: i32) -> Result<u8> {
    let date = compute_moveable_feast(year, rule)
        .with_context(|| format!("Cannot compute `{rule}` for {year}"))?;
    println!("{date}");
    Ok(0)
}
