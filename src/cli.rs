//! Command-line front end
//!
//! Wires configuration, catalog, formats and the validator together for the
//! `roster-check` binary.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};

use crate::catalog::{InMemoryCatalog, PlayerCatalog, PlayerFilter};
use crate::config::{Command, Config};
use crate::format::{FormatRegistry, RuleSet};
use crate::player::{Player, PlayerId, Role};
use crate::validation::{self, ValidationVerdict};

/// Parse arguments, set up logging and run the requested command
pub fn main() -> Result<ExitCode> {
    let (config, command) = Config::from_args_and_env()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    run(&config, command)
}

pub fn run(config: &Config, command: Command) -> Result<ExitCode> {
    let registry = config.build_registry()?;

    match command {
        Command::Validate {
            catalog,
            players,
            json,
        } => {
            let catalog = open_catalog(config, catalog)?;
            let ids: Vec<PlayerId> = players.into_iter().map(PlayerId).collect();
            let rules = registry.active_rules();
            let verdict = validate_ids(&catalog, &ids, &rules)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&verdict)?);
            } else {
                print!("{}", render_verdict(&verdict, &rules));
            }

            Ok(if verdict.is_legal() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Players {
            catalog,
            country,
            role,
            search,
        } => {
            let catalog = open_catalog(config, catalog)?;
            let role = role
                .map(|r| r.parse::<Role>())
                .transpose()
                .with_context(|| {
                    format!(
                        "Invalid --role, expected one of: {}",
                        Role::ALL.map(|r| r.as_str()).join(", ")
                    )
                })?;
            let filter = PlayerFilter {
                country,
                role,
                name_contains: search,
            };
            print!("{}", render_players(&catalog.list_players(&filter)));
            Ok(ExitCode::SUCCESS)
        }
        Command::Formats => {
            print!("{}", render_formats(&registry));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn open_catalog(config: &Config, cli_catalog: Option<PathBuf>) -> Result<InMemoryCatalog> {
    let path = config
        .catalog_path(cli_catalog)
        .context("No player catalog given: pass --catalog or set `catalog` in .roster.toml")?;
    let catalog = InMemoryCatalog::from_json_file(&path)?;
    Ok(catalog)
}

/// Resolve ids against the catalog and validate the resulting selection
pub fn validate_ids(
    catalog: &dyn PlayerCatalog,
    ids: &[PlayerId],
    rules: &RuleSet,
) -> Result<ValidationVerdict> {
    let players = catalog.resolve(ids)?;
    let verdict = validation::validate(&players, rules)?;
    Ok(verdict)
}

pub fn render_verdict(verdict: &ValidationVerdict, rules: &RuleSet) -> String {
    let summary = &verdict.summary;

    let mut composition: Vec<String> = summary
        .role_counts
        .iter()
        .map(|(role, count)| format!("{}: {}", role, count))
        .collect();
    composition.push(format!("Overseas: {}/{}", summary.overseas, rules.max_overseas));

    let mut out = format!(
        "Players: {}/{}\nComposition: {}\n",
        summary.total,
        rules.squad_size,
        composition.join(", ")
    );

    if verdict.is_legal() {
        out.push_str("Team is valid.\n");
    } else {
        out.push_str("Validation issues:\n");
        for violation in &verdict.violations {
            out.push_str(&format!("  - {}\n", violation));
        }
    }

    out
}

fn format_avg(avg: Option<f64>) -> String {
    avg.map(|a| format!("{:.2}", a))
        .unwrap_or_else(|| "-".to_string())
}

fn render_players(players: &[Player]) -> String {
    if players.is_empty() {
        return "No players found.\n".to_string();
    }
    players
        .iter()
        .map(|p| {
            format!(
                "{:>5}  {:<28} {:<14} {:<13} bat {:>6}  bowl {:>6}\n",
                p.id.0,
                p.name,
                p.country,
                p.role,
                format_avg(p.batting_avg),
                format_avg(p.bowling_avg)
            )
        })
        .collect()
}

fn render_formats(registry: &FormatRegistry) -> String {
    let active = registry.active_format().map(|f| f.name.as_str());
    registry
        .list_formats()
        .into_iter()
        .filter_map(|name| registry.get_format(name).map(|loaded| (name, loaded)))
        .map(|(name, loaded)| {
            let marker = if Some(name) == active { "*" } else { " " };
            let rules = &loaded.format.rules;
            format!(
                "{} {:<10} squad {} | home {} | overseas <= {} | bowlers <= {} | keepers >= {}  {}\n",
                marker,
                name,
                rules.squad_size,
                rules.home_country,
                rules.max_overseas,
                rules.max_bowlers,
                rules.min_wicketkeepers,
                loaded.format.description.as_deref().unwrap_or("")
            )
        })
        .collect()
}
