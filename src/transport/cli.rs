//! CLI transport: one-shot profile commands
//!
//! Every command returns the process exit code. Failures the user can act on
//! (missing agents, no backups, autofill disabled) are reported with a
//! dedicated code instead of an error.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

use crate::config::AppConfig;
use crate::profile::{self, config, diff, missing_agents, Preset, KNOWN_AGENTS};
use crate::storage;

pub const EXIT_OK: u8 = 0;
/// Missing agents, or nothing to diff against
pub const EXIT_ATTENTION: u8 = 2;
pub const EXIT_AUTOFILL_DISABLED: u8 = 3;

/// What `diff <profile>` compares against
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DiffAgainst {
    /// Newest backup of the profile
    LastBackup,
    /// The currently active profile
    Active,
}

#[derive(Tabled)]
struct AgentRow {
    #[tabled(rename = "Agent")]
    agent: String,
    #[tabled(rename = "Model")]
    model: String,
}

/// List profiles, marking the active one
pub fn run_list(config: &AppConfig) -> Result<u8> {
    let dir = &config.config_dir;
    let profiles = profile::discover_profiles(dir)
        .with_context(|| format!("Failed to list profiles in {}", dir.display()))?;
    let active = storage::active_profile(dir)?;

    println!("ConfigDir: {}", dir.display());
    println!("Active: {}", active.as_deref().unwrap_or("(none)"));
    println!("Profiles:");
    if profiles.is_empty() {
        println!("  (none)");
    }
    for p in &profiles {
        if active.as_deref() == Some(p.name.as_str()) {
            println!("{} {}", "*".green(), p.name.bold());
        } else {
            println!("  {}", p.name);
        }
    }
    Ok(EXIT_OK)
}

pub fn run_apply(config: &AppConfig, name: &str) -> Result<u8> {
    storage::apply_profile(&config.config_dir, name)?;
    println!("{} Applied profile {}", "✓".green(), name);
    Ok(EXIT_OK)
}

/// Report known agents without a model
pub fn run_doctor(config: &AppConfig, name: &str) -> Result<u8> {
    let path = profile::ensure_profile(&config.config_dir, name)?;
    let cfg = config::load_profile(&path)?;

    let rows: Vec<AgentRow> = KNOWN_AGENTS
        .iter()
        .map(|agent| AgentRow {
            agent: agent.to_string(),
            model: match cfg.model_of(agent).trim() {
                "" => "(missing)".to_string(),
                model => model.to_string(),
            },
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    let missing = missing_agents(&cfg, KNOWN_AGENTS);
    if missing.is_empty() {
        println!("{} All known agents have a model", "✓".green());
        return Ok(EXIT_OK);
    }
    println!("{} Missing models: {}", "!".yellow().bold(), missing.join(", "));
    Ok(EXIT_ATTENTION)
}

pub fn run_backup(config: &AppConfig, name: &str) -> Result<u8> {
    let path = storage::backup_profile(&config.config_dir, name)?;
    println!("{}", path.display());
    Ok(EXIT_OK)
}

/// List backups of a profile, newest first
pub fn run_backups(config: &AppConfig, name: &str) -> Result<u8> {
    let backups = storage::list_profile_backups(&config.config_dir, name)?;
    if backups.is_empty() {
        println!("No backups found for profile: {}", name);
    }
    for backup in backups {
        println!("{}", backup);
    }
    Ok(EXIT_OK)
}

pub fn run_restore(config: &AppConfig, name: &str, from: &str) -> Result<u8> {
    let pre = storage::restore_profile_from_backup(&config.config_dir, name, from)?;
    println!("{} Restored profile {} from {}", "✓".green(), name, from);
    println!("Previous content saved to {}", pre.display());
    Ok(EXIT_OK)
}

/// Diff a profile against its newest backup or the active profile, or two
/// profiles against each other
pub fn run_diff(
    config: &AppConfig,
    name: Option<&str>,
    against: DiffAgainst,
    between: Option<(&str, &str)>,
) -> Result<u8> {
    let dir = &config.config_dir;
    if let Some((a, b)) = between {
        print_diff(&diff::diff_profiles(dir, a, b)?);
        return Ok(EXIT_OK);
    }
    let Some(name) = name else {
        bail!("profile name required (or use --between <A> <B>)");
    };

    let text = match against {
        DiffAgainst::LastBackup => {
            let Some(backup) = storage::latest_profile_backup(dir, name)? else {
                println!("No backups found for profile: {}", name);
                return Ok(EXIT_ATTENTION);
            };
            diff::diff_profile_against_file(dir, name, &backup)?
        }
        DiffAgainst::Active => {
            let Some(active) = storage::active_profile(dir)? else {
                println!("No active profile to diff against.");
                return Ok(EXIT_ATTENTION);
            };
            diff::diff_profiles(dir, &active, name)?
        }
    };
    print_diff(&text);
    Ok(EXIT_OK)
}

fn print_diff(text: &str) {
    if text.trim().is_empty() {
        println!("No differences.");
    } else {
        print!("{}", text);
    }
}

/// Fill missing agent models from a preset, backing up the profile first
pub fn run_autofill(config: &AppConfig, name: &str, preset: &str) -> Result<u8> {
    if !config.enable_autofill {
        eprintln!(
            "{} Autofill disabled. Run with --enable-autofill.",
            "error:".red().bold()
        );
        return Ok(EXIT_AUTOFILL_DISABLED);
    }
    let preset = Preset::by_name(preset)?;
    let path = profile::ensure_profile(&config.config_dir, name)?;
    let mut cfg = config::load_profile(&path)?;

    let missing = missing_agents(&cfg, KNOWN_AGENTS);
    if !profile::apply_autofill(&mut cfg, KNOWN_AGENTS, preset) {
        println!("No missing models to autofill.");
        return Ok(EXIT_OK);
    }
    let backup = storage::backup_profile(&config.config_dir, name)?;
    config::save_profile(&path, &cfg)?;
    tracing::info!("Autofilled {} agents in {}", missing.len(), name);
    println!(
        "{} Autofilled {} agents with {} ({})",
        "✓".green(),
        missing.len(),
        preset.name,
        preset.model
    );
    println!("Backup: {}", display_name(&backup));
    Ok(EXIT_OK)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
