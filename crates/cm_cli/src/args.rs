// crates/cm_cli/src/args.rs
//
// Offline CLI argument surface: clap types, light validation, path checks.
// View-state flags stay raw strings here; they are parsed against the closed
// domains in main.rs so a bad sort key maps to the contract exit code rather
// than a clap usage error.

use clap::{Parser, ValueEnum};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use cm_core::{CampaignId, GoalId};

/// Output renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Render {
    #[default]
    Text,
    Json,
}

/// Log line format on stderr.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "cm",
    disable_help_subcommand = true,
    about = "Offline, deterministic campaign dashboard report"
)]
pub struct Args {
    // --- Inputs ---
    /// Dataset JSON (goals, unassigned campaigns, stored assignments).
    #[arg(long)]
    pub dataset: PathBuf,
    /// Analysis parameters JSON (thresholds, display bands, goal overlay).
    #[arg(long)]
    pub params: Option<PathBuf>,

    // --- Campaign table view ---
    /// View state as a URL query, e.g. "status=active&platform=meta&sort=spend&dir=desc".
    #[arg(long)]
    pub query: Option<String>,
    /// Status filter (all|draft|active|paused); overrides --query.
    #[arg(long)]
    pub status: Option<String>,
    /// Platform filter (all|open-web|meta|tiktok|…); overrides --query.
    #[arg(long)]
    pub platform: Option<String>,
    /// Sort key (name|goalName|authenticAdRate|impressions|spend|viewabilityRate).
    #[arg(long)]
    pub sort: Option<String>,
    /// Sort direction (asc|desc).
    #[arg(long)]
    pub dir: Option<String>,
    /// Apply a header click: same key flips direction, another key sorts ascending.
    #[arg(long)]
    pub toggle: Option<String>,

    // --- Goal list view ---
    /// Goal list query, e.g. "status=needs-attention&platform=youtube&sort=blockRate&dir=desc".
    #[arg(long)]
    pub goal_query: Option<String>,

    /// Assign a campaign to a goal for this run (CAMPAIGN=GOAL). Repeatable.
    #[arg(long = "assign", value_parser = parse_assignment)]
    pub assign: Vec<(CampaignId, GoalId)>,

    // --- Output ---
    #[arg(long, value_enum, default_value_t = Render::Text)]
    pub render: Render,
    /// Write the report into this directory instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    // --- Control ---
    /// Load and validate inputs only; build nothing.
    #[arg(long)]
    pub validate_only: bool,
    /// Silence logs and status lines.
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,
    /// Raise log level to info.
    #[arg(long)]
    pub verbose: bool,
    #[arg(long, value_enum, default_value_t = LogFormat::Human)]
    pub log_format: LogFormat,
}

/// Errors surfaced by argument validation.
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    NotFound(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            CliError::NotFound(p) => write!(f, "file not found: {p}"),
        }
    }
}
impl std::error::Error for CliError {}

/// `CAMPAIGN=GOAL` → typed pair.
pub fn parse_assignment(s: &str) -> Result<(CampaignId, GoalId), String> {
    let (c, g) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CAMPAIGN=GOAL, got {s:?}"))?;
    let c = c.trim().parse::<CampaignId>().map_err(|e| format!("campaign id {c:?}: {e}"))?;
    let g = g.trim().parse::<GoalId>().map_err(|e| format!("goal id {g:?}: {e}"))?;
    Ok((c, g))
}

/// Reject any explicit URI scheme (e.g., http://, https://, file://).
#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("http:") || lower.starts_with("https:") || lower.starts_with("file:")
}

#[inline]
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if has_scheme(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

/// Ensure a path is local (no scheme) and exists as a regular file.
fn ensure_local_exists(p: &Path, label: &'static str) -> Result<(), CliError> {
    ensure_local_path(p)?;
    let meta = fs::metadata(p).map_err(|_| CliError::NotFound(format!("{label} {}", p.display())))?;
    if !meta.is_file() {
        return Err(CliError::NotFound(format!("{label} {}", p.display())));
    }
    Ok(())
}

/// Best-effort normalization to an absolute path.
fn normalize_path(p: &Path) -> PathBuf {
    fs::canonicalize(p).unwrap_or_else(|_| {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(p)
        }
    })
}

/// Entry point used by main.rs.
pub fn parse_and_validate() -> Result<Args, CliError> {
    validate(Args::parse())
}

fn validate(mut args: Args) -> Result<Args, CliError> {
    ensure_local_exists(&args.dataset, "--dataset")?;
    args.dataset = normalize_path(&args.dataset);
    if let Some(p) = args.params.take() {
        ensure_local_exists(&p, "--params")?;
        args.params = Some(normalize_path(&p));
    }
    if let Some(out) = args.out.take() {
        ensure_local_path(&out)?;
        args.out = Some(normalize_path(&out));
    }
    Ok(args)
}
