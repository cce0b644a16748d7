// crates/cm_cli/src/main.rs
//
// Exit codes, typed error mapping, validate-only short-circuit, and the run
// path (load → view state → overlay/overrides → dashboard → report → output).

mod args;
mod logging;

mod exitcodes {
    pub const OK: i32 = 0;
    pub const VALIDATION: i32 = 2;
    pub const IO: i32 = 4;
    /// Caller contract violated (bad view state, unknown sort key).
    pub const CONTRACT: i32 = 5;
}

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use args::{parse_and_validate as parse_cli, Args, CliError, Render};

use cm_core::{CoreError, SortKey};
use cm_io::canonical_json;
use cm_pipeline::{build_dashboard, load_inputs, GoalQuery, PipelineError, View, ViewQuery};
use cm_report::{build_report_model, render_report_text, ReportModel};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    Validation(String),
    Io(String),
    Contract(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) => write!(f, "validation: {m}"),
            MainError::Io(m) => write!(f, "io: {m}"),
            MainError::Contract(m) => write!(f, "contract: {m}"),
        }
    }
}

impl From<PipelineError> for MainError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Io(m) => MainError::Io(m),
            PipelineError::Validate(m) => MainError::Validation(m),
            PipelineError::Contract(m) => MainError::Contract(m),
        }
    }
}

impl From<CoreError> for MainError {
    fn from(e: CoreError) -> Self {
        PipelineError::from(e).into()
    }
}

impl From<CliError> for MainError {
    fn from(e: CliError) -> Self {
        match e {
            CliError::NotFound(_) => MainError::Io(e.to_string()),
            CliError::NonLocalPath(_) => MainError::Validation(e.to_string()),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            let e = MainError::from(e);
            eprintln!("cm: error: {e}");
            return ExitCode::from(map_error(&e) as u8);
        }
    };
    logging::init_logging(args.quiet, args.verbose, args.log_format);

    let res = if args.validate_only { validate_only(&args) } else { run_once(&args) };
    let rc = match res {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            tracing::debug!(error = %e, "run failed");
            eprintln!("cm: error: {e}");
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::Io(_) => IO,
        MainError::Contract(_) => CONTRACT,
    }
}

/// Load + validate inputs and the requested view state; build nothing.
fn validate_only(args: &Args) -> Result<(), MainError> {
    let inputs = load_inputs(&args.dataset, args.params.as_deref())?;
    let view = resolve_view(args)?;
    if !args.quiet {
        eprintln!(
            "validate-only: inputs OK ({} goals, {} campaigns, sha256 {})",
            inputs.dataset.goals.len(),
            inputs.dataset.campaign_count(),
            inputs.dataset_sha256
        );
        echo_view(&view);
    }
    Ok(())
}

/// `--query` first, then individual flags on top, then `--toggle`.
fn resolve_view(args: &Args) -> Result<View, MainError> {
    let mut table = ViewQuery::parse(args.query.as_deref().unwrap_or(""))?;
    if let Some(s) = &args.status {
        table.status = s.parse()?;
    }
    if let Some(p) = &args.platform {
        table.platform = p.parse()?;
    }
    if let Some(k) = &args.sort {
        table.sort = k.parse()?;
    }
    if let Some(d) = &args.dir {
        table.dir = d.parse()?;
    }
    if let Some(k) = &args.toggle {
        let key: SortKey = k.parse()?;
        table = table.with_sort(table.sort_state().toggle(key));
    }
    let goals = GoalQuery::parse(args.goal_query.as_deref().unwrap_or(""))?;
    Ok(View { table, goals })
}

fn echo_view(view: &View) {
    eprintln!("view: ?{}", view.table);
    if view.goals != GoalQuery::default() {
        eprintln!("goals: ?{}", view.goals);
    }
}

fn run_once(args: &Args) -> Result<(), MainError> {
    let inputs = load_inputs(&args.dataset, args.params.as_deref())?;
    let view = resolve_view(args)?;

    let goals = inputs.goals();
    let mut overrides = inputs.overrides();
    for (c, g) in &args.assign {
        if let Some(prev) = overrides.assign(c.clone(), g.clone()) {
            tracing::info!(campaign = %c, from = %prev, to = %g, "assignment replaced");
        }
    }

    let dashboard = build_dashboard(
        &goals,
        &inputs.dataset.unassigned_campaigns,
        &overrides,
        &inputs.params,
        view,
    );
    let model = build_report_model(&dashboard, &inputs.params.bands, Some(&inputs.dataset_sha256));
    tracing::info!(
        rows = dashboard.rows.len(),
        total = dashboard.campaign_total,
        channels = dashboard.channels.len(),
        "dashboard built"
    );

    match &args.out {
        Some(dir) => write_report(dir, args.render, &model)?,
        None => print_report(args.render, &model)?,
    }

    if !args.quiet {
        echo_view(&view);
    }
    Ok(())
}

fn print_report(render: Render, model: &ReportModel) -> Result<(), MainError> {
    match render {
        Render::Text => print!("{}", render_report_text(model)),
        Render::Json => println!("{}", json_pretty(model)?),
    }
    Ok(())
}

fn write_report(out_dir: &Path, render: Render, model: &ReportModel) -> Result<(), MainError> {
    fs::create_dir_all(out_dir).map_err(|e| MainError::Io(format!("mkdir {}: {e}", out_dir.display())))?;
    let path = match render {
        Render::Text => {
            let path = out_dir.join("report.txt");
            canonical_json::write_atomic(&path, render_report_text(model).as_bytes())
                .map_err(|e| MainError::Io(format!("write report.txt: {e}")))?;
            path
        }
        Render::Json => {
            let path = out_dir.join("report.json");
            canonical_json::write_canonical_file(&path, &json_value(model)?)
                .map_err(|e| MainError::Io(format!("write report.json: {e}")))?;
            path
        }
    };
    tracing::info!(path = %path.display(), "report written");
    Ok(())
}

#[cfg(feature = "report-json")]
fn json_value(model: &ReportModel) -> Result<serde_json::Value, MainError> {
    cm_report::render_report_json(model).map_err(|e| MainError::Io(format!("report to JSON: {e}")))
}

#[cfg(feature = "report-json")]
fn json_pretty(model: &ReportModel) -> Result<String, MainError> {
    cm_report::render_report_json_pretty(model).map_err(|e| MainError::Io(format!("report to JSON: {e}")))
}

#[cfg(not(feature = "report-json"))]
fn json_value(_model: &ReportModel) -> Result<serde_json::Value, MainError> {
    Err(MainError::Contract("json renderer not enabled (build with feature `report-json`)".into()))
}

#[cfg(not(feature = "report-json"))]
fn json_pretty(_model: &ReportModel) -> Result<String, MainError> {
    Err(MainError::Contract("json renderer not enabled (build with feature `report-json`)".into()))
}
