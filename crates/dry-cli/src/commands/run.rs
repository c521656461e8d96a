//! Run command implementation

use anyhow::{Context, Result};
use dry_core::{Manifest, NodeId};
use dry_db::DuckDbRunner;
use dry_runner::{DryRunExecutor, DryRunReport};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::{GlobalArgs, RunArgs, RunOutput};
use crate::commands::common::{self, ExitCode};

/// Execute the run command
pub(crate) async fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let project_dir = common::project_dir(global);
    let config = common::load_config(global)?;

    let manifest_path = resolve(&project_dir, args.manifest.as_deref())
        .unwrap_or_else(|| config.manifest_path_in(&project_dir));
    let report_path = resolve(&project_dir, args.report.as_deref())
        .unwrap_or_else(|| config.report_path_in(&project_dir));
    let db_path = config.database_path_in(&project_dir, args.database.as_deref());

    let mut manifest = Manifest::load(&manifest_path)
        .with_context(|| format!("Failed to load manifest {}", manifest_path.display()))?;
    let engine = create_engine(&db_path, &config.database.setup_sql)?;

    let mut executor = DryRunExecutor::new(engine);
    if let Some(select) = &args.select {
        executor = executor.with_selection(parse_selection(select));
    }

    let results = executor
        .execute(&mut manifest)
        .await
        .context("Dry run aborted")?;
    let report = DryRunReport::from_results(&results);

    common::write_json_results(&report_path, &report)?;
    log::info!("Wrote report to {}", report_path.display());

    match args.output {
        RunOutput::Table => print_summary(&report),
        RunOutput::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if !report.success {
        return Err(ExitCode(1).into());
    }
    Ok(())
}

/// Resolve a CLI path override against the project directory
fn resolve(project_dir: &Path, path: Option<&str>) -> Option<PathBuf> {
    path.map(|p| project_dir.join(p))
}

/// Open the dry-run engine and apply the configured setup statements
fn create_engine(db_path: &str, setup_sql: &[String]) -> Result<Arc<DuckDbRunner>> {
    let engine = DuckDbRunner::new(db_path)
        .with_context(|| format!("Failed to open database {}", db_path))?;

    for (i, sql) in setup_sql.iter().enumerate() {
        engine
            .execute_batch(sql)
            .with_context(|| format!("Setup statement {} failed", i + 1))?;
    }
    if !setup_sql.is_empty() {
        log::debug!("Ran {} setup statement(s)", setup_sql.len());
    }
    Ok(Arc::new(engine))
}

/// Split a comma-separated selection into node ids
fn parse_selection(select: &str) -> Vec<NodeId> {
    select
        .split(',')
        .map(str::trim)
        .filter_map(NodeId::try_new)
        .collect()
}

fn print_summary(report: &DryRunReport) {
    let rows: Vec<Vec<String>> = report
        .nodes
        .iter()
        .map(|n| {
            vec![
                n.unique_id.clone(),
                n.status.to_string(),
                n.table.as_ref().map_or(0, |t| t.len()).to_string(),
                n.error.clone().unwrap_or_default(),
            ]
        })
        .collect();
    common::print_table(&["node", "status", "columns", "error"], &rows);
    println!();
    println!(
        "{} node(s), {} failure(s) [run {}]",
        report.node_count, report.failure_count, report.run_id
    );
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
