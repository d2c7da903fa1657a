//! Wiring between the command line and the session.

use std::{path::Path, sync::Arc};

use anyhow::Context;
use fare_core::CalculatorConfig;
use tokio::time::Instant;
use tracing::info;

use crate::{
    clipboard::{Clipboard, FileClipboard, StdoutClipboard},
    csv_loader,
    scenario::Scenario,
    session::Session,
};

/// A file clipboard when `path` is given, standard output otherwise.
pub fn clipboard_for(path: Option<&Path>) -> Arc<dyn Clipboard> {
    match path {
        Some(path) => Arc::new(FileClipboard::new(path)),
        None => Arc::new(StdoutClipboard),
    }
}

/// Builds a session pre-filled from a scenario file and, optionally, a CSV
/// of tax rows that replaces the scenario's own rows.
pub fn prepare_session(
    config: &CalculatorConfig,
    scenario: &Path,
    rows: Option<&Path>,
) -> anyhow::Result<Session> {
    let mut session = Session::new(config);

    let scenario = Scenario::load_from_file(scenario)
        .with_context(|| format!("loading scenario '{}'", scenario.display()))?;
    scenario
        .apply(session.state_mut())
        .context("applying scenario")?;

    if let Some(rows) = rows {
        let loaded = csv_loader::load_from_file(rows, config.max_tax_rows)
            .with_context(|| format!("loading tax rows '{}'", rows.display()))?;
        info!(count = loaded.len(), "Replacing scenario tax rows from CSV");
        session
            .state_mut()
            .replace_rows(loaded)
            .context("replacing tax rows")?;
    }

    session.recalculate_now();
    Ok(session)
}

/// One-shot mode: load, calculate, and copy the summary.
pub async fn run_summary(
    config: &CalculatorConfig,
    scenario: &Path,
    rows: Option<&Path>,
    clipboard: &dyn Clipboard,
) -> anyhow::Result<Session> {
    let mut session = prepare_session(config, scenario, rows)?;
    session
        .copy_summary(clipboard, Instant::now())
        .await
        .context("copying ticket change summary")?;
    Ok(session)
}
