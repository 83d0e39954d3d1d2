//! Command handlers for the `dkt` binary, one module per subcommand, plus
//! the shared store-opening helpers every mutating command goes through.

pub mod board;
pub mod completions;
pub mod create;
pub mod delete;
pub mod edit;
pub mod init;
pub mod list;
pub mod show;
pub mod transition;

use crate::output::{CliError, OutputMode, render_error};
use docket_core::error::StoreError;
use docket_core::model::demand::Demand;
use docket_core::store::DemandStore;
use std::path::Path;

/// Convert a store failure into a rendered CLI error.
fn cli_error_from_store(err: &StoreError) -> CliError {
    CliError::from_code(err.to_string(), err.error_code())
}

/// Open the store for `project_root`, rendering a structured error when the
/// directory is not part of a docket project.
pub(crate) fn open_store(output: OutputMode, project_root: &Path) -> anyhow::Result<DemandStore> {
    DemandStore::open(project_root).map_err(|err| {
        render_error(output, &cli_error_from_store(&err)).ok();
        anyhow::anyhow!("{err}")
    })
}

/// Load the demand collection, rendering a structured error on failure.
pub(crate) fn load_demands(
    store: &DemandStore,
    output: OutputMode,
) -> anyhow::Result<Vec<Demand>> {
    store.load().map_err(|err| {
        render_error(output, &cli_error_from_store(&err)).ok();
        anyhow::anyhow!("{err}")
    })
}

/// Persist the demand collection, rendering a structured error on failure.
pub(crate) fn save_demands(
    store: &DemandStore,
    demands: &[Demand],
    output: OutputMode,
) -> anyhow::Result<()> {
    store.save(demands).map_err(|err| {
        render_error(output, &cli_error_from_store(&err)).ok();
        anyhow::anyhow!("{err}")
    })
}
