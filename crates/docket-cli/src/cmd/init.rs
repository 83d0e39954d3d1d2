//! `dkt init` — initialize a docket project.

use crate::output::{CliError, OutputMode, render_error, render_success};
use clap::Args;
use docket_core::store::DemandStore;
use std::path::Path;

#[derive(Args, Debug)]
pub struct InitArgs {}

const CONFIG_TEMPLATE: &str = "\
# docket project configuration
#
#[board]
#sort = \"created\"      # priority | created | duration
#order = \"asc\"         # asc | desc
#show_counts = true
";

pub fn run_init(_args: &InitArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let already_initialized = project_root.join(".docket").is_dir();

    let store = match DemandStore::init(project_root) {
        Ok(store) => store,
        Err(err) => {
            render_error(output, &CliError::from_code(err.to_string(), err.error_code()))?;
            anyhow::bail!("{err}");
        }
    };

    let config_path = store.docket_dir().join("config.toml");
    if !config_path.exists() {
        std::fs::write(&config_path, CONFIG_TEMPLATE)?;
    }

    if already_initialized {
        render_success(output, "docket project already initialized")?;
    } else {
        render_success(output, "Initialized docket project in .docket/")?;
    }
    Ok(())
}
