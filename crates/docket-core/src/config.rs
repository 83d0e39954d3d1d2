use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::store::DOCKET_DIR;

/// Per-project configuration, read from `.docket/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub board: BoardConfig,
}

/// Defaults for board and list presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Default sort field: priority, created, or duration.
    #[serde(default = "default_sort")]
    pub sort: String,
    /// Default sort order: asc or desc.
    #[serde(default = "default_order")]
    pub order: String,
    /// Show per-column counts in board column titles.
    #[serde(default = "default_true")]
    pub show_counts: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            sort: default_sort(),
            order: default_order(),
            show_counts: default_true(),
        }
    }
}

/// Per-user configuration, read from `<config_dir>/docket/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    /// Preferred output mode: pretty, text, or json.
    #[serde(default)]
    pub output: Option<String>,
}

/// Load the project config, falling back to defaults when the file is
/// missing.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(DOCKET_DIR).join("config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the user config, falling back to defaults when the platform has no
/// config directory or the file is missing.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("docket/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn default_sort() -> String {
    "created".to_string()
}

fn default_order() -> String {
    "asc".to_string()
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::{BoardConfig, ProjectConfig, UserConfig, load_project_config};
    use tempfile::TempDir;

    #[test]
    fn missing_project_config_uses_defaults() {
        let root = TempDir::new().expect("temp dir");
        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert_eq!(cfg.board.sort, "created");
        assert_eq!(cfg.board.order, "asc");
        assert!(cfg.board.show_counts);
    }

    #[test]
    fn project_config_parses_board_section() {
        let root = TempDir::new().expect("temp dir");
        std::fs::create_dir_all(root.path().join(".docket")).expect("mkdir");
        std::fs::write(
            root.path().join(".docket/config.toml"),
            "[board]\nsort = \"priority\"\norder = \"desc\"\nshow_counts = false\n",
        )
        .expect("write config");

        let cfg = load_project_config(root.path()).expect("load");
        assert_eq!(cfg.board.sort, "priority");
        assert_eq!(cfg.board.order, "desc");
        assert!(!cfg.board.show_counts);
    }

    #[test]
    fn partial_board_section_keeps_defaults() {
        let root = TempDir::new().expect("temp dir");
        std::fs::create_dir_all(root.path().join(".docket")).expect("mkdir");
        std::fs::write(
            root.path().join(".docket/config.toml"),
            "[board]\nsort = \"duration\"\n",
        )
        .expect("write config");

        let cfg = load_project_config(root.path()).expect("load");
        assert_eq!(cfg.board.sort, "duration");
        assert_eq!(cfg.board.order, "asc");
        assert!(cfg.board.show_counts);
    }

    #[test]
    fn malformed_project_config_reports_path() {
        let root = TempDir::new().expect("temp dir");
        std::fs::create_dir_all(root.path().join(".docket")).expect("mkdir");
        std::fs::write(root.path().join(".docket/config.toml"), "[board\n").expect("write");

        let err = load_project_config(root.path()).expect_err("parse should fail");
        assert!(format!("{err:#}").contains("config.toml"));
    }

    #[test]
    fn user_config_parses_output_preference() {
        let cfg: UserConfig = toml::from_str("output = \"json\"\n").expect("parse");
        assert_eq!(cfg.output, Some("json".to_string()));
    }

    #[test]
    fn board_config_default_is_stable() {
        let cfg = BoardConfig::default();
        assert_eq!(cfg.sort, "created");
        assert_eq!(cfg.order, "asc");
        assert!(cfg.show_counts);

        let project = ProjectConfig::default();
        assert_eq!(project.board.sort, cfg.sort);
    }
}
