//! User configuration (`config.toml`): grid shape, where mapping tables
//! live, and standard measurement rules.

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::PathBuf;
use wireplan_core::StandardMeasurement;
use wireplan_engine::engine::GridConfig;

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

pub const MAX_SECTIONS: usize = 10;
pub const MAX_ROWS: usize = 20;
pub const MAX_COLS: usize = 10;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    grid: Option<GridSection>,
    mappings_dir: Option<PathBuf>,
    #[serde(default)]
    standard: Vec<StandardMeasurement>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GridSection {
    sections: Option<usize>,
    rows: Option<usize>,
    cols: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub grid: GridConfig,
    /// Directory for per-sheet mapping tables; `None` keeps them next to the sheet.
    pub mappings_dir: Option<PathBuf>,
    pub standard: Vec<StandardMeasurement>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            grid: GridConfig::default(),
            mappings_dir: None,
            standard: Vec::new(),
        }
    }
}

/// Load the config from `config_file`, or the user config dir when not
/// given. Problems are reported as warnings and fall back to defaults.
pub fn load_config(config_file: Option<&PathBuf>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = config_file.cloned().or_else(user_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    let content = match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            return (Config::default(), warnings);
        }
        Ok(_) => match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                return (Config::default(), warnings);
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            return (Config::default(), warnings);
        }
    };

    let (config, parse_warnings) = parse_config(&content);
    warnings.extend(
        parse_warnings
            .into_iter()
            .map(|w| format!("{}: {}", path.display(), w)),
    );
    (config, warnings)
}

/// Parse config text. Unparseable text yields the defaults; an out-of-range
/// grid yields the default grid.
pub fn parse_config(content: &str) -> (Config, Vec<String>) {
    let mut warnings = Vec::new();
    let file = match toml::from_str::<ConfigFile>(content) {
        Ok(file) => file,
        Err(err) => {
            warnings.push(format!("Failed to parse: {}", err));
            return (Config::default(), warnings);
        }
    };

    let defaults = GridConfig::default();
    let section = file.grid.unwrap_or_default();
    let requested = GridConfig::new(
        section.sections.unwrap_or(defaults.sections),
        section.rows.unwrap_or(defaults.rows),
        section.cols.unwrap_or(defaults.cols),
    );
    let grid = match check_grid(requested) {
        Ok(grid) => grid,
        Err(err) => {
            warnings.push(format!(
                "{}; using {}x{}x{}",
                err, defaults.sections, defaults.rows, defaults.cols
            ));
            defaults
        }
    };

    (
        Config {
            grid,
            mappings_dir: file.mappings_dir,
            standard: file.standard,
        },
        warnings,
    )
}

/// Reject grid shapes outside what the layout supports.
pub fn check_grid(grid: GridConfig) -> Result<GridConfig, String> {
    let checks = [
        ("sections", grid.sections, MAX_SECTIONS),
        ("rows", grid.rows, MAX_ROWS),
        ("cols", grid.cols, MAX_COLS),
    ];
    for (name, value, max) in checks {
        if value == 0 || value > max {
            return Err(format!("{} must be between 1 and {} (got {})", name, max, value));
        }
    }
    Ok(grid)
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "wireplan")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let (config, warnings) = parse_config("");
        assert!(warnings.is_empty());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_full_config() {
        let (config, warnings) = parse_config(
            r#"
mappings_dir = "/srv/maps"

[grid]
sections = 3
rows = 9

[[standard]]
origin_contains = "PE"
destination_contains = "X1"
distance = 300.0

[[standard]]
origin_contains = "N"
distance = 150.0
enabled = false
"#,
        );
        assert!(warnings.is_empty(), "{:?}", warnings);
        assert_eq!(config.grid, GridConfig::new(3, 9, 4));
        assert_eq!(config.mappings_dir, Some(PathBuf::from("/srv/maps")));
        assert_eq!(config.standard.len(), 2);
        assert!(config.standard[0].enabled);
        assert!(!config.standard[1].enabled);
        assert_eq!(config.standard[1].destination_contains, "");
    }

    #[test]
    fn test_out_of_range_grid_falls_back() {
        let (config, warnings) = parse_config("[grid]\nrows = 21\n");
        assert_eq!(config.grid, GridConfig::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("rows must be between 1 and 20"));
    }

    #[test]
    fn test_unknown_keys_are_reported() {
        let (config, warnings) = parse_config("colour = \"blue\"\n");
        assert_eq!(config, Config::default());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_missing_explicit_file_warns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let (config, warnings) = load_config(Some(&path));
        assert_eq!(config, Config::default());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_check_grid_bounds() {
        assert!(check_grid(GridConfig::new(10, 20, 10)).is_ok());
        assert!(check_grid(GridConfig::new(11, 1, 1)).is_err());
        assert!(check_grid(GridConfig::new(1, 1, 0)).is_err());
    }
}
