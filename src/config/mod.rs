use serde::Deserialize;
use std::path::PathBuf;

use crate::geometry::DEFAULT_STEPS;

fn default_circle_steps() -> usize {
    DEFAULT_STEPS
}
fn default_max_steps() -> usize {
    10_000
}
fn default_verbose() -> bool {
    false
}

#[derive(Debug, Deserialize)]
pub struct FileConfig {
    /// Vertices used to approximate each circle
    #[serde(default = "default_circle_steps")]
    pub circle_steps: usize,
    /// Merge cap when converging to a fixed point
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    /// Document loaded and saved when none is given on the command line
    #[serde(default)]
    pub document: Option<PathBuf>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            circle_steps: default_circle_steps(),
            max_steps: default_max_steps(),
            verbose: default_verbose(),
            document: None,
        }
    }
}

impl FileConfig {
    /// First config file found on the search path that parses
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        log::warn!("Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("zonemerge.toml"));
    paths.push(PathBuf::from(".zonemerge.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("zonemerge").join("config.toml"));
        paths.push(config_dir.join("zonemerge.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".zonemerge.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.circle_steps, 64);
        assert_eq!(config.max_steps, 10_000);
        assert!(!config.verbose);
        assert!(config.document.is_none());
    }

    #[test]
    fn test_overrides() {
        let config: FileConfig = toml::from_str(
            r#"
            circle_steps = 128
            verbose = true
            document = "zones/home.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.circle_steps, 128);
        assert_eq!(config.max_steps, 10_000);
        assert!(config.verbose);
        assert_eq!(config.document, Some(PathBuf::from("zones/home.json")));
    }

    #[test]
    fn test_search_path_starts_local() {
        let paths = get_config_paths();
        assert_eq!(paths[0], PathBuf::from("zonemerge.toml"));
        assert_eq!(paths[1], PathBuf::from(".zonemerge.toml"));
    }
}
