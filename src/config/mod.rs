//! Configuration module
//!
//! Handles loading settings from YAML files and environment variables.

mod patterns;
mod settings;

pub use patterns::PatternSet;
pub use settings::*;

use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Load settings from an explicit file, the default locations, or defaults
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    let mut settings = match locate(explicit) {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(&path)?
        }
        None => {
            info!("No settings file found, using defaults");
            Settings::default()
        }
    };

    settings.merge_env();
    settings.normalize();
    Ok(settings)
}

fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var("LINKEDIN_FINDER_SETTINGS") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let mut paths = vec![
        PathBuf::from("linkedin-finder.yml"),
        PathBuf::from("config/linkedin-finder.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("linkedin-finder/settings.yml"));
    }

    paths.into_iter().find(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_explicit_file() {
        let path = std::env::temp_dir().join("linkedin-finder-config-test.yml");
        std::fs::write(
            &path,
            "finder:\n  min_delay_seconds: 0.1\n  company_similarity_threshold: 1.5\n",
        )
        .unwrap();

        let settings = load(Some(&path)).unwrap();
        assert_eq!(settings.finder.min_delay_seconds, 1.0);
        assert_eq!(settings.finder.company_similarity_threshold, 1.0);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_missing_file_fails() {
        let path = Path::new("/nonexistent/linkedin-finder.yml");
        assert!(load(Some(path)).is_err());
    }
}
