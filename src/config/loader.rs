use std::fs;
use std::path::{Path, PathBuf};

use super::SmellmapConfig;
use crate::errors::ConfigFault;

pub const CONFIG_FILE_NAME: &str = ".smellmap.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// `start` followed by its ancestors, at most `max_depth` directories.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Nearest `.smellmap.toml` in `start` or one of its ancestors.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file())
}

/// Reads and parses one config file. Unlike discovery, a file that exists
/// but cannot be read or parsed is an error.
pub fn load_config_from(path: &Path) -> Result<SmellmapConfig, ConfigFault> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigFault::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let config = toml::from_str::<SmellmapConfig>(&contents).map_err(|e| ConfigFault::Syntax {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Loads the explicit `path`, or the nearest config file above `start`, or
/// the defaults when there is none.
pub fn load_config(path: Option<&Path>, start: &Path) -> Result<SmellmapConfig, ConfigFault> {
    if let Some(path) = path {
        return load_config_from(path);
    }

    match find_config_file(start) {
        Some(found) => load_config_from(&found),
        None => {
            tracing::debug!(
                "no {} found after checking {} directories, using defaults",
                CONFIG_FILE_NAME,
                MAX_TRAVERSAL_DEPTH
            );
            Ok(SmellmapConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directory_ancestors_stops_at_depth() {
        let dirs: Vec<_> = directory_ancestors(PathBuf::from("/a/b/c/d"), 3).collect();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/a/b/c/d"),
                PathBuf::from("/a/b/c"),
                PathBuf::from("/a/b"),
            ]
        );
    }

    #[test]
    fn test_finds_config_in_ancestor() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("src/orders");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "[thresholds]\nlong_method_statements = 12\n",
        )
        .unwrap();

        let config = load_config(None, &nested).unwrap();
        assert_eq!(config.thresholds.long_method_statements, 12);
    }

    #[test]
    fn test_missing_explicit_config_is_a_read_fault() {
        let root = TempDir::new().unwrap();
        let missing = root.path().join("nope.toml");
        assert!(matches!(
            load_config(Some(&missing), root.path()),
            Err(ConfigFault::Read { .. })
        ));
    }

    #[test]
    fn test_invalid_toml_is_a_syntax_fault() {
        let root = TempDir::new().unwrap();
        let path = root.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[thresholds\nlong_method_statements = ").unwrap();

        let fault = load_config_from(&path).unwrap_err();
        assert!(matches!(fault, ConfigFault::Syntax { .. }));
        assert!(fault.to_string().contains(CONFIG_FILE_NAME));
    }
}
