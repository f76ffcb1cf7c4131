use crate::core::Language;
use crate::errors::{Result, SmellmapError};
use glob::Pattern;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Finds analyzable source files under a directory, honoring `.gitignore`
/// and the configured ignore globs.
pub struct FileWalker {
    root: PathBuf,
    languages: Vec<Language>,
    ignore_patterns: Vec<Pattern>,
}

impl FileWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            languages: vec![Language::JavaScript, Language::TypeScript],
            ignore_patterns: vec![],
        }
    }

    pub fn with_languages(mut self, languages: Vec<Language>) -> Self {
        self.languages = languages;
        self
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<Pattern>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Matching files in sorted order.
    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .build();

        for entry in walker {
            let entry = entry.map_err(|source| SmellmapError::Discovery {
                root: self.root.clone(),
                source,
            })?;
            let path = entry.path();

            if path.is_file() && self.should_process(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    fn should_process(&self, path: &Path) -> bool {
        let lang = Language::from_path(path);
        if !self.languages.contains(&lang) {
            return false;
        }

        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        !self
            .ignore_patterns
            .iter()
            .any(|pattern| pattern.matches_path(relative) || pattern.matches_path(path))
    }
}

/// Expands CLI paths: files are taken as given, directories are walked.
pub fn collect_source_files(paths: &[PathBuf], ignore_patterns: &[Pattern]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let found = FileWalker::new(path.clone())
                .with_ignore_patterns(ignore_patterns.to_vec())
                .walk()?;
            tracing::debug!(root = %path.display(), files = found.len(), "walked directory");
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }

    files.dedup();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "// source\n").unwrap();
    }

    #[test]
    fn test_walk_finds_js_and_ts_only() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/order.js");
        touch(dir.path(), "src/view.tsx");
        touch(dir.path(), "src/README.md");
        touch(dir.path(), "lib/util.mjs");

        let files = FileWalker::new(dir.path().to_path_buf()).walk().unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();

        assert_eq!(names, vec!["lib/util.mjs", "src/order.js", "src/view.tsx"]);
    }

    #[test]
    fn test_ignore_patterns_are_relative_to_root() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/order.js");
        touch(dir.path(), "node_modules/lib/index.js");
        touch(dir.path(), "dist/app.min.js");

        let patterns = vec![
            Pattern::new("node_modules/**").unwrap(),
            Pattern::new("**/*.min.js").unwrap(),
        ];
        let files = FileWalker::new(dir.path().to_path_buf())
            .with_ignore_patterns(patterns)
            .walk()
            .unwrap();

        assert_eq!(files, vec![dir.path().join("src/order.js")]);
    }

    #[test]
    fn test_explicit_files_are_kept() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.js");
        let explicit = dir.path().join("notes.txt");

        let files = collect_source_files(&[dir.path().to_path_buf(), explicit.clone()], &[]).unwrap();
        assert_eq!(files, vec![dir.path().join("a.js"), explicit]);
    }
}
