use anyhow::Result;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Extension of serialized syntax trees
pub const TREE_EXTENSION: &str = "json";

pub struct TreeWalker {
    root: PathBuf,
    ignore_patterns: Vec<glob::Pattern>,
}

impl TreeWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ignore_patterns: vec![],
        }
    }

    /// Skip files matching any of the globs. Invalid globs are reported and ignored.
    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Self {
        self.ignore_patterns = patterns
            .iter()
            .filter_map(|pattern| match glob::Pattern::new(pattern) {
                Ok(compiled) => Some(compiled),
                Err(e) => {
                    tracing::warn!(pattern = %pattern, error = %e, "Ignoring invalid exclude pattern");
                    None
                }
            })
            .collect();
        self
    }

    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        if self.root.is_file() {
            return Ok(if self.should_process(&self.root) {
                vec![self.root.clone()]
            } else {
                vec![]
            });
        }

        let mut files = Vec::new();
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .build();

        for entry in walker {
            let entry = entry?;
            let path = entry.path();

            if path.is_file() && self.should_process(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    fn should_process(&self, path: &Path) -> bool {
        let is_tree = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(TREE_EXTENSION));
        if !is_tree {
            return false;
        }

        let path_str = path.to_string_lossy();
        !self.ignore_patterns.iter().any(|p| p.matches(&path_str))
    }
}

/// All tree files under the given roots, deduplicated and in a stable order
pub fn find_tree_files(roots: &[PathBuf], ignore_patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for root in roots {
        let found = TreeWalker::new(root.clone())
            .with_ignore_patterns(ignore_patterns)
            .walk()?;
        files.extend(found);
    }
    files.sort();
    files.dedup();
    Ok(files)
}
