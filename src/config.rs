use crate::core::names;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".mockmigrate.toml";

/// Knobs of the migration recipe. Passed by reference into every transform call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Swap JUnit 4 `@Test` methods to JUnit Jupiter conventions
    #[serde(default = "default_true")]
    pub modernize_test_methods: bool,

    /// Also replace `MockitoRule`/`MockitoTestRule` fields with the extension
    #[serde(default = "default_true")]
    pub migrate_mockito_rules: bool,

    /// Distinct static members from one class at which imports fold into `Class.*`
    #[serde(default = "default_static_star_threshold")]
    pub static_star_threshold: usize,

    /// Names recognized as matcher-constructing calls inside expectations
    #[serde(default = "default_matcher_functions")]
    pub matcher_functions: Vec<String>,

    /// Fully qualified mock-context types recognized on rule fields
    #[serde(default = "default_context_types")]
    pub context_types: Vec<String>,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            modernize_test_methods: default_true(),
            migrate_mockito_rules: default_true(),
            static_star_threshold: default_static_star_threshold(),
            matcher_functions: default_matcher_functions(),
            context_types: default_context_types(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_static_star_threshold() -> usize {
    3
}

fn default_matcher_functions() -> Vec<String> {
    [
        "any",
        "anyString",
        "anyInt",
        "anyLong",
        "anyDouble",
        "anyBoolean",
        "anyList",
        "anyMap",
        "anySet",
        "anyCollection",
        "isA",
        "isNull",
        "notNull",
        "same",
        "eq",
        "argThat",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_context_types() -> Vec<String> {
    vec![names::JUNIT_RULE_MOCKERY.to_string()]
}

impl MigrationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.static_star_threshold == 0 {
            return Err("static_star_threshold must be at least 1".to_string());
        }
        if self.context_types.is_empty() {
            return Err("context_types must name at least one mock-context type".to_string());
        }
        if let Some(bad) = self
            .context_types
            .iter()
            .find(|t| !t.contains('.') || t.ends_with('.'))
        {
            return Err(format!("context type '{}' is not fully qualified", bad));
        }
        Ok(())
    }

    pub fn is_matcher_function(&self, name: &str) -> bool {
        self.matcher_functions.iter().any(|m| m == name)
    }

    /// Declaring types that own `mock(...)` and `checking(...)`
    pub fn mockery_types(&self) -> Vec<String> {
        let mut types = vec![names::JMOCK_MOCKERY.to_string()];
        types.extend(self.context_types.iter().cloned());
        types
    }
}

fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse and validate a config from TOML text
pub fn parse_config(contents: &str) -> Result<MigrationConfig, String> {
    let config = toml::from_str::<MigrationConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))?;
    config.validate()?;
    Ok(config)
}

/// Load a config from an explicit path, falling back to defaults on any problem
pub fn load_config_from(path: &Path) -> MigrationConfig {
    try_load_config_from_path(path).unwrap_or_default()
}

fn try_load_config_from_path(config_path: &Path) -> Option<MigrationConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %config_path.display(),
                    error = %e,
                    "Failed to read config file"
                );
            }
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            tracing::debug!(path = %config_path.display(), "Loaded config");
            Some(config)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Invalid config, using defaults");
            None
        }
    }
}

fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
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

/// Search the working directory and its ancestors for `.mockmigrate.toml`
pub fn load_config() -> MigrationConfig {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to get current directory, using default config");
            return MigrationConfig::default();
        }
    };

    directory_ancestors(current, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            tracing::debug!(
                depth = MAX_TRAVERSAL_DEPTH,
                "No config found, using default config"
            );
            MigrationConfig::default()
        })
}
