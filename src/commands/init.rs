use crate::config::CONFIG_FILE_NAME;
use crate::io;
use anyhow::Result;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = r#"# mockmigrate configuration

# Replace JUnit 4 @Test with the Jupiter annotation and drop `public`
modernize_test_methods = true

# Also replace MockitoRule / MockitoTestRule fields with MockitoExtension
migrate_mockito_rules = true

# Distinct static imports from one class at which they fold into Class.*
static_star_threshold = 3

# Calls recognized as argument matchers inside expectation blocks
matcher_functions = [
    "any", "anyString", "anyInt", "anyLong", "anyDouble", "anyBoolean",
    "anyList", "anyMap", "anySet", "anyCollection",
    "isA", "isNull", "notNull", "same", "eq", "argThat",
]

# Rule field types treated as the mock context
context_types = ["org.jmock.integration.junit4.JUnitRuleMockery"]
"#;

pub fn init_config(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    write_default_config(&config_path, force)?;
    println!("Created {} configuration file", CONFIG_FILE_NAME);
    Ok(())
}

fn write_default_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }
    io::write_file(config_path, DEFAULT_CONFIG)
}
