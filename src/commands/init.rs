use crate::config::CONFIG_FILE_NAME;
use crate::io;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = r#"# smellmap configuration

[thresholds]
long_method_statements = 30
long_method_complexity = 10
primitive_obsession_param_count = 4
feature_envy_ratio = 0.67
type_dispatch_branches = 4
data_clump_min_shared_params = 3
long_parameter_list = 5
deep_nesting = 4
large_class_methods = 10

[rules]
enabled = [
    "long-method",
    "primitive-obsession",
    "feature-envy",
    "type-code-dispatch",
    "data-clump",
    "long-parameter-list",
    "deep-nesting",
    "large-class",
]

[grouping]
address = ["street*", "address*", "city", "state", "province", "zip*", "postal*", "country"]
contact = ["email*", "phone*", "mobile*", "fax"]
coordinate = ["x", "y", "z", "lat", "latitude", "lng", "lon", "longitude"]
money = ["amount", "currency", "*price", "price*", "tax*", "discount*"]
personal = ["firstName", "lastName", "middleName", "dateOfBirth", "birth*", "ssn", "gender"]
range = ["start*", "end*", "min*", "max*"]
stock = ["quantity", "*stock", "stock*", "warehouse*"]

[analysis]
timeout_ms = 10000

[ignore]
patterns = [
    "node_modules/**",
    "dist/**",
    "build/**",
    "**/*.min.js",
]
"#;

pub fn init_config(force: bool) -> Result<()> {
    let path = init_config_in(Path::new("."), force)?;
    println!("Created {}", path.display());
    Ok(())
}

pub fn init_config_in(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG)?;
    Ok(config_path)
}
