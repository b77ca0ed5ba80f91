use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_yml::Value;

use crate::extract::Pass;
use crate::idiom::layer::ConstantTable;

pub const CONFIG_FILE: &str = "spritemeta.yml";

/// Resolved configuration from spritemeta.yml.
///
/// Every key is optional; unknown keys are ignored.
#[derive(Debug, Clone, Default)]
pub struct ExtractConfig {
    pub output_dir: Option<PathBuf>,
    /// Built-in layer constants with any `layer_constants` entries merged over.
    pub constants: ConstantTable,
    /// Function name overrides keyed by pass name (e.g. "cut", "animated").
    functions: HashMap<String, String>,
}

impl ExtractConfig {
    /// The C function a pass reads, honouring `functions` overrides.
    pub fn function_for(&self, pass: Pass) -> &str {
        self.functions
            .get(pass.key())
            .map(String::as_str)
            .unwrap_or(pass.default_function())
    }

    pub fn set_function(&mut self, pass: Pass, name: impl Into<String>) {
        self.functions.insert(pass.key().to_string(), name.into());
    }
}

/// Load config from the given path, or look for `spritemeta.yml` in the
/// current directory. Returns the defaults if the file doesn't exist.
pub fn load_config(path: Option<&Path>) -> Result<ExtractConfig> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => Path::new(CONFIG_FILE).to_path_buf(),
    };

    if !config_path.exists() {
        return Ok(ExtractConfig::default());
    }

    let contents = std::fs::read_to_string(&config_path)
        .with_context(|| format!("failed to read config {}", config_path.display()))?;
    let raw: Value = serde_yml::from_str(&contents)
        .with_context(|| format!("failed to parse {}", config_path.display()))?;

    let mut config = ExtractConfig::default();

    if let Value::Mapping(map) = &raw {
        for (key, value) in map {
            let Some(key_str) = key.as_str() else {
                continue;
            };
            match key_str {
                "output_dir" => {
                    if let Some(dir) = value.as_str() {
                        config.output_dir = Some(PathBuf::from(dir));
                    }
                }
                "layer_constants" => {
                    for (name, v) in string_keyed(value) {
                        match v.as_i64() {
                            Some(n) => config.constants.insert(name, n),
                            None => anyhow::bail!(
                                "{}: layer constant {name} is not an integer",
                                config_path.display()
                            ),
                        }
                    }
                }
                "functions" => {
                    for (pass, v) in string_keyed(value) {
                        if let (Some(pass), Some(func)) = (Pass::from_key(pass), v.as_str()) {
                            config.set_function(pass, func);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    Ok(config)
}

fn string_keyed(value: &Value) -> Vec<(&str, &Value)> {
    match value {
        Value::Mapping(map) => map
            .iter()
            .filter_map(|(k, v)| Some((k.as_str()?, v)))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idiom::layer::SymbolResolver;
    use std::fs;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILE);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn missing_config_returns_defaults() {
        let config = load_config(Some(Path::new("/nonexistent/spritemeta.yml"))).unwrap();
        assert!(config.output_dir.is_none());
        assert_eq!(config.constants.resolve("GND_LAY"), Some(100));
        assert_eq!(config.function_for(Pass::Cut), "_is_cut_sprite");
    }

    #[test]
    fn output_dir_and_functions() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "output_dir: out/config\nfunctions:\n  animated: _trans_asprite2\n  bogus: _nothing\n",
        );
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.output_dir, Some(PathBuf::from("out/config")));
        assert_eq!(config.function_for(Pass::Animated), "_trans_asprite2");
        assert_eq!(config.function_for(Pass::Character), "_trans_charno");
    }

    #[test]
    fn layer_constants_merge_over_builtins() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "layer_constants:\n  FLY_LAY: 120\n  GND_LAY: 99\n");
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.constants.resolve("FLY_LAY"), Some(120));
        assert_eq!(config.constants.resolve("GND_LAY"), Some(99));
        assert_eq!(config.constants.resolve("GME_LAY"), Some(110));
    }

    #[test]
    fn non_integer_constant_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "layer_constants:\n  FLY_LAY: high\n");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("FLY_LAY"));
    }

    #[test]
    fn unknown_keys_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "verbose: true\nthreads: 4\n");
        let config = load_config(Some(&path)).unwrap();
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "output_dir: [unclosed\n");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse"));
    }
}
