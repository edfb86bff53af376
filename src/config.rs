use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::builder::DEFAULT_MAX_CONCURRENT_REGIONS;
use crate::category::{ExclusionSet, ResourceCategory};
use crate::error::InventoryError;

/// Run settings. Loaded from an optional TOML file, then overridden by
/// whatever the command line supplies.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InventoryConfig {
    pub regions: Vec<String>,
    pub exclude: Vec<ResourceCategory>,
    pub output: Option<PathBuf>,
    pub max_concurrent_regions: usize,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        InventoryConfig {
            regions: Vec::new(),
            exclude: Vec::new(),
            output: None,
            max_concurrent_regions: DEFAULT_MAX_CONCURRENT_REGIONS,
        }
    }
}

/// Values given on the command line; `None` leaves the file value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub regions: Option<Vec<String>>,
    pub exclude: Option<Vec<ResourceCategory>>,
    pub output: Option<PathBuf>,
    pub max_concurrent_regions: Option<usize>,
}

impl InventoryConfig {
    pub fn from_toml_str(source: &str, path: &Path) -> Result<Self, InventoryError> {
        toml::from_str(source).map_err(|error| InventoryError::ConfigParse {
            path: path.display().to_string(),
            reason: error.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, InventoryError> {
        let source = fs::read_to_string(path)?;
        InventoryConfig::from_toml_str(&source, path)
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(regions) = overrides.regions {
            self.regions = regions;
        }
        if let Some(exclude) = overrides.exclude {
            self.exclude = exclude;
        }
        if overrides.output.is_some() {
            self.output = overrides.output;
        }
        if let Some(limit) = overrides.max_concurrent_regions {
            self.max_concurrent_regions = limit;
        }
        self
    }

    /// Rejects zero concurrency and blank region names. Duplicate regions
    /// collapse to their first occurrence.
    pub fn validate(mut self) -> Result<Self, InventoryError> {
        if self.max_concurrent_regions == 0 {
            return Err(InventoryError::InvalidConfig {
                field: "max_concurrent_regions",
                reason: "must be at least 1".to_string(),
            });
        }

        let mut regions: Vec<String> = Vec::with_capacity(self.regions.len());
        for region in self.regions {
            let region = region.trim().to_string();
            if region.is_empty() {
                return Err(InventoryError::InvalidConfig {
                    field: "regions",
                    reason: "region names must not be empty".to_string(),
                });
            }
            if !regions.contains(&region) {
                regions.push(region);
            }
        }
        self.regions = regions;
        Ok(self)
    }

    pub fn exclusions(&self) -> ExclusionSet {
        ExclusionSet::new(self.exclude.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use crate::category::ResourceCategory;
    use crate::config::{InventoryConfig, Overrides};
    use crate::error::InventoryError;
    use std::io::Write;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_from_toml_str() {
        let source = r#"
regions = ["us-east-1", "eu-west-1"]
exclude = ["fsx", "redshift"]
output = "inventory.json"
max_concurrent_regions = 2
"#;
        let config = InventoryConfig::from_toml_str(source, Path::new("inventory.toml")).unwrap();

        assert_eq!(config.regions, vec!["us-east-1", "eu-west-1"]);
        assert_eq!(
            config.exclude,
            vec![ResourceCategory::Fsx, ResourceCategory::Redshift]
        );
        assert_eq!(config.output, Some(PathBuf::from("inventory.json")));
        assert_eq!(config.max_concurrent_regions, 2);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = InventoryConfig::from_toml_str("", Path::new("empty.toml")).unwrap();
        assert_eq!(config, InventoryConfig::default());
        assert_eq!(config.max_concurrent_regions, 4);
    }

    #[test]
    fn test_unknown_category_in_file() {
        let result = InventoryConfig::from_toml_str(r#"exclude = ["s3"]"#, Path::new("bad.toml"));
        assert!(matches!(result, Err(InventoryError::ConfigParse { .. })));
    }

    #[test]
    fn test_unknown_key_in_file() {
        let result = InventoryConfig::from_toml_str("region = \"us-east-1\"", Path::new("bad.toml"));
        assert!(matches!(result, Err(InventoryError::ConfigParse { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "regions = [\"ap-southeast-2\"]").unwrap();

        let config = InventoryConfig::load(file.path()).unwrap();
        assert_eq!(config.regions, vec!["ap-southeast-2"]);
    }

    #[test]
    fn test_load_missing_file() {
        let result = InventoryConfig::load(Path::new("/nonexistent/inventory.toml"));
        assert!(matches!(result, Err(InventoryError::Io(_))));
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let config = InventoryConfig {
            regions: vec!["us-east-1".to_string()],
            exclude: vec![ResourceCategory::Ec2],
            output: Some(PathBuf::from("from-file.json")),
            max_concurrent_regions: 8,
        }
        .with_overrides(Overrides {
            regions: Some(vec!["eu-central-1".to_string()]),
            exclude: None,
            output: None,
            max_concurrent_regions: Some(2),
        });

        assert_eq!(config.regions, vec!["eu-central-1"]);
        assert_eq!(config.exclude, vec![ResourceCategory::Ec2]);
        assert_eq!(config.output, Some(PathBuf::from("from-file.json")));
        assert_eq!(config.max_concurrent_regions, 2);
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = InventoryConfig {
            max_concurrent_regions: 0,
            ..InventoryConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(InventoryError::InvalidConfig {
                field: "max_concurrent_regions",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_dedupes_regions() {
        let config = InventoryConfig {
            regions: vec![
                "us-east-1".to_string(),
                " eu-west-1 ".to_string(),
                "us-east-1".to_string(),
            ],
            ..InventoryConfig::default()
        }
        .validate()
        .unwrap();

        assert_eq!(config.regions, vec!["us-east-1", "eu-west-1"]);
    }

    #[test]
    fn test_validate_rejects_blank_region() {
        let config = InventoryConfig {
            regions: vec!["".to_string()],
            ..InventoryConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(InventoryError::InvalidConfig { field: "regions", .. })
        ));
    }

    #[test]
    fn test_exclusions() {
        let config = InventoryConfig {
            exclude: vec![ResourceCategory::Dynamodb],
            ..InventoryConfig::default()
        };
        let exclusions = config.exclusions();
        assert!(exclusions.is_excluded(ResourceCategory::Dynamodb));
        assert!(exclusions.includes(ResourceCategory::Ec2));
    }
}
