use serde::{Deserialize, Serialize};

use crate::plan::NameMapping;

/// Settings of a scanning engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Skip result columns that match no destination field instead of failing.
    pub allow_unknown_columns: bool,
    pub name_mapping: NameMapping,
    /// Joins a nested struct's prefix and its field names.
    pub prefix_separator: String,
}

impl ScanConfig {
    pub fn new() -> Self {
        Self {
            allow_unknown_columns: false,
            name_mapping: NameMapping::SnakeCase,
            prefix_separator: ".".to_string(),
        }
    }

    pub fn allow_unknown_columns(mut self, allow: bool) -> Self {
        self.allow_unknown_columns = allow;
        self
    }

    pub fn name_mapping(mut self, mapping: NameMapping) -> Self {
        self.name_mapping = mapping;
        self
    }

    pub fn prefix_separator(mut self, separator: impl Into<String>) -> Self {
        self.prefix_separator = separator.into();
        self
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = ScanConfig::new()
            .allow_unknown_columns(true)
            .name_mapping(NameMapping::Lowercase)
            .prefix_separator("__");

        assert!(config.allow_unknown_columns);
        assert_eq!(config.name_mapping, NameMapping::Lowercase);
        assert_eq!(config.prefix_separator, "__");
        assert!(!ScanConfig::default().allow_unknown_columns);
    }

    #[test]
    fn test_bincode_persistence() -> Result<(), bincode::Error> {
        let config = ScanConfig::new()
            .name_mapping(NameMapping::Verbatim)
            .prefix_separator("_");

        let bytes = bincode::serialize(&config)?;
        let restored: ScanConfig = bincode::deserialize(&bytes)?;
        assert_eq!(restored, config);
        Ok(())
    }
}
