use anyhow::Result;
use config::Config;
use serde::Deserialize;

/// Block rules validator configuration (from TOML).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BlockRulesValidatorConfig {
    pub block_subscribe_topic: String,
    pub settings_subscribe_topic: String,
    pub validation_publish_topic: String,
    pub settings_history_depth: usize,
    pub max_pending_blocks: usize,
}

impl BlockRulesValidatorConfig {
    pub fn try_load(config: &Config) -> Result<Self> {
        let full = Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config.default.toml"),
                config::FileFormat::Toml,
            ))
            .add_source(config.clone())
            .build()?;
        Ok(full.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_to_empty_config() {
        let config = BlockRulesValidatorConfig::try_load(&Config::default()).unwrap();
        assert_eq!(
            config,
            BlockRulesValidatorConfig {
                block_subscribe_topic: "ledger.block.proposed".to_string(),
                settings_subscribe_topic: "ledger.settings".to_string(),
                validation_publish_topic: "ledger.validation.block-rules".to_string(),
                settings_history_depth: 256,
                max_pending_blocks: 64,
            }
        );
    }

    #[test]
    fn test_module_section_overrides_defaults() {
        let module_config = Config::builder()
            .add_source(config::File::from_str(
                "validation-publish-topic = \"custom.validation\"\nsettings-history-depth = 8",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let config = BlockRulesValidatorConfig::try_load(&module_config).unwrap();
        assert_eq!(config.validation_publish_topic, "custom.validation");
        assert_eq!(config.settings_history_depth, 8);
        assert_eq!(config.block_subscribe_topic, "ledger.block.proposed");
        assert_eq!(config.max_pending_blocks, 64);
    }
}
