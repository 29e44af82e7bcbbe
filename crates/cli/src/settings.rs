//! Settings file.
//!
//! ```toml
//! default_config = "newstyle:2023-01-11"
//!
//! [[configurations]]
//! id = "custom:2024-06-01"
//! base = "newstyle:2023-01-11"
//! strategies = ["message:v1"]
//! ```

use std::path::Path;

use anyhow::Context;
use faultline_grouping::{ConfigResult, ConfigurationDb, ConfigurationDbBuilder, ConfigurationDecl, StrategyRegistry};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
	/// Configuration used by `hash` when none is given on the command line.
	pub default_config: Option<String>,
	/// Overrides which configuration is reported as latest.
	pub latest_config: Option<String>,
	/// Extra configurations, layered over the built-ins in order.
	pub configurations: Vec<ConfigurationDecl>,
}

impl Settings {
	pub fn load(path: &Path) -> anyhow::Result<Self> {
		let text = std::fs::read_to_string(path).with_context(|| format!("reading settings {}", path.display()))?;
		Self::parse(&text).with_context(|| format!("parsing settings {}", path.display()))
	}

	pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
		toml::from_str(text)
	}

	/// Built-in configurations plus the declared ones.
	pub fn build_db(&self) -> ConfigResult<ConfigurationDb> {
		let mut builder = ConfigurationDbBuilder::new(StrategyRegistry::builtin()).extend_from(ConfigurationDb::builtin());
		builder.add_all(&self.configurations)?;
		if let Some(latest) = &self.latest_config {
			builder.latest(latest.as_str())?;
		}
		Ok(builder.build())
	}
}
