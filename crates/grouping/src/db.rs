//! Configuration database construction and global accessor.

use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;

use crate::builtins::configurations::{self, DEFAULT_GROUPING_CONFIG};
use crate::config::{ConfigurationDecl, ConfigurationSummary, StrategyConfiguration, create_strategy_configuration};
use crate::error::{ConfigError, ConfigResult};
use crate::registry::StrategyRegistry;

/// Named configurations, in declaration order.
#[derive(Debug, Default)]
pub struct ConfigurationDb {
	configs: IndexMap<String, Arc<StrategyConfiguration>>,
	latest: Option<String>,
}

/// Incrementally builds a [`ConfigurationDb`].
///
/// Declarations must be added base first; a base is resolved by id among the
/// configurations already added.
pub struct ConfigurationDbBuilder<'r> {
	registry: &'r StrategyRegistry,
	configs: IndexMap<String, Arc<StrategyConfiguration>>,
	latest: Option<String>,
}

impl<'r> ConfigurationDbBuilder<'r> {
	pub fn new(registry: &'r StrategyRegistry) -> Self {
		Self {
			registry,
			configs: IndexMap::new(),
			latest: None,
		}
	}

	/// Starts from the configurations of an existing database.
	pub fn extend_from(mut self, db: &ConfigurationDb) -> Self {
		self.configs.extend(db.configs.iter().map(|(k, v)| (k.clone(), v.clone())));
		if self.latest.is_none() {
			self.latest = db.latest.clone();
		}
		self
	}

	/// Builds and stores one declared configuration.
	pub fn add(&mut self, decl: &ConfigurationDecl) -> ConfigResult<Arc<StrategyConfiguration>> {
		let id = decl.id.clone().ok_or(ConfigError::AnonymousConfiguration)?;
		if self.configs.contains_key(&id) {
			return Err(ConfigError::DuplicateConfiguration(id));
		}

		let base = match &decl.base {
			Some(base_id) => Some(self.configs.get(base_id).cloned().ok_or_else(|| ConfigError::UnknownBase {
				config: id.clone(),
				base: base_id.clone(),
			})?),
			None => None,
		};

		let config = Arc::new(create_strategy_configuration(self.registry, decl, base)?);
		self.configs.insert(id, config.clone());
		Ok(config)
	}

	/// Adds every declaration in order, stopping at the first failure.
	pub fn add_all<'d>(&mut self, decls: impl IntoIterator<Item = &'d ConfigurationDecl>) -> ConfigResult<()> {
		for decl in decls {
			self.add(decl)?;
		}
		Ok(())
	}

	/// Marks the configuration regarded as the default for new projects.
	pub fn latest(&mut self, id: impl Into<String>) -> ConfigResult<()> {
		let id = id.into();
		if !self.configs.contains_key(&id) {
			return Err(ConfigError::UnknownConfiguration(id));
		}
		self.latest = Some(id);
		Ok(())
	}

	pub fn build(self) -> ConfigurationDb {
		tracing::debug!(
			domain = "grouping",
			configs = self.configs.len(),
			latest = self.latest.as_deref().unwrap_or("-"),
			"configuration db built",
		);
		ConfigurationDb {
			configs: self.configs,
			latest: self.latest,
		}
	}
}

static DB: OnceLock<ConfigurationDb> = OnceLock::new();

impl ConfigurationDb {
	/// Builds a database holding the built-in configurations.
	pub fn with_builtins(registry: &StrategyRegistry) -> ConfigResult<Self> {
		let mut builder = ConfigurationDbBuilder::new(registry);
		builder.add_all(configurations::builtin_declarations().iter())?;
		builder.latest(DEFAULT_GROUPING_CONFIG)?;
		Ok(builder.build())
	}

	/// The process-wide database of built-in configurations.
	pub fn builtin() -> &'static ConfigurationDb {
		DB.get_or_init(|| {
			Self::with_builtins(StrategyRegistry::builtin()).unwrap_or_else(|e| {
				tracing::error!("Builtin configuration registration failed: {}", e);
				Self::default()
			})
		})
	}

	pub fn get(&self, id: &str) -> Option<&Arc<StrategyConfiguration>> {
		self.configs.get(id)
	}

	pub fn lookup(&self, id: &str) -> ConfigResult<Arc<StrategyConfiguration>> {
		self.configs.get(id).cloned().ok_or_else(|| ConfigError::UnknownConfiguration(id.to_owned()))
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<StrategyConfiguration>)> {
		self.configs.iter().map(|(k, v)| (k.as_str(), v))
	}

	pub fn latest_id(&self) -> Option<&str> {
		self.latest.as_deref()
	}

	pub fn latest(&self) -> Option<&Arc<StrategyConfiguration>> {
		self.latest.as_deref().and_then(|id| self.configs.get(id))
	}

	pub fn len(&self) -> usize {
		self.configs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.configs.is_empty()
	}

	/// Summaries of every configuration, hidden ones included.
	pub fn summaries(&self) -> Vec<ConfigurationSummary> {
		self.configs.values().map(|c| c.as_dict(self.latest_id())).collect()
	}
}
