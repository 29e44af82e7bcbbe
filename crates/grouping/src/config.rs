//! Strategy configurations.
//!
//! A [`StrategyConfiguration`] is one versioned grouping algorithm: the set of
//! top-level strategies it scores, the delegate handling each interface, the
//! seed values for every grouping context, and metadata about rollout risk and
//! rule-set bases.
//!
//! Configurations inherit from at most one base. Building a child copies the
//! base's tables and then applies the child's declaration:
//!
//! - a new strategy replaces every inherited strategy of the same class;
//! - a new delegate replaces the inherited delegate for its interface;
//! - initial context values are merged over the inherited ones;
//! - rule-set bases are replaced only when given.
//!
//! Anything the child does not mention stays as inherited.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
use serde::{Deserialize, Serialize, Serializer};

use crate::context::ContextFrame;
use crate::error::{ConfigError, ConfigResult};
use crate::registry::StrategyRegistry;
use crate::strategy::Strategy;


/// Rollout risk of switching a project to a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Risk {
	#[default]
	Low,
	Medium,
	High,
}

impl Risk {
	/// Numeric level used in summaries (0 = low).
	pub const fn level(self) -> u8 {
		match self {
			Risk::Low => 0,
			Risk::Medium => 1,
			Risk::High => 2,
		}
	}
}

impl Serialize for Risk {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_u8(self.level())
	}
}

/// Declarative input for [`create_strategy_configuration`].
///
/// Deserializable so that configurations can be declared in settings files.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigurationDecl {
	pub id: Option<String>,
	/// Id of the base configuration. Resolved by [`crate::db::ConfigurationDb`];
	/// [`create_strategy_configuration`] takes the resolved base directly.
	pub base: Option<String>,
	/// Strategy ids to enable or override by class.
	pub strategies: Vec<String>,
	/// Strategy ids to use as delegates, one per interface.
	pub delegates: Vec<String>,
	pub changelog: Option<String>,
	pub hidden: bool,
	pub risk: Option<Risk>,
	pub initial_context: ContextFrame,
	pub enhancements_base: Option<String>,
	pub fingerprinting_bases: Option<Vec<String>>,
}

/// An immutable, named grouping configuration.
#[derive(Debug)]
pub struct StrategyConfiguration {
	id: Option<String>,
	base: Option<Arc<StrategyConfiguration>>,
	strategies: IndexMap<String, Arc<Strategy>>,
	delegates: IndexMap<String, Arc<Strategy>>,
	initial_context: ContextFrame,
	risk: Risk,
	hidden: bool,
	changelog: String,
	enhancements_base: Option<String>,
	fingerprinting_bases: Option<Vec<String>>,
}

/// Serializable summary used by reporting and documentation tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationSummary {
	pub id: Option<String>,
	pub base: Option<String>,
	pub strategies: Vec<String>,
	pub changelog: String,
	pub delegates: Vec<String>,
	pub hidden: bool,
	pub risk: Risk,
	pub latest: bool,
}

impl StrategyConfiguration {
	pub fn id(&self) -> Option<&str> {
		self.id.as_deref()
	}

	pub fn base(&self) -> Option<&Arc<StrategyConfiguration>> {
		self.base.as_ref()
	}

	/// Enabled top-level strategies keyed by id.
	pub fn strategies(&self) -> &IndexMap<String, Arc<Strategy>> {
		&self.strategies
	}

	/// Delegates keyed by interface name.
	pub fn delegates(&self) -> &IndexMap<String, Arc<Strategy>> {
		&self.delegates
	}

	pub fn initial_context(&self) -> &ContextFrame {
		&self.initial_context
	}

	pub fn risk(&self) -> Risk {
		self.risk
	}

	pub fn hidden(&self) -> bool {
		self.hidden
	}

	pub fn changelog(&self) -> &str {
		&self.changelog
	}

	pub fn enhancements_base(&self) -> Option<&str> {
		self.enhancements_base.as_deref()
	}

	pub fn fingerprinting_bases(&self) -> Option<&[String]> {
		self.fingerprinting_bases.as_deref()
	}

	/// Enabled strategies by descending score.
	///
	/// Unscored strategies sort as score 0. Ties keep declaration order.
	pub fn iter_strategies(&self) -> impl Iterator<Item = &Arc<Strategy>> {
		let mut strategies: Vec<&Arc<Strategy>> = self.strategies.values().collect();
		strategies.sort_by_key(|s| std::cmp::Reverse(s.score().unwrap_or(0)));
		strategies.into_iter()
	}

	/// Summarizes the configuration. `latest` is the id currently regarded as
	/// the default for new projects.
	pub fn as_dict(&self, latest: Option<&str>) -> ConfigurationSummary {
		let mut strategies: Vec<String> = self.strategies.keys().cloned().collect();
		strategies.sort();
		let mut delegates: Vec<String> = self.delegates.values().map(|s| s.id().to_owned()).collect();
		delegates.sort();

		ConfigurationSummary {
			id: self.id.clone(),
			base: self.base.as_ref().and_then(|b| b.id.clone()),
			strategies,
			changelog: self.changelog.clone(),
			delegates,
			hidden: self.hidden,
			risk: self.risk,
			latest: latest.is_some() && latest == self.id.as_deref(),
		}
	}
}

/// Builds a configuration from a declaration and an optional base.
///
/// Fails when a listed strategy is unknown or unscored, or when two listed
/// delegates claim the same interface.
pub fn create_strategy_configuration(
	registry: &StrategyRegistry,
	decl: &ConfigurationDecl,
	base: Option<Arc<StrategyConfiguration>>,
) -> ConfigResult<StrategyConfiguration> {
	let config_label = decl.id.clone().unwrap_or_else(|| "<anonymous>".to_owned());

	let (mut strategies, mut delegates, mut initial_context, mut enhancements_base, mut fingerprinting_bases) = match &base {
		Some(b) => (
			b.strategies.clone(),
			b.delegates.clone(),
			b.initial_context.clone(),
			b.enhancements_base.clone(),
			b.fingerprinting_bases.clone(),
		),
		None => (IndexMap::new(), IndexMap::new(), ContextFrame::default(), None, None),
	};

	let mut by_class: HashMap<String, Vec<String>> = HashMap::default();
	for strategy in strategies.values() {
		by_class
			.entry(strategy.strategy_class().to_owned())
			.or_default()
			.push(strategy.id().to_owned());
	}

	for strategy_id in &decl.strategies {
		let strategy = registry.lookup(strategy_id)?;
		if strategy.score().is_none() {
			return Err(ConfigError::UnscoredStrategy {
				strategy: strategy_id.clone(),
				config: config_label,
			});
		}
		for old_id in by_class.get(strategy.strategy_class()).into_iter().flatten() {
			strategies.shift_remove(old_id);
		}
		strategies.insert(strategy_id.clone(), strategy);
	}

	let mut new_delegates = HashSet::default();
	for strategy_id in &decl.delegates {
		let strategy = registry.lookup(strategy_id)?;
		let interface = strategy.interface_name().to_owned();
		if !new_delegates.insert(interface.clone()) {
			return Err(ConfigError::DuplicateDelegate {
				config: config_label,
				interface,
			});
		}
		delegates.insert(interface, strategy);
	}

	initial_context.extend(decl.initial_context.iter().map(|(k, v)| (k.clone(), v.clone())));

	if let Some(e) = decl.enhancements_base.as_ref().filter(|e| !e.is_empty()) {
		enhancements_base = Some(e.clone());
	}
	if let Some(f) = decl.fingerprinting_bases.as_ref().filter(|f| !f.is_empty()) {
		fingerprinting_bases = Some(f.clone());
	}

	tracing::debug!(
		domain = "grouping",
		config = %config_label,
		base = base.as_ref().and_then(|b| b.id()).unwrap_or("-"),
		strategies = strategies.len(),
		delegates = delegates.len(),
		"strategy configuration built",
	);

	Ok(StrategyConfiguration {
		id: decl.id.clone(),
		base,
		strategies,
		delegates,
		initial_context,
		risk: decl.risk.unwrap_or_default(),
		hidden: decl.hidden,
		changelog: clean_doc(decl.changelog.as_deref().unwrap_or("")),
		enhancements_base,
		fingerprinting_bases,
	})
}

/// Removes surrounding blank lines and the common indentation of a block of text.
///
/// The first line's indentation is ignored when computing the common margin.
pub fn clean_doc(text: &str) -> String {
	let text = text.replace('\t', "    ");
	let lines: Vec<&str> = text.lines().collect();
	let Some((first, rest)) = lines.split_first() else {
		return String::new();
	};

	let margin = rest
		.iter()
		.filter(|l| !l.trim().is_empty())
		.map(|l| l.len() - l.trim_start().len())
		.min()
		.unwrap_or(0);

	let mut out: Vec<&str> = Vec::with_capacity(lines.len());
	out.push(first.trim_start());
	out.extend(rest.iter().map(|l| if l.len() >= margin { &l[margin..] } else { l.trim_start() }));

	while out.first().is_some_and(|l| l.trim().is_empty()) {
		out.remove(0);
	}
	while out.last().is_some_and(|l| l.trim().is_empty()) {
		out.pop();
	}
	out.iter().map(|l| l.trim_end()).collect::<Vec<_>>().join("\n")
}
