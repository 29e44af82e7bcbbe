//! Variant calculation across all strategies of a configuration.

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::StrategyConfiguration;
use crate::context::GroupingContext;
use crate::error::Result;
use crate::event::Event;
use faultline_component::GroupingComponent;

/// Name of the variant produced by strategies that have a single one.
pub const DEFAULT_VARIANT: &str = "default";

/// Root component per variant, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GroupingVariants {
	variants: IndexMap<String, GroupingComponent>,
}

impl GroupingVariants {
	pub fn get(&self, variant: &str) -> Option<&GroupingComponent> {
		self.variants.get(variant)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &GroupingComponent)> {
		self.variants.iter().map(|(k, v)| (k.as_str(), v))
	}

	pub fn len(&self) -> usize {
		self.variants.len()
	}

	pub fn is_empty(&self) -> bool {
		self.variants.is_empty()
	}

	/// Distinct non-null hashes, in variant order.
	pub fn hashes(&self) -> Vec<String> {
		let mut rv: Vec<String> = Vec::with_capacity(self.variants.len());
		for hash in self.variants.values().filter_map(GroupingComponent::get_hash) {
			if !rv.contains(&hash) {
				rv.push(hash);
			}
		}
		rv
	}

	pub fn into_inner(self) -> IndexMap<String, GroupingComponent> {
		self.variants
	}
}

/// Runs every strategy of `config` on `event` and folds the results into one
/// root component per variant.
///
/// Strategies run by descending score. The first strategy that yields any
/// contributing component wins: contributing components of every later
/// strategy are kept for reporting but marked non-contributing, and roots left
/// without a contributing child carry the same precedence hint.
pub fn calculate_grouping_variants(event: &Event, config: &StrategyConfiguration) -> Result<GroupingVariants> {
	let mut context = GroupingContext::new(config);
	let mut winner: Option<&str> = None;
	let mut hint: Option<String> = None;
	let mut collected: IndexMap<String, Vec<GroupingComponent>> = IndexMap::new();

	for strategy in config.iter_strategies() {
		let rv = strategy.get_grouping_components(event, &mut context)?;
		let descriptor = {
			let mut contributing: Vec<&str> = rv.iter().filter(|(_, c)| c.contributes()).map(|(v, _)| v.as_str()).collect();
			contributing.sort_unstable();
			contributing.join("/")
		};

		for (variant, mut component) in rv {
			if component.contributes() {
				match winner {
					None => {
						winner = Some(strategy.name());
						hint = Some(precedence_hint(strategy.name(), &variant, &descriptor));
					}
					Some(w) if w != strategy.name() => component.update(Some(false), hint.clone(), None),
					Some(_) => {}
				}
			}
			collected.entry(variant).or_default().push(component);
		}
	}

	let variants = collected
		.into_iter()
		.map(|(variant, components)| {
			let mut root = GroupingComponent::with_values(variant.clone(), components);
			if !root.contributes() {
				root.update(None, hint.clone(), None);
			}
			(variant, root)
		})
		.collect();

	tracing::debug!(
		domain = "grouping",
		config = config.id().unwrap_or("<anonymous>"),
		event_id = event.event_id.as_deref().unwrap_or("-"),
		winner = winner.unwrap_or("-"),
		"grouping variants calculated",
	);

	Ok(GroupingVariants { variants })
}

/// `"<winner> take(s) precedence"`, naming the winner's contributing
/// variants (sorted, `/`-joined) unless the winning variant is `default`.
fn precedence_hint(winner: &str, variant: &str, descriptor: &str) -> String {
	let verb = if winner.ends_with('s') { "take" } else { "takes" };
	if variant == DEFAULT_VARIANT {
		format!("{winner} {verb} precedence")
	} else {
		format!("{winner} of {descriptor} {verb} precedence")
	}
}
