//! Strategies and variant reduction.
//!
//! A [`Strategy`] is one registered, interface-typed unit of computation. It
//! turns an interface of an event into a map of variant name to
//! [`GroupingComponent`]. Variant names prefixed with `!` are priority
//! variants: after the strategy runs, any non-priority variant whose hash
//! equals a priority variant's hash is marked as non-contributing.

use std::fmt;

use indexmap::IndexMap;

use crate::context::GroupingContext;
use crate::error::{ConfigResult, GroupingError, Result};
use crate::event::{Event, InterfaceRef};
use crate::variants::{self, VariantProducer};
use faultline_component::GroupingComponent;


/// Variant name to component, in production order.
pub type ReturnedVariants = IndexMap<String, GroupingComponent>;

/// Signature of a strategy function.
pub type StrategyFn = fn(InterfaceRef<'_>, &Event, &mut GroupingContext<'_>) -> Result<ReturnedVariants>;

/// Signature of a variant post-processor.
///
/// Receives and returns the full variant map of one strategy invocation.
pub type VariantProcessorFn = fn(ReturnedVariants, &Event, &mut GroupingContext<'_>) -> Result<ReturnedVariants>;

/// Marker prefix flagging a priority variant.
pub const PRIORITY_PREFIX: char = '!';

/// How a strategy produces its variants.
#[derive(Clone, Copy)]
pub enum StrategyFunc {
	/// The function decides its own variants, or computes the one selected in the context.
	Plain(StrategyFn),
	/// The function computes one declared variant per call; see [`variants::produces_variants`].
	Variants(VariantProducer),
}

impl fmt::Debug for StrategyFunc {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			StrategyFunc::Plain(_) => f.write_str("StrategyFunc::Plain(..)"),
			StrategyFunc::Variants(p) => f.debug_tuple("StrategyFunc::Variants").field(&p.variants()).finish(),
		}
	}
}

impl From<StrategyFn> for StrategyFunc {
	fn from(f: StrategyFn) -> Self {
		StrategyFunc::Plain(f)
	}
}

impl From<VariantProducer> for StrategyFunc {
	fn from(p: VariantProducer) -> Self {
		StrategyFunc::Variants(p)
	}
}

/// A registered grouping strategy.
///
/// Created once at registration and immutable afterwards.
pub struct Strategy {
	id: String,
	strategy_class: String,
	interface_name: String,
	score: Option<i32>,
	func: StrategyFunc,
	variant_processor: Option<VariantProcessorFn>,
}

impl fmt::Debug for Strategy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Strategy")
			.field("id", &self.id)
			.field("interface", &self.interface_name)
			.field("score", &self.score)
			.finish_non_exhaustive()
	}
}

impl Strategy {
	/// Creates a strategy. `strategy_class` is the part of `id` before the first `:`.
	pub fn new(
		id: impl Into<String>,
		interface_name: impl Into<String>,
		score: Option<i32>,
		func: StrategyFunc,
		variant_processor: Option<VariantProcessorFn>,
	) -> ConfigResult<Self> {
		if let StrategyFunc::Variants(producer) = &func {
			variants::validate_variant_names(producer.variants())?;
		}
		let id = id.into();
		let strategy_class = id.split_once(':').map_or(id.as_str(), |(class, _)| class).to_owned();
		Ok(Self {
			id,
			strategy_class,
			interface_name: interface_name.into(),
			score,
			func,
			variant_processor,
		})
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	/// Family identifier used for override-on-upgrade.
	pub fn strategy_class(&self) -> &str {
		&self.strategy_class
	}

	/// The interface this strategy consumes. Doubles as its display name.
	pub fn interface_name(&self) -> &str {
		&self.interface_name
	}

	pub fn name(&self) -> &str {
		&self.interface_name
	}

	/// Precedence among top-level strategies; `None` means delegate-only.
	pub fn score(&self) -> Option<i32> {
		self.score
	}

	pub fn has_variant_processor(&self) -> bool {
		self.variant_processor.is_some()
	}

	/// Invokes the strategy function on an interface.
	pub fn call(&self, interface: InterfaceRef<'_>, event: &Event, context: &mut GroupingContext<'_>) -> Result<ReturnedVariants> {
		match self.func {
			StrategyFunc::Plain(f) => f(interface, event, context),
			StrategyFunc::Variants(producer) => producer.call(interface, event, context),
		}
	}

	/// Computes components for this strategy's interface on `event`.
	///
	/// Returns `None` when the event lacks the interface. When `variant` is
	/// given it is bound in a fresh scope for the duration of the call.
	pub fn get_grouping_component(
		&self,
		event: &Event,
		context: &mut GroupingContext<'_>,
		variant: Option<&str>,
	) -> Result<Option<ReturnedVariants>> {
		let Some(interface) = event.interface(&self.interface_name) else {
			return Ok(None);
		};
		let mut scope = context.scope();
		if let Some(variant) = variant {
			scope.set(crate::context::VARIANT_KEY, variant);
		}
		self.call(interface, event, &mut *scope).map(Some)
	}

	/// Computes every variant this strategy produces for `event`.
	///
	/// The `!` marker is stripped from variant names; returning both `x` and
	/// `!x` is an error. Contributing
	/// non-priority variants whose hash equals a contributing priority
	/// variant's hash are marked non-contributing; priority variants are never
	/// suppressed. The variant processor, if any, then receives the full map.
	/// An event without the interface yields an empty map.
	pub fn get_grouping_components(&self, event: &Event, context: &mut GroupingContext<'_>) -> Result<ReturnedVariants> {
		let Some(components_by_variant) = self.get_grouping_component(event, context, None)? else {
			return Ok(ReturnedVariants::new());
		};

		let mut final_components = ReturnedVariants::with_capacity(components_by_variant.len());
		let mut priority_by_hash: IndexMap<Option<String>, String> = IndexMap::new();
		let mut non_priority = Vec::new();

		for (variant_name, component) in components_by_variant {
			let is_priority = variant_name.starts_with(PRIORITY_PREFIX);
			let variant_name = variant_name.trim_start_matches(PRIORITY_PREFIX).to_owned();
			if final_components.contains_key(&variant_name) {
				return Err(GroupingError::AmbiguousVariant { variant: variant_name });
			}

			if component.contributes() {
				if is_priority {
					priority_by_hash.insert(component.get_hash(), variant_name.clone());
				} else {
					non_priority.push(variant_name.clone());
				}
			}

			final_components.insert(variant_name, component);
		}

		for variant_name in non_priority {
			let Some(component) = final_components.get_mut(&variant_name) else {
				continue;
			};
			if let Some(duplicate_of) = priority_by_hash.get(&component.get_hash()) {
				tracing::trace!(
					domain = "grouping",
					strategy = %self.id,
					variant = %variant_name,
					duplicate_of = %duplicate_of,
					"suppressing duplicate variant",
				);
				component.update(Some(false), Some(format!("ignored because hash matches {duplicate_of} variant")), None);
			}
		}

		match self.variant_processor {
			Some(processor) => processor(final_components, event, context),
			None => Ok(final_components),
		}
	}
}
