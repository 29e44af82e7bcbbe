//! Strategy registry.
//!
//! Strategies are declared with [`strategy`] and registered into a
//! [`StrategyRegistry`]. Built-in declarations are submitted through
//! `inventory` by the `grouping_strategy!` macro and collected once into the
//! process-wide [`StrategyRegistry::builtin`] instance; after that the
//! registry is only read.

use std::sync::{Arc, OnceLock};

use rustc_hash::FxHashMap as HashMap;

use crate::error::{ConfigError, ConfigResult, UnknownStrategy};
use crate::strategy::{Strategy, StrategyFunc, VariantProcessorFn};

#[cfg(test)]
mod tests;

/// Static strategy declaration.
///
/// Every id in `ids` becomes its own [`Strategy`] sharing the same function
/// and metadata, which lets one implementation serve several version aliases.
#[derive(Clone, Copy)]
pub struct StrategyDecl {
	pub ids: &'static [&'static str],
	pub interface: &'static str,
	pub score: Option<i32>,
	pub func: StrategyFunc,
	pub variant_processor: Option<VariantProcessorFn>,
}

impl std::fmt::Debug for StrategyDecl {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StrategyDecl")
			.field("ids", &self.ids)
			.field("interface", &self.interface)
			.field("score", &self.score)
			.field("func", &self.func)
			.field("variant_processor", &self.variant_processor.is_some())
			.finish()
	}
}

impl StrategyDecl {
	/// Attaches a post-processor run on the full variant map.
	pub const fn with_variant_processor(mut self, processor: VariantProcessorFn) -> Self {
		self.variant_processor = Some(processor);
		self
	}
}

/// Declares a strategy for `interface` under one or more ids.
///
/// `score` decides precedence between top-level strategies; unscored
/// strategies can only be used as delegates.
pub const fn strategy(ids: &'static [&'static str], interface: &'static str, score: Option<i32>, func: StrategyFunc) -> StrategyDecl {
	StrategyDecl {
		ids,
		interface,
		score,
		func,
		variant_processor: None,
	}
}

/// Wrapper for `inventory::collect!`.
pub struct StrategyReg(pub &'static StrategyDecl);

inventory::collect!(StrategyReg);

/// Lookup table from strategy id to strategy.
#[derive(Debug, Default)]
pub struct StrategyRegistry {
	by_id: HashMap<Box<str>, Arc<Strategy>>,
	id_order: Vec<Box<str>>,
}

impl StrategyRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a registry holding every built-in declaration.
	pub fn with_builtins() -> ConfigResult<Self> {
		let mut decls: Vec<&'static StrategyDecl> = inventory::iter::<StrategyReg>.into_iter().map(|r| r.0).collect();
		decls.sort_by_key(|d| d.ids.first().copied());

		let mut registry = Self::new();
		for decl in decls {
			registry.register(decl)?;
		}
		Ok(registry)
	}

	/// The process-wide registry of built-in strategies.
	pub fn builtin() -> &'static StrategyRegistry {
		static REGISTRY: OnceLock<StrategyRegistry> = OnceLock::new();
		REGISTRY.get_or_init(|| {
			Self::with_builtins().unwrap_or_else(|e| {
				tracing::error!("Builtin strategy registration failed: {}", e);
				Self::new()
			})
		})
	}

	/// Registers every id of `decl`, returning the strategy for the last id.
	///
	/// Registering an id that already exists replaces the previous entry.
	pub fn register(&mut self, decl: &StrategyDecl) -> ConfigResult<Arc<Strategy>> {
		let mut rv = None;
		for &id in decl.ids {
			let strategy = Arc::new(Strategy::new(id, decl.interface, decl.score, decl.func, decl.variant_processor)?);
			if self.by_id.insert(Box::from(id), strategy.clone()).is_some() {
				tracing::debug!(domain = "grouping", id, "strategy id re-registered; replacing previous entry");
			} else {
				self.id_order.push(Box::from(id));
			}
			rv = Some(strategy);
		}
		rv.ok_or_else(|| ConfigError::EmptyStrategyIds {
			interface: decl.interface.to_owned(),
		})
	}

	/// Looks up a strategy by id.
	pub fn lookup(&self, id: &str) -> Result<Arc<Strategy>, UnknownStrategy> {
		self.by_id.get(id).cloned().ok_or_else(|| UnknownStrategy(id.to_owned()))
	}

	#[inline]
	pub fn get(&self, id: &str) -> Option<&Arc<Strategy>> {
		self.by_id.get(id)
	}

	/// Strategies in first-registration order.
	pub fn iter(&self) -> impl Iterator<Item = &Arc<Strategy>> {
		self.id_order.iter().filter_map(|id| self.by_id.get(id))
	}

	pub fn len(&self) -> usize {
		self.by_id.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_id.is_empty()
	}
}

/// Declares a built-in strategy and submits it for collection.
///
/// ```ignore
/// grouping_strategy!(frame_v1, strategy(&["frame:v1"], paths::FRAME, None, StrategyFunc::Plain(frame)));
/// ```
#[macro_export]
macro_rules! grouping_strategy {
	($name:ident, $decl:expr) => {
		paste::paste! {
			#[allow(non_upper_case_globals)]
			pub(crate) static [<STRATEGY_ $name>]: $crate::registry::StrategyDecl = $decl;

			inventory::submit!($crate::registry::StrategyReg(&[<STRATEGY_ $name>]));
		}
	};
}
