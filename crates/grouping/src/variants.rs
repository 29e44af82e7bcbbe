//! Variant production helpers.
//!
//! A strategy can either be told by its caller which variant to compute, or
//! compute all of its variants itself. [`produces_variants`] wraps a function
//! that computes exactly one variant per call (the one bound under
//! `context["variant"]`) so it can serve both roles:
//!
//! - with a variant already selected, the function runs once as a plain delegate;
//! - with no variant selected, it runs once per declared variant and the
//!   results are merged under the declared names, `!` markers preserved, ready
//!   for the priority deduplication in [`Strategy::get_grouping_components`].
//!
//! [`Strategy::get_grouping_components`]: crate::strategy::Strategy::get_grouping_components

use rustc_hash::FxHashSet as HashSet;

use crate::context::{GroupingContext, VARIANT_KEY};
use crate::error::{ConfigError, ConfigResult, GroupingError, Result};
use crate::event::{Event, InterfaceRef};
use crate::strategy::{PRIORITY_PREFIX, ReturnedVariants, StrategyFn, StrategyFunc};

#[cfg(test)]
mod tests;

/// A strategy function paired with the variant names it declares.
#[derive(Clone, Copy)]
pub struct VariantProducer {
	variants: &'static [&'static str],
	func: StrategyFn,
}

impl VariantProducer {
	/// Declared variant names, `!` markers included.
	pub fn variants(&self) -> &'static [&'static str] {
		self.variants
	}

	pub fn call(&self, interface: InterfaceRef<'_>, event: &Event, context: &mut GroupingContext<'_>) -> Result<ReturnedVariants> {
		call_with_variants(self.func, self.variants, interface, event, context)
	}
}

/// Declares that `func` produces exactly the given variants.
///
/// A `!` prefix marks a priority variant; the function itself is always
/// called with the bare name.
pub const fn produces_variants(variants: &'static [&'static str], func: StrategyFn) -> StrategyFunc {
	StrategyFunc::Variants(VariantProducer { variants, func })
}

/// Strips the priority marker from a declared variant name.
pub fn strip_priority(name: &str) -> &str {
	name.trim_start_matches(PRIORITY_PREFIX)
}

/// Rejects declarations in which two names collapse to the same variant once
/// the priority marker is stripped.
pub fn validate_variant_names(variants: &[&str]) -> ConfigResult<()> {
	let mut seen = HashSet::default();
	for name in variants {
		let bare = strip_priority(name);
		if !seen.insert(bare) {
			return Err(ConfigError::AmbiguousVariant {
				variant: bare.to_owned(),
			});
		}
	}
	Ok(())
}

/// Calls `f` for the selected variant, or once per declared variant.
///
/// With a variant already selected in `context`, it must be one of
/// `variants` (with or without marker) and `f`'s result is returned as is.
/// Otherwise every call must return exactly one entry keyed by the bare
/// variant name; the merged map is keyed by the declared names.
pub fn call_with_variants(
	f: StrategyFn,
	variants: &[&str],
	interface: InterfaceRef<'_>,
	event: &Event,
	context: &mut GroupingContext<'_>,
) -> Result<ReturnedVariants> {
	if let Some(requested) = context.variant() {
		if !variants.iter().any(|v| strip_priority(v) == requested) {
			return Err(GroupingError::UndeclaredVariant {
				variant: requested.to_owned(),
				declared: variants.iter().map(|v| (*v).to_owned()).collect(),
			});
		}
		return f(interface, event, context);
	}

	let mut rv = ReturnedVariants::with_capacity(variants.len());
	for &declared in variants {
		let bare = strip_priority(declared);
		let mut scope = context.scope();
		scope.set(VARIANT_KEY, bare);
		let mut produced = f(interface, event, &mut *scope)?;
		if produced.len() != 1 {
			return Err(GroupingError::UnexpectedVariantCount {
				expected: 1,
				got: produced.len(),
			});
		}
		let component = produced
			.shift_remove(bare)
			.ok_or_else(|| GroupingError::MissingVariantComponent(bare.to_owned()))?;
		rv.insert(declared.to_owned(), component);
	}
	Ok(rv)
}
