//! Exception strategies.

use faultline_component::{ComponentValue, GroupingComponent};

use super::stacktrace::IS_EXCEPTION;
use super::{mismatch, selected_variant, single};
use crate::context::GroupingContext;
use crate::error::Result;
use crate::event::{Event, InterfaceRef, paths};
use crate::grouping_strategy;
use crate::registry::strategy;
use crate::strategy::{ReturnedVariants, StrategyFunc};
use crate::variants::produces_variants;


fn single_exception(interface: InterfaceRef<'_>, event: &Event, context: &mut GroupingContext<'_>) -> Result<ReturnedVariants> {
	let InterfaceRef::SingleException(exception) = interface else {
		return Err(mismatch(paths::SINGLE_EXCEPTION, interface));
	};
	let variant = selected_variant(context)?;
	let mut values: Vec<ComponentValue> = Vec::with_capacity(3);

	if let Some(ty) = exception.ty.as_deref().filter(|t| !t.is_empty()) {
		values.push(GroupingComponent::with_values("type", [ty]).into());
	}

	let mut stacktrace_contributes = false;
	if let Some(stacktrace) = &exception.stacktrace {
		let component = context.get_single_grouping_component_with(InterfaceRef::Stacktrace(stacktrace), event, [(IS_EXCEPTION, true)])?;
		stacktrace_contributes = component.contributes();
		values.push(component.into());
	}

	if let Some(value) = exception.value.as_deref().filter(|v| !v.is_empty()) {
		let mut component = GroupingComponent::with_values("value", [value]);
		if stacktrace_contributes {
			component.update(Some(false), Some("ignored because stacktrace takes precedence".to_owned()), None);
		}
		values.push(component.into());
	}

	Ok(single(variant, GroupingComponent::with_values("exception", values)))
}

fn chained_exception(interface: InterfaceRef<'_>, event: &Event, context: &mut GroupingContext<'_>) -> Result<ReturnedVariants> {
	let InterfaceRef::Exception(chain) = interface else {
		return Err(mismatch(paths::EXCEPTION, interface));
	};
	let variant = selected_variant(context)?;

	let mut exceptions = Vec::with_capacity(chain.values.len());
	for exception in &chain.values {
		exceptions.push(context.get_single_grouping_component(InterfaceRef::SingleException(exception), event)?);
	}

	let component = if exceptions.len() == 1 {
		exceptions.remove(0)
	} else {
		GroupingComponent::with_values("chained-exception", exceptions)
	};
	Ok(single(variant, component))
}

/// Stops variants without a contributing stacktrace from contributing when
/// another variant has one. They are kept for reporting.
fn mark_non_stacktrace_variants(mut variants: ReturnedVariants, _event: &Event, _context: &mut GroupingContext<'_>) -> Result<ReturnedVariants> {
	let mut with_stacktrace: Vec<String> = Vec::new();
	let mut without_stacktrace: Vec<String> = Vec::new();

	for (name, component) in &variants {
		if component.iter_subcomponents("stacktrace", true, true).is_empty() {
			without_stacktrace.push(name.clone());
		} else {
			with_stacktrace.push(name.clone());
		}
	}
	if with_stacktrace.is_empty() || without_stacktrace.is_empty() {
		return Ok(variants);
	}

	with_stacktrace.sort_unstable();
	let (noun, verb) = if with_stacktrace.len() == 1 { ("variant", "does") } else { ("variants", "do") };
	let hint = format!(
		"ignored because this variant does not have a contributing stacktrace, but the {} {noun} {verb}",
		with_stacktrace.join("/")
	);

	for name in &without_stacktrace {
		if let Some(component) = variants.get_mut(name) {
			component.update(Some(false), Some(hint.clone()), None);
		}
	}
	Ok(variants)
}

grouping_strategy!(
	single_exception_v1,
	strategy(&["single-exception:v1"], paths::SINGLE_EXCEPTION, None, StrategyFunc::Plain(single_exception))
);

grouping_strategy!(
	chained_exception_v1,
	strategy(&["chained-exception:v1"], paths::EXCEPTION, Some(2000), produces_variants(&["!system", "app"], chained_exception))
		.with_variant_processor(mark_non_stacktrace_variants)
);
