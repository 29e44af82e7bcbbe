//! Stacktrace strategy.
//!
//! Produces a `system` variant over all frames and an `app` variant in which
//! only in-app frames contribute. `system` is the priority variant, so an
//! `app` stacktrace identical to it is suppressed.

use faultline_component::GroupingComponent;

use super::{mismatch, selected_variant, single};
use crate::context::GroupingContext;
use crate::error::Result;
use crate::event::{Event, InterfaceRef, Stacktrace, paths};
use crate::grouping_strategy;
use crate::registry::strategy;
use crate::strategy::ReturnedVariants;
use crate::variants::produces_variants;

/// Context flag set while a stacktrace is grouped as part of an exception.
pub const IS_EXCEPTION: &str = "is_exception";

fn stacktrace_component(stacktrace: &Stacktrace, event: &Event, context: &mut GroupingContext<'_>) -> Result<GroupingComponent> {
	let mut frames = Vec::with_capacity(stacktrace.frames.len());
	for frame in &stacktrace.frames {
		frames.push(context.get_single_grouping_component(InterfaceRef::Frame(frame), event)?);
	}

	let single_foreign_frame = frames.len() == 1 && !stacktrace.frames[0].is_in_app();
	let mut component = GroupingComponent::with_values("stacktrace", frames);

	if stacktrace.frames.is_empty() {
		component.update(Some(false), Some("ignored because it contains no frames".to_owned()), None);
	} else if !context.get_bool(IS_EXCEPTION)? && single_foreign_frame {
		component.update(Some(false), Some("ignored single non-app stack frame".to_owned()), None);
	} else if !component.contributes() {
		component.update(None, Some("ignored because it contains no contributing frames".to_owned()), None);
	}
	Ok(component)
}

fn stacktrace(interface: InterfaceRef<'_>, event: &Event, context: &mut GroupingContext<'_>) -> Result<ReturnedVariants> {
	let InterfaceRef::Stacktrace(stacktrace) = interface else {
		return Err(mismatch(paths::STACKTRACE, interface));
	};
	let variant = selected_variant(context)?;
	let component = stacktrace_component(stacktrace, event, context)?;
	Ok(single(variant, component))
}

grouping_strategy!(
	stacktrace_v1,
	strategy(&["stacktrace:v1"], paths::STACKTRACE, Some(1800), produces_variants(&["!system", "app"], stacktrace))
);
