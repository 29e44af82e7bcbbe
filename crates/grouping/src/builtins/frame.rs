//! Frame delegate.

use faultline_component::{ComponentValue, GroupingComponent};

use super::{mismatch, selected_variant, single};
use crate::context::GroupingContext;
use crate::error::Result;
use crate::event::{Event, Frame, InterfaceRef, paths};
use crate::grouping_strategy;
use crate::registry::strategy;
use crate::strategy::{ReturnedVariants, StrategyFunc};

/// Variant in which only in-app frames contribute.
pub const APP_VARIANT: &str = "app";

fn basename(path: &str) -> &str {
	path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn frame_component(frame: &Frame, variant: &str) -> GroupingComponent {
	let mut values: Vec<ComponentValue> = Vec::with_capacity(2);

	if let Some(module) = frame.module.as_deref().filter(|m| !m.is_empty()) {
		values.push(GroupingComponent::with_values("module", [module]).into());
	} else if let Some(path) = frame.filename.as_deref().or(frame.abs_path.as_deref()).filter(|p| !p.is_empty()) {
		values.push(GroupingComponent::with_values("filename", [basename(path).to_lowercase()]).into());
	}

	if let Some(function) = frame.function.as_deref().filter(|f| !f.is_empty()) {
		values.push(GroupingComponent::with_values("function", [function]).into());
	} else if let Some(line) = frame.context_line.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
		values.push(GroupingComponent::with_values("context-line", [line]).into());
	}

	let mut component = GroupingComponent::with_values("frame", values);
	if variant == APP_VARIANT && !frame.is_in_app() {
		component.update(Some(false), Some("non app frame".to_owned()), None);
	}
	component
}

fn frame(interface: InterfaceRef<'_>, _event: &Event, context: &mut GroupingContext<'_>) -> Result<ReturnedVariants> {
	let InterfaceRef::Frame(frame) = interface else {
		return Err(mismatch(paths::FRAME, interface));
	};
	let variant = selected_variant(context)?;
	let component = frame_component(frame, &variant);
	Ok(single(variant, component))
}

grouping_strategy!(frame_v1, strategy(&["frame:v1"], paths::FRAME, None, StrategyFunc::Plain(frame)));
