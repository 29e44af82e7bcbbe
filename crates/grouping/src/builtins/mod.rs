//! Built-in strategies and configurations.

pub mod configurations;
pub mod exception;
pub mod frame;
pub mod message;
pub mod stacktrace;
pub mod threads;

use crate::error::{GroupingError, Result};
use crate::event::InterfaceRef;
use crate::strategy::ReturnedVariants;
use faultline_component::GroupingComponent;

fn mismatch(expected: &'static str, got: InterfaceRef<'_>) -> GroupingError {
	GroupingError::InterfaceMismatch {
		expected,
		got: got.path().to_owned(),
	}
}

/// The variant selected by the caller. Built-in strategies always run with one.
fn selected_variant(context: &crate::context::GroupingContext<'_>) -> Result<String> {
	context.variant().map(str::to_owned).ok_or(GroupingError::NoVariantSelected)
}

fn single(variant: String, component: GroupingComponent) -> ReturnedVariants {
	ReturnedVariants::from([(variant, component)])
}
