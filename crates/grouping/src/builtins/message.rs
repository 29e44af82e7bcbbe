//! Message strategies.

use std::sync::LazyLock;

use faultline_component::{ComponentValue, GroupingComponent};
use regex::Regex;

use super::{mismatch, selected_variant, single};
use crate::context::GroupingContext;
use crate::error::Result;
use crate::event::{Event, InterfaceRef, LogEntry, paths};
use crate::grouping_strategy;
use crate::registry::strategy;
use crate::strategy::ReturnedVariants;
use crate::variants::produces_variants;

/// Context flag enabling parameterization in `message:v2`.
pub const NORMALIZE_MESSAGE: &str = "normalize_message";

static PARAMETERS: LazyLock<[(Regex, &'static str); 3]> = LazyLock::new(|| {
	[
		(
			Regex::new(r"\b[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}\b").expect("Invalid uuid regex"),
			"<uuid>",
		),
		(Regex::new(r"\b0[xX][0-9a-fA-F]+\b").expect("Invalid hex regex"), "<hex>"),
		(Regex::new(r"\b\d+\b").expect("Invalid int regex"), "<int>"),
	]
});

/// Replaces ids and numbers in a message with placeholders.
pub fn normalize_message(message: &str) -> String {
	PARAMETERS
		.iter()
		.fold(message.to_owned(), |acc, (re, placeholder)| re.replace_all(&acc, *placeholder).into_owned())
}

fn log_entry<'a>(interface: InterfaceRef<'a>) -> Result<&'a LogEntry> {
	match interface {
		InterfaceRef::LogEntry(entry) => Ok(entry),
		other => Err(mismatch(paths::LOGENTRY, other)),
	}
}

fn message_component(text: Option<String>) -> GroupingComponent {
	match text {
		Some(text) => GroupingComponent::with_values("message", [text]),
		None => GroupingComponent::with_values("message", Vec::<ComponentValue>::new()).hint("ignored because message is empty"),
	}
}

fn message_v1(interface: InterfaceRef<'_>, _event: &Event, context: &mut GroupingContext<'_>) -> Result<ReturnedVariants> {
	let entry = log_entry(interface)?;
	let variant = selected_variant(context)?;
	Ok(single(variant, message_component(entry.text().map(str::to_owned))))
}

fn message_v2(interface: InterfaceRef<'_>, _event: &Event, context: &mut GroupingContext<'_>) -> Result<ReturnedVariants> {
	let entry = log_entry(interface)?;
	let variant = selected_variant(context)?;
	let normalize = context.get_bool(NORMALIZE_MESSAGE)?;
	let text = entry.text().map(|t| if normalize { normalize_message(t) } else { t.to_owned() });
	Ok(single(variant, message_component(text)))
}

grouping_strategy!(
	message_v1,
	strategy(&["message:v1"], paths::LOGENTRY, Some(0), produces_variants(&["default"], message_v1))
);

grouping_strategy!(
	message_v2,
	strategy(&["message:v2"], paths::LOGENTRY, Some(0), produces_variants(&["default"], message_v2))
);
