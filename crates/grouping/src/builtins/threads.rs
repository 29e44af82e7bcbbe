//! Threads strategy.

use faultline_component::{ComponentValue, GroupingComponent};

use super::{mismatch, selected_variant, single};
use crate::context::GroupingContext;
use crate::error::Result;
use crate::event::{Event, InterfaceRef, Stacktrace, paths};
use crate::grouping_strategy;
use crate::registry::strategy;
use crate::strategy::ReturnedVariants;
use crate::variants::produces_variants;

fn threads(interface: InterfaceRef<'_>, event: &Event, context: &mut GroupingContext<'_>) -> Result<ReturnedVariants> {
	let InterfaceRef::Threads(threads) = interface else {
		return Err(mismatch(paths::THREADS, interface));
	};
	let variant = selected_variant(context)?;

	let stacktraces: Vec<&Stacktrace> = threads.values.iter().filter_map(|t| t.stacktrace.as_ref()).collect();
	let component = match stacktraces.as_slice() {
		[stacktrace] => {
			let component = context.get_single_grouping_component(InterfaceRef::Stacktrace(*stacktrace), event)?;
			GroupingComponent::with_values("threads", [component])
		}
		_ => GroupingComponent::with_values("threads", Vec::<ComponentValue>::new())
			.contributing(false)
			.hint(format!("ignored because it contains {} threads", threads.values.len())),
	};
	Ok(single(variant, component))
}

grouping_strategy!(
	threads_v1,
	strategy(&["threads:v1"], paths::THREADS, Some(1900), produces_variants(&["!system", "app"], threads))
);
