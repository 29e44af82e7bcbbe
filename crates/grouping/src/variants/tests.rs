use std::cell::Cell;

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::Value;

use super::*;
use crate::config::{ConfigurationDecl, StrategyConfiguration, create_strategy_configuration};
use crate::registry::StrategyRegistry;
use faultline_component::GroupingComponent;

thread_local! {
	static CALLS: Cell<usize> = const { Cell::new(0) };
}

fn calls() -> usize {
	CALLS.with(Cell::get)
}

fn per_variant(_interface: InterfaceRef<'_>, _event: &Event, context: &mut GroupingContext<'_>) -> Result<ReturnedVariants> {
	CALLS.with(|c| c.set(c.get() + 1));
	let variant = context.variant().unwrap().to_owned();
	Ok(ReturnedVariants::from([(variant.clone(), GroupingComponent::with_values("sample", [variant]))]))
}

fn two_entries(_interface: InterfaceRef<'_>, _event: &Event, _context: &mut GroupingContext<'_>) -> Result<ReturnedVariants> {
	Ok(ReturnedVariants::from([
		("system".to_owned(), GroupingComponent::new("sample")),
		("app".to_owned(), GroupingComponent::new("sample")),
	]))
}

fn wrong_key(_interface: InterfaceRef<'_>, _event: &Event, _context: &mut GroupingContext<'_>) -> Result<ReturnedVariants> {
	Ok(ReturnedVariants::from([("zzz".to_owned(), GroupingComponent::new("sample"))]))
}

fn config() -> StrategyConfiguration {
	create_strategy_configuration(&StrategyRegistry::new(), &ConfigurationDecl::default(), None).unwrap()
}

const IFACE: InterfaceRef<'static> = InterfaceRef::Custom {
	path: "sample",
	data: &Value::Null,
};

#[test]
fn selected_variant_passes_through_once() {
	let config = config();
	let mut ctx = GroupingContext::new(&config);
	ctx.set(VARIANT_KEY, "system");
	let before = calls();

	let rv = call_with_variants(per_variant, &["!system", "app"], IFACE, &Event::new(), &mut ctx).unwrap();

	assert_eq!(calls() - before, 1);
	assert_eq!(rv.keys().collect::<Vec<_>>(), vec!["system"]);
	assert_eq!(rv["system"].iter_values().collect::<Vec<_>>(), vec!["system"]);
}

#[test]
fn selected_variant_must_be_declared() {
	let config = config();
	let mut ctx = GroupingContext::new(&config);
	ctx.set(VARIANT_KEY, "other");

	let err = call_with_variants(per_variant, &["!system", "app"], IFACE, &Event::new(), &mut ctx).unwrap_err();
	assert_eq!(
		err,
		GroupingError::UndeclaredVariant {
			variant: "other".into(),
			declared: vec!["!system".into(), "app".into()],
		}
	);
}

#[test]
fn all_variants_keep_declared_names() {
	let config = config();
	let mut ctx = GroupingContext::new(&config);
	let before = calls();

	let rv = call_with_variants(per_variant, &["!system", "app"], IFACE, &Event::new(), &mut ctx).unwrap();

	assert_eq!(calls() - before, 2);
	assert_eq!(rv.keys().collect::<Vec<_>>(), vec!["!system", "app"]);
	assert_eq!(rv["!system"].iter_values().collect::<Vec<_>>(), vec!["system"]);
	assert_eq!(ctx.variant(), None);
	assert_eq!(ctx.depth(), 2);
}

#[test]
fn producer_rejects_multiple_entries_per_variant() {
	let config = config();
	let mut ctx = GroupingContext::new(&config);

	let err = call_with_variants(two_entries, &["system"], IFACE, &Event::new(), &mut ctx).unwrap_err();
	assert_eq!(err, GroupingError::UnexpectedVariantCount { expected: 1, got: 2 });
	assert_eq!(ctx.depth(), 2);
}

#[test]
fn producer_rejects_entry_under_wrong_name() {
	let config = config();
	let mut ctx = GroupingContext::new(&config);

	let err = call_with_variants(wrong_key, &["!system"], IFACE, &Event::new(), &mut ctx).unwrap_err();
	assert_eq!(err, GroupingError::MissingVariantComponent("system".into()));
}

#[test]
fn producer_value_delegates_to_wrapper() {
	let StrategyFunc::Variants(producer) = produces_variants(&["!system", "app"], per_variant) else {
		panic!("expected a variant producer");
	};
	assert_eq!(producer.variants(), &["!system", "app"]);

	let config = config();
	let mut ctx = GroupingContext::new(&config);
	let rv = producer.call(IFACE, &Event::new(), &mut ctx).unwrap();
	assert_eq!(rv.len(), 2);
}

#[rstest]
#[case::distinct(&["!system", "app"], true)]
#[case::single(&["default"], true)]
#[case::marker_collision(&["system", "!system"], false)]
#[case::plain_duplicate(&["app", "app"], false)]
fn variant_name_validation(#[case] names: &[&str], #[case] ok: bool) {
	assert_eq!(validate_variant_names(names).is_ok(), ok);
}

#[test]
fn strip_priority_removes_marker() {
	assert_eq!(strip_priority("!system"), "system");
	assert_eq!(strip_priority("app"), "app");
}
