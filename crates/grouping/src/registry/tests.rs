use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;
use crate::context::GroupingContext;
use crate::error::Result;
use crate::event::{Event, InterfaceRef};
use crate::strategy::ReturnedVariants;

fn noop(_interface: InterfaceRef<'_>, _event: &Event, _context: &mut GroupingContext<'_>) -> Result<ReturnedVariants> {
	Ok(ReturnedVariants::new())
}

#[test]
fn aliases_share_metadata() {
	let mut registry = StrategyRegistry::new();
	let last = registry
		.register(&strategy(&["sample:v1", "sample:latest"], "sample", Some(5), StrategyFunc::Plain(noop)))
		.unwrap();
	assert_eq!(last.id(), "sample:latest");

	for id in ["sample:v1", "sample:latest"] {
		let s = registry.lookup(id).unwrap();
		assert_eq!(s.id(), id);
		assert_eq!(s.strategy_class(), "sample");
		assert_eq!(s.interface_name(), "sample");
		assert_eq!(s.score(), Some(5));
	}
	assert_eq!(registry.len(), 2);
}

#[test]
fn empty_id_list_is_rejected() {
	let mut registry = StrategyRegistry::new();
	let err = registry.register(&strategy(&[], "sample", None, StrategyFunc::Plain(noop))).unwrap_err();

	assert_eq!(err, ConfigError::EmptyStrategyIds { interface: "sample".into() });
	assert!(registry.is_empty());
}

#[test]
fn unknown_id_is_a_distinct_error() {
	let registry = StrategyRegistry::new();
	let err = registry.lookup("nope:v1").unwrap_err();

	assert_eq!(err, UnknownStrategy("nope:v1".into()));
	assert_eq!(err.to_string(), "unknown strategy \"nope:v1\"");
	assert!(registry.get("nope:v1").is_none());
}

#[test]
fn re_registration_replaces_entry() {
	let mut registry = StrategyRegistry::new();
	registry.register(&strategy(&["sample:v1"], "sample", Some(1), StrategyFunc::Plain(noop))).unwrap();
	registry.register(&strategy(&["sample:v1"], "other", Some(2), StrategyFunc::Plain(noop))).unwrap();

	let s = registry.lookup("sample:v1").unwrap();
	assert_eq!(s.score(), Some(2));
	assert_eq!(s.interface_name(), "other");
	assert_eq!(registry.len(), 1);
}

#[test]
fn iteration_follows_first_registration() {
	static IDS: [&[&str]; 4] = [&["b:v1"], &["a:v1"], &["c:v1"], &["b:v1"]];

	let mut registry = StrategyRegistry::new();
	for ids in IDS {
		registry.register(&strategy(ids, "sample", None, StrategyFunc::Plain(noop))).unwrap();
	}

	let ids: Vec<&str> = registry.iter().map(|s| s.id()).collect();
	assert_eq!(ids, vec!["b:v1", "a:v1", "c:v1"]);
}

#[test]
fn processor_is_carried_into_strategy() {
	fn keep(variants: ReturnedVariants, _event: &Event, _context: &mut GroupingContext<'_>) -> Result<ReturnedVariants> {
		Ok(variants)
	}

	let mut registry = StrategyRegistry::new();
	let s = registry
		.register(&strategy(&["sample:v1"], "sample", Some(1), StrategyFunc::Plain(noop)).with_variant_processor(keep))
		.unwrap();
	assert!(s.has_variant_processor());
}

#[rstest]
#[case("chained-exception:v1", "exception", Some(2000))]
#[case("single-exception:v1", "single_exception", None)]
#[case("threads:v1", "threads", Some(1900))]
#[case("stacktrace:v1", "stacktrace", Some(1800))]
#[case("frame:v1", "frame", None)]
#[case("message:v1", "logentry", Some(0))]
#[case("message:v2", "logentry", Some(0))]
fn builtin_strategies_are_registered(#[case] id: &str, #[case] interface: &str, #[case] score: Option<i32>) {
	let s = StrategyRegistry::builtin().lookup(id).unwrap();
	assert_eq!(s.interface_name(), interface);
	assert_eq!(s.score(), score);
}
