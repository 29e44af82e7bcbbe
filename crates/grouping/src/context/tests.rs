use pretty_assertions::assert_eq;

use super::*;
use crate::config::{ConfigurationDecl, create_strategy_configuration};
use crate::event::{Frame, paths};
use crate::registry::{StrategyRegistry, strategy};
use crate::strategy::StrategyFunc;

fn echo_variant(_interface: InterfaceRef<'_>, _event: &Event, context: &mut GroupingContext<'_>) -> Result<ReturnedVariants> {
	let variant = context.variant().unwrap_or("none").to_owned();
	let marker = context.get("marker").ok().and_then(ContextValue::as_str).unwrap_or("-").to_owned();
	Ok(ReturnedVariants::from([(variant.clone(), GroupingComponent::with_values("frame", [variant, marker]))]))
}

fn two_variants(_interface: InterfaceRef<'_>, _event: &Event, _context: &mut GroupingContext<'_>) -> Result<ReturnedVariants> {
	Ok(ReturnedVariants::from([
		("system".to_owned(), GroupingComponent::with_values("stacktrace", ["a"])),
		("app".to_owned(), GroupingComponent::with_values("stacktrace", ["a"])),
	]))
}

fn config() -> StrategyConfiguration {
	let mut registry = StrategyRegistry::new();
	registry
		.register(&strategy(&["frame:echo"], paths::FRAME, None, StrategyFunc::Plain(echo_variant)))
		.unwrap();
	registry
		.register(&strategy(&["stacktrace:two"], paths::STACKTRACE, None, StrategyFunc::Plain(two_variants)))
		.unwrap();

	let decl = ConfigurationDecl {
		id: Some("test:context".into()),
		delegates: vec!["frame:echo".into(), "stacktrace:two".into()],
		initial_context: [("seeded".to_owned(), ContextValue::from(true))].into_iter().collect(),
		..Default::default()
	};
	create_strategy_configuration(&registry, &decl, None).unwrap()
}

#[test]
fn new_context_has_seed_and_variant_frames() {
	let config = config();
	let ctx = GroupingContext::new(&config);

	assert_eq!(ctx.depth(), 2);
	assert_eq!(ctx.get("seeded"), Ok(&ContextValue::Bool(true)));
	assert_eq!(ctx.get(VARIANT_KEY), Ok(&ContextValue::None));
	assert_eq!(ctx.variant(), None);
}

#[test]
fn unset_key_is_an_error() {
	let config = config();
	let ctx = GroupingContext::new(&config);

	assert_eq!(ctx.get("nope"), Err(GroupingError::MissingContextKey("nope".into())));
	assert!(ctx.get_bool("nope").is_err());
}

#[test]
fn get_bool_rejects_other_types() {
	let config = config();
	let mut ctx = GroupingContext::new(&config);
	ctx.set("flag", "yes");

	assert_eq!(ctx.get_bool("seeded"), Ok(true));
	assert_eq!(
		ctx.get_bool("flag"),
		Err(GroupingError::ContextTypeMismatch {
			key: "flag".into(),
			got: "string",
		})
	);
	assert_eq!(ctx.get_bool("nope"), Err(GroupingError::MissingContextKey("nope".into())));
}

#[test]
fn scoped_binding_is_invisible_after_scope() {
	let config = config();
	let mut ctx = GroupingContext::new(&config);
	ctx.set("k", "outer");

	{
		let mut scope = ctx.scope();
		assert_eq!(scope.depth(), 3);
		assert_eq!(scope.get("k").unwrap().as_str(), Some("outer"));

		scope.set("k", "inner");
		scope.set("only_inner", 1i64);
		assert_eq!(scope.get("k").unwrap().as_str(), Some("inner"));
		assert_eq!(scope.get("only_inner").unwrap().as_int(), Some(1));
	}

	assert_eq!(ctx.depth(), 2);
	assert_eq!(ctx.get("k").unwrap().as_str(), Some("outer"));
	assert!(ctx.get("only_inner").is_err());
}

#[test]
fn scope_is_popped_on_early_return() {
	fn failing(ctx: &mut GroupingContext<'_>) -> Result<()> {
		let mut scope = ctx.scope();
		scope.set("temp", true);
		scope.get("absent")?;
		Ok(())
	}

	let config = config();
	let mut ctx = GroupingContext::new(&config);

	assert!(failing(&mut ctx).is_err());
	assert_eq!(ctx.depth(), 2);
	assert!(ctx.get("temp").is_err());
}

#[test]
fn with_scope_runs_in_fresh_frame() {
	let config = config();
	let mut ctx = GroupingContext::new(&config);

	let depth = ctx.with_scope(|c| {
		c.set("x", 1i64);
		c.depth()
	});

	assert_eq!(depth, 3);
	assert_eq!(ctx.depth(), 2);
	assert!(ctx.get("x").is_err());
}

#[test]
fn base_frames_are_never_popped() {
	let config = config();
	let mut ctx = GroupingContext::new(&config);

	assert_eq!(ctx.pop(), None);
	assert_eq!(ctx.depth(), 2);
	assert_eq!(ctx.get("seeded"), Ok(&ContextValue::Bool(true)));
}

#[test]
fn dispatch_without_delegate_fails() {
	let config = config();
	let mut ctx = GroupingContext::new(&config);
	let entry = crate::event::LogEntry::default();

	let err = ctx.get_grouping_components_by_variant(InterfaceRef::LogEntry(&entry), &Event::new()).unwrap_err();
	assert_eq!(
		err,
		GroupingError::NoDelegate {
			interface: paths::LOGENTRY.into()
		}
	);
}

#[test]
fn single_component_uses_selected_variant_and_scoped_meta() {
	let config = config();
	let mut ctx = GroupingContext::new(&config);
	let frame = Frame::default();
	ctx.set(VARIANT_KEY, "app");

	let component = ctx
		.get_single_grouping_component_with(InterfaceRef::Frame(&frame), &Event::new(), [("marker", "m")])
		.unwrap();

	assert_eq!(component.iter_values().collect::<Vec<_>>(), vec!["app", "m"]);
	assert!(ctx.get("marker").is_err());
	assert_eq!(ctx.depth(), 2);
}

#[test]
fn single_component_requires_selected_variant() {
	let config = config();
	let mut ctx = GroupingContext::new(&config);
	let frame = Frame::default();

	let err = ctx.get_single_grouping_component(InterfaceRef::Frame(&frame), &Event::new()).unwrap_err();
	assert_eq!(err, GroupingError::NoVariantSelected);
}

#[test]
fn single_component_rejects_multiple_variants() {
	let config = config();
	let mut ctx = GroupingContext::new(&config);
	let stacktrace = crate::event::Stacktrace::default();
	ctx.set(VARIANT_KEY, "system");

	let err = ctx.get_single_grouping_component(InterfaceRef::Stacktrace(&stacktrace), &Event::new()).unwrap_err();
	assert_eq!(err, GroupingError::UnexpectedVariantCount { expected: 1, got: 2 });

	let all = ctx
		.get_grouping_components_by_variant(InterfaceRef::Stacktrace(&stacktrace), &Event::new())
		.unwrap();
	assert_eq!(all.keys().collect::<Vec<_>>(), vec!["system", "app"]);
}

#[test]
fn context_values_from_options() {
	assert_eq!(ContextValue::from(None::<bool>), ContextValue::None);
	assert_eq!(ContextValue::from(Some("x")), ContextValue::String("x".into()));
	assert_eq!(ContextValue::from(7i64).type_name(), "int");
}
