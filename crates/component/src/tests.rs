use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;

fn frame(module: &str, function: &str) -> GroupingComponent {
	GroupingComponent::with_values("frame", [module, function])
}

#[test]
fn hash_matches_md5_of_concatenated_values() {
	assert_eq!(hash_from_values(["hello"]), "5d41402abc4b2a76b9719d911017c592");
	assert_eq!(hash_from_values(["he", "llo"]), hash_from_values(["hello"]));
}

#[test]
fn hash_uses_contributing_leaves_in_order() {
	let tree = GroupingComponent::with_values("stacktrace", [frame("a", "f"), frame("b", "g")]);
	assert_eq!(tree.iter_values().collect::<Vec<_>>(), vec!["a", "f", "b", "g"]);
	assert_eq!(tree.get_hash(), Some(hash_from_values(["a", "f", "b", "g"])));
}

#[test]
fn non_contributing_child_does_not_affect_ancestor_hash() {
	let with_ignored = GroupingComponent::with_values(
		"stacktrace",
		[frame("a", "f"), frame("b", "g").contributing(false).hint("non app frame")],
	);
	let without = GroupingComponent::with_values("stacktrace", [frame("a", "f")]);
	assert_eq!(with_ignored.get_hash(), without.get_hash());
}

#[rstest]
#[case::not_contributing(GroupingComponent::with_values("message", ["boom"]).contributing(false))]
#[case::no_values(GroupingComponent::new("message"))]
#[case::only_ignored_children(GroupingComponent::with_values("stacktrace", [frame("a", "f").contributing(false)]).contributing(true))]
fn hash_is_none(#[case] component: GroupingComponent) {
	assert_eq!(component.get_hash(), None);
}

#[test]
fn with_values_derives_contributes() {
	let ignored = frame("a", "f").contributing(false);
	assert!(!GroupingComponent::with_values("stacktrace", [ignored.clone()]).contributes());
	assert!(GroupingComponent::with_values("stacktrace", [ignored, frame("b", "g")]).contributes());
	assert!(!GroupingComponent::with_values("stacktrace", Vec::<ComponentValue>::new()).contributes());
}

#[test]
fn update_sets_hint_and_flag() {
	let mut c = frame("a", "f");
	c.update(Some(false), Some("ignored because hash matches system variant".into()), None);
	assert!(!c.contributes());
	assert_eq!(c.get_hint(), Some("ignored because hash matches system variant"));
	assert_eq!(c.values().len(), 2);
}

#[test]
fn update_values_recomputes_contributes_unless_given() {
	let mut c = GroupingComponent::new("stacktrace");
	c.update(None, None, Some(vec![frame("a", "f").contributing(false).into()]));
	assert!(!c.contributes());

	c.update(None, None, Some(vec!["leaf".into()]));
	assert!(c.contributes());

	c.update(Some(false), None, Some(vec!["leaf".into()]));
	assert!(!c.contributes());
}

#[test]
fn iter_subcomponents_filters() {
	let inner = GroupingComponent::with_values("stacktrace", [frame("x", "y")]);
	let exc = GroupingComponent::with_values("exception", [ComponentValue::from("TypeError"), inner.into()]);
	let root = GroupingComponent::with_values("chained-exception", [exc, frame("q", "r").contributing(false)]);

	assert_eq!(root.iter_subcomponents("frame", false, false).len(), 1);
	assert_eq!(root.iter_subcomponents("frame", true, false).len(), 2);
	assert_eq!(root.iter_subcomponents("frame", true, true).len(), 1);
	assert_eq!(root.iter_subcomponents("stacktrace", true, true)[0].id(), "stacktrace");
}

#[test]
fn serializes_as_tree() {
	let c = frame("a", "f").hint("in-app");
	let json = serde_json::to_value(&c).unwrap();
	assert_eq!(
		json,
		serde_json::json!({
			"id": "frame",
			"contributes": true,
			"hint": "in-app",
			"values": ["a", "f"],
		})
	);
}
