use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

#[test]
fn null_interfaces_are_absent() {
	let event = Event::from_json(json!({
		"message": "boom",
		"exception": null,
		"stacktrace": null,
		"threads": null,
		"logentry": null
	}))
	.unwrap();

	let found: Vec<&str> = event.interfaces().map(|(path, _)| path).collect();
	assert_eq!(found, vec![paths::LOGENTRY]);
	assert!(event.interface(paths::STACKTRACE).is_none());
}

#[test]
fn null_fields_take_defaults() {
	let event = Event::from_json(json!({
		"threads": {"values": [{"crashed": null, "stacktrace": {"frames": null}}]},
		"exception": {"values": null}
	}))
	.unwrap();

	let Some(InterfaceRef::Threads(threads)) = event.interface(paths::THREADS) else {
		panic!("threads interface missing");
	};
	assert!(!threads.values[0].crashed);
	assert_eq!(threads.values[0].stacktrace, Some(Stacktrace::default()));

	let Some(InterfaceRef::Exception(chain)) = event.interface(paths::EXCEPTION) else {
		panic!("exception interface missing");
	};
	assert!(chain.values.is_empty());
}

#[test]
fn exception_accepts_bare_array() {
	let event = Event::from_json(json!({"exception": [{"type": "KeyError"}]})).unwrap();

	let Some(InterfaceRef::Exception(chain)) = event.interface(paths::EXCEPTION) else {
		panic!("exception interface missing");
	};
	assert_eq!(chain.values[0].ty.as_deref(), Some("KeyError"));
}
