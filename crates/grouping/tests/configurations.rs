//! Configuration database behaviour.

use faultline_grouping::{
	BASE_GROUPING_CONFIG, ConfigError, ConfigurationDb, ConfigurationDbBuilder, ConfigurationDecl, DEFAULT_ENHANCEMENTS_BASE, DEFAULT_GROUPING_CONFIG,
	Risk, StrategyRegistry,
};
use pretty_assertions::assert_eq;

fn decl(toml_src: &str) -> ConfigurationDecl {
	toml::from_str(toml_src).unwrap()
}

#[test]
fn builtin_db_marks_latest() {
	let db = ConfigurationDb::builtin();

	assert_eq!(db.latest_id(), Some(DEFAULT_GROUPING_CONFIG));
	assert_eq!(db.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![BASE_GROUPING_CONFIG, DEFAULT_GROUPING_CONFIG]);

	let summaries = db.summaries();
	assert_eq!(summaries.iter().filter(|s| s.latest).count(), 1);
	assert_eq!(summaries[1].base.as_deref(), Some(BASE_GROUPING_CONFIG));
	assert_eq!(
		summaries[1].strategies,
		vec!["chained-exception:v1", "message:v2", "stacktrace:v1", "threads:v1"]
	);
	assert_eq!(summaries[1].delegates, vec!["frame:v1", "single-exception:v1", "stacktrace:v1"]);
}

#[test]
fn latest_inherits_rule_set_bases() {
	let latest = ConfigurationDb::builtin().latest().unwrap();

	assert_eq!(latest.enhancements_base(), Some(DEFAULT_ENHANCEMENTS_BASE));
	assert_eq!(latest.risk(), Risk::Medium);
	assert!(latest.changelog().starts_with("* Messages are parameterized"));
}

#[test]
fn custom_configuration_layers_over_builtins() {
	let registry = StrategyRegistry::builtin();
	let mut builder = ConfigurationDbBuilder::new(registry).extend_from(ConfigurationDb::builtin());

	let custom = builder
		.add(&decl(
			r#"
			id = "custom:2024-06-01"
			base = "newstyle:2023-01-11"
			strategies = ["message:v1"]
			hidden = true
			"#,
		))
		.unwrap();
	builder.latest("custom:2024-06-01").unwrap();
	let db = builder.build();

	assert_eq!(db.len(), 3);
	assert_eq!(db.latest_id(), Some("custom:2024-06-01"));
	assert!(custom.hidden());
	assert!(custom.strategies().contains_key("message:v1"));
	assert!(!custom.strategies().contains_key("message:v2"));
}

#[test]
fn unknown_base_is_rejected() {
	let mut builder = ConfigurationDbBuilder::new(StrategyRegistry::builtin());

	let err = builder.add(&decl(r#"id = "x:1"
base = "missing:1""#)).unwrap_err();
	assert_eq!(
		err,
		ConfigError::UnknownBase {
			config: "x:1".into(),
			base: "missing:1".into(),
		}
	);
}

#[test]
fn duplicate_and_anonymous_configurations_are_rejected() {
	let mut builder = ConfigurationDbBuilder::new(StrategyRegistry::builtin());
	builder.add(&decl(r#"id = "x:1""#)).unwrap();

	assert_eq!(builder.add(&decl(r#"id = "x:1""#)).unwrap_err(), ConfigError::DuplicateConfiguration("x:1".into()));
	assert_eq!(builder.add(&decl("hidden = true")).unwrap_err(), ConfigError::AnonymousConfiguration);
	assert_eq!(builder.latest("y:1").unwrap_err(), ConfigError::UnknownConfiguration("y:1".into()));
}

#[test]
fn lookup_of_unknown_configuration_fails() {
	assert_eq!(
		ConfigurationDb::builtin().lookup("legacy:2019-03-12").unwrap_err(),
		ConfigError::UnknownConfiguration("legacy:2019-03-12".into())
	);
}
