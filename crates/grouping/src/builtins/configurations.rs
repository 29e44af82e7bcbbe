//! Built-in grouping configurations.

use crate::config::{ConfigurationDecl, Risk};
use crate::context::{ContextFrame, ContextValue};

use super::message::NORMALIZE_MESSAGE;
use super::stacktrace::IS_EXCEPTION;

/// Configuration used for new projects.
pub const DEFAULT_GROUPING_CONFIG: &str = "newstyle:2023-01-11";

/// Oldest built-in configuration; every other built-in derives from it.
pub const BASE_GROUPING_CONFIG: &str = "newstyle:2019-10-29";

pub const DEFAULT_ENHANCEMENTS_BASE: &str = "common:2019-03-23";

fn context<const N: usize>(entries: [(&str, ContextValue); N]) -> ContextFrame {
	entries.into_iter().map(|(k, v)| (k.to_owned(), v)).collect()
}

/// Declarations of the built-in configurations, bases first.
pub fn builtin_declarations() -> Vec<ConfigurationDecl> {
	vec![
		ConfigurationDecl {
			id: Some(BASE_GROUPING_CONFIG.to_owned()),
			strategies: ["chained-exception:v1", "threads:v1", "stacktrace:v1", "message:v1"].map(str::to_owned).to_vec(),
			delegates: ["frame:v1", "stacktrace:v1", "single-exception:v1"].map(str::to_owned).to_vec(),
			changelog: Some(
				"
				* Uses module or file name and function of every frame.
				* Separates system and in-app stacktraces into their own variants.
				* Groups messages by their formatted text.
				"
				.to_owned(),
			),
			risk: Some(Risk::Low),
			initial_context: context([(IS_EXCEPTION, false.into()), (NORMALIZE_MESSAGE, false.into())]),
			enhancements_base: Some(DEFAULT_ENHANCEMENTS_BASE.to_owned()),
			..ConfigurationDecl::default()
		},
		ConfigurationDecl {
			id: Some(DEFAULT_GROUPING_CONFIG.to_owned()),
			base: Some(BASE_GROUPING_CONFIG.to_owned()),
			strategies: vec!["message:v2".to_owned()],
			changelog: Some(
				"
				* Messages are parameterized: numbers, hex values and UUIDs no
				  longer split issues.
				"
				.to_owned(),
			),
			risk: Some(Risk::Medium),
			initial_context: context([(NORMALIZE_MESSAGE, true.into())]),
			..ConfigurationDecl::default()
		},
	]
}
