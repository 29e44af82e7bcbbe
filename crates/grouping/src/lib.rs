//! Versioned, pluggable event grouping.
//!
//! Grouping decides which error events belong to the same issue. A
//! [`StrategyConfiguration`] bundles the strategies that compute candidate
//! fingerprints for an event; each strategy handles one interface of the event
//! (exception, stacktrace, threads, message, ...) and may produce several
//! variants, each yielding its own hash.
//!
//! ```no_run
//! use faultline_grouping::{ConfigurationDb, Event, calculate_grouping_variants};
//!
//! let event = Event::from_json(serde_json::json!({"message": "connection reset"}))?;
//! let db = ConfigurationDb::builtin();
//! let config = db.latest().expect("built-in configurations");
//! let variants = calculate_grouping_variants(&event, config)?;
//! println!("{:?}", variants.hashes());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod api;
pub mod builtins;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod event;
pub mod fingerprint;
pub mod registry;
pub mod strategy;
pub mod variants;

pub use api::{DEFAULT_VARIANT, GroupingVariants, calculate_grouping_variants};
pub use builtins::configurations::{BASE_GROUPING_CONFIG, DEFAULT_ENHANCEMENTS_BASE, DEFAULT_GROUPING_CONFIG};
pub use config::{ConfigurationDecl, ConfigurationSummary, Risk, StrategyConfiguration, create_strategy_configuration};
pub use context::{ContextFrame, ContextScope, ContextValue, GroupingContext};
pub use db::{ConfigurationDb, ConfigurationDbBuilder};
pub use error::{ConfigError, ConfigResult, GroupingError, Result, UnknownStrategy};
pub use event::{Event, Interface, InterfaceRef};
pub use faultline_component::{ComponentValue, GroupingComponent, hash_from_values};
pub use registry::{StrategyDecl, StrategyRegistry, strategy};
pub use strategy::{ReturnedVariants, Strategy, StrategyFn, StrategyFunc, VariantProcessorFn};
pub use variants::{VariantProducer, produces_variants};

/// Looks up a built-in strategy by id.
pub fn lookup_strategy(id: &str) -> std::result::Result<std::sync::Arc<Strategy>, UnknownStrategy> {
	StrategyRegistry::builtin().lookup(id)
}
