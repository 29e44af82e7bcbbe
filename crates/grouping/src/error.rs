//! Error types for strategy registration, configuration building and dispatch.

use thiserror::Error;

/// A strategy id that is not present in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy {0:?}")]
pub struct UnknownStrategy(pub String);

/// Errors raised while registering strategies or building configurations.
///
/// These are fatal: a configuration that fails to build must not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
	/// A strategy declaration carried no ids.
	#[error("no ids given for strategy on interface {interface:?}")]
	EmptyStrategyIds { interface: String },

	/// A strategy without a score was listed as a top-level strategy.
	#[error("unscored strategy {strategy} added to {config}")]
	UnscoredStrategy { strategy: String, config: String },

	/// Two delegates in one declaration claim the same interface.
	#[error("duplicate interface match for delegate {config:?} (conflict on {interface:?})")]
	DuplicateDelegate { config: String, interface: String },

	/// A variant list declares both `x` and `!x`.
	#[error("variant {variant:?} declared more than once (with and without priority marker)")]
	AmbiguousVariant { variant: String },

	/// A configuration names a base that has not been built.
	#[error("unknown base configuration {base:?} for {config}")]
	UnknownBase { config: String, base: String },

	/// A configuration id was declared twice in one database.
	#[error("duplicate configuration id {0:?}")]
	DuplicateConfiguration(String),

	/// A configuration without id cannot be stored by id.
	#[error("configuration declared without id")]
	AnonymousConfiguration,

	/// The configuration id marked as latest was never declared.
	#[error("unknown configuration {0:?}")]
	UnknownConfiguration(String),

	#[error(transparent)]
	UnknownStrategy(#[from] UnknownStrategy),
}

/// Errors raised while computing grouping components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupingError {
	/// The active configuration has no delegate for this interface.
	#[error("failed to dispatch interface {interface} to strategy")]
	NoDelegate { interface: String },

	/// A context key was read before any scope defined it.
	#[error("context key {0:?} is not set")]
	MissingContextKey(String),

	/// A context key holds a value of another type than the caller reads.
	#[error("context key {key:?} holds a {got} value")]
	ContextTypeMismatch { key: String, got: &'static str },

	/// A strategy returned both `x` and `!x`.
	#[error("strategy returned variant {variant:?} with and without priority marker")]
	AmbiguousVariant { variant: String },

	/// A strategy received an interface of the wrong kind.
	#[error("strategy for {expected} received interface {got}")]
	InterfaceMismatch { expected: &'static str, got: String },

	/// A strategy returned a different number of variants than its caller requires.
	#[error("expected {expected} variant(s) from strategy, got {got}")]
	UnexpectedVariantCount { expected: usize, got: usize },

	/// The caller requested a variant the strategy does not produce.
	#[error("variant {variant:?} is not one of {declared:?}")]
	UndeclaredVariant { variant: String, declared: Vec<String> },

	/// The single returned variant is not the currently selected one.
	#[error("no component returned for variant {0:?}")]
	MissingVariantComponent(String),

	/// A single component was requested while no variant is selected.
	#[error("no variant selected in grouping context")]
	NoVariantSelected,

	#[error(transparent)]
	UnknownStrategy(#[from] UnknownStrategy),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type for grouping operations.
pub type Result<T> = std::result::Result<T, GroupingError>;
