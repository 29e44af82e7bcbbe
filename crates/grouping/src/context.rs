//! Dynamically scoped grouping context.
//!
//! A [`GroupingContext`] is a stack of key/value frames threaded through every
//! strategy invocation of one grouping computation. Lookups walk the stack
//! from the innermost frame outward; writes always land in the innermost
//! frame. The outermost frame is seeded from the active configuration's
//! `initial_context`, the next one carries the current variant.
//!
//! Temporary bindings go through [`GroupingContext::scope`], which pops the
//! pushed frame when the returned guard is dropped, including on early return
//! and unwinding.

use std::ops::{Deref, DerefMut};

use rustc_hash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};

use crate::config::StrategyConfiguration;
use crate::error::{GroupingError, Result};
use crate::event::{Event, InterfaceRef};
use crate::strategy::ReturnedVariants;
use faultline_component::GroupingComponent;

#[cfg(test)]
mod tests;

/// Key holding the name of the variant currently being computed.
pub const VARIANT_KEY: &str = "variant";

/// A value stored in the grouping context.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
	/// Explicitly unset value.
	#[default]
	None,
	/// Boolean value (true/false).
	Bool(bool),
	/// Integer value.
	Int(i64),
	/// String value.
	String(String),
}

impl ContextValue {
	/// Returns the boolean value if this is a `Bool` variant.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			ContextValue::Bool(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the integer value if this is an `Int` variant.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			ContextValue::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the string value if this is a `String` variant.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			ContextValue::String(v) => Some(v),
			_ => None,
		}
	}

	pub fn is_none(&self) -> bool {
		matches!(self, ContextValue::None)
	}

	/// Returns the type name of this value.
	pub fn type_name(&self) -> &'static str {
		match self {
			ContextValue::None => "none",
			ContextValue::Bool(_) => "bool",
			ContextValue::Int(_) => "int",
			ContextValue::String(_) => "string",
		}
	}
}

impl From<bool> for ContextValue {
	fn from(v: bool) -> Self {
		ContextValue::Bool(v)
	}
}

impl From<i64> for ContextValue {
	fn from(v: i64) -> Self {
		ContextValue::Int(v)
	}
}

impl From<String> for ContextValue {
	fn from(v: String) -> Self {
		ContextValue::String(v)
	}
}

impl From<&str> for ContextValue {
	fn from(v: &str) -> Self {
		ContextValue::String(v.to_string())
	}
}

impl<T: Into<ContextValue>> From<Option<T>> for ContextValue {
	fn from(v: Option<T>) -> Self {
		v.map_or(ContextValue::None, Into::into)
	}
}

/// One scope of bindings.
pub type ContextFrame = HashMap<String, ContextValue>;

/// Scoped key/value environment for one grouping computation.
pub struct GroupingContext<'c> {
	config: &'c StrategyConfiguration,
	stack: Vec<ContextFrame>,
}

/// Frames that are never popped: the configuration seed and the variant frame.
const BASE_FRAMES: usize = 2;

impl<'c> GroupingContext<'c> {
	/// Creates a context seeded from the configuration's initial context, with
	/// no variant selected.
	pub fn new(config: &'c StrategyConfiguration) -> Self {
		let mut context = Self {
			config,
			stack: vec![config.initial_context().clone()],
		};
		context.push();
		context.set(VARIANT_KEY, ContextValue::None);
		context
	}

	/// The configuration this context dispatches through.
	pub fn config(&self) -> &'c StrategyConfiguration {
		self.config
	}

	/// Number of frames currently on the stack.
	pub fn depth(&self) -> usize {
		self.stack.len()
	}

	/// Pushes an empty frame.
	pub fn push(&mut self) {
		self.stack.push(ContextFrame::default());
	}

	/// Pops the innermost frame.
	///
	/// The seed and variant frames created at construction are never removed;
	/// popping them returns `None`.
	pub fn pop(&mut self) -> Option<ContextFrame> {
		if self.stack.len() <= BASE_FRAMES {
			return None;
		}
		self.stack.pop()
	}

	/// Pushes a frame and returns a guard that pops it on drop.
	pub fn scope(&mut self) -> ContextScope<'_, 'c> {
		self.push();
		ContextScope { context: self }
	}

	/// Runs `f` inside a fresh scope.
	pub fn with_scope<R>(&mut self, f: impl FnOnce(&mut GroupingContext<'c>) -> R) -> R {
		let mut scope = self.scope();
		f(&mut *scope)
	}

	/// Resolves `key` from the innermost frame outward.
	pub fn get(&self, key: &str) -> Result<&ContextValue> {
		self.stack
			.iter()
			.rev()
			.find_map(|frame| frame.get(key))
			.ok_or_else(|| GroupingError::MissingContextKey(key.to_owned()))
	}

	/// Resolves a boolean flag, treating unset and non-boolean values as an error.
	pub fn get_bool(&self, key: &str) -> Result<bool> {
		let value = self.get(key)?;
		match value.as_bool() {
			Some(v) => Ok(v),
			None => {
				tracing::warn!(domain = "grouping", key, got = value.type_name(), "context value is not a bool");
				Err(GroupingError::ContextTypeMismatch {
					key: key.to_owned(),
					got: value.type_name(),
				})
			}
		}
	}

	/// Binds `key` in the innermost frame.
	pub fn set(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) {
		if let Some(frame) = self.stack.last_mut() {
			frame.insert(key.into(), value.into());
		}
	}

	/// Name of the variant currently being computed, if any.
	pub fn variant(&self) -> Option<&str> {
		self.get(VARIANT_KEY).ok().and_then(ContextValue::as_str)
	}

	/// Invokes the configured delegate for `interface` and returns every
	/// variant it produced.
	pub fn get_grouping_components_by_variant(&mut self, interface: InterfaceRef<'_>, event: &Event) -> Result<ReturnedVariants> {
		self.dispatch(interface, event)
	}

	/// Like [`Self::get_grouping_components_by_variant`], with extra bindings
	/// visible only to the delegate call.
	pub fn get_grouping_components_by_variant_with<K, V>(
		&mut self,
		interface: InterfaceRef<'_>,
		event: &Event,
		meta: impl IntoIterator<Item = (K, V)>,
	) -> Result<ReturnedVariants>
	where
		K: Into<String>,
		V: Into<ContextValue>,
	{
		let mut scope = self.scope();
		for (k, v) in meta {
			scope.set(k, v);
		}
		scope.dispatch(interface, event)
	}

	/// Invokes the configured delegate for `interface` and returns the
	/// component for the currently selected variant.
	///
	/// The delegate must return exactly one variant.
	pub fn get_single_grouping_component(&mut self, interface: InterfaceRef<'_>, event: &Event) -> Result<GroupingComponent> {
		let rv = self.dispatch(interface, event)?;
		self.take_single(rv)
	}

	/// Like [`Self::get_single_grouping_component`], with extra bindings
	/// visible only to the delegate call.
	pub fn get_single_grouping_component_with<K, V>(
		&mut self,
		interface: InterfaceRef<'_>,
		event: &Event,
		meta: impl IntoIterator<Item = (K, V)>,
	) -> Result<GroupingComponent>
	where
		K: Into<String>,
		V: Into<ContextValue>,
	{
		let rv = self.get_grouping_components_by_variant_with(interface, event, meta)?;
		self.take_single(rv)
	}

	fn take_single(&self, mut rv: ReturnedVariants) -> Result<GroupingComponent> {
		if rv.len() != 1 {
			return Err(GroupingError::UnexpectedVariantCount {
				expected: 1,
				got: rv.len(),
			});
		}
		let variant = self.variant().ok_or(GroupingError::NoVariantSelected)?;
		rv.shift_remove(variant)
			.ok_or_else(|| GroupingError::MissingVariantComponent(variant.to_owned()))
	}

	fn dispatch(&mut self, interface: InterfaceRef<'_>, event: &Event) -> Result<ReturnedVariants> {
		let config = self.config;
		let path = interface.path();
		let Some(strategy) = config.delegates().get(path) else {
			tracing::warn!(
				domain = "grouping",
				config = config.id().unwrap_or("<anonymous>"),
				interface = path,
				"no delegate registered for interface",
			);
			return Err(GroupingError::NoDelegate {
				interface: path.to_owned(),
			});
		};
		strategy.call(interface, event, self)
	}
}

/// Guard for a pushed context frame.
///
/// Dereferences to the context; the frame is popped when the guard drops.
pub struct ContextScope<'s, 'c> {
	context: &'s mut GroupingContext<'c>,
}

impl<'c> Deref for ContextScope<'_, 'c> {
	type Target = GroupingContext<'c>;

	fn deref(&self) -> &GroupingContext<'c> {
		self.context
	}
}

impl<'c> DerefMut for ContextScope<'_, 'c> {
	fn deref_mut(&mut self) -> &mut GroupingContext<'c> {
		self.context
	}
}

impl Drop for ContextScope<'_, '_> {
	fn drop(&mut self) {
		self.context.pop();
	}
}
