//! Grouping component trees.
//!
//! A [`GroupingComponent`] is the result node produced by grouping strategies.
//! Components nest: each carries an ordered list of child components and
//! string leaves. The fingerprint of a component is derived from its
//! contributing leaves in depth-first order, so a child that does not
//! contribute never affects the hash of any ancestor.
//!
//! ```
//! use faultline_component::GroupingComponent;
//!
//! let mut frame = GroupingComponent::new("frame");
//! frame.push_leaf("app.views");
//! frame.push_leaf("handle_request");
//!
//! let mut stacktrace = GroupingComponent::new("stacktrace");
//! stacktrace.push_component(frame);
//!
//! assert!(stacktrace.get_hash().is_some());
//! ```

mod hash;

#[cfg(test)]
mod tests;

use serde::Serialize;

pub use hash::hash_from_values;

/// A single entry in a component's value list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ComponentValue {
	/// Nested component.
	Component(GroupingComponent),
	/// Plain string leaf that feeds the hash when the owner contributes.
	Leaf(String),
}

impl ComponentValue {
	/// Returns the nested component, if this value is one.
	pub fn as_component(&self) -> Option<&GroupingComponent> {
		match self {
			ComponentValue::Component(c) => Some(c),
			ComponentValue::Leaf(_) => None,
		}
	}

	/// Returns the leaf string, if this value is one.
	pub fn as_leaf(&self) -> Option<&str> {
		match self {
			ComponentValue::Leaf(s) => Some(s),
			ComponentValue::Component(_) => None,
		}
	}

	fn contributes(&self) -> bool {
		match self {
			ComponentValue::Component(c) => c.contributes,
			ComponentValue::Leaf(_) => true,
		}
	}
}

impl From<GroupingComponent> for ComponentValue {
	fn from(c: GroupingComponent) -> Self {
		ComponentValue::Component(c)
	}
}

impl From<String> for ComponentValue {
	fn from(s: String) -> Self {
		ComponentValue::Leaf(s)
	}
}

impl From<&str> for ComponentValue {
	fn from(s: &str) -> Self {
		ComponentValue::Leaf(s.to_string())
	}
}

/// Tree node describing how an event contributes to a fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupingComponent {
	id: String,
	contributes: bool,
	hint: Option<String>,
	values: Vec<ComponentValue>,
}

impl GroupingComponent {
	/// Creates an empty, contributing component of the given kind.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			contributes: true,
			hint: None,
			values: Vec::new(),
		}
	}

	/// Creates a component from a value list.
	///
	/// `contributes` is derived from the values: the component contributes if
	/// any value is a leaf or a contributing child.
	pub fn with_values<I, V>(id: impl Into<String>, values: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<ComponentValue>,
	{
		let values: Vec<ComponentValue> = values.into_iter().map(Into::into).collect();
		Self {
			id: id.into(),
			contributes: calculate_contributes(&values),
			hint: None,
			values,
		}
	}

	/// Builder-style hint setter.
	pub fn hint(mut self, hint: impl Into<String>) -> Self {
		self.hint = Some(hint.into());
		self
	}

	/// Builder-style contribution setter.
	pub fn contributing(mut self, contributes: bool) -> Self {
		self.contributes = contributes;
		self
	}

	/// Component kind, e.g. `"frame"` or `"stacktrace"`.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Human readable component name used in reports.
	pub fn description(&self) -> String {
		self.id.replace(['_', '-'], " ")
	}

	pub fn contributes(&self) -> bool {
		self.contributes
	}

	pub fn get_hint(&self) -> Option<&str> {
		self.hint.as_deref()
	}

	pub fn values(&self) -> &[ComponentValue] {
		&self.values
	}

	/// Returns true if the component has no values at all.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Appends a leaf value without touching the contribution flag.
	pub fn push_leaf(&mut self, value: impl Into<String>) {
		self.values.push(ComponentValue::Leaf(value.into()));
	}

	/// Appends a child component without touching the contribution flag.
	pub fn push_component(&mut self, component: GroupingComponent) {
		self.values.push(ComponentValue::Component(component));
	}

	/// Updates the component in place.
	///
	/// Each argument is optional. When `values` is replaced and `contributes`
	/// is not given, the flag is recomputed from the new values.
	pub fn update(&mut self, contributes: Option<bool>, hint: Option<String>, values: Option<Vec<ComponentValue>>) {
		if let Some(hint) = hint {
			self.hint = Some(hint);
		}
		let mut contributes = contributes;
		if let Some(values) = values {
			if contributes.is_none() {
				contributes = Some(calculate_contributes(&values));
			}
			self.values = values;
		}
		if let Some(contributes) = contributes {
			self.contributes = contributes;
		}
	}

	/// Iterates the contributing leaves of this tree, depth first.
	pub fn iter_values(&self) -> impl Iterator<Item = &str> + '_ {
		let mut out = Vec::new();
		self.collect_values(&mut out);
		out.into_iter()
	}

	fn collect_values<'a>(&'a self, out: &mut Vec<&'a str>) {
		if !self.contributes {
			return;
		}
		for value in &self.values {
			match value {
				ComponentValue::Component(c) => c.collect_values(out),
				ComponentValue::Leaf(s) => out.push(s),
			}
		}
	}

	/// Finds child components with the given id.
	///
	/// With `recursive` the search descends into matching components' subtrees
	/// as well. With `only_contributing` non-contributing subtrees are skipped.
	pub fn iter_subcomponents<'a>(&'a self, id: &str, recursive: bool, only_contributing: bool) -> Vec<&'a GroupingComponent> {
		let mut out = Vec::new();
		self.collect_subcomponents(id, recursive, only_contributing, &mut out);
		out
	}

	fn collect_subcomponents<'a>(&'a self, id: &str, recursive: bool, only_contributing: bool, out: &mut Vec<&'a GroupingComponent>) {
		for child in self.values.iter().filter_map(ComponentValue::as_component) {
			if only_contributing && !child.contributes {
				continue;
			}
			if child.id == id {
				out.push(child);
				if !recursive {
					continue;
				}
			}
			child.collect_subcomponents(id, recursive, only_contributing, out);
		}
	}

	/// Returns the fingerprint hash of this tree.
	///
	/// `None` when the component does not contribute or no contributing leaf
	/// remains anywhere in the tree.
	pub fn get_hash(&self) -> Option<String> {
		if !self.contributes {
			return None;
		}
		let values: Vec<&str> = self.iter_values().collect();
		if values.is_empty() {
			return None;
		}
		Some(hash_from_values(values))
	}
}

fn calculate_contributes(values: &[ComponentValue]) -> bool {
	values.iter().any(ComponentValue::contributes)
}
