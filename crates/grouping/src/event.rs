//! Event model consumed by grouping strategies.
//!
//! An [`Event`] keeps the raw event payload alongside the parsed interfaces
//! strategies dispatch on. Interfaces are keyed by their stable path
//! (`"exception"`, `"stacktrace"`, ...). Sub-interfaces that only exist inside
//! other interfaces (single exceptions, frames) are reached through the
//! borrowed [`InterfaceRef`] view, so dispatching a frame never copies it.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[cfg(test)]
mod tests;

/// A single stack frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Frame {
	pub function: Option<String>,
	pub module: Option<String>,
	pub filename: Option<String>,
	pub abs_path: Option<String>,
	pub package: Option<String>,
	pub lineno: Option<u32>,
	pub in_app: Option<bool>,
	pub context_line: Option<String>,
}

impl Frame {
	pub fn is_in_app(&self) -> bool {
		self.in_app.unwrap_or(false)
	}
}

/// Ordered frames, outermost call first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stacktrace {
	#[serde(deserialize_with = "null_as_default")]
	pub frames: Vec<Frame>,
}

/// One exception in a chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SingleException {
	#[serde(rename = "type")]
	pub ty: Option<String>,
	pub value: Option<String>,
	pub module: Option<String>,
	pub stacktrace: Option<Stacktrace>,
}

/// The `exception` interface: a chain of exceptions, cause first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainedException {
	#[serde(deserialize_with = "null_as_default")]
	pub values: Vec<SingleException>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thread {
	pub id: Option<Value>,
	pub name: Option<String>,
	#[serde(deserialize_with = "null_as_default")]
	pub crashed: bool,
	pub stacktrace: Option<Stacktrace>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Threads {
	#[serde(deserialize_with = "null_as_default")]
	pub values: Vec<Thread>,
}

/// Reads an explicit `null` as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The `logentry` interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogEntry {
	pub message: Option<String>,
	pub formatted: Option<String>,
}

impl LogEntry {
	/// Formatted message if present, else the raw message.
	pub fn text(&self) -> Option<&str> {
		self.formatted.as_deref().or(self.message.as_deref()).filter(|s| !s.is_empty())
	}
}

/// Top-level interfaces stored on an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Interface {
	Exception(ChainedException),
	Stacktrace(Stacktrace),
	Threads(Threads),
	LogEntry(LogEntry),
	/// Interface contributed by an external collaborator.
	Custom { path: String, data: Value },
}

impl Interface {
	/// Stable interface name used for delegate dispatch.
	pub fn path(&self) -> &str {
		self.view().path()
	}

	/// Borrowed dispatch view of this interface.
	pub fn view(&self) -> InterfaceRef<'_> {
		match self {
			Interface::Exception(v) => InterfaceRef::Exception(v),
			Interface::Stacktrace(v) => InterfaceRef::Stacktrace(v),
			Interface::Threads(v) => InterfaceRef::Threads(v),
			Interface::LogEntry(v) => InterfaceRef::LogEntry(v),
			Interface::Custom { path, data } => InterfaceRef::Custom { path: path.as_str(), data },
		}
	}
}

/// Borrowed view of any interface a strategy can be dispatched on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InterfaceRef<'a> {
	Exception(&'a ChainedException),
	SingleException(&'a SingleException),
	Stacktrace(&'a Stacktrace),
	Frame(&'a Frame),
	Threads(&'a Threads),
	LogEntry(&'a LogEntry),
	Custom { path: &'a str, data: &'a Value },
}

impl<'a> InterfaceRef<'a> {
	pub fn path(&self) -> &'a str {
		match *self {
			InterfaceRef::Exception(_) => paths::EXCEPTION,
			InterfaceRef::SingleException(_) => paths::SINGLE_EXCEPTION,
			InterfaceRef::Stacktrace(_) => paths::STACKTRACE,
			InterfaceRef::Frame(_) => paths::FRAME,
			InterfaceRef::Threads(_) => paths::THREADS,
			InterfaceRef::LogEntry(_) => paths::LOGENTRY,
			InterfaceRef::Custom { path, .. } => path,
		}
	}
}

/// Interface paths known to the built-in strategies.
pub mod paths {
	pub const EXCEPTION: &str = "exception";
	pub const SINGLE_EXCEPTION: &str = "single_exception";
	pub const STACKTRACE: &str = "stacktrace";
	pub const FRAME: &str = "frame";
	pub const THREADS: &str = "threads";
	pub const LOGENTRY: &str = "logentry";
}

/// An error event as seen by the grouping engine.
#[derive(Debug, Clone, Default)]
pub struct Event {
	pub event_id: Option<String>,
	pub platform: Option<String>,
	data: Value,
	interfaces: IndexMap<String, Interface>,
}

impl Event {
	/// Creates an event with no interfaces and an empty payload.
	pub fn new() -> Self {
		Self {
			data: Value::Object(Default::default()),
			..Self::default()
		}
	}

	/// Parses an event payload, extracting every interface it recognizes.
	///
	/// A top-level `message` string is treated as a log entry when no
	/// `logentry` object is present.
	pub fn from_json(data: Value) -> Result<Self, serde_json::Error> {
		let mut event = Self {
			event_id: data.get("event_id").and_then(Value::as_str).map(str::to_owned),
			platform: data.get("platform").and_then(Value::as_str).map(str::to_owned),
			data: Value::Null,
			interfaces: IndexMap::new(),
		};

		if let Some(v) = present(&data, paths::EXCEPTION) {
			let chained = match v {
				Value::Array(values) => ChainedException {
					values: serde_json::from_value(Value::Array(values.clone()))?,
				},
				_ => serde_json::from_value(v.clone())?,
			};
			event.insert(Interface::Exception(chained));
		}
		if let Some(v) = present(&data, paths::STACKTRACE) {
			event.insert(Interface::Stacktrace(serde_json::from_value(v.clone())?));
		}
		if let Some(v) = present(&data, paths::THREADS) {
			event.insert(Interface::Threads(serde_json::from_value(v.clone())?));
		}
		if let Some(v) = present(&data, paths::LOGENTRY) {
			event.insert(Interface::LogEntry(serde_json::from_value(v.clone())?));
		} else if let Some(message) = data.get("message").and_then(Value::as_str) {
			event.insert(Interface::LogEntry(LogEntry {
				message: Some(message.to_owned()),
				formatted: None,
			}));
		}

		event.data = data;
		Ok(event)
	}

	/// Builder-style interface insertion.
	pub fn with_interface(mut self, interface: Interface) -> Self {
		self.insert(interface);
		self
	}

	/// Inserts an interface under its path, replacing any previous one.
	pub fn insert(&mut self, interface: Interface) {
		self.interfaces.insert(interface.path().to_owned(), interface);
	}

	pub fn interface(&self, path: &str) -> Option<InterfaceRef<'_>> {
		self.interfaces.get(path).map(Interface::view)
	}

	pub fn interfaces(&self) -> impl Iterator<Item = (&str, &Interface)> {
		self.interfaces.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Raw event payload.
	pub fn data(&self) -> &Value {
		&self.data
	}
}

/// An interface key that is absent or `null` carries nothing.
fn present<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
	data.get(key).filter(|v| !v.is_null())
}
