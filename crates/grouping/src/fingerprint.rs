//! Fingerprint variables.
//!
//! A custom fingerprint is a list of entries. An entry of the form
//! `{{ name }}` is a variable resolved against the raw event payload; any
//! other entry is used verbatim. `{{ default }}` stands for the hash the
//! grouping engine would have computed on its own.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;
use serde_json::Value;


/// A whole entry of the form `{{ name }}`.
static VARIABLE_ENTRY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\{\{\s*(\S+)\s*\}\}$").expect("Invalid fingerprint variable regex"));

/// How a fingerprint relates to the default grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintType {
	/// Exactly `["{{ default }}"]`.
	Default,
	/// Mixes `{{ default }}` with other entries.
	Hybrid,
	/// No `{{ default }}` entry at all.
	Custom,
}

/// Returns the variable name of a `{{ name }}` entry.
pub fn parse_fingerprint_entry_as_variable(entry: &str) -> Option<&str> {
	VARIABLE_ENTRY.captures(entry).and_then(|c| c.get(1)).map(|m| m.as_str())
}

pub fn is_default_fingerprint_var(entry: &str) -> bool {
	parse_fingerprint_entry_as_variable(entry) == Some("default")
}

pub fn get_fingerprint_type<S: AsRef<str>>(fingerprint: &[S]) -> FingerprintType {
	match fingerprint {
		[only] if is_default_fingerprint_var(only.as_ref()) => FingerprintType::Default,
		_ if fingerprint.iter().any(|e| is_default_fingerprint_var(e.as_ref())) => FingerprintType::Hybrid,
		_ => FingerprintType::Custom,
	}
}

/// Parses `1`/`yes`/`true` and `0`/`no`/`false`, case-insensitively.
pub fn bool_from_string(value: &str) -> Option<bool> {
	match value.to_ascii_lowercase().as_str() {
		"1" | "yes" | "true" => Some(true),
		"0" | "no" | "false" => Some(false),
		_ => None,
	}
}

/// Walks `data` along `path`. Negative indices count from the end of arrays.
///
/// Null values along the way resolve to `None`.
pub fn get_path<'a>(data: &'a Value, path: &[PathSegment<'_>]) -> Option<&'a Value> {
	let mut current = data;
	for segment in path {
		current = match (segment, current) {
			(PathSegment::Key(k), Value::Object(map)) => map.get(*k)?,
			(PathSegment::Index(i), Value::Array(items)) => {
				let idx = if *i < 0 { items.len().checked_sub(i.unsigned_abs())? } else { *i as usize };
				items.get(idx)?
			}
			_ => return None,
		};
		if current.is_null() {
			return None;
		}
	}
	Some(current)
}

/// One step of a [`get_path`] lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment<'a> {
	Key(&'a str),
	Index(isize),
}

impl<'a> From<&'a str> for PathSegment<'a> {
	fn from(k: &'a str) -> Self {
		PathSegment::Key(k)
	}
}

impl From<isize> for PathSegment<'_> {
	fn from(i: isize) -> Self {
		PathSegment::Index(i)
	}
}

macro_rules! path {
	($data:expr, $($seg:expr),+ $(,)?) => {
		get_path($data, &[$(PathSegment::from($seg)),+])
	};
}

fn non_empty_str(v: Option<&Value>) -> Option<&str> {
	v.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Exception values, accepting both `{"values": [...]}` and a bare array.
fn exception_values(data: &Value) -> Option<&Vec<Value>> {
	match data.get("exception")? {
		Value::Array(values) => Some(values),
		other => other.get("values").and_then(Value::as_array),
	}
}

fn last_exception(data: &Value) -> Option<&Value> {
	exception_values(data).and_then(|v| v.last())
}

/// Picks the frame most likely to have caused the crash.
///
/// Frames come from the last exception's stacktrace, else the top-level
/// stacktrace, else the stacktrace of the only thread. The innermost in-app
/// frame wins; without one the innermost frame is returned.
pub fn get_crash_frame_from_event_data(data: &Value) -> Option<&serde_json::Map<String, Value>> {
	let frames = frames_at(last_exception(data).and_then(|e| path!(e, "stacktrace", "frames")))
		.or_else(|| frames_at(path!(data, "stacktrace", "frames")))
		.or_else(|| {
			let threads = path!(data, "threads", "values")?.as_array()?;
			match threads.as_slice() {
				[only] => frames_at(path!(only, "stacktrace", "frames")),
				_ => None,
			}
		})?;

	let mut default = None;
	for frame in frames.iter().rev().filter_map(Value::as_object) {
		if frame.get("in_app").and_then(Value::as_bool).unwrap_or(false) {
			return Some(frame);
		}
		default.get_or_insert(frame);
	}
	default
}

fn frames_at(v: Option<&Value>) -> Option<&Vec<Value>> {
	v.and_then(Value::as_array).filter(|f| !f.is_empty())
}

fn crash_frame_field<'a>(data: &'a Value, keys: &[&str]) -> Option<&'a str> {
	let frame = get_crash_frame_from_event_data(data)?;
	keys.iter().find_map(|k| frame.get(*k).and_then(Value::as_str).filter(|s| !s.is_empty()))
}

fn top_level<'a>(data: &'a Value, key: &str) -> Option<&'a str> {
	non_empty_str(data.get(key))
}

fn tag_value(data: &Value, tag: &str) -> Option<String> {
	match data.get("tags")? {
		Value::Array(pairs) => pairs.iter().find_map(|pair| match pair.as_array()?.as_slice() {
			[Value::String(name), value] if name == tag && !value.is_null() => Some(scalar_to_string(value)),
			_ => None,
		}),
		Value::Object(map) => map.get(tag).filter(|v| !v.is_null()).map(scalar_to_string),
		_ => None,
	}
}

fn scalar_to_string(v: &Value) -> String {
	match v {
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

/// Resolves one fingerprint variable against the event payload.
///
/// Known variables with no data resolve to a `<no-...>` placeholder; unknown
/// variables resolve to `None`.
pub fn get_fingerprint_value(variable: &str, data: &Value) -> Option<String> {
	let or = |v: Option<&str>, placeholder: &str| Some(v.unwrap_or(placeholder).to_owned());

	match variable {
		"transaction" => or(top_level(data, "transaction"), "<no-transaction>"),
		"message" => or(
			non_empty_str(path!(data, "logentry", "formatted"))
				.or_else(|| non_empty_str(path!(data, "logentry", "message")))
				.or_else(|| non_empty_str(last_exception(data).and_then(|e| e.get("value")))),
			"<no-message>",
		),
		"type" | "error.type" => or(non_empty_str(last_exception(data).and_then(|e| e.get("type"))), "<no-type>"),
		"value" | "error.value" => or(non_empty_str(last_exception(data).and_then(|e| e.get("value"))), "<no-value>"),
		"function" | "stack.function" => or(crash_frame_field(data, &["function"]), "<no-function>"),
		"path" | "stack.abs_path" => or(crash_frame_field(data, &["abs_path", "filename"]), "<no-abs-path>"),
		"stack.filename" => or(crash_frame_field(data, &["filename", "abs_path"]), "<no-filename>"),
		"module" | "stack.module" => or(crash_frame_field(data, &["module"]), "<no-module>"),
		"package" | "stack.package" => {
			let package = crash_frame_field(data, &["package"]).map(|p| p.rsplit(['/', '\\']).next().unwrap_or(p));
			or(package.filter(|p| !p.is_empty()), "<no-package>")
		}
		"level" => or(top_level(data, "level"), "<no-level>"),
		"logger" => or(top_level(data, "logger"), "<no-logger>"),
		_ => variable
			.strip_prefix("tags.")
			.map(|tag| tag_value(data, tag).unwrap_or_else(|| format!("<no-value-for-tag-{tag}>"))),
	}
}

/// Replaces every variable entry with its resolved value.
///
/// Literal entries and unknown variables are kept as written.
pub fn resolve_fingerprint_values<S: AsRef<str>>(fingerprint: &[S], data: &Value) -> Vec<String> {
	fingerprint
		.iter()
		.map(|entry| {
			let entry = entry.as_ref();
			parse_fingerprint_entry_as_variable(entry)
				.and_then(|var| get_fingerprint_value(var, data))
				.unwrap_or_else(|| entry.to_owned())
		})
		.collect()
}

/// Expands a title template that consists of a single `{{ var }}` entry.
///
/// Any other template, including one with text around a variable, is
/// returned as written.
pub fn expand_title_template(template: &str, data: &Value) -> String {
	VARIABLE_ENTRY
		.replace_all(template, |caps: &Captures<'_>| {
			get_fingerprint_value(&caps[1], data).unwrap_or_else(|| caps[0].to_owned())
		})
		.into_owned()
}
