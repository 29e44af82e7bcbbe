//! Subcommand implementations.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use faultline_grouping::{ConfigurationDb, Event, GroupingVariants, calculate_grouping_variants};
use serde::Serialize;
use serde_json::Value;

pub fn configs(db: &ConfigurationDb, json: bool, out: &mut impl Write) -> anyhow::Result<()> {
	let summaries = db.summaries();
	if json {
		serde_json::to_writer_pretty(&mut *out, &summaries)?;
		writeln!(out)?;
		return Ok(());
	}

	for summary in summaries {
		let marker = if summary.latest { '*' } else { ' ' };
		let hidden = if summary.hidden { " (hidden)" } else { "" };
		writeln!(out, "{marker} {}{hidden}", summary.id.as_deref().unwrap_or("<anonymous>"))?;
		writeln!(out, "    base:       {}", summary.base.as_deref().unwrap_or("-"))?;
		writeln!(out, "    risk:       {}", summary.risk.level())?;
		writeln!(out, "    strategies: {}", summary.strategies.join(", "))?;
		writeln!(out, "    delegates:  {}", summary.delegates.join(", "))?;
	}
	Ok(())
}

pub fn hash(db: &ConfigurationDb, event_path: &Path, config: Option<&str>, json: bool, out: &mut impl Write) -> anyhow::Result<()> {
	let config = match config {
		Some(id) => db.lookup(id)?,
		None => db.latest().cloned().context("no grouping configuration available")?,
	};

	let text = std::fs::read_to_string(event_path).with_context(|| format!("reading event {}", event_path.display()))?;
	let data: Value = serde_json::from_str(&text).with_context(|| format!("parsing event {}", event_path.display()))?;
	let event = Event::from_json(data).context("decoding event interfaces")?;

	let variants = calculate_grouping_variants(&event, &config)?;
	let config_id = config.id().unwrap_or("<anonymous>");
	tracing::info!(config = config_id, variants = variants.len(), "event grouped");

	render_variants(config_id, &variants, json, out)
}

#[derive(Serialize)]
struct Report<'a> {
	config: &'a str,
	hashes: Vec<String>,
	variants: &'a GroupingVariants,
}

pub fn render_variants(config: &str, variants: &GroupingVariants, json: bool, out: &mut impl Write) -> anyhow::Result<()> {
	if json {
		let report = Report {
			config,
			hashes: variants.hashes(),
			variants,
		};
		serde_json::to_writer_pretty(&mut *out, &report)?;
		writeln!(out)?;
		return Ok(());
	}

	writeln!(out, "config: {config}")?;
	for (name, root) in variants.iter() {
		let hash = root.get_hash();
		let state = if root.contributes() { "contributing" } else { "ignored" };
		writeln!(out, "{name}: {} [{state}]", hash.as_deref().unwrap_or("-"))?;
		if let Some(hint) = root.get_hint() {
			writeln!(out, "    {hint}")?;
		}
	}
	Ok(())
}
