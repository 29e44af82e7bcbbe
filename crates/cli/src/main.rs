//! Faultline command line front end.

mod cli;
mod commands;
mod settings;

use clap::Parser;
use cli::{Cli, Command};
use settings::Settings;

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	let settings = match &cli.settings {
		Some(path) => Settings::load(path)?,
		None => Settings::default(),
	};
	let db = settings.build_db()?;
	tracing::debug!(configs = db.len(), latest = db.latest_id().unwrap_or("-"), "configurations loaded");

	let mut out = std::io::stdout().lock();
	match cli.command {
		Command::Configs { json } => commands::configs(&db, json, &mut out),
		Command::Hash { event, config, json } => {
			let config = config.as_deref().or(settings.default_config.as_deref());
			commands::hash(&db, &event, config, json, &mut out)
		}
	}
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("faultline=trace,debug")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
