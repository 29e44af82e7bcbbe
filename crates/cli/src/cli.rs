use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "faultline")]
#[command(about = "Compute grouping hashes for error events")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Settings file declaring extra grouping configurations
	#[arg(long, short = 's', value_name = "PATH", global = true)]
	pub settings: Option<PathBuf>,

	/// Verbose logging
	#[arg(long, short = 'v', global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// List grouping configurations
	Configs {
		/// Print summaries as JSON
		#[arg(long)]
		json: bool,
	},
	/// Group an event read from a JSON file
	Hash {
		/// Event payload (JSON)
		event: PathBuf,

		/// Configuration id (defaults to the latest configuration)
		#[arg(long, short = 'c')]
		config: Option<String>,

		/// Print variants as JSON
		#[arg(long)]
		json: bool,
	},
}
