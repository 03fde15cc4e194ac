use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use phototagger_cli::config::{ConfigSources, Settings, read_config, user_config_path};
use phototagger_cli::plantnet::{CommonNameEntry, IdentifyOptions, PlantNetClient, common_names};
use phototagger_cli::scan::scan_images;

#[derive(Parser)]
#[command(name = "phototagger")]
#[command(
	author,
	version,
	about = "CLI tool for identifying plants in photographs with the Pl@ntNet API"
)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Extra config file, loaded after ~/.phototagger.toml (may be repeated)
	#[arg(short, long = "config", value_name = "FILE", global = true)]
	config: Vec<PathBuf>,

	/// Ignore cached results and query the service again
	#[arg(long)]
	force: bool,

	/// Increase log verbosity (-v debug, -vv trace)
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display the merged effective configuration and its sources
	Show,
	/// Check the configuration for errors without identifying anything
	Validate,
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	match run(cli) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn init_logging(verbose: u8) {
	let level = match verbose {
		0 => "info",
		1 => "debug",
		_ => "trace",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}

fn run(cli: Cli) -> Result<ExitCode> {
	let sources =
		ConfigSources::discover(cli.config).context("Failed to locate configuration files")?;

	if let Some(command) = cli.command {
		return match command {
			Commands::Config { action } => match action {
				ConfigAction::Show => handle_config_show(&sources),
				ConfigAction::Validate => handle_config_validate(&sources),
			},
		};
	}

	handle_identify(&sources, cli.force)
}

fn handle_identify(sources: &ConfigSources, force: bool) -> Result<ExitCode> {
	let settings = read_config(sources).context("Failed to load configuration")?;

	let input_dir = &settings.general.input_dir;
	let scan = scan_images(input_dir)
		.with_context(|| format!("Failed to scan {}", input_dir.display()))?;

	for skipped in &scan.skipped {
		tracing::info!("Skipping {} as it is not an image file.", file_name(skipped));
	}

	let options = IdentifyOptions {
		force,
		..IdentifyOptions::from_settings(&settings.plantnet)
	};
	let client = PlantNetClient::new(options).context("Failed to create identify client")?;

	for image in &scan.images {
		let name = file_name(image);
		println!("{}", name);

		let result = client
			.identify(std::slice::from_ref(image))
			.with_context(|| format!("Failed to identify {}", name))?;
		let entries = common_names(&result)
			.with_context(|| format!("Unexpected identify result for {}", name))?;

		print_entries(&entries);
	}

	Ok(ExitCode::SUCCESS)
}

fn print_entries(entries: &[CommonNameEntry]) {
	if entries.is_empty() {
		println!("  (no common names)");
		return;
	}

	for entry in entries {
		println!("  {:.4}  {}", entry.score, entry.common_names.join(", "));
	}
}

fn handle_config_show(sources: &ConfigSources) -> Result<ExitCode> {
	let settings = read_config(sources).context("Failed to load configuration")?;

	println!("Configuration files (in load order):\n");
	for source in &settings.sources {
		println!("  {}", source.display());
	}
	println!();

	print_settings(&settings);

	// Show user config path
	if let Ok(user_path) = user_config_path() {
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn print_settings(settings: &Settings) {
	for (section, values) in &settings.raw {
		println!("[{}]", section);
		for (key, value) in values {
			if section == "plantnet" && key == "api_key" {
				println!("{} = {}", key, mask(value));
			} else {
				println!("{} = {}", key, value);
			}
		}
		println!();
	}
}

/// Keep the last four characters of a secret.
fn mask(secret: &str) -> String {
	let chars: Vec<char> = secret.chars().collect();
	if chars.len() <= 4 {
		return "*".repeat(chars.len());
	}
	let visible: String = chars[chars.len() - 4..].iter().collect();
	format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

fn handle_config_validate(sources: &ConfigSources) -> Result<ExitCode> {
	match read_config(sources) {
		Ok(settings) => {
			println!("Configuration is valid:");
			for source in &settings.sources {
				println!("  {}", source.display());
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}

fn file_name(path: &std::path::Path) -> String {
	path.file_name()
		.map(|name| name.to_string_lossy().to_string())
		.unwrap_or_else(|| path.display().to_string())
}
