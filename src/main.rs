use std::path::PathBuf;
use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, warn, LevelFilter};
use dukebox::{DirProvider, JarProvider};
use quill::inheritance::{BuiltinProvider, CachedProvider, ClassFactProvider};
use quill::matches::Match;
use quill::names_csv::NameTable;
use quill::set::MappingSet;
use crate::input::Input;

mod input;

#[derive(Debug, Parser)]
#[command(name = "mapping-bridge", about = "Composes mappings between the names of compiled Java programs")]
struct Cli {
	/// Also print debug messages.
	#[arg(short = 'v', long = "verbose", global = true, conflicts_with = "quiet")]
	verbose: bool,

	/// Only print warnings and errors.
	#[arg(short = 'q', long = "quiet", global = true)]
	quiet: bool,

	#[command(subcommand)]
	command: Command,
}

/// Where to get the class hierarchy from, always in the obfuscated namespace of the mappings.
#[derive(Debug, Args)]
struct ProviderArgs {
	/// A jar with classes, can be given multiple times.
	#[arg(long = "jar")]
	jars: Vec<PathBuf>,

	/// A directory with class files, can be given multiple times.
	#[arg(long = "dir")]
	dirs: Vec<PathBuf>,

	/// Also use the classes of the Java installation at `JAVA_HOME`.
	///
	/// Only installations up to Java 8 are supported, as they're read from `rt.jar`. For newer ones, only
	/// `java/lang/Object` is known, so pass the platform classes with `--jar` or `--dir` instead.
	#[arg(long = "jdk")]
	jdk: bool,
}

impl ProviderArgs {
	fn is_empty(&self) -> bool {
		self.jars.is_empty() && self.dirs.is_empty() && !self.jdk
	}

	fn provider(&self) -> Result<CachedProvider<Vec<Box<dyn ClassFactProvider>>>> {
		let mut providers: Vec<Box<dyn ClassFactProvider>> = Vec::new();
		for jar in &self.jars {
			providers.push(Box::new(JarProvider::open(jar)?));
		}
		for dir in &self.dirs {
			providers.push(Box::new(DirProvider::new(dir)));
		}
		if self.jdk {
			match dukebox::jdk_provider()? {
				Some(jdk) => providers.push(Box::new(jdk)),
				None => warn!("no platform classes found (Java 9 and later have no rt.jar), methods overriding them may stay unnamed"),
			}
		}
		providers.push(Box::new(BuiltinProvider::new()?));

		Ok(CachedProvider::new(providers))
	}
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Reads mappings and writes them again, possibly in another format or between other namespaces
	Convert {
		input: Input,
		#[arg(short = 'o', long = "output")]
		output: PathBuf,
	},
	/// Swaps the obfuscated and deobfuscated names
	Reverse {
		input: Input,
		#[arg(short = 'o', long = "output")]
		output: PathBuf,
	},
	/// Merges mappings through their shared namespaces, from left to right
	Merge {
		#[arg(required = true, num_args = 2..)]
		inputs: Vec<Input>,
		#[arg(short = 'o', long = "output")]
		output: PathBuf,
	},
	/// Replaces field and method names with the names from CSV tables
	Names {
		input: Input,
		/// A CSV table of names, later tables win.
		#[arg(long = "csv", required = true)]
		tables: Vec<PathBuf>,
		#[arg(short = 'o', long = "output")]
		output: PathBuf,
	},
	/// Gives methods overriding each other the same name
	Complete {
		input: Input,
		#[command(flatten)]
		providers: ProviderArgs,
		#[arg(short = 'o', long = "output")]
		output: PathBuf,
	},
	/// Creates mappings from MCP names to other names, through the obfuscated names
	Bridge {
		/// The obfuscated to SRG mappings, usually a TSRG file.
		#[arg(long = "mcp")]
		mcp: Input,
		/// CSV tables giving SRG names their MCP name.
		#[arg(long = "csv")]
		tables: Vec<PathBuf>,
		/// The obfuscated to named mappings to bridge to.
		#[arg(long = "names")]
		names: Input,
		/// Classes to complete the named mappings with before bridging.
		#[command(flatten)]
		providers: ProviderArgs,
		#[arg(short = 'o', long = "output")]
		output: PathBuf,
	},
	/// Creates mappings from the names of an old version to the names of a new version
	Migrate {
		/// Match files between consecutive versions, from the oldest to the newest.
		#[arg(long = "match", required = true)]
		matches: Vec<PathBuf>,
		/// Mappings of the old version.
		#[arg(long = "start")]
		start: Input,
		/// Mappings of the new version.
		#[arg(long = "end")]
		end: Input,
		#[arg(short = 'o', long = "output")]
		output: PathBuf,
	},
}

fn setup_logger(level: LevelFilter) -> Result<()> {
	fern::Dispatch::new()
		.format(|out, message, record| {
			out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
		})
		.level(level)
		.chain(std::io::stderr())
		.apply()
		.context("failed to set up logging")
}

fn read_name_tables(paths: &[PathBuf]) -> Result<NameTable> {
	let mut table = NameTable::new();
	for path in paths {
		let other = NameTable::read_file(path)?;
		info!("read {} names from {path:?}", other.len());
		table.extend(other);
	}
	Ok(table)
}

fn bridge(mcp: &Input, tables: &[PathBuf], names: &Input, providers: &ProviderArgs) -> Result<MappingSet> {
	let mut named = names.read()?;
	if !providers.is_empty() {
		named = named.complete(&providers.provider()?)?;
	}

	let mcp = mcp.read()?
		.fill_field_descriptors(&named)?
		.apply_name_table(&read_name_tables(tables)?)?;

	mcp.reverse()?.merge(&named)
}

fn migrate(matches: &[PathBuf], start: &Input, end: &Input) -> Result<MappingSet> {
	let matches = matches.iter()
		.map(|path| Match::read_file(path))
		.collect::<Result<Vec<_>>>()?;
	let chained = quill::matches::chain_all(matches)?;
	info!("chained matches for {} classes", chained.classes.len());

	let updated = chained.update_mappings(&start.read()?)?;
	updated.reverse()?.merge(&end.read()?)
}

fn run(command: Command) -> Result<()> {
	match command {
		Command::Convert { input, output } => {
			input::write(&input.read()?, &output)
		},
		Command::Reverse { input, output } => {
			input::write(&input.read()?.reverse()?, &output)
		},
		Command::Merge { inputs, output } => {
			let mut inputs = inputs.iter();
			let first = inputs.next()
				.with_context(|| anyhow!("no mappings to merge"))?;
			let mut merged = first.read()?;
			for input in inputs {
				merged = merged.merge(&input.read()?)
					.with_context(|| anyhow!("failed to merge with {:?}", input.path))?;
			}
			input::write(&merged, &output)
		},
		Command::Names { input, tables, output } => {
			let table = read_name_tables(&tables)?;
			input::write(&input.read()?.apply_name_table(&table)?, &output)
		},
		Command::Complete { input, providers, output } => {
			let provider = providers.provider()?;
			let completed = input.read()?.complete(&provider)?;
			info!("looked at {} classes", provider.cached_count());
			input::write(&completed, &output)
		},
		Command::Bridge { mcp, tables, names, providers, output } => {
			input::write(&bridge(&mcp, &tables, &names, &providers)?, &output)
		},
		Command::Migrate { matches, start, end, output } => {
			input::write(&migrate(&matches, &start, &end)?, &output)
		},
	}
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	let level = if cli.verbose {
		LevelFilter::Debug
	} else if cli.quiet {
		LevelFilter::Warn
	} else {
		LevelFilter::Info
	};
	setup_logger(level)?;

	run(cli.command)
}

#[cfg(test)]
mod testing {
	use clap::CommandFactory;
	use crate::Cli;

	#[test]
	fn verify_cli() {
		Cli::command().debug_assert();
	}
}
