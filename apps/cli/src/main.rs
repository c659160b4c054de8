use std::path::PathBuf;

use anyhow::{Context, Result};
use apigen_codegen::generators::GeneratorConfig;
use apigen_codegen::parser::endpoint::SkipList;
use apigen_codegen::Mode;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "apigen")]
#[command(about = "Generate Rust client code from REST API descriptors")]
#[command(version)]
struct Cli {
    /// Kind of descriptors found in the input directory
    #[arg(long, value_enum, default_value_t = CliMode::Api)]
    mode: CliMode,

    /// JSON file with generator settings; flags below override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Module path generated code imports its runtime types from
    #[arg(long, value_name = "PATH")]
    runtime_path: Option<String>,

    /// Type the endpoint methods are attached to
    #[arg(long, value_name = "TYPE")]
    receiver: Option<String>,

    /// Do not emit documentation comments
    #[arg(long)]
    no_docs: bool,

    /// Also emit a mod.rs declaring every generated module
    #[arg(long)]
    with_mod_rs: bool,

    /// Generate every URL template, including the irregular ones skipped by default
    #[arg(long)]
    no_skip_list: bool,

    /// Print the generated files instead of writing them
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Directory holding the JSON descriptors
    input: PathBuf,

    /// Directory receiving the generated files
    output: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliMode {
    /// Endpoint descriptors
    Api,
    /// Request-body descriptors
    Request,
}

impl From<CliMode> for Mode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Api => Mode::Endpoints,
            CliMode::Request => Mode::Bodies,
        }
    }
}

impl Cli {
    /// Defaults, then the config file, then explicit flags.
    fn generator_config(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => GeneratorConfig::default(),
        };

        if let Some(runtime_path) = &self.runtime_path {
            config.runtime_path = runtime_path.clone();
        }
        if let Some(receiver) = &self.receiver {
            config.receiver_type = receiver.clone();
        }
        if self.no_docs {
            config.generate_docs = false;
        }
        if self.with_mod_rs {
            config.generate_mod_rs = true;
        }
        if self.no_skip_list {
            config.skip_list = SkipList::none();
        }

        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.generator_config()?;
    let mode = Mode::from(cli.mode);

    if cli.dry_run {
        let modules = apigen_codegen::render_from_dir(mode, &cli.input, config)?;
        for (filename, contents) in &modules {
            println!("// ===== {} =====", cli.output.join(filename).display());
            println!("{}", contents);
        }
        return Ok(());
    }

    let count = apigen_codegen::generate_from_dir(mode, &cli.input, &cli.output, config)?;
    tracing::info!(files = count, "code generation finished");

    Ok(())
}
