//! Minimal CLI: to-code for one file, dir for a whole directory.
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use colored::Colorize as _;

use crate::pipeline::{self, Options, Report};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate typed record definitions from YAML/JSON/TOML configuration files
#[derive(Parser, Debug)]
#[command(name = "config-typegen", version)]
pub struct CommandLineInterface {
    /// raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// convert one configuration file and write the generated source
    ToCode(ToCode),
    /// convert every supported file under a directory
    Dir(DirBatch),
}

#[derive(Args, Debug, Clone)]
struct CodegenSettings {
    /// default every generated field to None instead of requiring it
    #[arg(long, default_value_t = false)]
    init_none: bool,

    /// substitute ${env:NAME} tokens before inference
    #[arg(long, default_value_t = false)]
    resolve: bool,

    /// dotted path to drop before inference, may be repeated
    #[arg(long)]
    ignore: Vec<String>,
}

#[derive(Args, Debug)]
struct ToCode {
    /// the configuration file to convert
    #[arg(short, long)]
    input: PathBuf,

    /// where to write the generated source
    #[arg(short, long, default_value = "config.rs")]
    output: PathBuf,

    #[command(flatten)]
    settings: CodegenSettings,
}

#[derive(Args, Debug)]
struct DirBatch {
    /// directory holding the configuration files
    #[arg(short, long)]
    input: PathBuf,

    /// directory to place generated files in
    #[arg(short, long)]
    output: PathBuf,

    /// recurse into subdirectories, mirroring their layout
    #[arg(short, long, default_value_t = false)]
    recursive: bool,

    /// output file name prefix
    #[arg(long, default_value = "")]
    prefix: String,

    /// output file name suffix, before the .rs extension
    #[arg(long, default_value = "")]
    suffix: String,

    #[command(flatten)]
    settings: CodegenSettings,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CodegenSettings {
    fn to_options(&self) -> Options {
        Options {
            init_none: self.init_none,
            resolve: self.resolve,
            ignore: self.ignore.clone(),
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::ToCode(target) => {
                let report = pipeline::file_to_code(
                    &target.input,
                    &target.output,
                    &target.settings.to_options(),
                )
                .with_context(|| format!("failed to convert {}", target.input.display()))?;
                print_conversion(&target.input, &target.output, &report);
                Ok(())
            }
            Command::Dir(target) => {
                let outcomes = pipeline::dir_to_code(
                    &target.input,
                    &target.output,
                    target.recursive,
                    &target.prefix,
                    &target.suffix,
                    &target.settings.to_options(),
                )
                .with_context(|| format!("failed to scan {}", target.input.display()))?;

                let mut failures = 0usize;
                for outcome in &outcomes {
                    match &outcome.result {
                        Ok(report) => print_conversion(&outcome.input, &outcome.output, report),
                        Err(error) => {
                            failures += 1;
                            eprintln!(
                                "{} {}: {error}",
                                "error:".red().bold(),
                                outcome.input.display()
                            );
                        }
                    }
                }
                if failures > 0 {
                    anyhow::bail!("{failures} of {} files failed", outcomes.len());
                }
                Ok(())
            }
        }
    }
}

fn print_conversion(input: &std::path::Path, output: &std::path::Path, report: &Report) {
    println!(
        "{} --> {}",
        input.display().to_string().cyan(),
        output.display().to_string().green()
    );
    for path in &report.unmatched_ignores {
        println!("  {} ignore path `{path}` matched nothing", "note:".yellow());
    }
    for token in &report.unresolved_tokens {
        println!("  {} token `{token}` left unresolved", "note:".yellow());
    }
}
