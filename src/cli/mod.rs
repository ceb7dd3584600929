//! The `scriptunit` command-line interface.

use std::process;

use clap::Parser;
use miette::IntoDiagnostic;
use serde::Serialize;
use termcolor::StandardStream;

use crate::description::Description;
use crate::engine::selector::PREFERRED_ENGINE;
use crate::engine::EngineRegistry;
use crate::test::{RecordingNotifier, RunEvent, RunSummary, Runner};
use args::{Command, DiscoveryArgs, OutputFormat, ScriptUnitArgs};
use output::{color_choice, print_description, ConsoleNotifier};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = ScriptUnitArgs::parse();

    let code = match dispatch(args.command) {
        Ok(code) => code,
        Err(report) => {
            eprintln!("{:?}", report);
            1
        }
    };
    process::exit(code);
}

fn dispatch(command: Command) -> miette::Result<i32> {
    let registry = EngineRegistry::with_defaults();
    match command {
        Command::Run { discovery, format } => run_suites(&registry, &discovery, format),
        Command::List { discovery } => {
            let runner = discover(&registry, &discovery)?;
            let mut stdout = StandardStream::stdout(color_choice());
            print_description(&mut stdout, runner.description());
            Ok(0)
        }
        Command::Engines => {
            for name in registry.names() {
                if name == PREFERRED_ENGINE {
                    println!("{} (preferred)", name);
                } else {
                    println!("{}", name);
                }
            }
            Ok(0)
        }
    }
}

fn discover(registry: &EngineRegistry, discovery: &DiscoveryArgs) -> miette::Result<Runner> {
    let config = discovery.to_config()?;
    Ok(Runner::from_config(&config, registry)?)
}

#[derive(Serialize)]
struct JsonReport<'a> {
    engine: &'static str,
    description: &'a Description,
    events: &'a [RunEvent],
    summary: &'a RunSummary,
}

fn run_suites(
    registry: &EngineRegistry,
    discovery: &DiscoveryArgs,
    format: OutputFormat,
) -> miette::Result<i32> {
    let mut runner = discover(registry, discovery)?;

    let summary = match format {
        OutputFormat::Console => {
            let mut console = ConsoleNotifier::stdout();
            runner.run(&mut console)?
        }
        OutputFormat::Json => {
            let mut recorder = RecordingNotifier::new();
            let summary = runner.run(&mut recorder)?;
            let report = JsonReport {
                engine: runner.engine_name(),
                description: runner.description(),
                events: recorder.events(),
                summary: &summary,
            };
            println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
            summary
        }
    };

    Ok(if summary.is_success() { 0 } else { 1 })
}
