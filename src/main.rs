//! depsync - Workspace dependency version manager CLI
//!
//! Keeps a monorepo's workspace package manifests in sync with a canonical
//! category -> package -> version configuration backed by the npm registry.

use clap::error::ErrorKind;
use clap::Parser;
use colored::Colorize;
use depsync::cli::{CliArgs, CliCommand};
use depsync::manager::{UpdateReport, VersionManager};
use depsync::output;
use depsync::progress::Progress;
use depsync::prompt::{Prompter, StdinPrompter};
use depsync::registry::{HttpClient, NpmRegistry};
use depsync::safety::SystemCommandRunner;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // help/version render through the same path but exit cleanly
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let mut progress = Progress::new(!args.quiet);

    progress.spinner("Initializing...");
    let client = HttpClient::new()?;
    let mut manager = VersionManager::initialize(
        &args.root,
        Arc::new(NpmRegistry::new(client)),
        Box::new(StdinPrompter::new()),
        Box::new(SystemCommandRunner::new()),
    )?;
    progress.finish_and_clear();

    match args.command {
        CliCommand::Check => run_check(&mut manager).await,
        CliCommand::Update { group } => {
            let result = manager.update_versions(group.as_deref(), None).await;
            Ok(finish_update(result))
        }
        CliCommand::UpdateSelected => run_update_selected(&mut manager).await,
    }
}

/// `check`: scan, report, and offer an interactive update path
async fn run_check(manager: &mut VersionManager) -> anyhow::Result<ExitCode> {
    let report = manager.check_version_mismatches().await?;
    let mut has_issues = false;

    if !report.undefined_packages.is_empty() {
        output::print_undefined_packages(&report.undefined_packages);
        has_issues = true;
    }

    if !report.mismatches.is_empty() {
        has_issues = true;
        output::print_mismatches(&report.mismatches);

        println!();
        println!("{}", "Choose how to proceed:".bold());
        println!("  1. Update all mismatched packages");
        println!("  2. Pick packages to update");
        println!("  3. Skip");

        let prompter = StdinPrompter::new();
        let answer = prompter.ask("Select (1-3):")?;

        match answer.as_str() {
            "1" => {
                let result = manager.update_versions(None, None).await;
                return Ok(finish_update(result));
            }
            "2" => {
                let selected = manager.select_packages_for_update(&report.mismatches)?;
                if selected.is_empty() {
                    println!("No packages selected.");
                } else {
                    let result = manager.update_versions(None, Some(&selected)).await;
                    return Ok(finish_update(result));
                }
            }
            "3" => println!("Update skipped."),
            _ => println!("Invalid selection; skipping update."),
        }
    }

    if !has_issues {
        println!(
            "{}",
            "All workspace versions match the dependency configuration.".green()
        );
    }

    Ok(ExitCode::SUCCESS)
}

/// `update:selected`: scan, pick a subset of mismatched packages, update
async fn run_update_selected(manager: &mut VersionManager) -> anyhow::Result<ExitCode> {
    let report = manager.check_version_mismatches().await?;

    if report.mismatches.is_empty() {
        println!("No version mismatches found.");
        return Ok(ExitCode::SUCCESS);
    }

    let selected = manager.select_packages_for_update(&report.mismatches)?;
    if selected.is_empty() {
        println!("No packages selected.");
        return Ok(ExitCode::SUCCESS);
    }

    let result = manager.update_versions(None, Some(&selected)).await;
    Ok(finish_update(result))
}

/// Maps an update outcome to terminal output and an exit code
fn finish_update(result: Result<UpdateReport, depsync::error::AppError>) -> ExitCode {
    match result {
        Ok(report) => {
            if let Some(message) = report.message {
                println!("{}", message);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} update failed: {}", "✗".red(), e);
            ExitCode::FAILURE
        }
    }
}
