//! Post-update verification and dependency installation
//!
//! External commands run with inherited stdio so their output streams
//! straight to the user. The CommandRunner seam keeps the orchestrator
//! testable without spawning real processes.

use crate::domain::SafetyChecks;
use colored::Colorize;
use std::path::Path;
use std::process::Command;

/// Dependency install command
const INSTALL_COMMAND: (&str, &[&str]) = ("bun", &["install"]);

/// Verification commands, gated by the safety-check toggles
const TYPE_CHECK_COMMAND: (&str, &[&str]) = ("bun", &["run", "typecheck"]);
const LINT_COMMAND: (&str, &[&str]) = ("bun", &["run", "lint"]);
const TEST_COMMAND: (&str, &[&str]) = ("bun", &["run", "test"]);

/// Runs external commands with inherited stdio.
///
/// The contract is "given a command, return success/failure" - a spawn
/// failure counts as failure, not a crash.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[&str], working_dir: &Path) -> bool;
}

/// Production runner over std::process::Command
#[derive(Debug, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[&str], working_dir: &Path) -> bool {
        match Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .status()
        {
            Ok(status) => status.success(),
            Err(e) => {
                eprintln!(
                    "{} failed to execute {} {}: {}",
                    "error:".red().bold(),
                    program,
                    args.join(" "),
                    e
                );
                false
            }
        }
    }
}

/// Runs the dependency install command; true on success
pub fn run_install(runner: &dyn CommandRunner, working_dir: &Path) -> bool {
    let (program, args) = INSTALL_COMMAND;
    runner.run(program, args, working_dir)
}

/// Human-readable install command, for failure messages
pub fn install_command_display() -> String {
    let (program, args) = INSTALL_COMMAND;
    format!("{} {}", program, args.join(" "))
}

/// Runs every enabled safety check sequentially.
///
/// Returns true only if every enabled check exits successfully. This is a
/// single pass/fail signal, not a per-check report; the caller decides
/// whether a false means rollback.
pub fn run_safety_checks(
    checks: &SafetyChecks,
    runner: &dyn CommandRunner,
    working_dir: &Path,
) -> bool {
    let mut steps: Vec<(&str, (&str, &[&str]))> = Vec::new();
    if checks.type_check {
        steps.push(("type check", TYPE_CHECK_COMMAND));
    }
    if checks.lint {
        steps.push(("lint", LINT_COMMAND));
    }
    if checks.required_tests {
        steps.push(("tests", TEST_COMMAND));
    }

    for (label, (program, args)) in steps {
        println!("{} {}...", "Running".bold(), label);
        if !runner.run(program, args, working_dir) {
            eprintln!("{} {} failed", "✗".red(), label);
            return false;
        }
    }

    true
}
