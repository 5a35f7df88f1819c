//! Report rendering for check and update flows

use crate::domain::{UndefinedPackage, VersionMismatch};
use colored::Colorize;
use std::collections::BTreeMap;

/// Renders the unregistered-package table, grouped by assigned category
pub fn print_categorized_packages(grouped: &BTreeMap<String, Vec<UndefinedPackage>>) {
    println!();
    println!(
        "{}",
        "Unregistered packages found in workspace manifests:".bold()
    );

    for (category, packages) in grouped {
        println!();
        println!("  {}:", category.cyan().bold());
        for package in packages {
            println!(
                "    {:<40} {:<20} {}",
                package.name,
                package.version,
                package.location.dimmed()
            );
        }
    }
    println!();
}

/// Renders the plain undefined-package table (no category grouping)
pub fn print_undefined_packages(packages: &[UndefinedPackage]) {
    println!();
    println!(
        "{}",
        "Packages missing from the dependency configuration:".bold()
    );
    println!("  {:<40} {:<20} {}", "name".dimmed(), "version".dimmed(), "location".dimmed());
    for package in packages {
        println!(
            "  {:<40} {:<20} {}",
            package.name, package.version, package.location
        );
    }
    println!(
        "\n{}",
        "These packages need to be registered before their versions can be managed.".yellow()
    );
}

/// Renders mismatches split into newer-than-expected and older-than-expected
pub fn print_mismatches(mismatches: &[VersionMismatch]) {
    println!();
    println!("{}", "Version mismatches found:".bold());

    let newer: Vec<_> = mismatches.iter().filter(|m| m.is_newer).collect();
    let older: Vec<_> = mismatches.iter().filter(|m| !m.is_newer).collect();

    if !newer.is_empty() {
        println!();
        println!("  {} {}", "↑".green(), "Newer than expected:".bold());
        for m in &newer {
            print_mismatch_row(m);
        }
        println!(
            "\n  {}",
            "Some workspaces are ahead of the expected version; consider updating it.".dimmed()
        );
    }

    if !older.is_empty() {
        println!();
        println!("  {} {}", "↓".yellow(), "Older than expected:".bold());
        for m in &older {
            print_mismatch_row(m);
        }
    }
}

fn print_mismatch_row(m: &VersionMismatch) {
    let arrow = "→".dimmed();
    println!(
        "    {:<30} {:<14} {} {:<14} {}",
        m.package,
        m.expected,
        arrow,
        m.actual,
        m.workspace.dimmed()
    );
}

/// Renders the applied-update summary after a successful run
pub fn print_update_summary(updates: &BTreeMap<String, String>) {
    println!();
    println!("{}", "Update complete. Packages changed:".green().bold());
    for (package, version) in updates {
        println!("  {} {}: {}", "✓".green(), package, version);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Rendering helpers only print; these tests pin that they do not panic
    // on empty and populated inputs.

    #[test]
    fn test_print_empty_inputs() {
        print_mismatches(&[]);
        print_undefined_packages(&[]);
        print_update_summary(&BTreeMap::new());
        print_categorized_packages(&BTreeMap::new());
    }

    #[test]
    fn test_print_populated_inputs() {
        let mismatches = vec![
            VersionMismatch {
                workspace: "apps/web".to_string(),
                package: "react".to_string(),
                expected: "18.2.0".to_string(),
                actual: "18.3.0".to_string(),
                is_newer: true,
            },
            VersionMismatch {
                workspace: "packages/ui".to_string(),
                package: "lodash".to_string(),
                expected: "4.17.21".to_string(),
                actual: "4.17.0".to_string(),
                is_newer: false,
            },
        ];
        print_mismatches(&mismatches);

        let undefined = vec![UndefinedPackage::new("left-pad", "1.3.0", "apps/web")];
        print_undefined_packages(&undefined);

        let mut grouped = BTreeMap::new();
        grouped.insert("misc".to_string(), undefined);
        print_categorized_packages(&grouped);

        let mut updates = BTreeMap::new();
        updates.insert("axios".to_string(), "1.0.0".to_string());
        print_update_summary(&updates);
    }
}
