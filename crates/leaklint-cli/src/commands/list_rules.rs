//! List rules command implementation.

use leaklint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<10} {:<18} {:<10} Description", "Code", "Name", "Severity");
    println!("{}", "-".repeat(80));

    for rule in all_rules() {
        println!(
            "{:<10} {:<18} {:<10} {}",
            rule.code(),
            rule.name(),
            rule.default_severity().to_string(),
            rule.description()
        );
    }

    println!("\nPresets:");
    println!("  recommended  - GL001 (test files exempt), GL002 (default)");
    println!("  strict       - GL001 without exemptions, GL002 as error");
    println!("  minimal      - GL001 only, test files and package main exempt");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  leaklint check --rules resource-leak");
    println!("  leaklint check --rules GL001,GL002");
}
