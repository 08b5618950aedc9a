//! Entry point for the command-line interface.
//! Delegates to dedicated modules for argument handling,
//! scanning logic and output formatting.

use rootcause_php::args::{parse_cli, Commands, RulesCmd};
use rootcause_php::rules::list_rules;
use rootcause_php::scan::run_scan;

fn main() -> anyhow::Result<()> {
    let cli = parse_cli();
    match cli.command {
        Commands::Scan(args) => run_scan(args),
        Commands::Rules(RulesCmd::List { config }) => list_rules(config.as_deref()),
    }
}
