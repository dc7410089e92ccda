//! xsdoc - resolve cross-references in rendered schema documentation

use std::fs;
use std::process::ExitCode;

use clap::Parser;

use xsdoc::{Resolver, xhtml};

#[derive(Parser)]
#[command(name = "xsdoc")]
#[command(version, about = "Resolve cross-references in rendered schema documentation", long_about = None)]
#[command(after_help = "EXAMPLES:
    xsdoc page.xhtml resolved.xhtml    Resolve references, write result
    xsdoc page.xhtml                   Resolve and write to stdout
    xsdoc --check page.xhtml           Fail if any reference is unresolved")]
struct Cli {
    /// Input file (rendered XHTML documentation page)
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (defaults to stdout)
    #[arg(value_name = "OUTPUT")]
    output: Option<String>,

    /// Suppress the resolution summary
    #[arg(short, long)]
    quiet: bool,

    /// Exit non-zero when any reference fails to resolve
    #[arg(long)]
    check: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(clean) => {
            if cli.check && !clean {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<bool, String> {
    let content = fs::read_to_string(&cli.input).map_err(|e| e.to_string())?;
    let mut tree = xhtml::parse(&content).map_err(|e| e.to_string())?;

    let report = Resolver::new()
        .resolve_all(&mut tree)
        .map_err(|e| e.to_string())?;

    if !cli.quiet {
        eprintln!(
            "{}: {} moved, {} cloned, {} external links dropped, {} unresolved",
            cli.input,
            report.moved(),
            report.cloned(),
            report.removed(),
            report.unresolved().len()
        );
        for miss in report.unresolved() {
            eprintln!("  unresolved {}: {}", miss.kind, miss.target_id);
        }
    }

    let output = xhtml::serialize(&tree);
    match &cli.output {
        Some(path) => fs::write(path, output).map_err(|e| e.to_string())?,
        None => print!("{output}"),
    }

    Ok(report.is_clean())
}
