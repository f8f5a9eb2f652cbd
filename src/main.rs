use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use kpl_front::error::{ErrorReporter, FailFast, ScanError};
use kpl_front::scanner::lexer::Scanner;
use kpl_front::scanner::reader::SourceReader;
use kpl_front::scanner::token::Token;
use kpl_front::scanner::{self, ErrorPositions, ScannerConfig};
use kpl_front::symtab::{SymbolTable, printer};

#[derive(Parser, Debug)]
#[command(name = "kplc", about = "KPL lexical scanner and symbol table front end")]
struct Cli {
    /// KPL source file to scan
    file: Option<PathBuf>,

    /// Token output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Longest accepted identifier
    #[arg(
        long,
        default_value_t = ScannerConfig::DEFAULT_MAX_IDENT_LEN,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    max_ident_len: usize,

    /// Longest accepted string constant
    #[arg(
        long,
        default_value_t = ScannerConfig::DEFAULT_MAX_IDENT_LEN,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    max_string_len: usize,

    /// Report unterminated strings and comments where the input ended
    #[arg(long)]
    legacy_positions: bool,

    /// Stop scanning at the first lexical error
    #[arg(long)]
    fail_fast: bool,

    /// Print the built-in routines of a fresh symbol table and exit
    #[arg(long)]
    dump_builtins: bool,

    /// Log scope and table activity (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn scanner_config(&self) -> ScannerConfig {
        ScannerConfig {
            max_ident_len: self.max_ident_len,
            max_string_len: self.max_string_len,
            error_positions: if self.legacy_positions {
                ErrorPositions::Legacy
            } else {
                ErrorPositions::Start
            },
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "error" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn scan_with<E: ErrorReporter>(
    reader: SourceReader,
    reporter: E,
    config: ScannerConfig,
) -> (Vec<Token>, E) {
    let mut scanner = Scanner::with_reporter(reader, reporter, config);
    let tokens: Vec<Token> = scanner.by_ref().collect();
    (tokens, scanner.into_reporter())
}

fn report_scan_errors(errors: Vec<ScanError>, name: &str, source: &str) -> anyhow::Error {
    let count = errors.len();
    for e in errors {
        eprintln!("{:?}", miette::Report::new(e.into_report(name, source)));
    }
    anyhow::anyhow!("{count} error(s)")
}

fn dump_builtins() -> Result<()> {
    let table = SymbolTable::new();
    print!("{}", printer::dump_table(&table));
    table.teardown().context("tear down symbol table")?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.dump_builtins {
        return dump_builtins();
    }

    let Some(path) = cli.file.as_ref() else {
        bail!("scanner: no input file");
    };
    let reader = SourceReader::open(path)?;
    let source = reader.source().to_string();
    let name = path.display().to_string();
    let config = cli.scanner_config();

    let (tokens, errors): (Vec<Token>, Vec<ScanError>) = if cli.fail_fast {
        let (tokens, reporter) = scan_with(reader, FailFast::default(), config);
        (tokens, reporter.error.into_iter().collect())
    } else {
        scan_with(reader, Vec::new(), config)
    };

    match cli.format.as_str() {
        "json" => println!("{}", scanner::to_json(&tokens)),
        _ => {
            for token in tokens.iter().filter(|t| !t.is_eof()) {
                println!("{token}");
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(report_scan_errors(errors, &name, &source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_length_limits_are_rejected() {
        assert!(Cli::try_parse_from(["kplc", "--max-ident-len", "0", "a.kpl"]).is_err());
        assert!(Cli::try_parse_from(["kplc", "--max-string-len", "0", "a.kpl"]).is_err());
    }

    #[test]
    fn limits_reach_the_scanner_config() {
        let cli = Cli::try_parse_from([
            "kplc",
            "--max-ident-len",
            "3",
            "--legacy-positions",
            "a.kpl",
        ])
        .unwrap();
        let config = cli.scanner_config();
        assert_eq!(config.max_ident_len, 3);
        assert_eq!(config.max_string_len, ScannerConfig::DEFAULT_MAX_IDENT_LEN);
        assert_eq!(config.error_positions, ErrorPositions::Legacy);
    }
}
