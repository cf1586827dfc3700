//! `brzc`: lex, parse, and evaluate a WHILE or FUN source file.

mod tracing_setup;

use brz_diagnostic::BrzError;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

const EXIT_OK: i32 = 0;
const EXIT_USAGE: i32 = 2;
const EXIT_ERROR: i32 = 1;

enum Dialect {
    While,
    Fun,
}

fn main() {
    tracing_setup::init();

    let args: Vec<String> = std::env::args().collect();
    let mut show_time = false;
    let mut path: Option<String> = None;
    for arg in args.iter().skip(1) {
        if arg == "--time" {
            show_time = true;
        } else if path.is_none() {
            path = Some(arg.clone());
        }
    }

    let Some(raw_path) = path else {
        print_usage();
        std::process::exit(EXIT_USAGE);
    };

    let Some(dialect) = sniff_dialect(&raw_path) else {
        eprintln!("'{raw_path}' has no recognised extension (expected '.while' or '.fun')");
        std::process::exit(EXIT_USAGE);
    };

    let resolved = resolve_path(&dialect, &raw_path);
    let source = match std::fs::read_to_string(&resolved) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error reading '{}': {e}", resolved.display());
            std::process::exit(EXIT_ERROR);
        }
    };

    let start = Instant::now();
    let result = run(&dialect, &source);
    let elapsed = start.elapsed();

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(EXIT_ERROR);
    }

    if show_time {
        println!("Evaluation Time: {} seconds", elapsed.as_secs_f64());
    }

    std::process::exit(EXIT_OK);
}

fn run(dialect: &Dialect, source: &str) -> Result<(), BrzError> {
    match dialect {
        Dialect::While => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let stdout = io::stdout();
            let mut output = stdout.lock();
            brzc::run_while_source(source, &mut input, &mut output)?;
            output.flush().map_err(|e| BrzError::io(e.to_string()))
        }
        Dialect::Fun => {
            let stdout = io::stdout();
            let mut output = stdout.lock();
            brzc::run_fun_source(source, &mut output)?;
            output.flush().map_err(|e| BrzError::io(e.to_string()))
        }
    }
}

fn sniff_dialect(path: &str) -> Option<Dialect> {
    match Path::new(path).extension().and_then(|e| e.to_str()) {
        Some("while") => Some(Dialect::While),
        Some("fun") => Some(Dialect::Fun),
        _ => None,
    }
}

/// Resolve `raw` relative to the dialect's default lookup directory, unless
/// it is already absolute or names a directory explicitly.
fn resolve_path(dialect: &Dialect, raw: &str) -> PathBuf {
    let candidate = Path::new(raw);
    if candidate.is_absolute() || raw.contains(std::path::MAIN_SEPARATOR) {
        return candidate.to_path_buf();
    }
    let lookup_dir = match dialect {
        Dialect::While => "examples",
        Dialect::Fun => "fun_examples",
    };
    Path::new(lookup_dir).join(raw)
}

fn print_usage() {
    println!("brzc: lex, parse, and evaluate a WHILE or FUN source file");
    println!();
    println!("Usage: brzc [--time] <source-file>");
    println!();
    println!("  <source-file>   a '.while' or '.fun' file; bare filenames are");
    println!("                  looked up in './examples/' or './fun_examples/'");
    println!("  --time          print an 'Evaluation Time: ... seconds' trailer");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniff_dialect_recognises_both_extensions() {
        assert!(matches!(sniff_dialect("foo.while"), Some(Dialect::While)));
        assert!(matches!(sniff_dialect("foo.fun"), Some(Dialect::Fun)));
        assert!(sniff_dialect("foo.txt").is_none());
    }

    #[test]
    fn resolve_path_uses_dialect_lookup_dir_for_bare_names() {
        assert_eq!(
            resolve_path(&Dialect::While, "count.while"),
            Path::new("examples").join("count.while")
        );
        assert_eq!(
            resolve_path(&Dialect::Fun, "fact.fun"),
            Path::new("fun_examples").join("fact.fun")
        );
    }

    #[test]
    fn resolve_path_passes_through_paths_with_a_separator() {
        let nested = Path::new("sub").join("count.while").to_string_lossy().into_owned();
        assert_eq!(resolve_path(&Dialect::While, &nested), PathBuf::from(&nested));
    }
}
