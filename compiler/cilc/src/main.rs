//! Core IL command-line driver.

use std::path::Path;

use cilc::{init_tracing, PipelineError, RunOptions};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "run" => {
            let mut options = RunOptions::default();
            let mut file_path = None;
            for arg in args.iter().skip(2) {
                if let Some(limit) = arg.strip_prefix("--recursion-limit=") {
                    let Ok(limit) = limit.parse() else {
                        eprintln!("error: invalid recursion limit '{limit}'");
                        std::process::exit(1);
                    };
                    options.recursion_limit = limit;
                } else if !arg.starts_with('-') && file_path.is_none() {
                    file_path = Some(arg.as_str());
                }
            }
            let Some(path) = file_path else {
                eprintln!("Usage: cilc run <file.json> [--recursion-limit=N]");
                std::process::exit(1);
            };
            let source = read_source(path);
            let base_dir = Path::new(path).parent();
            if let Err(err) = cilc::run(&source, base_dir, &options, cil_eval::stdout_handler()) {
                fail(&err);
            }
        }
        "check" => {
            let path = path_arg(&args, "check");
            let source = read_source(path);
            match cilc::check(&source, Path::new(path).parent()) {
                Ok(_) => println!("{path}: ok"),
                Err(PipelineError::Invalid(violations)) => {
                    for violation in violations.iter() {
                        println!("{violation}");
                    }
                    std::process::exit(1);
                }
                Err(err) => fail(&err),
            }
        }
        "lower" => {
            let path = path_arg(&args, "lower");
            let source = read_source(path);
            match cilc::lower(&source, Path::new(path).parent()) {
                Ok(json) => println!("{json}"),
                Err(err) => fail(&err),
            }
        }
        "version" | "--version" | "-V" => {
            println!("cilc {}", env!("CARGO_PKG_VERSION"));
            let labels: Vec<String> = cil_ir::SUPPORTED_VERSIONS
                .iter()
                .map(ToString::to_string)
                .collect();
            println!("document versions: {}", labels.join(", "));
        }
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            std::process::exit(1);
        }
    }
}

fn path_arg<'a>(args: &'a [String], command: &str) -> &'a str {
    let Some(path) = args.get(2) else {
        eprintln!("Usage: cilc {command} <file.json>");
        std::process::exit(1);
    };
    path
}

fn read_source(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: cannot read '{path}': {e}");
            std::process::exit(1);
        }
    }
}

/// Report an uncaught error the way a failed program does: kind, message
/// and the function backtrace, then a non-zero exit.
fn fail(err: &PipelineError) -> ! {
    eprintln!("{}: {err}", err.kind());
    if let PipelineError::Runtime(err) = err {
        if !err.backtrace.is_empty() {
            eprint!("{}", err.backtrace);
        }
    }
    std::process::exit(1);
}

fn print_usage() {
    println!("Core IL driver");
    println!();
    println!("Usage: cilc <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file>      Validate, lower and execute a document");
    println!("                  imports resolve next to <file>");
    println!("                  --recursion-limit=N  maximum call depth (default 100)");
    println!("  check <file>    Validate a document and list every violation");
    println!("  lower <file>    Print the lowered document as JSON");
    println!("  version         Show version information");
    println!("  help            Show this help message");
}
