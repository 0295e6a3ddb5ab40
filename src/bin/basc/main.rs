//! The `basc` CLI driver: parses arguments, runs the compiler library,
//! writes output atomically, and maps the result to an exit code.

mod cli;

use std::fs;
use std::process::ExitCode;

use cli::Cli;
use log::{error, info};

use basc::error::CompileError;

fn main() -> ExitCode {
    let args = Cli::init();
    simple_logger::init_with_level(args.log_level()).expect("logger installs exactly once");

    match run(&args) {
        Ok(()) => ExitCode::from(0),
        Err(err) => {
            error!("{err}");
            match err {
                CompileError::Diagnostic(_) => ExitCode::from(1),
                CompileError::Io(_) => ExitCode::from(2),
                CompileError::Usage(_) => ExitCode::from(3),
            }
        }
    }
}

fn run(args: &Cli) -> Result<(), CompileError> {
    if args.source.extension().and_then(|ext| ext.to_str()) != Some("bas") {
        return Err(CompileError::Usage(format!(
            "expected a .bas source file, got '{}'",
            args.source.display()
        )));
    }

    info!("compiling {}", args.source.display());
    let (asm, warnings) = basc::compile_file(&args.source, args.org)?;
    for warning in &warnings {
        eprintln!("{}", warning.render(&args.source.display().to_string()));
    }

    let output_path = args.output_path();
    let temp_path = output_path.with_extension("asm.tmp");
    write_atomically(&output_path, &temp_path, &asm)?;
    info!("wrote {}", output_path.display());

    if args.listing {
        let listing_path = output_path.with_extension("lst");
        let temp_path = listing_path.with_extension("lst.tmp");
        write_atomically(&listing_path, &temp_path, &asm)?;
    }

    if args.map {
        let map_path = output_path.with_extension("map");
        let temp_path = map_path.with_extension("map.tmp");
        write_atomically(&map_path, &temp_path, &symbol_map(&asm))?;
    }

    Ok(())
}

/// Writes `contents` to `temp_path` then renames it to `final_path`; on
/// failure, removes whatever was written to `temp_path` (spec.md §5).
fn write_atomically(final_path: &std::path::Path, temp_path: &std::path::Path, contents: &str) -> Result<(), CompileError> {
    let result = fs::write(temp_path, contents).and_then(|()| fs::rename(temp_path, final_path));
    if result.is_err() {
        let _ = fs::remove_file(temp_path);
    }
    result.map_err(CompileError::Io)
}

/// A minimal `label -> address placeholder` map; real addresses are only
/// known once an external assembler lays out the CODE AREA, so this just
/// lists label names in emission order for now.
fn symbol_map(asm: &str) -> String {
    asm.lines()
        .filter_map(|line| line.strip_suffix(':'))
        .map(|label| format!("{label}\n"))
        .collect()
}
