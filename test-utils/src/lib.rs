use std::{
    error::Error,
    fs, io,
    path::Path,
    process::{Command, Output},
    str,
};

const BASC_PATH: &str = "./target/debug/basc";
const OUTPUT_PATH: &str = "./output";

fn run_compiler(src_path: &Path, out_path: &Path) -> io::Result<Output> {
    fs::create_dir_all(OUTPUT_PATH)?;
    Command::new(BASC_PATH).arg(src_path).arg("--output").arg(out_path).output()
}

fn out_path_for(src_path: &Path) -> std::path::PathBuf {
    Path::new(OUTPUT_PATH).join(src_path.file_stem().unwrap()).with_extension("asm")
}

/// Compiles `src_path` and asserts the generated assembly contains every
/// string in `expected_snippets`.
pub fn check_compiles(src_path: &Path, expected_snippets: &[&str]) -> Result<(), Box<dyn Error>> {
    let out_path = out_path_for(src_path);
    let output = run_compiler(src_path, &out_path)?;
    let stderr = str::from_utf8(&output.stderr)?;

    assert!(
        output.status.success(),
        "basc exited with status {:?} compiling {}: {stderr}",
        output.status.code(),
        src_path.display()
    );

    let asm = fs::read_to_string(&out_path)?;
    for snippet in expected_snippets {
        assert!(
            asm.contains(snippet),
            "expected the assembly for {} to contain '{snippet}', got:\n{asm}",
            src_path.display()
        );
    }
    Ok(())
}

/// Compiles `src_path` and asserts it fails with exit code 1 and a
/// stderr message naming `expected_kind`, leaving no output file behind.
pub fn check_fails(src_path: &Path, expected_kind: &str) -> Result<(), Box<dyn Error>> {
    let out_path = out_path_for(src_path);
    let _ = fs::remove_file(&out_path);
    let output = run_compiler(src_path, &out_path)?;
    let stderr = str::from_utf8(&output.stderr)?;

    assert_eq!(output.status.code(), Some(1), "expected a fatal-diagnostic exit code for {}", src_path.display());
    assert!(
        stderr.contains(expected_kind),
        "expected stderr for {} to mention {expected_kind}, got: {stderr}",
        src_path.display()
    );
    assert!(!out_path.exists(), "a fatal error must leave no output file behind");
    Ok(())
}
