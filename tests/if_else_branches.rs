//! Boundary case: `IF 0 THEN 100 ELSE 200` takes a line number directly
//! in each branch (shorthand for `GOTO` to that line), so both targets'
//! labels must appear reachable in the generated assembly.

use std::path::Path;

#[test]
fn if_then_else_line_targets_both_compile() -> Result<(), Box<dyn std::error::Error>> {
    test_utils::check_compiles(
        Path::new("fixtures/if_else_branches.bas"),
        &["__label_line_100", "__label_line_200", "__label_line_300"],
    )
}
