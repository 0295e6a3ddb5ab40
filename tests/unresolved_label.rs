//! Scenario 4 (spec.md §8): a `GOTO` to a line number that was never
//! declared is a fatal diagnostic, and no output file is left behind.

use std::path::Path;

#[test]
fn goto_to_missing_line_fails() -> Result<(), Box<dyn std::error::Error>> {
    test_utils::check_fails(Path::new("fixtures/unresolved_label.bas"), "UnresolvedLabel")
}
