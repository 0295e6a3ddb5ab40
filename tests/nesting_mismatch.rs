//! Scenario 5 (spec.md §8): closing an inner `FOR J` with `NEXT I`
//! mismatches the innermost open loop and is a fatal diagnostic.

use std::path::Path;

#[test]
fn next_with_wrong_variable_fails() -> Result<(), Box<dyn std::error::Error>> {
    test_utils::check_fails(Path::new("fixtures/nesting_mismatch.bas"), "NestingError")
}
