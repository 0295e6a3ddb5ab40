//! Scenario 6 (spec.md §8): `SYMBOL AFTER` and `SYMBOL <code>,<row>...`
//! lower to the firmware's character-redefinition entry points, each
//! immediate byte passed as its own argument.

use std::path::Path;

#[test]
fn symbol_statements_call_firmware_routines() -> Result<(), Box<dyn std::error::Error>> {
    test_utils::check_compiles(
        Path::new("fixtures/symbol_redefine.bas"),
        &["call\t&BBC9", "call\t&BBCF", "116", "126", "108", "112", "124", "48"],
    )
}
