//! Scenario 1 (spec.md §8): a trivial two-line program compiles to
//! assembly that prints a string literal and spins on its own line.

use std::path::Path;

#[test]
fn hello_compiles_to_expected_assembly() -> Result<(), Box<dyn std::error::Error>> {
    test_utils::check_compiles(
        Path::new("fixtures/hello.bas"),
        &[
            "org\t&4000",
            "call\tstrlib_print_str",
            "jp\t__label_line_20",
            "__label_line_10:",
            "__label_line_20:",
        ],
    )
}
