//! Boundary case: a bare `PRINT` with no arguments still emits the
//! carriage-return/line-feed pair, just nothing before it.

use std::path::Path;

#[test]
fn bare_print_still_emits_newline() -> Result<(), Box<dyn std::error::Error>> {
    test_utils::check_compiles(
        Path::new("fixtures/empty_print.bas"),
        &["ld\ta,\t13", "ld\ta,\t10"],
    )
}
