//! Scenario 2 (spec.md §8): MODE, a FOR/NEXT loop, and CHR$ inside a
//! PRINT list all lower into the expected firmware calls and library
//! routine requests.

use std::path::Path;

#[test]
fn for_chr_compiles_to_expected_assembly() -> Result<(), Box<dyn std::error::Error>> {
    test_utils::check_compiles(
        Path::new("fixtures/for_chr.bas"),
        &[
            "call\t&BC0E",
            "var_x:",
            "call\tstrlib_int2str",
            "call\tstrlib_chr",
            "__for_head_",
            "__for_test_",
            "__for_end_",
        ],
    )
}
