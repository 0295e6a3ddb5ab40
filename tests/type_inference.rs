//! Scenario 3 (spec.md §8): an integer variable and a real variable
//! reserve storage sized to their type, and mixing them in an
//! expression widens the integer operand to real.

use std::path::Path;

#[test]
fn type_inference_widens_integer_to_real() -> Result<(), Box<dyn std::error::Error>> {
    test_utils::check_compiles(
        Path::new("fixtures/type_inference.bas"),
        &["var_a:", "dw\t0", "var_b:", "defs\t5", "call\tint_to_real", "call\treal_add"],
    )
}
