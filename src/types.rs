//! The closed `{Integer, Real, String}` type tag set BASIC's suffix-driven
//! typing resolves to, and the rules for combining them (spec.md §4.4).

use std::fmt;

use crate::diagnostics::{Diagnostic, DiagnosticKind, Position};
use crate::lexer::TypeSuffix;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Integer,
    Real,
    String,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Type::Integer => "integer",
            Type::Real => "real",
            Type::String => "string",
        };
        f.write_str(text)
    }
}

impl Type {
    /// The storage width a variable of this type is reserved with in the
    /// DATA AREA: 2 bytes for an integer, 5 for a real, 256 for a string
    /// buffer (including its length byte).
    pub fn storage_size(self) -> u16 {
        match self {
            Type::Integer => 2,
            Type::Real => 5,
            Type::String => 256,
        }
    }

    /// A bare suffix defaults to `Real` per spec.md §3.
    pub fn from_suffix(suffix: TypeSuffix) -> Type {
        match suffix {
            TypeSuffix::Percent => Type::Integer,
            TypeSuffix::Bang => Type::Real,
            TypeSuffix::Dollar => Type::String,
            TypeSuffix::None => Type::Real,
        }
    }
}

/// Widens two operand types for a binary arithmetic/logical operator,
/// following spec.md §4.4's widening rules: two strings combine only under
/// `+`; any other string mix is an error; integer/real mixes widen to real;
/// two integers stay integer.
pub fn widen_arithmetic(
    lhs: Type,
    rhs: Type,
    allow_string_concat: bool,
    position: Position,
) -> Result<Type, Diagnostic> {
    match (lhs, rhs) {
        (Type::String, Type::String) if allow_string_concat => Ok(Type::String),
        (Type::String, _) | (_, Type::String) => Err(Diagnostic::fatal(
            position,
            DiagnosticKind::TypeError,
            format!("cannot combine {lhs} and {rhs} in this expression"),
        )),
        (Type::Integer, Type::Integer) => Ok(Type::Integer),
        _ => Ok(Type::Real),
    }
}
