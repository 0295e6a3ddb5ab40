//! The symbol table: two disjoint namespaces (variables, line targets)
//! populated incrementally during parsing and frozen before code
//! generation (spec.md §3).

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;

use crate::diagnostics::{Diagnostic, DiagnosticKind, Position};
use crate::lexer::TypeSuffix;
use crate::types::Type;

#[derive(Debug, Clone)]
pub struct VariableEntry {
    pub ty: Type,
    pub label: String,
    pub referenced: bool,
}

/// Tracks variables, line numbers, and textual `LABEL` aliases.
///
/// Variables are kept in an `IndexMap` so iteration order matches
/// first-reference order in the source, which the DATA AREA emission
/// relies on for deterministic output (spec.md §5).
#[derive(Debug, Default)]
pub struct SymbolTable {
    variables: IndexMap<String, VariableEntry>,
    line_numbers: BTreeSet<u16>,
    aliases: HashMap<String, u16>,
    last_line_number: Option<u16>,
    temp_count: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares (or re-validates) a variable. A first reference fixes its
    /// type from its suffix; a later conflicting suffix is a `TypeError`
    /// (invariant 1).
    pub fn declare_variable(
        &mut self,
        name: &str,
        suffix: TypeSuffix,
        position: Position,
    ) -> Result<Type, Diagnostic> {
        let ty = Type::from_suffix(suffix);
        if let Some(entry) = self.variables.get_mut(name) {
            if entry.ty != ty {
                return Err(Diagnostic::fatal(
                    position,
                    DiagnosticKind::TypeError,
                    format!(
                        "variable '{name}' was already used as {} but is now used as {ty}",
                        entry.ty
                    ),
                ));
            }
            entry.referenced = true;
            Ok(entry.ty)
        } else {
            let label = format!("var_{}", name.to_ascii_lowercase());
            self.variables.insert(
                name.to_owned(),
                VariableEntry {
                    ty,
                    label,
                    referenced: true,
                },
            );
            Ok(ty)
        }
    }

    pub fn variable(&self, name: &str) -> Option<&VariableEntry> {
        self.variables.get(name)
    }

    pub fn variables(&self) -> impl Iterator<Item = (&String, &VariableEntry)> {
        self.variables.iter()
    }

    pub fn fresh_temp_label(&mut self) -> String {
        let label = format!("var_tmp{:03}", self.temp_count);
        self.temp_count += 1;
        label
    }

    /// Registers a source line number; line numbers must be strictly
    /// increasing in source order.
    pub fn register_line(&mut self, number: u16, position: Position) -> Result<(), Diagnostic> {
        if let Some(last) = self.last_line_number {
            if number <= last {
                return Err(Diagnostic::fatal(
                    position,
                    DiagnosticKind::SyntaxError,
                    format!("line number {number} does not increase on the previous line {last}"),
                ));
            }
        }
        self.last_line_number = Some(number);
        self.line_numbers.insert(number);
        Ok(())
    }

    pub fn register_alias(&mut self, name: String, target: u16) {
        self.aliases.insert(name, target);
    }

    pub fn alias_target(&self, name: &str) -> Option<u16> {
        self.aliases.get(name).copied()
    }

    pub fn has_line(&self, number: u16) -> bool {
        self.line_numbers.contains(&number)
    }

    pub fn line_label(number: u16) -> String {
        format!("__label_line_{number}")
    }

    /// Validates every recorded `GOTO`/`GOSUB`/`THEN`/`RESTORE` target
    /// resolves to a known line number (invariant 2).
    pub fn check_target(&self, target: u16, position: Position) -> Result<(), Diagnostic> {
        if self.has_line(target) {
            Ok(())
        } else {
            Err(Diagnostic::fatal(
                position,
                DiagnosticKind::UnresolvedLabel,
                format!("line {target} does not exist"),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Position;

    fn pos() -> Position {
        Position::new(1, 1)
    }

    #[test]
    fn first_reference_fixes_type() {
        let mut table = SymbolTable::new();
        assert_eq!(
            table.declare_variable("A", TypeSuffix::Percent, pos()).unwrap(),
            Type::Integer
        );
        assert!(table.declare_variable("A", TypeSuffix::Bang, pos()).is_err());
    }

    #[test]
    fn lines_must_strictly_increase() {
        let mut table = SymbolTable::new();
        table.register_line(10, pos()).unwrap();
        table.register_line(20, pos()).unwrap();
        assert!(table.register_line(15, pos()).is_err());
    }
}
