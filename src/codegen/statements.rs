//! Statement lowering: one match arm per [`Statement`] variant, each
//! delegating to a small private method named after the statement it
//! handles.

use super::{pop_de, push_hl, CodeGenerator, LoopFrame};
use crate::asm::{firmware, Cond, Instruction, Operand, Reg16, Reg8};
use crate::ast::{DataValue, PrintSeparator, Statement, SymbolStatement};
use crate::diagnostics::{Diagnostic, DiagnosticKind, Position};
use crate::types::Type;

impl<'a> CodeGenerator<'a> {
    pub(super) fn generate_statement(&mut self, statement: &Statement) -> Result<(), Diagnostic> {
        match statement {
            Statement::Let { target, value, .. } => self.generate_let(target, value),
            Statement::Label { .. } => Ok(()),
            Statement::Remark { .. } => Ok(()),
            Statement::Cls { .. } => {
                self.emit(Instruction::Call(None, firmware::SCR_SET_MODE.to_string()));
                Ok(())
            }
            Statement::End { .. } => {
                self.emit(Instruction::Jp(None, "&0000".to_string()));
                Ok(())
            }
            Statement::Goto { target, position } => {
                let line = self.resolve_line_target(target, *position)?;
                self.emit(Instruction::Jp(None, crate::symtab::SymbolTable::line_label(line)));
                Ok(())
            }
            Statement::Gosub { target, position } => {
                let line = self.resolve_line_target(target, *position)?;
                self.emit(Instruction::Call(None, crate::symtab::SymbolTable::line_label(line)));
                Ok(())
            }
            Statement::Return { .. } => {
                self.emit(Instruction::Ret(None));
                Ok(())
            }
            Statement::If { condition, then_branch, else_branch, position } => {
                self.generate_if(condition, then_branch, else_branch.as_deref(), *position)
            }
            Statement::For { var, start, end, step, position } => self.generate_for(var, start, end, step.as_ref(), *position),
            Statement::Next { var, position } => self.generate_next(var.as_ref(), *position),
            Statement::While { condition, position } => self.generate_while(condition, *position),
            Statement::Wend { position } => self.generate_wend(*position),
            Statement::Print { items, .. } => self.generate_print(items),
            Statement::Input { prompt, targets, .. } => self.generate_input(prompt.as_deref(), targets),
            Statement::Locate { x, y, position } => self.generate_xy(x, y, firmware::SCR_CHAR_POSITION, *position),
            Statement::Mode { value, position } => self.generate_unary_call(value, firmware::SCR_SET_MODE, *position),
            Statement::Pen { value, position } => self.generate_unary_call(value, firmware::TXT_SET_PEN, *position),
            Statement::Paper { value, position } => self.generate_unary_call(value, firmware::TXT_SET_PAPER, *position),
            Statement::Plot { x, y, position } => self.generate_xy(x, y, firmware::GRA_PLOT_ABSOLUTE, *position),
            Statement::Draw { x, y, position } => self.generate_xy(x, y, firmware::GRA_LINE_ABSOLUTE, *position),
            Statement::Symbol { statement, position } => self.generate_symbol(statement, *position),
            Statement::Call { address, .. } => self.generate_call_statement(address),
            Statement::Poke { address, value, .. } => self.generate_poke(address, value),
            Statement::Dim { target, size, .. } => self.generate_dim(target, *size),
            Statement::Data { .. } => Ok(()), // materialized up front by generate_program's DATA AREA pass
            Statement::Read { targets, position } => self.generate_read(targets, *position),
            Statement::Restore { target, position } => self.generate_restore(target.as_ref(), *position),
        }
    }

    fn generate_let(&mut self, target: &crate::ast::Identifier, value: &crate::ast::Expression) -> Result<(), Diagnostic> {
        let value_ty = self.generate_expression(value)?;
        let entry = self
            .symtab
            .variable(&target.name)
            .expect("assignment target must have been declared during parsing");
        let label = entry.label.clone();
        let target_ty = entry.ty;
        if target_ty != value_ty && !(target_ty == Type::Real && value_ty == Type::Integer) {
            return Err(Diagnostic::fatal(
                target.position,
                DiagnosticKind::TypeError,
                format!("cannot assign a {value_ty} value to {} which is {target_ty}", target.name),
            ));
        }
        if target_ty == Type::Real && value_ty == Type::Integer {
            self.runtime.request("int_to_real");
            self.emit(Instruction::Call(None, "int_to_real".to_string()));
        }
        match target_ty {
            Type::Integer => self.emit(Instruction::Ld(Operand::IndirectLabel(label), Operand::Reg16(Reg16::Hl))),
            Type::Real => {
                self.emit(Instruction::Ld(Operand::Reg16(Reg16::De), Operand::Label(label)));
                self.runtime.request("mem_copy5");
                self.emit(Instruction::Call(None, "mem_copy5".to_string()));
            }
            Type::String => {
                self.emit(Instruction::Ld(Operand::Reg16(Reg16::De), Operand::Label(label)));
                self.runtime.request("mem_copy_str");
                self.emit(Instruction::Call(None, "mem_copy_str".to_string()));
            }
        }
        Ok(())
    }

    fn generate_if(
        &mut self,
        condition: &crate::ast::Expression,
        then_branch: &[Statement],
        else_branch: Option<&[Statement]>,
        position: Position,
    ) -> Result<(), Diagnostic> {
        let condition_ty = self.generate_expression(condition)?;
        if condition_ty == Type::String {
            return Err(Diagnostic::fatal(position, DiagnosticKind::TypeError, "IF condition cannot be a string"));
        }
        let else_label = self.fresh_label("if_else");
        let end_label = self.fresh_label("if_end");
        self.emit(Instruction::Ld(Operand::Reg8(Reg8::A), Operand::Reg8(Reg8::H)));
        self.emit(Instruction::Or(Operand::Reg8(Reg8::L)));
        self.emit(Instruction::Jp(Some(Cond::Z), else_label.clone()));
        for statement in then_branch {
            self.generate_statement(statement)?;
        }
        self.emit(Instruction::Jp(None, end_label.clone()));
        self.emit(Instruction::Label(else_label));
        if let Some(else_branch) = else_branch {
            for statement in else_branch {
                self.generate_statement(statement)?;
            }
        }
        self.emit(Instruction::Label(end_label));
        Ok(())
    }

    fn generate_for(
        &mut self,
        var: &crate::ast::Identifier,
        start: &crate::ast::Expression,
        end: &crate::ast::Expression,
        step: Option<&crate::ast::Expression>,
        position: Position,
    ) -> Result<(), Diagnostic> {
        let label = self
            .symtab
            .variable(&var.name)
            .expect("loop variable must have been declared during parsing")
            .label
            .clone();

        self.generate_expression(start)?;
        self.emit(Instruction::Ld(Operand::IndirectLabel(label.clone()), Operand::Reg16(Reg16::Hl)));

        let end_temp = self.symtab.fresh_temp_label();
        self.generate_expression(end)?;
        self.emit(Instruction::Ld(Operand::IndirectLabel(end_temp.clone()), Operand::Reg16(Reg16::Hl)));

        let step_temp = self.symtab.fresh_temp_label();
        match step {
            Some(step) => {
                self.generate_expression(step)?;
            }
            None => self.emit(Instruction::Ld(Operand::Reg16(Reg16::Hl), Operand::Immediate(1))),
        }
        self.emit(Instruction::Ld(Operand::IndirectLabel(step_temp.clone()), Operand::Reg16(Reg16::Hl)));

        let head = self.fresh_label("for_head");
        let test = self.fresh_label("for_test");
        let end_label = self.fresh_label("for_end");

        self.emit(Instruction::Jp(None, test.clone()));
        self.emit(Instruction::Label(head.clone()));

        self.loops.push(LoopFrame::For {
            var: var.clone(),
            head: head.clone(),
            test: test.clone(),
            end: end_label.clone(),
            position,
        });
        self.data.push(Instruction::Label(end_temp));
        self.data.push(Instruction::Defw(vec!["0".to_string()]));
        self.data.push(Instruction::Label(step_temp));
        self.data.push(Instruction::Defw(vec!["0".to_string()]));
        Ok(())
    }

    fn generate_next(&mut self, var: Option<&crate::ast::Identifier>, position: Position) -> Result<(), Diagnostic> {
        let frame = self.loops.pop().ok_or_else(|| {
            Diagnostic::fatal(position, DiagnosticKind::NestingError, "NEXT without a matching FOR")
        })?;
        let (loop_var, head, test, end_label) = match frame {
            LoopFrame::For { var, head, test, end, .. } => (var, head, test, end),
            LoopFrame::While { .. } => {
                return Err(Diagnostic::fatal(position, DiagnosticKind::NestingError, "NEXT closes a WHILE loop"))
            }
        };
        if let Some(var) = var {
            if var.name != loop_var.name {
                return Err(Diagnostic::fatal(
                    position,
                    DiagnosticKind::NestingError,
                    format!("NEXT {} does not match the innermost FOR {}", var.name, loop_var.name),
                ));
            }
        }
        self.emit(Instruction::Label(test));
        self.emit(Instruction::Jp(None, head));
        self.emit(Instruction::Label(end_label));
        Ok(())
    }

    fn generate_while(&mut self, condition: &crate::ast::Expression, position: Position) -> Result<(), Diagnostic> {
        let head = self.fresh_label("while_head");
        let end_label = self.fresh_label("while_end");
        self.emit(Instruction::Label(head.clone()));
        let condition_ty = self.generate_expression(condition)?;
        if condition_ty == Type::String {
            return Err(Diagnostic::fatal(position, DiagnosticKind::TypeError, "WHILE condition cannot be a string"));
        }
        self.emit(Instruction::Ld(Operand::Reg8(Reg8::A), Operand::Reg8(Reg8::H)));
        self.emit(Instruction::Or(Operand::Reg8(Reg8::L)));
        self.emit(Instruction::Jp(Some(Cond::Z), end_label.clone()));
        self.loops.push(LoopFrame::While { head, end: end_label, position });
        Ok(())
    }

    fn generate_wend(&mut self, position: Position) -> Result<(), Diagnostic> {
        let frame = self
            .loops
            .pop()
            .ok_or_else(|| Diagnostic::fatal(position, DiagnosticKind::NestingError, "WEND without a matching WHILE"))?;
        match frame {
            LoopFrame::While { head, end } => {
                self.emit(Instruction::Jp(None, head));
                self.emit(Instruction::Label(end));
                Ok(())
            }
            LoopFrame::For { .. } => Err(Diagnostic::fatal(position, DiagnosticKind::NestingError, "WEND closes a FOR loop")),
        }
    }

    fn generate_print(&mut self, items: &[crate::ast::PrintItem]) -> Result<(), Diagnostic> {
        let mut suppress_newline = false;
        for item in items {
            suppress_newline = item.trailing_separator.is_some();
            let ty = self.generate_expression(&item.value)?;
            match ty {
                Type::Integer => {
                    self.runtime.request("strlib_int2str");
                    self.emit(Instruction::Call(None, "strlib_int2str".to_string()));
                    self.runtime.request("strlib_print_str");
                    self.emit(Instruction::Call(None, "strlib_print_str".to_string()));
                }
                Type::Real => {
                    self.runtime.request("strlib_real2str");
                    self.emit(Instruction::Call(None, "strlib_real2str".to_string()));
                    self.runtime.request("strlib_print_str");
                    self.emit(Instruction::Call(None, "strlib_print_str".to_string()));
                }
                Type::String => {
                    self.runtime.request("strlib_print_str");
                    self.emit(Instruction::Call(None, "strlib_print_str".to_string()));
                }
            }
            if item.trailing_separator == Some(PrintSeparator::Comma) {
                self.emit(Instruction::Ld(Operand::Reg8(Reg8::A), Operand::Immediate(9)));
                self.emit(Instruction::Call(None, firmware::TXT_OUTPUT.to_string()));
            }
        }
        if !suppress_newline {
            self.emit(Instruction::Ld(Operand::Reg8(Reg8::A), Operand::Immediate(13)));
            self.emit(Instruction::Call(None, firmware::TXT_OUTPUT.to_string()));
            self.emit(Instruction::Ld(Operand::Reg8(Reg8::A), Operand::Immediate(10)));
            self.emit(Instruction::Call(None, firmware::TXT_OUTPUT.to_string()));
        }
        Ok(())
    }

    fn generate_input(&mut self, prompt: Option<&str>, targets: &[crate::ast::Identifier]) -> Result<(), Diagnostic> {
        if let Some(prompt) = prompt {
            let label = self.intern_string(prompt);
            self.emit(Instruction::Ld(Operand::Reg16(Reg16::Hl), Operand::Label(label)));
            self.runtime.request("strlib_print_str");
            self.emit(Instruction::Call(None, "strlib_print_str".to_string()));
        }
        self.runtime.request("input_line");
        self.runtime.request("input_to_lenstr");
        for target in targets {
            self.emit(Instruction::Call(None, "input_line".to_string()));
            self.emit(Instruction::Call(None, "input_to_lenstr".to_string()));
            let entry = self
                .symtab
                .variable(&target.name)
                .expect("INPUT target must have been declared during parsing");
            let label = entry.label.clone();
            match entry.ty {
                Type::String => {
                    self.emit(Instruction::Ld(Operand::Reg16(Reg16::De), Operand::Label(label)));
                    self.runtime.request("mem_copy_str");
                    self.emit(Instruction::Call(None, "mem_copy_str".to_string()));
                }
                Type::Real => {
                    self.runtime.request("strlib_str2real");
                    self.emit(Instruction::Call(None, "strlib_str2real".to_string()));
                    self.emit(Instruction::Ld(Operand::Reg16(Reg16::De), Operand::Label(label)));
                    self.runtime.request("mem_copy5");
                    self.emit(Instruction::Call(None, "mem_copy5".to_string()));
                }
                Type::Integer => {
                    self.runtime.request("strlib_str2real");
                    self.emit(Instruction::Call(None, "strlib_str2real".to_string()));
                    self.runtime.request("real_to_int");
                    self.emit(Instruction::Call(None, "real_to_int".to_string()));
                    self.emit(Instruction::Ld(Operand::IndirectLabel(label), Operand::Reg16(Reg16::Hl)));
                }
            }
        }
        Ok(())
    }

    fn generate_xy(
        &mut self,
        x: &crate::ast::Expression,
        y: &crate::ast::Expression,
        routine: &str,
        position: Position,
    ) -> Result<(), Diagnostic> {
        self.truncate_to_integer(x, position)?;
        push_hl(self);
        self.truncate_to_integer(y, position)?;
        pop_de(self);
        self.emit(Instruction::Ex(Operand::Reg16(Reg16::De), Operand::Reg16(Reg16::Hl)));
        self.emit(Instruction::Call(None, routine.to_string()));
        Ok(())
    }

    fn generate_unary_call(&mut self, value: &crate::ast::Expression, routine: &str, position: Position) -> Result<(), Diagnostic> {
        self.truncate_to_integer(value, position)?;
        self.emit(Instruction::Ld(Operand::Reg8(Reg8::A), Operand::Reg8(Reg8::L)));
        self.emit(Instruction::Call(None, routine.to_string()));
        Ok(())
    }

    /// Evaluates `expr`, leaving a 16-bit integer in `hl`. A `Real`
    /// argument is truncated via `real_to_int` and raises the non-fatal
    /// implicit-truncation warning spec.md §4.7 calls out for
    /// `LOCATE`/`MODE`/`PEN`/`PAPER`/`PLOT`/`DRAW`.
    fn truncate_to_integer(&mut self, expr: &crate::ast::Expression, position: Position) -> Result<(), Diagnostic> {
        let ty = self.generate_expression(expr)?;
        match ty {
            Type::Real => {
                self.warnings.push(Diagnostic::warning(
                    position,
                    "implicit real-to-integer truncation",
                ));
                self.runtime.request("real_to_int");
                self.emit(Instruction::Call(None, "real_to_int".to_string()));
                Ok(())
            }
            Type::Integer => Ok(()),
            Type::String => Err(Diagnostic::fatal(position, DiagnosticKind::TypeError, "expected a numeric value, found a string")),
        }
    }

    fn generate_symbol(&mut self, statement: &SymbolStatement, position: Position) -> Result<(), Diagnostic> {
        match statement {
            SymbolStatement::After { threshold } => self.generate_unary_call(threshold, firmware::SYMBOL_AFTER, position),
            SymbolStatement::Define { code, rows } => {
                self.generate_expression(code)?;
                for row in rows {
                    self.generate_expression(row)?;
                    push_hl(self);
                }
                self.emit(Instruction::Call(None, firmware::SYMBOL_DEFINE.to_string()));
                Ok(())
            }
        }
    }

    /// `CALL <address>` dispatches through the shared `call_indirect`
    /// trampoline: `call call_indirect` pushes the return address just
    /// past itself, then `jp (hl)` hands control to the computed target,
    /// whose own `ret` returns there.
    fn generate_call_statement(&mut self, address: &crate::ast::Expression) -> Result<(), Diagnostic> {
        self.generate_expression(address)?;
        self.runtime.request("call_indirect");
        self.emit(Instruction::Call(None, "call_indirect".to_string()));
        Ok(())
    }

    fn generate_poke(&mut self, address: &crate::ast::Expression, value: &crate::ast::Expression) -> Result<(), Diagnostic> {
        self.generate_expression(address)?;
        push_hl(self);
        self.generate_expression(value)?;
        self.emit(Instruction::Ld(Operand::Reg8(Reg8::A), Operand::Reg8(Reg8::L)));
        pop_de(self);
        self.emit(Instruction::Ex(Operand::Reg16(Reg16::De), Operand::Reg16(Reg16::Hl)));
        self.emit(Instruction::Ld(Operand::Indirect(Reg16::Hl), Operand::Reg8(Reg8::A)));
        Ok(())
    }

    fn generate_dim(&mut self, target: &crate::ast::Identifier, size: u16) -> Result<(), Diagnostic> {
        let entry = self
            .symtab
            .variable(&target.name)
            .expect("DIM target must have been declared during parsing");
        let element_size = entry.ty.storage_size();
        let label = entry.label.clone();
        self.data.push(Instruction::Label(label));
        self.data.push(Instruction::Defs(element_size.saturating_mul(size)));
        Ok(())
    }

    fn generate_read(&mut self, targets: &[crate::ast::Identifier], _position: Position) -> Result<(), Diagnostic> {
        for target in targets {
            let entry = self
                .symtab
                .variable(&target.name)
                .expect("READ target must have been declared during parsing");
            let label = entry.label.clone();
            let ty = entry.ty;
            match ty {
                Type::Integer => {
                    self.emit(Instruction::Call(None, "__data_read_int".to_string()));
                    self.emit(Instruction::Ld(Operand::IndirectLabel(label), Operand::Reg16(Reg16::Hl)));
                }
                Type::Real => {
                    self.emit(Instruction::Call(None, "__data_read_real".to_string()));
                    self.emit(Instruction::Ld(Operand::Reg16(Reg16::De), Operand::Label(label)));
                    self.runtime.request("mem_copy5");
                    self.emit(Instruction::Call(None, "mem_copy5".to_string()));
                }
                Type::String => {
                    self.emit(Instruction::Call(None, "__data_read_str".to_string()));
                    self.emit(Instruction::Ld(Operand::Reg16(Reg16::De), Operand::Label(label)));
                    self.runtime.request("mem_copy_str");
                    self.emit(Instruction::Call(None, "mem_copy_str".to_string()));
                }
            }
        }
        Ok(())
    }

    fn generate_restore(&mut self, target: Option<&crate::ast::LineTarget>, position: Position) -> Result<(), Diagnostic> {
        let label = match target {
            Some(target) => {
                let line = self.resolve_line_target(target, position)?;
                self.data_line_labels
                    .get(&line)
                    .cloned()
                    .ok_or_else(|| Diagnostic::fatal(position, DiagnosticKind::RangeError, format!("line {line} has no DATA to restore to")))?
            }
            None => "__data_values".to_string(),
        };
        self.emit(Instruction::Ld(Operand::Reg16(Reg16::Hl), Operand::Label(label)));
        self.emit(Instruction::Ld(Operand::IndirectLabel("__data_cursor".to_string()), Operand::Reg16(Reg16::Hl)));
        Ok(())
    }

    /// Resolves a `GOTO`/`GOSUB`/`RESTORE` target to its line number. Both
    /// cases were already validated at the end of parsing (`parser::parse`),
    /// so a named target's alias is always present here.
    fn resolve_line_target(&self, target: &crate::ast::LineTarget, position: Position) -> Result<u16, Diagnostic> {
        match target {
            crate::ast::LineTarget::Number(n) => Ok(*n),
            crate::ast::LineTarget::Name(name) => self.symtab.alias_target(name).ok_or_else(|| {
                Diagnostic::fatal(position, DiagnosticKind::UnresolvedLabel, format!("label '{name}' does not exist"))
            }),
        }
    }
}
