//! Expression lowering and the bottom-up type inference that drives it
//! (spec.md §4.4: a node's type is never known until its operands are,
//! so inference runs during code generation rather than as a separate
//! pass).
//!
//! Every lowered expression leaves its value in `hl`: a signed 16-bit
//! integer, the address of a 5-byte MBF real, or the address of a
//! length-prefixed string buffer.

use super::{load_indirect_label, pop_de, push_hl, CodeGenerator};
use crate::ast::{BinaryOp, BuiltinFunction, Expression, UnaryOp};
use crate::asm::{Cond, Instruction, Operand, Reg16, Reg8};
use crate::diagnostics::{Diagnostic, DiagnosticKind, Position};
use crate::symtab::SymbolTable;
use crate::types::{widen_arithmetic, Type};

/// The fixed return type of each built-in function, independent of its
/// argument's type (spec.md §6) — a scope simplification recorded in
/// DESIGN.md rather than tracking e.g. `ABS` preserving its operand's
/// type.
fn builtin_return_type(function: BuiltinFunction) -> Type {
    match function {
        BuiltinFunction::Abs => Type::Real,
        BuiltinFunction::Asc => Type::Integer,
        BuiltinFunction::Chr => Type::String,
        BuiltinFunction::Hex => Type::String,
        BuiltinFunction::Inkey => Type::String,
        BuiltinFunction::Int => Type::Integer,
        BuiltinFunction::Len => Type::Integer,
        BuiltinFunction::Left => Type::String,
        BuiltinFunction::Mid => Type::String,
        BuiltinFunction::Peek => Type::Integer,
        BuiltinFunction::Right => Type::String,
        BuiltinFunction::Str => Type::String,
        BuiltinFunction::Val => Type::Real,
    }
}

fn builtin_routine(function: BuiltinFunction) -> Option<&'static str> {
    Some(match function {
        BuiltinFunction::Asc => "strlib_asc",
        BuiltinFunction::Chr => "strlib_chr",
        BuiltinFunction::Hex => "strlib_hex2str",
        BuiltinFunction::Len => "strlib_len",
        BuiltinFunction::Left => "strlib_left",
        BuiltinFunction::Mid => "strlib_mid",
        BuiltinFunction::Right => "strlib_right",
        BuiltinFunction::Str => "strlib_int2str",
        BuiltinFunction::Val => "strlib_str2real",
        BuiltinFunction::Abs | BuiltinFunction::Inkey | BuiltinFunction::Int | BuiltinFunction::Peek => return None,
    })
}

pub(super) fn infer_type(expr: &Expression, symtab: &SymbolTable) -> Result<Type, Diagnostic> {
    match expr {
        Expression::Integer { .. } => Ok(Type::Integer),
        Expression::Real { .. } => Ok(Type::Real),
        Expression::Str { .. } => Ok(Type::String),
        Expression::Variable { name, .. } => Ok(symtab
            .variable(name)
            .expect("variable must have been declared during parsing")
            .ty),
        Expression::Unary { op, operand, position } => {
            let ty = infer_type(operand, symtab)?;
            if ty == Type::String {
                return Err(Diagnostic::fatal(
                    *position,
                    DiagnosticKind::TypeError,
                    "cannot apply a unary operator to a string",
                ));
            }
            match op {
                UnaryOp::Neg => Ok(ty),
                UnaryOp::Not => Ok(Type::Integer),
            }
        }
        Expression::Binary { op, lhs, rhs, position } => {
            let lhs_ty = infer_type(lhs, symtab)?;
            let rhs_ty = infer_type(rhs, symtab)?;
            let merged = widen_arithmetic(lhs_ty, rhs_ty, op.is_string_concatenable(), *position)?;
            Ok(if op.is_comparison() { Type::Integer } else { merged })
        }
        Expression::Call { function, args, .. } => {
            for arg in args {
                infer_type(arg, symtab)?;
            }
            Ok(builtin_return_type(*function))
        }
        Expression::Group { inner, .. } => infer_type(inner, symtab),
    }
}

impl<'a> CodeGenerator<'a> {
    pub(super) fn generate_expression(&mut self, expr: &Expression) -> Result<Type, Diagnostic> {
        match expr {
            Expression::Integer { value, .. } => {
                self.emit(Instruction::Ld(Operand::Reg16(Reg16::Hl), Operand::Immediate(*value as i32)));
                Ok(Type::Integer)
            }
            Expression::Real { value, .. } => {
                let label = self.intern_real(*value);
                self.emit(Instruction::Ld(Operand::Reg16(Reg16::Hl), Operand::Label(label)));
                Ok(Type::Real)
            }
            Expression::Str { value, .. } => {
                let label = self.intern_string(value);
                self.emit(Instruction::Ld(Operand::Reg16(Reg16::Hl), Operand::Label(label)));
                Ok(Type::String)
            }
            Expression::Variable { name, .. } => {
                let entry = self
                    .symtab
                    .variable(name)
                    .expect("variable must have been declared during parsing");
                let label = entry.label.clone();
                let ty = entry.ty;
                match ty {
                    Type::Integer => load_indirect_label(self, &label),
                    Type::Real | Type::String => {
                        self.emit(Instruction::Ld(Operand::Reg16(Reg16::Hl), Operand::Label(label)));
                    }
                }
                Ok(ty)
            }
            Expression::Group { inner, .. } => self.generate_expression(inner),
            Expression::Unary { op, operand, position } => self.generate_unary(*op, operand, *position),
            Expression::Binary { op, lhs, rhs, position } => self.generate_binary(*op, lhs, rhs, *position),
            Expression::Call { function, args, position } => self.generate_call(*function, args, *position),
        }
    }

    fn generate_unary(&mut self, op: UnaryOp, operand: &Expression, position: Position) -> Result<Type, Diagnostic> {
        let ty = self.generate_expression(operand)?;
        if ty == Type::String {
            return Err(Diagnostic::fatal(
                position,
                DiagnosticKind::TypeError,
                "cannot apply a unary operator to a string",
            ));
        }
        match (op, ty) {
            (UnaryOp::Neg, Type::Integer) => {
                self.emit(Instruction::Ld(Operand::Reg8(Reg8::A), Operand::Reg8(Reg8::H)));
                self.emit(Instruction::Cpl);
                self.emit(Instruction::Ld(Operand::Reg8(Reg8::H), Operand::Reg8(Reg8::A)));
                self.emit(Instruction::Ld(Operand::Reg8(Reg8::A), Operand::Reg8(Reg8::L)));
                self.emit(Instruction::Cpl);
                self.emit(Instruction::Ld(Operand::Reg8(Reg8::L), Operand::Reg8(Reg8::A)));
                self.emit(Instruction::Inc(Operand::Reg16(Reg16::Hl)));
                Ok(Type::Integer)
            }
            (UnaryOp::Neg, Type::Real) => {
                self.runtime.request("real_neg");
                self.emit(Instruction::Call(None, "real_neg".to_string()));
                Ok(Type::Real)
            }
            (UnaryOp::Not, _) => {
                self.emit(Instruction::Ld(Operand::Reg8(Reg8::A), Operand::Immediate(-1)));
                self.emit(Instruction::Xor(Operand::Reg8(Reg8::H)));
                self.emit(Instruction::Ld(Operand::Reg8(Reg8::H), Operand::Reg8(Reg8::A)));
                self.emit(Instruction::Ld(Operand::Reg8(Reg8::A), Operand::Immediate(-1)));
                self.emit(Instruction::Xor(Operand::Reg8(Reg8::L)));
                self.emit(Instruction::Ld(Operand::Reg8(Reg8::L), Operand::Reg8(Reg8::A)));
                Ok(Type::Integer)
            }
            _ => unreachable!("unary operator type was already checked"),
        }
    }

    fn generate_binary(
        &mut self,
        op: BinaryOp,
        lhs: &Expression,
        rhs: &Expression,
        position: Position,
    ) -> Result<Type, Diagnostic> {
        let lhs_ty = self.generate_expression(lhs)?;
        push_hl(self);
        let rhs_ty = self.generate_expression(rhs)?;
        pop_de(self);
        let merged = widen_arithmetic(lhs_ty, rhs_ty, op.is_string_concatenable(), position)?;

        if merged == Type::String {
            self.runtime.request("strlib_concat");
            self.emit(Instruction::Call(None, "strlib_concat".to_string()));
            return Ok(Type::String);
        }

        if merged == Type::Real {
            self.generate_real_binary(op, position)?;
            return Ok(if op.is_comparison() { Type::Integer } else { Type::Real });
        }

        self.generate_integer_binary(op, position)?;
        Ok(if op.is_comparison() { Type::Integer } else { Type::Integer })
    }

    fn generate_real_binary(&mut self, op: BinaryOp, position: Position) -> Result<(), Diagnostic> {
        if op.is_comparison() {
            return self.generate_real_comparison(op);
        }
        let routine = match op {
            BinaryOp::Add => "real_add",
            BinaryOp::Sub => "real_sub",
            BinaryOp::Mul => "real_mul",
            BinaryOp::Div => "real_div",
            BinaryOp::Pow => "real_pow",
            _ => {
                return Err(Diagnostic::fatal(
                    position,
                    DiagnosticKind::UnsupportedFeature,
                    "operator is not defined for real operands",
                ))
            }
        };
        self.runtime.request(routine);
        self.emit(Instruction::Call(None, routine.to_string()));
        Ok(())
    }

    /// `real_cmp` leaves a three-way sign (-1/0/1) in `hl`; unlike the
    /// integer path there's no carry flag to read an operator off of, so
    /// each comparison operator gets its own branch over that sign,
    /// mirroring `generate_integer_comparison`'s true/end-label shape.
    fn generate_real_comparison(&mut self, op: BinaryOp) -> Result<(), Diagnostic> {
        self.runtime.request("real_cmp");
        self.emit(Instruction::Call(None, "real_cmp".to_string()));
        let true_label = self.fresh_label("realcmp_true");
        let false_label = self.fresh_label("realcmp_false");
        let end_label = self.fresh_label("realcmp_end");
        let zero_test = "\tld\ta,h\n\tor\tl";
        match op {
            BinaryOp::Eq => {
                self.emit(Instruction::Raw(zero_test.to_string()));
                self.emit(Instruction::Jp(Some(Cond::Z), true_label.clone()));
                self.emit(Instruction::Jp(None, false_label.clone()));
            }
            BinaryOp::Ne => {
                self.emit(Instruction::Raw(zero_test.to_string()));
                self.emit(Instruction::Jp(Some(Cond::Nz), true_label.clone()));
                self.emit(Instruction::Jp(None, false_label.clone()));
            }
            BinaryOp::Lt => {
                self.emit(Instruction::Raw("\tbit\t7,h".to_string()));
                self.emit(Instruction::Jp(Some(Cond::Nz), true_label.clone()));
                self.emit(Instruction::Jp(None, false_label.clone()));
            }
            BinaryOp::Ge => {
                self.emit(Instruction::Raw("\tbit\t7,h".to_string()));
                self.emit(Instruction::Jp(Some(Cond::Z), true_label.clone()));
                self.emit(Instruction::Jp(None, false_label.clone()));
            }
            BinaryOp::Gt => {
                self.emit(Instruction::Raw("\tbit\t7,h".to_string()));
                self.emit(Instruction::Jp(Some(Cond::Nz), false_label.clone()));
                self.emit(Instruction::Raw(zero_test.to_string()));
                self.emit(Instruction::Jp(Some(Cond::Nz), true_label.clone()));
                self.emit(Instruction::Jp(None, false_label.clone()));
            }
            BinaryOp::Le => {
                self.emit(Instruction::Raw("\tbit\t7,h".to_string()));
                self.emit(Instruction::Jp(Some(Cond::Nz), true_label.clone()));
                self.emit(Instruction::Raw(zero_test.to_string()));
                self.emit(Instruction::Jp(Some(Cond::Z), true_label.clone()));
                self.emit(Instruction::Jp(None, false_label.clone()));
            }
            _ => unreachable!("non-comparison operator routed to generate_real_comparison"),
        }
        self.emit(Instruction::Label(true_label));
        self.emit(Instruction::Ld(Operand::Reg16(Reg16::Hl), Operand::Immediate(-1)));
        self.emit(Instruction::Jp(None, end_label.clone()));
        self.emit(Instruction::Label(false_label));
        self.emit(Instruction::Ld(Operand::Reg16(Reg16::Hl), Operand::Immediate(0)));
        self.emit(Instruction::Label(end_label));
        Ok(())
    }

    fn generate_integer_binary(&mut self, op: BinaryOp, position: Position) -> Result<(), Diagnostic> {
        match op {
            BinaryOp::Add => self.emit(Instruction::Add(Operand::Reg16(Reg16::Hl), Operand::Reg16(Reg16::De))),
            BinaryOp::Sub => {
                self.emit(Instruction::Ex(Operand::Reg16(Reg16::De), Operand::Reg16(Reg16::Hl)));
                self.emit(Instruction::Raw("\tor\ta".to_string()));
                self.emit(Instruction::Raw("\tsbc\thl,de".to_string()));
            }
            BinaryOp::Mod => {
                self.runtime.request("int_mod16");
                self.emit(Instruction::Call(None, "int_mod16".to_string()));
            }
            BinaryOp::Div => {
                self.runtime.request("int_div16");
                self.emit(Instruction::Call(None, "int_div16".to_string()));
            }
            BinaryOp::Mul => {
                self.runtime.request("int_mul16");
                self.emit(Instruction::Call(None, "int_mul16".to_string()));
            }
            BinaryOp::Pow => {
                return Err(Diagnostic::fatal(
                    position,
                    DiagnosticKind::UnsupportedFeature,
                    "integer ^ integer is not supported; write one operand as a real literal",
                ))
            }
            BinaryOp::And => self.emit(Instruction::Raw("\tld\ta,h\n\tand\td\n\tld\th,a\n\tld\ta,l\n\tand\te\n\tld\tl,a".to_string())),
            BinaryOp::Or => self.emit(Instruction::Raw("\tld\ta,h\n\tor\td\n\tld\th,a\n\tld\ta,l\n\tor\te\n\tld\tl,a".to_string())),
            BinaryOp::Xor => self.emit(Instruction::Raw("\tld\ta,h\n\txor\td\n\tld\th,a\n\tld\ta,l\n\txor\te\n\tld\tl,a".to_string())),
            _ if op.is_comparison() => self.generate_integer_comparison(op, position)?,
            _ => unreachable!(),
        }
        Ok(())
    }

    fn generate_integer_comparison(&mut self, op: BinaryOp, _position: Position) -> Result<(), Diagnostic> {
        let true_label = self.fresh_label("cmp_true");
        let end_label = self.fresh_label("cmp_end");
        self.emit(Instruction::Ex(Operand::Reg16(Reg16::De), Operand::Reg16(Reg16::Hl)));
        self.emit(Instruction::Raw("\tor\ta".to_string()));
        self.emit(Instruction::Raw("\tsbc\thl,de".to_string()));
        let cond = match op {
            BinaryOp::Eq => Cond::Z,
            BinaryOp::Ne => Cond::Nz,
            BinaryOp::Lt => Cond::C,
            BinaryOp::Gt => Cond::C,
            BinaryOp::Le => Cond::Z,
            BinaryOp::Ge => Cond::Nc,
            _ => unreachable!(),
        };
        // Lt/Gt/Le need the operands the right way around for a carry test;
        // re-run the subtraction in the opposite order for those three.
        if matches!(op, BinaryOp::Gt | BinaryOp::Le) {
            self.emit(Instruction::Ex(Operand::Reg16(Reg16::De), Operand::Reg16(Reg16::Hl)));
            self.emit(Instruction::Raw("\tor\ta".to_string()));
            self.emit(Instruction::Raw("\tsbc\thl,de".to_string()));
        }
        self.emit(Instruction::Jp(Some(cond), true_label.clone()));
        self.emit(Instruction::Ld(Operand::Reg16(Reg16::Hl), Operand::Immediate(0)));
        self.emit(Instruction::Jp(None, end_label.clone()));
        self.emit(Instruction::Label(true_label));
        self.emit(Instruction::Ld(Operand::Reg16(Reg16::Hl), Operand::Immediate(-1)));
        self.emit(Instruction::Label(end_label));
        Ok(())
    }

    fn generate_call(&mut self, function: BuiltinFunction, args: &[Expression], position: Position) -> Result<Type, Diagnostic> {
        match function {
            BuiltinFunction::Mid => {
                // MID$(s, start[, count]) takes two register pairs worth of
                // arguments; evaluate left to right, stacking each but the
                // last.
                for arg in &args[..args.len().saturating_sub(1)] {
                    self.generate_expression(arg)?;
                    push_hl(self);
                }
                if let Some(last) = args.last() {
                    self.generate_expression(last)?;
                }
                self.runtime.request("strlib_mid");
                self.emit(Instruction::Call(None, "strlib_mid".to_string()));
                return Ok(Type::String);
            }
            BuiltinFunction::Left | BuiltinFunction::Right => {
                self.generate_expression(&args[0])?;
                push_hl(self);
                self.generate_expression(&args[1])?;
                pop_de(self);
                self.emit(Instruction::Ex(Operand::Reg16(Reg16::De), Operand::Reg16(Reg16::Hl)));
            }
            _ => {
                for arg in args {
                    self.generate_expression(arg)?;
                }
            }
        }

        match function {
            BuiltinFunction::Abs => {
                let skip = self.fresh_label("abs_skip");
                self.emit(Instruction::Raw("\tbit\t7,h".to_string()));
                self.emit(Instruction::Jp(Some(Cond::Z), skip.clone()));
                self.emit(Instruction::Ld(Operand::Reg8(Reg8::A), Operand::Reg8(Reg8::H)));
                self.emit(Instruction::Cpl);
                self.emit(Instruction::Ld(Operand::Reg8(Reg8::H), Operand::Reg8(Reg8::A)));
                self.emit(Instruction::Ld(Operand::Reg8(Reg8::A), Operand::Reg8(Reg8::L)));
                self.emit(Instruction::Cpl);
                self.emit(Instruction::Ld(Operand::Reg8(Reg8::L), Operand::Reg8(Reg8::A)));
                self.emit(Instruction::Inc(Operand::Reg16(Reg16::Hl)));
                self.emit(Instruction::Label(skip));
            }
            BuiltinFunction::Int => {
                self.runtime.request("real_to_int");
                self.emit(Instruction::Call(None, "real_to_int".to_string()));
            }
            BuiltinFunction::Inkey => {
                self.emit(Instruction::Call(None, firmware_km_read_char()));
            }
            BuiltinFunction::Peek => {
                self.emit(Instruction::Ld(Operand::Reg8(Reg8::A), Operand::Indirect(Reg16::Hl)));
                self.emit(Instruction::Ld(Operand::Reg8(Reg8::H), Operand::Immediate(0)));
                self.emit(Instruction::Ld(Operand::Reg8(Reg8::L), Operand::Reg8(Reg8::A)));
            }
            other => {
                let routine = builtin_routine(other).ok_or_else(|| {
                    Diagnostic::fatal(position, DiagnosticKind::UnsupportedFeature, "function is not yet implemented")
                })?;
                self.runtime.request(routine);
                self.emit(Instruction::Call(None, routine.to_string()));
            }
        }
        Ok(builtin_return_type(function))
    }
}

fn firmware_km_read_char() -> String {
    crate::asm::firmware::KM_READ_CHAR.to_string()
}
