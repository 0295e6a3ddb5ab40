//! The code generator: walks a [`Program`] and a frozen [`SymbolTable`]
//! and lowers them to Z80 assembly text laid out in the three areas
//! spec.md §5 describes — CODE AREA, LIBRARY AREA, DATA AREA.
//!
//! Statement lowering lives in [`statements`], expression lowering and
//! the bottom-up type inference that drives it live in [`expressions`];
//! both are `impl CodeGenerator` blocks in their own files rather than
//! free functions, the same split this codebase uses for its other
//! backend.

mod expressions;
mod statements;

use std::collections::HashMap;

use crate::ast::{DataValue, Identifier, Program, Statement};
use crate::diagnostics::{Diagnostic, DiagnosticKind, Position};
use crate::mbf;
use crate::runtime::RuntimeCatalog;
use crate::symtab::SymbolTable;
use crate::types::Type;

use crate::asm::{Instruction, Operand, Reg16};

/// An open `FOR`/`NEXT` or `WHILE`/`WEND` nesting level, tracked so `NEXT`
/// and `WEND` can be matched against the loop they actually close
/// (invariant: loop constructs nest like parentheses, spec.md §4.5).
enum LoopFrame {
    For {
        var: Identifier,
        head: String,
        test: String,
        end: String,
        position: Position,
    },
    While {
        head: String,
        end: String,
        position: Position,
    },
}

pub struct CodeGenerator<'a> {
    symtab: &'a mut SymbolTable,
    org: u16,
    code: Vec<Instruction>,
    data: Vec<Instruction>,
    runtime: RuntimeCatalog,
    loops: Vec<LoopFrame>,
    counter: usize,
    data_line_labels: HashMap<u16, String>,
    warnings: Vec<Diagnostic>,
}

/// Compiles `program` to Z80 assembly text, starting the CODE AREA at
/// `org`. Returns the assembly alongside any non-fatal diagnostics
/// collected along the way (e.g. implicit real-to-integer truncation,
/// spec.md §4.7).
pub fn generate(program: &Program, symtab: &mut SymbolTable, org: u16) -> Result<(String, Vec<Diagnostic>), Diagnostic> {
    let mut gen = CodeGenerator {
        symtab,
        org,
        code: Vec::new(),
        data: Vec::new(),
        runtime: RuntimeCatalog::new(),
        loops: Vec::new(),
        counter: 0,
        data_line_labels: HashMap::new(),
        warnings: Vec::new(),
    };
    gen.generate_program(program)?;
    Ok((gen.render(), gen.warnings))
}

impl<'a> CodeGenerator<'a> {
    fn emit(&mut self, instruction: Instruction) {
        self.code.push(instruction);
    }

    fn fresh_label(&mut self, prefix: &str) -> String {
        let label = format!("__{prefix}_{}", self.counter);
        self.counter += 1;
        label
    }

    /// Stages a real literal's MBF5 encoding into the DATA AREA, returning
    /// the label it was written under.
    fn intern_real(&mut self, value: f64) -> String {
        let label = self.symtab.fresh_temp_label();
        let bytes = mbf::encode(value);
        self.data.push(Instruction::Label(label.clone()));
        self.data
            .push(Instruction::Defb(bytes.iter().map(|b| format!("&{b:02X}")).collect()));
        label
    }

    /// Stages a string literal into the DATA AREA as a length-prefixed,
    /// `&00`-terminated buffer (spec.md §5's string representation).
    fn intern_string(&mut self, value: &str) -> String {
        let label = self.symtab.fresh_temp_label();
        let mut bytes = vec![format!("&{:02X}", value.len().min(255))];
        bytes.extend(value.bytes().map(|b| format!("&{b:02X}")));
        bytes.push("&00".to_string());
        self.data.push(Instruction::Label(label.clone()));
        self.data.push(Instruction::Defb(bytes));
        label
    }

    /// Flattens every `DATA` statement in source order into one tagged
    /// byte stream in the DATA AREA, recording a label at the start of
    /// each line that contributes to it so `RESTORE <line>` can jump the
    /// read cursor there directly (spec.md §4.5).
    fn generate_data_area(&mut self, program: &Program) {
        self.data.push(Instruction::Label("__data_values".to_string()));
        for line in program.lines() {
            let mut labeled = false;
            for statement in &line.statements {
                let Statement::Data { values, .. } = statement else { continue };
                if !labeled {
                    let label = format!("__data_at_line_{}", line.number);
                    self.data.push(Instruction::Label(label.clone()));
                    self.data_line_labels.insert(line.number, label);
                    labeled = true;
                }
                for value in values {
                    match value {
                        DataValue::Integer(v) => {
                            self.data.push(Instruction::Defb(vec!["&00".to_string()]));
                            self.data.push(Instruction::Defw(vec![v.to_string()]));
                        }
                        DataValue::Real(v) => {
                            self.data.push(Instruction::Defb(vec!["&01".to_string()]));
                            let bytes = mbf::encode(*v);
                            self.data
                                .push(Instruction::Defb(bytes.iter().map(|b| format!("&{b:02X}")).collect()));
                        }
                        DataValue::Str(s) => {
                            let mut bytes = vec!["&02".to_string(), format!("&{:02X}", s.len().min(255))];
                            bytes.extend(s.bytes().map(|b| format!("&{b:02X}")));
                            self.data.push(Instruction::Defb(bytes));
                        }
                    }
                }
            }
        }
        self.data.push(Instruction::Defb(vec!["&FF".to_string()]));
        self.data.push(Instruction::Label("__data_cursor".to_string()));
        self.data.push(Instruction::Defw(vec!["__data_values".to_string()]));
    }

    fn generate_program(&mut self, program: &Program) -> Result<(), Diagnostic> {
        self.generate_data_area(program);
        self.emit(Instruction::Org(self.org));
        self.emit_data_read_routines();
        for line in program.lines() {
            self.emit(Instruction::Label(SymbolTable::line_label(line.number)));
            for statement in &line.statements {
                self.generate_statement(statement)?;
            }
        }
        if let Some(frame) = self.loops.last() {
            let position = match frame {
                LoopFrame::For { position, .. } | LoopFrame::While { position, .. } => *position,
            };
            return Err(Diagnostic::fatal(
                position,
                DiagnosticKind::NestingError,
                "FOR or WHILE is never closed before the program ends",
            ));
        }
        self.emit_variable_reservations();
        Ok(())
    }

    /// `READ` knows its target's type statically, so each of these skips
    /// exactly the tag byte its caller already expects rather than
    /// branching on a tag read at runtime.
    fn emit_data_read_routines(&mut self) {
        self.emit(Instruction::Raw(
            "\
__data_read_int:\n\
\tld\thl,(__data_cursor)\n\
\tinc\thl\n\
\tld\te,(hl)\n\
\tinc\thl\n\
\tld\td,(hl)\n\
\tinc\thl\n\
\tld\t(__data_cursor),hl\n\
\tex\tde,hl\n\
\tret"
                .to_string(),
        ));
        self.emit(Instruction::Raw(
            "\
__data_read_real:\n\
\tld\thl,(__data_cursor)\n\
\tinc\thl\n\
\tpush\thl\n\
\tld\tde,5\n\
\tadd\thl,de\n\
\tld\t(__data_cursor),hl\n\
\tpop\thl\n\
\tret"
                .to_string(),
        ));
        self.emit(Instruction::Raw(
            "\
__data_read_str:\n\
\tld\thl,(__data_cursor)\n\
\tinc\thl\n\
\tpush\thl\n\
\tld\ta,(hl)\n\
\tld\te,a\n\
\tld\td,0\n\
\tinc\tde\n\
\tadd\thl,de\n\
\tld\t(__data_cursor),hl\n\
\tpop\thl\n\
\tret"
                .to_string(),
        ));
    }

    fn emit_variable_reservations(&mut self) {
        let reservations: Vec<(String, Type)> = self
            .symtab
            .variables()
            .filter(|(_, entry)| entry.referenced)
            .map(|(_, entry)| (entry.label.clone(), entry.ty))
            .collect();
        for (label, ty) in reservations {
            self.data.push(Instruction::Label(label));
            match ty {
                Type::Integer => self.data.push(Instruction::Defw(vec!["0".to_string()])),
                Type::Real => self.data.push(Instruction::Defs(5)),
                Type::String => self.data.push(Instruction::Defs(256)),
            }
        }
    }

    fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("; CODE AREA\n");
        for instruction in &self.code {
            out.push_str(&instruction.to_string());
            out.push('\n');
        }
        out.push_str("\n; LIBRARY AREA\n");
        if !self.runtime.is_empty() {
            out.push_str(&self.runtime.emit());
            out.push('\n');
        }
        out.push_str("\n; DATA AREA\n");
        out.push_str("strpool_cursor:\n\tdw\tstrpool\n");
        out.push_str("strpool:\n\tdefs\t2048\n");
        out.push_str("input_buffer:\n\tdefs\t256\n");
        out.push_str("mbf_zero:\n\tdb\t&00, &00, &00, &00, &00\n");
        out.push_str("mbf_one:\n\tdb\t&00, &00, &00, &00, &81\n");
        out.push_str("mbf_ten:\n\tdb\t&00, &00, &00, &20, &84\n");
        out.push_str("mbf_half:\n\tdb\t&00, &00, &00, &00, &80\n");
        out.push_str("realpool_cursor:\n\tdw\trealpool\n");
        out.push_str("realpool:\n\tdefs\t40\n");
        out.push_str("real_pa:\n\tdw\t0\n");
        out.push_str("real_pb:\n\tdw\t0\n");
        out.push_str("real_ea:\n\tdb\t0\n");
        out.push_str("real_eb:\n\tdb\t0\n");
        out.push_str("real_sa:\n\tdb\t0\n");
        out.push_str("real_sb:\n\tdb\t0\n");
        out.push_str("real_ma:\n\tdw\t0\n");
        out.push_str("real_mb:\n\tdw\t0\n");
        out.push_str("real_result_sign:\n\tdb\t0\n");
        out.push_str("real_result_exp:\n\tdb\t0\n");
        out.push_str("real_result_mant:\n\tdw\t0\n");
        out.push_str("real_div_quot:\n\tdw\t0\n");
        out.push_str("real_div_rem:\n\tdw\t0\n");
        out.push_str("real_div_divisor:\n\tdw\t0\n");
        out.push_str("real_pow_base:\n\tdw\t0\n");
        out.push_str("real_pow_acc:\n\tdw\t0\n");
        out.push_str("real_work_m:\n\tdw\t0\n");
        out.push_str("real_work_s:\n\tdb\t0\n");
        out.push_str("real_work_e:\n\tdb\t0\n");
        out.push_str("strlib_src_a:\n\tdw\t0\n");
        out.push_str("strlib_src_b:\n\tdw\t0\n");
        out.push_str("strlib_dst:\n\tdw\t0\n");
        out.push_str("strlib_chr_val:\n\tdb\t0\n");
        out.push_str("strlib_mid_ret:\n\tdw\t0\n");
        out.push_str("strlib_mid_skip:\n\tdb\t0\n");
        out.push_str("strlib_int2str_neg:\n\tdb\t0\n");
        out.push_str("strlib_int2str_ptr:\n\tdw\t0\n");
        out.push_str("strlib_int2str_buf:\n\tdefs\t7\n");
        out.push_str("strlib_hex2str_val:\n\tdw\t0\n");
        out.push_str("strlib_str2real_remain:\n\tdb\t0\n");
        out.push_str("strlib_str2real_ptr:\n\tdw\t0\n");
        out.push_str("strlib_str2real_neg:\n\tdb\t0\n");
        out.push_str("strlib_str2real_frac:\n\tdb\t0\n");
        out.push_str("strlib_str2real_fracdigits:\n\tdb\t0\n");
        out.push_str("strlib_str2real_acc:\n\tdw\t0\n");
        out.push_str("strlib_real2str_neg:\n\tdb\t0\n");
        out.push_str("strlib_real2str_abs:\n\tdw\t0\n");
        out.push_str("strlib_real2str_ipart_str:\n\tdw\t0\n");
        out.push_str("strlib_real2str_frac:\n\tdw\t0\n");
        out.push_str("strlib_real2str_fracptr:\n\tdw\t0\n");
        out.push_str("strlib_real2str_fracbuf:\n\tdefs\t4\n");
        out.push_str("strlib_real2str_digit:\n\tdb\t0\n");
        for instruction in &self.data {
            out.push_str(&instruction.to_string());
            out.push('\n');
        }
        out
    }
}

/// Evaluates an expression, pushing the left-hand side of a binary
/// operation to the stack and restoring it into `de` before combining
/// with the right-hand side in `hl` — the stack-machine discipline
/// spec.md §4.5 describes for a register set too small to hold both
/// operands of a nested expression at once.
fn push_hl(gen: &mut CodeGenerator) {
    gen.emit(Instruction::Push(Reg16::Hl));
}

fn pop_de(gen: &mut CodeGenerator) {
    gen.emit(Instruction::Pop(Reg16::De));
}

fn load_indirect_label(gen: &mut CodeGenerator, label: &str) {
    gen.emit(Instruction::Ld(Operand::Reg16(Reg16::Hl), Operand::IndirectLabel(label.to_string())));
}
