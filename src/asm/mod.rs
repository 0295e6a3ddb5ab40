//! A small Z80 assembly text model: just enough instruction and operand
//! shapes to drive the code generator, each with a `Display` impl that
//! renders tab-separated mnemonic/operand text (spec.md §6's output
//! format), mirroring how this codebase models its other target ISA in
//! `asm/mod.rs`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg8 {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
}

impl fmt::Display for Reg8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Reg8::A => "a",
            Reg8::B => "b",
            Reg8::C => "c",
            Reg8::D => "d",
            Reg8::E => "e",
            Reg8::H => "h",
            Reg8::L => "l",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg16 {
    Af,
    Bc,
    De,
    Hl,
    Sp,
}

impl fmt::Display for Reg16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Reg16::Af => "af",
            Reg16::Bc => "bc",
            Reg16::De => "de",
            Reg16::Hl => "hl",
            Reg16::Sp => "sp",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cond {
    Z,
    Nz,
    C,
    Nc,
}

impl fmt::Display for Cond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Cond::Z => "z",
            Cond::Nz => "nz",
            Cond::C => "c",
            Cond::Nc => "nc",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Reg8(Reg8),
    Reg16(Reg16),
    /// `(hl)`, `(de)`, ...
    Indirect(Reg16),
    /// `(var_x)` — an indirect memory reference through a data-area label.
    IndirectLabel(String),
    Immediate(i32),
    /// A pre-formatted token, e.g. a firmware address spelled `&BB5A`.
    Literal(String),
    Label(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Reg8(reg) => write!(f, "{reg}"),
            Operand::Reg16(reg) => write!(f, "{reg}"),
            Operand::Indirect(reg) => write!(f, "({reg})"),
            Operand::IndirectLabel(label) => write!(f, "({label})"),
            Operand::Immediate(value) => write!(f, "{value}"),
            Operand::Literal(text) => f.write_str(text),
            Operand::Label(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Org(u16),
    Label(String),
    Comment(String),
    Ld(Operand, Operand),
    Push(Reg16),
    Pop(Reg16),
    Add(Operand, Operand),
    Sub(Operand),
    Inc(Operand),
    Dec(Operand),
    Cp(Operand),
    Or(Operand),
    And(Operand),
    Xor(Operand),
    Cpl,
    Ex(Operand, Operand),
    Jp(Option<Cond>, String),
    Jr(Option<Cond>, String),
    Call(Option<Cond>, String),
    Ret(Option<Cond>),
    Defb(Vec<String>),
    Defw(Vec<String>),
    Defs(u16),
    /// An already-formatted line, used for hand-written runtime library
    /// bodies that are cheaper to keep as text than to model.
    Raw(String),
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Instruction::Org(addr) => format!("\torg\t&{addr:04X}"),
            Instruction::Label(name) => format!("{name}:"),
            Instruction::Comment(text) => format!("\t; {text}"),
            Instruction::Ld(dst, src) => format!("\tld\t{dst},\t{src}"),
            Instruction::Push(reg) => format!("\tpush\t{reg}"),
            Instruction::Pop(reg) => format!("\tpop\t{reg}"),
            Instruction::Add(dst, src) => format!("\tadd\t{dst},\t{src}"),
            Instruction::Sub(src) => format!("\tsub\t{src}"),
            Instruction::Inc(op) => format!("\tinc\t{op}"),
            Instruction::Dec(op) => format!("\tdec\t{op}"),
            Instruction::Cp(op) => format!("\tcp\t{op}"),
            Instruction::Or(op) => format!("\tor\t{op}"),
            Instruction::And(op) => format!("\tand\t{op}"),
            Instruction::Xor(op) => format!("\txor\t{op}"),
            Instruction::Cpl => "\tcpl".to_string(),
            Instruction::Ex(a, b) => format!("\tex\t{a},\t{b}"),
            Instruction::Jp(None, target) => format!("\tjp\t{target}"),
            Instruction::Jp(Some(cond), target) => format!("\tjp\t{cond},\t{target}"),
            Instruction::Jr(None, target) => format!("\tjr\t{target}"),
            Instruction::Jr(Some(cond), target) => format!("\tjr\t{cond},\t{target}"),
            Instruction::Call(None, target) => format!("\tcall\t{target}"),
            Instruction::Call(Some(cond), target) => format!("\tcall\t{cond},\t{target}"),
            Instruction::Ret(None) => "\tret".to_string(),
            Instruction::Ret(Some(cond)) => format!("\tret\t{cond}"),
            Instruction::Defb(values) => format!("\tdb\t{}", values.join(", ")),
            Instruction::Defw(values) => format!("\tdw\t{}", values.join(", ")),
            Instruction::Defs(size) => format!("\tdefs\t{size}"),
            Instruction::Raw(text) => text.clone(),
        };
        f.write_str(&text)
    }
}

/// Firmware ROM entry points referenced by the generated code, addressed
/// as bare hex literals per CPC convention (spec.md §4.5/§6).
pub mod firmware {
    pub const TXT_OUTPUT: &str = "&BB5A";
    pub const TXT_STR_SELECT: &str = "&BBB4";
    pub const SCR_SET_MODE: &str = "&BC0E";
    pub const TXT_SET_PEN: &str = "&BB90";
    pub const TXT_SET_PAPER: &str = "&BB96";
    pub const GRA_PLOT_ABSOLUTE: &str = "&BBEA";
    pub const GRA_LINE_ABSOLUTE: &str = "&BBFC";
    pub const SCR_SET_INK: &str = "&BC32";
    pub const KM_WAIT_CHAR: &str = "&BB06";
    pub const KM_READ_CHAR: &str = "&BB09";
    pub const TXT_CUR_OFF: &str = "&BB81";
    pub const SCR_CHAR_POSITION: &str = "&BC1D";
    pub const SYMBOL_DEFINE: &str = "&BBCF";
    pub const SYMBOL_AFTER: &str = "&BBC9";
}
