//! `basc`: an ahead-of-time compiler from a Locomotive BASIC subset to
//! Z80 assembly for the Amstrad CPC.
//!
//! The pipeline is the usual front-to-back shape: [`reader`] normalizes
//! the source bytes, [`lexer`] tokenizes them, [`parser`] builds the
//! [`ast`] and [`symtab::SymbolTable`] in one pass, and [`codegen`] lowers
//! the result to [`asm`] text backed by the [`runtime`] support library.

pub mod ast;
pub mod asm;
pub mod codegen;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod mbf;
pub mod parser;
pub mod reader;
pub mod runtime;
pub mod symtab;
pub mod types;

use std::path::Path;

use diagnostics::Diagnostic;
use error::CompileResult;
use reader::SourceReader;

/// Compiles the BASIC source text `source` to Z80 assembly text, using
/// `org` as the CODE AREA's start address. Returns the assembly text
/// alongside any non-fatal warnings collected during code generation.
pub fn compile(source: &str, org: u16) -> CompileResult<(String, Vec<Diagnostic>)> {
    let tokens = lexer::Lexer::new(source).lex()?;
    let (program, mut symtab) = parser::parse(tokens)?;
    let (asm, warnings) = codegen::generate(&program, &mut symtab, org)?;
    Ok((asm, warnings))
}

/// Reads `path`, compiles it, and returns the generated assembly text
/// alongside any non-fatal warnings.
pub fn compile_file(path: &Path, org: u16) -> CompileResult<(String, Vec<Diagnostic>)> {
    let reader = SourceReader::read(path)?;
    compile(reader.text(), org)
}
