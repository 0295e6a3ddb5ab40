//! Recursive-descent statement parser. Builds the AST and populates the
//! symbol table in the same pass; `GOTO`/`GOSUB`/`THEN`/`RESTORE` targets
//! are collected and checked against the final line-number set once the
//! whole program has been parsed, since they may name a line that has not
//! been seen yet.

mod expr;

use crate::ast::*;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Position};
use crate::lexer::{Keyword, Punct, Token, TokenKind};
use crate::symtab::SymbolTable;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    symtab: SymbolTable,
    pending_labels: Vec<String>,
    forward_refs: Vec<(LineTarget, Position)>,
}

pub fn parse(tokens: Vec<Token>) -> Result<(Program, SymbolTable), Diagnostic> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        symtab: SymbolTable::new(),
        pending_labels: Vec::new(),
        forward_refs: Vec::new(),
    };
    let program = parser.parse_program()?;
    for (target, position) in &parser.forward_refs {
        match target {
            LineTarget::Number(n) => parser.symtab.check_target(*n, *position)?,
            LineTarget::Name(name) => {
                if parser.symtab.alias_target(name).is_none() {
                    return Err(Diagnostic::fatal(
                        *position,
                        DiagnosticKind::UnresolvedLabel,
                        format!("label '{name}' does not exist"),
                    ));
                }
            }
        }
    }
    Ok((program, parser.symtab))
}

impl Parser {
    fn peek_kind(&self) -> TokenKind {
        self.tokens[self.pos].kind.clone()
    }

    fn peek_kind_at(&self, idx: usize) -> TokenKind {
        let idx = idx.min(self.tokens.len() - 1);
        self.tokens[idx].kind.clone()
    }

    fn current_position(&self) -> Position {
        self.tokens[self.pos].position
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn at_line_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::EndOfLine | TokenKind::EndOfFile)
    }

    fn check_punct(&self, p: Punct) -> bool {
        matches!(self.peek_kind(), TokenKind::Punct(pp) if pp == p)
    }

    fn eat_punct(&mut self, p: Punct) -> bool {
        if self.check_punct(p) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, p: Punct) -> Result<(), Diagnostic> {
        if self.eat_punct(p) {
            Ok(())
        } else {
            Err(self.syntax_error(format!("expected '{p:?}'")))
        }
    }

    fn check_keyword(&self, k: Keyword) -> bool {
        matches!(self.peek_kind(), TokenKind::Keyword(kk) if kk == k)
    }

    fn eat_keyword(&mut self, k: Keyword) -> bool {
        if self.check_keyword(k) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, k: Keyword) -> Result<(), Diagnostic> {
        if self.eat_keyword(k) {
            Ok(())
        } else {
            Err(self.syntax_error(format!("expected keyword {k:?}")))
        }
    }

    fn syntax_error(&self, message: impl Into<String>) -> Diagnostic {
        Diagnostic::fatal(self.current_position(), DiagnosticKind::SyntaxError, message)
    }

    fn next_identifier_parts(&mut self) -> Result<(String, crate::lexer::TypeSuffix, Position), Diagnostic> {
        let token = self.tokens[self.pos].clone();
        match token.kind {
            TokenKind::Identifier { name, suffix } => {
                self.advance();
                Ok((name, suffix, token.position))
            }
            _ => Err(self.syntax_error("expected an identifier")),
        }
    }

    fn parse_variable(&mut self) -> Result<Identifier, Diagnostic> {
        let (name, suffix, position) = self.next_identifier_parts()?;
        self.symtab.declare_variable(&name, suffix, position)?;
        Ok(Identifier { name, suffix, position })
    }

    fn parse_label_name(&mut self) -> Result<String, Diagnostic> {
        let (name, _, _) = self.next_identifier_parts()?;
        Ok(name)
    }

    fn expect_line_terminator(&mut self) -> Result<(), Diagnostic> {
        match self.peek_kind() {
            TokenKind::EndOfLine => {
                self.advance();
                Ok(())
            }
            TokenKind::EndOfFile => Ok(()),
            _ => Err(self.syntax_error("expected end of line")),
        }
    }

    fn looks_like_bare_label(&self) -> bool {
        match self.peek_kind() {
            TokenKind::Keyword(Keyword::Label) => true,
            TokenKind::Identifier { .. } => {
                matches!(self.peek_kind_at(self.pos + 1), TokenKind::Punct(Punct::Colon))
            }
            _ => false,
        }
    }

    fn parse_bare_label(&mut self) -> Result<String, Diagnostic> {
        if self.eat_keyword(Keyword::Label) {
            self.parse_label_name()
        } else {
            let name = self.parse_label_name()?;
            self.expect_punct(Punct::Colon)?;
            Ok(name)
        }
    }

    fn parse_program(&mut self) -> Result<Program, Diagnostic> {
        let mut lines = Vec::new();
        loop {
            match self.peek_kind() {
                TokenKind::EndOfFile => break,
                TokenKind::EndOfLine => self.advance(),
                TokenKind::Integer(n) => {
                    let position = self.current_position();
                    if n < 0 {
                        return Err(self.syntax_error("line numbers must be non-negative"));
                    }
                    self.advance();
                    let number = n as u16;
                    self.symtab.register_line(number, position)?;
                    for name in self.pending_labels.drain(..) {
                        self.symtab.register_alias(name, number);
                    }
                    let statements = self.parse_statement_sequence()?;
                    self.expect_line_terminator()?;
                    for statement in &statements {
                        if let Statement::Label { name, .. } = statement {
                            self.symtab.register_alias(name.clone(), number);
                        }
                    }
                    lines.push(Line { number, statements, position });
                }
                _ if self.looks_like_bare_label() => {
                    let name = self.parse_bare_label()?;
                    self.pending_labels.push(name);
                    self.expect_line_terminator()?;
                }
                _ => return Err(self.syntax_error("expected a line number")),
            }
        }
        Ok(Program::from_lines(lines))
    }

    fn parse_statement_sequence(&mut self) -> Result<Vec<Statement>, Diagnostic> {
        let mut statements = Vec::new();
        loop {
            if self.at_line_end() {
                break;
            }
            statements.push(self.parse_statement()?);
            if self.eat_punct(Punct::Colon) {
                if self.at_line_end() {
                    break;
                }
                continue;
            }
            break;
        }
        Ok(statements)
    }

    fn parse_statement(&mut self) -> Result<Statement, Diagnostic> {
        let position = self.current_position();
        match self.peek_kind() {
            TokenKind::Remark(text) => {
                self.advance();
                Ok(Statement::Remark { text, position })
            }
            TokenKind::Keyword(Keyword::DefFn) => Err(Diagnostic::fatal(
                position,
                DiagnosticKind::UnsupportedFeature,
                "DEF FN is not supported",
            )),
            TokenKind::Keyword(Keyword::Let) => {
                self.advance();
                self.parse_assignment(position)
            }
            TokenKind::Keyword(Keyword::Label) => {
                self.advance();
                let name = self.parse_label_name()?;
                Ok(Statement::Label { name, position })
            }
            TokenKind::Keyword(Keyword::Cls) => {
                self.advance();
                Ok(Statement::Cls { position })
            }
            TokenKind::Keyword(Keyword::End) => {
                self.advance();
                Ok(Statement::End { position })
            }
            TokenKind::Keyword(Keyword::Goto) => {
                self.advance();
                let target = self.parse_line_target()?;
                Ok(Statement::Goto { target, position })
            }
            TokenKind::Keyword(Keyword::Gosub) => {
                self.advance();
                let target = self.parse_line_target()?;
                Ok(Statement::Gosub { target, position })
            }
            TokenKind::Keyword(Keyword::Return) => {
                self.advance();
                Ok(Statement::Return { position })
            }
            TokenKind::Keyword(Keyword::If) => self.parse_if(position),
            TokenKind::Keyword(Keyword::For) => self.parse_for(position),
            TokenKind::Keyword(Keyword::Next) => self.parse_next(position),
            TokenKind::Keyword(Keyword::While) => {
                self.advance();
                let condition = self.parse_expression()?;
                Ok(Statement::While { condition, position })
            }
            TokenKind::Keyword(Keyword::Wend) => {
                self.advance();
                Ok(Statement::Wend { position })
            }
            TokenKind::Keyword(Keyword::Print) => self.parse_print(position),
            TokenKind::Keyword(Keyword::Input) => self.parse_input(position),
            TokenKind::Keyword(Keyword::Locate) => {
                self.advance();
                let (x, y) = self.parse_xy()?;
                Ok(Statement::Locate { x, y, position })
            }
            TokenKind::Keyword(Keyword::Mode) => {
                self.advance();
                let value = self.parse_expression()?;
                Ok(Statement::Mode { value, position })
            }
            TokenKind::Keyword(Keyword::Pen) => {
                self.advance();
                let value = self.parse_expression()?;
                Ok(Statement::Pen { value, position })
            }
            TokenKind::Keyword(Keyword::Paper) => {
                self.advance();
                let value = self.parse_expression()?;
                Ok(Statement::Paper { value, position })
            }
            TokenKind::Keyword(Keyword::Plot) => {
                self.advance();
                let (x, y) = self.parse_xy()?;
                Ok(Statement::Plot { x, y, position })
            }
            TokenKind::Keyword(Keyword::Draw) => {
                self.advance();
                let (x, y) = self.parse_xy()?;
                Ok(Statement::Draw { x, y, position })
            }
            TokenKind::Keyword(Keyword::Symbol) => self.parse_symbol(position),
            TokenKind::Keyword(Keyword::Call) => {
                self.advance();
                let address = self.parse_expression()?;
                Ok(Statement::Call { address, position })
            }
            TokenKind::Keyword(Keyword::Poke) => {
                self.advance();
                let address = self.parse_expression()?;
                self.expect_punct(Punct::Comma)?;
                let value = self.parse_expression()?;
                Ok(Statement::Poke { address, value, position })
            }
            TokenKind::Keyword(Keyword::Dim) => self.parse_dim(position),
            TokenKind::Keyword(Keyword::Data) => self.parse_data(position),
            TokenKind::Keyword(Keyword::Read) => {
                self.advance();
                let mut targets = vec![self.parse_variable()?];
                while self.eat_punct(Punct::Comma) {
                    targets.push(self.parse_variable()?);
                }
                Ok(Statement::Read { targets, position })
            }
            TokenKind::Keyword(Keyword::Restore) => self.parse_restore(position),
            TokenKind::Identifier { .. }
                if matches!(self.peek_kind_at(self.pos + 1), TokenKind::Punct(Punct::Colon)) =>
            {
                let name = self.parse_label_name()?;
                Ok(Statement::Label { name, position })
            }
            TokenKind::Identifier { .. } => self.parse_assignment(position),
            _ => Err(self.syntax_error("expected a statement")),
        }
    }

    fn parse_assignment(&mut self, position: Position) -> Result<Statement, Diagnostic> {
        let target = self.parse_variable()?;
        self.expect_punct(Punct::Eq)?;
        let value = self.parse_expression()?;
        Ok(Statement::Let { target, value, position })
    }

    /// Parses a `GOTO`/`GOSUB`/`RESTORE` target: either a bare line number
    /// or a `LABEL` name, deferring resolution of both to the end-of-parse
    /// check (the name or line may not have been seen yet).
    fn parse_line_target(&mut self) -> Result<LineTarget, Diagnostic> {
        let position = self.current_position();
        let target = match self.peek_kind() {
            TokenKind::Integer(n) if n >= 0 => {
                self.advance();
                LineTarget::Number(n as u16)
            }
            TokenKind::Identifier { name, .. } => {
                self.advance();
                LineTarget::Name(name)
            }
            _ => return Err(self.syntax_error("expected a line number or label name")),
        };
        self.forward_refs.push((target.clone(), position));
        Ok(target)
    }

    fn parse_xy(&mut self) -> Result<(Expression, Expression), Diagnostic> {
        let x = self.parse_expression()?;
        self.expect_punct(Punct::Comma)?;
        let y = self.parse_expression()?;
        Ok((x, y))
    }

    fn parse_if(&mut self, position: Position) -> Result<Statement, Diagnostic> {
        self.advance();
        let condition = self.parse_expression()?;
        self.expect_keyword(Keyword::Then)?;
        let then_branch = self.parse_then_else_branch()?;
        let else_branch = if self.eat_keyword(Keyword::Else) {
            Some(self.parse_then_else_branch()?)
        } else {
            None
        };
        Ok(Statement::If { condition, then_branch, else_branch, position })
    }

    fn parse_then_else_branch(&mut self) -> Result<Vec<Statement>, Diagnostic> {
        if let TokenKind::Integer(n) = self.peek_kind() {
            let position = self.current_position();
            if n < 0 {
                return Err(self.syntax_error("line numbers must be non-negative"));
            }
            self.advance();
            let target = n as u16;
            self.forward_refs.push((LineTarget::Number(target), position));
            return Ok(vec![Statement::Goto { target: LineTarget::Number(target), position }]);
        }
        let mut statements = Vec::new();
        loop {
            if self.at_line_end() || self.check_keyword(Keyword::Else) {
                break;
            }
            statements.push(self.parse_statement()?);
            if self.eat_punct(Punct::Colon) {
                if self.at_line_end() || self.check_keyword(Keyword::Else) {
                    break;
                }
                continue;
            }
            break;
        }
        Ok(statements)
    }

    fn parse_for(&mut self, position: Position) -> Result<Statement, Diagnostic> {
        self.advance();
        let var = self.parse_variable()?;
        self.expect_punct(Punct::Eq)?;
        let start = self.parse_expression()?;
        self.expect_keyword(Keyword::To)?;
        let end = self.parse_expression()?;
        let step = if self.eat_keyword(Keyword::Step) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(Statement::For { var, start, end, step, position })
    }

    fn parse_next(&mut self, position: Position) -> Result<Statement, Diagnostic> {
        self.advance();
        let var = if matches!(self.peek_kind(), TokenKind::Identifier { .. }) {
            Some(self.parse_variable()?)
        } else {
            None
        };
        Ok(Statement::Next { var, position })
    }

    fn parse_print(&mut self, position: Position) -> Result<Statement, Diagnostic> {
        self.advance();
        let mut items = Vec::new();
        loop {
            if self.at_line_end() || self.check_punct(Punct::Colon) {
                break;
            }
            let value = self.parse_expression()?;
            let trailing_separator = if self.eat_punct(Punct::Semicolon) {
                Some(PrintSeparator::Semicolon)
            } else if self.eat_punct(Punct::Comma) {
                Some(PrintSeparator::Comma)
            } else {
                None
            };
            let has_separator = trailing_separator.is_some();
            items.push(PrintItem { value, trailing_separator });
            if !has_separator {
                break;
            }
            if self.at_line_end() || self.check_punct(Punct::Colon) {
                break;
            }
        }
        Ok(Statement::Print { items, position })
    }

    fn parse_input(&mut self, position: Position) -> Result<Statement, Diagnostic> {
        self.advance();
        let prompt = if let TokenKind::Str(text) = self.peek_kind() {
            self.advance();
            if !(self.eat_punct(Punct::Semicolon) || self.eat_punct(Punct::Comma)) {
                return Err(self.syntax_error("expected ';' or ',' after INPUT prompt"));
            }
            Some(text)
        } else {
            None
        };
        let mut targets = vec![self.parse_variable()?];
        while self.eat_punct(Punct::Comma) {
            targets.push(self.parse_variable()?);
        }
        Ok(Statement::Input { prompt, targets, position })
    }

    fn parse_symbol(&mut self, position: Position) -> Result<Statement, Diagnostic> {
        self.advance();
        let statement = if self.eat_keyword(Keyword::After) {
            let threshold = self.parse_expression()?;
            SymbolStatement::After { threshold }
        } else {
            let code = self.parse_expression()?;
            self.expect_punct(Punct::Comma)?;
            let mut rows = vec![self.parse_expression()?];
            while self.eat_punct(Punct::Comma) {
                rows.push(self.parse_expression()?);
            }
            SymbolStatement::Define { code, rows }
        };
        Ok(Statement::Symbol { statement, position })
    }

    fn parse_dim(&mut self, position: Position) -> Result<Statement, Diagnostic> {
        self.advance();
        let target = self.parse_variable()?;
        self.expect_punct(Punct::LParen)?;
        let size_position = self.current_position();
        let size = match self.peek_kind() {
            TokenKind::Integer(n) if n > 0 => {
                self.advance();
                n as u16
            }
            _ => {
                return Err(Diagnostic::fatal(
                    size_position,
                    DiagnosticKind::UnsupportedFeature,
                    "DIM requires a literal positive integer size",
                ))
            }
        };
        self.expect_punct(Punct::RParen)?;
        Ok(Statement::Dim { target, size, position })
    }

    fn parse_data(&mut self, position: Position) -> Result<Statement, Diagnostic> {
        self.advance();
        let mut values = vec![self.parse_data_value()?];
        while self.eat_punct(Punct::Comma) {
            values.push(self.parse_data_value()?);
        }
        Ok(Statement::Data { values, position })
    }

    fn parse_data_value(&mut self) -> Result<DataValue, Diagnostic> {
        let position = self.current_position();
        let negate = self.eat_punct(Punct::Minus);
        match self.peek_kind() {
            TokenKind::Integer(n) => {
                self.advance();
                Ok(DataValue::Integer(if negate { -n } else { n }))
            }
            TokenKind::Real(v) => {
                self.advance();
                Ok(DataValue::Real(if negate { -v } else { v }))
            }
            TokenKind::Str(s) if !negate => {
                self.advance();
                Ok(DataValue::Str(s))
            }
            _ => Err(Diagnostic::fatal(
                position,
                DiagnosticKind::SyntaxError,
                "expected a literal in DATA",
            )),
        }
    }

    fn parse_restore(&mut self, position: Position) -> Result<Statement, Diagnostic> {
        self.advance();
        let target = match self.peek_kind() {
            TokenKind::Integer(n) => {
                let target_position = self.current_position();
                if n < 0 {
                    return Err(self.syntax_error("line numbers must be non-negative"));
                }
                self.advance();
                let target = LineTarget::Number(n as u16);
                self.forward_refs.push((target.clone(), target_position));
                Some(target)
            }
            TokenKind::Identifier { name, .. } => {
                let target_position = self.current_position();
                self.advance();
                let target = LineTarget::Name(name);
                self.forward_refs.push((target.clone(), target_position));
                Some(target)
            }
            _ => None,
        };
        Ok(Statement::Restore { target, position })
    }
}
