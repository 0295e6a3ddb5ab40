//! Precedence-climbing expression parser. The chain of mutually recursive
//! functions below *is* the precedence table from spec.md §4.3, lowest to
//! highest: XOR, OR, AND, NOT, comparisons, `+ -`, MOD, `* /`, unary `-`,
//! `^`, primary. This is deliberately not a generic Pratt parser — the
//! BASIC precedence order (unary minus binding looser than `^`) doesn't fit
//! one uniform climb.

use super::Parser;
use crate::ast::{BinaryOp, BuiltinFunction, Expression, UnaryOp};
use crate::diagnostics::Diagnostic;
use crate::lexer::{Keyword, Punct, TokenKind};

impl Parser {
    pub(super) fn parse_expression(&mut self) -> Result<Expression, Diagnostic> {
        self.parse_xor()
    }

    fn parse_xor(&mut self) -> Result<Expression, Diagnostic> {
        let mut left = self.parse_or()?;
        while self.check_keyword(Keyword::Xor) {
            let position = self.current_position();
            self.advance();
            let right = self.parse_or()?;
            left = Expression::Binary { op: BinaryOp::Xor, lhs: Box::new(left), rhs: Box::new(right), position };
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expression, Diagnostic> {
        let mut left = self.parse_and()?;
        while self.check_keyword(Keyword::Or) {
            let position = self.current_position();
            self.advance();
            let right = self.parse_and()?;
            left = Expression::Binary { op: BinaryOp::Or, lhs: Box::new(left), rhs: Box::new(right), position };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expression, Diagnostic> {
        let mut left = self.parse_not()?;
        while self.check_keyword(Keyword::And) {
            let position = self.current_position();
            self.advance();
            let right = self.parse_not()?;
            left = Expression::Binary { op: BinaryOp::And, lhs: Box::new(left), rhs: Box::new(right), position };
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expression, Diagnostic> {
        if self.check_keyword(Keyword::Not) {
            let position = self.current_position();
            self.advance();
            let operand = self.parse_not()?;
            return Ok(Expression::Unary { op: UnaryOp::Not, operand: Box::new(operand), position });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expression, Diagnostic> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Punct(Punct::Eq) => BinaryOp::Eq,
                TokenKind::Punct(Punct::Ne) => BinaryOp::Ne,
                TokenKind::Punct(Punct::Lt) => BinaryOp::Lt,
                TokenKind::Punct(Punct::Le) => BinaryOp::Le,
                TokenKind::Punct(Punct::Gt) => BinaryOp::Gt,
                TokenKind::Punct(Punct::Ge) => BinaryOp::Ge,
                _ => break,
            };
            let position = self.current_position();
            self.advance();
            let right = self.parse_additive()?;
            left = Expression::Binary { op, lhs: Box::new(left), rhs: Box::new(right), position };
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expression, Diagnostic> {
        let mut left = self.parse_mod()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Punct(Punct::Plus) => BinaryOp::Add,
                TokenKind::Punct(Punct::Minus) => BinaryOp::Sub,
                _ => break,
            };
            let position = self.current_position();
            self.advance();
            let right = self.parse_mod()?;
            left = Expression::Binary { op, lhs: Box::new(left), rhs: Box::new(right), position };
        }
        Ok(left)
    }

    fn parse_mod(&mut self) -> Result<Expression, Diagnostic> {
        let mut left = self.parse_multiplicative()?;
        while self.check_keyword(Keyword::Mod) {
            let position = self.current_position();
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expression::Binary { op: BinaryOp::Mod, lhs: Box::new(left), rhs: Box::new(right), position };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expression, Diagnostic> {
        let mut left = self.parse_unary_minus()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Punct(Punct::Star) => BinaryOp::Mul,
                TokenKind::Punct(Punct::Slash) => BinaryOp::Div,
                _ => break,
            };
            let position = self.current_position();
            self.advance();
            let right = self.parse_unary_minus()?;
            left = Expression::Binary { op, lhs: Box::new(left), rhs: Box::new(right), position };
        }
        Ok(left)
    }

    /// Binds looser than `^`, so `-2^2` parses as `-(2^2)`.
    fn parse_unary_minus(&mut self) -> Result<Expression, Diagnostic> {
        if self.check_punct(Punct::Minus) {
            let position = self.current_position();
            self.advance();
            let operand = self.parse_unary_minus()?;
            return Ok(Expression::Unary { op: UnaryOp::Neg, operand: Box::new(operand), position });
        }
        self.parse_power()
    }

    /// Right-associative; the exponent may itself carry a leading `-`.
    fn parse_power(&mut self) -> Result<Expression, Diagnostic> {
        let base = self.parse_primary()?;
        if self.check_punct(Punct::Caret) {
            let position = self.current_position();
            self.advance();
            let exponent = self.parse_unary_minus()?;
            return Ok(Expression::Binary { op: BinaryOp::Pow, lhs: Box::new(base), rhs: Box::new(exponent), position });
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expression, Diagnostic> {
        let position = self.current_position();
        match self.peek_kind() {
            TokenKind::Integer(value) => {
                self.advance();
                Ok(Expression::Integer { value, position })
            }
            TokenKind::Real(value) => {
                self.advance();
                Ok(Expression::Real { value, position })
            }
            TokenKind::Str(value) => {
                self.advance();
                Ok(Expression::Str { value, position })
            }
            TokenKind::Punct(Punct::LParen) => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect_punct(Punct::RParen)?;
                Ok(Expression::Group { inner: Box::new(inner), position })
            }
            TokenKind::Identifier { name, suffix } => {
                self.advance();
                self.symtab.declare_variable(&name, suffix, position)?;
                Ok(Expression::Variable { name, suffix, position })
            }
            TokenKind::Keyword(keyword) if builtin_function_for(keyword).is_some() => {
                let function = builtin_function_for(keyword).unwrap();
                self.advance();
                self.expect_punct(Punct::LParen)?;
                let mut args = Vec::new();
                if !self.check_punct(Punct::RParen) {
                    args.push(self.parse_expression()?);
                    while self.eat_punct(Punct::Comma) {
                        args.push(self.parse_expression()?);
                    }
                }
                self.expect_punct(Punct::RParen)?;
                Ok(Expression::Call { function, args, position })
            }
            _ => Err(self.syntax_error("expected an expression")),
        }
    }
}

fn builtin_function_for(keyword: Keyword) -> Option<BuiltinFunction> {
    Some(match keyword {
        Keyword::Abs => BuiltinFunction::Abs,
        Keyword::Asc => BuiltinFunction::Asc,
        Keyword::Chr => BuiltinFunction::Chr,
        Keyword::Hex => BuiltinFunction::Hex,
        Keyword::Inkey => BuiltinFunction::Inkey,
        Keyword::Int => BuiltinFunction::Int,
        Keyword::Len => BuiltinFunction::Len,
        Keyword::Left => BuiltinFunction::Left,
        Keyword::Mid => BuiltinFunction::Mid,
        Keyword::Peek => BuiltinFunction::Peek,
        Keyword::Right => BuiltinFunction::Right,
        Keyword::Str => BuiltinFunction::Str,
        Keyword::Val => BuiltinFunction::Val,
        _ => return None,
    })
}
