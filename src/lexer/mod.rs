//! Single-pass, hand-written lexer: character stream to token stream.
//!
//! Mirrors this codebase's existing lexer shape (a `Peekable<Chars>` cursor
//! with line/column tracking) but lexes the Locomotive BASIC subset
//! described in spec.md §4.2 instead of a word-based grammar.

mod keywords;
mod token;

pub use token::{Keyword, Punct, Token, TokenKind, TypeSuffix};

use std::iter::Peekable;
use std::str::Chars;

use crate::diagnostics::{Diagnostic, DiagnosticKind, Position};
use keywords::KEYWORDS;

pub type LexResult<T> = Result<T, Diagnostic>;

pub struct Lexer<'a> {
    tokens: Vec<Token>,
    iter: Peekable<Chars<'a>>,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            tokens: vec![],
            iter: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    pub fn lex(mut self) -> LexResult<Vec<Token>> {
        loop {
            self.eat_inline_whitespace();

            let Some(&next) = self.iter.peek() else {
                self.push(TokenKind::EndOfFile, "", self.pos());
                break;
            };

            match next {
                '\n' => self.lex_newline(),
                '"' => self.lex_string()?,
                '\'' => self.lex_rem_comment(),
                '&' => self.lex_numeric_literal()?,
                '0'..='9' => self.lex_decimal_or_real()?,
                c if is_ident_start(c) => self.lex_word(),
                _ => self.lex_punct()?,
            }
        }

        Ok(self.tokens)
    }

    fn pos(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn push(&mut self, kind: TokenKind, spelling: impl Into<String>, position: Position) {
        self.tokens.push(Token::new(kind, spelling, position));
    }

    fn advance(&mut self) -> Option<char> {
        let next = self.iter.next();
        if let Some(c) = next {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        next
    }

    fn eat_inline_whitespace(&mut self) {
        while matches!(self.iter.peek(), Some(' ') | Some('\t')) {
            self.advance();
        }
    }

    fn lex_newline(&mut self) {
        let position = self.pos();
        self.advance();
        self.push(TokenKind::EndOfLine, "\n", position);
    }

    fn lex_rem_comment(&mut self) {
        let position = self.pos();
        let text = self.take_rest_of_line();
        self.push(TokenKind::Remark(text.clone()), text, position);
    }

    fn take_rest_of_line(&mut self) -> String {
        let mut text = String::new();
        while let Some(&c) = self.iter.peek() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.advance();
        }
        text
    }

    fn lex_string(&mut self) -> LexResult<()> {
        let position = self.pos();
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.iter.peek() {
                None | Some('\n') => {
                    return Err(Diagnostic::fatal(
                        position,
                        DiagnosticKind::LexError,
                        "unterminated string literal",
                    ))
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some(&c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }
        let spelling = format!("\"{value}\"");
        self.push(TokenKind::Str(value), spelling, position);
        Ok(())
    }

    fn lex_numeric_literal(&mut self) -> LexResult<()> {
        let position = self.pos();
        self.advance(); // '&'

        match self.iter.peek() {
            Some('X') | Some('x') => {
                self.advance();
                self.lex_radix_literal(position, 2, |c| c == '0' || c == '1', "binary")
            }
            Some('H') | Some('h') => {
                self.advance();
                self.lex_radix_literal(position, 16, |c| c.is_ascii_hexdigit(), "hexadecimal")
            }
            Some(c) if c.is_ascii_hexdigit() => {
                self.lex_radix_literal(position, 16, |c| c.is_ascii_hexdigit(), "hexadecimal")
            }
            _ => Err(Diagnostic::fatal(
                position,
                DiagnosticKind::LexError,
                "expected 'X' or 'H' (or a hex digit) after '&'",
            )),
        }
    }

    fn lex_radix_literal(
        &mut self,
        position: Position,
        radix: u32,
        digit: impl Fn(char) -> bool,
        name: &str,
    ) -> LexResult<()> {
        let mut digits = String::new();
        while let Some(&c) = self.iter.peek() {
            if digit(c) {
                digits.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if digits.is_empty() {
            return Err(Diagnostic::fatal(
                position,
                DiagnosticKind::LexError,
                format!("expected {name} digits"),
            ));
        }
        let value = u32::from_str_radix(&digits, radix).map_err(|_| {
            Diagnostic::fatal(
                position,
                DiagnosticKind::RangeError,
                format!("{name} literal does not fit in 16 bits"),
            )
        })?;
        if value > 0xFFFF {
            return Err(Diagnostic::fatal(
                position,
                DiagnosticKind::RangeError,
                format!("{name} literal does not fit in 16 bits"),
            ));
        }
        let spelling = format!("&{}{digits}", if radix == 2 { "X" } else { "H" });
        self.push(TokenKind::Integer(value as u16 as i16), spelling, position);
        Ok(())
    }

    fn lex_decimal_or_real(&mut self) -> LexResult<()> {
        let position = self.pos();
        let mut text = String::new();

        while matches!(self.iter.peek(), Some(c) if c.is_ascii_digit()) {
            text.push(self.advance().unwrap());
        }

        let mut is_real = false;
        if self.iter.peek() == Some(&'.') {
            is_real = true;
            text.push(self.advance().unwrap());
            while matches!(self.iter.peek(), Some(c) if c.is_ascii_digit()) {
                text.push(self.advance().unwrap());
            }
        }

        if matches!(self.iter.peek(), Some('e') | Some('E')) {
            is_real = true;
            text.push(self.advance().unwrap());
            if matches!(self.iter.peek(), Some('+') | Some('-')) {
                text.push(self.advance().unwrap());
            }
            while matches!(self.iter.peek(), Some(c) if c.is_ascii_digit()) {
                text.push(self.advance().unwrap());
            }
        }

        if is_real {
            let value: f64 = text.parse().map_err(|_| {
                Diagnostic::fatal(position, DiagnosticKind::LexError, "malformed real literal")
            })?;
            self.push(TokenKind::Real(value), text, position);
        } else {
            let value: i64 = text.parse().map_err(|_| {
                Diagnostic::fatal(
                    position,
                    DiagnosticKind::LexError,
                    "malformed integer literal",
                )
            })?;
            if !(0..=32767).contains(&value) {
                return Err(Diagnostic::fatal(
                    position,
                    DiagnosticKind::RangeError,
                    format!("integer literal {value} does not fit in a signed 16-bit value"),
                ));
            }
            self.push(TokenKind::Integer(value as i16), text, position);
        }
        Ok(())
    }

    /// Reads a maximal alphanumeric run, then resolves it against the
    /// keyword table, trying the run plus a trailing type-suffix character
    /// first (`CHR$`, `INKEY$`, ...) so that built-in names win over
    /// reading the suffix as a variable's type tag.
    fn lex_word(&mut self) {
        let position = self.pos();
        let mut text = String::new();
        while matches!(self.iter.peek(), Some(&c) if is_ident_continue(c)) {
            text.push(self.advance().unwrap());
        }

        let upper = text.to_ascii_uppercase();

        if let Some(&suffix_char) = self.iter.peek() {
            if matches!(suffix_char, '$') {
                let candidate = format!("{upper}{suffix_char}");
                if let Some(&keyword) = KEYWORDS.get(candidate.as_str()) {
                    self.advance();
                    let spelling = format!("{text}{suffix_char}");
                    self.push(TokenKind::Keyword(keyword), spelling, position);
                    return;
                }
            }
        }

        if let Some(&keyword) = KEYWORDS.get(upper.as_str()) {
            if keyword == Keyword::Rem {
                let rest = self.take_rest_of_line();
                let full = format!("{text}{rest}");
                self.push(TokenKind::Remark(full.clone()), full, position);
                return;
            }
            self.push(TokenKind::Keyword(keyword), text, position);
            return;
        }

        let (suffix, spelling) = match self.iter.peek() {
            Some('%') => (TypeSuffix::Percent, format!("{text}%")),
            Some('!') => (TypeSuffix::Bang, format!("{text}!")),
            Some('$') => (TypeSuffix::Dollar, format!("{text}$")),
            _ => (TypeSuffix::None, text.clone()),
        };
        if !matches!(suffix, TypeSuffix::None) {
            self.advance();
        }

        self.push(
            TokenKind::Identifier {
                name: upper,
                suffix,
            },
            spelling,
            position,
        );
    }

    fn lex_punct(&mut self) -> LexResult<()> {
        let position = self.pos();
        let c = self.advance().unwrap();

        let (kind, spelling) = match c {
            '=' => (Punct::Eq, "="),
            '<' => match self.iter.peek() {
                Some('>') => {
                    self.advance();
                    (Punct::Ne, "<>")
                }
                Some('=') => {
                    self.advance();
                    (Punct::Le, "<=")
                }
                _ => (Punct::Lt, "<"),
            },
            '>' => match self.iter.peek() {
                Some('=') => {
                    self.advance();
                    (Punct::Ge, ">=")
                }
                _ => (Punct::Gt, ">"),
            },
            '+' => (Punct::Plus, "+"),
            '-' => (Punct::Minus, "-"),
            '*' => (Punct::Star, "*"),
            '/' => (Punct::Slash, "/"),
            '^' => (Punct::Caret, "^"),
            '(' => (Punct::LParen, "("),
            ')' => (Punct::RParen, ")"),
            ',' => (Punct::Comma, ","),
            ';' => (Punct::Semicolon, ";"),
            ':' => (Punct::Colon, ":"),
            other => {
                return Err(Diagnostic::fatal(
                    position,
                    DiagnosticKind::LexError,
                    format!("unexpected character '{other}'"),
                ))
            }
        };
        self.push(kind, spelling, position);
        Ok(())
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> Vec<TokenKind> {
        Lexer::new(src)
            .lex()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_line_number_and_keyword() {
        let kinds = lex("10 PRINT\n");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Integer(10),
                TokenKind::Keyword(Keyword::Print),
                TokenKind::EndOfLine,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn identifier_prefix_of_keyword_stays_identifier() {
        let kinds = lex("FORTUNE");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier {
                    name: "FORTUNE".into(),
                    suffix: TypeSuffix::None
                },
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn lexes_hex_and_binary_literals() {
        assert_eq!(lex("&HFFFF")[0], TokenKind::Integer(-1));
        assert_eq!(lex("&X1010")[0], TokenKind::Integer(10));
    }

    #[test]
    fn rejects_integer_literal_out_of_range() {
        assert!(Lexer::new("32768").lex().is_err());
        assert!(Lexer::new("32767").lex().is_ok());
    }

    #[test]
    fn lexes_type_suffixes() {
        let kinds = lex("A% B! C$");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier {
                    name: "A".into(),
                    suffix: TypeSuffix::Percent
                },
                TokenKind::Identifier {
                    name: "B".into(),
                    suffix: TypeSuffix::Bang
                },
                TokenKind::Identifier {
                    name: "C".into(),
                    suffix: TypeSuffix::Dollar
                },
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn chr_dollar_lexes_as_keyword_not_identifier_with_suffix() {
        let kinds = lex("CHR$(65)");
        assert_eq!(kinds[0], TokenKind::Keyword(Keyword::Chr));
    }

    #[test]
    fn unterminated_string_is_fatal() {
        assert!(Lexer::new("PRINT \"hello\n").lex().is_err());
    }

    #[test]
    fn rem_and_apostrophe_comments_consume_rest_of_line() {
        let kinds = lex("REM hello world\n");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Remark("REM hello world".into()),
                TokenKind::EndOfLine,
                TokenKind::EndOfFile,
            ]
        );

        let kinds = lex("' hello\n");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Remark("' hello".into()),
                TokenKind::EndOfLine,
                TokenKind::EndOfFile,
            ]
        );
    }
}
