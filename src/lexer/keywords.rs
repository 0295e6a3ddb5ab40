//! The static keyword table, built once behind `once_cell::sync::Lazy` the
//! way the rest of this codebase builds its static lookup tables.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::token::Keyword;

pub static KEYWORDS: Lazy<HashMap<&'static str, Keyword>> = Lazy::new(|| {
    use Keyword::*;
    HashMap::from([
        ("CLS", Cls),
        ("CALL", Call),
        ("DATA", Data),
        ("DIM", Dim),
        ("END", End),
        ("FOR", For),
        ("NEXT", Next),
        ("GOSUB", Gosub),
        ("GOTO", Goto),
        ("IF", If),
        ("THEN", Then),
        ("ELSE", Else),
        ("INPUT", Input),
        ("LABEL", Label),
        ("LET", Let),
        ("LOCATE", Locate),
        ("MODE", Mode),
        ("PAPER", Paper),
        ("PEN", Pen),
        ("PLOT", Plot),
        ("DRAW", Draw),
        ("POKE", Poke),
        ("PRINT", Print),
        ("READ", Read),
        ("REM", Rem),
        ("RESTORE", Restore),
        ("RETURN", Return),
        ("SYMBOL", Symbol),
        ("AFTER", After),
        ("WHILE", While),
        ("WEND", Wend),
        ("STEP", Step),
        ("TO", To),
        ("MOD", Mod),
        ("AND", And),
        ("OR", Or),
        ("XOR", Xor),
        ("NOT", Not),
        ("ABS", Abs),
        ("ASC", Asc),
        ("CHR$", Chr),
        ("HEX$", Hex),
        ("INKEY$", Inkey),
        ("INT", Int),
        ("LEN", Len),
        ("LEFT$", Left),
        ("MID$", Mid),
        ("PEEK", Peek),
        ("RIGHT$", Right),
        ("STR$", Str),
        ("VAL", Val),
        ("DEF", DefFn),
        ("FN", DefFn),
    ])
});
