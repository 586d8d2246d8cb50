//! BSL Token Definitions
//!
//! This crate provides the shared token definitions used by the BSL scanner
//! and parser: the token classification, the literal value payload, and the
//! bilingual (English/Russian) keyword, directive and preprocessor tables.
//!
//! All table lookups are case-insensitive. Both spellings of an entry map to
//! the same enumerant, so the rest of the toolchain never has to care which
//! language a module was written in.

use std::fmt;
use std::sync::Arc;

pub use bigdecimal::BigDecimal;

mod tables;

pub use tables::{Directive, Keyword, PrepInstruction, PrepSymbol};

/// Token produced by the scanner.
///
/// Stores the token kind, original source text, and the decoded literal
/// value. The text is kept in an `Arc<str>` so buffered tokens can be cloned
/// cheaply.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Token classification for parser decision making
    pub kind: TokenKind,
    /// Original source text, original case preserved
    pub text: Arc<str>,
    /// Decoded literal value, if the token carries one
    pub value: TokenValue,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, text: impl Into<Arc<str>>, value: TokenValue) -> Self {
        Token { kind, text: text.into(), value }
    }
}

/// Token classification for BSL parsing.
///
/// Three historically separate enumerations (plain tokens, keywords,
/// compilation directives, preprocessor instructions) are merged into one
/// comparison domain: the parser only ever compares a single `TokenKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ===== Literals =====
    /// Identifier: `Сумма`, `Amount`
    Ident,
    /// Number literal: `42`, `3.14`
    Number,
    /// Closed string literal: `"текст"`
    String,
    /// Date literal: `'20190101'`
    DateTime,
    /// Opening fragment of a multi-line string (terminated by a newline)
    StringBeg,
    /// `|`-continuation fragment terminated by a newline
    StringMid,
    /// `|`-continuation fragment closed by `"`
    StringEnd,

    // ===== Operators =====
    /// Equality / assignment: `=`
    Eql,
    /// Inequality: `<>`
    Neq,
    /// Less than: `<`
    Lss,
    /// Greater than: `>`
    Gtr,
    /// Less than or equal: `<=`
    Leq,
    /// Greater than or equal: `>=`
    Geq,
    /// Addition: `+`
    Add,
    /// Subtraction: `-`
    Sub,
    /// Multiplication: `*`
    Mul,
    /// Division: `/`
    Div,
    /// Modulo: `%`
    Mod,

    // ===== Delimiters =====
    /// Left parenthesis: `(`
    LParen,
    /// Right parenthesis: `)`
    RParen,
    /// Left bracket: `[`
    LBrack,
    /// Right bracket: `]`
    RBrack,
    /// Ternary operator head: `?`
    Ternary,
    /// List separator: `,`
    Comma,
    /// Member access: `.`
    Period,
    /// Label terminator: `:`
    Colon,
    /// Statement terminator: `;`
    Semicolon,

    // ===== Special =====
    /// End of input
    Eof,
    /// Comment token (never emitted by the scanner; comments are captured
    /// into the module's comment map instead)
    Comment,
    /// Label: `~Метка`
    Label,
    /// `&`-annotation whose name is not a known compilation directive
    UnknownDirective,

    // ===== Merged sub-enumerations =====
    /// Reserved keyword (bilingual)
    Keyword(Keyword),
    /// Known compilation directive: `&НаКлиенте`, `&AtServer`, ...
    Directive(Directive),
    /// Preprocessor instruction: `#Если`, `#Region`, ...
    Prep(PrepInstruction),
}

impl TokenKind {
    /// `+` or `-`
    pub fn is_add_op(self) -> bool {
        matches!(self, TokenKind::Add | TokenKind::Sub)
    }

    /// `*`, `/` or `%`
    pub fn is_mul_op(self) -> bool {
        matches!(self, TokenKind::Mul | TokenKind::Div | TokenKind::Mod)
    }

    /// `=`, `<>`, `<`, `>`, `<=` or `>=`
    pub fn is_rel_op(self) -> bool {
        matches!(
            self,
            TokenKind::Eql
                | TokenKind::Neq
                | TokenKind::Lss
                | TokenKind::Gtr
                | TokenKind::Leq
                | TokenKind::Geq
        )
    }

    /// Literal of a primitive type other than a string fragment.
    pub fn is_basic_lit_no_string(self) -> bool {
        matches!(
            self,
            TokenKind::Number
                | TokenKind::DateTime
                | TokenKind::Keyword(Keyword::True)
                | TokenKind::Keyword(Keyword::False)
                | TokenKind::Keyword(Keyword::Undefined)
                | TokenKind::Keyword(Keyword::Null)
        )
    }

    /// Can this token open an expression? Used to decide whether an argument
    /// position or a `Raise` operand is present.
    pub fn begins_expression(self) -> bool {
        matches!(
            self,
            TokenKind::Add
                | TokenKind::Sub
                | TokenKind::Ident
                | TokenKind::LParen
                | TokenKind::Number
                | TokenKind::String
                | TokenKind::StringBeg
                | TokenKind::DateTime
                | TokenKind::Ternary
                | TokenKind::Keyword(Keyword::Not)
                | TokenKind::Keyword(Keyword::New)
                | TokenKind::Keyword(Keyword::True)
                | TokenKind::Keyword(Keyword::False)
                | TokenKind::Keyword(Keyword::Undefined)
                | TokenKind::Keyword(Keyword::Null)
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Ident => "identifier",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::DateTime => "date",
            TokenKind::StringBeg => "string fragment",
            TokenKind::StringMid => "string continuation",
            TokenKind::StringEnd => "closing string fragment",
            TokenKind::Eql => "=",
            TokenKind::Neq => "<>",
            TokenKind::Lss => "<",
            TokenKind::Gtr => ">",
            TokenKind::Leq => "<=",
            TokenKind::Geq => ">=",
            TokenKind::Add => "+",
            TokenKind::Sub => "-",
            TokenKind::Mul => "*",
            TokenKind::Div => "/",
            TokenKind::Mod => "%",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrack => "[",
            TokenKind::RBrack => "]",
            TokenKind::Ternary => "?",
            TokenKind::Comma => ",",
            TokenKind::Period => ".",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Eof => "end of source",
            TokenKind::Comment => "comment",
            TokenKind::Label => "label",
            TokenKind::UnknownDirective => "directive",
            TokenKind::Keyword(kw) => return write!(f, "{}", kw.english()),
            TokenKind::Directive(d) => return write!(f, "&{}", d.english()),
            TokenKind::Prep(p) => return write!(f, "#{}", p.english()),
        };
        f.write_str(text)
    }
}

/// Decoded value of a literal token.
///
/// Numbers are kept as exact decimals, never floating-point: BSL numbers are
/// business-arithmetic decimals and must survive round-tripping.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TokenValue {
    /// Exact decimal value of a `Number` token
    Number(BigDecimal),
    /// Decoded text of a string fragment or date literal (doubled quotes
    /// collapsed, surrounding quotes removed)
    Str(String),
    /// `True` / `False` keyword literal
    Bool(bool),
    /// `Null` keyword literal
    Null,
    /// The token carries no value
    #[default]
    None,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keyword_lookup_is_bilingual_and_case_insensitive() {
        assert_eq!(Keyword::lookup("EndProcedure"), Some(Keyword::EndProcedure));
        assert_eq!(Keyword::lookup("КОНЕЦПРОЦЕДУРЫ"), Some(Keyword::EndProcedure));
        assert_eq!(Keyword::lookup("конецпроцедуры"), Some(Keyword::EndProcedure));
        assert_eq!(Keyword::lookup("endprocedure"), Some(Keyword::EndProcedure));
        assert_eq!(Keyword::lookup("NotAKeyword"), None);
    }

    #[test]
    fn null_has_no_russian_twin() {
        assert_eq!(Keyword::lookup("Null"), Some(Keyword::Null));
        assert_eq!(Keyword::lookup("нулл"), None);
    }

    #[test]
    fn directive_lookup() {
        assert_eq!(Directive::lookup("AtServerNoContext"), Some(Directive::AtServerNoContext));
        assert_eq!(Directive::lookup("НаСервереБезКонтекста"), Some(Directive::AtServerNoContext));
        assert_eq!(Directive::lookup("Somewhere"), None);
    }

    #[test]
    fn prep_lookup() {
        assert_eq!(PrepInstruction::lookup("Region"), Some(PrepInstruction::Region));
        assert_eq!(PrepInstruction::lookup("ОБЛАСТЬ"), Some(PrepInstruction::Region));
        assert_eq!(PrepSymbol::lookup("ThinClient"), Some(PrepSymbol::ThinClient));
        assert_eq!(PrepSymbol::lookup("тонкийклиент"), Some(PrepSymbol::ThinClient));
    }

    #[test]
    fn expression_openers() {
        assert!(TokenKind::Ident.begins_expression());
        assert!(TokenKind::Keyword(Keyword::Not).begins_expression());
        assert!(TokenKind::Ternary.begins_expression());
        assert!(!TokenKind::Semicolon.begins_expression());
        assert!(!TokenKind::Keyword(Keyword::Then).begins_expression());
    }

    #[test]
    fn merged_comparison_domain() {
        // A single equality comparison spans all the sub-enumerations.
        assert_ne!(TokenKind::Keyword(Keyword::If), TokenKind::Prep(PrepInstruction::If));
        assert_ne!(TokenKind::Directive(Directive::AtClient), TokenKind::UnknownDirective);
    }
}
