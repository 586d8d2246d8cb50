//! Character-level scanner for BSL source modules.
//!
//! The scanner is coroutine-free: a single [`Scanner::scan`] call advances to
//! the next token, updating the token kind, literal text, decoded value and
//! the begin/end positions exposed through accessors. The parser drives it
//! one token at a time and never buffers.
//!
//! Comments never appear in the token stream. A `//`-comment is captured into
//! a line-indexed map ([`Scanner::take_comments`]) and the scanner loops to
//! fetch the following real token, so closing-comment checks can still find
//! every comment by line number.
//!
//! Multi-part string literals follow the source language: a string fragment
//! terminated by a line feed is a `StringBeg`, a line opening with `|`
//! continues it (`StringMid`/`StringEnd`), and a doubled `""` inside a
//! fragment collapses to a single quote in the decoded value.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

use std::str::FromStr;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use unicode_ident::{is_xid_continue, is_xid_start};

use bsl_position::{Comment, Place};
use bsl_token::{BigDecimal, Directive, Keyword, PrepInstruction, Token, TokenKind, TokenValue};

pub mod error;

pub use error::{Result, ScanDiagnostic, ScanError};

/// True for characters that may open an identifier.
fn is_ident_start(ch: char) -> bool {
    ch == '_' || is_xid_start(ch)
}

/// True for characters that may continue an identifier.
fn is_ident_continue(ch: char) -> bool {
    ch == '_' || is_xid_continue(ch)
}

/// Single-pass scanner over one module's source text.
///
/// State is the current cursor (`pos`, `line`, `col`, current char) plus the
/// last token scanned. `scan()` returns the new token kind; everything else
/// is read through accessors, mirroring how the parser consumes it.
pub struct Scanner<'src> {
    src: &'src str,
    /// Byte offset of the current character (== src.len() at end of input)
    pos: usize,
    /// Current character, None at end of input
    ch: Option<char>,
    /// 1-based line of the current character
    line: usize,
    /// 1-based column of the current character
    col: usize,

    tok: TokenKind,
    lit: String,
    val: TokenValue,

    beg_pos: usize,
    beg_line: usize,
    beg_col: usize,
    end_pos: usize,
    end_line: usize,
    end_col: usize,

    // End of the token scanned before the current one. The parser builds
    // multi-token spans from a begin marker and this end.
    prev_end_pos: usize,
    prev_end_line: usize,
    prev_end_col: usize,

    comments: FxHashMap<usize, Comment>,
    diagnostics: Vec<ScanDiagnostic>,
}

impl<'src> Scanner<'src> {
    /// Create a scanner positioned before the first token.
    pub fn new(src: &'src str) -> Self {
        Scanner {
            src,
            pos: 0,
            ch: src.chars().next(),
            line: 1,
            col: 1,
            tok: TokenKind::Eof,
            lit: String::new(),
            val: TokenValue::None,
            beg_pos: 0,
            beg_line: 1,
            beg_col: 1,
            end_pos: 0,
            end_line: 1,
            end_col: 1,
            prev_end_pos: 0,
            prev_end_line: 1,
            prev_end_col: 1,
            comments: FxHashMap::default(),
            diagnostics: Vec::new(),
        }
    }

    /// The source text being scanned.
    pub fn src(&self) -> &'src str {
        self.src
    }

    /// Kind of the current token.
    pub fn tok(&self) -> TokenKind {
        self.tok
    }

    /// Literal text of the current token (original case).
    pub fn lit(&self) -> &str {
        &self.lit
    }

    /// Decoded value of the current token.
    pub fn val(&self) -> &TokenValue {
        &self.val
    }

    /// Span of the current token.
    pub fn place(&self) -> Place {
        Place::new(
            self.beg_pos,
            self.end_pos,
            self.beg_line,
            self.end_line,
            self.beg_col,
            self.end_col,
        )
    }

    /// Begin position of the current token.
    pub fn beg(&self) -> (usize, usize, usize) {
        (self.beg_pos, self.beg_line, self.beg_col)
    }

    /// End position of the token scanned before the current one.
    pub fn prev_end(&self) -> (usize, usize, usize) {
        (self.prev_end_pos, self.prev_end_line, self.prev_end_col)
    }

    /// The current token as an owned [`Token`].
    pub fn token(&self) -> Token {
        Token::new(self.tok, Arc::<str>::from(self.lit.as_str()), self.val.clone())
    }

    /// Comments captured so far, keyed by line number.
    pub fn comments(&self) -> &FxHashMap<usize, Comment> {
        &self.comments
    }

    /// Takes ownership of the captured comment map.
    pub fn take_comments(&mut self) -> FxHashMap<usize, Comment> {
        std::mem::take(&mut self.comments)
    }

    /// Non-fatal findings recorded while scanning.
    pub fn diagnostics(&self) -> &[ScanDiagnostic] {
        &self.diagnostics
    }

    /// Takes ownership of the non-fatal findings.
    pub fn take_diagnostics(&mut self) -> Vec<ScanDiagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn bump(&mut self) {
        if let Some(c) = self.ch {
            self.pos += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
            self.ch = self.src[self.pos..].chars().next();
        }
    }

    /// Advance to the next token.
    ///
    /// On success the token is exposed through [`tok`](Self::tok),
    /// [`lit`](Self::lit), [`val`](Self::val) and the position accessors.
    /// At end of input the scanner yields [`TokenKind::Eof`] indefinitely.
    pub fn scan(&mut self) -> Result<TokenKind> {
        self.prev_end_pos = self.end_pos;
        self.prev_end_line = self.end_line;
        self.prev_end_col = self.end_col;
        self.val = TokenValue::None;

        loop {
            while matches!(self.ch, Some(c) if c.is_whitespace()) {
                self.bump();
            }

            self.beg_pos = self.pos;
            self.beg_line = self.line;
            self.beg_col = self.col;

            match self.ch {
                None => {
                    self.lit.clear();
                    self.tok = TokenKind::Eof;
                }
                Some(c) if is_ident_start(c) => self.scan_ident(),
                Some('"') => self.scan_string(false),
                Some('|') => self.scan_string(true),
                Some(c) if c.is_ascii_digit() => self.scan_number()?,
                Some('\'') => self.scan_date(),
                Some('/') => {
                    self.bump();
                    if self.ch == Some('/') {
                        self.bump();
                        self.take_comment();
                        continue;
                    }
                    self.lit = "/".to_string();
                    self.tok = TokenKind::Div;
                }
                Some('<') => {
                    self.bump();
                    self.tok = match self.ch {
                        Some('>') => {
                            self.bump();
                            TokenKind::Neq
                        }
                        Some('=') => {
                            self.bump();
                            TokenKind::Leq
                        }
                        _ => TokenKind::Lss,
                    };
                    self.lit = self.src[self.beg_pos..self.pos].to_string();
                }
                Some('>') => {
                    self.bump();
                    self.tok = match self.ch {
                        Some('=') => {
                            self.bump();
                            TokenKind::Geq
                        }
                        _ => TokenKind::Gtr,
                    };
                    self.lit = self.src[self.beg_pos..self.pos].to_string();
                }
                Some('&') => self.scan_directive()?,
                Some('#') => self.scan_prep()?,
                Some('~') => self.scan_label(),
                Some(c) => {
                    let tok = match c {
                        '=' => TokenKind::Eql,
                        '+' => TokenKind::Add,
                        '-' => TokenKind::Sub,
                        '*' => TokenKind::Mul,
                        '%' => TokenKind::Mod,
                        '(' => TokenKind::LParen,
                        ')' => TokenKind::RParen,
                        '[' => TokenKind::LBrack,
                        ']' => TokenKind::RBrack,
                        '?' => TokenKind::Ternary,
                        ',' => TokenKind::Comma,
                        '.' => TokenKind::Period,
                        ':' => TokenKind::Colon,
                        ';' => TokenKind::Semicolon,
                        _ => {
                            return Err(ScanError::UnknownChar {
                                ch: c,
                                line: self.line,
                                pos: self.pos,
                            });
                        }
                    };
                    self.lit = c.to_string();
                    self.tok = tok;
                    self.bump();
                }
            }
            break;
        }

        self.end_pos = self.pos;
        self.end_line = self.line;
        self.end_col = self.col;
        Ok(self.tok)
    }

    fn scan_ident(&mut self) {
        let beg = self.pos;
        while matches!(self.ch, Some(c) if is_ident_continue(c)) {
            self.bump();
        }
        self.lit = self.src[beg..self.pos].to_string();

        match Keyword::lookup(&self.lit) {
            Some(kw) => {
                match kw {
                    Keyword::True => self.val = TokenValue::Bool(true),
                    Keyword::False => self.val = TokenValue::Bool(false),
                    Keyword::Null => self.val = TokenValue::Null,
                    _ => {}
                }
                self.tok = TokenKind::Keyword(kw);
            }
            None => self.tok = TokenKind::Ident,
        }
    }

    /// Scans one string fragment. `continuation` is true when the opener is
    /// `|`, which scans identically to `"` but yields a Mid/End token.
    fn scan_string(&mut self, continuation: bool) {
        let beg = self.pos;
        self.scan_string_body();
        self.lit = self.src[beg..self.pos].to_string();

        let terminated = self.lit.len() > 1 && self.lit.ends_with('"');

        let inner = if terminated {
            &self.lit[1..self.lit.len() - 1]
        } else if self.lit.ends_with('\n') {
            &self.lit[1..self.lit.len() - 1]
        } else {
            // unterminated at end of input
            &self.lit[1..]
        };
        self.val = TokenValue::Str(inner.replace("\"\"", "\""));

        self.tok = match (continuation, terminated) {
            (false, true) => TokenKind::String,
            (false, false) => TokenKind::StringBeg,
            (true, true) => TokenKind::StringEnd,
            (true, false) => TokenKind::StringMid,
        };
    }

    /// Consumes one string fragment starting at the opener (`"` or `|`).
    /// Stops after the closing quote, after a terminating line feed, or at
    /// end of input.
    fn scan_string_body(&mut self) {
        loop {
            self.bump(); // opener, or the second quote of a doubled pair
            loop {
                match self.ch {
                    Some('"') | Some('\n') | None => break,
                    Some(_) => self.bump(),
                }
            }
            match self.ch {
                None => return,
                Some('\n') => {
                    self.bump();
                    return;
                }
                _ => {
                    // closing quote; a quote right after it reopens the body
                    self.bump();
                    if self.ch != Some('"') {
                        return;
                    }
                }
            }
        }
    }

    fn scan_number(&mut self) -> Result<()> {
        let beg = self.pos;
        while matches!(self.ch, Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        if self.ch == Some('.') {
            self.bump();
            while matches!(self.ch, Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
        }
        self.lit = self.src[beg..self.pos].to_string();

        let digits = self.lit.strip_suffix('.').unwrap_or(&self.lit);
        let value = BigDecimal::from_str(digits).map_err(|_| ScanError::MalformedNumber {
            lit: self.lit.clone(),
            line: self.beg_line,
            pos: beg,
        })?;
        self.val = TokenValue::Number(value);
        self.tok = TokenKind::Number;
        Ok(())
    }

    fn scan_date(&mut self) {
        let beg = self.pos;
        self.bump(); // opening quote
        loop {
            match self.ch {
                Some('\'') | Some('\n') | None => break,
                Some(_) => self.bump(),
            }
        }
        let inner = &self.src[beg + 1..self.pos];
        if self.ch == Some('\'') {
            self.bump();
        }
        self.lit = inner.to_string();
        self.val = TokenValue::Str(inner.to_string());
        self.tok = TokenKind::DateTime;
    }

    fn take_comment(&mut self) {
        let beg = self.pos;
        let line = self.line;
        let column = self.col;
        loop {
            match self.ch {
                Some('\n') | None => break,
                Some(_) => self.bump(),
            }
        }
        let text = self.src[beg..self.pos].to_string();
        self.comments.insert(line, Comment { text, pos: beg, line, column });
    }

    fn scan_directive(&mut self) -> Result<()> {
        self.bump(); // '&'
        if !matches!(self.ch, Some(c) if c.is_alphabetic()) {
            return Err(ScanError::ExpectedDirective { line: self.line, pos: self.pos });
        }
        let beg = self.pos;
        while matches!(self.ch, Some(c) if c.is_alphanumeric()) {
            self.bump();
        }
        self.lit = self.src[beg..self.pos].to_string();

        match Directive::lookup(&self.lit) {
            Some(d) => self.tok = TokenKind::Directive(d),
            None => {
                self.diagnostics.push(ScanDiagnostic {
                    text: format!("Unknown directive: \"{}\"", self.lit),
                    line: self.beg_line,
                    pos: self.beg_pos,
                });
                self.tok = TokenKind::UnknownDirective;
            }
        }
        Ok(())
    }

    fn scan_prep(&mut self) -> Result<()> {
        self.bump(); // '#'
        while matches!(self.ch, Some(c) if c.is_whitespace()) {
            self.bump();
        }
        if !matches!(self.ch, Some(c) if c.is_alphabetic()) {
            return Err(ScanError::ExpectedPrepInstruction { line: self.line, pos: self.pos });
        }
        let beg = self.pos;
        while matches!(self.ch, Some(c) if c.is_alphanumeric()) {
            self.bump();
        }
        self.lit = self.src[beg..self.pos].to_string();

        match PrepInstruction::lookup(&self.lit) {
            Some(p) => {
                self.tok = TokenKind::Prep(p);
                Ok(())
            }
            None => Err(ScanError::UnknownPrepInstruction {
                name: self.lit.clone(),
                line: self.beg_line,
                pos: self.beg_pos,
            }),
        }
    }

    fn scan_label(&mut self) {
        self.bump(); // '~'
        let beg = self.pos;
        while matches!(self.ch, Some(c) if c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        self.lit = self.src[beg..self.pos].to_string();
        self.tok = TokenKind::Label;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut scanner = Scanner::new(src);
        let mut out = Vec::new();
        loop {
            let tok = scanner.scan().expect("scan failed");
            if tok == TokenKind::Eof {
                break;
            }
            out.push(tok);
        }
        out
    }

    #[test]
    fn scans_assignment() {
        assert_eq!(
            kinds("Сумма = Сумма + 1;"),
            vec![
                TokenKind::Ident,
                TokenKind::Eql,
                TokenKind::Ident,
                TokenKind::Add,
                TokenKind::Number,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn bilingual_keywords() {
        assert_eq!(
            kinds("Если X Тогда КонецЕсли"),
            vec![
                TokenKind::Keyword(Keyword::If),
                TokenKind::Ident,
                TokenKind::Keyword(Keyword::Then),
                TokenKind::Keyword(Keyword::EndIf),
            ]
        );
        assert_eq!(kinds("if x then endif"), kinds("Если x Тогда КонецЕсли"));
    }

    #[test]
    fn boolean_values() {
        let mut s = Scanner::new("Истина Ложь Null");
        s.scan().unwrap();
        assert_eq!(*s.val(), TokenValue::Bool(true));
        s.scan().unwrap();
        assert_eq!(*s.val(), TokenValue::Bool(false));
        s.scan().unwrap();
        assert_eq!(*s.val(), TokenValue::Null);
    }

    #[test]
    fn number_is_exact_decimal() {
        let mut s = Scanner::new("10.25");
        assert_eq!(s.scan().unwrap(), TokenKind::Number);
        assert_eq!(s.lit(), "10.25");
        assert_eq!(*s.val(), TokenValue::Number(BigDecimal::from_str("10.25").unwrap()));
    }

    #[test]
    fn doubled_quotes_collapse() {
        let mut s = Scanner::new(r#""a""b""#);
        assert_eq!(s.scan().unwrap(), TokenKind::String);
        assert_eq!(s.lit(), r#""a""b""#);
        assert_eq!(*s.val(), TokenValue::Str("a\"b".to_string()));
    }

    #[test]
    fn multiline_string_fragments() {
        let src = "\"начало\n|середина\n|конец\"";
        let mut s = Scanner::new(src);
        assert_eq!(s.scan().unwrap(), TokenKind::StringBeg);
        assert_eq!(*s.val(), TokenValue::Str("начало".to_string()));
        assert_eq!(s.scan().unwrap(), TokenKind::StringMid);
        assert_eq!(*s.val(), TokenValue::Str("середина".to_string()));
        assert_eq!(s.scan().unwrap(), TokenKind::StringEnd);
        assert_eq!(*s.val(), TokenValue::Str("конец".to_string()));
        assert_eq!(s.scan().unwrap(), TokenKind::Eof);
    }

    #[test]
    fn date_literal() {
        let mut s = Scanner::new("'20190101'");
        assert_eq!(s.scan().unwrap(), TokenKind::DateTime);
        assert_eq!(s.lit(), "20190101");
        assert_eq!(*s.val(), TokenValue::Str("20190101".to_string()));
    }

    #[test]
    fn comparison_lookahead() {
        assert_eq!(
            kinds("< <= <> > >= ="),
            vec![
                TokenKind::Lss,
                TokenKind::Leq,
                TokenKind::Neq,
                TokenKind::Gtr,
                TokenKind::Geq,
                TokenKind::Eql,
            ]
        );
    }

    #[test]
    fn comments_go_to_the_map() {
        let src = "A = 1; // первый\nB = 2; // второй";
        let mut s = Scanner::new(src);
        let mut count = 0;
        while s.scan().unwrap() != TokenKind::Eof {
            count += 1;
        }
        assert_eq!(count, 8); // comments never reach the token stream
        let comments = s.take_comments();
        assert_eq!(comments[&1].text, " первый");
        assert_eq!(comments[&2].text, " второй");
        assert_eq!(comments[&1].column, 10);
    }

    #[test]
    fn known_directive() {
        let mut s = Scanner::new("&НаСервере");
        assert_eq!(s.scan().unwrap(), TokenKind::Directive(Directive::AtServer));
    }

    #[test]
    fn unknown_directive_is_non_fatal() {
        let mut s = Scanner::new("&Нигде");
        assert_eq!(s.scan().unwrap(), TokenKind::UnknownDirective);
        assert_eq!(s.diagnostics().len(), 1);
        assert!(s.diagnostics()[0].text.contains("Нигде"));
    }

    #[test]
    fn unknown_prep_instruction_is_fatal() {
        let mut s = Scanner::new("#Нечто");
        assert!(matches!(s.scan(), Err(ScanError::UnknownPrepInstruction { .. })));
    }

    #[test]
    fn prep_instruction_allows_space_after_hash() {
        let mut s = Scanner::new("# Region Public");
        assert_eq!(s.scan().unwrap(), TokenKind::Prep(PrepInstruction::Region));
    }

    #[test]
    fn label_token() {
        let mut s = Scanner::new("~Метка: Перейти ~Метка;");
        assert_eq!(s.scan().unwrap(), TokenKind::Label);
        assert_eq!(s.lit(), "Метка");
        assert_eq!(s.scan().unwrap(), TokenKind::Colon);
    }

    #[test]
    fn eof_forever() {
        let mut s = Scanner::new("");
        for _ in 0..3 {
            assert_eq!(s.scan().unwrap(), TokenKind::Eof);
        }
    }

    #[test]
    fn unknown_char_is_fatal() {
        let mut s = Scanner::new("@");
        assert!(matches!(s.scan(), Err(ScanError::UnknownChar { ch: '@', .. })));
    }

    #[test]
    fn token_places_are_ordered() {
        let mut s = Scanner::new("Перем Сумма;\nСумма = 1;");
        while s.scan().unwrap() != TokenKind::Eof {
            let place = s.place();
            assert!(place.beg_pos <= place.end_pos);
            assert!(place.beg_line <= place.end_line);
        }
    }
}
