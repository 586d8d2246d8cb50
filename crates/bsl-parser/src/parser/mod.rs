//! Parser core: token cursor, scope chain, and the module entry point.
//!
//! The grammar productions live in the sibling modules (`declarations`,
//! `statements`, `expressions`, `preprocessor`); this module owns the shared
//! state they drive.

use rustc_hash::FxHashMap;

use bsl_ast::{AutoDecl, ItemDecl, ItemId, Module, Place, Scope, Symbols};
use bsl_context::ModuleKind;
use bsl_lexer::Scanner;
use bsl_token::{Directive, TokenKind, TokenValue};

use crate::error::{ParseDiagnostic, ParseError, Result};

mod declarations;
mod expressions;
mod preprocessor;
mod statements;

#[cfg(test)]
mod tests;

/// Begin position of a token, remembered before consuming it so multi-token
/// spans can be closed later.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Marker {
    pos: usize,
    line: usize,
    col: usize,
}

/// Result of a successful module parse.
#[derive(Debug)]
pub struct Parsed {
    /// The module AST
    pub module: Module,
    /// Deferred findings, in source order
    pub diagnostics: Vec<ParseDiagnostic>,
}

/// Recursive-descent parser over one module's source text.
pub struct Parser<'src> {
    pub(crate) scanner: Scanner<'src>,

    // Mirror of the scanner's current token. Owned by the parser so the
    // statement sequencer can treat a just-parsed preprocessor instruction
    // as its own terminator by overwriting `tok` with a semicolon.
    pub(crate) tok: TokenKind,
    pub(crate) lit: String,
    pub(crate) val: TokenValue,

    pub(crate) symbols: Symbols,
    pub(crate) scopes: Vec<Scope>,
    pub(crate) current_scope: usize,
    pub(crate) module_scope: usize,

    /// Forward calls pending resolution, keyed by lowercased name
    pub(crate) unknown: FxHashMap<String, ItemId>,
    /// Call sites of each forward-called item
    pub(crate) callsites: FxHashMap<ItemId, Vec<Place>>,

    /// True inside a function body; decides whether `Return` takes a value
    pub(crate) is_func: bool,
    /// Module-level `Var` is no longer permitted once a method was declared
    pub(crate) allow_var: bool,
    /// Last-seen compilation directive, applied to the next declaration
    pub(crate) directive: Option<Directive>,
    /// Exported declarations in source order
    pub(crate) interface: Vec<ItemId>,

    pub(crate) diagnostics: Vec<ParseDiagnostic>,
}

impl<'src> Parser<'src> {
    /// Creates a parser for one module. The module scope is pre-populated
    /// with the global context of `kind`.
    pub fn new(src: &'src str, kind: ModuleKind) -> Self {
        let mut symbols = Symbols::new();
        let mut module_scope = Scope::new(None);
        bsl_context::fill(&mut module_scope, &mut symbols, kind);

        Parser {
            scanner: Scanner::new(src),
            tok: TokenKind::Eof,
            lit: String::new(),
            val: TokenValue::None,
            symbols,
            scopes: vec![module_scope],
            current_scope: 0,
            module_scope: 0,
            unknown: FxHashMap::default(),
            callsites: FxHashMap::default(),
            is_func: false,
            allow_var: true,
            directive: None,
            interface: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Parses the whole module. Expects the final token to be `Eof`.
    pub fn parse(mut self) -> Result<Parsed> {
        self.scan()?;
        let decls = self.parse_mod_decls()?;
        let body = self.parse_statements()?;
        self.expect(TokenKind::Eof)?;

        let auto = self.scopes[self.module_scope].auto.clone();

        // Every name still unresolved is an undeclared method; report each
        // call site, in source order.
        let mut undeclared: Vec<(Place, String)> = Vec::new();
        for (_, &item) in &self.unknown {
            let name = self.symbols.get(item).name.clone();
            if let Some(places) = self.callsites.get(&item) {
                for &place in places {
                    undeclared.push((place, name.clone()));
                }
            }
        }
        undeclared.sort_by_key(|(place, _)| (place.beg_line, place.beg_pos));

        let mut diagnostics: Vec<ParseDiagnostic> = self
            .scanner
            .take_diagnostics()
            .into_iter()
            .map(|d| ParseDiagnostic { text: d.text, line: d.line, pos: d.pos })
            .collect();
        diagnostics.extend(self.diagnostics);
        diagnostics.extend(undeclared.into_iter().map(|(place, name)| ParseDiagnostic {
            text: format!("Undeclared method \"{name}\""),
            line: place.beg_line,
            pos: place.beg_pos,
        }));

        let module = Module {
            decls,
            auto,
            body,
            interface: self.interface,
            comments: self.scanner.take_comments(),
            symbols: self.symbols,
        };

        Ok(Parsed { module, diagnostics })
    }

    // ===== Token cursor =====

    pub(crate) fn scan(&mut self) -> Result<TokenKind> {
        self.tok = self.scanner.scan()?;
        self.lit.clear();
        self.lit.push_str(self.scanner.lit());
        self.val = self.scanner.val().clone();
        Ok(self.tok)
    }

    pub(crate) fn expect(&mut self, tok: TokenKind) -> Result<()> {
        if self.tok != tok {
            return Err(self.expected(tok.to_string()));
        }
        Ok(())
    }

    pub(crate) fn expected(&self, what: impl Into<String>) -> ParseError {
        let (pos, line, _) = self.scanner.beg();
        ParseError::Expected { what: what.into(), line, pos }
    }

    /// Begin position of the current token.
    pub(crate) fn marker(&self) -> Marker {
        let (pos, line, col) = self.scanner.beg();
        Marker { pos, line, col }
    }

    /// Span of the current token.
    pub(crate) fn place(&self) -> Place {
        self.scanner.place()
    }

    /// Span from `marker` to the end of the last consumed token.
    pub(crate) fn place_from(&self, marker: Marker) -> Place {
        let (end_pos, end_line, end_col) = self.scanner.prev_end();
        Place::new(marker.pos, end_pos, marker.line, end_line, marker.col, end_col)
    }

    /// Span from `marker` to the end of the current, not yet consumed token.
    pub(crate) fn place_through(&self, marker: Marker) -> Place {
        let here = self.scanner.place();
        Place::new(marker.pos, here.end_pos, marker.line, here.end_line, marker.col, here.end_col)
    }

    // ===== Scopes =====

    pub(crate) fn open_scope(&mut self) {
        let scope = Scope::new(Some(self.current_scope));
        self.scopes.push(scope);
        self.current_scope = self.scopes.len() - 1;
    }

    pub(crate) fn close_scope(&mut self) {
        let outer = self.scopes[self.current_scope].outer.expect("closing the root scope");
        self.current_scope = outer;
    }

    pub(crate) fn scope(&mut self) -> &mut Scope {
        &mut self.scopes[self.current_scope]
    }

    /// Name lookup walking the scope chain outward. Consults the variable
    /// namespace only; methods live in their own namespace.
    pub(crate) fn find_item(&self, lower: &str) -> Option<ItemId> {
        let mut scope = Some(self.current_scope);
        while let Some(index) = scope {
            if let Some(&item) = self.scopes[index].vars.get(lower) {
                return Some(item);
            }
            scope = self.scopes[index].outer;
        }
        None
    }

    /// Commits a pending auto variable after its introducing statement was
    /// accepted.
    pub(crate) fn commit_auto(&mut self, item: ItemId) {
        let (name, place) = {
            let entry = self.symbols.get(item);
            let place = match entry.decl {
                Some(ItemDecl::Auto { place }) => place,
                _ => unreachable!("pending auto variable without an auto decl"),
            };
            (entry.name.clone(), place)
        };
        let lower = name.to_lowercase();
        let scope = self.scope();
        scope.vars.insert(lower, item);
        scope.auto.push(AutoDecl { name, item, place });
    }

    /// Consumes any run of compilation directives, remembering the last one.
    /// Unknown `&`-annotations were already reported by the scanner and are
    /// skipped without touching the remembered directive.
    pub(crate) fn consume_directives(&mut self) -> Result<()> {
        loop {
            match self.tok {
                TokenKind::Directive(d) => {
                    self.directive = Some(d);
                    self.scan()?;
                }
                TokenKind::UnknownDirective => {
                    self.scan()?;
                }
                _ => break,
            }
        }
        Ok(())
    }
}
