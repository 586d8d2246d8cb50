//! Module-level declarations: variable lists, methods, parameters.

use bsl_ast::{
    Decl, FuncSign, ItemDecl, MethodDecl, ParamDecl, ProcSign, Sign, VarLocDecl, VarModDecl,
    VarModListDecl,
};
use bsl_token::{Keyword, TokenKind};

use crate::error::{ParseError, Result};

use super::Parser;

impl Parser<'_> {
    /// `{ directive } ( var_mod_list | method_decl | prep_inst ) ...`
    pub(crate) fn parse_mod_decls(&mut self) -> Result<Vec<Decl>> {
        let mut decls = Vec::new();
        self.consume_directives()?;
        loop {
            match self.tok {
                TokenKind::Keyword(Keyword::Var) => {
                    if !self.allow_var {
                        let (_, line, _) = self.scanner.beg();
                        return Err(ParseError::VarAfterMethod { line });
                    }
                    decls.push(Decl::VarModList(self.parse_var_mod_list()?));
                }
                TokenKind::Keyword(Keyword::Function) => {
                    self.is_func = true;
                    let method = self.parse_method_decl()?;
                    self.is_func = false;
                    self.allow_var = false;
                    decls.push(Decl::Method(Box::new(method)));
                }
                TokenKind::Keyword(Keyword::Procedure) => {
                    let method = self.parse_method_decl()?;
                    self.allow_var = false;
                    decls.push(Decl::Method(Box::new(method)));
                }
                TokenKind::Prep(inst) => {
                    decls.push(Decl::Prep(self.parse_prep_inst(inst)?));
                    // the instruction left a pretend semicolon in `tok`
                    self.scan()?;
                }
                _ => break,
            }
            self.directive = None;
            self.consume_directives()?;
        }
        Ok(decls)
    }

    /// `"Var" var_mod { "," var_mod } ";" { ";" }`
    fn parse_var_mod_list(&mut self) -> Result<VarModListDecl> {
        let marker = self.marker();
        self.scan()?;
        let mut list = vec![self.parse_var_mod_decl()?];
        while self.tok == TokenKind::Comma {
            self.scan()?;
            list.push(self.parse_var_mod_decl()?);
        }
        let decl =
            VarModListDecl { directive: self.directive, list, place: self.place_from(marker) };
        self.expect(TokenKind::Semicolon)?;
        self.scan()?;
        while self.tok == TokenKind::Semicolon {
            self.scan()?;
        }
        Ok(decl)
    }

    /// `IDENT [ "Export" ]`
    fn parse_var_mod_decl(&mut self) -> Result<VarModDecl> {
        let marker = self.marker();
        self.expect(TokenKind::Ident)?;
        let name = self.lit.clone();
        let lower = name.to_lowercase();

        let export = if self.scan()? == TokenKind::Keyword(Keyword::Export) {
            self.scan()?;
            true
        } else {
            false
        };

        let place = self.place_from(marker);
        if self.scopes[self.current_scope].vars.contains_key(&lower) {
            return Err(ParseError::AlreadyDeclared { name, line: marker.line });
        }
        let item =
            self.symbols.alloc_with(name.clone(), Some(ItemDecl::VarMod { export, place }));
        self.scope().vars.insert(lower, item);
        if export {
            self.interface.push(item);
        }

        Ok(VarModDecl { name, item, directive: self.directive, export, place })
    }

    /// `{ "Var" var_loc { "," var_loc } ";" }` at the top of a method body.
    pub(crate) fn parse_vars(&mut self) -> Result<Vec<VarLocDecl>> {
        let mut decls = Vec::new();
        while self.tok == TokenKind::Keyword(Keyword::Var) {
            self.scan()?;
            decls.push(self.parse_var_loc_decl()?);
            while self.tok == TokenKind::Comma {
                self.scan()?;
                decls.push(self.parse_var_loc_decl()?);
            }
            self.expect(TokenKind::Semicolon)?;
            self.scan()?;
        }
        Ok(decls)
    }

    fn parse_var_loc_decl(&mut self) -> Result<VarLocDecl> {
        let marker = self.marker();
        self.expect(TokenKind::Ident)?;
        let name = self.lit.clone();
        let lower = name.to_lowercase();
        let place = self.place();

        if self.scopes[self.current_scope].vars.contains_key(&lower) {
            return Err(ParseError::AlreadyDeclared { name, line: marker.line });
        }
        let item = self.symbols.alloc_with(name.clone(), Some(ItemDecl::VarLoc { place }));
        self.scope().vars.insert(lower, item);
        self.scan()?;

        Ok(VarLocDecl { name, item, place })
    }

    /// `("Procedure"|"Function") IDENT "(" [ params ] ")" [ "Export" ]
    ///  { var_loc_list } { stmt } ("EndProcedure"|"EndFunction")`
    fn parse_method_decl(&mut self) -> Result<MethodDecl> {
        let marker = self.marker();
        self.scan()?;
        self.expect(TokenKind::Ident)?;
        let name = self.lit.clone();
        let lower = name.to_lowercase();
        self.scan()?;

        self.open_scope();
        let params = self.parse_params()?;
        let export = if self.tok == TokenKind::Keyword(Keyword::Export) {
            self.scan()?;
            true
        } else {
            false
        };

        let sign_place = self.place_from(marker);
        let sign = if self.is_func {
            Sign::Func(FuncSign {
                name: name.clone(),
                directive: self.directive,
                params,
                export,
                place: sign_place,
            })
        } else {
            Sign::Proc(ProcSign {
                name: name.clone(),
                directive: self.directive,
                params,
                export,
                place: sign_place,
            })
        };

        // A forward-called method finally meets its declaration: patch the
        // placeholder item instead of allocating a new one.
        let decl = ItemDecl::Method { func: self.is_func, export, place: sign_place };
        let item = match self.unknown.remove(&lower) {
            Some(item) => {
                self.symbols.set_decl(item, decl);
                self.callsites.remove(&item);
                item
            }
            None => self.symbols.alloc_with(name.clone(), Some(decl)),
        };
        if self.scopes[self.module_scope].methods.contains_key(&lower) {
            return Err(ParseError::AlreadyDeclared { name, line: marker.line });
        }
        self.scopes[self.module_scope].methods.insert(lower, item);
        if export {
            self.interface.push(item);
        }

        let vars = self.parse_vars()?;
        let body = self.parse_statements()?;
        if self.is_func {
            self.expect(TokenKind::Keyword(Keyword::EndFunction))?;
        } else {
            self.expect(TokenKind::Keyword(Keyword::EndProcedure))?;
        }

        let auto = self.scopes[self.current_scope].auto.clone();
        self.close_scope();
        self.scan()?;

        Ok(MethodDecl { sign, item, vars, auto, body, place: self.place_from(marker) })
    }

    /// `"(" [ param { "," param } ] ")"`
    fn parse_params(&mut self) -> Result<Vec<ParamDecl>> {
        self.expect(TokenKind::LParen)?;
        self.scan()?;
        let mut params = Vec::new();
        if self.tok != TokenKind::RParen {
            params.push(self.parse_param_decl()?);
            while self.tok == TokenKind::Comma {
                self.scan()?;
                params.push(self.parse_param_decl()?);
            }
        }
        self.expect(TokenKind::RParen)?;
        self.scan()?;
        Ok(params)
    }

    /// `[ "Val" ] IDENT [ "=" unary_expr ]`
    fn parse_param_decl(&mut self) -> Result<ParamDecl> {
        let marker = self.marker();
        let by_val = if self.tok == TokenKind::Keyword(Keyword::Val) {
            self.scan()?;
            true
        } else {
            false
        };
        self.expect(TokenKind::Ident)?;
        let name = self.lit.clone();
        let lower = name.to_lowercase();

        let value = if self.scan()? == TokenKind::Eql {
            self.scan()?;
            Some(self.parse_unary_expr()?)
        } else {
            None
        };

        let place = self.place_from(marker);
        if self.scopes[self.current_scope].vars.contains_key(&lower) {
            return Err(ParseError::AlreadyDeclared { name, line: marker.line });
        }
        let item = self.symbols.alloc_with(name.clone(), Some(ItemDecl::Param { by_val, place }));
        self.scope().vars.insert(lower, item);

        Ok(ParamDecl { name, item, by_val, value, place })
    }
}
