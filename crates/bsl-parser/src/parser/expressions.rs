//! Expression parsing: precedence climbing plus identifier resolution.

use bsl_ast::{
    Args, BasicLitExpr, BinaryExpr, Expr, FieldExpr, IdentExpr, IndexExpr, ItemDecl, ItemId,
    NewExpr, NotExpr, ParenExpr, StringExpr, TailItem, TernaryExpr, UnaryExpr,
};
use bsl_token::{Keyword, TokenKind};

use crate::error::Result;

use super::Parser;

impl Parser<'_> {
    /// `and_expr { "Or" and_expr }` — the lowest precedence tier.
    pub(crate) fn parse_expression(&mut self) -> Result<Expr> {
        let marker = self.marker();
        let mut expr = self.parse_and_expr()?;
        while self.tok == TokenKind::Keyword(Keyword::Or) {
            let operator = self.tok;
            self.scan()?;
            expr = Expr::Binary(Box::new(BinaryExpr {
                left: expr,
                operator,
                right: self.parse_and_expr()?,
                place: self.place_from(marker),
            }));
        }
        Ok(expr)
    }

    fn parse_and_expr(&mut self) -> Result<Expr> {
        let marker = self.marker();
        let mut expr = self.parse_not_expr()?;
        while self.tok == TokenKind::Keyword(Keyword::And) {
            let operator = self.tok;
            self.scan()?;
            expr = Expr::Binary(Box::new(BinaryExpr {
                left: expr,
                operator,
                right: self.parse_not_expr()?,
                place: self.place_from(marker),
            }));
        }
        Ok(expr)
    }

    fn parse_not_expr(&mut self) -> Result<Expr> {
        let marker = self.marker();
        if self.tok == TokenKind::Keyword(Keyword::Not) {
            self.scan()?;
            let expr = self.parse_rel_expr()?;
            return Ok(Expr::Not(Box::new(NotExpr { expr, place: self.place_from(marker) })));
        }
        self.parse_rel_expr()
    }

    fn parse_rel_expr(&mut self) -> Result<Expr> {
        let marker = self.marker();
        let mut expr = self.parse_add_expr()?;
        while self.tok.is_rel_op() {
            let operator = self.tok;
            self.scan()?;
            expr = Expr::Binary(Box::new(BinaryExpr {
                left: expr,
                operator,
                right: self.parse_add_expr()?,
                place: self.place_from(marker),
            }));
        }
        Ok(expr)
    }

    fn parse_add_expr(&mut self) -> Result<Expr> {
        let marker = self.marker();
        let mut expr = self.parse_mul_expr()?;
        while self.tok.is_add_op() {
            let operator = self.tok;
            self.scan()?;
            expr = Expr::Binary(Box::new(BinaryExpr {
                left: expr,
                operator,
                right: self.parse_mul_expr()?,
                place: self.place_from(marker),
            }));
        }
        Ok(expr)
    }

    fn parse_mul_expr(&mut self) -> Result<Expr> {
        let marker = self.marker();
        let mut expr = self.parse_unary_expr()?;
        while self.tok.is_mul_op() {
            let operator = self.tok;
            self.scan()?;
            expr = Expr::Binary(Box::new(BinaryExpr {
                left: expr,
                operator,
                right: self.parse_unary_expr()?,
                place: self.place_from(marker),
            }));
        }
        Ok(expr)
    }

    pub(crate) fn parse_unary_expr(&mut self) -> Result<Expr> {
        let marker = self.marker();
        if self.tok.is_add_op() {
            let operator = self.tok;
            self.scan()?;
            let operand = self.parse_operand()?;
            return Ok(Expr::Unary(Box::new(UnaryExpr {
                operator,
                operand,
                place: self.place_from(marker),
            })));
        }
        self.parse_operand()
    }

    fn parse_operand(&mut self) -> Result<Expr> {
        match self.tok {
            TokenKind::String | TokenKind::StringBeg => self.parse_string_expr(),
            tok if tok.is_basic_lit_no_string() => {
                let expr = Expr::Basic(BasicLitExpr {
                    kind: self.tok,
                    value: self.val.clone(),
                    place: self.place(),
                });
                self.scan()?;
                Ok(expr)
            }
            TokenKind::Ident => {
                let (expr, _, _) = self.parse_ident_expr(false)?;
                Ok(Expr::Ident(Box::new(expr)))
            }
            TokenKind::LParen => self.parse_paren_expr(),
            TokenKind::Ternary => self.parse_ternary_expr(),
            TokenKind::Keyword(Keyword::New) => self.parse_new_expr(),
            _ => Err(self.expected("operand")),
        }
    }

    /// Adjacent string fragments fold into a single `StringExpr`: repeated
    /// closed strings concatenate, and a `StringBeg` opens a multi-line
    /// group that must close with `StringEnd` via zero or more `StringMid`.
    fn parse_string_expr(&mut self) -> Result<Expr> {
        let marker = self.marker();
        let mut list = Vec::new();
        loop {
            match self.tok {
                TokenKind::String => {
                    list.push(self.basic_lit_here());
                    while self.scan()? == TokenKind::String {
                        list.push(self.basic_lit_here());
                    }
                }
                TokenKind::StringBeg => {
                    list.push(self.basic_lit_here());
                    while self.scan()? == TokenKind::StringMid {
                        list.push(self.basic_lit_here());
                    }
                    if self.tok != TokenKind::StringEnd {
                        return Err(self.expected("\""));
                    }
                    list.push(self.basic_lit_here());
                    self.scan()?;
                }
                _ => break,
            }
        }
        Ok(Expr::String(StringExpr { list, place: self.place_from(marker) }))
    }

    fn basic_lit_here(&self) -> BasicLitExpr {
        BasicLitExpr { kind: self.tok, value: self.val.clone(), place: self.place() }
    }

    /// `"New" [ IDENT ] [ "(" [ args ] ")" ]` — at least one of the type
    /// name and the argument list must be present.
    fn parse_new_expr(&mut self) -> Result<Expr> {
        let marker = self.marker();
        let mut name = None;
        let mut args: Option<Args> = None;
        if self.scan()? == TokenKind::Ident {
            name = Some(self.lit.clone());
            args = Some(Vec::new());
            self.scan()?;
        }
        if self.tok == TokenKind::LParen {
            if self.scan()? != TokenKind::RParen {
                args = Some(self.parse_arguments()?);
                self.expect(TokenKind::RParen)?;
            }
            self.scan()?;
        }
        if name.is_none() && args.is_none() {
            return Err(self.expected("constructor"));
        }
        Ok(Expr::New(Box::new(NewExpr {
            name,
            args: args.unwrap_or_default(),
            place: self.place_from(marker),
        })))
    }

    /// An identifier reference, resolved against the scope chain.
    ///
    /// Returns the expression, the pending auto variable when the name was
    /// unknown and `allow_new_var` permitted introducing it (the caller
    /// commits it once the statement is accepted), and whether the whole
    /// chain ends as a call.
    pub(crate) fn parse_ident_expr(
        &mut self,
        allow_new_var: bool,
    ) -> Result<(IdentExpr, Option<ItemId>, bool)> {
        let marker = self.marker();
        let name = self.lit.clone();
        let auto_place = self.place();
        let mut new_var = None;

        let (head, args, tail, call) = if self.scan()? == TokenKind::LParen {
            // A call: resolve in the method namespace, or park the name in
            // the forward-call table until its declaration shows up.
            let args = if self.scan()? == TokenKind::RParen {
                Vec::new()
            } else {
                self.parse_arguments()?
            };
            self.expect(TokenKind::RParen)?;
            self.scan()?;

            let lower = name.to_lowercase();
            let head = match self.scopes[self.module_scope].methods.get(&lower) {
                Some(&item) => item,
                None => match self.unknown.get(&lower) {
                    Some(&item) => {
                        self.callsites.entry(item).or_default().push(auto_place);
                        item
                    }
                    None => {
                        let item = self.symbols.alloc(name.clone());
                        self.unknown.insert(lower, item);
                        self.callsites.insert(item, vec![auto_place]);
                        item
                    }
                },
            };
            let (tail, call) = self.parse_tail(true)?;
            (head, Some(args), tail, call)
        } else {
            let (tail, call) = self.parse_tail(false)?;
            let allow_new_var = allow_new_var && tail.is_empty();
            let head = match self.find_item(&name.to_lowercase()) {
                Some(item) => item,
                None if allow_new_var => {
                    let item = self
                        .symbols
                        .alloc_with(name.clone(), Some(ItemDecl::Auto { place: auto_place }));
                    new_var = Some(item);
                    item
                }
                // an undeclared global: an item with no declaration
                None => self.symbols.alloc(name.clone()),
            };
            (head, None, tail, call)
        };

        let expr = IdentExpr { head, args, tail, place: self.place_from(marker) };
        Ok((expr, new_var, call))
    }

    /// `{ "." member [ "(" args ")" ] | "[" expression "]" }`
    ///
    /// After a period any ident-shaped token is accepted, reserved keywords
    /// included: member names inhabit a separate namespace.
    pub(crate) fn parse_tail(&mut self, mut call: bool) -> Result<(Vec<TailItem>, bool)> {
        let mut tail = Vec::new();
        loop {
            match self.tok {
                TokenKind::Period => {
                    let marker = self.marker();
                    self.scan()?;
                    if !matches!(self.tok, TokenKind::Ident | TokenKind::Keyword(_)) {
                        self.expect(TokenKind::Ident)?;
                    }
                    let name = self.lit.clone();
                    let args = if self.scan()? == TokenKind::LParen {
                        let args = if self.scan()? == TokenKind::RParen {
                            Vec::new()
                        } else {
                            self.parse_arguments()?
                        };
                        self.expect(TokenKind::RParen)?;
                        self.scan()?;
                        call = true;
                        Some(args)
                    } else {
                        call = false;
                        None
                    };
                    tail.push(TailItem::Field(FieldExpr {
                        name,
                        args,
                        place: self.place_from(marker),
                    }));
                }
                TokenKind::LBrack => {
                    let marker = self.marker();
                    call = false;
                    if self.scan()? == TokenKind::RBrack {
                        return Err(self.expected("expression"));
                    }
                    let expr = self.parse_expression()?;
                    self.expect(TokenKind::RBrack)?;
                    self.scan()?;
                    tail.push(TailItem::Index(IndexExpr {
                        expr,
                        place: self.place_from(marker),
                    }));
                }
                _ => break,
            }
        }
        Ok((tail, call))
    }

    /// Comma-separated arguments; an empty position yields `None`.
    pub(crate) fn parse_arguments(&mut self) -> Result<Args> {
        let mut list = Vec::new();
        loop {
            if self.tok.begins_expression() {
                list.push(Some(self.parse_expression()?));
            } else {
                list.push(None);
            }
            if self.tok == TokenKind::Comma {
                self.scan()?;
            } else {
                break;
            }
        }
        Ok(list)
    }

    /// `"?" "(" expression "," expression "," expression ")"` with an
    /// optional tail chain on the result.
    fn parse_ternary_expr(&mut self) -> Result<Expr> {
        let marker = self.marker();
        self.scan()?;
        self.expect(TokenKind::LParen)?;
        self.scan()?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::Comma)?;
        self.scan()?;
        let then_expr = self.parse_expression()?;
        self.expect(TokenKind::Comma)?;
        self.scan()?;
        let else_expr = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        let tail = if self.scan()? == TokenKind::Period {
            let (tail, _) = self.parse_tail(false)?;
            tail
        } else {
            Vec::new()
        };
        Ok(Expr::Ternary(Box::new(TernaryExpr {
            cond,
            then_expr,
            else_expr,
            tail,
            place: self.place_from(marker),
        })))
    }

    fn parse_paren_expr(&mut self) -> Result<Expr> {
        let marker = self.marker();
        self.scan()?;
        let expr = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        self.scan()?;
        Ok(Expr::Paren(Box::new(ParenExpr { expr, place: self.place_from(marker) })))
    }
}
