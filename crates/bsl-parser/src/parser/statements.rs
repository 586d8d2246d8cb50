//! Statement parsing.

use bsl_ast::{
    AssignStmt, BreakStmt, CallStmt, ContinueStmt, ElsIfStmt, ElseStmt, ExceptStmt, ExecuteStmt,
    ForEachStmt, ForStmt, GotoStmt, IfStmt, LabelStmt, RaiseStmt, ReturnStmt, Stmt, TryStmt,
    WhileStmt,
};
use bsl_token::{Keyword, TokenKind};

use crate::error::{ParseError, Result};

use super::{Marker, Parser};

impl Parser<'_> {
    /// A statement sequence. Stray semicolons are skipped; preprocessor
    /// instructions act as their own statement terminators.
    pub(crate) fn parse_statements(&mut self) -> Result<Vec<Stmt>> {
        let mut statements = Vec::new();
        if let Some(stmt) = self.parse_stmt()? {
            statements.push(stmt);
        }
        loop {
            if self.tok == TokenKind::Semicolon {
                self.scan()?;
            } else if !matches!(self.tok, TokenKind::Prep(_)) {
                break;
            }
            if let Some(stmt) = self.parse_stmt()? {
                statements.push(stmt);
            }
        }
        Ok(statements)
    }

    /// Dispatches on the first token. Returns `None` when the current token
    /// opens no statement.
    fn parse_stmt(&mut self) -> Result<Option<Stmt>> {
        let stmt = match self.tok {
            TokenKind::Ident => Some(self.parse_assign_or_call_stmt()?),
            TokenKind::Keyword(Keyword::If) => Some(Stmt::If(Box::new(self.parse_if_stmt()?))),
            TokenKind::Keyword(Keyword::Try) => Some(Stmt::Try(Box::new(self.parse_try_stmt()?))),
            TokenKind::Keyword(Keyword::While) => {
                Some(Stmt::While(Box::new(self.parse_while_stmt()?)))
            }
            TokenKind::Keyword(Keyword::For) => {
                let marker = self.marker();
                if self.scan()? == TokenKind::Keyword(Keyword::Each) {
                    Some(Stmt::ForEach(Box::new(self.parse_for_each_stmt(marker)?)))
                } else {
                    Some(Stmt::For(Box::new(self.parse_for_stmt(marker)?)))
                }
            }
            TokenKind::Keyword(Keyword::Return) => Some(Stmt::Return(self.parse_return_stmt()?)),
            TokenKind::Keyword(Keyword::Break) => {
                let marker = self.marker();
                self.scan()?;
                Some(Stmt::Break(BreakStmt { place: self.place_from(marker) }))
            }
            TokenKind::Keyword(Keyword::Continue) => {
                let marker = self.marker();
                self.scan()?;
                Some(Stmt::Continue(ContinueStmt { place: self.place_from(marker) }))
            }
            TokenKind::Keyword(Keyword::Raise) => Some(Stmt::Raise(self.parse_raise_stmt()?)),
            TokenKind::Keyword(Keyword::Execute) => {
                Some(Stmt::Execute(self.parse_execute_stmt()?))
            }
            TokenKind::Keyword(Keyword::Goto) => Some(Stmt::Goto(self.parse_goto_stmt()?)),
            TokenKind::Label => Some(Stmt::Label(self.parse_label_stmt()?)),
            TokenKind::Prep(inst) => Some(Stmt::Prep(self.parse_prep_inst(inst)?)),
            _ => None,
        };
        Ok(stmt)
    }

    /// An identifier either calls a method or opens an assignment. The left
    /// side of an assignment may introduce a new auto variable, committed
    /// only once the whole statement is accepted.
    fn parse_assign_or_call_stmt(&mut self) -> Result<Stmt> {
        let marker = self.marker();
        let (left, new_var, call) = self.parse_ident_expr(true)?;
        if call {
            return Ok(Stmt::Call(Box::new(CallStmt {
                ident: left,
                place: self.place_from(marker),
            })));
        }
        self.expect(TokenKind::Eql)?;
        self.scan()?;
        let right = self.parse_expression()?;
        if let Some(item) = new_var {
            self.commit_auto(item);
        }
        Ok(Stmt::Assign(Box::new(AssignStmt { left, right, place: self.place_from(marker) })))
    }

    fn parse_if_stmt(&mut self) -> Result<IfStmt> {
        let marker = self.marker();
        self.scan()?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::Keyword(Keyword::Then))?;
        self.scan()?;
        let then_part = self.parse_statements()?;

        let mut elsifs = None;
        if self.tok == TokenKind::Keyword(Keyword::ElsIf) {
            let mut list = Vec::new();
            while self.tok == TokenKind::Keyword(Keyword::ElsIf) {
                list.push(self.parse_elsif_stmt()?);
            }
            elsifs = Some(list);
        }
        let else_part = if self.tok == TokenKind::Keyword(Keyword::Else) {
            Some(self.parse_else_stmt()?)
        } else {
            None
        };

        self.expect(TokenKind::Keyword(Keyword::EndIf))?;
        self.scan()?;
        Ok(IfStmt { cond, then_part, elsifs, else_part, place: self.place_from(marker) })
    }

    fn parse_elsif_stmt(&mut self) -> Result<ElsIfStmt> {
        let marker = self.marker();
        self.scan()?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::Keyword(Keyword::Then))?;
        self.scan()?;
        let then_part = self.parse_statements()?;
        Ok(ElsIfStmt { cond, then_part, place: self.place_from(marker) })
    }

    fn parse_else_stmt(&mut self) -> Result<ElseStmt> {
        let marker = self.marker();
        self.scan()?;
        Ok(ElseStmt { body: self.parse_statements()?, place: self.place_from(marker) })
    }

    fn parse_try_stmt(&mut self) -> Result<TryStmt> {
        let marker = self.marker();
        self.scan()?;
        let body = self.parse_statements()?;
        self.expect(TokenKind::Keyword(Keyword::Except))?;
        let except = self.parse_except_stmt()?;
        self.expect(TokenKind::Keyword(Keyword::EndTry))?;
        self.scan()?;
        Ok(TryStmt { body, except, place: self.place_from(marker) })
    }

    fn parse_except_stmt(&mut self) -> Result<ExceptStmt> {
        let marker = self.marker();
        self.scan()?;
        Ok(ExceptStmt { body: self.parse_statements()?, place: self.place_from(marker) })
    }

    fn parse_while_stmt(&mut self) -> Result<WhileStmt> {
        let marker = self.marker();
        self.scan()?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::Keyword(Keyword::Do))?;
        self.scan()?;
        let body = self.parse_statements()?;
        self.expect(TokenKind::Keyword(Keyword::EndDo))?;
        self.scan()?;
        Ok(WhileStmt { cond, body, place: self.place_from(marker) })
    }

    /// `For` is already consumed; `marker` points at it.
    fn parse_for_stmt(&mut self, marker: Marker) -> Result<ForStmt> {
        self.expect(TokenKind::Ident)?;
        let var_marker = self.marker();
        let (ident, new_var, call) = self.parse_ident_expr(true)?;
        if call {
            return Err(expected_variable(var_marker));
        }
        self.expect(TokenKind::Eql)?;
        self.scan()?;
        let from = self.parse_expression()?;
        self.expect(TokenKind::Keyword(Keyword::To))?;
        self.scan()?;
        let to = self.parse_expression()?;
        if let Some(item) = new_var {
            self.commit_auto(item);
        }
        self.expect(TokenKind::Keyword(Keyword::Do))?;
        self.scan()?;
        let body = self.parse_statements()?;
        self.expect(TokenKind::Keyword(Keyword::EndDo))?;
        self.scan()?;
        Ok(ForStmt { ident, from, to, body, place: self.place_from(marker) })
    }

    /// `For Each` is already consumed up to `Each`; `marker` points at `For`.
    fn parse_for_each_stmt(&mut self, marker: Marker) -> Result<ForEachStmt> {
        self.scan()?;
        self.expect(TokenKind::Ident)?;
        let var_marker = self.marker();
        let (ident, new_var, call) = self.parse_ident_expr(true)?;
        if call {
            return Err(expected_variable(var_marker));
        }
        self.expect(TokenKind::Keyword(Keyword::In))?;
        self.scan()?;
        let collection = self.parse_expression()?;
        if let Some(item) = new_var {
            self.commit_auto(item);
        }
        self.expect(TokenKind::Keyword(Keyword::Do))?;
        self.scan()?;
        let body = self.parse_statements()?;
        self.expect(TokenKind::Keyword(Keyword::EndDo))?;
        self.scan()?;
        Ok(ForEachStmt { ident, collection, body, place: self.place_from(marker) })
    }

    fn parse_return_stmt(&mut self) -> Result<ReturnStmt> {
        let marker = self.marker();
        self.scan()?;
        let expr = if self.is_func { Some(self.parse_expression()?) } else { None };
        Ok(ReturnStmt { expr, place: self.place_from(marker) })
    }

    fn parse_raise_stmt(&mut self) -> Result<RaiseStmt> {
        let marker = self.marker();
        let expr = if self.scan()?.begins_expression() {
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(RaiseStmt { expr, place: self.place_from(marker) })
    }

    fn parse_execute_stmt(&mut self) -> Result<ExecuteStmt> {
        let marker = self.marker();
        self.scan()?;
        Ok(ExecuteStmt { expr: self.parse_expression()?, place: self.place_from(marker) })
    }

    fn parse_goto_stmt(&mut self) -> Result<GotoStmt> {
        let marker = self.marker();
        self.scan()?;
        self.expect(TokenKind::Label)?;
        let label = self.lit.clone();
        self.scan()?;
        Ok(GotoStmt { label, place: self.place_from(marker) })
    }

    fn parse_label_stmt(&mut self) -> Result<LabelStmt> {
        let marker = self.marker();
        let label = self.lit.clone();
        self.scan()?;
        self.expect(TokenKind::Colon)?;
        // the colon terminates the statement; sequence like after a semicolon
        self.tok = TokenKind::Semicolon;
        Ok(LabelStmt { label, place: self.place_through(marker) })
    }
}

/// The loop variable position held a call.
fn expected_variable(marker: Marker) -> ParseError {
    ParseError::Expected { what: "variable".to_string(), line: marker.line, pos: marker.pos }
}
