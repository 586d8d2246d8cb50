//! Preprocessor instructions and expressions.
//!
//! Instructions are parsed as AST nodes but never evaluated. After building
//! an instruction the parser overwrites its current token with a semicolon,
//! so the statement sequencer treats the instruction as its own terminator
//! and carries on naturally.

use bsl_ast::{
    PrepBinaryExpr, PrepElsIfInst, PrepElseInst, PrepEndIfInst, PrepEndRegionInst, PrepExpr,
    PrepIfInst, PrepInst, PrepNotExpr, PrepParenExpr, PrepRegionInst, PrepSymExpr,
};
use bsl_token::{Keyword, PrepInstruction, PrepSymbol, TokenKind};

use crate::error::Result;

use super::Parser;

impl Parser<'_> {
    /// Parses the instruction the current `#`-token opens.
    pub(crate) fn parse_prep_inst(&mut self, inst: PrepInstruction) -> Result<PrepInst> {
        let node = match inst {
            PrepInstruction::If => {
                let marker = self.marker();
                self.scan()?;
                let cond = self.parse_prep_expression()?;
                self.expect(TokenKind::Keyword(Keyword::Then))?;
                let place = self.place_through(marker);
                PrepInst::If(PrepIfInst { cond, place })
            }
            PrepInstruction::ElsIf => {
                let marker = self.marker();
                self.scan()?;
                let cond = self.parse_prep_expression()?;
                self.expect(TokenKind::Keyword(Keyword::Then))?;
                let place = self.place_through(marker);
                PrepInst::ElsIf(PrepElsIfInst { cond, place })
            }
            PrepInstruction::Else => PrepInst::Else(PrepElseInst { place: self.place() }),
            PrepInstruction::EndIf => PrepInst::EndIf(PrepEndIfInst { place: self.place() }),
            PrepInstruction::Region => {
                let marker = self.marker();
                self.scan()?;
                self.expect(TokenKind::Ident)?;
                let name = self.lit.clone();
                let place = self.place_through(marker);
                PrepInst::Region(PrepRegionInst { name, place })
            }
            PrepInstruction::EndRegion => {
                PrepInst::EndRegion(PrepEndRegionInst { place: self.place() })
            }
        };
        // pretend the instruction ended with a semicolon
        self.tok = TokenKind::Semicolon;
        Ok(node)
    }

    fn parse_prep_expression(&mut self) -> Result<PrepExpr> {
        let marker = self.marker();
        let mut expr = self.parse_prep_and_expr()?;
        while self.tok == TokenKind::Keyword(Keyword::Or) {
            let operator = self.tok;
            self.scan()?;
            expr = PrepExpr::Binary(Box::new(PrepBinaryExpr {
                left: expr,
                operator,
                right: self.parse_prep_and_expr()?,
                place: self.place_from(marker),
            }));
        }
        Ok(expr)
    }

    fn parse_prep_and_expr(&mut self) -> Result<PrepExpr> {
        let marker = self.marker();
        let mut expr = self.parse_prep_not_expr()?;
        while self.tok == TokenKind::Keyword(Keyword::And) {
            let operator = self.tok;
            self.scan()?;
            expr = PrepExpr::Binary(Box::new(PrepBinaryExpr {
                left: expr,
                operator,
                right: self.parse_prep_not_expr()?,
                place: self.place_from(marker),
            }));
        }
        Ok(expr)
    }

    fn parse_prep_not_expr(&mut self) -> Result<PrepExpr> {
        let marker = self.marker();
        if self.tok == TokenKind::Keyword(Keyword::Not) {
            self.scan()?;
            let expr = self.parse_prep_operand()?;
            return Ok(PrepExpr::Not(Box::new(PrepNotExpr {
                expr,
                place: self.place_from(marker),
            })));
        }
        self.parse_prep_operand()
    }

    fn parse_prep_operand(&mut self) -> Result<PrepExpr> {
        match self.tok {
            TokenKind::Ident => self.parse_prep_sym_expr(),
            TokenKind::LParen => self.parse_prep_paren_expr(),
            _ => Err(self.expected("preprocessor symbol")),
        }
    }

    fn parse_prep_sym_expr(&mut self) -> Result<PrepExpr> {
        let exist = PrepSymbol::lookup(&self.lit).is_some();
        let sym = PrepSymExpr { symbol: self.lit.clone(), exist, place: self.place() };
        self.scan()?;
        Ok(PrepExpr::Sym(sym))
    }

    fn parse_prep_paren_expr(&mut self) -> Result<PrepExpr> {
        let marker = self.marker();
        self.scan()?;
        let expr = self.parse_prep_expression()?;
        self.expect(TokenKind::RParen)?;
        self.scan()?;
        Ok(PrepExpr::Paren(Box::new(PrepParenExpr { expr, place: self.place_from(marker) })))
    }
}
