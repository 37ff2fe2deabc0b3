//! Statement parsing.
use super::{ast::*, Parser};
use crate::{
    error::CompileResult,
    tokens::{Keyword, Sym, TokenKind},
};

impl Parser {
    /// Parse statements until a token that cannot start one. The closing
    /// `}` is left for the caller, and so is any `else`: only `parse_if`
    /// may consume it.
    pub(super) fn parse_statements(&mut self) -> CompileResult<Vec<Statement>> {
        let mut statements = Vec::new();

        loop {
            let keyword = match self.stream.current().map(|t| t.kind) {
                Some(TokenKind::Keyword(k)) => k,
                _ => break,
            };

            let statement = match keyword {
                Keyword::Let => Statement::Let(self.parse_let()?),
                Keyword::If => Statement::If(self.parse_if()?),
                Keyword::While => Statement::While(self.parse_while()?),
                Keyword::Do => Statement::Do(self.parse_do()?),
                Keyword::Return => Statement::Return(self.parse_return()?),
                _ => break,
            };
            statements.push(statement);
        }

        Ok(statements)
    }

    fn parse_let(&mut self) -> CompileResult<LetStmt> {
        self.consume_keyword(Keyword::Let)?;
        let target = self.consume_resolved_var(IdentContext::Definition)?;

        let index = if self.match_symbol(Sym::LeftBracket) {
            let expression = self.parse_expression()?;
            self.consume_symbol(Sym::RightBracket)?;
            Some(expression)
        } else {
            None
        };

        self.consume_symbol(Sym::Eq)?;
        let value = self.parse_expression()?;
        self.consume_symbol(Sym::Semicolon)?;

        Ok(LetStmt { target, index, value })
    }

    fn parse_if(&mut self) -> CompileResult<IfStmt> {
        self.consume_keyword(Keyword::If)?;

        self.consume_symbol(Sym::LeftParen)?;
        let condition = self.parse_expression()?;
        self.consume_symbol(Sym::RightParen)?;

        self.consume_symbol(Sym::LeftBrace)?;
        let then_block = self.parse_statements()?;
        self.consume_symbol(Sym::RightBrace)?;

        // Only now, past the closing brace, can `else` be recognized.
        let else_block = if self.at_keyword(Keyword::Else) {
            self.stream.advance();
            self.consume_symbol(Sym::LeftBrace)?;
            let block = self.parse_statements()?;
            self.consume_symbol(Sym::RightBrace)?;
            Some(block)
        } else {
            None
        };

        Ok(IfStmt {
            condition,
            then_block,
            else_block,
        })
    }

    fn parse_while(&mut self) -> CompileResult<WhileStmt> {
        self.consume_keyword(Keyword::While)?;

        self.consume_symbol(Sym::LeftParen)?;
        let condition = self.parse_expression()?;
        self.consume_symbol(Sym::RightParen)?;

        self.consume_symbol(Sym::LeftBrace)?;
        let body = self.parse_statements()?;
        self.consume_symbol(Sym::RightBrace)?;

        Ok(WhileStmt { condition, body })
    }

    fn parse_do(&mut self) -> CompileResult<DoStmt> {
        self.consume_keyword(Keyword::Do)?;
        let call = self.parse_subroutine_call()?;
        self.consume_symbol(Sym::Semicolon)?;

        Ok(DoStmt { call })
    }

    fn parse_return(&mut self) -> CompileResult<ReturnStmt> {
        let line = self.current_token("keyword \"return\"")?.line;
        self.consume_keyword(Keyword::Return)?;

        let value = if self.at_symbol(Sym::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume_symbol(Sym::Semicolon)?;

        Ok(ReturnStmt { value, line })
    }
}
