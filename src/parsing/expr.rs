//! Expression and subroutine-call parsing.
use super::{ast::*, Parser};
use crate::{
    error::{CompileError, CompileResult},
    tokens::{Sym, TokenKind},
    validate,
};

impl Parser {
    /// `term (op term)*`. The grammar has no precedence levels; operators
    /// are collected in source order next to their terms.
    pub(super) fn parse_expression(&mut self) -> CompileResult<Expression> {
        let mut terms = vec![self.parse_term()?];
        let mut ops = Vec::new();

        while let Some(op) = self
            .stream
            .current()
            .and_then(validate::binary_operator)
            .and_then(BinaryOp::from_sym)
        {
            self.stream.advance();
            ops.push(op);
            terms.push(self.parse_term()?);
        }

        Ok(Expression { terms, ops })
    }

    fn parse_term(&mut self) -> CompileResult<Term> {
        let token = self.current_token("a term")?.clone();

        match token.kind {
            TokenKind::Int => {
                let value = validate::expect_integer(&token)?;
                self.stream.advance();
                Ok(Term::Int(value))
            }
            TokenKind::Str => {
                self.stream.advance();
                Ok(Term::Str(token.text))
            }
            TokenKind::Keyword(_) => {
                let keyword = validate::expect_one_of_keywords(&token, &validate::KEYWORD_CONSTANTS)?;
                self.stream.advance();
                KeywordConst::from_keyword(keyword)
                    .map(Term::Const)
                    .ok_or(CompileError::Internal("keyword constant out of closed set"))
            }
            TokenKind::Ident => self.parse_ident_term(),
            TokenKind::Sym(Sym::LeftParen) => {
                self.stream.advance();
                let expression = self.parse_expression()?;
                self.consume_symbol(Sym::RightParen)?;
                Ok(Term::Bracket(Box::new(expression)))
            }
            TokenKind::Sym(sym) => {
                validate::expect_one_of_symbols(&token, &validate::UNARY_OPERATORS)?;
                self.stream.advance();
                let operand = self.parse_term()?;
                UnaryOp::from_sym(sym)
                    .map(|op| Term::Unary(op, Box::new(operand)))
                    .ok_or(CompileError::Internal("unary operator out of closed set"))
            }
        }
    }

    /// A term starting with an identifier. One token of lookahead decides
    /// its role: `[` makes it an array access, `(` or `.` a subroutine
    /// call, anything else a plain variable usage.
    fn parse_ident_term(&mut self) -> CompileResult<Term> {
        match self.peek_symbol() {
            Some(Sym::LeftBracket) => {
                let var = self.consume_resolved_var(IdentContext::Usage)?;
                self.consume_symbol(Sym::LeftBracket)?;
                let index = self.parse_expression()?;
                self.consume_symbol(Sym::RightBracket)?;
                Ok(Term::Index(ArrayIndex { var, index }))
            }
            Some(Sym::LeftParen) | Some(Sym::Dot) => Ok(Term::Call(self.parse_subroutine_call()?)),
            _ => Ok(Term::Var(self.consume_resolved_var(IdentContext::Usage)?)),
        }
    }

    /// `ID '(' exprList ')' | ID '.' ID '(' exprList ')'`.
    ///
    /// For the qualified form the leading identifier is resolved here,
    /// once: a name found in a scope table is an instance receiver, any
    /// other name is taken as a class (never verified to exist).
    pub(super) fn parse_subroutine_call(&mut self) -> CompileResult<SubroutineCall> {
        let receiver = if self.peek_symbol() == Some(Sym::Dot) {
            let token = self.current_token("identifier")?;
            let name = validate::expect_identifier(token)?;
            let line = token.line;

            let receiver = match self.resolve(&name, line, IdentContext::Usage) {
                Some(var) => CallReceiver::Var(var),
                None => CallReceiver::Class(Ident {
                    name,
                    line,
                    category: IdentCategory::Class,
                    context: IdentContext::Usage,
                }),
            };

            self.stream.advance(); // receiver identifier
            self.stream.advance(); // dot
            Some(receiver)
        } else {
            None
        };

        let name = self.consume_identifier(IdentCategory::Subroutine, IdentContext::Usage)?;

        self.consume_symbol(Sym::LeftParen)?;
        let args = self.parse_expression_list()?;
        self.consume_symbol(Sym::RightParen)?;

        Ok(SubroutineCall { receiver, name, args })
    }

    fn parse_expression_list(&mut self) -> CompileResult<Vec<Expression>> {
        let mut expressions = Vec::new();

        if !self.at_symbol(Sym::RightParen) {
            loop {
                expressions.push(self.parse_expression()?);
                if !self.match_symbol(Sym::Comma) {
                    break;
                }
            }
        }

        Ok(expressions)
    }
}
