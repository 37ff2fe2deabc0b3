//! Syntactic analysis.
//!
//! Recursive descent over the token stream. Declarations feed the scope
//! tables as they are parsed, identifier roles are disambiguated with one
//! token of lookahead, and every variable occurrence is resolved against
//! the tables once, here, with the result recorded in the tree.
pub mod ast;

mod class;
mod expr;
mod stmts;

pub use ast::*;

use crate::{
    error::{CompileResult, SemanticError, SyntaxError},
    symbols::{ScopeTable, SymbolTable, VarKind},
    token_stream::TokenStream,
    tokens::{Keyword, Sym, Token, TokenKind},
    validate,
};

use smol_str::SmolStr;

pub struct Parser {
    stream: TokenStream,
    class_table: SymbolTable,
    sub_table: SymbolTable,
}

impl Parser {
    pub fn new(stream: TokenStream) -> Self {
        Self {
            stream,
            class_table: SymbolTable::new(),
            sub_table: SymbolTable::new(),
        }
    }
}

/// Cursor and expectation helpers.
///
/// Each `consume_*` validates the current token and moves past it; the
/// `at_*`/`match_*` helpers probe without failing. Grammar mismatches
/// surface as [`SyntaxError`] with expected-vs-found detail.
impl Parser {
    fn current_token(&self, expected: &str) -> CompileResult<&Token> {
        match self.stream.current() {
            Some(token) => Ok(token),
            None => Err(SyntaxError {
                expected: expected.to_owned(),
                found: "end of input".to_owned(),
                line: self.last_line(),
            }
            .into()),
        }
    }

    fn last_line(&self) -> u32 {
        self.stream.tokens().last().map(|t| t.line).unwrap_or(0)
    }

    fn consume_keyword(&mut self, keyword: Keyword) -> CompileResult<()> {
        let token = self.current_token(&format!("keyword \"{}\"", keyword))?;
        validate::expect_keyword(token, keyword)?;
        self.stream.advance();
        Ok(())
    }

    fn consume_one_of_keywords(&mut self, keywords: &[Keyword]) -> CompileResult<Keyword> {
        let token = self.current_token("keyword")?;
        let keyword = validate::expect_one_of_keywords(token, keywords)?;
        self.stream.advance();
        Ok(keyword)
    }

    fn consume_symbol(&mut self, sym: Sym) -> CompileResult<()> {
        let token = self.current_token(&format!("symbol \"{}\"", sym))?;
        validate::expect_symbol(token, sym)?;
        self.stream.advance();
        Ok(())
    }

    fn consume_identifier(&mut self, category: IdentCategory, context: IdentContext) -> CompileResult<Ident> {
        let token = self.current_token("identifier")?;
        let name = validate::expect_identifier(token)?;
        let line = token.line;
        self.stream.advance();

        Ok(Ident {
            name,
            line,
            category,
            context,
        })
    }

    fn consume_type(&mut self) -> CompileResult<SmolStr> {
        let token = self.current_token("type")?;
        let ty = validate::expect_type(token)?;
        self.stream.advance();
        Ok(ty)
    }

    fn consume_return_type(&mut self) -> CompileResult<SmolStr> {
        let token = self.current_token("return type")?;
        let ty = validate::expect_return_type(token)?;
        self.stream.advance();
        Ok(ty)
    }

    fn at_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.stream.current(), Some(t) if t.kind == TokenKind::Keyword(keyword))
    }

    fn at_symbol(&self, sym: Sym) -> bool {
        matches!(self.stream.current(), Some(t) if t.kind == TokenKind::Sym(sym))
    }

    /// Consume the symbol if it is the current token.
    fn match_symbol(&mut self, sym: Sym) -> bool {
        if self.at_symbol(sym) {
            self.stream.advance();
            true
        } else {
            false
        }
    }

    /// The symbol starting the token after the current one, if any.
    fn peek_symbol(&self) -> Option<Sym> {
        match self.stream.peek_next().map(|t| t.kind) {
            Some(TokenKind::Sym(s)) => Some(s),
            _ => None,
        }
    }
}

/// Symbol-table side effects and resolution.
impl Parser {
    /// Consume the declaring identifier and insert it into the table its
    /// kind selects.
    fn declare(&mut self, ty: SmolStr, kind: VarKind) -> CompileResult<VarRef> {
        let token = self.current_token("identifier")?;
        let name = validate::expect_identifier(token)?;
        let line = token.line;
        self.stream.advance();

        let (table, scope) = if kind.is_subroutine_scope() {
            (&mut self.sub_table, ScopeTable::Subroutine)
        } else {
            (&mut self.class_table, ScopeTable::Class)
        };

        let symbol = table
            .add(name.clone(), ty.clone(), kind)
            .map_err(|dup| SemanticError::DuplicateSymbol { name: dup.name, line })?;

        Ok(VarRef {
            ident: Ident {
                name,
                line,
                category: IdentCategory::Variable,
                context: IdentContext::Declaration,
            },
            ty,
            kind,
            table: scope,
            index: symbol.index,
        })
    }

    /// Resolve a name, subroutine scope first (subroutine shadows class).
    fn resolve(&self, name: &str, line: u32, context: IdentContext) -> Option<VarRef> {
        let (symbol, table) = self
            .sub_table
            .find(name)
            .map(|s| (s, ScopeTable::Subroutine))
            .or_else(|| self.class_table.find(name).map(|s| (s, ScopeTable::Class)))?;

        Some(VarRef {
            ident: Ident {
                name: symbol.name.clone(),
                line,
                category: IdentCategory::Variable,
                context,
            },
            ty: symbol.ty.clone(),
            kind: symbol.kind,
            table,
            index: symbol.index,
        })
    }

    /// Consume an identifier that must name a declared variable.
    fn consume_resolved_var(&mut self, context: IdentContext) -> CompileResult<VarRef> {
        let token = self.current_token("identifier")?;
        let name = validate::expect_identifier(token)?;
        let line = token.line;
        self.stream.advance();

        self.resolve(&name, line, context)
            .ok_or_else(|| SemanticError::UndeclaredVariable { name, line }.into())
    }
}
