//! Class-level productions.
use super::{ast::*, Parser};
use crate::{
    error::{CompileResult, SyntaxError},
    symbols::VarKind,
    tokens::{Keyword, Sym},
};

use smol_str::SmolStr;

impl Parser {
    /// Parse one complete class. This is the only entry point; a source
    /// unit is exactly one class.
    pub fn parse_class(mut self) -> CompileResult<Class> {
        self.consume_keyword(Keyword::Class)?;
        let name = self.consume_identifier(IdentCategory::Class, IdentContext::Declaration)?;
        self.consume_symbol(Sym::LeftBrace)?;

        let mut var_decs = Vec::new();
        while self.at_keyword(Keyword::Static) || self.at_keyword(Keyword::Field) {
            var_decs.push(self.parse_class_var_dec()?);
        }

        let mut subroutines = Vec::new();
        while self.at_keyword(Keyword::Constructor)
            || self.at_keyword(Keyword::Function)
            || self.at_keyword(Keyword::Method)
        {
            subroutines.push(self.parse_subroutine_dec()?);
        }

        self.consume_symbol(Sym::RightBrace)?;

        // Nothing may follow the class.
        if let Some(token) = self.stream.current() {
            return Err(SyntaxError {
                expected: "end of input".to_owned(),
                found: token.to_string(),
                line: token.line,
            }
            .into());
        }

        Ok(Class {
            name,
            var_decs,
            subroutines,
        })
    }

    fn parse_class_var_dec(&mut self) -> CompileResult<ClassVarDec> {
        let keyword = self.consume_one_of_keywords(&[Keyword::Field, Keyword::Static])?;
        let kind = match keyword {
            Keyword::Field => VarKind::Field,
            _ => VarKind::Static,
        };

        let (ty, names) = self.parse_dec_names(kind)?;
        Ok(ClassVarDec { kind, ty, names })
    }

    fn parse_subroutine_dec(&mut self) -> CompileResult<SubroutineDec> {
        // Argument and local scope starts fresh for every subroutine.
        self.sub_table.reset();

        let keyword = self.consume_one_of_keywords(&[Keyword::Constructor, Keyword::Method, Keyword::Function])?;
        let kind = match keyword {
            Keyword::Constructor => SubroutineKind::Constructor,
            Keyword::Method => SubroutineKind::Method,
            _ => SubroutineKind::Function,
        };

        let return_type = self.consume_return_type()?;
        let name = self.consume_identifier(IdentCategory::Subroutine, IdentContext::Declaration)?;

        self.consume_symbol(Sym::LeftParen)?;
        let params = self.parse_param_list()?;
        self.consume_symbol(Sym::RightParen)?;

        let body = self.parse_subroutine_body()?;

        // Record the table counts before the next subroutine resets them;
        // the generator reads the local count for the function header.
        let args_count = self.sub_table.count_of(VarKind::Argument);
        let locals_count = self.sub_table.count_of(VarKind::Local);

        Ok(SubroutineDec {
            kind,
            return_type,
            name,
            params,
            body,
            args_count,
            locals_count,
        })
    }

    fn parse_param_list(&mut self) -> CompileResult<Vec<Param>> {
        let mut params = Vec::new();

        if !self.at_symbol(Sym::RightParen) {
            loop {
                let ty = self.consume_type()?;
                let name = self.declare(ty.clone(), VarKind::Argument)?;
                params.push(Param { ty, name });

                if !self.match_symbol(Sym::Comma) {
                    break;
                }
            }
        }

        Ok(params)
    }

    fn parse_subroutine_body(&mut self) -> CompileResult<SubroutineBody> {
        self.consume_symbol(Sym::LeftBrace)?;

        let mut var_decs = Vec::new();
        while self.at_keyword(Keyword::Var) {
            self.stream.advance();
            let (ty, names) = self.parse_dec_names(VarKind::Local)?;
            var_decs.push(VarDec { ty, names });
        }

        let statements = self.parse_statements()?;
        self.consume_symbol(Sym::RightBrace)?;

        Ok(SubroutineBody { var_decs, statements })
    }

    /// The shared `type name (',' name)* ';'` tail of class var decs and
    /// local var decs. Every declared name goes into the table selected
    /// by `kind` as it is parsed.
    fn parse_dec_names(&mut self, kind: VarKind) -> CompileResult<(SmolStr, Vec<VarRef>)> {
        let ty = self.consume_type()?;

        let mut names = vec![self.declare(ty.clone(), kind)?];
        while self.match_symbol(Sym::Comma) {
            names.push(self.declare(ty.clone(), kind)?);
        }

        self.consume_symbol(Sym::Semicolon)?;
        Ok((ty, names))
    }
}
