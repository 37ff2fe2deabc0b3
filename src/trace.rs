//! Debug traces.
//!
//! Two plain-text views for inspecting a compilation: the flat token
//! listing and the indented structural listing of the syntax tree. Both
//! return lines; where they end up (stdout, a file) is the caller's
//! business.
use crate::{
    parsing::ast::*,
    tokens::{Token, TokenKind},
};

const INDENT_SIZE: usize = 4;

/// One line per token, wrapped in a `<tokens>` block. The `<`, `>` and
/// `&` symbols appear in their escaped display forms.
pub fn token_trace(tokens: &[Token]) -> Vec<String> {
    let mut lines = vec!["<tokens>".to_owned()];

    for token in tokens {
        let line = match token.kind {
            TokenKind::Keyword(_) => format!("<keyword>{}</keyword>", token.text),
            TokenKind::Sym(sym) => format!("<symbol>{}</symbol>", sym.markup()),
            TokenKind::Ident => format!("<identifier>{}</identifier>", token.text),
            TokenKind::Int => format!("<integerConstant>{}</integerConstant>", token.text),
            TokenKind::Str => format!("<stringConstant>{}</stringConstant>", token.text),
        };
        lines.push(line);
    }

    lines.push("</tokens>".to_owned());
    lines
}

/// Indented structural listing of a parsed class, annotated with each
/// identifier's category, context and, for variables, the resolved
/// type/kind/table/index.
pub fn parse_trace(class: &Class) -> Vec<String> {
    let mut trace = Trace::default();
    trace.class(class);
    trace.lines
}

#[derive(Default)]
struct Trace {
    lines: Vec<String>,
    indent: usize,
}

impl Trace {
    fn write(&mut self, text: impl AsRef<str>) {
        self.lines.push(format!(
            "{:indent$}{}",
            "",
            text.as_ref(),
            indent = self.indent * INDENT_SIZE
        ));
    }

    fn nested(&mut self, tag: &str, body: impl FnOnce(&mut Self)) {
        self.write(format!("<{}>", tag));
        self.indent += 1;
        body(self);
        self.indent -= 1;
        self.write(format!("</{}>", tag));
    }

    fn leaf(&mut self, tag: &str, value: impl std::fmt::Display) {
        self.write(format!("<{}>{}</{}>", tag, value, tag));
    }
}

impl Trace {
    fn class(&mut self, class: &Class) {
        self.nested("class", |t| {
            t.ident(&class.name);
            for dec in &class.var_decs {
                t.class_var_dec(dec);
            }
            for subroutine in &class.subroutines {
                t.subroutine(subroutine);
            }
        });
    }

    fn ident(&mut self, ident: &Ident) {
        self.nested("identifier", |t| {
            t.leaf("category", ident.category.as_str());
            t.leaf("context", ident.context.as_str());
            t.leaf("value", &ident.name);
        });
    }

    fn var_ref(&mut self, var: &VarRef) {
        self.nested("identifier", |t| {
            t.leaf("category", var.ident.category.as_str());
            t.leaf("context", var.ident.context.as_str());
            t.leaf("value", &var.ident.name);
            t.leaf("type", &var.ty);
            t.leaf("kind", var.kind);
            t.leaf("varTable", var.table);
            t.leaf("varTableIndex", var.index);
        });
    }

    fn class_var_dec(&mut self, dec: &ClassVarDec) {
        self.nested("classVarDec", |t| {
            t.leaf("keyword", dec.kind);
            t.leaf("type", &dec.ty);
            for name in &dec.names {
                t.var_ref(name);
            }
        });
    }

    fn subroutine(&mut self, subroutine: &SubroutineDec) {
        self.nested("subroutineDec", |t| {
            t.leaf("keyword", subroutine.kind.as_str());
            t.leaf("returnType", &subroutine.return_type);
            t.ident(&subroutine.name);

            t.nested("parameterList", |t| {
                for param in &subroutine.params {
                    t.leaf("type", &param.ty);
                    t.var_ref(&param.name);
                }
            });

            t.nested("subroutineBody", |t| {
                for dec in &subroutine.body.var_decs {
                    t.nested("varDec", |t| {
                        t.leaf("type", &dec.ty);
                        for name in &dec.names {
                            t.var_ref(name);
                        }
                    });
                }
                t.statements(&subroutine.body.statements);
            });

            t.nested("variableData", |t| {
                t.leaf("nArgs", subroutine.args_count);
                t.leaf("nVars", subroutine.locals_count);
            });
        });
    }

    fn statements(&mut self, statements: &[Statement]) {
        self.nested("statements", |t| {
            for statement in statements {
                t.statement(statement);
            }
        });
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Let(stmt) => self.nested("letStatement", |t| {
                t.var_ref(&stmt.target);
                if let Some(index) = &stmt.index {
                    t.expression(index);
                }
                t.expression(&stmt.value);
            }),
            Statement::If(stmt) => self.nested("ifStatement", |t| {
                t.expression(&stmt.condition);
                t.statements(&stmt.then_block);
                if let Some(else_block) = &stmt.else_block {
                    t.nested("else", |t| t.statements(else_block));
                }
            }),
            Statement::While(stmt) => self.nested("whileStatement", |t| {
                t.expression(&stmt.condition);
                t.statements(&stmt.body);
            }),
            Statement::Do(stmt) => self.nested("doStatement", |t| t.call(&stmt.call)),
            Statement::Return(stmt) => self.nested("returnStatement", |t| {
                if let Some(value) = &stmt.value {
                    t.expression(value);
                }
            }),
        }
    }

    fn expression(&mut self, expression: &Expression) {
        self.nested("expression", |t| {
            for (position, term) in expression.terms.iter().enumerate() {
                if position > 0 {
                    if let Some(op) = expression.ops.get(position - 1) {
                        t.leaf("symbol", binary_op_markup(*op));
                    }
                }
                t.nested("term", |t| t.term(term));
            }
        });
    }

    fn term(&mut self, term: &Term) {
        match term {
            Term::Int(value) => self.leaf("integerConstant", value),
            Term::Str(text) => self.leaf("stringConstant", text),
            Term::Const(constant) => self.leaf("keyword", keyword_const_text(*constant)),
            Term::Var(var) => self.var_ref(var),
            Term::Index(access) => {
                self.var_ref(&access.var);
                self.expression(&access.index);
            }
            Term::Call(call) => self.call(call),
            Term::Bracket(expression) => self.expression(expression),
            Term::Unary(op, operand) => {
                self.leaf("symbol", unary_op_markup(*op));
                self.nested("term", |t| t.term(operand));
            }
        }
    }

    fn call(&mut self, call: &SubroutineCall) {
        match &call.receiver {
            Some(CallReceiver::Var(var)) => {
                self.var_ref(var);
                self.leaf("symbol", ".");
            }
            Some(CallReceiver::Class(class_name)) => {
                self.ident(class_name);
                self.leaf("symbol", ".");
            }
            None => {}
        }
        self.ident(&call.name);
        self.nested("expressionList", |t| {
            for arg in &call.args {
                t.expression(arg);
            }
        });
    }
}

#[rustfmt::skip]
fn binary_op_markup(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::And => "&amp;",
        BinaryOp::Or  => "|",
        BinaryOp::Lt  => "&lt;",
        BinaryOp::Gt  => "&gt;",
        BinaryOp::Eq  => "=",
    }
}

fn unary_op_markup(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Neg => "-",
        UnaryOp::Not => "~",
    }
}

fn keyword_const_text(constant: KeywordConst) -> &'static str {
    match constant {
        KeywordConst::True => "true",
        KeywordConst::False => "false",
        KeywordConst::Null => "null",
        KeywordConst::This => "this",
    }
}
