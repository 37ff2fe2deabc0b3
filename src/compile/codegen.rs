//! Code generator.
//!
//! Walks the typed syntax tree and emits VM instructions through the
//! writer. All state lives in per-run contexts: [`ClassCtx`] for the
//! class being generated (label counters, constructor flag) and
//! [`SubroutineCtx`] for the subroutine currently underway. A fresh run
//! starts from zeroed contexts, so generating the same tree twice yields
//! identical output and independent classes can be generated in parallel.
use super::writer::{Command, Segment, VmWriter};
use crate::{
    error::{CompileError, CompileResult, SemanticError},
    parsing::ast::*,
    symbols::VarKind,
};

use smol_str::SmolStr;

/// Code generator.
pub struct CodeGen {
    writer: VmWriter,
    class: ClassCtx,
    sub: SubroutineCtx,
}

/// Per-class generation context.
struct ClassCtx {
    name: SmolStr,
    /// Words a constructor must allocate: one per field, statics excluded.
    fields_count: u16,
    if_labels: u32,
    while_labels: u32,
    constructor_seen: bool,
}

impl ClassCtx {
    fn new(class: &Class) -> Self {
        let fields_count = class
            .var_decs
            .iter()
            .filter(|dec| dec.kind == VarKind::Field)
            .map(|dec| dec.names.len() as u16)
            .sum();

        Self {
            name: class.name.name.clone(),
            fields_count,
            if_labels: 0,
            while_labels: 0,
            constructor_seen: false,
        }
    }
}

/// Per-subroutine generation context; replaced at every subroutine.
struct SubroutineCtx {
    kind: SubroutineKind,
    return_type: SmolStr,
    name: SmolStr,
}

impl Default for SubroutineCtx {
    fn default() -> Self {
        Self {
            kind: SubroutineKind::Function,
            return_type: SmolStr::new("void"),
            name: SmolStr::default(),
        }
    }
}

impl CodeGen {
    /// Generate the instruction list for one class.
    pub fn generate(class: &Class) -> CompileResult<Vec<String>> {
        let mut gen = CodeGen {
            writer: VmWriter::new(),
            class: ClassCtx::new(class),
            sub: SubroutineCtx::default(),
        };

        for subroutine in &class.subroutines {
            gen.emit_subroutine(subroutine)?;
        }

        Ok(gen.writer.finish())
    }

    fn qualified_sub_name(&self) -> SmolStr {
        SmolStr::new(format!("{}.{}", self.class.name, self.sub.name))
    }
}

/// Subroutine framing.
impl CodeGen {
    fn emit_subroutine(&mut self, subroutine: &SubroutineDec) -> CompileResult<()> {
        self.sub = SubroutineCtx {
            kind: subroutine.kind,
            return_type: subroutine.return_type.clone(),
            name: subroutine.name.name.clone(),
        };

        self.writer
            .function(&format!("{}.{}", self.class.name, subroutine.name.name), subroutine.locals_count);

        match subroutine.kind {
            SubroutineKind::Constructor => self.emit_constructor_setup()?,
            SubroutineKind::Method => {
                // The caller passed the object as argument 0; anchor it
                // as the current `this`.
                self.writer.push(Segment::Argument, 0);
                self.writer.pop(Segment::Pointer, 0);
            }
            SubroutineKind::Function => {}
        }

        self.emit_statements(&subroutine.body.statements)?;
        self.writer.blank();

        Ok(())
    }

    fn emit_constructor_setup(&mut self) -> CompileResult<()> {
        if self.class.constructor_seen {
            return Err(SemanticError::DuplicateConstructor {
                class: self.class.name.clone(),
            }
            .into());
        }
        self.class.constructor_seen = true;

        // Allocate one word per field and anchor the returned base
        // address as `this`.
        self.writer.push(Segment::Constant, self.class.fields_count);
        self.writer.call("Memory.alloc", 1);
        self.writer.pop(Segment::Pointer, 0);

        Ok(())
    }
}

/// Statements.
impl CodeGen {
    fn emit_statements(&mut self, statements: &[Statement]) -> CompileResult<()> {
        for statement in statements {
            match statement {
                Statement::Let(stmt) => self.emit_let(stmt)?,
                Statement::If(stmt) => self.emit_if(stmt)?,
                Statement::While(stmt) => self.emit_while(stmt)?,
                Statement::Do(stmt) => self.emit_do(stmt)?,
                Statement::Return(stmt) => self.emit_return(stmt)?,
            }
        }
        Ok(())
    }

    fn emit_let(&mut self, stmt: &LetStmt) -> CompileResult<()> {
        match &stmt.index {
            None => {
                self.emit_expression(&stmt.value)?;
                self.pop_var(&stmt.target);
            }
            Some(index) => {
                // Target address first, value second. The value parks in
                // temp 0 while pointer 1 takes the address, so a value
                // expression touching the same array cannot clobber the
                // address under it.
                self.push_var(&stmt.target);
                self.emit_expression(index)?;
                self.writer.arithmetic(Command::Add);

                self.emit_expression(&stmt.value)?;
                self.writer.pop(Segment::Temp, 0);

                self.writer.pop(Segment::Pointer, 1);
                self.writer.push(Segment::Temp, 0);
                self.writer.pop(Segment::That, 0);
            }
        }
        Ok(())
    }

    fn emit_if(&mut self, stmt: &IfStmt) -> CompileResult<()> {
        let n = self.class.if_labels;
        self.class.if_labels += 1;
        let else_label = format!("IF.{}.ELSE", n);
        let end_label = format!("IF.{}.END", n);

        self.emit_expression(&stmt.condition)?;
        self.writer.arithmetic(Command::Not);
        self.writer.if_goto(if stmt.else_block.is_some() { &else_label } else { &end_label });

        self.emit_statements(&stmt.then_block)?;

        if let Some(else_block) = &stmt.else_block {
            // Without this jump the then-block would fall through into
            // the else-block.
            self.writer.goto(&end_label);
            self.writer.label(&else_label);
            self.emit_statements(else_block)?;
        }

        self.writer.label(&end_label);
        Ok(())
    }

    fn emit_while(&mut self, stmt: &WhileStmt) -> CompileResult<()> {
        let n = self.class.while_labels;
        self.class.while_labels += 1;
        let condition_label = format!("WHILE.{}.CONDITION", n);
        let end_label = format!("WHILE.{}.END", n);

        self.writer.label(&condition_label);
        self.emit_expression(&stmt.condition)?;
        self.writer.arithmetic(Command::Not);
        self.writer.if_goto(&end_label);

        self.emit_statements(&stmt.body)?;

        self.writer.goto(&condition_label);
        self.writer.label(&end_label);
        Ok(())
    }

    fn emit_do(&mut self, stmt: &DoStmt) -> CompileResult<()> {
        self.emit_call(&stmt.call)?;
        // The callee left a value; a do statement discards it.
        self.writer.pop(Segment::Temp, 0);
        Ok(())
    }

    fn emit_return(&mut self, stmt: &ReturnStmt) -> CompileResult<()> {
        if self.sub.return_type == "void" {
            if stmt.value.is_some() {
                return Err(SemanticError::UnexpectedReturnValue {
                    subroutine: self.qualified_sub_name(),
                    line: stmt.line,
                }
                .into());
            }
            // The calling convention wants exactly one value on the
            // stack, even from void subroutines.
            self.writer.push(Segment::Constant, 0);
        } else {
            match &stmt.value {
                Some(expression) => self.emit_expression(expression)?,
                None => {
                    return Err(SemanticError::MissingReturnValue {
                        subroutine: self.qualified_sub_name(),
                        line: stmt.line,
                    }
                    .into())
                }
            }
        }

        self.writer.ret();
        Ok(())
    }
}

/// Expressions and calls.
impl CodeGen {
    /// Emit every term left to right, then apply the collected operators.
    /// Each operator consumes the two values most recently left on the
    /// stack, so the operator list unwinds last to first:
    /// `1 + 2 * 3` becomes three pushes, `call Math.multiply 2`, `add`.
    fn emit_expression(&mut self, expression: &Expression) -> CompileResult<()> {
        if expression.terms.len() != expression.ops.len() + 1 {
            return Err(CompileError::Internal("expression terms and operators out of step"));
        }

        for term in &expression.terms {
            self.emit_term(term)?;
        }

        for op in expression.ops.iter().rev() {
            self.emit_binary_op(*op);
        }

        Ok(())
    }

    fn emit_term(&mut self, term: &Term) -> CompileResult<()> {
        match term {
            Term::Int(value) => self.writer.push(Segment::Constant, *value),
            Term::Str(text) => self.emit_string(text),
            Term::Const(KeywordConst::True) => {
                self.writer.push(Segment::Constant, 1);
                self.writer.arithmetic(Command::Neg);
            }
            Term::Const(KeywordConst::False) | Term::Const(KeywordConst::Null) => {
                self.writer.push(Segment::Constant, 0);
            }
            Term::Const(KeywordConst::This) => self.writer.push(Segment::Pointer, 0),
            Term::Var(var) => self.push_var(var),
            Term::Index(access) => {
                self.push_var(&access.var);
                self.emit_expression(&access.index)?;
                self.writer.arithmetic(Command::Add);
                // Redirect `that` to base+index and read through it.
                self.writer.pop(Segment::Pointer, 1);
                self.writer.push(Segment::That, 0);
            }
            Term::Call(call) => self.emit_call(call)?,
            Term::Bracket(expression) => self.emit_expression(expression)?,
            Term::Unary(op, operand) => {
                self.emit_term(operand)?;
                match op {
                    UnaryOp::Neg => self.writer.arithmetic(Command::Neg),
                    UnaryOp::Not => self.writer.arithmetic(Command::Not),
                }
            }
        }
        Ok(())
    }

    /// Callee name and argument count are assembled from the recorded
    /// receiver resolution; the implicit receiver, when there is one, is
    /// pushed before the argument expressions.
    fn emit_call(&mut self, call: &SubroutineCall) -> CompileResult<()> {
        let mut n_args = call.args.len() as u16;

        let name = match &call.receiver {
            Some(CallReceiver::Var(var)) => {
                self.push_var(var);
                n_args += 1;
                format!("{}.{}", var.ty, call.name.name)
            }
            Some(CallReceiver::Class(class_name)) => {
                format!("{}.{}", class_name.name, call.name.name)
            }
            None => {
                // Unqualified calls target the current class. Methods and
                // constructors pass their own object along.
                if matches!(self.sub.kind, SubroutineKind::Method | SubroutineKind::Constructor) {
                    self.writer.push(Segment::Pointer, 0);
                    n_args += 1;
                }
                format!("{}.{}", self.class.name, call.name.name)
            }
        };

        for arg in &call.args {
            self.emit_expression(arg)?;
        }

        self.writer.call(&name, n_args);
        Ok(())
    }

    /// Build a string object and append the characters one by one.
    fn emit_string(&mut self, text: &str) {
        let length = text.encode_utf16().count() as u16;

        self.writer.push(Segment::Constant, length);
        self.writer.call("String.new", 1);

        for code in text.encode_utf16() {
            self.writer.push(Segment::Constant, code);
            self.writer.call("String.appendChar", 2);
        }
    }

    fn emit_binary_op(&mut self, op: BinaryOp) {
        match op {
            BinaryOp::Add => self.writer.arithmetic(Command::Add),
            BinaryOp::Sub => self.writer.arithmetic(Command::Sub),
            BinaryOp::Mul => self.writer.call("Math.multiply", 2),
            BinaryOp::Div => self.writer.call("Math.divide", 2),
            BinaryOp::And => self.writer.arithmetic(Command::And),
            BinaryOp::Or => self.writer.arithmetic(Command::Or),
            BinaryOp::Lt => self.writer.arithmetic(Command::Lt),
            BinaryOp::Gt => self.writer.arithmetic(Command::Gt),
            BinaryOp::Eq => self.writer.arithmetic(Command::Eq),
        }
    }
}

/// Variable access.
impl CodeGen {
    fn push_var(&mut self, var: &VarRef) {
        let (segment, index) = self.locate(var);
        self.writer.push(segment, index);
    }

    fn pop_var(&mut self, var: &VarRef) {
        let (segment, index) = self.locate(var);
        self.writer.pop(segment, index);
    }

    /// Map a resolved variable onto its segment and runtime index. Inside
    /// a method the object occupies argument 0, so declared arguments
    /// shift up by one.
    fn locate(&self, var: &VarRef) -> (Segment, u16) {
        let segment = match var.kind {
            VarKind::Field => Segment::This,
            VarKind::Static => Segment::Static,
            VarKind::Local => Segment::Local,
            VarKind::Argument => Segment::Argument,
        };

        let index = if var.kind == VarKind::Argument && self.sub.kind == SubroutineKind::Method {
            var.index + 1
        } else {
            var.index
        };

        (segment, index)
    }
}
