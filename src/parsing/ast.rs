//! Typed syntax tree.
//!
//! One variant per grammar production, each with named fields. Field and
//! `Vec` order mirror source order, and the code generator walks them in
//! that order. The tree is built once by the parser and never mutated;
//! every node exclusively owns its children.
use smol_str::SmolStr;

use crate::symbols::{ScopeTable, VarKind};
use crate::tokens::{Keyword, Sym};

/// What role an identifier plays at its occurrence site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentCategory {
    Class,
    Subroutine,
    Variable,
}

impl IdentCategory {
    #[rustfmt::skip]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class      => "class",
            Self::Subroutine => "subroutine",
            Self::Variable   => "variable",
        }
    }
}

/// Whether the occurrence introduces, assigns or reads the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentContext {
    Declaration,
    Definition,
    Usage,
}

impl IdentContext {
    #[rustfmt::skip]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Declaration => "declaration",
            Self::Definition  => "definition",
            Self::Usage       => "usage",
        }
    }
}

/// An identifier occurrence, annotated with its role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: SmolStr,
    pub line: u32,
    pub category: IdentCategory,
    pub context: IdentContext,
}

/// A variable identifier together with the symbol-table entry it resolved
/// to. Resolution happens once, during parsing; the generator only reads
/// what is recorded here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarRef {
    pub ident: Ident,
    pub ty: SmolStr,
    pub kind: VarKind,
    pub table: ScopeTable,
    pub index: u16,
}

#[derive(Debug)]
pub struct Class {
    pub name: Ident,
    pub var_decs: Vec<ClassVarDec>,
    pub subroutines: Vec<SubroutineDec>,
}

/// `static`/`field` declaration line; one entry per declared name.
#[derive(Debug)]
pub struct ClassVarDec {
    pub kind: VarKind,
    pub ty: SmolStr,
    pub names: Vec<VarRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubroutineKind {
    Constructor,
    Function,
    Method,
}

impl SubroutineKind {
    #[rustfmt::skip]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Constructor => "constructor",
            Self::Function    => "function",
            Self::Method      => "method",
        }
    }
}

#[derive(Debug)]
pub struct SubroutineDec {
    pub kind: SubroutineKind,
    pub return_type: SmolStr,
    pub name: Ident,
    pub params: Vec<Param>,
    pub body: SubroutineBody,
    /// Table counts recorded when the declaration finished parsing.
    pub args_count: u16,
    pub locals_count: u16,
}

#[derive(Debug)]
pub struct Param {
    pub ty: SmolStr,
    pub name: VarRef,
}

#[derive(Debug)]
pub struct SubroutineBody {
    pub var_decs: Vec<VarDec>,
    pub statements: Vec<Statement>,
}

/// `var` declaration line; one entry per declared name.
#[derive(Debug)]
pub struct VarDec {
    pub ty: SmolStr,
    pub names: Vec<VarRef>,
}

#[derive(Debug)]
pub enum Statement {
    Let(LetStmt),
    If(IfStmt),
    While(WhileStmt),
    Do(DoStmt),
    Return(ReturnStmt),
}

#[derive(Debug)]
pub struct LetStmt {
    pub target: VarRef,
    /// Present for `let target[index] = value;`.
    pub index: Option<Expression>,
    pub value: Expression,
}

#[derive(Debug)]
pub struct IfStmt {
    pub condition: Expression,
    pub then_block: Vec<Statement>,
    pub else_block: Option<Vec<Statement>>,
}

#[derive(Debug)]
pub struct WhileStmt {
    pub condition: Expression,
    pub body: Vec<Statement>,
}

#[derive(Debug)]
pub struct DoStmt {
    pub call: SubroutineCall,
}

#[derive(Debug)]
pub struct ReturnStmt {
    pub value: Option<Expression>,
    pub line: u32,
}

/// `term (op term)*`, kept as parallel lists.
///
/// Invariant: `terms.len() == ops.len() + 1`. The generator checks it and
/// treats a violation as a compiler defect.
#[derive(Debug)]
pub struct Expression {
    pub terms: Vec<Term>,
    pub ops: Vec<BinaryOp>,
}

#[derive(Debug)]
pub enum Term {
    Int(u16),
    Str(SmolStr),
    Const(KeywordConst),
    Var(VarRef),
    Index(ArrayIndex),
    Call(SubroutineCall),
    /// Parenthesized sub-expression.
    Bracket(Box<Expression>),
    Unary(UnaryOp, Box<Term>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordConst {
    True,
    False,
    Null,
    This,
}

impl KeywordConst {
    pub fn from_keyword(keyword: Keyword) -> Option<Self> {
        match keyword {
            Keyword::True => Some(Self::True),
            Keyword::False => Some(Self::False),
            Keyword::Null => Some(Self::Null),
            Keyword::This => Some(Self::This),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct ArrayIndex {
    pub var: VarRef,
    pub index: Expression,
}

#[derive(Debug)]
pub struct SubroutineCall {
    /// `None` for an unqualified call; the generator supplies the current
    /// class as qualifier and, inside methods and constructors, `this` as
    /// the implicit receiver.
    pub receiver: Option<CallReceiver>,
    pub name: Ident,
    pub args: Vec<Expression>,
}

/// The identifier before the dot, resolved at parse time: a known
/// variable becomes an instance receiver, anything else is taken as a
/// class name (callee existence is never verified).
#[derive(Debug)]
pub enum CallReceiver {
    Var(VarRef),
    Class(Ident),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Lt,
    Gt,
    Eq,
}

impl BinaryOp {
    #[rustfmt::skip]
    pub fn from_sym(sym: Sym) -> Option<Self> {
        match sym {
            Sym::Plus  => Some(Self::Add),
            Sym::Minus => Some(Self::Sub),
            Sym::Star  => Some(Self::Mul),
            Sym::Slash => Some(Self::Div),
            Sym::Amp   => Some(Self::And),
            Sym::Pipe  => Some(Self::Or),
            Sym::Lt    => Some(Self::Lt),
            Sym::Gt    => Some(Self::Gt),
            Sym::Eq    => Some(Self::Eq),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn from_sym(sym: Sym) -> Option<Self> {
        match sym {
            Sym::Minus => Some(Self::Neg),
            Sym::Tilde => Some(Self::Not),
            _ => None,
        }
    }
}
