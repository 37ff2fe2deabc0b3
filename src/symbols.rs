//! Scoped symbol tables.
//!
//! Two tables exist per class: one for class scope (static/field) that
//! lives for the whole class, and one for subroutine scope
//! (argument/local) that resets at every subroutine boundary. Which table
//! an entry goes into follows from its kind alone.
use std::fmt;

use smol_str::SmolStr;

/// A variable's declaration class. Determines its table and, later, the
/// memory segment access code targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Static,
    Field,
    Argument,
    Local,
}

impl VarKind {
    /// Argument and local entries belong to the subroutine table; static
    /// and field entries to the class table.
    #[inline]
    pub fn is_subroutine_scope(&self) -> bool {
        matches!(self, VarKind::Argument | VarKind::Local)
    }

    #[rustfmt::skip]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static   => "static",
            Self::Field    => "field",
            Self::Argument => "argument",
            Self::Local    => "local",
        }
    }
}

impl fmt::Display for VarKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which of the two scope tables resolved a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeTable {
    Class,
    Subroutine,
}

impl fmt::Display for ScopeTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Class => write!(f, "class"),
            Self::Subroutine => write!(f, "subroutine"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: SmolStr,
    pub ty: SmolStr,
    pub kind: VarKind,
    /// Zero-based position among entries of the same kind, assigned at
    /// insertion. Indices of one kind stay contiguous even when
    /// insertions of different kinds interleave.
    pub index: u16,
}

/// Returned when `add` is given a name the table already holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateSymbol {
    pub name: SmolStr,
}

/// One scope's name → (type, kind, index) map.
///
/// Entries are kept in insertion order; the per-kind index invariant
/// depends on counting what was inserted before.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new entry. Its index is the number of same-kind entries
    /// present just before insertion.
    pub fn add(
        &mut self,
        name: impl Into<SmolStr>,
        ty: impl Into<SmolStr>,
        kind: VarKind,
    ) -> Result<&Symbol, DuplicateSymbol> {
        let name = name.into();

        if self.find(&name).is_some() {
            return Err(DuplicateSymbol { name });
        }

        let symbol = Symbol {
            name,
            ty: ty.into(),
            kind,
            index: self.count_of(kind),
        };
        self.symbols.push(symbol);
        Ok(self.symbols.last().expect("entry was just pushed"))
    }

    /// Absence is not an error; the caller reinterprets the identifier as
    /// a class or subroutine name.
    pub fn find(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.name == name)
    }

    pub fn reset(&mut self) {
        self.symbols.clear();
    }

    pub fn count_of(&self, kind: VarKind) -> u16 {
        self.symbols.iter().filter(|s| s.kind == kind).count() as u16
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
