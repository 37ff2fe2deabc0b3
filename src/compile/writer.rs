//! VM instruction sink.
//!
//! The writer is deliberately trivial: one method per instruction form,
//! each appending a line of text. The segment and command enums are the
//! single source of mnemonic spellings.
use std::fmt;

/// VM memory region addressed as base+index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[rustfmt::skip]
pub enum Segment {
    Constant,
    Local,
    Argument,
    This,
    That,
    Static,
    Pointer,
    Temp,
}

impl fmt::Display for Segment {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Constant => write!(f, "constant"),
            Self::Local    => write!(f, "local"),
            Self::Argument => write!(f, "argument"),
            Self::This     => write!(f, "this"),
            Self::That     => write!(f, "that"),
            Self::Static   => write!(f, "static"),
            Self::Pointer  => write!(f, "pointer"),
            Self::Temp     => write!(f, "temp"),
        }
    }
}

/// Bare arithmetic/logic mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[rustfmt::skip]
pub enum Command {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

impl fmt::Display for Command {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Sub => write!(f, "sub"),
            Self::Neg => write!(f, "neg"),
            Self::Eq  => write!(f, "eq"),
            Self::Gt  => write!(f, "gt"),
            Self::Lt  => write!(f, "lt"),
            Self::And => write!(f, "and"),
            Self::Or  => write!(f, "or"),
            Self::Not => write!(f, "not"),
        }
    }
}

#[derive(Debug, Default)]
pub struct VmWriter {
    output: Vec<String>,
}

impl VmWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: Segment, index: u16) {
        self.output.push(format!("push {} {}", segment, index));
    }

    pub fn pop(&mut self, segment: Segment, index: u16) {
        self.output.push(format!("pop {} {}", segment, index));
    }

    pub fn arithmetic(&mut self, command: Command) {
        self.output.push(command.to_string());
    }

    pub fn label(&mut self, label: &str) {
        self.output.push(format!("label {}", label));
    }

    pub fn goto(&mut self, label: &str) {
        self.output.push(format!("goto {}", label));
    }

    pub fn if_goto(&mut self, label: &str) {
        self.output.push(format!("if-goto {}", label));
    }

    pub fn call(&mut self, name: &str, n_args: u16) {
        self.output.push(format!("call {} {}", name, n_args));
    }

    pub fn function(&mut self, name: &str, n_locals: u16) {
        self.output.push(format!("function {} {}", name, n_locals));
    }

    pub fn ret(&mut self) {
        self.output.push("return".to_owned());
    }

    /// Blank line; separates subroutines in the listing.
    pub fn blank(&mut self) {
        self.output.push(String::new());
    }

    pub fn finish(self) -> Vec<String> {
        self.output
    }
}
