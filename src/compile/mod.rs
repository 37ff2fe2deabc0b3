//! Code generation.
mod codegen;
mod writer;

pub use codegen::CodeGen;
pub use writer::{Command, Segment, VmWriter};
