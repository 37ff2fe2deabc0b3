//! Compiler for the Jack teaching language, targeting the stack VM of
//! its course platform.
//!
//! The pipeline is three stages with no shortcuts between them: the lexer
//! turns source text into tokens, the parser builds an annotated syntax
//! tree while filling the scope tables, and the code generator walks the
//! tree into VM instruction text. Each compilation unit is one class and
//! owns all of its state, so units can be compiled in parallel. File
//! handling and command line concerns live outside this crate.
pub mod compile;
pub mod error;
pub mod lex;
pub mod parsing;
pub mod symbols;
pub mod token_stream;
pub mod tokens;
pub mod trace;
pub mod validate;

use error::CompileResult;

/// Compile one class from source text to VM instructions.
///
/// The first error of any stage aborts the unit: the caller gets either
/// the complete instruction list or a single error, never partial output.
pub fn compile_str(source: &str) -> CompileResult<Vec<String>> {
    // Lexical analysis
    let tokens = lex::Lexer::new(source).tokenize()?;
    let stream = token_stream::TokenStream::new(tokens);

    // Syntactic analysis
    let class = parsing::Parser::new(stream).parse_class()?;

    // Code generation
    let instructions = compile::CodeGen::generate(&class)?;

    Ok(instructions)
}
