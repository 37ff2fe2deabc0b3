//! Lexical analysis (tokenizer)
//!
//! The lexer works line by line. Block comments carry state across lines;
//! everything else is decided within one line. String literals are
//! recognized before any other classification, so comment markers or
//! symbols inside a string are never misread.
use crate::{
    error::{CompileResult, LexicalError},
    tokens::{Keyword, Sym, Token, TokenKind},
};

use itertools::{multipeek, MultiPeek};
use std::str::CharIndices;

/// Lexical analyzer.
pub struct Lexer<'a> {
    source: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Scan the whole source and return the ordered token sequence.
    ///
    /// The sequence is complete: the parser never goes back to the source
    /// text, only to the tokens.
    pub fn tokenize(self) -> CompileResult<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut comment: Option<u32> = None;

        for (index, line) in self.source.lines().enumerate() {
            let line_no = index as u32 + 1;
            let mut scanner = LineScanner::new(line, line_no);
            scanner.scan(&mut tokens, &mut comment)?;
        }

        if let Some(line) = comment {
            return Err(LexicalError::UnterminatedComment { line }.into());
        }

        Ok(tokens)
    }
}

/// Scanner for a single source line.
///
/// The `MultiPeek` wrapper buffers lookahead so that `//`, `/*` and `*/`
/// can be distinguished from a lone `/` or `*` without consuming the
/// character that decides it.
struct LineScanner<'a> {
    line: &'a str,
    line_no: u32,
    chars: MultiPeek<CharIndices<'a>>,
}

impl<'a> LineScanner<'a> {
    fn new(line: &'a str, line_no: u32) -> Self {
        Self {
            line,
            line_no,
            chars: multipeek(line.char_indices()),
        }
    }

    /// Scan the line, appending tokens. `comment` holds the line on which
    /// an unclosed block comment opened; the scanner enters and leaves
    /// comment mode through it.
    fn scan(&mut self, tokens: &mut Vec<Token>, comment: &mut Option<u32>) -> CompileResult<()> {
        while let Some((index, c)) = self.chars.next() {
            if comment.is_some() {
                if c == '*' && self.peek_char() == Some('/') {
                    self.chars.next();
                    *comment = None;
                }
                self.chars.reset_peek();
                continue;
            }

            match c {
                ' ' | '\t' | '\r' => continue,
                '"' => tokens.push(self.consume_string(index)?),
                '/' => match self.peek_char() {
                    Some('/') => {
                        // Line comment. The rest of the line is erased.
                        break;
                    }
                    Some('*') => {
                        self.chars.next();
                        *comment = Some(self.line_no);
                    }
                    _ => {
                        self.chars.reset_peek();
                        tokens.push(self.make_symbol(Sym::Slash));
                    }
                },
                '0'..='9' => tokens.push(self.consume_number(index, c)),
                '_' | 'a'..='z' | 'A'..='Z' => tokens.push(self.consume_word(index, c)),
                _ => match Sym::parse(c) {
                    Some(sym) => tokens.push(self.make_symbol(sym)),
                    None => {
                        return Err(LexicalError::UnknownCharacter {
                            character: c,
                            line: self.line_no,
                        }
                        .into())
                    }
                },
            }
        }

        Ok(())
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn make_symbol(&self, sym: Sym) -> Token {
        Token::new(TokenKind::Sym(sym), sym.as_char().to_string(), self.line_no)
    }

    /// Consume a string literal. The quotes are stripped from the stored
    /// text. Strings must close on the line they open.
    fn consume_string(&mut self, open_index: usize) -> CompileResult<Token> {
        let content_start = open_index + 1;

        while let Some((index, c)) = self.chars.next() {
            if c == '"' {
                let text = &self.line[content_start..index];
                return Ok(Token::new(TokenKind::Str, text, self.line_no));
            }
        }

        Err(LexicalError::UnterminatedString { line: self.line_no }.into())
    }

    /// Consume a decimal integer literal. Range checking is the
    /// validator's job, done when the parser consumes the token.
    fn consume_number(&mut self, start: usize, first: char) -> Token {
        let end = self.consume_while(start + first.len_utf8(), is_digit);
        Token::new(TokenKind::Int, &self.line[start..end], self.line_no)
    }

    /// Consume an identifier-shaped word. If the fragment is in the
    /// reserved set it becomes a keyword token instead.
    fn consume_word(&mut self, start: usize, first: char) -> Token {
        let end = self.consume_while(start + first.len_utf8(), is_word);
        let fragment = &self.line[start..end];

        match Keyword::parse(fragment) {
            Some(keyword) => Token::new(TokenKind::Keyword(keyword), fragment, self.line_no),
            None => Token::new(TokenKind::Ident, fragment, self.line_no),
        }
    }

    fn consume_while(&mut self, mut end: usize, pred: fn(char) -> bool) -> usize {
        self.chars.reset_peek();

        while let Some((index, c)) = self.chars.peek().cloned() {
            if pred(c) {
                self.chars.next();
                end = index + c.len_utf8();
            } else {
                break;
            }
        }

        self.chars.reset_peek();
        end
    }
}

#[allow(clippy::manual_is_ascii_check)] // consistency with is_word
fn is_digit(c: char) -> bool {
    matches!(c, '0'..='9')
}

fn is_word(c: char) -> bool {
    matches!(c, '_' | 'a'..='z' | 'A'..='Z' | '0'..='9')
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::CompileError;

    fn kinds(source: &str) -> Vec<Token> {
        Lexer::new(source).tokenize().unwrap()
    }

    #[test]
    fn test_minimal_class() {
        let tokens = kinds("class Main { function void main() { return; } }");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();

        assert_eq!(
            texts,
            vec!["class", "Main", "{", "function", "void", "main", "(", ")", "{", "return", ";", "}", "}"]
        );
        assert_eq!(tokens.len(), 13);
        assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Class));
        assert_eq!(tokens[1].kind, TokenKind::Ident);
        assert_eq!(tokens[2].kind, TokenKind::Sym(Sym::LeftBrace));
    }

    #[test]
    fn test_string_shields_comment_markers() {
        let tokens = kinds("let s = \"a // b /* c */ <d>\";");

        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[3].kind, TokenKind::Str);
        assert_eq!(tokens[3].text.as_str(), "a // b /* c */ <d>");
        assert_eq!(tokens[4].kind, TokenKind::Sym(Sym::Semicolon));
    }

    #[test]
    fn test_line_comment_erases_rest_of_line() {
        let tokens = kinds("return; // the rest is gone ~ !\nlet");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();

        assert_eq!(texts, vec!["return", ";", "let"]);
        assert_eq!(tokens[2].line, 2);
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let source = "var int x; /** doc\n still comment ; let\n end */ var int y;";
        let tokens = kinds(source);
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();

        assert_eq!(texts, vec!["var", "int", "x", ";", "var", "int", "y", ";"]);
        assert_eq!(tokens[4].line, 3);
    }

    #[test]
    fn test_blank_lines_produce_no_tokens() {
        let tokens = kinds("\n   \n\nreturn;\n\n");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].line, 4);
    }

    #[test]
    fn test_integer_and_symbol_adjacency() {
        let tokens = kinds("let a[i-1]=x*2;");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();

        assert_eq!(texts, vec!["let", "a", "[", "i", "-", "1", "]", "=", "x", "*", "2", ";"]);
        assert_eq!(tokens[5].kind, TokenKind::Int);
        assert_eq!(tokens[10].kind, TokenKind::Int);
    }

    #[test]
    fn test_unknown_character() {
        let err = Lexer::new("let x = 1 ? 2;").tokenize().unwrap_err();
        match err {
            CompileError::Lex(LexicalError::UnknownCharacter { character, line }) => {
                assert_eq!(character, '?');
                assert_eq!(line, 1);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("let s = \"no closing quote;").tokenize().unwrap_err();
        assert!(matches!(
            err,
            CompileError::Lex(LexicalError::UnterminatedString { line: 1 })
        ));
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = Lexer::new("return;\n/* still open").tokenize().unwrap_err();
        assert!(matches!(
            err,
            CompileError::Lex(LexicalError::UnterminatedComment { line: 2 })
        ));
    }
}
