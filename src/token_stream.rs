//! Buffered stream of tokens for look ahead.
use crate::tokens::Token;

/// Read-only cursor over the materialized token sequence.
///
/// The cursor starts on the first token. `advance` moves it forward and is
/// a no-op once the last token is reached; `peek_next` looks one token
/// ahead without moving. One token of lookahead is all the grammar needs.
pub struct TokenStream {
    tokens: Vec<Token>,
    cursor: usize,
}

impl TokenStream {
    #[inline]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, cursor: 0 }
    }

    /// Indicates whether a token exists beyond the cursor.
    #[inline]
    pub fn has_next(&self) -> bool {
        self.cursor + 1 < self.tokens.len()
    }

    /// Move the cursor to the next token, if there is one.
    #[inline]
    pub fn advance(&mut self) {
        if self.has_next() {
            self.cursor += 1;
        } else {
            // Park the cursor one past the end so `current` reports
            // exhaustion instead of returning the last token forever.
            self.cursor = self.tokens.len();
        }
    }

    /// The token under the cursor.
    #[inline]
    pub fn current(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    /// The token after the cursor, without moving it.
    #[inline]
    pub fn peek_next(&self) -> Option<&Token> {
        self.tokens.get(self.cursor + 1)
    }

    /// All tokens, for the trace writers.
    #[inline]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}
