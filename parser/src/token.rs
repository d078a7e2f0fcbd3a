//! The owned token queue a parse call consumes.
//!
//! One queue exists per parse call. The engine pops from the front; the
//! expander pushes derived tokens back onto the front so they are consumed
//! next. Nothing else reads or writes it.

use std::collections::VecDeque;

/// How a token entered the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Taken verbatim from the input.
    Surface,
    /// Value split off its option (`--name=value`, `-xvalue`).
    Attached,
    /// Trailing piece of a comma-split value.
    Continuation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) text: String,
    pub(crate) kind: TokenKind,
}

impl Token {
    pub(crate) fn surface(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: TokenKind::Surface,
        }
    }

    pub(crate) fn attached(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: TokenKind::Attached,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct TokenQueue {
    tokens: VecDeque<Token>,
}

impl TokenQueue {
    pub(crate) fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: args.into_iter().map(Token::surface).collect(),
        }
    }

    pub(crate) fn pop(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }

    pub(crate) fn push_front(&mut self, token: Token) {
        self.tokens.push_front(token);
    }

    /// Pushes `pieces` back as continuations so they pop in their original
    /// order.
    pub(crate) fn push_continuations(&mut self, pieces: Vec<String>) {
        for text in pieces.into_iter().rev() {
            self.tokens.push_front(Token {
                text,
                kind: TokenKind::Continuation,
            });
        }
    }

    /// Pops the front token only if it is a continuation.
    pub(crate) fn pop_continuation(&mut self) -> Option<Token> {
        match self.tokens.front() {
            Some(token) if token.kind == TokenKind::Continuation => self.tokens.pop_front(),
            _ => None,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tokens.len()
    }
}
