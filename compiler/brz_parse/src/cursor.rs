//! Token cursor shared by the WHILE and FUN parsers.
//!
//! Grounded on `ori_parse::cursor::Cursor`'s snapshot/restore shape: a bare
//! `usize` position is the whole snapshot, so the one bounded-backtracking
//! point in the FUN grammar (`M ';' Exp`) just saves and restores `position()`
//! rather than needing a dedicated snapshot type.

use brz_diagnostic::Span;
use brz_lexer::Token;

/// A read-only view over a token slice with a movable position.
pub struct Cursor<'a, K> {
    tokens: &'a [Token<K>],
    pos: usize,
}

impl<'a, K> Cursor<'a, K> {
    pub fn new(tokens: &'a [Token<K>]) -> Self {
        Cursor { tokens, pos: 0 }
    }

    /// Current position in the token stream.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Restore a position saved by `position()`.
    ///
    /// # Panics
    /// Panics if `pos` is greater than the token count.
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        debug_assert!(pos <= self.tokens.len(), "cursor position out of bounds");
        self.pos = pos;
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Total number of tokens in the stream.
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// The current token's kind, or `None` past the end of the stream.
    #[inline]
    pub fn peek(&self) -> Option<&'a K> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    /// The span of the current token, or a zero-length span just past the
    /// last token's end if the stream is exhausted.
    pub fn current_span(&self) -> Span {
        match self.tokens.get(self.pos) {
            Some(tok) => tok.span,
            None => match self.tokens.last() {
                Some(last) => Span::point(last.span.end),
                None => Span::DUMMY,
            },
        }
    }

    /// Consume and return the current token, advancing the cursor.
    #[inline]
    pub fn advance(&mut self) -> Option<&'a Token<K>> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brz_lexer::WhileTokenKind;

    fn token(kind: WhileTokenKind) -> Token<WhileTokenKind> {
        Token::new(kind, Span::DUMMY)
    }

    #[test]
    fn snapshot_restore_rewinds_the_position() {
        let tokens = vec![
            token(WhileTokenKind::Id("a".into())),
            token(WhileTokenKind::Semi),
            token(WhileTokenKind::Id("b".into())),
        ];
        let mut cursor = Cursor::new(&tokens);
        cursor.advance();
        let saved = cursor.position();
        cursor.advance();
        cursor.advance();
        assert!(cursor.is_at_end());
        cursor.set_position(saved);
        assert!(!cursor.is_at_end());
        assert_eq!(cursor.peek(), Some(&WhileTokenKind::Semi));
    }
}
