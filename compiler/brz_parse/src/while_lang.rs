//! Recursive-descent parser for WHILE.
//!
//! Grounded on `examples/original_source/rpython_code/parser.py`: the
//! grammar shape, the `parse_aexp`/`parse_te`/`parse_fa` precedence chain
//! (both binary-operator loops are left-associative iterations over the one
//! tighter-binding production, despite `parse_te`'s own docstring reading as
//! right-recursive — the code it documents loops exactly like
//! `parse_aexp`), and `parse_bexp`'s try-AExp-relop-AExp-first-then-fall-back
//! shape, which is this parser's one other backtracking point besides FUN's
//! `M ';' Exp` (bounded the same way: attempt `parse_aexp`, and on failure
//! treat `left` as absent rather than propagating the error).

use crate::cursor::Cursor;
use brz_ast::while_lang::{AExp, BExp, Block, Stmt};
use brz_ast::{AOp, CmpOp, LogOp};
use brz_diagnostic::{BrzError, Span};
use brz_lexer::{Token, WhileTokenKind};
use brz_stack::ensure_sufficient_stack;

type Cur<'a> = Cursor<'a, WhileTokenKind>;

/// Parse a whole WHILE source's tokens into a block, failing if any tokens
/// remain unconsumed afterwards.
pub fn parse(tokens: &[Token<WhileTokenKind>]) -> Result<Block, BrzError> {
    let mut cursor = Cursor::new(tokens);
    let block = parse_stmts(&mut cursor)?;
    if !cursor.is_at_end() {
        return Err(BrzError::extra_tokens(cursor.position(), cursor.current_span()));
    }
    Ok(block)
}

fn match_keyword(cur: &mut Cur<'_>, kw: &str) -> bool {
    match cur.peek() {
        Some(WhileTokenKind::Keyword(k)) if k.as_str() == kw => {
            cur.advance();
            true
        }
        _ => false,
    }
}

fn match_op(cur: &mut Cur<'_>, op: &str) -> bool {
    match cur.peek() {
        Some(WhileTokenKind::Op(o)) if o.as_str() == op => {
            cur.advance();
            true
        }
        _ => false,
    }
}

fn match_paren(cur: &mut Cur<'_>, paren: &str) -> bool {
    match cur.peek() {
        Some(WhileTokenKind::Paren(p)) if p.as_str() == paren => {
            cur.advance();
            true
        }
        _ => false,
    }
}

fn match_semi(cur: &mut Cur<'_>) -> bool {
    match cur.peek() {
        Some(WhileTokenKind::Semi) => {
            cur.advance();
            true
        }
        _ => false,
    }
}

fn expect_keyword(cur: &mut Cur<'_>, kw: &'static str) -> Result<Span, BrzError> {
    let span = cur.current_span();
    if match_keyword(cur, kw) {
        Ok(span)
    } else {
        Err(BrzError::parse(cur.position(), kw, span))
    }
}

fn expect_paren(cur: &mut Cur<'_>, paren: &'static str) -> Result<Span, BrzError> {
    let span = cur.current_span();
    if match_paren(cur, paren) {
        Ok(span)
    } else {
        Err(BrzError::parse(cur.position(), paren, span))
    }
}

fn expect_id(cur: &mut Cur<'_>) -> Result<(String, Span), BrzError> {
    let span = cur.current_span();
    match cur.peek() {
        Some(WhileTokenKind::Id(name)) => {
            let name = name.clone();
            cur.advance();
            Ok((name, span))
        }
        _ => Err(BrzError::parse(cur.position(), "an identifier", span)),
    }
}

fn parse_stmts(cur: &mut Cur<'_>) -> Result<Block, BrzError> {
    let mut block = vec![parse_stmt(cur)?];
    while match_semi(cur) {
        block.push(parse_stmt(cur)?);
    }
    Ok(block)
}

fn parse_block(cur: &mut Cur<'_>) -> Result<Block, BrzError> {
    ensure_sufficient_stack(|| {
        if match_paren(cur, "{") {
            let stmts = parse_stmts(cur)?;
            expect_paren(cur, "}")?;
            Ok(stmts)
        } else {
            Ok(vec![parse_stmt(cur)?])
        }
    })
}

fn parse_stmt(cur: &mut Cur<'_>) -> Result<Stmt, BrzError> {
    let start = cur.current_span();

    if match_keyword(cur, "skip") {
        return Ok(Stmt::Skip(start));
    }

    if matches!(cur.peek(), Some(WhileTokenKind::Id(_))) {
        let (name, _) = expect_id(cur)?;
        if !match_op(cur, ":=") {
            return Err(BrzError::parse(cur.position(), "':=' after identifier", cur.current_span()));
        }
        let value = parse_aexp(cur)?;
        let span = start.merge(value.span());
        return Ok(Stmt::Assign { name, value, span });
    }

    if match_keyword(cur, "if") {
        let cond = parse_bexp(cur)?;
        expect_keyword(cur, "then")?;
        let then_block = parse_block(cur)?;
        expect_keyword(cur, "else")?;
        let else_block = parse_block(cur)?;
        let span = start.merge(cur.current_span());
        return Ok(Stmt::If {
            cond,
            then_block,
            else_block,
            span,
        });
    }

    if match_keyword(cur, "while") {
        let cond = parse_bexp(cur)?;
        expect_keyword(cur, "do")?;
        let body = parse_block(cur)?;
        let span = start.merge(cur.current_span());
        return Ok(Stmt::While { cond, body, span });
    }

    if match_keyword(cur, "read") {
        let (name, id_span) = expect_id(cur)?;
        return Ok(Stmt::Read {
            name,
            span: start.merge(id_span),
        });
    }

    if match_keyword(cur, "write") {
        return parse_write_target(cur, start);
    }

    Err(BrzError::parse(cur.position(), "a statement", start))
}

/// The four `write` forms: bare `ID`/`STRING`, or either wrapped in parens.
fn parse_write_target(cur: &mut Cur<'_>, start: Span) -> Result<Stmt, BrzError> {
    if let Some(WhileTokenKind::Id(_)) = cur.peek() {
        let (name, span) = expect_id(cur)?;
        return Ok(Stmt::WriteId { name, span: start.merge(span) });
    }
    if let Some(WhileTokenKind::Str(_)) = cur.peek() {
        let (text, span) = expect_str(cur)?;
        return Ok(Stmt::WriteString { text, span: start.merge(span) });
    }
    if match_paren(cur, "(") {
        if let Some(WhileTokenKind::Id(_)) = cur.peek() {
            let (name, _) = expect_id(cur)?;
            let end = expect_paren(cur, ")")?;
            return Ok(Stmt::WriteId { name, span: start.merge(end) });
        }
        if let Some(WhileTokenKind::Str(_)) = cur.peek() {
            let (text, _) = expect_str(cur)?;
            let end = expect_paren(cur, ")")?;
            return Ok(Stmt::WriteString { text, span: start.merge(end) });
        }
        return Err(BrzError::parse(
            cur.position(),
            "an identifier or string inside 'write(...)'",
            cur.current_span(),
        ));
    }
    Err(BrzError::parse(
        cur.position(),
        "an identifier, string, or '(' after 'write'",
        cur.current_span(),
    ))
}

fn expect_str(cur: &mut Cur<'_>) -> Result<(String, Span), BrzError> {
    let span = cur.current_span();
    match cur.peek() {
        Some(WhileTokenKind::Str(s)) => {
            let s = s.clone();
            cur.advance();
            Ok((s, span))
        }
        _ => Err(BrzError::parse(cur.position(), "a string literal", span)),
    }
}

fn parse_aexp(cur: &mut Cur<'_>) -> Result<AExp, BrzError> {
    let mut left = parse_te(cur)?;
    loop {
        let op = match cur.peek() {
            Some(WhileTokenKind::Op(o)) if o == "+" => AOp::Add,
            Some(WhileTokenKind::Op(o)) if o == "-" => AOp::Sub,
            _ => break,
        };
        cur.advance();
        let right = parse_te(cur)?;
        let span = left.span().merge(right.span());
        left = AExp::Aop {
            op,
            lhs: Box::new(left),
            rhs: Box::new(right),
            span,
        };
    }
    Ok(left)
}

fn parse_te(cur: &mut Cur<'_>) -> Result<AExp, BrzError> {
    let mut left = parse_fa(cur)?;
    loop {
        let op = match cur.peek() {
            Some(WhileTokenKind::Op(o)) if o == "*" => AOp::Mul,
            Some(WhileTokenKind::Op(o)) if o == "/" => AOp::Div,
            Some(WhileTokenKind::Op(o)) if o == "%" => AOp::Mod,
            _ => break,
        };
        cur.advance();
        let right = parse_fa(cur)?;
        let span = left.span().merge(right.span());
        left = AExp::Aop {
            op,
            lhs: Box::new(left),
            rhs: Box::new(right),
            span,
        };
    }
    Ok(left)
}

fn parse_fa(cur: &mut Cur<'_>) -> Result<AExp, BrzError> {
    ensure_sufficient_stack(|| {
        let start = cur.current_span();
        if match_paren(cur, "(") {
            let node = parse_aexp(cur)?;
            expect_paren(cur, ")")?;
            return Ok(node);
        }
        match cur.peek() {
            Some(WhileTokenKind::Id(name)) => {
                let name = name.clone();
                cur.advance();
                Ok(AExp::Var(name, start))
            }
            Some(WhileTokenKind::Num(n)) => {
                let n = *n;
                cur.advance();
                Ok(AExp::Num(n, start))
            }
            _ => Err(BrzError::parse(
                cur.position(),
                "'(', an identifier, or a number",
                start,
            )),
        }
    })
}

fn parse_bexp(cur: &mut Cur<'_>) -> Result<BExp, BrzError> {
    let start = cur.current_span();
    let saved = cur.position();

    // Try `AExp relop AExp` first; roll back on failure rather than
    // propagating the error, exactly as the source's try/except does.
    if let Ok(left) = parse_aexp(cur) {
        if let Some(WhileTokenKind::Op(o)) = cur.peek() {
            if let Some(op) = CmpOp::from_lexeme(o) {
                cur.advance();
                let right = parse_aexp(cur)?;
                let span = left.span().merge(right.span());
                return Ok(BExp::Bop { op, lhs: left, rhs: right, span });
            }
        }
    }
    cur.set_position(saved);

    if match_paren(cur, "(") {
        let inner = ensure_sufficient_stack(|| parse_bexp(cur))?;
        expect_paren(cur, ")")?;
        if let Some(WhileTokenKind::Op(o)) = cur.peek() {
            if let Some(op) = LogOp::from_lexeme(o) {
                cur.advance();
                let right = parse_bexp(cur)?;
                let span = start.merge(right.span());
                return Ok(BExp::Lop {
                    op,
                    lhs: Box::new(inner),
                    rhs: Box::new(right),
                    span,
                });
            }
        }
        return Ok(inner);
    }

    if match_keyword(cur, "true") {
        return Ok(BExp::True(start));
    }
    if match_keyword(cur, "false") {
        return Ok(BExp::False(start));
    }

    Err(BrzError::parse(cur.position(), "a boolean expression", start))
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use brz_lexer::lex_while;

    fn parse_src(src: &str) -> Block {
        let tokens = lex_while(src).expect("lex should succeed");
        parse(&tokens).expect("parse should succeed")
    }

    #[test]
    fn addition_is_left_associative() {
        let block = parse_src("x := a + b + c");
        match &block[0] {
            Stmt::Assign { value, .. } => match value {
                AExp::Aop { op: AOp::Add, lhs, .. } => {
                    assert!(matches!(**lhs, AExp::Aop { op: AOp::Add, .. }));
                }
                other => panic!("expected outer Aop(Add), got {other:?}"),
            },
            other => panic!("expected Assign, got {other:?}"),
        }
    }

    #[test]
    fn scenario_while_counts_to_five() {
        let block = parse_src("x := 1; while x < 5 do { x := x + 1 }; write x");
        assert_eq!(block.len(), 3);
        assert!(matches!(block[1], Stmt::While { .. }));
        assert!(matches!(block[2], Stmt::WriteId { .. }));
    }

    #[test]
    fn scenario_if_else_with_strings() {
        let block = parse_src(r#"if 1 == 2 then { write "a" } else { write "b" }"#);
        match &block[0] {
            Stmt::If { then_block, else_block, .. } => {
                assert!(matches!(then_block[0], Stmt::WriteString { .. }));
                assert!(matches!(else_block[0], Stmt::WriteString { .. }));
            }
            other => panic!("expected If, got {other:?}"),
        }
    }

    #[test]
    fn parenthesised_bexp_with_logical_and() {
        let block = parse_src("if (1 == 1) && (2 == 2) then { skip } else { skip }");
        assert!(matches!(
            block[0],
            Stmt::If {
                cond: BExp::Lop { op: LogOp::And, .. },
                ..
            }
        ));
    }

    #[test]
    fn trailing_semicolon_without_a_statement_is_a_parse_error() {
        let tokens = lex_while("skip;").expect("lex should succeed");
        assert!(parse(&tokens).is_err());
    }

    #[test]
    fn extra_tokens_after_a_full_parse_are_rejected() {
        let tokens = lex_while("skip skip").expect("lex should succeed");
        assert!(parse(&tokens).is_err());
    }
}
