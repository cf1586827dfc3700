//! Recursive-descent parser for FUN.
//!
//! Grounded on `examples/original_source/fun_rpython_code/parser.py`:
//! `parse_Prog`/`parse_Defn`/`parse_ParamList`/`parse_Block`/
//! `parse_Block_no_seq`/`parse_Exp`/`parse_Exp_no_seq`/`parse_BExp`/
//! `parse_M`/`parse_L`/`parse_T`/`parse_F`/`parse_ArgList`, including:
//! `L`'s right operand is a full `Exp` (so `+`/`-` admits `if`/sequence on
//! the right, unlike `T`'s right operand which is another `T`); a bare
//! `CONST` token becomes `Var(name)`, the same node a plain identifier
//! becomes, not a dedicated constant-reference node; a bare `skip`
//! identifier not followed by `(` becomes `Call("skip", [])`; and the one
//! bounded-backtracking point, `try_parse_in_expr` inside `parse_Exp`'s
//! semicolon handling — attempt `parse_Exp` after the `;`, and roll the
//! cursor back to treat the `;` as a declaration terminator if that fails.

use crate::cursor::Cursor;
use brz_ast::fun_lang::{BExp, Decl, Exp, Program, TypeName};
use brz_ast::{AOp, CmpOp};
use brz_diagnostic::{BrzError, Span};
use brz_lexer::{FunTokenKind, Token};
use brz_stack::ensure_sufficient_stack;
use std::rc::Rc;

type Cur<'a> = Cursor<'a, FunTokenKind>;

/// Parse a whole FUN source's tokens into a program, failing if any tokens
/// remain unconsumed afterwards.
pub fn parse(tokens: &[Token<FunTokenKind>]) -> Result<Program, BrzError> {
    let mut cursor = Cursor::new(tokens);
    let program = parse_prog(&mut cursor)?;
    if !cursor.is_at_end() {
        return Err(BrzError::extra_tokens(cursor.position(), cursor.current_span()));
    }
    Ok(program)
}

fn match_keyword(cur: &mut Cur<'_>, kw: &str) -> bool {
    match cur.peek() {
        Some(FunTokenKind::Keyword(k)) if k.as_str() == kw => {
            cur.advance();
            true
        }
        _ => false,
    }
}

fn match_op(cur: &mut Cur<'_>, op: &str) -> bool {
    match cur.peek() {
        Some(FunTokenKind::Op(o)) if o.as_str() == op => {
            cur.advance();
            true
        }
        _ => false,
    }
}

macro_rules! match_punct {
    ($name:ident, $variant:ident) => {
        fn $name(cur: &mut Cur<'_>) -> bool {
            if matches!(cur.peek(), Some(FunTokenKind::$variant)) {
                cur.advance();
                true
            } else {
                false
            }
        }
    };
}
match_punct!(match_lparen, LParen);
match_punct!(match_rparen, RParen);
match_punct!(match_lbrace, LBrace);
match_punct!(match_rbrace, RBrace);
match_punct!(match_colon, Colon);
match_punct!(match_comma, Comma);
match_punct!(match_semi, Semi);

fn expect(cur: &mut Cur<'_>, matched: impl FnOnce(&mut Cur<'_>) -> bool, expected: &'static str) -> Result<Span, BrzError> {
    let span = cur.current_span();
    if matched(cur) {
        Ok(span)
    } else {
        Err(BrzError::parse(cur.position(), expected, span))
    }
}

fn expect_id(cur: &mut Cur<'_>) -> Result<(String, Span), BrzError> {
    let span = cur.current_span();
    match cur.peek() {
        Some(FunTokenKind::Id(name)) => {
            let name = name.clone();
            cur.advance();
            Ok((name, span))
        }
        _ => Err(BrzError::parse(cur.position(), "an identifier", span)),
    }
}

fn expect_const(cur: &mut Cur<'_>) -> Result<(String, Span), BrzError> {
    let span = cur.current_span();
    match cur.peek() {
        Some(FunTokenKind::Const(name)) => {
            let name = name.clone();
            cur.advance();
            Ok((name, span))
        }
        _ => Err(BrzError::parse(cur.position(), "a constant name", span)),
    }
}

fn expect_type(cur: &mut Cur<'_>) -> Result<TypeName, BrzError> {
    let span = cur.current_span();
    match cur.peek() {
        Some(FunTokenKind::Type(t)) => {
            let ty = TypeName::from_lexeme(t)
                .ok_or_else(|| BrzError::parse(cur.position(), "'Int', 'Double', or 'Void'", span))?;
            cur.advance();
            Ok(ty)
        }
        _ => Err(BrzError::parse(cur.position(), "a type name", span)),
    }
}

fn parse_prog(cur: &mut Cur<'_>) -> Result<Program, BrzError> {
    if let Some(defn) = try_parse_defn(cur)? {
        expect(cur, match_semi, "';' after declaration")?;
        let mut rest = parse_prog(cur)?;
        rest.insert(0, defn);
        Ok(rest)
    } else {
        let body = parse_block(cur)?;
        Ok(vec![Decl::Main(body)])
    }
}

fn try_parse_defn(cur: &mut Cur<'_>) -> Result<Option<Decl>, BrzError> {
    if match_keyword(cur, "def") {
        return parse_def(cur).map(Some);
    }
    if match_keyword(cur, "val") {
        return parse_val(cur).map(Some);
    }
    Ok(None)
}

fn parse_def(cur: &mut Cur<'_>) -> Result<Decl, BrzError> {
    let start = cur.current_span();
    let (name, _) = expect_id(cur)?;
    expect(cur, match_lparen, "'(' after a definition's name")?;
    let params = if match_rparen(cur) {
        Vec::new()
    } else {
        let params = parse_param_list(cur)?;
        expect(cur, match_rparen, "')' after a parameter list")?;
        params
    };
    expect(cur, match_colon, "':' after a parameter list")?;
    let ret_type = expect_type(cur)?;
    expect(cur, |c| match_op(c, "="), "'=' after a return type")?;
    let body = parse_block_no_seq(cur)?;
    let span = start.merge(body.span());
    Ok(Decl::Def {
        name,
        params,
        ret_type,
        body,
        span,
    })
}

fn parse_val(cur: &mut Cur<'_>) -> Result<Decl, BrzError> {
    let start = cur.current_span();
    let (name, _) = expect_const(cur)?;
    expect(cur, match_colon, "':' after a constant's name")?;
    let ty = expect_type(cur)?;
    expect(cur, |c| match_op(c, "="), "'=' after a constant's type")?;
    let span_before_lit = cur.current_span();
    match ty {
        TypeName::Int => match cur.peek() {
            Some(FunTokenKind::Int(n)) => {
                let n = *n;
                cur.advance();
                Ok(Decl::Const { name, value: n, span: start.merge(span_before_lit) })
            }
            _ => Err(BrzError::parse(cur.position(), "an integer literal", span_before_lit)),
        },
        TypeName::Double => match cur.peek() {
            Some(FunTokenKind::Double(f)) => {
                let f = *f;
                cur.advance();
                Ok(Decl::FConst { name, value: f, span: start.merge(span_before_lit) })
            }
            _ => Err(BrzError::parse(cur.position(), "a double literal", span_before_lit)),
        },
        TypeName::Void => Err(BrzError::parse(cur.position(), "'Int' or 'Double'", span_before_lit)),
    }
}

fn parse_param_list(cur: &mut Cur<'_>) -> Result<Vec<(String, TypeName)>, BrzError> {
    let mut params = vec![parse_id_type_pair(cur)?];
    while match_comma(cur) {
        params.push(parse_id_type_pair(cur)?);
    }
    Ok(params)
}

fn parse_id_type_pair(cur: &mut Cur<'_>) -> Result<(String, TypeName), BrzError> {
    let (name, _) = expect_id(cur)?;
    expect(cur, match_colon, "':' in a parameter list")?;
    let ty = expect_type(cur)?;
    Ok((name, ty))
}

fn parse_block(cur: &mut Cur<'_>) -> Result<Exp, BrzError> {
    ensure_sufficient_stack(|| {
        if match_lbrace(cur) {
            let exp = parse_exp(cur)?;
            expect(cur, match_rbrace, "'}'")?;
            Ok(exp)
        } else {
            parse_exp(cur)
        }
    })
}

fn parse_block_no_seq(cur: &mut Cur<'_>) -> Result<Exp, BrzError> {
    ensure_sufficient_stack(|| {
        if match_lbrace(cur) {
            let exp = parse_exp(cur)?;
            expect(cur, match_rbrace, "'}'")?;
            Ok(exp)
        } else {
            parse_exp_no_seq(cur)
        }
    })
}

fn parse_exp_no_seq(cur: &mut Cur<'_>) -> Result<Exp, BrzError> {
    let start = cur.current_span();
    if match_keyword(cur, "if") {
        let cond = parse_bexp(cur)?;
        expect(cur, |c| match_keyword(c, "then"), "'then'")?;
        let then_branch = parse_block_no_seq(cur)?;
        expect(cur, |c| match_keyword(c, "else"), "'else'")?;
        let else_branch = parse_block_no_seq(cur)?;
        let span = start.merge(else_branch.span());
        return Ok(Exp::If {
            cond: Rc::new(cond),
            then_branch: Rc::new(then_branch),
            else_branch: Rc::new(else_branch),
            span,
        });
    }
    parse_m(cur)
}

fn parse_bexp(cur: &mut Cur<'_>) -> Result<BExp, BrzError> {
    let lhs = parse_exp(cur)?;
    let op_span = cur.current_span();
    let op = match cur.peek() {
        Some(FunTokenKind::Op(o)) => CmpOp::from_lexeme(o),
        _ => None,
    };
    match op {
        Some(op) => {
            cur.advance();
            let rhs = parse_exp(cur)?;
            let span = lhs.span().merge(rhs.span());
            Ok(BExp { op, lhs, rhs, span })
        }
        None => Err(BrzError::parse(
            cur.position(),
            "a boolean operator (==, !=, <, >, <=, >=)",
            op_span,
        )),
    }
}

fn parse_exp(cur: &mut Cur<'_>) -> Result<Exp, BrzError> {
    let start = cur.current_span();
    if match_keyword(cur, "if") {
        let cond = parse_bexp(cur)?;
        expect(cur, |c| match_keyword(c, "then"), "'then'")?;
        let then_branch = parse_block(cur)?;
        expect(cur, |c| match_keyword(c, "else"), "'else'")?;
        let else_branch = parse_block(cur)?;
        let span = start.merge(else_branch.span());
        return Ok(Exp::If {
            cond: Rc::new(cond),
            then_branch: Rc::new(then_branch),
            else_branch: Rc::new(else_branch),
            span,
        });
    }

    let m = parse_m(cur)?;
    if matches!(cur.peek(), Some(FunTokenKind::Semi)) {
        let saved = cur.position();
        cur.advance();
        match parse_exp(cur) {
            Ok(next) => {
                let span = m.span().merge(next.span());
                Ok(Exp::Sequence {
                    first: Rc::new(m),
                    second: Rc::new(next),
                    span,
                })
            }
            Err(_) => {
                cur.set_position(saved);
                Ok(m)
            }
        }
    } else {
        Ok(m)
    }
}

fn parse_m(cur: &mut Cur<'_>) -> Result<Exp, BrzError> {
    let start = cur.current_span();
    if matches!(cur.peek(), Some(FunTokenKind::Id(name)) if name == "print_string") {
        cur.advance();
        expect(cur, match_lparen, "'(' after print_string")?;
        let (text, _) = expect_str(cur)?;
        let end = expect(cur, match_rparen, "')' after print_string's argument")?;
        return Ok(Exp::PrintString { text, span: start.merge(end) });
    }
    parse_l(cur)
}

fn expect_str(cur: &mut Cur<'_>) -> Result<(String, Span), BrzError> {
    let span = cur.current_span();
    match cur.peek() {
        Some(FunTokenKind::Str(s)) => {
            let s = s.clone();
            cur.advance();
            Ok((s, span))
        }
        _ => Err(BrzError::parse(cur.position(), "a string literal", span)),
    }
}

/// `L := T ('+'|'-') Exp | T` — note the right operand is a full `Exp`, not
/// another `L`, so `+`/`-` admits an `if`/sequence on the right.
fn parse_l(cur: &mut Cur<'_>) -> Result<Exp, BrzError> {
    let left = parse_t(cur)?;
    let op = match cur.peek() {
        Some(FunTokenKind::Op(o)) if o == "+" => AOp::Add,
        Some(FunTokenKind::Op(o)) if o == "-" => AOp::Sub,
        _ => return Ok(left),
    };
    cur.advance();
    let right = parse_exp(cur)?;
    let span = left.span().merge(right.span());
    Ok(Exp::Aop { op, lhs: Rc::new(left), rhs: Rc::new(right), span })
}

/// `T := F ('*'|'/'|'%') T | F`.
fn parse_t(cur: &mut Cur<'_>) -> Result<Exp, BrzError> {
    let left = parse_f(cur)?;
    let op = match cur.peek() {
        Some(FunTokenKind::Op(o)) if o == "*" => AOp::Mul,
        Some(FunTokenKind::Op(o)) if o == "/" => AOp::Div,
        Some(FunTokenKind::Op(o)) if o == "%" => AOp::Mod,
        _ => return Ok(left),
    };
    cur.advance();
    let right = parse_t(cur)?;
    let span = left.span().merge(right.span());
    Ok(Exp::Aop { op, lhs: Rc::new(left), rhs: Rc::new(right), span })
}

fn parse_f(cur: &mut Cur<'_>) -> Result<Exp, BrzError> {
    ensure_sufficient_stack(|| {
        let start = cur.current_span();
        match cur.peek() {
            Some(FunTokenKind::Id(name)) => {
                let name = name.clone();
                cur.advance();
                if match_lparen(cur) {
                    if match_rparen(cur) {
                        return Ok(Exp::Call { name, args: Vec::new(), span: start });
                    }
                    let args = parse_arg_list(cur)?;
                    let end = expect(cur, match_rparen, "')' after an argument list")?;
                    Ok(Exp::Call { name, args, span: start.merge(end) })
                } else if name == "skip" {
                    Ok(Exp::Call { name, args: Vec::new(), span: start })
                } else {
                    Ok(Exp::Var(name, start))
                }
            }
            Some(FunTokenKind::Const(name)) => {
                let name = name.clone();
                cur.advance();
                Ok(Exp::Var(name, start))
            }
            Some(FunTokenKind::LParen) => {
                cur.advance();
                let inner = parse_exp(cur)?;
                expect(cur, match_rparen, "')'")?;
                Ok(inner)
            }
            Some(FunTokenKind::Int(n)) => {
                let n = *n;
                cur.advance();
                Ok(Exp::Num(n, start))
            }
            Some(FunTokenKind::Double(f)) => {
                let f = *f;
                cur.advance();
                Ok(Exp::FNum(f, start))
            }
            Some(FunTokenKind::Char(c)) => {
                let c = *c;
                cur.advance();
                Ok(Exp::ChConst(c, start))
            }
            _ => Err(BrzError::parse(
                cur.position(),
                "a factor (identifier, literal, or '(' expression ')')",
                start,
            )),
        }
    })
}

fn parse_arg_list(cur: &mut Cur<'_>) -> Result<Vec<Rc<Exp>>, BrzError> {
    let mut args = vec![Rc::new(parse_exp(cur)?)];
    while match_comma(cur) {
        args.push(Rc::new(parse_exp(cur)?));
    }
    Ok(args)
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use brz_lexer::lex_fun;

    fn parse_src(src: &str) -> Program {
        let tokens = lex_fun(src).expect("lex should succeed");
        parse(&tokens).expect("parse should succeed")
    }

    #[test]
    fn bare_skip_identifier_becomes_a_call() {
        let program = parse_src("skip");
        match &program[0] {
            Decl::Main(Exp::Call { name, args, .. }) => {
                assert_eq!(name, "skip");
                assert!(args.is_empty());
            }
            other => panic!("expected Main(Call(\"skip\", [])), got {other:?}"),
        }
    }

    #[test]
    fn scenario_factorial_definition() {
        let program = parse_src("def fact(n: Int): Int = if n == 0 then 1 else n * fact(n-1); fact(5)");
        assert_eq!(program.len(), 2);
        assert!(matches!(program[0], Decl::Def { .. }));
        assert!(matches!(program[1], Decl::Main(Exp::Call { .. })));
    }

    #[test]
    fn trailing_semicolon_with_no_continuation_is_not_consumed() {
        let program = parse_src("def f(): Void = skip; skip");
        assert_eq!(program.len(), 2);
        assert!(matches!(program[1], Decl::Main(_)));
    }

    #[test]
    fn semicolon_followed_by_an_expression_becomes_a_sequence() {
        let program = parse_src("print_string(\"a\"); print_string(\"b\")");
        match &program[0] {
            Decl::Main(Exp::Sequence { .. }) => {}
            other => panic!("expected Main(Sequence(..)), got {other:?}"),
        }
    }

    #[test]
    fn constant_reference_parses_as_a_plain_var() {
        let program = parse_src("val LIMIT: Int = 10; LIMIT");
        match &program[1] {
            Decl::Main(Exp::Var(name, _)) => assert_eq!(name, "LIMIT"),
            other => panic!("expected Main(Var(\"LIMIT\")), got {other:?}"),
        }
    }
}
