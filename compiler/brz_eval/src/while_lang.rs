//! WHILE's evaluator: big-step arithmetic/boolean expressions (each over a
//! private postorder stack), small-step worklist over the statement block.
//!
//! Grounded on `while_rpython_code/iterative_jit.py`'s
//! `eval_aexp_iterative`/`eval_bexp_iterative`/`run_program_iterative`
//! (the JIT-driver plumbing itself has no counterpart here — that is the
//! RPython toolchain's own translation hook, not language semantics).

use crate::environment::Environment;
use crate::text::strip_quotes_and_unescape;
use crate::value::Value;
use brz_ast::while_lang::{AExp, BExp, Block, Stmt};
use brz_ast::{AOp, CmpOp, LogOp};
use brz_diagnostic::BrzError;
use std::io::{BufRead, Write};
use tracing::debug;

/// Evaluate an arithmetic expression over an explicit postorder stack so
/// that deeply nested parenthesised expressions do not recurse once per
/// operator.
fn eval_aexp(aexp: &AExp, env: &Environment) -> Result<i64, BrzError> {
    enum Frame<'a> {
        Visit(&'a AExp),
        Apply(AOp),
    }

    let mut work = vec![Frame::Visit(aexp)];
    let mut results: Vec<i64> = Vec::new();

    while let Some(frame) = work.pop() {
        match frame {
            Frame::Visit(AExp::Var(name, _)) => match env.get(name) {
                Some(Value::Int(i)) => results.push(i),
                Some(_) => return Err(BrzError::type_error("arithmetic expression")),
                None => return Err(BrzError::undefined_name(name.clone())),
            },
            Frame::Visit(AExp::Num(n, _)) => results.push(*n),
            Frame::Visit(AExp::Aop { op, lhs, rhs, .. }) => {
                work.push(Frame::Apply(*op));
                work.push(Frame::Visit(rhs));
                work.push(Frame::Visit(lhs));
            }
            Frame::Apply(op) => {
                let (Some(right), Some(left)) = (results.pop(), results.pop()) else {
                    unreachable!("Aop always pushes both operands before its own Apply frame");
                };
                let value = match op {
                    AOp::Add => left.wrapping_add(right),
                    AOp::Sub => left.wrapping_sub(right),
                    AOp::Mul => left.wrapping_mul(right),
                    AOp::Div => {
                        if right == 0 {
                            return Err(BrzError::divide_by_zero());
                        }
                        floor_div(left, right)
                    }
                    AOp::Mod => {
                        if right == 0 {
                            return Err(BrzError::divide_by_zero());
                        }
                        floor_mod(left, right)
                    }
                };
                results.push(value);
            }
        }
    }

    debug_assert_eq!(results.len(), 1, "arithmetic evaluation must leave exactly one result");
    Ok(results[0])
}

/// Floored division, matching Python's `//`: rounds toward negative
/// infinity rather than toward zero.
fn floor_div(l: i64, r: i64) -> i64 {
    let q = l.wrapping_div(r);
    let rem = l.wrapping_rem(r);
    if (rem != 0) && ((rem < 0) != (r < 0)) {
        q - 1
    } else {
        q
    }
}

/// Floored modulo, matching Python's `%`: the remainder takes the sign of
/// the divisor rather than the dividend.
fn floor_mod(l: i64, r: i64) -> i64 {
    let rem = l.wrapping_rem(r);
    if (rem != 0) && ((rem < 0) != (r < 0)) {
        rem + r
    } else {
        rem
    }
}

/// Evaluate a boolean expression. Comparisons delegate their operands to
/// [`eval_aexp`]; `&&`/`||` are themselves folded over a postorder stack.
fn eval_bexp(bexp: &BExp, env: &Environment) -> Result<bool, BrzError> {
    enum Frame<'a> {
        Visit(&'a BExp),
        Apply(LogOp),
    }

    let mut work = vec![Frame::Visit(bexp)];
    let mut results: Vec<bool> = Vec::new();

    while let Some(frame) = work.pop() {
        match frame {
            Frame::Visit(BExp::True(_)) => results.push(true),
            Frame::Visit(BExp::False(_)) => results.push(false),
            Frame::Visit(BExp::Bop { op, lhs, rhs, .. }) => {
                let left = eval_aexp(lhs, env)?;
                let right = eval_aexp(rhs, env)?;
                let value = match op {
                    CmpOp::Eq => left == right,
                    CmpOp::Ne => left != right,
                    CmpOp::Lt => left < right,
                    CmpOp::Gt => left > right,
                    CmpOp::Le => left <= right,
                    CmpOp::Ge => left >= right,
                };
                results.push(value);
            }
            Frame::Visit(BExp::Lop { op, lhs, rhs, .. }) => {
                work.push(Frame::Apply(*op));
                work.push(Frame::Visit(rhs));
                work.push(Frame::Visit(lhs));
            }
            Frame::Apply(op) => {
                let (Some(right), Some(left)) = (results.pop(), results.pop()) else {
                    unreachable!("Lop always pushes both operands before its own Apply frame");
                };
                results.push(match op {
                    LogOp::And => left && right,
                    LogOp::Or => left || right,
                });
            }
        }
    }

    debug_assert_eq!(results.len(), 1, "boolean evaluation must leave exactly one result");
    Ok(results[0])
}

/// Run a WHILE block to completion, threading `env` by in-place mutation
/// (a conforming alternative to the source's copy-on-write map, per the
/// spec: external observability is identical since every read sees the
/// latest binding either way).
///
/// The statement worklist is a `VecDeque` so `If`/`While` can prepend a
/// branch or `body ++ [self]` without shifting the whole remaining
/// program, unlike the source's `list.pop(0)`/list-concatenation, which
/// is O(n) per step in a systems language.
pub fn run(block: &Block, env: &Environment, input: &mut impl BufRead, output: &mut impl Write) -> Result<(), BrzError> {
    let mut worklist: std::collections::VecDeque<Stmt> = block.iter().cloned().collect();

    while let Some(stmt) = worklist.pop_front() {
        debug!(stmt = ?stmt, "executing statement");
        match stmt {
            Stmt::Skip(_) => {}
            Stmt::Assign { name, value, .. } => {
                let v = eval_aexp(&value, env)?;
                env.set(name, Value::Int(v));
            }
            Stmt::Read { name, .. } => {
                let mut line = String::new();
                input
                    .read_line(&mut line)
                    .map_err(|e| BrzError::io(e.to_string()))?;
                let trimmed = line.trim_end_matches(['\n', '\r']);
                let value: i64 = trimmed
                    .parse()
                    .map_err(|_| BrzError::io(format!("input is not a valid integer: {trimmed}")))?;
                env.set(name, Value::Int(value));
            }
            Stmt::WriteId { name, .. } => {
                let value = env.get(&name).ok_or_else(|| BrzError::undefined_name(name.clone()))?;
                let Value::Int(i) = value else {
                    return Err(BrzError::type_error("write"));
                };
                output
                    .write_all(i.to_string().as_bytes())
                    .map_err(|e| BrzError::io(e.to_string()))?;
            }
            Stmt::WriteString { text, .. } => {
                let text = strip_quotes_and_unescape(&text);
                output.write_all(text.as_bytes()).map_err(|e| BrzError::io(e.to_string()))?;
            }
            Stmt::If { cond, then_block, else_block, .. } => {
                let branch = if eval_bexp(&cond, env)? { then_block } else { else_block };
                for s in branch.into_iter().rev() {
                    worklist.push_front(s);
                }
            }
            Stmt::While { cond, body, span } => {
                if eval_bexp(&cond, env)? {
                    worklist.push_front(Stmt::While { cond, body: body.clone(), span });
                    for s in body.into_iter().rev() {
                        worklist.push_front(s);
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use brz_lexer::lex_while;
    use brz_parse::parse_while;
    use std::io::Cursor;

    fn run_src(src: &str, stdin: &str) -> (Environment, String) {
        let tokens = lex_while(src).expect("lex should succeed");
        let block = parse_while(&tokens).expect("parse should succeed");
        let env = Environment::new();
        let mut input = Cursor::new(stdin.as_bytes().to_vec());
        let mut output = Vec::new();
        run(&block, &env, &mut input, &mut output).expect("eval should succeed");
        (env, String::from_utf8(output).expect("output is UTF-8"))
    }

    #[test]
    fn scenario_while_counts_to_five() {
        let (env, stdout) = run_src("x := 1; while x < 5 do { x := x + 1 }; write x", "");
        assert_eq!(stdout, "5");
        assert!(matches!(env.get("x"), Some(Value::Int(5))));
    }

    #[test]
    fn scenario_if_else_with_strings() {
        let (_, stdout) = run_src(r#"if 1 == 2 then { write "a" } else { write "b" }"#, "");
        assert_eq!(stdout, "b");
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let tokens = lex_while("x := 1 / 0").expect("lex should succeed");
        let block = parse_while(&tokens).expect("parse should succeed");
        let env = Environment::new();
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        assert!(run(&block, &env, &mut input, &mut output).is_err());
    }

    #[test]
    fn read_binds_an_integer_from_stdin() {
        let (env, _) = run_src("read x", "42\n");
        assert!(matches!(env.get("x"), Some(Value::Int(42))));
    }
}
