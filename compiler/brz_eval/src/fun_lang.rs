//! FUN's evaluator: an explicit frame stack standing in for the host call
//! stack, so that recursive FUN programs do not recurse once per FUN call
//! on the way down to `brzc`'s own process stack.
//!
//! Grounded on `fun_rpython_code/iterative_eval.py`'s `iterative_eval`
//! (frame tuples `('aop', ...)`, `('aop_apply', ...)`, `('bop', ...)`,
//! `('if', ...)`, `('sequence', ...)`, `('call', ...)`) and `eval_decl`'s
//! `Def`-binds-`None`-then-rebinds-to-`Closure` two-step for mutual
//! recursion between sibling declarations.

use crate::environment::Environment;
use crate::text::strip_quotes_and_unescape;
use crate::value::Value;
use brz_ast::fun_lang::{BExp, Decl, Exp, Program};
use brz_ast::AOp;
use brz_diagnostic::BrzError;
use std::io::Write;
use std::rc::Rc;
use tracing::debug;

const BUILTINS: [&str; 6] = ["skip", "print_int", "print_char", "print_space", "print_star", "new_line"];

fn builtin_env() -> Environment {
    let env = Environment::new();
    for name in BUILTINS {
        env.set(name, Value::Builtin(name));
    }
    env
}

enum Frame {
    Aop(AOp, Rc<Exp>, Environment),
    AopApply(AOp, Value),
    If(Rc<Exp>, Rc<Exp>, Environment),
    Sequence(Rc<Exp>, Environment),
    /// Partial call: remaining argument expressions, already-evaluated
    /// arguments so far, and the environment to evaluate the next one in.
    Call(String, Vec<Rc<Exp>>, usize, Vec<Value>, Environment),
}

/// Evaluate one expression to a value, driving the loop with an explicit
/// frame stack instead of host recursion. `exp`'s recursive children are
/// all `Rc`-linked, so descending into a subexpression is a pointer clone,
/// never a subtree copy; only this entry point pays for wrapping the root
/// in an `Rc`, and that wrap is itself shallow for the same reason.
fn eval(exp: &Exp, env: &Environment, output: &mut impl Write) -> Result<Value, BrzError> {
    let mut stack: Vec<Frame> = Vec::new();
    let mut current_expr: Option<Rc<Exp>> = Some(Rc::new(exp.clone()));
    let mut current_env = env.clone();
    let mut current_result = Value::None;

    loop {
        if let Some(expr) = current_expr.take() {
            match expr.as_ref() {
                Exp::Num(n, _) => current_result = Value::Int(*n),
                Exp::FNum(f, _) => current_result = Value::Float(*f),
                Exp::ChConst(c, _) => current_result = Value::Int(i64::from(*c)),
                Exp::Var(name, _) => {
                    current_result = current_env
                        .get(name)
                        .ok_or_else(|| BrzError::undefined_name(name.clone()))?;
                }
                Exp::Aop { op, lhs, rhs, .. } => {
                    stack.push(Frame::Aop(*op, Rc::clone(rhs), current_env.clone()));
                    current_expr = Some(Rc::clone(lhs));
                    continue;
                }
                Exp::If { cond, then_branch, else_branch, .. } => {
                    let cond_value = eval_bexp(cond.as_ref(), &current_env, output)?;
                    stack.push(Frame::If(Rc::clone(then_branch), Rc::clone(else_branch), current_env.clone()));
                    current_result = Value::Int(i64::from(cond_value));
                    continue;
                }
                Exp::Sequence { first, second, .. } => {
                    stack.push(Frame::Sequence(Rc::clone(second), current_env.clone()));
                    current_expr = Some(Rc::clone(first));
                    continue;
                }
                Exp::PrintString { text, .. } => {
                    let text = strip_quotes_and_unescape(text);
                    output.write_all(text.as_bytes()).map_err(|e| BrzError::io(e.to_string()))?;
                    current_result = Value::None;
                }
                Exp::Call { name, args, .. } => {
                    if let Some(first) = args.first() {
                        stack.push(Frame::Call(name.clone(), args.clone(), 0, Vec::new(), current_env.clone()));
                        current_expr = Some(Rc::clone(first));
                        continue;
                    }
                    match resolve_call(name, Vec::new(), &current_env, output)? {
                        CallOutcome::Value(v) => current_result = v,
                        CallOutcome::Enter(body, call_env) => {
                            current_expr = Some(body);
                            current_env = call_env;
                            continue;
                        }
                    }
                }
            }
        }

        let Some(frame) = stack.pop() else {
            return Ok(current_result);
        };

        match frame {
            Frame::Aop(op, right_expr, saved_env) => {
                stack.push(Frame::AopApply(op, current_result.clone()));
                current_expr = Some(right_expr);
                current_env = saved_env;
            }
            Frame::AopApply(op, left) => {
                current_result = apply_aop(op, &left, &current_result)?;
            }
            Frame::If(then_branch, else_branch, saved_env) => {
                let Value::Int(cond) = current_result else {
                    return Err(BrzError::type_error("if condition"));
                };
                current_expr = Some(if cond != 0 { then_branch } else { else_branch });
                current_env = saved_env;
            }
            Frame::Sequence(second, saved_env) => {
                current_expr = Some(second);
                current_env = saved_env;
            }
            Frame::Call(name, arg_exprs, index, mut evaluated, saved_env) => {
                evaluated.push(current_result.clone());
                let next_index = index + 1;
                if next_index < arg_exprs.len() {
                    stack.push(Frame::Call(name, arg_exprs.clone(), next_index, evaluated, saved_env.clone()));
                    current_expr = Some(arg_exprs[next_index].clone());
                    current_env = saved_env;
                } else {
                    match resolve_call(&name, evaluated, &saved_env, output)? {
                        CallOutcome::Value(v) => {
                            current_result = v;
                            current_env = saved_env;
                        }
                        CallOutcome::Enter(body, call_env) => {
                            current_expr = Some(body);
                            current_env = call_env;
                        }
                    }
                }
            }
        }
    }
}

fn apply_aop(op: AOp, left: &Value, right: &Value) -> Result<Value, BrzError> {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => {
            let value = match op {
                AOp::Add => l.wrapping_add(*r),
                AOp::Sub => l.wrapping_sub(*r),
                AOp::Mul => l.wrapping_mul(*r),
                AOp::Div => {
                    if *r == 0 {
                        return Err(BrzError::divide_by_zero());
                    }
                    floor_div(*l, *r)
                }
                AOp::Mod => {
                    if *r == 0 {
                        return Err(BrzError::divide_by_zero());
                    }
                    floor_mod(*l, *r)
                }
            };
            Ok(Value::Int(value))
        }
        (Value::Float(l), Value::Float(r)) => {
            let value = match op {
                AOp::Add => l + r,
                AOp::Sub => l - r,
                AOp::Mul => l * r,
                AOp::Div => {
                    if *r == 0.0 {
                        return Err(BrzError::divide_by_zero());
                    }
                    l / r
                }
                AOp::Mod => {
                    if *r == 0.0 {
                        return Err(BrzError::divide_by_zero());
                    }
                    l % r
                }
            };
            Ok(Value::Float(value))
        }
        _ => Err(BrzError::type_error("arithmetic operator")),
    }
}

/// Floored division, matching Python's `//`: rounds toward negative
/// infinity rather than toward zero, so a negative divisor can change the
/// quotient relative to Rust's default truncating `/`.
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

/// A comparison's operands are evaluated with the same frame-stack loop as
/// any other expression (they are `Exp`, not a narrower arithmetic type),
/// then compared under matching-kind rules like [`apply_aop`].
fn eval_bexp(bexp: &BExp, env: &Environment, output: &mut impl Write) -> Result<bool, BrzError> {
    let left = eval(&bexp.lhs, env, output)?;
    let right = eval(&bexp.rhs, env, output)?;
    let ordering = match (&left, &right) {
        (Value::Int(l), Value::Int(r)) => l.partial_cmp(r),
        (Value::Float(l), Value::Float(r)) => l.partial_cmp(r),
        _ => return Err(BrzError::type_error("comparison operator")),
    };
    let Some(ordering) = ordering else {
        return Err(BrzError::type_error("comparison operator"));
    };
    use brz_ast::CmpOp;
    use std::cmp::Ordering;
    Ok(match bexp.op {
        CmpOp::Eq => ordering == Ordering::Equal,
        CmpOp::Ne => ordering != Ordering::Equal,
        CmpOp::Lt => ordering == Ordering::Less,
        CmpOp::Gt => ordering == Ordering::Greater,
        CmpOp::Le => ordering != Ordering::Greater,
        CmpOp::Ge => ordering != Ordering::Less,
    })
}

/// Resolving a call either produces a value directly (a builtin) or hands
/// back a body and environment to continue evaluating on the *same* loop
/// iteration (a closure) — the caller must feed these into `current_expr`/
/// `current_env` and `continue` rather than calling [`eval`] again, so that
/// FUN recursion never grows the host call stack.
enum CallOutcome {
    Value(Value),
    Enter(Rc<Exp>, Environment),
}

fn resolve_call(name: &str, args: Vec<Value>, env: &Environment, output: &mut impl Write) -> Result<CallOutcome, BrzError> {
    let callee = env.get(name).ok_or_else(|| BrzError::undefined_name(name.to_string()))?;
    match callee {
        Value::Builtin(builtin_name) => call_builtin(builtin_name, args, output).map(CallOutcome::Value),
        Value::Closure { params, body, env: closure_env } => {
            if params.len() != args.len() {
                return Err(BrzError::arity(name.to_string(), params.len(), args.len()));
            }
            let bound = params.into_iter().zip(args);
            let call_env = closure_env.branch(bound);
            Ok(CallOutcome::Enter(body, call_env))
        }
        _ => Err(BrzError::type_error("call to a non-function")),
    }
}

fn call_builtin(name: &'static str, args: Vec<Value>, output: &mut impl Write) -> Result<Value, BrzError> {
    let expect_one_int = |args: &[Value]| -> Result<i64, BrzError> {
        match args {
            [Value::Int(i)] => Ok(*i),
            _ => Err(BrzError::type_error(name)),
        }
    };
    match name {
        "skip" => Ok(Value::None),
        "print_int" => {
            let i = expect_one_int(&args)?;
            output.write_all(i.to_string().as_bytes()).map_err(|e| BrzError::io(e.to_string()))?;
            Ok(Value::None)
        }
        "print_char" => {
            let code = expect_one_int(&args)?;
            let text = match u8::try_from(code) {
                Ok(byte) => vec![byte],
                Err(_) => code.to_string().into_bytes(),
            };
            output.write_all(&text).map_err(|e| BrzError::io(e.to_string()))?;
            Ok(Value::None)
        }
        "print_space" => {
            output.write_all(b" ").map_err(|e| BrzError::io(e.to_string()))?;
            Ok(Value::None)
        }
        "print_star" => {
            output.write_all(b"*").map_err(|e| BrzError::io(e.to_string()))?;
            Ok(Value::None)
        }
        "new_line" => {
            output.write_all(b"\n").map_err(|e| BrzError::io(e.to_string()))?;
            Ok(Value::None)
        }
        _ => Err(BrzError::undefined_name(name.to_string())),
    }
}

/// Run a whole FUN program: bind the builtins, process declarations in
/// order, and return `Main`'s result.
pub fn run(program: &Program, output: &mut impl Write) -> Result<Value, BrzError> {
    let env = builtin_env();
    let mut result = Value::None;
    for decl in program {
        debug!(decl = ?decl, "evaluating declaration");
        match decl {
            Decl::Const { name, value, .. } => env.set(name.clone(), Value::Int(*value)),
            Decl::FConst { name, value, .. } => env.set(name.clone(), Value::Float(*value)),
            Decl::Def { name, params, body, .. } => {
                env.set(name.clone(), Value::None);
                let closure = Value::Closure {
                    params: params.iter().map(|(n, _)| n.clone()).collect(),
                    body: Rc::new(body.clone()),
                    env: env.clone(),
                };
                env.set(name.clone(), closure);
            }
            Decl::Main(body) => {
                result = eval(body, &env, output)?;
            }
        }
    }
    Ok(result)
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use brz_lexer::lex_fun;
    use brz_parse::parse_fun;

    fn run_src(src: &str) -> (Value, String) {
        let tokens = lex_fun(src).expect("lex should succeed");
        let program = parse_fun(&tokens).expect("parse should succeed");
        let mut output = Vec::new();
        let result = run(&program, &mut output).expect("eval should succeed");
        (result, String::from_utf8(output).expect("output is UTF-8"))
    }

    #[test]
    fn scenario_factorial_of_five() {
        let (result, _) = run_src(
            "def fact(n: Int): Int = if n == 0 then 1 else n * fact(n-1); fact(5)",
        );
        assert!(matches!(result, Value::Int(120)));
    }

    #[test]
    fn deep_recursion_does_not_overflow_the_host_stack() {
        let (result, _) = run_src(
            "def f(n: Int): Int = if n == 0 then 0 else f(n-1); f(100000)",
        );
        assert!(matches!(result, Value::Int(0)));
    }

    #[test]
    fn sequence_discards_the_first_result() {
        let (result, stdout) = run_src("print_string(\"a\"); print_string(\"b\")");
        assert_eq!(stdout, "ab");
        assert!(matches!(result, Value::None));
    }

    #[test]
    fn arity_mismatch_is_an_error() {
        let tokens = lex_fun("def f(n: Int): Int = n; f(1, 2)").expect("lex should succeed");
        let program = parse_fun(&tokens).expect("parse should succeed");
        let mut output = Vec::new();
        assert!(run(&program, &mut output).is_err());
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let tokens = lex_fun("1 / 0").expect("lex should succeed");
        let program = parse_fun(&tokens).expect("parse should succeed");
        let mut output = Vec::new();
        assert!(run(&program, &mut output).is_err());
    }
}
