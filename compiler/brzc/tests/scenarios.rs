#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end scenarios: whole source programs run through `brzc`'s
//! library surface, asserting on captured stdout.

use brz_eval::Value;
use std::io::Cursor;

#[test]
fn while_counts_to_five_and_writes_it() {
    let mut input = Cursor::new(Vec::new());
    let mut output = Vec::new();
    brzc::run_while_source(
        "x := 1; while x < 5 do { x := x + 1 }; write x",
        &mut input,
        &mut output,
    )
    .unwrap();
    assert_eq!(output, b"5");
}

#[test]
fn while_if_else_picks_the_false_branch() {
    let mut input = Cursor::new(Vec::new());
    let mut output = Vec::new();
    brzc::run_while_source(
        r#"if 1 == 2 then { write "a" } else { write "b" }"#,
        &mut input,
        &mut output,
    )
    .unwrap();
    assert_eq!(output, b"b");
}

#[test]
fn while_read_consumes_one_line_of_stdin() {
    let mut input = Cursor::new(b"7\n".to_vec());
    let mut output = Vec::new();
    brzc::run_while_source("read x; write x", &mut input, &mut output).unwrap();
    assert_eq!(output, b"7");
}

#[test]
fn fun_factorial_of_five_is_120() {
    let mut output = Vec::new();
    let result = brzc::run_fun_source(
        "def fact(n: Int): Int = if n == 0 then 1 else n * fact(n-1); fact(5)",
        &mut output,
    )
    .unwrap();
    assert!(matches!(result, Value::Int(120)));
}

#[test]
fn fun_deep_recursion_does_not_overflow_the_host_stack() {
    let mut output = Vec::new();
    let result = brzc::run_fun_source(
        "def f(n: Int): Int = if n == 0 then 0 else f(n-1); f(100000)",
        &mut output,
    )
    .unwrap();
    assert!(matches!(result, Value::Int(0)));
}

#[test]
fn fun_print_family_writes_raw_bytes() {
    let mut output = Vec::new();
    brzc::run_fun_source("print_int(1); print_space; print_star; new_line", &mut output).unwrap();
    assert_eq!(output, b"1 *\n");
}

#[test]
fn while_division_by_zero_is_reported_as_an_error() {
    let mut input = Cursor::new(Vec::new());
    let mut output = Vec::new();
    let err = brzc::run_while_source("write 1 / 0", &mut input, &mut output).unwrap_err();
    assert_eq!(format!("{err}"), "division by zero");
}

#[test]
fn fun_arity_mismatch_is_reported_as_an_error() {
    let mut output = Vec::new();
    let err = brzc::run_fun_source("def f(n: Int): Int = n; f(1, 2)", &mut output).unwrap_err();
    assert_eq!(format!("{err}"), "`f` expects 1 argument(s), got 2");
}
