// Whole-program tests for the Words interpreter

use std::fs;
use std::path::Path;
use words::interpreter::config::InterpreterConfig;
use words::interpreter::engine::Interpreter;
use words::interpreter::errors::RuntimeError;
use words::output::WriterOutput;
use words::parser::parse::Parser;
use words::parser::trace::ParseEvent;
use words::{compile, Value};

fn load(name: &str) -> String {
    let path = Path::new("demos").join(name);
    fs::read_to_string(path).expect("Failed to read demo file")
}

#[test]
fn test_fibonacci_demo() {
    let source = load("fibonacci.words");

    let mut parser = Parser::new(&source).expect("Parser creation failed");
    let program = parser.parse_program().expect("Parsing failed");

    let mut interpreter = Interpreter::new(&program);
    let stack = interpreter.run(&[]).expect("Execution failed");

    let output = interpreter.output().get_output();
    assert_eq!(
        output,
        vec!["0", "1", "1", "2", "3", "5", "8", "13", "21", "34", "55"]
    );
    assert!(stack.is_empty());
}

#[test]
fn test_parity_demo() {
    let program = compile(&load("parity.words")).expect("Parsing failed");

    let mut interpreter = Interpreter::new(&program);
    interpreter.run(&[]).expect("Execution failed");

    assert_eq!(
        interpreter.output().values(),
        vec![Value::Bool(true), Value::Bool(false), Value::Bool(true)]
    );
}

#[test]
fn test_divmod_demo_with_initial_stack() {
    let program = compile(&load("divmod.words")).expect("Parsing failed");

    let mut interpreter = Interpreter::new(&program);
    let stack = interpreter.run(&[4, 5, 6, 3]).expect("Execution failed");

    assert_eq!(interpreter.output().values(), vec![Value::Int(2), Value::Int(3)]);
    assert_eq!(stack, vec![Value::Int(15)]);
}

#[test]
fn test_output_survives_runtime_error() {
    let program = compile("1 __PRINT__ 2 __PRINT__ __PRINT__").expect("Parsing failed");

    let mut interpreter = Interpreter::new(&program);
    let result = interpreter.run(&[]);

    assert!(matches!(result, Err(RuntimeError::StackUnderflow { .. })));
    assert_eq!(
        interpreter.output().values(),
        vec![Value::Int(1), Value::Int(2)]
    );
    assert_eq!(interpreter.output().lines[1].location.column, 15);
}

#[test]
fn test_writer_output() {
    let program = compile("10 __PRINT__ 1 2 > __PRINT__").expect("Parsing failed");

    let mut interpreter = Interpreter::with_output(&program, WriterOutput::new(Vec::new()));
    interpreter.run(&[]).expect("Execution failed");

    let text = String::from_utf8(interpreter.into_output().into_inner()).unwrap();
    assert_eq!(text, "10\nFalse\n");
}

#[test]
fn test_configured_recursion_limit() {
    let program = compile(
        "| DOWN ( VALUE N ) N 0 == IF 0 ELSE N 1 - DOWN THEN RETURN 1 | 50 DOWN",
    )
    .expect("Parsing failed");

    let config = InterpreterConfig::new().with_max_call_depth(50);
    let mut interpreter = Interpreter::new(&program).with_config(config);
    assert!(matches!(
        interpreter.run(&[]),
        Err(RuntimeError::RecursionLimitExceeded { limit: 50, .. })
    ));

    let config = InterpreterConfig::new().with_max_call_depth(51);
    let mut interpreter = Interpreter::new(&program).with_config(config);
    assert_eq!(interpreter.run(&[]), Ok(vec![Value::Int(0)]));
}

#[test]
fn test_parser_tracer_sees_every_statement() {
    let mut rules = Vec::new();
    {
        let mut parser = Parser::new("1 IF 2 THEN")
            .expect("Parser creation failed")
            .with_tracer(|event: &ParseEvent<'_>| {
                if let ParseEvent::Enter { rule, .. } = event {
                    rules.push(*rule);
                }
            });
        parser.parse_program().expect("Parsing failed");
    }
    assert_eq!(rules.len(), 3);
}
