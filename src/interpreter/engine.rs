// Execution engine for the Words interpreter

use crate::interpreter::config::InterpreterConfig;
use crate::interpreter::errors::RuntimeError;
use crate::memory::dictionary::{Binding, Scope};
use crate::memory::stack::{CallFrame, CallStack, Cursor, ValueStack};
use crate::memory::value::Value;
use crate::output::{CapturedOutput, OutputSink};
use crate::parser::ast::*;

/// What the main loop does next
enum Step<'p> {
    /// Execute a statement
    Node(&'p AstNode),
    /// A block ran out of statements
    BlockDone(Cursor<'p>),
    /// A function body ran out of statements
    FrameDone,
    /// The top-level program is finished
    Finished,
}

/// Executes a parsed Words [`Program`]
///
/// The program is borrowed for the lifetime of the interpreter; function
/// bodies and blocks are walked in place, never cloned.
pub struct Interpreter<'p, O: OutputSink = CapturedOutput> {
    program: &'p Program,

    pub(crate) config: InterpreterConfig,

    /// Global frame plus active calls
    pub(crate) call_stack: CallStack<'p>,

    /// Where `__PRINT__` sends values
    output: O,
}

impl<'p> Interpreter<'p> {
    /// Create an interpreter that captures printed values in memory
    pub fn new(program: &'p Program) -> Self {
        Interpreter::with_output(program, CapturedOutput::new())
    }
}

impl<'p, O: OutputSink> Interpreter<'p, O> {
    pub fn with_output(program: &'p Program, output: O) -> Self {
        Interpreter {
            program,
            config: InterpreterConfig::default(),
            call_stack: CallStack::new(CallFrame::top_level(Scope::new(), ValueStack::new(), &[])),
            output,
        }
    }

    pub fn with_config(mut self, config: InterpreterConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the program from start to finish
    ///
    /// `initial_stack` seeds the global stack, bottom to top. Returns the
    /// final global stack, bottom to top.
    pub fn run(&mut self, initial_stack: &[i64]) -> Result<Vec<Value>, RuntimeError> {
        let program = self.program;

        // Functions are callable before their declaration is reached
        let mut globals = Scope::new();
        for function in program.functions() {
            globals
                .declare(&function.name, Binding::Function(function))
                .map_err(|err| RuntimeError::from_dictionary(err, function.location))?;
        }
        // Every global slot exists from the start, even if its VARIABLE never runs
        let start = SourceLocation::new(1, 1);
        for name in &program.globals {
            globals
                .allocate(name)
                .map_err(|err| RuntimeError::from_dictionary(err, start))?;
        }

        let stack = initial_stack.iter().map(|&n| Value::Int(n)).collect();
        self.call_stack = CallStack::new(CallFrame::top_level(globals, stack, &program.nodes));

        self.execute()?;
        Ok(self.call_stack.global_frame().stack.as_slice().to_vec())
    }

    /// The global stack as it currently stands (also after a failed run)
    pub fn global_stack(&self) -> &[Value] {
        self.call_stack.global_frame().stack.as_slice()
    }

    /// Number of function calls active right now
    pub fn call_depth(&self) -> usize {
        self.call_stack.depth()
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn into_output(self) -> O {
        self.output
    }

    fn execute(&mut self) -> Result<(), RuntimeError> {
        loop {
            match self.next_step() {
                Step::Node(node) => self.execute_node(node)?,
                Step::BlockDone(cursor) => self.finish_cursor(cursor)?,
                Step::FrameDone => self.return_from_call()?,
                Step::Finished => return Ok(()),
            }
        }
    }

    fn next_step(&mut self) -> Step<'p> {
        let at_top_level = self.call_stack.depth() == 0;
        let frame = self.call_stack.current_frame_mut();

        match frame.cursors.last_mut().map(Cursor::next_node) {
            Some(Some(node)) => Step::Node(node),
            Some(None) => match frame.cursors.pop() {
                Some(cursor) => Step::BlockDone(cursor),
                None => Step::Finished,
            },
            None if at_top_level => Step::Finished,
            None => Step::FrameDone,
        }
    }

    fn execute_node(&mut self, node: &'p AstNode) -> Result<(), RuntimeError> {
        match node {
            AstNode::Literal { value, .. } => {
                self.push_value(*value);
                Ok(())
            }

            AstNode::Operator { op, location } => self.execute_operator(*op, *location),

            // The slot already exists; running the declaration resets it to 0
            AstNode::VariableDeclaration { name, location } => self
                .active_scope_mut()
                .allocate(name)
                .map_err(|err| RuntimeError::from_dictionary(err, *location)),

            AstNode::VariableRead { name, location } => {
                let value = self
                    .active_scope()
                    .variable(name)
                    .map_err(|err| RuntimeError::from_dictionary(err, *location))?;
                self.push_value(value);
                Ok(())
            }

            AstNode::Assignment { name, location } => {
                let value = self.pop_value(*location)?;
                self.active_scope_mut()
                    .assign(name, value)
                    .map_err(|err| RuntimeError::from_dictionary(err, *location))
            }

            AstNode::Conditional {
                if_body,
                else_body,
                location,
            } => self.enter_conditional(if_body, else_body.as_deref(), *location),

            AstNode::Loop {
                condition,
                body,
                location,
            } => {
                self.enter_loop(condition, body, *location);
                Ok(())
            }

            // Bound before the run starts
            AstNode::FunctionDeclaration(_) => Ok(()),

            AstNode::FunctionCall { name, location } => self.call_function(name, *location),

            AstNode::MacroCall { kind, location } => self.execute_macro(*kind, *location),
        }
    }

    fn execute_macro(&mut self, kind: Macro, location: SourceLocation) -> Result<(), RuntimeError> {
        match kind {
            Macro::Print => {
                let value = self.pop_value(location)?;
                self.output
                    .emit(&value, location)
                    .map_err(|err| RuntimeError::OutputFailed {
                        message: err.to_string(),
                        location,
                    })
            }
        }
    }

    /// Scope of the innermost frame: the call's locals, or the globals
    pub(crate) fn active_scope(&self) -> &Scope<'p> {
        &self.call_stack.current_frame().scope
    }

    pub(crate) fn active_scope_mut(&mut self) -> &mut Scope<'p> {
        &mut self.call_stack.current_frame_mut().scope
    }

    pub(crate) fn push_value(&mut self, value: Value) {
        self.call_stack.current_frame_mut().stack.push(value);
    }

    pub(crate) fn pop_value(&mut self, location: SourceLocation) -> Result<Value, RuntimeError> {
        self.call_stack
            .current_frame_mut()
            .stack
            .pop()
            .ok_or(RuntimeError::StackUnderflow {
                needed: 1,
                available: 0,
                location,
            })
    }

    /// Pop `count` values from the active stack, returned bottom-to-top.
    /// Nothing is popped if fewer are available.
    pub(crate) fn pop_values(
        &mut self,
        count: usize,
        location: SourceLocation,
    ) -> Result<Vec<Value>, RuntimeError> {
        let stack = &mut self.call_stack.current_frame_mut().stack;
        let available = stack.len();
        stack.pop_n(count).ok_or(RuntimeError::StackUnderflow {
            needed: count,
            available,
            location,
        })
    }

    pub(crate) fn push_cursor(&mut self, cursor: Cursor<'p>) {
        self.call_stack.current_frame_mut().cursors.push(cursor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::parse_source;

    fn run(source: &str, initial: &[i64]) -> (Result<Vec<Value>, RuntimeError>, Vec<Value>) {
        let program = parse_source(source).unwrap();
        let mut interpreter = Interpreter::new(&program);
        let result = interpreter.run(initial);
        (result, interpreter.output().values())
    }

    #[test]
    fn test_arithmetic_leaves_result() {
        let (result, _) = run("2 3 + 4 *", &[]);
        assert_eq!(result, Ok(vec![Value::Int(20)]));
    }

    #[test]
    fn test_initial_stack_is_bottom_to_top() {
        let (result, _) = run("-", &[10, 3]);
        assert_eq!(result, Ok(vec![Value::Int(7)]));
    }

    #[test]
    fn test_variables() {
        let (result, _) = run("VARIABLE x 5 ASSIGN x x x +", &[]);
        assert_eq!(result, Ok(vec![Value::Int(10)]));
    }

    #[test]
    fn test_redeclaration_in_loop_resets() {
        let source = "VARIABLE n 3 ASSIGN n \
                      BEGIN n 0 > WHILE VARIABLE t t 1 + ASSIGN t t __PRINT__ n 1 - ASSIGN n REPEAT";
        let (result, printed) = run(source, &[]);
        assert_eq!(result, Ok(vec![]));
        assert_eq!(printed, vec![Value::Int(1); 3]);
    }

    #[test]
    fn test_function_returns_top_values_in_order() {
        let source = "| F ( ) 1 2 3 RETURN 2 | F";
        let (result, _) = run(source, &[]);
        assert_eq!(result, Ok(vec![Value::Int(2), Value::Int(3)]));
    }

    #[test]
    fn test_callee_cannot_see_caller_stack() {
        let (result, _) = run("| F ( ) + RETURN 1 | 1 2 F", &[]);
        assert!(matches!(
            result,
            Err(RuntimeError::StackUnderflow { needed: 2, available: 0, .. })
        ));
    }

    #[test]
    fn test_return_underflow_reports_call_site() {
        let (result, _) = run("| F ( ) 1 RETURN 2 |\n F", &[]);
        assert_eq!(
            result,
            Err(RuntimeError::StackUnderflow {
                needed: 2,
                available: 1,
                location: SourceLocation::new(2, 2),
            })
        );
    }

    #[test]
    fn test_state_after_error() {
        let program = parse_source("1 __PRINT__ 7 0 /").unwrap();
        let mut interpreter = Interpreter::new(&program);
        assert!(matches!(
            interpreter.run(&[]),
            Err(RuntimeError::DivisionByZero { .. })
        ));
        assert_eq!(interpreter.output().values(), vec![Value::Int(1)]);
        assert_eq!(interpreter.global_stack(), &[] as &[Value]);
    }

    #[test]
    fn test_run_twice_starts_fresh() {
        let program = parse_source("VARIABLE x x 1 + ASSIGN x x").unwrap();
        let mut interpreter = Interpreter::new(&program);
        assert_eq!(interpreter.run(&[]), Ok(vec![Value::Int(1)]));
        assert_eq!(interpreter.run(&[]), Ok(vec![Value::Int(1)]));
    }

    #[test]
    fn test_custom_depth_limit() {
        let program = parse_source("| F ( ) F RETURN 1 | F").unwrap();
        let mut interpreter =
            Interpreter::new(&program).with_config(InterpreterConfig::new().with_max_call_depth(10));
        assert_eq!(
            interpreter.run(&[]),
            Err(RuntimeError::RecursionLimitExceeded {
                function: "F".to_string(),
                limit: 10,
                location: SourceLocation::new(1, 9),
            })
        );
        assert_eq!(interpreter.call_depth(), 10);
    }
}
