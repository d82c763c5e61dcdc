//! Binary operator evaluation
//!
//! Every operator pops its right operand first, then its left, and pushes
//! `lhs OP rhs`. So `10 3 -` leaves `7` and `1 2 <` leaves `True`.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::output::OutputSink;
use crate::parser::ast::{BinOp, SourceLocation};

impl<O: OutputSink> Interpreter<'_, O> {
    pub(crate) fn execute_operator(
        &mut self,
        op: BinOp,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let operands = self.pop_values(2, location)?;
        let (lhs, rhs) = (operands[0], operands[1]);
        let result = evaluate_binary_op(op, lhs, rhs, location)?;
        self.push_value(result);
        Ok(())
    }
}

/// Apply `op` to two already-popped operands
pub fn evaluate_binary_op(
    op: BinOp,
    lhs: Value,
    rhs: Value,
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    if op == BinOp::Eq {
        return match (lhs, rhs) {
            (Value::Int(_), Value::Int(_)) | (Value::Bool(_), Value::Bool(_)) => {
                Ok(Value::Bool(lhs == rhs))
            }
            _ => Err(type_mismatch(op, lhs, rhs, location)),
        };
    }

    let (a, b) = match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => (a, b),
        _ => return Err(type_mismatch(op, lhs, rhs, location)),
    };

    let overflow = || RuntimeError::IntegerOverflow {
        operation: op.symbol().to_string(),
        lhs: a,
        rhs: b,
        location,
    };

    match op {
        BinOp::Add => a.checked_add(b).map(Value::Int).ok_or_else(overflow),
        BinOp::Sub => a.checked_sub(b).map(Value::Int).ok_or_else(overflow),
        BinOp::Mul => a.checked_mul(b).map(Value::Int).ok_or_else(overflow),
        BinOp::Div => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero { location });
            }
            // Truncates toward zero; only i64::MIN / -1 can overflow
            a.checked_div(b).map(Value::Int).ok_or_else(overflow)
        }
        BinOp::Gt => Ok(Value::Bool(a > b)),
        BinOp::Lt => Ok(Value::Bool(a < b)),
        BinOp::Ge => Ok(Value::Bool(a >= b)),
        BinOp::Le => Ok(Value::Bool(a <= b)),
        BinOp::Eq => Ok(Value::Bool(a == b)),
    }
}

fn type_mismatch(op: BinOp, lhs: Value, rhs: Value, location: SourceLocation) -> RuntimeError {
    RuntimeError::TypeMismatch {
        operation: op.to_string(),
        lhs: lhs.type_name(),
        rhs: rhs.type_name(),
        location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(op: BinOp, lhs: Value, rhs: Value) -> Result<Value, RuntimeError> {
        evaluate_binary_op(op, lhs, rhs, SourceLocation::new(1, 1))
    }

    #[test]
    fn test_subtraction_is_lhs_minus_rhs() {
        assert_eq!(
            eval(BinOp::Sub, Value::Int(10), Value::Int(3)),
            Ok(Value::Int(7))
        );
    }

    #[test]
    fn test_division_truncates() {
        assert_eq!(
            eval(BinOp::Div, Value::Int(-7), Value::Int(2)),
            Ok(Value::Int(-3))
        );
        assert_eq!(
            eval(BinOp::Div, Value::Int(1), Value::Int(0)),
            Err(RuntimeError::DivisionByZero {
                location: SourceLocation::new(1, 1)
            })
        );
    }

    #[test]
    fn test_overflow_is_reported() {
        assert!(matches!(
            eval(BinOp::Add, Value::Int(i64::MAX), Value::Int(1)),
            Err(RuntimeError::IntegerOverflow { .. })
        ));
        assert!(matches!(
            eval(BinOp::Div, Value::Int(i64::MIN), Value::Int(-1)),
            Err(RuntimeError::IntegerOverflow { .. })
        ));
    }

    #[test]
    fn test_equality_across_types() {
        assert_eq!(
            eval(BinOp::Eq, Value::Bool(true), Value::Bool(true)),
            Ok(Value::Bool(true))
        );
        assert!(matches!(
            eval(BinOp::Eq, Value::Int(1), Value::Bool(true)),
            Err(RuntimeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_arithmetic_rejects_booleans() {
        let err = eval(BinOp::Add, Value::Bool(true), Value::Int(1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Type mismatch at line 1, column 1: '+' cannot be applied to boolean and integer"
        );
    }
}
