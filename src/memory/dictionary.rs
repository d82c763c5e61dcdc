//! Name dictionary
//!
//! A [`Scope`] maps names to [`Binding`]s. The interpreter keeps exactly two
//! scopes live at a time: the global scope (top-level variables and every
//! function) and, while a call is running, that call's local scope
//! (parameters and local variables). Scopes never fall through to each other.

use crate::memory::value::Value;
use crate::parser::ast::FunctionDef;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// What a name is bound to
#[derive(Debug, Clone, PartialEq)]
pub enum Binding<'p> {
    Variable(Value),
    Function(&'p FunctionDef),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DictionaryError {
    #[error("'{name}' is already declared")]
    DuplicateName { name: String },
    #[error("undefined name '{name}'")]
    UndefinedName { name: String },
}

/// A single namespace of variables and functions
#[derive(Debug, Clone, Default)]
pub struct Scope<'p> {
    entries: FxHashMap<String, Binding<'p>>,
    insertion_order: Vec<String>, // Track order of declarations
}

impl<'p> Scope<'p> {
    pub fn new() -> Self {
        Scope {
            entries: FxHashMap::default(),
            insertion_order: Vec::new(),
        }
    }

    /// Bind a new name. Fails if the name is already bound in this scope.
    pub fn declare(&mut self, name: &str, binding: Binding<'p>) -> Result<(), DictionaryError> {
        if self.entries.contains_key(name) {
            return Err(DictionaryError::DuplicateName {
                name: name.to_string(),
            });
        }
        self.insertion_order.push(name.to_string());
        self.entries.insert(name.to_string(), binding);
        Ok(())
    }

    /// Look up a name in this scope only.
    pub fn resolve(&self, name: &str) -> Result<&Binding<'p>, DictionaryError> {
        self.entries
            .get(name)
            .ok_or_else(|| DictionaryError::UndefinedName {
                name: name.to_string(),
            })
    }

    /// Create (or reset) a variable slot holding 0.
    ///
    /// Executing the same `VARIABLE` statement again, for example inside a
    /// loop body, resets the slot. A function binding is never replaced.
    pub fn allocate(&mut self, name: &str) -> Result<(), DictionaryError> {
        match self.entries.get_mut(name) {
            Some(Binding::Variable(value)) => {
                *value = Value::default();
                Ok(())
            }
            Some(Binding::Function(_)) => Err(DictionaryError::DuplicateName {
                name: name.to_string(),
            }),
            None => self.declare(name, Binding::Variable(Value::default())),
        }
    }

    /// Current value of a variable
    pub fn variable(&self, name: &str) -> Result<Value, DictionaryError> {
        match self.resolve(name)? {
            Binding::Variable(value) => Ok(*value),
            Binding::Function(_) => Err(DictionaryError::UndefinedName {
                name: name.to_string(),
            }),
        }
    }

    /// Store into an existing variable slot
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), DictionaryError> {
        match self.entries.get_mut(name) {
            Some(Binding::Variable(slot)) => {
                *slot = value;
                Ok(())
            }
            _ => Err(DictionaryError::UndefinedName {
                name: name.to_string(),
            }),
        }
    }

    /// Look up a function definition
    pub fn function(&self, name: &str) -> Result<&'p FunctionDef, DictionaryError> {
        match self.resolve(name)? {
            Binding::Function(def) => Ok(*def),
            Binding::Variable(_) => Err(DictionaryError::UndefinedName {
                name: name.to_string(),
            }),
        }
    }

    /// Variables in declaration order (for inspection and debugging)
    pub fn variables(&self) -> Vec<(&str, Value)> {
        self.insertion_order
            .iter()
            .filter_map(|name| match self.entries.get(name) {
                Some(Binding::Variable(value)) => Some((name.as_str(), *value)),
                _ => None,
            })
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{ReturnArity, SourceLocation};

    fn function(name: &str) -> FunctionDef {
        FunctionDef {
            name: name.to_string(),
            parameters: Vec::new(),
            locals: Vec::new(),
            body: Vec::new(),
            return_arity: ReturnArity::One,
            location: SourceLocation::new(1, 1),
        }
    }

    #[test]
    fn test_declare_and_resolve() {
        let mut scope = Scope::new();
        scope.declare("x", Binding::Variable(Value::Int(3))).unwrap();
        assert_eq!(scope.variable("x"), Ok(Value::Int(3)));
        assert_eq!(
            scope.declare("x", Binding::Variable(Value::Int(4))),
            Err(DictionaryError::DuplicateName {
                name: "x".to_string()
            })
        );
    }

    #[test]
    fn test_resolve_missing() {
        let scope = Scope::new();
        assert!(matches!(
            scope.resolve("nope"),
            Err(DictionaryError::UndefinedName { .. })
        ));
    }

    #[test]
    fn test_allocate_resets_slot() {
        let mut scope = Scope::new();
        scope.allocate("i").unwrap();
        scope.assign("i", Value::Int(9)).unwrap();
        scope.allocate("i").unwrap();
        assert_eq!(scope.variable("i"), Ok(Value::Int(0)));
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn test_assign_requires_slot() {
        let mut scope = Scope::new();
        assert!(scope.assign("x", Value::Int(1)).is_err());
    }

    #[test]
    fn test_functions_and_variables_share_namespace() {
        let def = function("F");
        let mut scope = Scope::new();
        scope.declare("F", Binding::Function(&def)).unwrap();
        assert_eq!(scope.function("F").map(|f| f.name.as_str()), Ok("F"));
        assert!(scope.variable("F").is_err());
        assert!(scope.allocate("F").is_err());
        assert!(scope.assign("F", Value::Int(1)).is_err());
    }

    #[test]
    fn test_variables_in_declaration_order() {
        let mut scope = Scope::new();
        scope.allocate("b").unwrap();
        scope.allocate("a").unwrap();
        scope.assign("a", Value::Bool(true)).unwrap();
        assert_eq!(
            scope.variables(),
            vec![("b", Value::Int(0)), ("a", Value::Bool(true))]
        );
    }
}
