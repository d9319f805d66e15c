use std::{cell::RefCell, fmt, rc::Rc};

use crate::{ast::Statement, environment::Environment};

#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    String(String),
    Function(Rc<Function>),
}

/// A user-defined function closed over the scope it was defined in.
pub struct Function {
    pub name: String,
    pub parameters: Vec<String>,
    pub body: Rc<[Statement]>,
    pub env: Rc<RefCell<Environment>>,
}

// The captured scope usually binds the function itself, so it is left out.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl Value {
    pub fn boolean(value: bool) -> Self {
        Value::Number(if value { 1.0 } else { 0.0 })
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(value) => *value != 0.0,
            Value::String(value) => !value.is_empty(),
            Value::Function(_) => true,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::Function(_) => "Function",
        }
    }
}

/// Values of different kinds are never equal; functions compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(left), Value::Number(right)) => left == right,
            (Value::String(left), Value::String(right)) => left == right,
            (Value::Function(left), Value::Function(right)) => Rc::ptr_eq(left, right),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(value) => write!(f, "{}", format_number(*value)),
            Value::String(value) => write!(f, "{}", value),
            Value::Function(function) => {
                write!(f, "<func {}({})>", function.name, function.parameters.join(", "))
            }
        }
    }
}

/// Shortest text that reads back as the same double. Integral values carry
/// no fractional part.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // also folds -0
        return "0".to_string();
    }
    format!("{}", value)
}
