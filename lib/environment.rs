use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::value::Value;

/// One scope of bindings. Scopes are shared (`Rc`) because a function value
/// keeps the scope it was defined in alive after that scope's frame returns.
#[derive(Debug, Default)]
pub struct Environment {
    store: HashMap<String, Value>,
    outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Environment::default()))
    }

    pub fn new_enclosed_environment(outer: Rc<RefCell<Environment>>) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Environment {
            store: HashMap::new(),
            outer: Some(outer),
        }))
    }

    /// Innermost binding of `name`, searching outward.
    pub fn get(&self, name: &str) -> Option<Value> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => match &self.outer {
                Some(outer) => outer.borrow().get(name),
                None => None,
            },
        }
    }

    /// Rebinds the nearest scope that already binds `name`, or binds it here.
    pub fn set(&mut self, name: &str, value: Value) {
        if let Some(value) = self.assign_existing(name, value) {
            self.define(name, value);
        }
    }

    /// Binds `name` in this scope, shadowing any outer binding.
    pub fn define(&mut self, name: &str, value: Value) {
        self.store.insert(name.to_string(), value);
    }

    // Hands the value back when no scope in the chain binds `name`.
    fn assign_existing(&mut self, name: &str, value: Value) -> Option<Value> {
        if let Some(slot) = self.store.get_mut(name) {
            *slot = value;
            return None;
        }
        match &self.outer {
            Some(outer) => outer.borrow_mut().assign_existing(name, value),
            None => Some(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_outward() {
        let global = Environment::new();
        global.borrow_mut().define("x", Value::Number(1.0));
        let inner = Environment::new_enclosed_environment(global.clone());
        inner.borrow_mut().define("y", Value::Number(2.0));

        assert_eq!(inner.borrow().get("x"), Some(Value::Number(1.0)));
        assert_eq!(inner.borrow().get("y"), Some(Value::Number(2.0)));
        assert_eq!(global.borrow().get("y"), None);
        assert_eq!(inner.borrow().get("z"), None);
    }

    #[test]
    fn set_updates_nearest_binding() {
        let global = Environment::new();
        global.borrow_mut().define("x", Value::Number(1.0));
        let middle = Environment::new_enclosed_environment(global.clone());
        let inner = Environment::new_enclosed_environment(middle.clone());

        inner.borrow_mut().set("x", Value::Number(5.0));
        assert_eq!(global.borrow().get("x"), Some(Value::Number(5.0)));

        middle.borrow_mut().define("x", Value::String("shadow".to_string()));
        inner.borrow_mut().set("x", Value::Number(9.0));
        assert_eq!(middle.borrow().get("x"), Some(Value::Number(9.0)));
        assert_eq!(global.borrow().get("x"), Some(Value::Number(5.0)));
    }

    #[test]
    fn set_creates_binding_in_current_scope() {
        let global = Environment::new();
        let inner = Environment::new_enclosed_environment(global.clone());

        inner.borrow_mut().set("fresh", Value::Number(3.0));
        assert_eq!(inner.borrow().get("fresh"), Some(Value::Number(3.0)));
        assert_eq!(global.borrow().get("fresh"), None);
    }

    #[test]
    fn define_shadows_outer_binding() {
        let global = Environment::new();
        global.borrow_mut().define("x", Value::Number(1.0));
        let inner = Environment::new_enclosed_environment(global.clone());

        inner.borrow_mut().define("x", Value::Number(2.0));
        assert_eq!(inner.borrow().get("x"), Some(Value::Number(2.0)));
        assert_eq!(global.borrow().get("x"), Some(Value::Number(1.0)));
    }
}
