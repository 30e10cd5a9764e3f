use crate::object::Object;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to an [`Environment`].  Closures hold one of these, so a
/// scope lives as long as its longest holder.
pub type Env = Rc<RefCell<Environment>>;

/// One lexical scope: local bindings plus an optional enclosing scope.
#[derive(Debug, Default)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Env>,
}

impl Environment {
    /// A fresh top‑level scope.
    pub fn new() -> Env {
        Rc::new(RefCell::new(Environment::default()))
    }

    /// A fresh scope whose lookups fall back to `outer`.
    pub fn enclosed(outer: Env) -> Env {
        Rc::new(RefCell::new(Environment {
            store: HashMap::new(),
            outer: Some(outer),
        }))
    }

    /// Look `name` up here, then outwards.
    pub fn get(&self, name: &str) -> Option<Object> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self.outer.as_ref()?.borrow().get(name),
        }
    }

    /// Bind `name` in *this* scope, replacing any earlier local binding.
    pub fn set(&mut self, name: &str, value: Object) {
        debug!("Binding '{}' to {}", name, value);

        self.store.insert(name.to_string(), value);
    }
}
