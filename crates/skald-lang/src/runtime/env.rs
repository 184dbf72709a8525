//! The default binding store: scoped variables plus a flat function registry.
//!
//! The language core only relies on the operations exposed here; the storage
//! policy (hash-map scope stack, sequential function ids) is an
//! implementation detail hosts may treat as opaque.

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::Error;
use crate::runtime::function::{Function, NativeFn};
use crate::runtime::value::Value;
use crate::types::VariableType;

#[derive(Debug, Default)]
pub struct Environment {
    scopes: Vec<HashMap<String, Value>>,
    functions: Vec<Rc<Function>>,
}

impl Environment {
    pub fn new() -> Self {
        Self { scopes: vec![HashMap::new()], functions: Vec::new() }
    }

    // ─── Variables ───────────────────────────────────────────────────────────

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Drops the innermost scope. The outermost scope always stays.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Introduce a binding in the innermost scope, shadowing any outer one.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        if self.scopes.is_empty() {
            self.scopes.push(HashMap::new());
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.into(), value);
        }
    }

    /// Read the current value of a binding, innermost scope first.
    pub fn read(&self, name: &str) -> Result<Value, Error> {
        for scope in self.scopes.iter().rev() {
            if let Some(v) = scope.get(name) {
                return Ok(v.clone());
            }
        }
        Err(Error::eval(format!("unknown variable '{name}'")))
    }

    /// Overwrite the innermost binding holding `name`; defines into the
    /// current scope when no binding exists yet.
    pub fn update(&mut self, name: &str, value: Value) {
        for scope in self.scopes.iter_mut().rev() {
            if scope.contains_key(name) {
                scope.insert(name.to_string(), value);
                return;
            }
        }
        self.define(name, value);
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.scopes.iter().any(|scope| scope.contains_key(name))
    }

    // ─── Functions ───────────────────────────────────────────────────────────

    /// Register an overload under `name`. Returns the stable id the parser
    /// embeds into call nodes.
    pub fn register_function(
        &mut self,
        name: &str,
        params: Vec<VariableType>,
        result: VariableType,
        body: impl Fn(&[Value], &mut Environment) -> Result<Value, Error> + 'static,
    ) -> u32 {
        let id = self.functions.len() as u32;
        let body: NativeFn = Rc::new(body);
        self.functions.push(Rc::new(Function::new(name.to_string(), id, params, result, body)));
        id
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.iter().any(|f| f.name() == name)
    }

    /// Every overload registered under `name`, in registration order.
    pub fn overloads(&self, name: &str) -> Vec<Rc<Function>> {
        self.functions.iter().filter(|f| f.name() == name).cloned().collect()
    }

    pub fn function(&self, id: u32) -> Result<Rc<Function>, Error> {
        self.functions
            .get(id as usize)
            .cloned()
            .ok_or_else(|| Error::eval(format!("unknown function id {id}")))
    }

    /// Execute the overload `id` with already-evaluated arguments.
    pub fn call(&mut self, id: u32, args: &[Value]) -> Result<Value, Error> {
        let function = self.function(id)?;
        function.invoke(args, self)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
