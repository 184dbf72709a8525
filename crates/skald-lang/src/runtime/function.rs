use std::fmt;
use std::rc::Rc;

use crate::error::Error;
use crate::runtime::env::Environment;
use crate::runtime::value::Value;
use crate::types::VariableType;

/// The executable body of a registered function. Opaque to the core — it is
/// only ever invoked through [`Function::invoke`] with arguments already
/// checked against the declared parameter types.
pub type NativeFn = Rc<dyn Fn(&[Value], &mut Environment) -> Result<Value, Error>>;

/// A registered callable: name, stable id, declared signature and body.
/// Registered once into the environment before parsing; immutable afterward.
#[derive(Clone)]
pub struct Function {
    name: String,
    id: u32,
    params: Vec<VariableType>,
    result: VariableType,
    body: NativeFn,
}

impl Function {
    pub(crate) fn new(
        name: String,
        id: u32,
        params: Vec<VariableType>,
        result: VariableType,
        body: NativeFn,
    ) -> Self {
        Self { name, id, params, result, body }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn params(&self) -> &[VariableType] {
        &self.params
    }

    pub fn result(&self) -> VariableType {
        self.result
    }

    /// Renders `name(type,type,...)` for overload diagnostics.
    pub fn header(&self) -> String {
        let params: Vec<&str> = self.params.iter().map(|t| t.name()).collect();
        format!("{}({})", self.name, params.join(","))
    }

    pub fn invoke(&self, args: &[Value], env: &mut Environment) -> Result<Value, Error> {
        (self.body)(args, env)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("id", &self.id)
            .field("signature", &self.header())
            .field("result", &self.result.name())
            .finish_non_exhaustive()
    }
}
