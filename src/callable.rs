use crate::ast::Statement;
use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::interpreter::{Flow, Interpreter};
use crate::token::Token;
use crate::value::Value;
use std::fmt;
use std::fmt::Debug;
use std::rc::Rc;

/// Required argument count. `Variadic` is the sentinel the print family
/// uses to accept any count.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Arity {
    Fixed(usize),
    Variadic,
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arity::Fixed(expected) => *expected == count,
            Arity::Variadic => true,
        }
    }
}

/// Everything that can sit to the left of a call expression: either a
/// built-in or a user function closure. One invoke/arity contract covers
/// both.
#[derive(Clone, Debug)]
pub enum Callable {
    Native(NativeFunction),
    Function(ScriptFunction),
}

impl Callable {
    pub fn arity(&self) -> Arity {
        match self {
            Callable::Native(native) => native.arity,
            Callable::Function(function) => Arity::Fixed(function.data.params.len()),
        }
    }

    pub fn invoke(
        &self,
        interpreter: &mut Interpreter,
        arguments: &[Value],
    ) -> Result<Value, RuntimeError> {
        match self {
            Callable::Native(native) => (native.func)(interpreter, arguments),
            Callable::Function(function) => function.invoke(interpreter, arguments),
        }
    }

    pub fn identity_eq(&self, other: &Callable) -> bool {
        match (self, other) {
            (Callable::Native(l), Callable::Native(r)) => l.name == r.name,
            (Callable::Function(l), Callable::Function(r)) => Rc::ptr_eq(&l.data, &r.data),
            _ => false,
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Native(native) => write!(f, "{}", native),
            Callable::Function(function) => write!(f, "{}", function),
        }
    }
}

pub type NativeFn = fn(&mut Interpreter, &[Value]) -> Result<Value, RuntimeError>;

#[derive(Clone)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: Arity,
    pub func: NativeFn,
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native func {}>", self.name)
    }
}

impl fmt::Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native func>")
    }
}

/// A user function value: the declaration's parameters and body plus the
/// environment that was live where the declaration executed. Calling it
/// chains a fresh scope onto that captured environment, which is what makes
/// the closure tests in the interpreter hold.
#[derive(Clone)]
pub struct ScriptFunction {
    data: Rc<ScriptFunctionData>,
}

struct ScriptFunctionData {
    name: Token,
    params: Vec<Token>,
    body: Rc<Vec<Statement>>,
    closure: Environment,
}

impl ScriptFunction {
    pub fn new(
        name: Token,
        params: Vec<Token>,
        body: Rc<Vec<Statement>>,
        closure: Environment,
    ) -> ScriptFunction {
        ScriptFunction {
            data: Rc::new(ScriptFunctionData {
                name,
                params,
                body,
                closure,
            }),
        }
    }

    fn invoke(
        &self,
        interpreter: &mut Interpreter,
        arguments: &[Value],
    ) -> Result<Value, RuntimeError> {
        let environment = self.data.closure.new_child();
        for (param, argument) in self.data.params.iter().zip(arguments) {
            environment.define(&param.lexeme, argument.clone());
        }
        // The one place the return signal is consumed.
        match interpreter.execute_block(&self.data.body, environment)? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Nil),
        }
    }
}

impl Debug for ScriptFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<func {}>", self.data.name.lexeme)
    }
}

impl fmt::Display for ScriptFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<func {}>", self.data.name.lexeme)
    }
}
