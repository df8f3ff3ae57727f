use thiserror::Error;

#[derive(Debug, Error)]
#[error("[line {line}] Error: {message}")]
pub struct ScanError {
    pub line: i32,
    pub message: String,
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum RuntimeErrorKind {
    #[error("Operand must be a number.")]
    ExpectedNumber,
    #[error("Operands must be numbers.")]
    ExpectedNumbers,
    #[error("Operands must be numbers or strings.")]
    ExpectedNumbersOrStrings,
    #[error("Undefined variable '{0}'.")]
    UndefinedVariable(String),
    #[error("Variable '{0}' is already defined.")]
    AlreadyDefined(String),
    #[error("Can only call functions.")]
    NotCallable,
    #[error("Expected {expected} arguments but got {got}.")]
    ArityMismatch { expected: usize, got: usize },
}

#[derive(Clone, Debug, Error, PartialEq)]
#[error("{kind}")]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub line: i32,
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind, line: i32) -> RuntimeError {
        RuntimeError { kind, line }
    }
}
