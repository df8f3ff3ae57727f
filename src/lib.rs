//! Front end and execution engine for the Letbe scripting language: a
//! scanner, a recursive-descent parser and a tree-walking interpreter over
//! lexically scoped environment chains.

pub mod ast;
pub mod callable;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod scanner;
pub mod session;
pub mod token;
pub mod value;

use crate::interpreter::Interpreter;
use crate::session::Session;
use crate::value::Value;

/// Scans and parses `source` as a statement sequence and, if the session
/// recorded no lexical or syntax error, executes it against the
/// interpreter's persistent global environment.
pub fn run_program(interpreter: &mut Interpreter, source: &str, session: &mut Session) {
    let tokens = scanner::scan_tokens(source, session);
    let statements = parser::Parser::new(&tokens, session).parse();
    if session.had_error() {
        return;
    }
    interpreter.interpret(&statements, session);
}

/// Scans and parses `source` as a single expression and evaluates it;
/// `None` if any error occurred. Used for interactive entry.
pub fn run_expression(
    interpreter: &mut Interpreter,
    source: &str,
    session: &mut Session,
) -> Option<Value> {
    let tokens = scanner::scan_tokens(source, session);
    let expression = parser::Parser::new(&tokens, session).parse_expression()?;
    if session.had_error() {
        return None;
    }
    interpreter.interpret_expression(&expression, session)
}
