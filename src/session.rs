use crate::error::RuntimeError;
use crate::token::{Token, TokenType};

/// Where diagnostics go. The interpreter core never writes to the console
/// itself; the caller decides how errors are rendered.
pub trait Reporter {
    fn diagnostic(&mut self, line: i32, context: &str, message: &str);
    fn runtime(&mut self, message: &str, line: i32);
}

pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn diagnostic(&mut self, line: i32, context: &str, message: &str) {
        eprintln!("[line {}] Error{}: {}", line, context, message);
    }
    fn runtime(&mut self, message: &str, line: i32) {
        eprintln!("{}\n[line {}]", message, line);
    }
}

/// Error state for one run, threaded through scan, parse and execution
/// instead of living in process-wide flags. Scan and parse errors
/// accumulate; a runtime error is terminal for the current run only.
pub struct Session {
    reporter: Box<dyn Reporter>,
    had_error: bool,
    had_runtime_error: bool,
}

impl Session {
    pub fn new() -> Session {
        Session::with_reporter(Box::new(ConsoleReporter))
    }

    pub fn with_reporter(reporter: Box<dyn Reporter>) -> Session {
        Session {
            reporter,
            had_error: false,
            had_runtime_error: false,
        }
    }

    pub fn error(&mut self, line: i32, message: &str) {
        self.report(line, "", message);
    }

    pub fn error_at(&mut self, token: &Token, message: &str) {
        let context = match token.tokentype {
            TokenType::EOF => " at end".to_string(),
            _ => format!(" at '{}'", token.lexeme),
        };
        self.report(token.line, &context, message);
    }

    pub fn runtime_error(&mut self, error: &RuntimeError) {
        self.reporter.runtime(&error.kind.to_string(), error.line);
        self.had_runtime_error = true;
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Interactive callers clear the flags between entries.
    pub fn reset(&mut self) {
        self.had_error = false;
        self.had_runtime_error = false;
    }

    fn report(&mut self, line: i32, context: &str, message: &str) {
        self.reporter.diagnostic(line, context, message);
        self.had_error = true;
    }
}
