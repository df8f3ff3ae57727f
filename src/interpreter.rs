use crate::ast::{Expression, Statement, Visitor};
use crate::callable::{Arity, Callable, NativeFunction, ScriptFunction};
use crate::environment::Environment;
use crate::error::{RuntimeError, RuntimeErrorKind};
use crate::session::Session;
use crate::token::{Token, TokenType};
use crate::value::Value;
use log::debug;
use rand::Rng;
use std::io;
use std::io::Write;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// How a statement finished: fell through normally, or hit `return`. The
/// return signal travels here, as the Ok side of every statement executor,
/// never on the error channel. Each executor passes it upward untouched;
/// only a function call boundary consumes it.
#[derive(Debug)]
pub enum Flow {
    Normal,
    Return(Value),
}

pub struct Interpreter {
    globals: Environment,
    environment: Environment,
    out: Box<dyn Write>,
    /// Iteration count source for `forawhile`. The construct is
    /// nondeterministic by default, so the hook is public: embedders and
    /// tests can pin it.
    pub iteration_bound: fn() -> usize,
}

impl Interpreter {
    pub fn new() -> Interpreter {
        Interpreter::with_output(Box::new(io::stdout()))
    }

    /// Program output (the `print` statement and the print natives) goes to
    /// `out`; diagnostics never do.
    pub fn with_output(out: Box<dyn Write>) -> Interpreter {
        let globals = Environment::new();
        globals.define(
            "clock",
            Value::Callable(Callable::Native(NativeFunction {
                name: "clock",
                arity: Arity::Fixed(0),
                func: native_clock,
            })),
        );
        globals.define(
            "print",
            Value::Callable(Callable::Native(NativeFunction {
                name: "print",
                arity: Arity::Variadic,
                func: native_print,
            })),
        );
        globals.define(
            "println",
            Value::Callable(Callable::Native(NativeFunction {
                name: "println",
                arity: Arity::Variadic,
                func: native_println,
            })),
        );
        Interpreter {
            environment: globals.clone(),
            globals,
            out,
            iteration_bound: default_iteration_bound,
        }
    }

    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    /// Runs a statement sequence against the persistent global environment.
    /// The first runtime error is reported through the session and ends the
    /// run; earlier statements keep their effects.
    pub fn interpret(&mut self, statements: &[Statement], session: &mut Session) {
        debug!("interpreting {} statements", statements.len());
        for statement in statements {
            match self.execute(statement) {
                Ok(Flow::Normal) => (),
                Ok(Flow::Return(_)) => {
                    // A return outside any function ends the run.
                    debug!("top-level return, stopping");
                    return;
                }
                Err(error) => {
                    session.runtime_error(&error);
                    return;
                }
            }
        }
    }

    pub fn interpret_expression(
        &mut self,
        expression: &Expression,
        session: &mut Session,
    ) -> Option<Value> {
        match self.evaluate(expression) {
            Ok(value) => Some(value),
            Err(error) => {
                session.runtime_error(&error);
                None
            }
        }
    }

    pub fn execute_block(
        &mut self,
        statements: &[Statement],
        environment: Environment,
    ) -> Result<Flow, RuntimeError> {
        let previous = std::mem::replace(&mut self.environment, environment);
        let mut result = Ok(Flow::Normal);
        for statement in statements {
            result = self.execute(statement);
            match &result {
                Ok(Flow::Normal) => (),
                _ => break,
            }
        }
        self.environment = previous;
        result
    }

    fn evaluate(&mut self, expression: &Expression) -> Result<Value, RuntimeError> {
        expression.accept(self)
    }

    fn execute(&mut self, statement: &Statement) -> Result<Flow, RuntimeError> {
        statement.accept(self)
    }
}

impl Visitor<Expression, Result<Value, RuntimeError>> for Interpreter {
    fn visit(&mut self, expr: &Expression) -> Result<Value, RuntimeError> {
        match expr {
            Expression::Literal(x) => Ok(x.clone()),
            Expression::Grouping(x) => self.evaluate(x),
            Expression::Unary { operator, right } => {
                let rv = self.evaluate(right)?;
                match operator.tokentype {
                    TokenType::Minus => match rv {
                        Value::Number(r) => Ok(Value::Number(-r)),
                        _ => Err(RuntimeError::new(
                            RuntimeErrorKind::ExpectedNumber,
                            operator.line,
                        )),
                    },
                    TokenType::Bang => Ok(Value::Boolean(!rv.is_truthy())),
                    _ => Ok(Value::Nil),
                }
            }
            Expression::Binary {
                left,
                operator,
                right,
            } => {
                let lv = self.evaluate(left)?;
                let rv = self.evaluate(right)?;
                match operator.tokentype {
                    TokenType::Greater => {
                        let (l, r) = number_operands(operator, &lv, &rv)?;
                        Ok(Value::Boolean(l > r))
                    }
                    TokenType::GreaterEqual => {
                        let (l, r) = number_operands(operator, &lv, &rv)?;
                        Ok(Value::Boolean(l >= r))
                    }
                    TokenType::Less => {
                        let (l, r) = number_operands(operator, &lv, &rv)?;
                        Ok(Value::Boolean(l < r))
                    }
                    TokenType::LessEqual => {
                        let (l, r) = number_operands(operator, &lv, &rv)?;
                        Ok(Value::Boolean(l <= r))
                    }
                    TokenType::Minus => {
                        let (l, r) = number_operands(operator, &lv, &rv)?;
                        Ok(Value::Number(l - r))
                    }
                    // Division follows IEEE float semantics; dividing by
                    // zero yields an infinity or NaN, not an error.
                    TokenType::Slash => {
                        let (l, r) = number_operands(operator, &lv, &rv)?;
                        Ok(Value::Number(l / r))
                    }
                    TokenType::Star => multiply_operands(operator, lv, rv),
                    TokenType::Plus => add_operands(operator, lv, rv),
                    TokenType::EqualEqual => Ok(Value::Boolean(lv.equals(&rv))),
                    TokenType::BangEqual => Ok(Value::Boolean(!lv.equals(&rv))),
                    _ => Ok(Value::Nil),
                }
            }
            // Condition and both branches evaluate before the pick.
            Expression::Ternary {
                condition,
                true_branch,
                false_branch,
            } => {
                let condition = self.evaluate(condition)?;
                let true_branch = self.evaluate(true_branch)?;
                let false_branch = self.evaluate(false_branch)?;
                if condition.is_truthy() {
                    Ok(true_branch)
                } else {
                    Ok(false_branch)
                }
            }
            Expression::Variable(token) => self.environment.get(token),
            Expression::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.environment.assign(name, value.clone())?;
                Ok(value)
            }
            Expression::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;
                match operator.tokentype {
                    TokenType::Or => {
                        if left.is_truthy() {
                            Ok(left)
                        } else {
                            self.evaluate(right)
                        }
                    }
                    TokenType::And => {
                        if !left.is_truthy() {
                            Ok(left)
                        } else {
                            self.evaluate(right)
                        }
                    }
                    _ => Ok(Value::Nil),
                }
            }
            Expression::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee = self.evaluate(callee)?;
                let mut evaluated: Vec<Value> = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    evaluated.push(self.evaluate(argument)?);
                }
                let function = match callee {
                    Value::Callable(function) => function,
                    _ => {
                        return Err(RuntimeError::new(
                            RuntimeErrorKind::NotCallable,
                            paren.line,
                        ))
                    }
                };
                if !function.arity().accepts(evaluated.len()) {
                    let expected = match function.arity() {
                        Arity::Fixed(n) => n,
                        Arity::Variadic => evaluated.len(),
                    };
                    return Err(RuntimeError::new(
                        RuntimeErrorKind::ArityMismatch {
                            expected,
                            got: evaluated.len(),
                        },
                        paren.line,
                    ));
                }
                debug!("calling {}", function);
                function.invoke(self, &evaluated)
            }
        }
    }
}

impl Visitor<Statement, Result<Flow, RuntimeError>> for Interpreter {
    fn visit(&mut self, stmt: &Statement) -> Result<Flow, RuntimeError> {
        match stmt {
            Statement::Print(e) => {
                let value = self.evaluate(e)?;
                let _ = writeln!(self.out, "{}", value);
                Ok(Flow::Normal)
            }
            Statement::Expression(e) => {
                self.evaluate(e)?;
                Ok(Flow::Normal)
            }
            Statement::Let { name, initializer } => {
                let value = match initializer {
                    None => Value::Nil,
                    Some(e) => self.evaluate(e)?,
                };
                self.environment.declare(name, value)?;
                Ok(Flow::Normal)
            }
            Statement::Block(stmts) => {
                let environment = self.environment.new_child();
                self.execute_block(stmts, environment)
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }
            Statement::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    match self.execute(body)? {
                        Flow::Normal => (),
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                }
                Ok(Flow::Normal)
            }
            Statement::Forawhile { body } => {
                let iterations = (self.iteration_bound)();
                debug!("forawhile runs its body {} times", iterations);
                for _ in 0..iterations {
                    match self.execute(body)? {
                        Flow::Normal => (),
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                }
                Ok(Flow::Normal)
            }
            Statement::Function { name, params, body } => {
                debug!("defining function '{}'", name.lexeme);
                let function = ScriptFunction::new(
                    name.clone(),
                    params.clone(),
                    Rc::clone(body),
                    self.environment.clone(),
                );
                self.environment
                    .define(&name.lexeme, Value::Callable(Callable::Function(function)));
                Ok(Flow::Normal)
            }
            Statement::Return { value, .. } => {
                let value = match value {
                    None => Value::Nil,
                    Some(e) => self.evaluate(e)?,
                };
                Ok(Flow::Return(value))
            }
        }
    }
}

fn native_clock(_interpreter: &mut Interpreter, _arguments: &[Value]) -> Result<Value, RuntimeError> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    Ok(Value::Number(elapsed.as_secs_f64()))
}

fn native_print(interpreter: &mut Interpreter, arguments: &[Value]) -> Result<Value, RuntimeError> {
    let _ = write!(interpreter.out, "{}", join_arguments(arguments));
    let _ = interpreter.out.flush();
    Ok(Value::Nil)
}

fn native_println(interpreter: &mut Interpreter, arguments: &[Value]) -> Result<Value, RuntimeError> {
    let _ = writeln!(interpreter.out, "{}", join_arguments(arguments));
    Ok(Value::Nil)
}

fn join_arguments(arguments: &[Value]) -> String {
    arguments
        .iter()
        .map(|argument| argument.to_string())
        .collect::<Vec<String>>()
        .join(" ")
}

fn default_iteration_bound() -> usize {
    rand::thread_rng().gen_range(0..i32::MAX) as usize
}

fn number_operands(
    operator: &Token,
    left: &Value,
    right: &Value,
) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok((*l, *r)),
        _ => Err(RuntimeError::new(
            RuntimeErrorKind::ExpectedNumbers,
            operator.line,
        )),
    }
}

fn add_operands(operator: &Token, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
        (Value::String(l), Value::String(r)) => Ok(Value::String(l + &r)),
        (Value::String(l), Value::Number(r)) => {
            Ok(Value::String(format!("{}{}", l, Value::Number(r))))
        }
        (Value::Number(l), Value::String(r)) => {
            Ok(Value::String(format!("{}{}", Value::Number(l), r)))
        }
        _ => Err(RuntimeError::new(
            RuntimeErrorKind::ExpectedNumbersOrStrings,
            operator.line,
        )),
    }
}

fn multiply_operands(operator: &Token, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l * r)),
        (Value::String(s), Value::Number(n)) | (Value::Number(n), Value::String(s)) => {
            Ok(Value::String(repeat_string(&s, n)))
        }
        _ => Err(RuntimeError::new(
            RuntimeErrorKind::ExpectedNumbersOrStrings,
            operator.line,
        )),
    }
}

// The count truncates toward zero; zero or negative counts produce "".
fn repeat_string(s: &str, count: f64) -> String {
    let count = count as i64;
    if count <= 0 {
        return String::new();
    }
    s.repeat(count as usize)
}

#[cfg(test)]
mod interpreter_tests {
    use crate::interpreter::{native_print, Interpreter};
    use crate::session::recording;
    use crate::value::Value;
    use std::cell::RefCell;
    use std::io;
    use std::io::Write;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedOutput(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedOutput {
        fn text(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    fn interpreter() -> (Interpreter, SharedOutput) {
        let output = SharedOutput::default();
        (Interpreter::with_output(Box::new(output.clone())), output)
    }

    fn run(source: &str) -> (String, Vec<String>) {
        let (mut interp, output) = interpreter();
        let (mut session, log) = recording::session();
        crate::run_program(&mut interp, source, &mut session);
        (output.text(), log.entries())
    }

    fn eval(source: &str) -> Value {
        let (mut interp, _output) = interpreter();
        let (mut session, log) = recording::session();
        let value = crate::run_expression(&mut interp, source, &mut session);
        assert!(log.len() == 0, "unexpected errors: {:?}", log.entries());
        value.expect("expression produced no value")
    }

    fn eval_error(source: &str) -> Vec<String> {
        let (mut interp, _output) = interpreter();
        let (mut session, log) = recording::session();
        let value = crate::run_expression(&mut interp, source, &mut session);
        assert!(value.is_none());
        assert!(session.had_runtime_error());
        log.entries()
    }

    #[test]
    fn arithmetic() {
        assert_eq!(eval("1 + 2 * 3"), Value::Number(7.0));
        assert_eq!(eval("(1 + 2) * 3"), Value::Number(9.0));
        assert_eq!(eval("10 - 4 / 2"), Value::Number(8.0));
        assert_eq!(eval("-3 + 1"), Value::Number(-2.0));
        assert_eq!(eval("0.1 + 0.2"), Value::Number(0.1 + 0.2));
    }

    #[test]
    fn division_by_zero_is_ieee() {
        assert_eq!(eval("1 / 0"), Value::Number(f64::INFINITY));
        assert_eq!(eval("-1 / 0"), Value::Number(f64::NEG_INFINITY));
        match eval("0 / 0") {
            Value::Number(n) => assert!(n.is_nan()),
            other => panic!("expected NaN, got {}", other),
        }
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(eval("\"ab\" + \"cd\""), Value::String("abcd".to_string()));
        assert_eq!(eval("\"x = \" + 2"), Value::String("x = 2".to_string()));
        assert_eq!(eval("2.5 + \"!\""), Value::String("2.5!".to_string()));
    }

    #[test]
    fn string_repetition() {
        assert_eq!(eval("\"ab\" * 3"), Value::String("ababab".to_string()));
        assert_eq!(eval("3 * \"ab\""), Value::String("ababab".to_string()));
        assert_eq!(eval("\"ab\" * 0"), Value::String(String::new()));
        assert_eq!(eval("\"ab\" * -1"), Value::String(String::new()));
        // The count truncates.
        assert_eq!(eval("\"ab\" * 2.9"), Value::String("abab".to_string()));
    }

    #[test]
    fn equality_never_holds_for_nil() {
        assert_eq!(eval("nil == nil"), Value::Boolean(false));
        assert_eq!(eval("nil != nil"), Value::Boolean(true));
        assert_eq!(eval("nil == 1"), Value::Boolean(false));
        assert_eq!(eval("1 == 1"), Value::Boolean(true));
        assert_eq!(eval("1 == \"1\""), Value::Boolean(false));
        assert_eq!(eval("\"a\" == \"a\""), Value::Boolean(true));
        assert_eq!(eval("true != false"), Value::Boolean(true));
    }

    #[test]
    fn logical_operators_return_the_operand() {
        assert_eq!(eval("nil or \"fallback\""), Value::String("fallback".to_string()));
        assert_eq!(eval("\"first\" or \"second\""), Value::String("first".to_string()));
        assert_eq!(eval("nil and 2"), Value::Nil);
        assert_eq!(eval("1 and 2"), Value::Number(2.0));
        assert_eq!(eval("false or nil"), Value::Nil);
    }

    #[test]
    fn short_circuit_skips_the_right_operand() {
        // A runtime error in the right operand would surface if it ran.
        assert_eq!(eval("true or missing"), Value::Boolean(true));
        assert_eq!(eval("false and missing"), Value::Boolean(false));
    }

    #[test]
    fn ternary_selects_by_truthiness() {
        assert_eq!(eval("1 == 1 ? \"a\" : \"b\""), Value::String("a".to_string()));
        assert_eq!(eval("1 == 2 ? \"a\" : \"b\""), Value::String("b".to_string()));
        // The ternary binds tighter than `and`, so the whole thing
        // short-circuits to false.
        assert_eq!(eval("false and true ? \"t\" : \"f\""), Value::Boolean(false));
    }

    #[test]
    fn ternary_evaluates_both_branches() {
        let (output, errors) = run(
            "let trace be \"\";\n\
             func note(x) {\n\
                 trace = trace + x;\n\
                 return x;\n\
             }\n\
             let picked be note(\"c\") == \"c\" ? note(\"t\") : note(\"f\");\n\
             print trace;\n\
             print picked;\n",
        );
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(output, "ctf\nt\n");
    }

    #[test]
    fn zero_and_empty_string_are_truthy() {
        let (output, errors) = run("if (0) print \"zero\"; if (\"\") print \"empty\";");
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(output, "zero\nempty\n");
    }

    #[test]
    fn shadowing_does_not_leak() {
        let (output, errors) = run("let x be 1; { let x be 2; print x; } print x;");
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(output, "2\n1\n");
    }

    #[test]
    fn redeclaration_in_same_scope_fails() {
        let (output, errors) = run("let x be 1; let x be 2;");
        assert_eq!(output, "");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Variable 'x' is already defined."));
    }

    #[test]
    fn undefined_variable() {
        let (_, errors) = run("print y;");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Undefined variable 'y'."));
        assert!(errors[0].contains("[line 1]"));
    }

    #[test]
    fn uninitialized_let_is_nil() {
        let (output, errors) = run("let x; print x;");
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(output, "nil\n");
    }

    #[test]
    fn closures_capture_their_environment() {
        let (output, errors) = run(
            "func make_counter() {\n\
                 let count be 0;\n\
                 func increment() {\n\
                     count = count + 1;\n\
                     return count;\n\
                 }\n\
                 return increment;\n\
             }\n\
             let a be make_counter();\n\
             let b be make_counter();\n\
             print a();\n\
             print a();\n\
             print b();\n",
        );
        assert!(errors.is_empty(), "{:?}", errors);
        // Two counters, separate state.
        assert_eq!(output, "1\n2\n1\n");
    }

    #[test]
    fn closures_capture_parameters() {
        let (output, errors) = run(
            "func adder(n) {\n\
                 func add(x) { return x + n; }\n\
                 return add;\n\
             }\n\
             let add2 be adder(2);\n\
             print add2(40);\n",
        );
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(output, "42\n");
    }

    #[test]
    fn for_loop_counts() {
        let (output, errors) = run("for (let i be 0; i < 3; i = i + 1) print i;");
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(output, "0\n1\n2\n");
    }

    #[test]
    fn return_unwinds_through_loops() {
        let (output, errors) = run(
            "func first_over(limit) {\n\
                 let n be 0;\n\
                 while (true) {\n\
                     n = n + 1;\n\
                     if (n > limit) return n;\n\
                 }\n\
             }\n\
             print first_over(3);\n",
        );
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(output, "4\n");
    }

    #[test]
    fn falling_off_a_body_yields_nil() {
        let (output, errors) = run("func noop() {} print noop();");
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(output, "nil\n");
    }

    #[test]
    fn chained_calls() {
        let (output, errors) = run(
            "func outer() {\n\
                 func inner() { return 9; }\n\
                 return inner;\n\
             }\n\
             print outer()();\n",
        );
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(output, "9\n");
    }

    #[test]
    fn top_level_return_stops_the_run() {
        let (output, errors) = run("print 1; return; print 2;");
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(output, "1\n");
    }

    #[test]
    fn arity_mismatch() {
        let (_, errors) = run("func f(a) { return a; } f(1, 2);");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Expected 1 arguments but got 2."));
    }

    #[test]
    fn calling_a_non_callable() {
        let (_, errors) = run("let x be 1; x();");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Can only call functions."));
    }

    #[test]
    fn operand_type_errors() {
        assert!(eval_error("-\"a\"")[0].contains("Operand must be a number."));
        assert!(eval_error("1 < \"a\"")[0].contains("Operands must be numbers."));
        assert!(eval_error("1 + nil")[0].contains("Operands must be numbers or strings."));
        assert!(eval_error("true * 2")[0].contains("Operands must be numbers or strings."));
    }

    #[test]
    fn runtime_error_aborts_the_run() {
        let (output, errors) = run("print 1; 1 + nil; print 2;");
        assert_eq!(output, "1\n");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn forawhile_honors_the_injected_bound() {
        let (mut interp, output) = interpreter();
        interp.iteration_bound = || 3;
        let (mut session, log) = recording::session();
        crate::run_program(
            &mut interp,
            "let x be 0; forawhile x = x + 1; print x;",
            &mut session,
        );
        assert_eq!(log.len(), 0, "{:?}", log.entries());
        assert_eq!(output.text(), "3\n");
    }

    #[test]
    fn forawhile_with_a_zero_bound_skips_the_body() {
        let (mut interp, output) = interpreter();
        interp.iteration_bound = || 0;
        let (mut session, _log) = recording::session();
        crate::run_program(
            &mut interp,
            "let x be 0; forawhile x = x + 1; print x;",
            &mut session,
        );
        assert_eq!(output.text(), "0\n");
    }

    #[test]
    fn println_joins_with_spaces() {
        let (output, errors) = run("println(\"a\", 1, nil, true);");
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(output, "a 1 nil true\n");
    }

    #[test]
    fn print_native_emits_no_newline() {
        let (mut interp, output) = interpreter();
        native_print(
            &mut interp,
            &[Value::Number(1.0), Value::String("x".to_string())],
        )
        .unwrap();
        assert_eq!(output.text(), "1 x");
    }

    #[test]
    fn print_statement_stringifies() {
        let (output, errors) = run("print 2 + 2; print nil; print \"hi\" + \"!\";");
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(output, "4\nnil\nhi!\n");
    }

    #[test]
    fn function_values_print_their_name() {
        let (output, errors) = run("func greet() {} print greet;");
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(output, "<func greet>\n");
    }

    #[test]
    fn clock_returns_seconds() {
        match eval("clock()") {
            Value::Number(n) => assert!(n > 0.0),
            other => panic!("expected a number, got {}", other),
        }
        match eval("clock") {
            Value::Callable(_) => (),
            other => panic!("expected a callable, got {}", other),
        }
    }

    #[test]
    fn clock_rejects_arguments() {
        let errors = eval_error("clock(1)");
        assert!(errors[0].contains("Expected 0 arguments but got 1."));
    }

    #[test]
    fn globals_persist_across_runs() {
        let (mut interp, output) = interpreter();
        let (mut session, _log) = recording::session();
        crate::run_program(&mut interp, "let x be 10;", &mut session);
        crate::run_program(&mut interp, "print x;", &mut session);
        let value = crate::run_expression(&mut interp, "x * 2", &mut session);
        assert_eq!(output.text(), "10\n");
        assert_eq!(value, Some(Value::Number(20.0)));
    }

    #[test]
    fn forever_loops_until_return() {
        let (output, errors) = run(
            "func count_to(limit) {\n\
                 let n be 0;\n\
                 forever {\n\
                     n = n + 1;\n\
                     if (n == limit) return n;\n\
                 }\n\
             }\n\
             print count_to(5);\n",
        );
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(output, "5\n");
    }
}
