use clap::{App, Arg};
use letbe::ast::AstPrinter;
use letbe::interpreter::Interpreter;
use letbe::parser::Parser;
use letbe::scanner;
use letbe::session::Session;
use std::fs;
use std::io::{self, Write};
use std::process;

fn main() {
    env_logger::init();
    let matches = App::new("letbe")
        .about("Tree-walking interpreter for the Letbe scripting language")
        .arg(
            Arg::with_name("script")
                .help("Script file to run; omit it for an interactive prompt")
                .index(1),
        )
        .arg(
            Arg::with_name("tokens")
                .long("tokens")
                .help("Dump the scanned token stream instead of running"),
        )
        .arg(
            Arg::with_name("ast")
                .long("ast")
                .help("Dump the parsed syntax tree instead of running"),
        )
        .get_matches();

    match matches.value_of("script") {
        Some(path) => run_file(
            path,
            matches.is_present("tokens"),
            matches.is_present("ast"),
        ),
        None => run_prompt(),
    }
}

fn run_file(path: &str, dump_tokens: bool, dump_ast: bool) {
    let source = fs::read_to_string(path).expect("Something went wrong reading the file");
    let mut session = Session::new();

    if dump_tokens {
        for token in scanner::scan_tokens(&source, &mut session) {
            println!("{}", token);
        }
        process::exit(if session.had_error() { 65 } else { 0 });
    }

    if dump_ast {
        let tokens = scanner::scan_tokens(&source, &mut session);
        let statements = Parser::new(&tokens, &mut session).parse();
        let mut printer = AstPrinter {};
        for statement in &statements {
            println!("{}", statement.accept(&mut printer));
        }
        process::exit(if session.had_error() { 65 } else { 0 });
    }

    let mut interpreter = Interpreter::new();
    letbe::run_program(&mut interpreter, &source, &mut session);

    // Lexical/syntax errors and runtime errors exit differently, so shell
    // scripts can tell them apart.
    if session.had_error() {
        process::exit(65);
    }
    if session.had_runtime_error() {
        process::exit(70);
    }
}

fn run_prompt() {
    let mut interpreter = Interpreter::new();
    let mut session = Session::new();
    loop {
        print!("> ");
        io::stdout().flush().unwrap();
        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => (),
            Err(_) => break,
        }
        if let Some(value) = letbe::run_expression(&mut interpreter, &line, &mut session) {
            println!("{}", value);
        }
        session.reset();
    }
}
