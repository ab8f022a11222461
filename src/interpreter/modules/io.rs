use std::io::{self, BufRead, Write};

use crate::{
    ast::Location,
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        modules::{OMNI, VAR, register},
        scope::ScopeRef,
        value::core::{Handle, Value},
    },
};

native_functions! {
    "print"   => { params: &[OMNI], func: print },
    "println" => { params: &[OMNI], func: println },
    "input"   => { params: &[],     func: input },
    "input"   => { params: &[VAR],  func: input_with_prompt },
}

/// Registers `print`, `println` and `input`.
pub fn load(scope: &ScopeRef) -> EvalResult<()> {
    register(scope, NATIVES)
}

fn print(args: &[Handle], location: Location) -> EvalResult<Value> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", args[0].borrow()).and_then(|()| stdout.flush())
                                          .map_err(|error| output_error(&error, location))?;
    Ok(Value::Null)
}

fn println(args: &[Handle], location: Location) -> EvalResult<Value> {
    writeln!(io::stdout().lock(), "{}", args[0].borrow()).map_err(|error| output_error(&error, location))?;
    Ok(Value::Null)
}

/// Reads one line from standard input without its line terminator.
fn input(_: &[Handle], location: Location) -> EvalResult<Value> {
    let mut line = String::new();
    io::stdin().lock()
               .read_line(&mut line)
               .map_err(|error| RuntimeError::Input { details: error.to_string(),
                                                      location })?;

    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(Value::String(line))
}

fn input_with_prompt(args: &[Handle], location: Location) -> EvalResult<Value> {
    print(args, location)?;
    input(&[], location)
}

fn output_error(error: &io::Error, location: Location) -> RuntimeError {
    RuntimeError::Input { details: format!("cannot write to standard output: {error}"),
                          location }
}
