use crate::{
    ast::{Expr, FunctionShape, Program, Statement},
    error::ParseError,
    interpreter::parser::core::ParseResult,
};

/// What the statement being checked is nested in.
#[derive(Clone, Copy, Default)]
struct Nesting {
    in_loop:     bool,
    in_function: bool,
}

impl Nesting {
    const fn looping(self) -> Self {
        Self { in_loop: true,
               ..self }
    }

    const fn function_body() -> Self {
        Self { in_loop:     false,
               in_function: true, }
    }
}

/// Rejects `break`/`continue` outside of loops and `return` outside of
/// function bodies.
///
/// The check covers every branch, including ones that would never run. A loop
/// does not extend into functions declared inside it, so a `break` in a
/// lambda body inside a loop is still an error.
///
/// # Errors
/// `LoopControlOutsideLoop` or `ReturnOutsideFunction` for the first offending
/// statement.
pub fn validate_control_flow(program: &Program) -> ParseResult<()> {
    program.statements
           .iter()
           .try_for_each(|statement| check_statement(statement, Nesting::default()))
}

fn check_statements(statements: &[Statement], nesting: Nesting) -> ParseResult<()> {
    statements.iter()
              .try_for_each(|statement| check_statement(statement, nesting))
}

fn check_statement(statement: &Statement, nesting: Nesting) -> ParseResult<()> {
    match statement {
        Statement::Block { statements, .. } => check_statements(statements, nesting),
        Statement::Expression { expr, .. } => check_expr(expr),
        Statement::If { condition,
                        then_branch,
                        else_branch,
                        .. } => {
            check_expr(condition)?;
            check_statement(then_branch, nesting)?;
            else_branch.as_ref()
                       .map_or(Ok(()), |branch| check_statement(branch, nesting))
        },
        Statement::For { init,
                         condition,
                         step,
                         body,
                         .. } => {
            if let Some(init) = init {
                check_statement(init, nesting)?;
            }
            condition.iter().chain(step).try_for_each(check_expr)?;
            check_statement(body, nesting.looping())
        },
        Statement::Foreach { iterable, body, .. } => {
            check_expr(iterable)?;
            check_statement(body, nesting.looping())
        },
        Statement::While { condition, body, .. } => {
            check_expr(condition)?;
            check_statement(body, nesting.looping())
        },
        Statement::Break { location } if !nesting.in_loop => {
            Err(ParseError::LoopControlOutsideLoop { keyword:  "break",
                                                     location: *location, })
        },
        Statement::Continue { location } if !nesting.in_loop => {
            Err(ParseError::LoopControlOutsideLoop { keyword:  "continue",
                                                     location: *location, })
        },
        Statement::Return { location, .. } if !nesting.in_function => {
            Err(ParseError::ReturnOutsideFunction { location: *location })
        },
        Statement::Return { value, .. } => value.as_ref().map_or(Ok(()), check_expr),
        Statement::Break { .. } | Statement::Continue { .. } | Statement::Import { .. } => Ok(()),
        Statement::Binding(decl) => decl.initializer.as_ref().map_or(Ok(()), check_expr),
        Statement::Function(decl) => match &decl.shape {
            FunctionShape::Alias(_) => Ok(()),
            FunctionShape::Lambda(lambda) => check_expr(lambda),
            FunctionShape::Signature { body, .. } => {
                body.as_ref()
                    .map_or(Ok(()), |body| check_statements(body, Nesting::function_body()))
            },
        },
        Statement::Enum(_) => Ok(()),
        Statement::Realm(decl) => check_statements(&decl.body, Nesting::default()),
        Statement::Unit(decl) => {
            decl.members
                .iter()
                .try_for_each(|member| check_statement(&member.declaration, Nesting::default()))
        },
    }
}

/// Looks for lambdas, whose bodies are function bodies of their own.
fn check_expr(expr: &Expr) -> ParseResult<()> {
    match expr {
        Expr::Lambda { body, .. } => check_statements(body, Nesting::function_body()),
        Expr::Literal { .. } | Expr::Identifier { .. } => Ok(()),
        Expr::Array { elements, .. } => elements.iter().try_for_each(check_expr),
        Expr::Dictionary { entries, .. } => {
            entries.iter()
                   .try_for_each(|(key, value)| check_expr(key).and_then(|()| check_expr(value)))
        },
        Expr::Binary { left, right, .. } => {
            check_expr(left)?;
            check_expr(right)
        },
        Expr::Assign { target, value, .. } => {
            check_expr(target)?;
            check_expr(value)
        },
        Expr::Index { target, index, .. } => {
            check_expr(target)?;
            check_expr(index)
        },
        Expr::Unary { expr, .. }
        | Expr::Postfix { expr, .. }
        | Expr::TypeOf { expr, .. }
        | Expr::Member { target: expr, .. } => check_expr(expr),
        Expr::Call { callee: target,
                     arguments,
                     .. }
        | Expr::Instantiate { unit: target,
                              arguments,
                              .. } => {
            check_expr(target)?;
            arguments.iter().try_for_each(check_expr)
        },
    }
}
