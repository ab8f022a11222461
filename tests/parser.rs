use pretty_assertions::assert_eq;
use wio::{
    ast::{
        Access, AssignOperator, BinaryOperator, BindingDecl, BindingKind, Expr, FunctionShape, ImportTarget,
        LiteralValue, Location, Program, Qualifiers, Statement, Storage, TypeKind,
    },
    error::ParseError,
    parse_source,
};

fn parse(source: &str) -> Program {
    match parse_source(source) {
        Ok(program) => program,
        Err(e) => panic!("Parsing failed: {e}\n{source}"),
    }
}

fn single(source: &str) -> Statement {
    let mut program = parse(source);
    assert_eq!(program.statements.len(), 1, "expected one statement in {source}");
    program.statements.remove(0)
}

fn int(value: i64, line: usize, column: usize) -> Expr {
    Expr::Literal { value:    LiteralValue::Integer(value),
                    location: Location::new(line, column), }
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let expected = Statement::Binding(BindingDecl { kind:        BindingKind::Var,
                                                    name:        "x".to_string(),
                                                    annotation:  None,
                                                    initializer: Some(Expr::Binary { left:     Box::new(int(1, 1, 9)),
                                                                                     op:       BinaryOperator::Add,
                                                                                     right:    Box::new(Expr::Binary { left:     Box::new(int(2, 1, 13)),
                                                                                                                       op:       BinaryOperator::Mul,
                                                                                                                       right:    Box::new(int(3, 1, 17)),
                                                                                                                       location: Location::new(1, 15), }),
                                                                                     location: Location::new(1, 11), }),
                                                    qualifiers:  Qualifiers::default(),
                                                    location:    Location::new(1, 1), });

    assert_eq!(single("var x = 1 + 2 * 3;"), expected);
}

#[test]
fn parsing_is_deterministic() {
    let source = "unit U -access exposed { var a = 1; func f(var x) { return x << a; } }\n\
                  enum E { A, B = 3 } realm R { func g() { return [1, 2][0]; } }\n\
                  foreach (k, v in {\"a\": 1}) { if (v > 0) { break; } }";
    assert_eq!(parse(source), parse(source));
}

#[test]
fn binary_operators_are_left_associative() {
    let Statement::Expression { expr, .. } = single("10 - 4 - 3;") else {
        panic!("expected an expression statement");
    };
    let Expr::Binary { left, op, .. } = expr else {
        panic!("expected a binary expression");
    };
    assert_eq!(op, BinaryOperator::Sub);
    assert!(matches!(*left, Expr::Binary { op: BinaryOperator::Sub, .. }));
}

#[test]
fn assignment_is_right_associative_and_marks_lvalues() {
    let Statement::Expression { expr, .. } = single("a = b += 1;") else {
        panic!("expected an expression statement");
    };
    let Expr::Assign { target, op, value, .. } = expr else {
        panic!("expected an assignment");
    };
    assert_eq!(op, AssignOperator::Assign);
    assert!(matches!(*target, Expr::Identifier { is_lvalue: true, .. }));
    assert!(matches!(*value, Expr::Assign { op: AssignOperator::Add, .. }));
}

#[test]
fn qualifiers_and_annotations() {
    let Statement::Binding(decl) = single("global const var limit: int = 10;") else {
        panic!("expected a binding");
    };
    assert_eq!(decl.qualifiers,
               Qualifiers { storage:  Storage::Global,
                            is_const: true,
                            is_ref:   false, });
    assert_eq!(decl.annotation, Some(TypeKind::Integer));
}

#[test]
fn ref_bindings_alias_their_initializer() {
    let Statement::Binding(decl) = parse("var x = 1; ref var y = x;").statements.remove(1) else {
        panic!("expected a binding");
    };
    assert!(matches!(decl.initializer, Some(Expr::Identifier { is_ref: true, .. })));
}

#[test]
fn instantiation_follows_unit_names() {
    let Statement::Binding(decl) = single("var p = Point{1, 2};") else {
        panic!("expected a binding");
    };
    let Some(Expr::Instantiate { unit, arguments, .. }) = decl.initializer else {
        panic!("expected an instantiation");
    };
    assert!(matches!(*unit, Expr::Identifier { ref name, .. } if name == "Point"));
    assert_eq!(arguments.len(), 2);
}

#[test]
fn function_shapes() {
    let program = parse("func f(var a, ref array b); func g = f; func h = @(var x) { return x; }; func k(omni o) { }");
    let shapes: Vec<_> = program.statements
                                .iter()
                                .map(|statement| match statement {
                                    Statement::Function(decl) => &decl.shape,
                                    other => panic!("expected a function, got {other:?}"),
                                })
                                .collect();

    assert!(matches!(shapes[0], FunctionShape::Signature { params, body: None } if params.len() == 2 && params[1].by_ref));
    assert!(matches!(shapes[1], FunctionShape::Alias(Some(_))));
    assert!(matches!(shapes[2], FunctionShape::Lambda(Expr::Lambda { .. })));
    assert!(matches!(shapes[3], FunctionShape::Signature { body: Some(_), .. }));
}

#[test]
fn enum_values_and_trailing_semicolon() {
    let Statement::Enum(decl) = single("enum Color { Red, Green = 5, Blue };") else {
        panic!("expected an enum");
    };
    let values: Vec<_> = decl.members.iter().map(|member| member.value).collect();
    assert_eq!(values, vec![None, Some(5), None]);
}

#[test]
fn unit_header_modifiers() {
    let Statement::Unit(decl) = single("unit Car -final -access exposed -from Vehicle, Engine -trust unit Garage { \
                                        hidden var speed = 0; shared outer func honk() { } }")
    else {
        panic!("expected a unit");
    };

    assert!(decl.is_final);
    assert_eq!(decl.default_access, Some(Access::Exposed));
    assert_eq!(decl.parents, vec!["Vehicle".to_string(), "Engine".to_string()]);
    assert_eq!(decl.trusted, vec!["Garage".to_string()]);
    assert_eq!(decl.members.len(), 2);
    assert_eq!(decl.members[0].access, Some(Access::Hidden));
    assert!(!decl.members[0].is_outer);
    assert_eq!(decl.members[1].access, Some(Access::Shared));
    assert!(decl.members[1].is_outer);
}

#[test]
fn import_targets() {
    let program = parse("import \"wio.io\"; import \"lib/helpers.wio\";");
    let targets: Vec<_> = program.statements
                                 .iter()
                                 .map(|statement| match statement {
                                     Statement::Import { target, .. } => target.clone(),
                                     other => panic!("expected an import, got {other:?}"),
                                 })
                                 .collect();
    assert_eq!(targets,
               vec![ImportTarget::Builtin("wio.io".to_string()),
                    ImportTarget::File("lib/helpers.wio".to_string())]);
}

#[test]
fn foreach_with_key_and_reference() {
    let Statement::Foreach { key, item, by_ref, .. } = single("foreach (i, ref v in items) { }") else {
        panic!("expected a foreach loop");
    };
    assert_eq!(key.as_deref(), Some("i"));
    assert_eq!(item, "v");
    assert!(by_ref);
}

#[test]
fn misplaced_control_flow_is_rejected() {
    assert!(matches!(parse_source("break;"), Err(ParseError::LoopControlOutsideLoop { keyword: "break", .. })));
    assert!(matches!(parse_source("if (true) { continue; }"),
                     Err(ParseError::LoopControlOutsideLoop { keyword: "continue", .. })));
    assert!(matches!(parse_source("return 1;"), Err(ParseError::ReturnOutsideFunction { .. })));
    assert!(matches!(parse_source("while (true) { func f() { break; } }"),
                     Err(ParseError::LoopControlOutsideLoop { .. })));

    assert!(parse_source("while (true) { break; }").is_ok());
    assert!(parse_source("func f() { while (true) { return 1; } }").is_ok());
}

#[test]
fn invalid_assignment_targets() {
    assert!(matches!(parse_source("1 = 2;"), Err(ParseError::InvalidAssignmentTarget { .. })));
    assert!(matches!(parse_source("f() += 1;"), Err(ParseError::InvalidAssignmentTarget { .. })));
}

#[test]
fn invalid_declarations() {
    assert!(matches!(parse_source("const var x;"), Err(ParseError::InvalidDeclaration { .. })));
    assert!(matches!(parse_source("ref var y = 1;"), Err(ParseError::InvalidDeclaration { .. })));
    assert!(matches!(parse_source("var z: nothing = 1;"), Err(ParseError::InvalidDeclaration { .. })));
    assert!(matches!(parse_source("enum Empty { }"), Err(ParseError::InvalidDeclaration { .. })));
    assert!(matches!(parse_source("unit U -sideways { }"), Err(ParseError::InvalidDeclaration { .. })));
}

#[test]
fn misplaced_qualifiers() {
    assert!(matches!(parse_source("hidden var x = 1;"), Err(ParseError::InvalidQualifier { .. })));
    assert!(matches!(parse_source("const const var x = 1;"), Err(ParseError::InvalidQualifier { .. })));
    assert!(matches!(parse_source("ref func f = g;"), Err(ParseError::InvalidQualifier { .. })));
    assert!(matches!(parse_source("realm R { global var x = 1; }"), Err(ParseError::InvalidQualifier { .. })));
}

#[test]
fn statically_known_kinds_must_fit_the_declaration() {
    let error = parse_source("array items = 5;").unwrap_err();
    assert!(matches!(error, ParseError::DeclaredTypeMismatch { .. }));
    assert_eq!(error.to_string(),
               "Error on line 1, column 15: Cannot initialize 'items' of type array with a value of type int.");

    assert!(matches!(parse_source("var s: string = 1 + 2;"), Err(ParseError::DeclaredTypeMismatch { .. })));
    assert!(parse_source("var s: string = \"a\" + 1;").is_ok());
    assert!(parse_source("omni anything = [1];").is_ok());
}

#[test]
fn unexpected_tokens_report_their_location() {
    let error = parse_source("var x = 1;\nvar y = ;").unwrap_err();
    assert!(matches!(error, ParseError::UnexpectedToken { .. }));
    assert_eq!(error.location(), Location::new(2, 9));
}

#[test]
fn unterminated_blocks() {
    assert!(matches!(parse_source("if (true) { var x = 1;"), Err(ParseError::UnexpectedEndOfInput { .. })));
}
