use wio::{
    error::{Error, RuntimeError},
    interpreter::session::RunOptions,
    run_source,
};

fn run(src: &str) -> Result<(), Error> {
    run_source(src, RunOptions::default())
}

fn assert_success(src: &str) {
    if let Err(e) = run(src) {
        panic!("Script failed: {e}\n{src}");
    }
}

fn assert_failure(src: &str) {
    if run(src).is_ok() {
        panic!("Script succeeded but was expected to fail:\n{src}")
    }
}

fn runtime_error(src: &str) -> RuntimeError {
    match run(src) {
        Err(Error::Runtime(error)) => error,
        Err(other) => panic!("Expected a runtime error, got: {other}"),
        Ok(()) => panic!("Script succeeded but was expected to fail:\n{src}"),
    }
}

#[test]
fn assignment_and_basic_arithmetic() {
    assert_success("var x = 1 + 2; assert(x == 3);");
    assert_success("var x = 7 * 9; assert(x == 63);");
    assert_success("var x = 8 - 5; assert(x == 3);");
    assert_success("var x = 7 / 2; assert(x == 3);");
    assert_success("var x = 7 % 4; assert(x == 3);");
    assert_success("var x = 2 + 3 * 4; assert(x == 14);");
    assert_success("var x = (2 + 3) * 4; assert(x == 20);");
}

#[test]
fn mixed_numbers_promote_to_float() {
    assert_success("var x = 1 + 0.5; assert(x == 1.5); assert(typeof(x) == \"float\");");
    assert_success("var x = 7.0 / 2; assert(x == 3.5);");
}

#[test]
fn compound_assignment_and_increments() {
    assert_success("var x = 5; x += 3; x -= 1; x *= 2; assert(x == 14);");
    assert_success("var x = 5; var y = x++; assert(y == 5); assert(x == 6);");
    assert_success("var x = 5; var y = ++x; assert(y == 6); assert(x == 6);");
    assert_success("var x = 5; x--; --x; assert(x == 3);");
}

#[test]
fn integer_overflow_is_an_error() {
    let error = runtime_error("var x = 9223372036854775807; x = x + 1;");
    assert!(matches!(error, RuntimeError::Overflow { .. }));
}

#[test]
fn division_by_zero_is_an_error() {
    assert!(matches!(runtime_error("var x = 1 / 0;"), RuntimeError::DivisionByZero { .. }));
    assert!(matches!(runtime_error("var x = 1.5 % 0.0;"), RuntimeError::DivisionByZero { .. }));
    assert!(matches!(runtime_error("var x = 1.0 / 0.0;"), RuntimeError::DivisionByZero { .. }));
}

#[test]
fn bitwise_and_shift_operators() {
    assert_success("assert((6 & 3) == 2); assert((6 | 3) == 7); assert((6 ^ 3) == 5);");
    assert_success("assert((1 << 4) == 16); assert((256 >> 4) == 16); assert(~0 == -1);");
    assert_failure("var x = 1.5 & 1;");
}

#[test]
fn shifts_that_lose_bits_overflow() {
    assert!(matches!(runtime_error("var x = 1 << 63;"), RuntimeError::Overflow { .. }));
    assert!(matches!(runtime_error("var x = 3 << 62;"), RuntimeError::Overflow { .. }));
    assert!(matches!(runtime_error("var x = 1 << 64;"), RuntimeError::Overflow { .. }));
    assert_success("assert((1 << 62) == 4611686018427387904); assert((-1 << 63) < 0);");
}

#[test]
fn logical_operators_short_circuit() {
    assert_success("var hits = 0; func hit() { hits++; return true; } \
                    var r = false && hit(); assert(!r); assert(hits == 0);");
    assert_success("var hits = 0; func hit() { hits++; return true; } \
                    var r = true || hit(); assert(r); assert(hits == 0);");
    assert_success("assert(true ^^ false); assert(!(true ^^ true));");
    assert!(matches!(runtime_error("if (1) { }"), RuntimeError::ExpectedBoolean { .. }));
}

#[test]
fn string_concatenation_and_comparison() {
    assert_success("var s = \"a\" + \"b\" + 1 + 'c'; assert(s == \"ab1c\");");
    assert_success("assert(\"abc\" < \"abd\"); assert('a' < 'b');");
    assert_success("var s = \"wio\"; assert(s[0] == 'w'); assert(s[-1] == 'o');");
    assert_failure("var s = \"wio\"; s[0] = 'x';");
}

#[test]
fn comparing_unrelated_kinds_is_an_error() {
    assert!(matches!(runtime_error("var b = 1 == \"1\";"), RuntimeError::TypeMismatch { .. }));
    assert_success("var x = null; assert(x == null);");
}

#[test]
fn scopes_shadow_and_reject_duplicates() {
    assert_success("var x = 1; { var x = 2; assert(x == 2); } assert(x == 1);");
    assert!(matches!(runtime_error("var x = 1; var x = 2;"), RuntimeError::DuplicateSymbol { .. }));
    assert!(matches!(runtime_error("{ var inner = 1; } var y = inner;"),
                     RuntimeError::UnknownVariable { .. }));
}

#[test]
fn global_declarations_escape_blocks() {
    assert_success("{ global var g = 4; } assert(g == 4);");
    assert_success("func setup() { global var configured = true; } setup(); assert(configured);");
}

#[test]
fn constants_cannot_be_modified() {
    assert!(matches!(runtime_error("const var x = 1; x = 2;"), RuntimeError::ConstModification { .. }));
    assert!(matches!(runtime_error("const array a = [1, 2]; a[0] = 5;"),
                     RuntimeError::ConstModification { .. }));
    assert!(matches!(runtime_error("const var x = 1; x++;"), RuntimeError::ConstModification { .. }));
}

#[test]
fn arrays_index_from_both_ends() {
    assert_success("array a = [10, 20, 30]; assert(a[0] == 10); assert(a[-1] == 30);");
    assert_success("array a = [1, 2]; a[1] = 5; assert(a[1] == 5);");
    assert_success("array a = [[1, 2], [3, 4]]; a[1][0] = 9; assert(a[1][0] == 9);");
    assert!(matches!(runtime_error("array a = [1, 2]; var x = a[2];"),
                     RuntimeError::IndexOutOfBounds { index: 2, size: 2, .. }));
    assert!(matches!(runtime_error("array a = [1, 2]; var x = a[-3];"),
                     RuntimeError::IndexOutOfBounds { .. }));
}

#[test]
fn assignment_copies_values() {
    assert_success("array a = [1, 2]; array b = a; b[0] = 9; assert(a[0] == 1);");
    assert_success("dict d = {\"k\": [1]}; dict e = d; e[\"k\"][0] = 2; assert(d[\"k\"][0] == 1);");
    assert_success("array a = [1]; array b = [a, a]; b[0][0] = 5; assert(b[1][0] == 1); assert(a[0] == 1);");
}

#[test]
fn ref_bindings_alias_storage() {
    assert_success("var x = 1; ref var y = x; y = 5; assert(x == 5);");
    assert_success("array a = [1, 2]; ref var first = a[0]; first = 7; assert(a[0] == 7);");
    assert!(matches!(runtime_error("const var x = 1; ref var y = x; y = 2;"),
                     RuntimeError::ConstModification { .. }));
}

#[test]
fn dictionaries_keep_insertion_order() {
    assert_success("dict d = {\"b\": 1, \"a\": 2}; array k = keys(d); assert(k[0] == \"b\"); assert(k[1] == \"a\");");
    assert_success("dict d = {}; d[\"x\"] = 1; d[2] = \"two\"; assert(d[\"2\"] == \"two\"); assert(size(d) == 2);");
    assert_success("dict d = {1: \"one\"}; assert(contains(d, 1)); assert(!contains(d, \"2\"));");
    assert!(matches!(runtime_error("dict d = {}; var x = d[\"missing\"];"), RuntimeError::MissingKey { .. }));
    assert!(matches!(runtime_error("dict d = {\"a\": 1, \"a\": 2};"), RuntimeError::DuplicateKey { .. }));
    assert!(matches!(runtime_error("dict d = {true: 1};"), RuntimeError::InvalidKey { .. }));
}

#[test]
fn if_else_chains() {
    assert_success("var x = 5; var r = 0; \
                    if (x < 3) { r = 1; } else if (x < 10) { r = 2; } else { r = 3; } \
                    assert(r == 2);");
}

#[test]
fn while_and_for_loops() {
    assert_success("var i = 0; var sum = 0; while (i < 5) { sum += i; i++; } assert(sum == 10);");
    assert_success("var sum = 0; for (var i = 1; i <= 4; i++) { sum += i; } assert(sum == 10);");
    assert_success("var sum = 0; for (var i = 0; i < 10; i++) { if (i == 5) { break; } if (i % 2 == 0) { continue; } sum += i; } assert(sum == 4);");
    assert_success("for (var i = 0; i < 2; i++) { } var i = 7; assert(i == 7);");
    assert_success("var n = 0; for (;;) { n++; if (n == 3) { break; } } assert(n == 3);");
}

#[test]
fn loop_bodies_get_a_fresh_scope_per_iteration() {
    assert_success("for (var i = 0; i < 3; i++) { var inner = i; } var inner = 1;");
}

#[test]
fn foreach_over_collections() {
    assert_success("var sum = 0; foreach (x in [1, 2, 3]) { sum += x; } assert(sum == 6);");
    assert_success("var sum = 0; foreach (i, x in [5, 6]) { sum += i * x; } assert(sum == 6);");
    assert_success("var s = \"\"; foreach (k, v in {\"a\": 1, \"b\": 2}) { s = s + k + v; } assert(s == \"a1b2\");");
    assert_success("var n = 0; foreach (c in \"abc\") { n++; } assert(n == 3);");
}

#[test]
fn foreach_by_value_and_by_reference() {
    assert_success("array a = [1, 2]; foreach (x in a) { x = 0; } assert(a[0] == 1);");
    assert_success("array a = [1, 2]; foreach (ref x in a) { x *= 10; } assert(a[0] == 10); assert(a[1] == 20);");
    assert_failure("foreach (ref c in \"abc\") { }");
    assert_failure("foreach (x in 5) { }");
}

#[test]
fn functions_and_recursion() {
    assert_success("func add(var a, var b) { return a + b; } assert(add(2, 3) == 5);");
    assert_success("func fact(var n) { if (n <= 1) { return 1; } return n * fact(n - 1); } assert(fact(10) == 3628800);");
    assert_success("func nothing() { } assert(nothing() == null);");
}

#[test]
fn parameters_are_copies_unless_ref() {
    assert_success("func clear(array a) { a[0] = 0; } array xs = [1]; clear(xs); assert(xs[0] == 1);");
    assert_success("func clear(ref array a) { a[0] = 0; } array xs = [1]; clear(xs); assert(xs[0] == 0);");
    assert_success("func bump(ref var n) { n++; } var x = 1; bump(x); assert(x == 2);");
    assert!(matches!(runtime_error("func bump(ref var n) { n++; } bump(1);"),
                     RuntimeError::InvalidArgument { .. }));
    assert!(matches!(runtime_error("func bump(ref var n) { n++; } const var c = 1; bump(c);"),
                     RuntimeError::ConstModification { .. }));
}

#[test]
fn overloads_are_selected_by_kind() {
    assert_success("func f(var x) { return \"var\"; } func f(array x) { return \"array\"; } \
                    assert(f(1) == \"var\"); assert(f([1]) == \"array\");");
    assert_success("func f(omni x) { return 1; } func f(var x) { return 2; } \
                    assert(f(1) == 2); assert(f([1]) == 1);");
    assert_success("func f() { return 0; } func f(var a) { return 1; } assert(f() == 0); assert(f(9) == 1);");
}

#[test]
fn overload_errors() {
    assert!(matches!(runtime_error("func f(var x) { } f(1, 2);"), RuntimeError::NoMatchingOverload { .. }));
    assert!(matches!(runtime_error("func f(var x) { } func f(var y) { }"),
                     RuntimeError::DuplicateOverload { .. }));
    assert!(matches!(runtime_error("func f(omni x, var y) { } func f(var x, omni y) { } f(1, 2);"),
                     RuntimeError::AmbiguousCall { .. }));
}

#[test]
fn forward_declarations_resolve_later() {
    assert_success("func is_even(var n); \
                    func is_odd(var n) { if (n == 0) { return false; } return is_even(n - 1); } \
                    func is_even(var n) { if (n == 0) { return true; } return is_odd(n - 1); } \
                    assert(is_even(10)); assert(is_odd(7));");
    assert!(matches!(runtime_error("func later(var n); later(1);"), RuntimeError::UndefinedOverload { .. }));
}

#[test]
fn lambdas_capture_their_scope() {
    assert_success("func make() { var n = 0; return @() { n++; return n; }; } \
                    omni counter = make(); counter(); assert(counter() == 2);");
    assert_success("func twice = @(var x) { return x * 2; }; assert(twice(21) == 42);");
    assert_success("func apply(func f, var x) { return f(x); } assert(apply(@(var v) { return v + 1; }, 1) == 2);");
}

#[test]
fn function_aliases() {
    assert_success("func double(var x) { return x * 2; } func d = double; assert(d(4) == 8);");
    assert_success("func empty = null; assert(empty == null);");
    assert!(matches!(runtime_error("var five = 5; func f = five;"), RuntimeError::DeclaredTypeMismatch { .. }));
}

#[test]
fn calling_a_non_function_fails() {
    assert!(matches!(runtime_error("var x = 1; x();"), RuntimeError::NotCallable { .. }));
}

#[test]
fn enums_number_their_members() {
    assert_success("enum Color { Red, Green = 5, Blue } \
                    assert(Color.Red == 0); assert(Color.Green == 5); assert(Color.Blue == 6);");
    assert_success("enum Level { Low = -1, Mid, High } \
                    assert(enum_name(Level, 0) == \"Mid\"); \
                    assert(enum_value(Level, \"High\") == 1); \
                    assert(enum_index(Level, \"High\") == 2);");
    assert!(matches!(runtime_error("enum E { A } var x = E.B;"), RuntimeError::UnknownMember { .. }));
    assert!(matches!(runtime_error("enum E { A } E.A = 3;"), RuntimeError::ConstModification { .. }));
    assert!(matches!(runtime_error("enum E { A = 9223372036854775807, B }"),
                     RuntimeError::Overflow { .. }));
}

#[test]
fn realms_group_declarations() {
    assert_success("realm geometry { const var SIDES = 4; func area(var w, var h) { return w * h; } } \
                    assert(geometry.SIDES == 4); assert(geometry.area(2, 3) == 6);");
    assert_success("realm outer { realm inner { var depth = 2; } } assert(outer.inner.depth == 2);");
    assert_success("realm counter { var n = 0; func bump() { n++; return n; } } counter.bump(); assert(counter.n == 1);");
}

#[test]
fn typeof_and_type_constants() {
    assert_success("assert(typeof(1) == \"int\"); assert(typeof(1.0) == \"float\"); \
                    assert(typeof(\"s\") == \"string\"); assert(typeof('c') == \"char\"); \
                    assert(typeof(true) == \"bool\"); assert(typeof(null) == \"null\"); \
                    assert(typeof([]) == \"array\"); assert(typeof({}) == \"dict\");");
    assert_success("assert(types.INTEGER == typeof(1)); assert(types.DICTIONARY == \"dict\"); \
                    assert(types.OBJECT == \"object\");");
    assert_success("func f() { } enum E { A } realm R { } \
                    assert(typeof(f) == types.FUNCTION); assert(typeof(E) == types.ENUM); \
                    assert(typeof(R) == types.REALM);");
}

#[test]
fn type_annotations_are_checked() {
    assert_success("var x: int = 3; var y: any = \"free\"; var z: float = 1.5;");
    assert_success("func f() { return 1; } var n: int = f();");
    assert!(matches!(runtime_error("func f() { return 1.5; } var n: int = f();"),
                     RuntimeError::DeclaredTypeMismatch { .. }));
    assert!(matches!(runtime_error("func f() { return [1]; } var n = f();"),
                     RuntimeError::DeclaredTypeMismatch { .. }));
    assert_failure("var x: int = \"text\";");
}

#[test]
fn unbound_symbols_are_reported() {
    assert!(matches!(runtime_error("var x = x + 1;"), RuntimeError::UnboundSymbol { .. }));
}

#[test]
fn util_conversions() {
    assert_success("assert(to_int(\"12\") + 1 == 13); assert(to_int(3.9) == 3); assert(to_int(true) == 1);");
    assert_success("assert(to_float(2) == 2.0); assert(to_float(\"0.5\") == 0.5);");
    assert_success("assert(to_string([1, \"a\"]) == \"[1, \\\"a\\\"]\"); assert(to_string(1.0) == \"1.0\");");
    assert_success("array a = []; push(a, 1); push(a, [2]); assert(size(a) == 2); assert(pop(a)[0] == 2);");
    assert_success("assert(size(\"héllo\") == 5);");
}

#[test]
fn math_module() {
    assert_success("assert(abs(-3) == 3); assert(sqrt(16) == 4.0); assert(pow(2, 10) == 1024);");
    assert_success("assert(floor(2.7) == 2.0); assert(ceil(2.1) == 3.0); assert(round(2.5) == 3.0);");
    assert_success("assert(min(2, 3) == 2); assert(max(2.5, 1) == 2.5); assert(PI > 3.14); assert(E < 2.72);");
    assert_failure("var x = ln(0);");
}

#[test]
fn failing_assertion_stops_the_run() {
    assert!(matches!(runtime_error("assert(1 == 2);"), RuntimeError::AssertionFailed { .. }));
}

#[test]
fn error_messages_carry_locations() {
    let error = runtime_error("var a = 1;\nvar b = a / 0;");
    assert_eq!(error.to_string(), "Error on line 2, column 11: Division by zero.");
}

#[test]
fn builtins_can_be_disabled() {
    let options = RunOptions { no_builtin: true,
                               ..RunOptions::default() };
    assert!(run_source("println(1);", options.clone()).is_err());
    assert!(run_source("import \"wio.util\"; assert(true);", options).is_ok());
}

#[test]
fn unknown_builtin_module_is_an_error() {
    assert!(matches!(runtime_error("import \"wio.net\";"), RuntimeError::UnknownModule { .. }));
}

#[test]
fn program_arguments_are_available() {
    let options = RunOptions { arguments: vec!["one".to_string(), "two".to_string()],
                               ..RunOptions::default() };
    assert!(run_source("assert(size(argv) == 2); assert(argv[1] == \"two\");", options).is_ok());
}

#[test]
fn misplaced_control_flow_is_rejected_before_running() {
    assert!(matches!(run("break;"), Err(Error::Parse(_))));
    assert!(matches!(run("if (false) { return 1; }"), Err(Error::Parse(_))));
    assert!(matches!(run("func f() { while (true) { return 1; } } f();"), Ok(())));
}
