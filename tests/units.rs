use wio::{
    error::{Error, RuntimeError},
    interpreter::session::RunOptions,
    run_source,
};

fn assert_success(src: &str) {
    if let Err(e) = run_source(src, RunOptions::default()) {
        panic!("Script failed: {e}\n{src}");
    }
}

fn runtime_error(src: &str) -> RuntimeError {
    match run_source(src, RunOptions::default()) {
        Err(Error::Runtime(error)) => error,
        Err(other) => panic!("Expected a runtime error, got: {other}"),
        Ok(()) => panic!("Script succeeded but was expected to fail:\n{src}"),
    }
}

const POINT: &str = "
unit Point -access exposed {
    var x = 0;
    var y = 0;
    func ctor(var a, var b) { x = a; y = b; }
    func sum() { return x + y; }
}
";

const ACCOUNT: &str = "
unit Account {
    var balance = 0;
    exposed func deposit(var amount) { balance += amount; }
    exposed func get() { return balance; }
    exposed func merge(var other) { return balance + other.balance; }
    exposed func reader() { return @(var account) { return account.balance; }; }
}
";

fn with(prelude: &str, body: &str) -> String {
    format!("{prelude}\n{body}")
}

#[test]
fn constructor_initializes_members() {
    assert_success(&with(POINT,
                         "var p = Point{1, 2}; assert(p.x == 1); assert(p.y == 2); assert(p.sum() == 3);"));
}

#[test]
fn instances_report_their_type() {
    assert_success(&with(POINT,
                         "var p = Point{1, 2}; \
                          assert(typeof(p) == \"object\"); assert(typeof(Point) == \"unit\"); \
                          assert(to_string(p) == \"<Point>\");"));
}

#[test]
fn instances_are_copied_on_assignment() {
    assert_success(&with(POINT,
                         "var p = Point{1, 2}; var q = p; q.x = 10; \
                          assert(p.x == 1); assert(q.sum() == 12); assert(p.sum() == 3);"));
}

#[test]
fn copies_keep_the_scope_of_stored_lambdas() {
    assert_success("
        unit Holder -access exposed {
            var label = 1;
            omni callback = null;
            func get() { return label; }
        }
        func make(var k) { return @() { return k; }; }
        var h = Holder{};
        h.callback = make(42);
        var copy = h;
        copy.label = 2;
        omni g = copy.callback;
        assert(g() == 42);
        assert(copy.get() == 2);
        assert(h.get() == 1);
    ");
}

#[test]
fn copies_rebind_inherited_outer_functions() {
    assert_success("
        unit Base { shared outer var count = 0; exposed outer func bump() { count++; return count; } }
        unit Derived -from Base { exposed func peek() { return count; } }
        var d = Derived{};
        d.bump();
        var e = d;
        e.bump();
        e.bump();
        assert(d.peek() == 1);
        assert(e.peek() == 3);
    ");
}

#[test]
fn member_assignment_through_a_method() {
    assert_success(&with(ACCOUNT,
                         "var a = Account{}; a.deposit(5); a.deposit(7); assert(a.get() == 12);"));
}

#[test]
fn hidden_members_are_unreachable_from_outside() {
    let error = runtime_error(&with(ACCOUNT, "var a = Account{}; var b = a.balance;"));
    assert!(matches!(error, RuntimeError::AccessDenied { ref name, .. } if name == "balance"));

    let error = runtime_error(&with(ACCOUNT, "func peek(var a) { return a.balance; } peek(Account{});"));
    assert!(matches!(error, RuntimeError::AccessDenied { .. }));
}

#[test]
fn hidden_members_are_reachable_from_the_owning_unit() {
    assert_success(&with(ACCOUNT,
                         "var a = Account{}; var b = Account{}; a.deposit(1); b.deposit(2); \
                          assert(a.merge(b) == 3);"));
}

#[test]
fn lambdas_keep_the_unit_they_were_created_in() {
    assert_success(&with(ACCOUNT,
                         "var a = Account{}; a.deposit(4); omni read = a.reader(); assert(read(a) == 4);"));
}

#[test]
fn access_denied_message_names_owner_and_level() {
    let error = runtime_error(&with(ACCOUNT, "var a = Account{};\nvar b = a.balance;"));
    assert_eq!(error.to_string(),
               "Error on line 11, column 10: Member 'balance' of 'Account' is hidden.");
}

#[test]
fn outer_members_are_folded_into_composed_units() {
    assert_success("
        unit Base {
            shared outer var count = 0;
            exposed outer func bump() { count++; return count; }
        }
        unit Derived -from Base {
            exposed func twice() { bump(); return bump(); }
            exposed func peek(var other) { return other.count; }
        }
        var d = Derived{};
        assert(d.twice() == 2);
        assert(d.peek(d) == 2);
    ");
}

#[test]
fn outer_members_stay_out_of_own_instances() {
    let error = runtime_error("
        unit Base { exposed outer var tag = 1; }
        var b = Base{};
        var t = b.tag;
    ");
    assert!(matches!(error, RuntimeError::UnknownMember { .. }));
}

#[test]
fn shared_members_are_closed_to_strangers() {
    let error = runtime_error("
        unit Base { shared outer var count = 0; }
        unit Derived -from Base { }
        var d = Derived{};
        var c = d.count;
    ");
    assert!(matches!(error, RuntimeError::AccessDenied { .. }));
}

#[test]
fn trusted_units_reach_shared_members() {
    assert_success("
        unit Vault -trust unit Auditor { shared var secret = 42; }
        unit Auditor { exposed func inspect(var vault) { return vault.secret; } }
        var auditor = Auditor{};
        assert(auditor.inspect(Vault{}) == 42);
    ");

    let error = runtime_error("
        unit Vault -trust unit Auditor { shared var secret = 42; }
        unit Stranger { exposed func inspect(var vault) { return vault.secret; } }
        var stranger = Stranger{};
        stranger.inspect(Vault{});
    ");
    assert!(matches!(error, RuntimeError::AccessDenied { .. }));
}

#[test]
fn final_units_cannot_be_composed() {
    let error = runtime_error("unit Leaf -final { } unit Child -from Leaf { }");
    assert!(matches!(error, RuntimeError::InvalidComposition { .. }));
}

#[test]
fn unknown_parents_are_rejected() {
    let error = runtime_error("unit Child -from Missing { }");
    assert!(matches!(error, RuntimeError::InvalidComposition { .. }));

    let error = runtime_error("var NotAUnit = 1; unit Child -from NotAUnit { }");
    assert!(matches!(error, RuntimeError::InvalidComposition { .. }));
}

#[test]
fn conflicting_outer_members_need_an_override() {
    let error = runtime_error("
        unit A { exposed outer var tag = 1; }
        unit B { exposed outer var tag = 2; }
        unit C -from A, B { }
    ");
    assert!(matches!(error, RuntimeError::InvalidComposition { .. }));

    assert_success("
        unit A { exposed outer var tag = 1; }
        unit B { exposed outer var tag = 2; }
        unit C -from A, B { exposed var tag = 3; }
        var c = C{};
        assert(c.tag == 3);
    ");
}

#[test]
fn diamond_composition_shares_one_member() {
    assert_success("
        unit Root { exposed outer var id = 7; }
        unit Left -from Root { }
        unit Right -from Root { }
        unit Bottom -from Left, Right { }
        var b = Bottom{};
        assert(b.id == 7);
    ");
}

#[test]
fn constructors_are_overloaded() {
    assert_success("
        unit Temperature -access exposed {
            var degrees = 0;
            func ctor() { degrees = 20; }
            func ctor(var d) { degrees = d; }
        }
        var room = Temperature{};
        var oven = Temperature{180};
        assert(room.degrees == 20);
        assert(oven.degrees == 180);
    ");
}

#[test]
fn constructor_arguments_must_match_an_overload() {
    let error = runtime_error("
        unit Temperature { func ctor(var d) { } }
        var t = Temperature{1, 2};
    ");
    assert!(matches!(error, RuntimeError::NoMatchingOverload { .. }));

    let error = runtime_error("unit Empty { } var e = Empty{1};");
    assert!(matches!(error, RuntimeError::NoMatchingOverload { ref name, .. } if name == "Empty.ctor"));
}

#[test]
fn destructors_run_in_reverse_declaration_order() {
    assert_success("
        array log = [];
        unit Noisy {
            var name = \"\";
            func ctor(var n) { name = n; }
            func dtor() { push(log, name); }
        }
        {
            var first = Noisy{\"first\"};
            var second = Noisy{\"second\"};
        }
        assert(size(log) == 2);
        assert(log[0] == \"second\");
        assert(log[1] == \"first\");
    ");
}

#[test]
fn ref_bindings_do_not_destroy_instances() {
    assert_success("
        array log = [];
        unit Noisy { func dtor() { push(log, 1); } }
        func scoped() {
            var owned = Noisy{};
            { ref var alias = owned; }
            assert(size(log) == 0);
        }
        scoped();
        assert(size(log) == 1);
    ");
}

#[test]
fn instantiating_a_non_unit_fails() {
    let error = runtime_error("var x = 1; var y = x{};");
    assert!(matches!(error, RuntimeError::TypeMismatch { .. }));
}
