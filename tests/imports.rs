use std::{fs, path::Path};

use tempfile::{TempDir, tempdir};
use wio::{
    error::{Error, RuntimeError},
    interpreter::session::RunOptions,
    run_file,
};

/// Writes each `(relative path, source)` pair into a fresh directory.
fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempdir().unwrap();
    for (name, source) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, source).unwrap();
    }
    dir
}

fn run_main(dir: &Path, options: RunOptions) -> Result<(), Error> {
    run_file(&dir.join("main.wio"), options)
}

fn assert_success(dir: &Path) {
    if let Err(e) = run_main(dir, RunOptions::default()) {
        panic!("Script failed: {e}");
    }
}

#[test]
fn imported_declarations_are_global() {
    let dir = project(&[("lib.wio", "func helper() { return 41; } var answer = helper() + 1;"),
                        ("main.wio", "import \"lib.wio\"; assert(answer == 42); assert(helper() == 41);")]);
    assert_success(dir.path());
}

#[test]
fn files_are_imported_once() {
    let dir = project(&[("lib.wio", "count++;"),
                        ("main.wio",
                         "var count = 0; import \"lib.wio\"; import \"lib.wio\"; import \"./lib.wio\"; \
                          assert(count == 1);")]);
    assert_success(dir.path());
}

#[test]
fn nested_imports_resolve_against_the_importing_file() {
    let dir = project(&[("sub/a.wio", "import \"b.wio\"; var from_a = from_b + 1;"),
                        ("sub/b.wio", "var from_b = 1;"),
                        ("main.wio", "import \"sub/a.wio\"; assert(from_a == 2);")]);
    assert_success(dir.path());
}

#[test]
fn importing_the_entry_file_back_is_skipped() {
    let dir = project(&[("lib.wio", "import \"main.wio\"; var loaded = true;"),
                        ("main.wio", "import \"lib.wio\"; assert(loaded);")]);
    assert_success(dir.path());
}

#[test]
fn imports_inside_functions_still_declare_globally() {
    let dir = project(&[("lib.wio", "func helper() { return 1; }"),
                        ("main.wio", "func setup() { import \"lib.wio\"; } setup(); assert(helper() == 1);")]);
    assert_success(dir.path());
}

#[test]
fn single_file_mode_skips_file_imports() {
    let dir = project(&[("main.wio", "import \"missing.wio\"; var x = 1; assert(x == 1);")]);
    let options = RunOptions { single_file: true,
                               ..RunOptions::default() };
    assert!(run_main(dir.path(), options).is_ok());
}

#[test]
fn missing_files_fail_to_import() {
    let dir = project(&[("main.wio", "import \"missing.wio\";")]);
    let result = run_main(dir.path(), RunOptions::default());
    assert!(matches!(result, Err(Error::Runtime(RuntimeError::ImportFailed { .. }))));
}

#[test]
fn runtime_errors_name_the_imported_file() {
    let dir = project(&[("lib.wio", "var broken = 1 / 0;"), ("main.wio", "import \"lib.wio\";")]);
    let lib = fs::canonicalize(dir.path().join("lib.wio")).unwrap();

    match run_main(dir.path(), RunOptions::default()) {
        Err(Error::Runtime(RuntimeError::InModule { path, source })) => {
            assert_eq!(path, lib);
            assert!(matches!(*source, Error::Runtime(RuntimeError::DivisionByZero { .. })));
        },
        other => panic!("Expected an error inside the module, got: {other:?}"),
    }
}

#[test]
fn parse_errors_name_the_imported_file() {
    let dir = project(&[("lib.wio", "var = ;"), ("main.wio", "import \"lib.wio\";")]);
    let result = run_main(dir.path(), RunOptions::default());
    assert!(matches!(result,
                     Err(Error::Runtime(RuntimeError::InModule { ref source, .. })) if matches!(**source, Error::Parse(_))));
}

#[test]
fn unknown_builtin_modules_are_reported() {
    let dir = project(&[("main.wio", "import \"wio.nothing\";")]);
    let result = run_main(dir.path(), RunOptions::default());
    assert!(matches!(result, Err(Error::Runtime(RuntimeError::UnknownModule { .. }))));
}

#[test]
fn builtin_modules_load_on_demand() {
    let dir = project(&[("main.wio", "import \"wio.math\"; import \"wio.util\"; import \"wio.math\"; assert(abs(-3) == 3);")]);
    let options = RunOptions { no_builtin: true,
                               ..RunOptions::default() };
    assert!(run_main(dir.path(), options).is_ok());
}

#[test]
fn unreadable_entry_files_are_io_errors() {
    let dir = tempdir().unwrap();
    let result = run_main(dir.path(), RunOptions::default());
    assert!(matches!(result, Err(Error::Io { .. })));
}

#[test]
fn no_run_only_parses() {
    let dir = project(&[("main.wio", "var x = 1 / 0;")]);
    let options = RunOptions { no_run: true,
                               ..RunOptions::default() };
    assert!(run_main(dir.path(), options).is_ok());
}
