use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn by2py_writes_next_to_input() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("hello.by"), "if x {\n    print(x);\n}\n").unwrap();

    let mut cmd = cargo_bin_cmd!("bython");
    cmd.current_dir(dir.path()).arg("by2py").arg("hello.by");
    cmd.assert().success();

    let output = fs::read_to_string(dir.path().join("hello.py")).unwrap();
    assert_eq!(output, "if x:\n    print(x)\n");
}

#[test]
fn by2py_prints_to_stdout() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("note.by"), "// note\n").unwrap();

    let mut cmd = cargo_bin_cmd!("bython");
    cmd.current_dir(dir.path())
        .arg("by2py")
        .arg("note.by")
        .arg("--stdout");
    cmd.assert().success().stdout("# note\n");
    assert!(!dir.path().join("note.py").exists());
}

#[test]
fn prefix_renames_outputs_and_followed_imports() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("main.by"), "import util\nutil.go()\n").unwrap();
    fs::write(dir.path().join("util.by"), "def go() {\n    pass\n}\n").unwrap();

    let mut cmd = cargo_bin_cmd!("bython");
    cmd.current_dir(dir.path())
        .arg("by2py")
        .arg("main.by")
        .arg("--prefix")
        .arg("by_");
    cmd.assert().success();

    let main = fs::read_to_string(dir.path().join("by_main.py")).unwrap();
    assert_eq!(main, "import by_util as util\nutil.go()\n");
    assert!(dir.path().join("by_util.py").exists());
}

#[test]
fn structural_error_fails_with_location() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("broken.by"), "x = 1\n}\n").unwrap();

    let mut cmd = cargo_bin_cmd!("bython");
    cmd.current_dir(dir.path()).arg("by2py").arg("broken.by");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("error: ").and(predicate::str::contains("broken.by:2:")));
}

#[test]
fn unresolved_import_is_a_warning() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("app.by"), "import os\n").unwrap();

    let mut cmd = cargo_bin_cmd!("bython");
    cmd.current_dir(dir.path()).arg("by2py").arg("app.by");
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("warning: ").and(predicate::str::contains("app.by:1:")));
}

#[test]
fn py2by_into_output_directory() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    fs::write(dir.path().join("loop.py"), "for i in xs:\n\tprint(i)\n").unwrap();

    let mut cmd = cargo_bin_cmd!("bython");
    cmd.current_dir(dir.path())
        .arg("py2by")
        .arg("loop.py")
        .arg("-o")
        .arg(&out);
    cmd.assert().success();

    let output = fs::read_to_string(out.join("loop.by")).unwrap();
    assert_eq!(output, "for i in xs: {\n    print(i)\n}\n");
}

#[test]
fn json_diagnostics() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("app.by"), "import missing\n").unwrap();

    let mut cmd = cargo_bin_cmd!("bython");
    cmd.current_dir(dir.path())
        .arg("by2py")
        .arg("app.by")
        .arg("--message-format")
        .arg("json");
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("\"kind\":\"unresolved-import\""));
}

#[test]
fn show_config_reads_project_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bython.toml"), "[translation]\ntype_hints = true\n").unwrap();

    let mut cmd = cargo_bin_cmd!("bython");
    cmd.current_dir(dir.path()).arg("show-config");
    cmd.assert().success().stdout(
        predicate::str::contains("\"type_hints\": true")
            .and(predicate::str::contains("\"indent_unit\": \"    \"")),
    );
}

#[test]
fn missing_input_fails() {
    let dir = tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("bython");
    cmd.current_dir(dir.path()).arg("by2py").arg("nope.by");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("error: nope.by"));
}
