//! Runs the `nullobj` commands against a temporary directory.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;

use nullobj_cli::run;

const SANDBOX: &str = include_str!("../../core/tests/fixtures/sandbox.json");
const IFUGA_GOLDEN: &str = include_str!("../../core/tests/fixtures/IFugaAsNullObj.g.cs");

fn cli(args: &[&str]) -> i32 {
    let mut argv = vec!["nullobj".to_string()];
    argv.extend(args.iter().map(|arg| (*arg).to_string()));
    run(argv)
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_generate_writes_companions_and_attributes() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("model.json");
    let out = dir.path().join("Generated");
    fs::write(&input, SANDBOX).unwrap();

    let code = cli(&["generate", "--input", path_arg(&input), "--out", path_arg(&out)]);
    assert_eq!(code, 0);

    assert_eq!(
        fs::read_to_string(out.join("IFugaAsNullObj.g.cs")).unwrap(),
        IFUGA_GOLDEN
    );
    assert!(out.join("Class1AsNullObj.g.cs").exists());
    assert!(out.join("NullObjAttribute.cs").exists());
}

#[test]
fn test_check_passes_when_up_to_date_and_fails_when_stale() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("model.json");
    let out = dir.path().join("Generated");
    fs::write(&input, SANDBOX).unwrap();

    let base = ["generate", "--input", path_arg(&input), "--out", path_arg(&out)];
    assert_eq!(cli(&base), 0);

    let mut check = base.to_vec();
    check.push("--check");
    assert_eq!(cli(&check), 0);

    fs::write(out.join("IFugaAsNullObj.g.cs"), "stale").unwrap();
    assert_eq!(cli(&check), 1);
    // --check never writes.
    assert_eq!(
        fs::read_to_string(out.join("IFugaAsNullObj.g.cs")).unwrap(),
        "stale"
    );
}

#[test]
fn test_generate_skips_attributes_on_request() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("model.json");
    let out = dir.path().join("Generated");
    fs::write(&input, SANDBOX).unwrap();

    let code = cli(&[
        "generate",
        "--input",
        path_arg(&input),
        "--out",
        path_arg(&out),
        "--no-attributes",
    ]);
    assert_eq!(code, 0);
    assert!(!out.join("NullObjAttribute.cs").exists());
}

#[test]
fn test_failed_target_exits_non_zero_but_writes_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("model.json");
    let out = dir.path().join("Generated");
    fs::write(&input, SANDBOX.replace("\"SandBox.IHoge\"]", "\"SandBox.IMissing\"]")).unwrap();

    let code = cli(&["generate", "-i", path_arg(&input), "-o", path_arg(&out)]);
    assert_eq!(code, 1);
    assert!(out.join("IFugaAsNullObj.g.cs").exists());
    assert!(!out.join("Class1AsNullObj.g.cs").exists());
}

#[test]
fn test_failed_target_removes_its_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("model.json");
    let out = dir.path().join("Generated");
    fs::write(&input, SANDBOX).unwrap();
    let base = ["generate", "-i", path_arg(&input), "-o", path_arg(&out)];
    assert_eq!(cli(&base), 0);
    assert!(out.join("Class1AsNullObj.g.cs").exists());
    fs::write(out.join("Handwritten.cs"), "// mine").unwrap();

    fs::write(&input, SANDBOX.replace("\"SandBox.IHoge\"]", "\"SandBox.IMissing\"]")).unwrap();
    let mut check = base.to_vec();
    check.push("--check");
    assert_eq!(cli(&check), 1);
    assert!(out.join("Class1AsNullObj.g.cs").exists());

    assert_eq!(cli(&base), 1);
    assert!(!out.join("Class1AsNullObj.g.cs").exists());
    assert_eq!(
        fs::read_to_string(out.join("IFugaAsNullObj.g.cs")).unwrap(),
        IFUGA_GOLDEN
    );
    assert!(out.join("Handwritten.cs").exists());
    assert!(out.join("NullObjAttribute.cs").exists());
}

#[test]
fn test_sibling_config_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("model.json");
    let out = dir.path().join("Generated");
    fs::write(&input, SANDBOX).unwrap();
    fs::write(dir.path().join("nullobj.toml"), "type_suffix = \"Null\"\n").unwrap();

    assert_eq!(cli(&["generate", "-i", path_arg(&input), "-o", path_arg(&out)]), 0);
    assert!(out.join("IFugaNull.g.cs").exists());
}

#[test]
fn test_invalid_model_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("model.json");
    fs::write(&input, "{ nope").unwrap();
    let out = dir.path().join("Generated");
    assert_eq!(cli(&["generate", "-i", path_arg(&input), "-o", path_arg(&out)]), 1);
    assert!(!out.exists());
}

#[test]
fn test_init_config_refuses_to_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nullobj.toml");

    assert_eq!(cli(&["init-config", "--out", path_arg(&path)]), 0);
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("type_suffix = \"AsNullObj\""));

    assert_eq!(cli(&["init-config", "--out", path_arg(&path)]), 1);
    assert_eq!(cli(&["init-config", "--out", path_arg(&path), "--force"]), 0);
}

#[test]
fn test_attributes_written_to_directory() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(cli(&["attributes", "--out", path_arg(dir.path())]), 0);
    let source = fs::read_to_string(dir.path().join("NullObjAttribute.cs")).unwrap();
    assert!(source.contains("InheritsToNullObjAttribute"));
    assert!(source.contains("ThrowException = 8,"));
}
