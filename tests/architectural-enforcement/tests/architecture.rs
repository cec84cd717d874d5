use architectural_enforcement::{scan, workspace_root, Violation};

fn assert_clean(violations: &[Violation]) {
    let report: Vec<String> = violations.iter().map(ToString::to_string).collect();
    assert!(violations.is_empty(), "violations:\n{}", report.join("\n"));
}

#[test]
fn test_core_has_no_terminal_dependencies() {
    let core = workspace_root().join("core").join("src");
    assert_clean(&scan(&core, &["ratatui", "crossterm"]));
}

#[test]
fn test_no_blocking_sleep() {
    let root = workspace_root();
    for crate_dir in ["core", "tui"] {
        assert_clean(&scan(
            &root.join(crate_dir).join("src"),
            &["std::thread::sleep", "thread::sleep("],
        ));
    }
}

#[test]
fn test_no_unwrap_in_production_code() {
    let root = workspace_root();
    for crate_dir in ["core", "tui"] {
        assert_clean(&scan(
            &root.join(crate_dir).join("src"),
            &[".unwrap()", ".expect("],
        ));
    }
}
