use pretty_assertions::assert_eq;
use sigdrift::{CheckPolicy, Mismatch, RubyWalker, Scanner, SorbetSigSource, YardExtractor};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_fixture(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn scanner() -> Scanner<RubyWalker, YardExtractor, SorbetSigSource> {
    Scanner::new(
        RubyWalker::new(),
        YardExtractor::new(),
        SorbetSigSource::new(),
        CheckPolicy::default(),
    )
}

#[test]
fn matching_method_passes_end_to_end() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        dir.path(),
        "widget.rb",
        r#"class Widget
  # @param x [Integer]
  # @return [String]
  sig { params(x: Integer).returns(String) }
  def show(x)
  end
end
"#,
    );

    let report = scanner().scan(dir.path()).unwrap();
    assert_eq!(report.total, 1);
    assert_eq!(report.failed, 0);
    assert!(report.findings.is_empty());
}

#[test]
fn drifted_return_fails_with_only_return_mismatch() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        dir.path(),
        "widget.rb",
        r#"class Widget
  # @param x [Integer]
  # @return [Float]
  sig { params(x: Integer).returns(String) }
  def show(x)
  end
end
"#,
    );

    let report = scanner().scan(dir.path()).unwrap();
    assert_eq!(report.total, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(
        report.findings[0].mismatches,
        vec![Mismatch::Return { unparseable: None }]
    );
    // the declared side is rendered in the tag grammar for the diff
    let declared = report.findings[0].declared.as_ref().unwrap();
    assert_eq!(declared.returns.as_deref(), Some("String"));
    assert_eq!(
        declared.params,
        vec![("x".to_string(), "Integer".to_string())]
    );
}

#[test]
fn method_without_sig_is_exempt() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        dir.path(),
        "widget.rb",
        r#"class Widget
  # @param x [Integer]
  # @return [Float]
  def undeclared(x)
  end
end
"#,
    );

    let report = scanner().scan(dir.path()).unwrap();
    assert_eq!(report.total, 1);
    assert_eq!(report.failed, 0);
}

#[test]
fn unintelligible_sig_degrades_to_exempt() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        dir.path(),
        "widget.rb",
        r#"class Widget
  # @return [Float]
  sig { params(blk: T.proc.void).returns(String) }
  def weird(&blk)
  end
end
"#,
    );

    let report = scanner().scan(dir.path()).unwrap();
    assert_eq!(report.total, 1);
    assert_eq!(report.failed, 0);
}

#[test]
fn declared_but_undocumented_method_fails() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        dir.path(),
        "widget.rb",
        r#"class Widget
  sig { params(x: Integer).returns(String) }
  def show(x)
  end
end
"#,
    );

    let report = scanner().scan(dir.path()).unwrap();
    assert_eq!(report.failed, 1);
    let mismatches = &report.findings[0].mismatches;
    assert!(mismatches.contains(&Mismatch::Return { unparseable: None }));
    assert!(mismatches.contains(&Mismatch::ParameterSet));
    assert!(!mismatches
        .iter()
        .any(|m| matches!(m, Mismatch::ParameterType { .. })));
}

#[test]
fn private_methods_are_never_counted() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        dir.path(),
        "widget.rb",
        r#"class Widget
  sig { returns(String) }
  def visible
  end

  private

  # @return [Float]
  sig { returns(String) }
  def hidden
  end
end
"#,
    );

    let report = scanner().scan(dir.path()).unwrap();
    assert_eq!(report.total, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.findings[0].identity.name, "visible");
}

#[test]
fn reopened_class_counts_each_method_once() {
    let dir = TempDir::new().unwrap();
    let body = r#"class Widget
  # @return [String]
  sig { returns(String) }
  def show
  end
end
"#;
    write_fixture(dir.path(), "one.rb", body);
    write_fixture(dir.path(), "two.rb", body);

    let report = scanner().scan(dir.path()).unwrap();
    assert_eq!(report.total, 1);
}

#[test]
fn scan_is_idempotent_over_an_unchanged_tree() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        dir.path(),
        "a.rb",
        r#"class Alpha
  # @return [Float]
  sig { returns(String) }
  def broken
  end
end
"#,
    );
    write_fixture(
        dir.path(),
        "b.rb",
        r#"class Beta
  # @return [String]
  sig { returns(String) }
  def fine
  end
end
"#,
    );

    let first = scanner().scan(dir.path()).unwrap();
    let second = scanner().scan(dir.path()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn failures_ranked_by_file_count() {
    let dir = TempDir::new().unwrap();
    let failing = |class: &str, methods: &[&str]| {
        let mut out = format!("class {class}\n");
        for m in methods {
            out.push_str(&format!(
                "  # @return [Float]\n  sig {{ returns(String) }}\n  def {m}\n  end\n\n"
            ));
        }
        out.push_str("end\n");
        out
    };
    write_fixture(dir.path(), "many.rb", &failing("Many", &["a", "b", "c"]));
    write_fixture(dir.path(), "few.rb", &failing("Few", &["d"]));

    let report = scanner().scan(dir.path()).unwrap();
    assert_eq!(report.failed, 4);
    assert_eq!(report.failures_by_file.len(), 2);
    assert!(report.failures_by_file[0].file.ends_with("many.rb"));
    assert_eq!(report.failures_by_file[0].count, 3);
    assert_eq!(report.failures_by_file[1].count, 1);
}

#[test]
fn unparseable_doc_tag_is_reported_as_conversion_failure() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        dir.path(),
        "widget.rb",
        r#"class Widget
  # @param x [Set<Integer>]
  # @return [String]
  sig { params(x: Integer).returns(String) }
  def show(x)
  end
end
"#,
    );

    let report = scanner().scan(dir.path()).unwrap();
    assert_eq!(
        report.findings[0].mismatches,
        vec![Mismatch::ParameterType {
            name: "x".to_string(),
            unparseable: Some("Set<Integer>".to_string()),
        }]
    );
}

#[test]
fn strict_policy_flags_methods_without_sigs() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        dir.path(),
        "widget.rb",
        r#"class Widget
  # @return [String]
  def undeclared
  end
end
"#,
    );

    let strict = Scanner::new(
        RubyWalker::new(),
        YardExtractor::new(),
        SorbetSigSource::new(),
        CheckPolicy {
            pass_without_declared: false,
            ..CheckPolicy::default()
        },
    );
    let report = strict.scan(dir.path()).unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(report.findings[0].identity.name, "undeclared");
    assert!(report.findings[0]
        .mismatches
        .iter()
        .all(|m| matches!(m, Mismatch::Return { .. })));
}

#[test]
fn nilable_sig_matches_documented_union() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        dir.path(),
        "widget.rb",
        r#"class Widget
  # @param x [Integer, nil]
  # @return [Hash<String,Integer>]
  sig { params(x: T.nilable(Integer)).returns(T::Hash[String, Integer]) }
  def tally(x)
  end
end
"#,
    );

    let report = scanner().scan(dir.path()).unwrap();
    assert_eq!(report.failed, 0, "findings: {:?}", report.findings);
}

#[test]
fn union_order_drift_detected_unless_toggled_off() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        dir.path(),
        "widget.rb",
        r#"class Widget
  # @return [nil, Integer]
  sig { returns(T.nilable(Integer)) }
  def maybe
  end
end
"#,
    );

    let report = scanner().scan(dir.path()).unwrap();
    assert_eq!(report.failed, 1);

    let relaxed = Scanner::new(
        RubyWalker::new(),
        YardExtractor::new(),
        SorbetSigSource::new(),
        CheckPolicy {
            ordered_unions: false,
            ..CheckPolicy::default()
        },
    );
    let report = relaxed.scan(dir.path()).unwrap();
    assert_eq!(report.failed, 0);
}

#[test]
fn drift_after_assignment_conditional_keeps_its_namespace() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        dir.path(),
        "widget.rb",
        r#"class Widget
  def setup
    x = if ready?
      1
    else
      2
    end
  end

  # @return [Float]
  sig { returns(String) }
  def drifted
  end
end
"#,
    );

    let report = scanner().scan(dir.path()).unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(report.findings[0].identity.namespace, "Widget");
    assert_eq!(report.findings[0].identity.name, "drifted");
}

#[test]
fn void_sig_requires_void_tag() {
    let dir = TempDir::new().unwrap();
    write_fixture(
        dir.path(),
        "widget.rb",
        r#"class Widget
  # @return [void]
  sig { void }
  def fire!
  end

  # @return [untyped]
  sig { void }
  def misfire
  end
end
"#,
    );

    let report = scanner().scan(dir.path()).unwrap();
    assert_eq!(report.total, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.findings[0].identity.name, "misfire");
    assert_eq!(report.findings[0].mismatches.len(), 1);
}
