// Demo binary integration tests: replayed scenarios print stable observations.
use std::process::Command;

fn run_demo() -> (Vec<String>, bool) {
    let exe = env!("CARGO_BIN_EXE_tzjson");
    let output = Command::new(exe)
        .env("RUST_LOG", "off")
        .output()
        .expect("run demo");
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    (stdout.lines().map(str::to_string).collect(), output.status.success())
}

#[test]
fn demo_reports_generic_variants() {
    let (lines, ok) = run_demo();
    assert!(ok);
    assert_eq!(lines.iter().filter(|line| *line == "yes").count(), 3);
    assert!(lines.contains(&r#"action: "reload" (text)"#.to_string()));
    assert!(lines.contains(&"   rev is 47 (number)".to_string()));
    assert!(lines.iter().any(|line| line.ends_with("(sequence)") && line.starts_with("   items is")));
    assert_eq!(
        lines
            .iter()
            .filter(|line| line.starts_with("        item is") && line.ends_with("(mapping)"))
            .count(),
        4
    );
    assert!(lines.contains(&r#"action: "delete" (text)"#.to_string()));
    assert!(lines.contains(&r#"action: "set" (text)"#.to_string()));
}

#[test]
fn demo_records_omit_absent_created_at() {
    let (lines, _) = run_demo();
    assert!(lines.iter().any(|line| line.starts_with(r#"{"name":"test","body":[1,2,3],"createdAt":""#)));
    assert!(lines.contains(&r#"{"name":"test","body":[1,2,3]}"#.to_string()));
}

#[test]
fn demo_shows_hook_dependence_for_generic_timestamps() {
    let (lines, _) = run_demo();
    assert!(lines.iter().any(|line| line.starts_with(r#"{"foo":"foo","time":""#)));
    let error = lines
        .iter()
        .find(|line| line.starts_with("error: "))
        .expect("bare codec error line");
    let json: serde_json::Value =
        serde_json::from_str(error.trim_start_matches("error: ")).expect("error json");
    assert_eq!(json["error"]["kind"], "Encode");
    assert_eq!(json["error"]["field"], "time");
}

#[test]
fn demo_decodes_every_timestamp_sample() {
    let (lines, _) = run_demo();
    let records: Vec<_> = lines
        .iter()
        .filter(|line| line.starts_with("TypedRecord(name=test, body=[1,2,3], createdAt=2019-05-11T00:30:35"))
        .collect();
    assert_eq!(records.len(), 4);
}
