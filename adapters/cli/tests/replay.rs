use std::process::Command;

/// Replays a one-turn transcript and checks the emitted order lines.
///
/// The first unit sees two creatures 500 apart and hunts their coverage
/// spot; the guards see nothing and walk their opening waypoints.
#[test]
fn replays_a_recorded_turn() {
    let output = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args([
            "run",
            "--quiet",
            "--bin",
            "arena-warden",
            "--",
            "--input",
            "tests/fixtures/turn_one.txt",
        ])
        .output()
        .expect("failed to run the arena-warden binary");

    assert!(
        output.status.success(),
        "replay run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).expect("orders are utf-8");
    assert_eq!(
        stdout,
        "MOVE 9250 3241 hunt\n\
         MOVE 6800 1000 patrol\n\
         MOVE 3800 7000 patrol\n",
    );
}
