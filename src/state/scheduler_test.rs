use super::*;

#[test]
fn double_start_hands_out_one_generation() {
    let mut gate = TickGate::default();
    let first = gate.start();
    assert!(first.is_some());
    // Starting again while running must not create a second timer.
    assert_eq!(gate.start(), None);
    assert!(gate.admits(first.unwrap()));
}

#[test]
fn stop_retires_the_running_generation() {
    let mut gate = TickGate::default();
    let generation = gate.start().unwrap();
    gate.stop();
    assert!(!gate.admits(generation));
    // Stopping when already stopped is a no-op.
    gate.stop();
    assert!(!gate.admits(generation));
}

#[test]
fn restart_admits_only_the_new_generation() {
    let mut gate = TickGate::default();
    let old = gate.start().unwrap();
    gate.stop();
    let new = gate.start().unwrap();
    assert_ne!(old, new);
    assert!(gate.admits(new));
    assert!(!gate.admits(old));
}

#[test]
fn refresh_interval_is_fourteen_minutes() {
    assert_eq!(REFRESH_INTERVAL_SECS, 840);
}
