// Unit tests for the connectivity prober

use tunwatch_core::error::WatchdogError;
use tunwatch_core::exec::{ScriptedOutcome, ScriptedRunner};
use tunwatch_core::vpn::prober;

const PING_OK: &str = "\
PING 4.2.2.2 (4.2.2.2): 56 data bytes
64 bytes from 4.2.2.2: icmp_seq=0 ttl=57 time=12.3 ms

--- 4.2.2.2 ping statistics ---
5 packets transmitted, 5 packets received, 0.0% packet loss
";

// With the banner on stderr, stdout starts at the hop line
const TRACE_HOP: &str = " 1  10.0.0.1 (10.0.0.1)  0.512 ms  0.401 ms  0.398 ms\n";

#[test]
fn test_failed_ping_reports_unhealthy_and_skips_trace() {
    let runner = ScriptedRunner::new();
    runner.enqueue("ping", ScriptedOutcome::Fails("100% packet loss".to_string()));

    let healthy = prober::run_checks(&runner, "4.2.2.2", Some("10.")).unwrap();

    assert!(!healthy);
    assert_eq!(runner.call_count("traceroute"), 0);
}

#[test]
fn test_successful_ping_without_prefix_is_healthy_without_trace() {
    let runner = ScriptedRunner::new();
    runner.enqueue("ping", ScriptedOutcome::Succeeds(PING_OK.to_string()));

    let healthy = prober::run_checks(&runner, "4.2.2.2", None).unwrap();

    assert!(healthy);
    assert_eq!(runner.call_count("traceroute"), 0);
}

#[test]
fn test_empty_prefix_behaves_like_no_prefix() {
    let runner = ScriptedRunner::new();
    runner.enqueue("ping", ScriptedOutcome::Succeeds(PING_OK.to_string()));

    let healthy = prober::run_checks(&runner, "4.2.2.2", Some("")).unwrap();

    assert!(healthy);
    assert_eq!(runner.call_count("traceroute"), 0);
}

#[test]
fn test_matching_first_hop_prefix_is_healthy() {
    let runner = ScriptedRunner::new();
    runner.enqueue("ping", ScriptedOutcome::Succeeds(PING_OK.to_string()));
    runner.enqueue("traceroute", ScriptedOutcome::Succeeds(TRACE_HOP.to_string()));

    assert!(prober::run_checks(&runner, "4.2.2.2", Some("10.")).unwrap());
}

#[test]
fn test_mismatching_first_hop_prefix_is_unhealthy() {
    let runner = ScriptedRunner::new();
    runner.enqueue("ping", ScriptedOutcome::Succeeds(PING_OK.to_string()));
    runner.enqueue("traceroute", ScriptedOutcome::Succeeds(TRACE_HOP.to_string()));

    assert!(!prober::run_checks(&runner, "4.2.2.2", Some("192.")).unwrap());
}

#[test]
fn test_ping_sends_five_echo_requests() {
    let runner = ScriptedRunner::new();
    runner.enqueue("ping", ScriptedOutcome::Succeeds(PING_OK.to_string()));

    prober::check_connection(&runner, "4.2.2.2").unwrap();

    assert_eq!(
        runner.calls(),
        vec![vec![
            "ping".to_string(),
            "-c".to_string(),
            "5".to_string(),
            "4.2.2.2".to_string(),
        ]]
    );
}

#[test]
fn test_first_hop_parses_second_field() {
    let runner = ScriptedRunner::new();
    runner.enqueue("traceroute", ScriptedOutcome::Succeeds(TRACE_HOP.to_string()));

    let hop = prober::first_hop(&runner, "4.2.2.2").unwrap();
    assert_eq!(hop, "10.0.0.1");
}

#[test]
fn test_unrunnable_ping_is_an_error() {
    let runner = ScriptedRunner::new();
    let err = prober::run_checks(&runner, "4.2.2.2", None).unwrap_err();
    assert!(matches!(err, WatchdogError::Probe(_)));
}

#[test]
fn test_unrunnable_traceroute_is_an_error_not_unhealthy() {
    let runner = ScriptedRunner::new();
    runner.enqueue("ping", ScriptedOutcome::Succeeds(PING_OK.to_string()));
    runner.enqueue("traceroute", ScriptedOutcome::Unrunnable);

    let err = prober::run_checks(&runner, "4.2.2.2", Some("10.")).unwrap_err();
    assert!(matches!(err, WatchdogError::Probe(_)));
}

#[test]
fn test_failing_traceroute_is_an_error() {
    let runner = ScriptedRunner::new();
    runner.enqueue("traceroute", ScriptedOutcome::Fails("no route".to_string()));

    assert!(prober::first_hop(&runner, "4.2.2.2").is_err());
}

#[test]
fn test_empty_trace_output_is_an_error() {
    let runner = ScriptedRunner::new();
    runner.enqueue("traceroute", ScriptedOutcome::Succeeds(String::new()));

    assert!(prober::first_hop(&runner, "4.2.2.2").is_err());
}
