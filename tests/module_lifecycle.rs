mod common;

use common::{argv, host, host_in, Probe, PROBE};
use modshell::args::{ArgMap, ArgumentSpec};
use modshell::session::ModuleRecord;
use modshell::{Module, ModuleContext, ModuleError, ModuleHost, Registrar, Session, Status};
use serde_json::{json, Value};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_new_module_is_idle() {
    let (host, calls, session) = host(Probe::new(ArgumentSpec::new().mandatory("target")));

    assert_eq!(host.status(), Status::Idle);
    assert_eq!(session.get(PROBE).unwrap().status, Status::Idle);
    assert_eq!(calls.setups(), 0);
    assert_eq!(calls.runs(), 0);
}

#[test]
fn test_registered_defaults_are_stored() {
    let (_host, _calls, session) = host(Probe::new(
        ArgumentSpec::new().optional("port", "80").optional_unset("user"),
    ));

    let record = session.get(PROBE).unwrap();
    assert_eq!(record.stored_args.get("port").map(String::as_str), Some("80"));
    assert!(!record.stored_args.contains_key("user"));
}

#[test]
fn test_stored_value_wins_over_registered_default() {
    let session = Arc::new(Session::new());
    let mut record = ModuleRecord::default();
    record.stored_args.insert("x".to_string(), "2".to_string());
    session.set(PROBE, record);

    let (mut host, calls, session) =
        host_in(session, Probe::new(ArgumentSpec::new().optional("x", "1")));

    assert_eq!(
        session.get(PROBE).unwrap().stored_args.get("x").map(String::as_str),
        Some("2")
    );
    host.try_run_argv(&[]).unwrap();
    assert_eq!(calls.last_arg("x").as_deref(), Some("2"));
}

/// Registers arguments, then rejects its own registration.
struct BrokenInit;

impl Module for BrokenInit {
    fn name(&self) -> &str {
        "broken"
    }

    fn doc(&self) -> &str {
        "Fails while registering."
    }

    fn init(&mut self, reg: &mut Registrar<'_>) -> Result<(), ModuleError> {
        reg.arguments(ArgumentSpec::new().optional("x", "1"));
        Err(ModuleError::InvalidOptions {
            diagnostic: "bad registration".to_string(),
        })
    }

    fn run(&mut self, _ctx: &mut ModuleContext<'_>, _args: &ArgMap) -> Option<Value> {
        None
    }
}

#[test]
fn test_failed_init_leaves_record_untouched() {
    let session = Arc::new(Session::new());

    assert!(ModuleHost::new(session.clone(), BrokenInit).is_err());

    let record = session.get("broken").unwrap_or_default();
    assert!(record.stored_args.is_empty());
    assert_eq!(record.status, Status::Idle);
}

// =============================================================================
// Arity
// =============================================================================

#[test]
fn test_single_mandatory_joins_positionals() {
    let (mut host, calls, _session) = host(Probe::new(ArgumentSpec::new().mandatory("target")));

    let out = host.run_cmdline("a b c").unwrap();

    assert_eq!(out["target"], "a b c");
    assert_eq!(calls.last_arg("target").as_deref(), Some("a b c"));
}

#[test]
fn test_missing_mandatory_skips_setup_and_run() {
    let (mut host, calls, _session) = host(Probe::new(
        ArgumentSpec::new().mandatory("host").mandatory("port"),
    ));

    let err = host.try_run_argv(&argv(&["example.org"])).unwrap_err();

    assert_eq!(
        err,
        ModuleError::MissingArguments {
            expected: vec!["host".to_string(), "port".to_string()]
        }
    );
    assert_eq!(calls.setups(), 0);
    assert_eq!(calls.runs(), 0);
    assert_eq!(host.status(), Status::Idle);
}

#[test]
fn test_excess_positionals_rejected_with_two_mandatory() {
    let (mut host, calls, _session) = host(Probe::new(
        ArgumentSpec::new().mandatory("host").mandatory("port"),
    ));

    let err = host
        .try_run_argv(&argv(&["example.org", "80", "extra"]))
        .unwrap_err();

    assert_eq!(
        err,
        ModuleError::UnexpectedArguments {
            extra: vec!["extra".to_string()]
        }
    );
    assert_eq!(calls.runs(), 0);
}

#[test]
fn test_positionals_ignored_without_mandatory() {
    let (mut host, calls, _session) = host(Probe::new(ArgumentSpec::new().optional("x", "1")));

    let out = host.try_run_argv(&argv(&["--x", "2", "stray", "words"])).unwrap();

    assert!(out.is_some());
    assert_eq!(calls.runs(), 1);
    assert_eq!(calls.last_arg("x").as_deref(), Some("2"));
    assert!(!calls.last_args().unwrap().values().any(|v| v.contains("stray")));
}

// =============================================================================
// Options
// =============================================================================

#[test]
fn test_flags_override_stored_values() {
    let (mut host, calls, _session) = host(Probe::new(
        ArgumentSpec::new().mandatory("target").optional("port", "80"),
    ));

    host.try_run_argv(&argv(&["--port=8080", "example.org"])).unwrap();
    assert_eq!(calls.last_arg("port").as_deref(), Some("8080"));

    host.try_run_argv(&argv(&["--po", "22", "example.org"])).unwrap();
    assert_eq!(calls.last_arg("port").as_deref(), Some("22"));
}

#[test]
fn test_unknown_option_reports_diagnostic() {
    let (mut host, calls, _session) = host(Probe::new(ArgumentSpec::new().mandatory("target")));

    let err = host
        .try_run_argv(&argv(&["--nope", "1", "example.org"]))
        .unwrap_err();

    assert_eq!(
        err,
        ModuleError::InvalidOptions {
            diagnostic: "option --nope not recognized".to_string()
        }
    );
    assert!(err.shows_help());
    assert_eq!(calls.setups(), 0);
}

#[test]
fn test_dashes_after_first_positional_stay_positional() {
    let (mut host, calls, _session) = host(Probe::new(
        ArgumentSpec::new().mandatory("target").optional("port", "80"),
    ));

    host.run_cmdline("ls -la --port 1").unwrap();

    assert_eq!(calls.last_arg("target").as_deref(), Some("ls -la --port 1"));
    assert_eq!(calls.last_arg("port").as_deref(), Some("80"));
}

#[test]
fn test_double_dash_ends_options() {
    let (mut host, calls, _session) = host(Probe::new(
        ArgumentSpec::new().mandatory("target").optional("port", "80"),
    ));

    host.try_run_argv(&argv(&["--", "--port"])).unwrap();

    assert_eq!(calls.last_arg("target").as_deref(), Some("--port"));
    assert_eq!(calls.last_arg("port").as_deref(), Some("80"));
}

// =============================================================================
// Vectors
// =============================================================================

#[test]
fn test_bound_argument_must_name_a_vector() {
    let (mut host, calls, _session) = host(
        Probe::new(
            ArgumentSpec::new()
                .optional_unset("target")
                .bind_to_vectors("target"),
        )
        .vectors(&["v1", "v2"]),
    );

    let err = host.try_run_argv(&argv(&["--target", "v3"])).unwrap_err();
    assert_eq!(
        err,
        ModuleError::NotAVector {
            argument: "target".to_string(),
            value: "v3".to_string()
        }
    );
    assert_eq!(calls.setups(), 0);
    assert_eq!(calls.runs(), 0);
    assert_eq!(host.status(), Status::Idle);

    host.try_run_argv(&argv(&["--target", "v1"])).unwrap();
    assert_eq!(calls.last_arg("target").as_deref(), Some("v1"));
}

#[test]
fn test_unset_bound_argument_is_not_checked() {
    let (mut host, calls, _session) = host(
        Probe::new(
            ArgumentSpec::new()
                .optional("target", "")
                .bind_to_vectors("target"),
        )
        .vectors(&["v1"]),
    );

    host.try_run_argv(&[]).unwrap();
    assert_eq!(calls.runs(), 1);
}

#[test]
fn test_vector_names_exposed_by_host() {
    let (host, _calls, _session) = host(Probe::new(ArgumentSpec::new()).vectors(&["v2", "v1"]));

    let names: Vec<String> = host.vectors().names().into_iter().collect();
    assert_eq!(names, vec!["v1".to_string(), "v2".to_string()]);
    assert!(host.vectors().get("v1").is_some());
}

// =============================================================================
// Status transitions
// =============================================================================

#[test]
fn test_setup_runs_once_then_stays_run() {
    let (mut host, calls, _session) = host(Probe::new(ArgumentSpec::new()));

    host.try_run_argv(&[]).unwrap();
    host.try_run_argv(&[]).unwrap();

    assert_eq!(host.status(), Status::Run);
    assert_eq!(calls.setups(), 1);
    assert_eq!(calls.runs(), 2);
}

#[test]
fn test_idle_setup_runs_and_retries_next_call() {
    let (mut host, calls, _session) = host(Probe::new(ArgumentSpec::new()).setup_returns(Status::Idle));

    host.try_run_argv(&[]).unwrap();
    host.try_run_argv(&[]).unwrap();

    assert_eq!(host.status(), Status::Idle);
    assert_eq!(calls.setups(), 2);
    assert_eq!(calls.runs(), 2);
}

#[test]
fn test_failed_setup_deactivates_module() {
    let (mut host, calls, session) = host(Probe::new(ArgumentSpec::new()).setup_returns(Status::Fail));

    assert!(host.run_argv(&[]).is_none());
    assert_eq!(host.status(), Status::Fail);
    assert_eq!(session.get(PROBE).unwrap().status, Status::Fail);

    let err = host.try_run_argv(&[]).unwrap_err();
    assert_eq!(
        err,
        ModuleError::ModuleInactive {
            module: PROBE.to_string()
        }
    );
    assert!(host.run_cmdline("").is_none());

    assert_eq!(calls.setups(), 1);
    assert_eq!(calls.runs(), 0);
}

#[test]
fn test_setup_changes_visible_to_run() {
    let (mut host, calls, session) = host(
        Probe::new(ArgumentSpec::new().optional("y", "1")).setup_stores("y", "5"),
    );

    host.try_run_argv(&[]).unwrap();

    assert_eq!(calls.last_arg("y").as_deref(), Some("5"));
    assert_eq!(
        session.get(PROBE).unwrap().stored_args.get("y").map(String::as_str),
        Some("5")
    );
}

#[test]
fn test_setup_may_add_new_stored_args() {
    let (mut host, calls, _session) =
        host(Probe::new(ArgumentSpec::new()).setup_stores("token", "abc"));

    host.try_run_argv(&[]).unwrap();

    assert_eq!(calls.last_arg("token").as_deref(), Some("abc"));
}

// =============================================================================
// Command lines
// =============================================================================

#[test]
fn test_cmdline_respects_quotes() {
    let (mut host, calls, _session) = host(Probe::new(
        ArgumentSpec::new().mandatory("target").optional("label", ""),
    ));

    host.run_cmdline(r#"--label "two words" 'a  b'"#).unwrap();

    assert_eq!(calls.last_arg("label").as_deref(), Some("two words"));
    assert_eq!(calls.last_arg("target").as_deref(), Some("a  b"));
}

#[test]
fn test_unbalanced_quote_returns_none() {
    let (mut host, calls, _session) = host(Probe::new(ArgumentSpec::new().mandatory("target")));

    assert!(host.run_cmdline("\"unterminated").is_none());
    assert_eq!(calls.setups(), 0);
    assert_eq!(host.status(), Status::Idle);
}

#[test]
fn test_user_errors_return_none() {
    let (mut host, calls, _session) = host(Probe::new(ArgumentSpec::new().mandatory("target")));

    assert!(host.run_cmdline("").is_none());
    assert!(host.run_cmdline("--bogus x").is_none());
    assert_eq!(calls.runs(), 0);
}

// =============================================================================
// Help
// =============================================================================

#[test]
fn test_help_lists_arguments_and_stored_values() {
    let (mut host, _calls, _session) = host(
        Probe::new(
            ArgumentSpec::new()
                .mandatory("target")
                .optional("port", "80")
                .optional_unset("vector")
                .bind_to_vectors("vector"),
        )
        .vectors(&["v1", "v2"]),
    );
    host.try_run_argv(&argv(&["--port", "22", "example.org"])).unwrap();

    let help = host.help().unwrap();

    assert!(help.contains("Records how it was called."));
    assert!(help.contains("usage: probe <target> [--port PORT] [--vector VECTOR]"));
    assert!(help.contains("--port (stored: 80)"));
    assert!(help.contains("(vectors: v1, v2)"));
}

// =============================================================================
// Session access
// =============================================================================

/// Reads its own results and session globals back from inside `run`.
struct SelfReader;

impl Module for SelfReader {
    fn name(&self) -> &str {
        "selfy"
    }

    fn doc(&self) -> &str {
        "Reads back what it published."
    }

    fn init(&mut self, _reg: &mut Registrar<'_>) -> Result<(), ModuleError> {
        Ok(())
    }

    fn run(&mut self, ctx: &mut ModuleContext<'_>, _args: &ArgMap) -> Option<Value> {
        ctx.store_result("count", 1);
        ctx.set_global("seen", "selfy");
        let own = ctx.stored_result("count", Some("selfy"))?;
        let global = ctx.stored_result("seen", None)?;
        Some(json!({ "own": own, "global": global }))
    }
}

#[test]
fn test_run_reads_own_results_without_blocking() {
    let session = Arc::new(Session::new());
    let mut host = ModuleHost::new(session.clone(), SelfReader).unwrap();

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(host.try_run_argv(&[]));
    });
    let out = rx
        .recv_timeout(Duration::from_secs(3))
        .expect("run() blocked on its own record")
        .unwrap();

    assert_eq!(out, Some(json!({ "own": 1, "global": "selfy" })));
    assert_eq!(session.result("selfy", "count"), Some(Value::from(1)));
    assert_eq!(session.global("seen"), Some(Value::from("selfy")));
}
