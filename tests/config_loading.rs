//! End-to-end loading of transition tables from config files.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;
use transition_table::config::{Config, ConfigError, ReaderType};
use transition_table::fsm::{
    load_default_from_file, load_transactions_from_file, LoadReport, Transaction,
    TransitionRegistry, TransitionRepo,
};

const NS3_YAML: &str = r#"
fsm:
  ns3:
    entry1:
      current: status1
      event: event1
      target: target1
    entry2:
      current: status1
      event: event2
      target: target2
    entry3:
      current: status2
      event: event1
"#;

const AB_JSON: &str = r#"
{
    // two machines that share status names
    "fsm": {
        "A": {
            "go": {"current": "idle", "event": "start", "target": "running"}
        },
        /* B moves somewhere else on the same key */
        "B": {
            "go": {"current": "idle", "event": "start", "target": "failed"}
        }
    }
}
"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn target(registry: &TransitionRegistry, ns: &str, current: &str, event: &str) -> Option<String> {
    registry
        .get_target_transition(ns, current, event)
        .map(|t| t.target_status.clone())
}

#[test]
fn yaml_file_loads_valid_entries() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "fsm.yaml", NS3_YAML);
    let registry = TransitionRegistry::new();

    let report = load_transactions_from_file(&path, &registry).unwrap();

    assert_eq!(report, LoadReport { loaded: 2, skipped: 1 });
    assert_eq!(target(&registry, "ns3", "status1", "event1").as_deref(), Some("target1"));
    assert_eq!(target(&registry, "ns3", "status1", "event2").as_deref(), Some("target2"));
    assert_eq!(target(&registry, "ns3", "status2", "event1"), None);
}

#[test]
fn yml_suffix_is_yaml() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "fsm.YML", NS3_YAML);
    let registry = TransitionRegistry::new();

    assert_eq!(load_transactions_from_file(&path, &registry).unwrap().loaded, 2);
}

#[test]
fn commented_json_keeps_namespaces_apart() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "fsm.json", AB_JSON);
    let registry = TransitionRegistry::new();

    let report = load_transactions_from_file(&path, &registry).unwrap();

    assert_eq!(report.loaded, 2);
    assert_eq!(target(&registry, "A", "idle", "start").as_deref(), Some("running"));
    assert_eq!(target(&registry, "B", "idle", "start").as_deref(), Some("failed"));

    registry.remove_namespace("A");
    assert_eq!(target(&registry, "A", "idle", "start"), None);
    assert_eq!(target(&registry, "B", "idle", "start").as_deref(), Some("failed"));
}

#[test]
fn references_resolve_before_loading() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "fsm.yaml",
        "states:\n  done: finished\nfsm:\n  job:\n    end:\n      current: working\n      event: stop\n      target: ${states.done}\n",
    );
    let registry = TransitionRegistry::new();

    load_transactions_from_file(&path, &registry).unwrap();

    assert_eq!(target(&registry, "job", "working", "stop").as_deref(), Some("finished"));
}

#[test]
fn references_through_aliases_resolve_before_loading() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "fsm.yaml",
        "states:\n  done: finished\nalias: ${states}\nfsm:\n  job:\n    end:\n      current: working\n      event: stop\n      target: ${alias.done}\n",
    );
    let registry = TransitionRegistry::new();

    assert_eq!(load_transactions_from_file(&path, &registry).unwrap().loaded, 1);
    assert_eq!(target(&registry, "job", "working", "stop").as_deref(), Some("finished"));
}

#[test]
fn self_multiplying_references_fail_the_load() {
    let dir = TempDir::new().unwrap();
    let mut yaml = String::from("l0: leaf\n");
    for i in 1..40 {
        yaml.push_str(&format!("l{i}: ['${{l{}}}', '${{l{}}}']\n", i - 1, i - 1));
    }
    yaml.push_str("fsm:\n  ns:\n    e:\n      current: a\n      event: b\n      target: c\n");
    let path = write(&dir, "bomb.yaml", &yaml);
    let registry = TransitionRegistry::new();

    assert!(matches!(
        load_transactions_from_file(&path, &registry),
        Err(ConfigError::ExpansionTooLarge { .. })
    ));
    assert!(registry.is_empty());
}

#[test]
fn file_errors_are_reported() {
    let dir = TempDir::new().unwrap();
    let registry = TransitionRegistry::new();

    assert!(matches!(
        load_transactions_from_file("", &registry),
        Err(ConfigError::InvalidFilePath)
    ));
    assert!(matches!(
        load_transactions_from_file(write(&dir, "fsm.toml", "x = 1"), &registry),
        Err(ConfigError::UnknownSuffix(_))
    ));
    assert!(matches!(
        load_transactions_from_file(dir.path().join("missing.yaml"), &registry),
        Err(ConfigError::Io { .. })
    ));
    assert!(matches!(
        load_transactions_from_file(write(&dir, "bad.json", "{ nope"), &registry),
        Err(ConfigError::Json(_))
    ));
    assert!(matches!(
        load_transactions_from_file(write(&dir, "bad.yaml", "fsm: [unclosed"), &registry),
        Err(ConfigError::Yaml(_))
    ));
    assert!(matches!(
        load_transactions_from_file(write(&dir, "fsm.xml", "<fsm/>"), &registry),
        Err(ConfigError::UnsupportedReaderType(ReaderType::Xml))
    ));
    assert!(registry.is_empty());
}

#[test]
fn default_registry_receives_file_contents() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "fsm.yaml",
        "fsm:\n  default-registry-test:\n    e:\n      current: a\n      event: b\n      target: c\n",
    );

    load_default_from_file(&path).unwrap();

    let registry = transition_table::default_registry();
    assert_eq!(
        registry
            .get_target_transition("default-registry-test", "a", "b")
            .map(|t| t.target_status.clone())
            .as_deref(),
        Some("c")
    );
    registry.remove_namespace("default-registry-test");
}

#[test]
fn dumped_config_reloads_identically() {
    let dir = TempDir::new().unwrap();
    let original = Config::from_text(ReaderType::Yaml, NS3_YAML).unwrap();
    let path = dir.path().join("copy.yaml");
    fs::write(&path, original.dump().unwrap()).unwrap();

    let reloaded = Config::new(&path).unwrap();

    assert_eq!(reloaded.values(), original.values());
}

#[test]
fn shared_registry_accepts_concurrent_writers_and_readers() {
    let registry: Arc<dyn TransitionRepo> = Arc::new(TransitionRegistry::new());

    let writers: Vec<_> = (0..8)
        .map(|worker| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for i in 0..50 {
                    registry.add(Transaction::new(
                        format!("ns{}", worker % 2),
                        format!("s{worker}-{i}"),
                        "tick",
                        format!("s{worker}-{}", i + 1),
                    ));
                    let _ = registry.get_target_transition("ns0", "s0-0", "tick");
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    for worker in 0..8 {
        for i in 0..50 {
            let found = registry
                .get_target_transition(&format!("ns{}", worker % 2), &format!("s{worker}-{i}"), "tick")
                .unwrap();
            assert_eq!(found.target_status, format!("s{worker}-{}", i + 1));
        }
    }
}
