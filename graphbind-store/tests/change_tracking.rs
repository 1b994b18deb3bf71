use std::sync::{Arc, Mutex};

use graphbind_store::{BackingStore, BackingStoreFactory, InMemoryBackingStoreFactory};
use pretty_assertions::assert_eq;

fn fresh() -> Box<dyn BackingStore<Option<String>>> {
    InMemoryBackingStoreFactory.create()
}

#[test]
fn factory_hands_out_independent_stores() {
    let mut first = fresh();
    let second = fresh();
    first.set("name", Some("a".into())).unwrap();
    assert!(second.get("name").is_none());
}

#[test]
fn patch_flow_reports_only_modified_keys() {
    let mut store = fresh();
    store.set_initialization_completed(false);
    store.set("id", Some("1".into())).unwrap();
    store.set("name", Some("host".into())).unwrap();
    store.set("note", Some("x".into())).unwrap();
    store.set_initialization_completed(true);

    store.set("name", Some("renamed".into())).unwrap();
    store.set("note", None).unwrap();

    store.set_return_only_changed_values(true);
    let keys: Vec<_> = store.entries().into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["name", "note"]);
    assert_eq!(store.keys_changed_to_null(), vec!["note"]);
}

#[test]
fn subscribers_observe_old_and_new_values() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let mut store = fresh();
    store.subscribe(Box::new(move |key, old, new| {
        sink.lock()
            .unwrap()
            .push((key.to_string(), old.cloned(), new.cloned()));
    }));

    store.set("name", Some("a".into())).unwrap();
    store.set("name", Some("b".into())).unwrap();
    store.remove("name");

    let log = log.lock().unwrap();
    assert_eq!(
        *log,
        vec![
            ("name".to_string(), None, Some(Some("a".to_string()))),
            (
                "name".to_string(),
                Some(Some("a".to_string())),
                Some(Some("b".to_string()))
            ),
            ("name".to_string(), Some(Some("b".to_string())), None),
        ]
    );
}

#[test]
fn clone_box_is_detached_from_original() {
    let mut store = fresh();
    store.set("name", Some("a".into())).unwrap();
    let mut copy = store.clone_box();
    copy.set("name", Some("b".into())).unwrap();
    assert_eq!(store.get("name"), Some(&Some("a".to_string())));
    assert_eq!(copy.get("name"), Some(&Some("b".to_string())));
}

#[test]
fn removal_after_decode_reads_as_change_to_null() {
    let mut store = fresh();
    store.set_initialization_completed(false);
    store.set("id", Some("1".into())).unwrap();
    store.set("note", Some("x".into())).unwrap();
    store.set("name", None).unwrap();
    store.set_initialization_completed(true);

    assert_eq!(store.remove("note"), Some(Some("x".to_string())));
    assert!(store.remove("missing").is_none());

    assert!(!store.contains_key("note"));
    assert_eq!(store.removed_keys(), vec!["note"]);
    assert_eq!(store.keys_changed_to_null(), vec!["note"]);

    store.set_initialization_completed(true);
    assert!(store.keys_changed_to_null().is_empty());
}
