use catalog_bus::dispatcher;
use catalog_bus::framework::{BusError, EventBus};
use catalog_bus::store::mock::{MockStore, RecordedCall};
use catalog_bus::store::{Document, Filter, FindOptions, Sort, StoreError, UpdateOutcome};
use serde_json::{json, Value};
use std::time::Duration;

const ADDRESS: &str = "catalog.dispatch";
const TIMEOUT: Duration = Duration::from_secs(1);

fn document(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

/// Pattern 2: Actor + Mocks
/// - Real dispatcher reading raw envelopes off the bus
/// - Scripted store underneath
#[tokio::test]
async fn test_dispatcher_answers_every_command_over_the_bus() {
    let bus = EventBus::new();
    let store = MockStore::new();

    store.expect_find().return_ok(vec![
        document(json!({ "_id": "b", "number": "2", "description": "Item 2" })),
        document(json!({ "_id": "a", "number": "1", "description": "Item 1" })),
    ]);
    store
        .expect_find()
        .return_ok(vec![document(json!({ "_id": "a", "number": "1" }))]);
    store.expect_insert().return_ok("c".to_string());
    store.expect_update().return_ok(UpdateOutcome {
        matched: 1,
        modified: 1,
    });
    store.expect_delete().return_ok(None);

    let handle = dispatcher::spawn(&bus, ADDRESS, 8, store.clone()).unwrap();

    let reply = bus
        .request(ADDRESS, json!({ "command": "FIND_ALL" }), TIMEOUT)
        .await
        .unwrap();
    assert_eq!(
        reply,
        json!({ "products": [
            { "id": "b", "number": "2", "description": "Item 2" },
            { "id": "a", "number": "1", "description": "Item 1" },
        ]})
    );

    // Missing fields come back empty
    let reply = bus
        .request(ADDRESS, json!({ "command": "FIND_BY_ID", "id": "a" }), TIMEOUT)
        .await
        .unwrap();
    assert_eq!(reply, json!({ "id": "a", "number": "1", "description": "" }));

    let reply = bus
        .request(
            ADDRESS,
            json!({ "command": "ADD", "payload": { "number": "3", "description": "Item 3" } }),
            TIMEOUT,
        )
        .await
        .unwrap();
    assert_eq!(reply, json!({ "id": "c" }));

    let reply = bus
        .request(
            ADDRESS,
            json!({ "command": "UPDATE", "id": "c", "payload": { "number": "3", "description": "New" } }),
            TIMEOUT,
        )
        .await
        .unwrap();
    assert_eq!(reply, json!({ "updated": true }));

    let reply = bus
        .request(ADDRESS, json!({ "command": "DELETE", "id": "zzz" }), TIMEOUT)
        .await
        .unwrap();
    assert_eq!(reply, json!({ "error": "No items found" }));

    // Verify what reached the store
    let calls = store.calls();
    assert_eq!(
        calls[0],
        RecordedCall::Find {
            filter: Filter::All,
            options: FindOptions::sorted(Sort::descending("number")),
        }
    );
    assert_eq!(
        calls[4],
        RecordedCall::Delete {
            filter: Filter::by_id("zzz")
        }
    );
    store.verify();

    assert!(bus.unregister(ADDRESS));
    handle.await.unwrap();
}

#[tokio::test]
async fn test_bad_envelopes_get_error_replies_without_store_calls() {
    let bus = EventBus::new();
    let store = MockStore::new();
    let handle = dispatcher::spawn(&bus, ADDRESS, 8, store.clone()).unwrap();

    let reply = bus
        .request(ADDRESS, json!({ "command": "DROP_TABLE" }), TIMEOUT)
        .await
        .unwrap();
    assert_eq!(reply, json!({ "error": "unknown command" }));

    let reply = bus.request(ADDRESS, json!({}), TIMEOUT).await.unwrap();
    assert_eq!(reply, json!({ "error": "unknown command" }));

    let reply = bus
        .request(ADDRESS, json!({ "command": "FIND_BY_ID" }), TIMEOUT)
        .await
        .unwrap();
    let error = reply["error"].as_str().unwrap();
    assert!(error.starts_with("malformed command"), "{}", error);

    assert!(store.calls().is_empty());

    bus.unregister(ADDRESS);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_store_errors_are_not_confused_with_not_found() {
    let bus = EventBus::new();
    let store = MockStore::new();
    store.expect_update().return_ok(UpdateOutcome::default());
    store
        .expect_update()
        .return_err(StoreError::Backend("write conflict".into()));

    let handle = dispatcher::spawn(&bus, ADDRESS, 8, store.clone()).unwrap();
    let update = json!({ "command": "UPDATE", "id": "a", "payload": { "number": "1", "description": "d" } });

    let reply = bus.request(ADDRESS, update.clone(), TIMEOUT).await.unwrap();
    assert_eq!(reply, json!({ "error": "No items found" }));

    let reply = bus.request(ADDRESS, update, TIMEOUT).await.unwrap();
    assert_eq!(
        reply,
        json!({ "error": "store failure: Backend error: write conflict" })
    );

    store.verify();
    bus.unregister(ADDRESS);
    handle.await.unwrap();
}

/// Failing inserts and deletes are answered, so requesters never wait for the timeout.
#[tokio::test]
async fn test_add_and_delete_store_failures_reply_over_the_bus() {
    let bus = EventBus::new();
    let store = MockStore::new();
    store
        .expect_insert()
        .return_err(StoreError::DuplicateKey("34241123".into()));
    store
        .expect_delete()
        .return_err(StoreError::Backend("socket closed".into()));

    let handle = dispatcher::spawn(&bus, ADDRESS, 8, store.clone()).unwrap();

    let reply = bus
        .request(
            ADDRESS,
            json!({ "command": "ADD", "payload": { "number": "432", "description": "Item 2" } }),
            TIMEOUT,
        )
        .await
        .unwrap();
    assert_eq!(
        reply,
        json!({ "error": "store failure: Duplicate key: 34241123" })
    );

    let reply = bus
        .request(ADDRESS, json!({ "command": "DELETE", "id": "1" }), TIMEOUT)
        .await
        .unwrap();
    assert_eq!(
        reply,
        json!({ "error": "store failure: Backend error: socket closed" })
    );

    store.verify();
    bus.unregister(ADDRESS);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_second_dispatcher_on_same_address_is_refused() {
    let bus = EventBus::new();
    let _handle = dispatcher::spawn(&bus, ADDRESS, 8, MockStore::new()).unwrap();

    let err = dispatcher::spawn(&bus, ADDRESS, 8, MockStore::new()).unwrap_err();
    assert_eq!(err, BusError::AddressInUse(ADDRESS.to_string()));
}
