//! Integration tests for the settings store:
//! - Partial-update merge semantics and per-field validators
//! - Category-accurate change detection
//! - Listener dispatch (boot full activation, diff-based runtime updates)
//! - Persistence round-trips through the blob stores
//!
//! NOTE: These tests avoid extra dev-dependencies by using std only.

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use serde_json::json;
use settings::{
    BlobStore, CategorySet, FsBlobStore, LogLevel, MemoryBlobStore, SettingCategory, Settings,
    SettingsError, SETTINGS_BLOB,
};

fn unique_temp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    p.push(format!("settings_store_test_{name}_{nanos}"));
    p
}

fn memory_store() -> (Settings, MemoryBlobStore) {
    let blobs = MemoryBlobStore::new();
    let settings = Settings::new(Box::new(blobs.clone()));
    (settings, blobs)
}

#[test]
fn applying_the_same_document_twice_is_idempotent() {
    let (mut settings, _) = memory_store();
    let doc = json!({
        "deviceName": "attic-bridge",
        "mqttBroker": "broker.local",
        "mqttBrokerPort": 8883,
    })
    .to_string();

    let first = settings.apply_update(&doc, false).expect("first apply");
    assert!(first.test(SettingCategory::Base));
    assert!(first.test(SettingCategory::Mqtt));

    let second = settings.apply_update(&doc, false).expect("second apply");
    assert!(
        second.is_empty(),
        "second application must be a no-op, got {second:?}"
    );
}

#[test]
fn omitted_fields_are_left_untouched() {
    let (mut settings, _) = memory_store();
    settings
        .apply_update(&json!({"mqttBroker": "broker.local"}).to_string(), false)
        .expect("seed broker");

    // Document that says nothing about the broker.
    settings
        .apply_update(&json!({"deviceName": "garage"}).to_string(), false)
        .expect("unrelated update");

    assert_eq!(settings.values().mqtt_broker, "broker.local");
    assert_eq!(settings.values().device_name, "garage");
}

#[test]
fn empty_broker_string_is_rejected() {
    let (mut settings, _) = memory_store();
    settings
        .apply_update(&json!({"mqttBroker": "broker.local"}).to_string(), false)
        .expect("seed broker");

    let changed = settings
        .apply_update(&json!({"mqttBroker": ""}).to_string(), false)
        .expect("apply blank broker");

    assert_eq!(
        settings.values().mqtt_broker,
        "broker.local",
        "a blank form field must not wipe a working broker address"
    );
    assert!(
        !changed.test(SettingCategory::Mqtt),
        "rejected value must not mark Mqtt changed"
    );
}

#[test]
fn zero_broker_port_is_rejected_nonzero_accepted() {
    let (mut settings, _) = memory_store();
    assert_eq!(settings.values().mqtt_broker_port, 1883, "default port");

    let changed = settings
        .apply_update(&json!({"mqttBrokerPort": 0}).to_string(), false)
        .expect("apply zero port");
    assert_eq!(settings.values().mqtt_broker_port, 1883);
    assert!(!changed.test(SettingCategory::Mqtt));

    let changed = settings
        .apply_update(&json!({"mqttBrokerPort": 8883}).to_string(), false)
        .expect("apply real port");
    assert_eq!(settings.values().mqtt_broker_port, 8883);
    assert!(changed.test(SettingCategory::Mqtt));
}

#[test]
fn device_name_change_marks_only_base() {
    let (mut settings, _) = memory_store();
    let changed = settings
        .apply_update(&json!({"deviceName": "cellar"}).to_string(), false)
        .expect("apply");

    assert_eq!(changed, CategorySet::from(SettingCategory::Base));
}

#[test]
fn protocol_list_changes_only_when_encoded_text_differs() {
    let (mut settings, _) = memory_store();

    let changed = settings
        .apply_update(&json!({"rfProtocols": ["1", "4", "7"]}).to_string(), false)
        .expect("initial list");
    assert!(changed.test(SettingCategory::RfProtocol));

    // Byte-identical encoded text: no change.
    let changed = settings
        .apply_update(&json!({"rfProtocols": ["1", "4", "7"]}).to_string(), false)
        .expect("same list");
    assert!(changed.is_empty());

    // Same set, different order: encoded text differs, so this counts.
    let changed = settings
        .apply_update(&json!({"rfProtocols": ["7", "4", "1"]}).to_string(), false)
        .expect("reordered list");
    assert!(changed.test(SettingCategory::RfProtocol));
}

#[test]
fn load_fires_every_listener_exactly_once_without_a_blob() {
    let (mut settings, blobs) = memory_store();
    assert!(!blobs.exists(SETTINGS_BLOB));

    let mqtt_calls = Rc::new(Cell::new(0));
    let base_calls = Rc::new(Cell::new(0));
    {
        let mqtt_calls = mqtt_calls.clone();
        settings.register_change_handler(SettingCategory::Mqtt, move |_| {
            mqtt_calls.set(mqtt_calls.get() + 1);
        });
    }
    {
        let base_calls = base_calls.clone();
        settings.register_change_handler(SettingCategory::Base, move |_| {
            base_calls.set(base_calls.get() + 1);
        });
    }

    settings.load();

    assert_eq!(mqtt_calls.get(), 1, "full activation on first boot");
    assert_eq!(base_calls.get(), 1);
}

#[test]
fn load_fires_every_listener_exactly_once_with_a_blob() {
    let blobs = MemoryBlobStore::new();
    {
        let mut seed = Settings::new(Box::new(blobs.clone()));
        seed.apply_update(&json!({"mqttBroker": "broker.local"}).to_string(), false)
            .expect("seed");
        seed.save().expect("persist seed");
    }

    let mut settings = Settings::new(Box::new(blobs.clone()));
    let ota_calls = Rc::new(Cell::new(0));
    {
        let ota_calls = ota_calls.clone();
        // Subscribed to a category the blob does not touch: full activation
        // must reach it anyway.
        settings.register_change_handler(SettingCategory::Ota, move |_| {
            ota_calls.set(ota_calls.get() + 1);
        });
    }

    settings.load();

    assert_eq!(settings.values().mqtt_broker, "broker.local");
    assert_eq!(ota_calls.get(), 1);
}

#[test]
fn serialize_apply_round_trip_is_a_no_op() {
    let (mut settings, _) = memory_store();
    settings
        .apply_update(
            &json!({
                "deviceName": "attic",
                "mqttBroker": "broker.local",
                "mqttPassword": "hunter2",
                "rfProtocols": ["1", "2"],
                "serialLogLevel": "info",
            })
            .to_string(),
            false,
        )
        .expect("seed state");

    let document = settings.serialize(false, true);
    let changed = settings
        .apply_update(&document, false)
        .expect("round trip apply");
    assert!(
        changed.is_empty(),
        "round trip must yield an empty changed-set, got {changed:?}"
    );
}

#[test]
fn redacted_serialization_omits_secrets() {
    let (mut settings, _) = memory_store();
    settings
        .apply_update(
            &json!({"mqttPassword": "hunter2", "configPassword": "sesame"}).to_string(),
            false,
        )
        .expect("set secrets");

    let redacted = settings.serialize(true, false);
    assert!(!redacted.contains("hunter2"));
    assert!(!redacted.contains("sesame"));
    assert!(!redacted.contains("mqttPassword"));
    assert!(!redacted.contains("configPassword"));

    let full = settings.serialize(false, true);
    assert!(full.contains("hunter2"));
    assert!(full.contains("sesame"));
}

#[test]
fn malformed_document_aborts_without_mutation() {
    let (mut settings, _) = memory_store();
    let fired = Rc::new(Cell::new(false));
    {
        let fired = fired.clone();
        settings.register_change_handler(CategorySet::all(), move |_| fired.set(true));
    }
    let before = settings.values().clone();

    let result = settings.apply_update("{\"deviceName\": \"attic\"", true);
    assert!(matches!(result, Err(SettingsError::Decode(_))));
    assert_eq!(*settings.values(), before, "no partial application");
    assert!(!fired.get(), "no dispatch on decode failure");

    // Non-object documents are malformed too.
    let result = settings.apply_update("[1, 2, 3]", true);
    assert!(matches!(result, Err(SettingsError::Decode(_))));
}

#[test]
fn dispatch_respects_registration_order_and_subscriptions() {
    let (mut settings, _) = memory_store();
    let order = Rc::new(RefCell::new(Vec::new()));
    for (label, category) in [
        ("mqtt", SettingCategory::Mqtt),
        ("base", SettingCategory::Base),
        ("ota", SettingCategory::Ota),
    ] {
        let order = order.clone();
        settings.register_change_handler(category, move |_| order.borrow_mut().push(label));
    }

    settings
        .apply_update(
            &json!({"deviceName": "attic", "mqttBroker": "broker.local"}).to_string(),
            true,
        )
        .expect("apply with callbacks");

    assert_eq!(
        *order.borrow(),
        vec!["mqtt", "base"],
        "subscribed listeners fire in registration order; Ota stays silent"
    );
}

#[test]
fn listeners_see_the_full_current_configuration() {
    let (mut settings, _) = memory_store();
    let seen_port = Rc::new(Cell::new(0u16));
    {
        let seen_port = seen_port.clone();
        // Subscribed to Base, but reads an Mqtt field: callbacks get the
        // whole store regardless of subscription.
        settings.register_change_handler(SettingCategory::Base, move |s| {
            seen_port.set(s.values().mqtt_broker_port);
        });
    }

    settings
        .apply_update(
            &json!({"deviceName": "attic", "mqttBrokerPort": 8883}).to_string(),
            true,
        )
        .expect("apply");

    assert_eq!(seen_port.get(), 8883);
}

#[test]
fn suppressed_callbacks_still_report_changes() {
    let (mut settings, _) = memory_store();
    let fired = Rc::new(Cell::new(false));
    {
        let fired = fired.clone();
        settings.register_change_handler(CategorySet::all(), move |_| fired.set(true));
    }

    let changed = settings
        .apply_update(&json!({"deviceName": "attic"}).to_string(), false)
        .expect("apply without callbacks");

    assert!(changed.test(SettingCategory::Base));
    assert!(!fired.get());
}

#[test]
fn update_ota_url_bypasses_change_tracking() {
    let (mut settings, _) = memory_store();
    let fired = Rc::new(Cell::new(false));
    {
        let fired = fired.clone();
        settings.register_change_handler(CategorySet::all(), move |_| fired.set(true));
    }

    settings.update_ota_url("http://updates.local/firmware.bin");

    assert_eq!(settings.values().ota_url, "http://updates.local/firmware.bin");
    assert!(!fired.get());
}

#[test]
fn save_and_load_round_trip_through_memory_store() {
    let blobs = MemoryBlobStore::new();
    {
        let mut settings = Settings::new(Box::new(blobs.clone()));
        settings
            .apply_update(
                &json!({
                    "deviceName": "attic",
                    "mqttBroker": "broker.local",
                    "mqttPassword": "hunter2",
                    "webLogLevel": "warning",
                })
                .to_string(),
                false,
            )
            .expect("seed");
        settings.save().expect("save");
    }

    let mut reloaded = Settings::new(Box::new(blobs.clone()));
    reloaded.load();

    assert_eq!(reloaded.values().device_name, "attic");
    assert_eq!(reloaded.values().mqtt_broker, "broker.local");
    assert_eq!(
        reloaded.values().mqtt_password,
        "hunter2",
        "persistence always includes secrets"
    );
    assert_eq!(reloaded.values().web_log_level, LogLevel::Warning);
}

#[test]
fn save_load_and_reset_through_the_filesystem() {
    let dir = unique_temp_dir("fs_round_trip");
    let _ = fs::remove_dir_all(&dir);

    {
        let mut settings = Settings::new(Box::new(FsBlobStore::new(dir.clone())));
        settings
            .apply_update(&json!({"deviceName": "cellar"}).to_string(), false)
            .expect("seed");
        settings.save().expect("save to disk");
        assert!(dir.join(SETTINGS_BLOB).exists(), "blob file created");
    }

    let mut reloaded = Settings::new(Box::new(FsBlobStore::new(dir.clone())));
    reloaded.load();
    assert_eq!(reloaded.values().device_name, "cellar");

    // Reset deletes the blob but leaves the in-memory fields alone.
    reloaded.reset();
    assert!(!dir.join(SETTINGS_BLOB).exists());
    assert_eq!(reloaded.values().device_name, "cellar");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn unreadable_blob_falls_back_to_defaults() {
    let blobs = MemoryBlobStore::new();
    blobs
        .write(SETTINGS_BLOB, "not json at all")
        .expect("plant garbage blob");

    let mut settings = Settings::new(Box::new(blobs.clone()));
    let calls = Rc::new(Cell::new(0));
    {
        let calls = calls.clone();
        settings.register_change_handler(CategorySet::all(), move |_| calls.set(calls.get() + 1));
    }

    settings.load();

    assert_eq!(settings.values().mqtt_broker_port, 1883, "defaults kept");
    assert_eq!(calls.get(), 1, "full activation still fires");
}
