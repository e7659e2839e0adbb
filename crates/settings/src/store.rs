//! The settings store: owns all configuration fields, applies updates
//! field-by-field with per-field validators, computes which categories
//! changed, and dispatches to registered listeners.

use log::{debug, error, warn};
use serde_json::{Map, Value};

use crate::category::CategorySet;
use crate::codec;
use crate::errors::SettingsError;
use crate::fields::FIELDS;
use crate::listeners::ListenerRegistry;
use crate::storage::{BlobStore, SETTINGS_BLOB};
use crate::values::SettingsValues;

/// The device's configuration, held as the single in-memory source of truth.
///
/// Created once at process start with hard-coded defaults for every field
/// and mutated only through [`apply_update`](Settings::apply_update) or the
/// dedicated single-field setters. All operations run to completion on the
/// calling thread; listener callbacks must not re-enter the update path.
pub struct Settings {
    values: SettingsValues,
    listeners: ListenerRegistry,
    storage: Box<dyn BlobStore>,
}

impl Settings {
    pub fn new(storage: Box<dyn BlobStore>) -> Self {
        Self {
            values: SettingsValues::default(),
            listeners: ListenerRegistry::default(),
            storage,
        }
    }

    /// Read-only view of the current configuration.
    pub fn values(&self) -> &SettingsValues {
        &self.values
    }

    /// Register a callback for the given category subscription. Registration
    /// order determines dispatch order; there is no removal path.
    pub fn register_change_handler(
        &mut self,
        subscription: impl Into<CategorySet>,
        callback: impl Fn(&Settings) + 'static,
    ) {
        self.listeners
            .register(subscription.into(), Box::new(callback));
    }

    /// Merge an update document into the stored configuration.
    ///
    /// Every field present in the document is decoded at its expected type
    /// and run through its validator; rejected or ill-typed values are
    /// skipped, leaving the prior value. Fields absent from the document are
    /// untouched. A malformed document aborts with no mutation.
    ///
    /// The changed-category set is returned whether or not callbacks fired,
    /// so callers can assert exactly which categories reacted.
    pub fn apply_update(
        &mut self,
        document: &str,
        fire_callbacks: bool,
    ) -> Result<CategorySet, SettingsError> {
        let parsed = codec::decode(document).map_err(|err| {
            warn!("settings document parse failed: {err}");
            SettingsError::Decode(err)
        })?;

        let mut changed = CategorySet::empty();
        for field in FIELDS {
            if let Some(value) = parsed.get(field.key) {
                if (field.apply)(&mut self.values, value) {
                    changed.set(field.category, true);
                }
            }
        }

        if fire_callbacks {
            self.listeners.dispatch(changed, self);
        }
        Ok(changed)
    }

    /// Load the persisted configuration, then fire every listener once.
    ///
    /// A missing or unreadable blob is non-fatal: the device proceeds with
    /// the current (default) values. The final dispatch uses the
    /// all-categories set regardless, so every subsystem initializes itself
    /// even on first boot.
    pub fn load(&mut self) {
        if self.storage.exists(SETTINGS_BLOB) {
            match self.storage.read(SETTINGS_BLOB) {
                Ok(contents) => {
                    debug!("settings blob contents: {contents}");
                    // Change tracking is discarded here: every category is
                    // about to be activated below anyway.
                    if let Err(err) = self.apply_update(&contents, false) {
                        warn!("persisted settings rejected, keeping defaults: {err}");
                    }
                }
                Err(err) => {
                    warn!("{}", SettingsError::StorageRead(err));
                }
            }
        }

        // Fire for all.
        self.listeners.dispatch(CategorySet::all(), self);
    }

    /// Persist the current configuration, secrets included.
    ///
    /// A write failure leaves the in-memory state authoritative for the rest
    /// of the session.
    pub fn save(&self) -> Result<(), SettingsError> {
        let document = self.serialize(false, true);
        self.storage.write(SETTINGS_BLOB, &document).map_err(|err| {
            let err = SettingsError::StorageWrite(err);
            error!("{err}");
            err
        })
    }

    /// Delete the persisted blob. In-memory fields keep their current values
    /// until the next load.
    pub fn reset(&self) {
        if let Err(err) = self.storage.remove(SETTINGS_BLOB) {
            warn!("failed to remove settings blob: {err}");
        }
    }

    /// Dedicated setter for the OTA URL (used by the update check-in path);
    /// does not participate in change tracking.
    pub fn update_ota_url(&mut self, ota_url: &str) {
        self.values.ota_url = ota_url.to_owned();
    }

    /// Encode the configuration as a document, compact or human-readable.
    ///
    /// Secret fields (broker password, admin password) are emitted only when
    /// `include_secrets` is set; persistence always includes them, redaction
    /// exists for display paths.
    pub fn serialize(&self, pretty: bool, include_secrets: bool) -> String {
        let v = &self.values;
        let mut root = Map::new();

        root.insert("deviceName".to_owned(), Value::from(v.device_name.as_str()));
        root.insert("mdnsName".to_owned(), Value::from(v.mdns_name.as_str()));
        root.insert(
            "mqttReceiveTopic".to_owned(),
            Value::from(v.mqtt_receive_topic.as_str()),
        );
        root.insert(
            "mqttSendTopic".to_owned(),
            Value::from(v.mqtt_send_topic.as_str()),
        );
        root.insert(
            "mqttOtaTopic".to_owned(),
            Value::from(v.mqtt_ota_topic.as_str()),
        );
        root.insert("mqttBroker".to_owned(), Value::from(v.mqtt_broker.as_str()));
        root.insert("mqttBrokerPort".to_owned(), Value::from(v.mqtt_broker_port));
        root.insert("mqttUser".to_owned(), Value::from(v.mqtt_user.as_str()));
        root.insert("mqttRetain".to_owned(), Value::from(v.mqtt_retain));
        root.insert("rfReceiverPin".to_owned(), Value::from(v.rf_receiver_pin));
        root.insert(
            "rfTransmitterPin".to_owned(),
            Value::from(v.rf_transmitter_pin),
        );
        root.insert("rfEchoMessages".to_owned(), Value::from(v.rf_echo_messages));

        // Round-trip the stored protocol list through a parse/reassemble so
        // the emitted array is normalized rather than copied as raw text.
        let protocols = serde_json::from_str::<Value>(&v.rf_protocols)
            .unwrap_or_else(|_| Value::Array(Vec::new()));
        root.insert("rfProtocols".to_owned(), protocols);

        root.insert("otaUrl".to_owned(), Value::from(v.ota_url.as_str()));
        root.insert(
            "serialLogLevel".to_owned(),
            Value::from(v.serial_log_level.as_str()),
        );
        root.insert(
            "webLogLevel".to_owned(),
            Value::from(v.web_log_level.as_str()),
        );
        root.insert(
            "syslogLevel".to_owned(),
            Value::from(v.syslog_level.as_str()),
        );
        root.insert("syslogHost".to_owned(), Value::from(v.syslog_host.as_str()));
        root.insert("syslogPort".to_owned(), Value::from(v.syslog_port));

        if include_secrets {
            root.insert(
                "mqttPassword".to_owned(),
                Value::from(v.mqtt_password.as_str()),
            );
            root.insert(
                "configPassword".to_owned(),
                Value::from(v.config_password.as_str()),
            );
        }

        codec::encode(&Value::Object(root), pretty)
    }
}
