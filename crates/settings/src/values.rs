use std::fmt;

use serde::{Deserialize, Serialize};

/// Verbosity levels understood by the logging subsystems.
///
/// `Off` disables the sink entirely. The wire form is the lowercase name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Off,
    Error,
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The full configuration field set: the single in-memory source of truth
/// for the device's configuration.
///
/// Constructed once at process start with hard-coded defaults and mutated
/// only through [`Settings::apply_update`](crate::Settings::apply_update) or
/// the dedicated single-field setters. The category each field belongs to is
/// recorded in the field table (`fields::FIELDS`).
#[derive(Clone, Debug, PartialEq)]
pub struct SettingsValues {
    pub device_name: String,
    pub mdns_name: String,
    pub mqtt_receive_topic: String,
    pub mqtt_send_topic: String,
    pub mqtt_ota_topic: String,
    pub mqtt_broker: String,
    pub mqtt_broker_port: u16,
    pub mqtt_user: String,
    pub mqtt_password: String,
    pub mqtt_retain: bool,
    pub rf_receiver_pin: u8,
    pub rf_transmitter_pin: u8,
    pub rf_echo_messages: bool,
    /// Enabled protocol list, kept in its compact encoded text form. The
    /// list is stored and compared as an opaque ordered collection, not
    /// decomposed into individually addressable entries.
    pub rf_protocols: String,
    pub ota_url: String,
    pub serial_log_level: LogLevel,
    pub web_log_level: LogLevel,
    pub syslog_level: LogLevel,
    pub syslog_host: String,
    pub syslog_port: u16,
    pub config_password: String,
}

impl Default for SettingsValues {
    fn default() -> Self {
        Self {
            device_name: "rfgateway".to_owned(),
            mdns_name: "rfgateway".to_owned(),
            mqtt_receive_topic: "rfgateway/recv/".to_owned(),
            mqtt_send_topic: "rfgateway/send/".to_owned(),
            mqtt_ota_topic: "rfgateway/ota/".to_owned(),
            mqtt_broker: String::new(),
            mqtt_broker_port: 1883,
            mqtt_user: String::new(),
            mqtt_password: String::new(),
            mqtt_retain: true,
            rf_receiver_pin: 4,
            rf_transmitter_pin: 5,
            rf_echo_messages: false,
            rf_protocols: "[]".to_owned(),
            ota_url: String::new(),
            serial_log_level: LogLevel::Debug,
            web_log_level: LogLevel::Off,
            syslog_level: LogLevel::Off,
            syslog_host: String::new(),
            syslog_port: 514,
            config_password: "rfgateway".to_owned(),
        }
    }
}
