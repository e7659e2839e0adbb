//! Per-field descriptor table driving the merge algorithm.
//!
//! Each configuration field appears exactly once: its wire key, its owning
//! change-category, and a merge routine that decodes an incoming value at the
//! field's type, validates it, and assigns it when it differs from the stored
//! value. The store walks this table uniformly instead of branching per
//! field.

use serde::Deserialize;
use serde_json::Value;

use crate::category::SettingCategory;
use crate::values::{LogLevel, SettingsValues};

/// Merge routine for one field. Returns `true` when the stored value
/// actually changed; a missing, ill-typed, or rejected value returns `false`
/// and leaves the prior value in place.
pub(crate) type ApplyFn = fn(&mut SettingsValues, &Value) -> bool;

pub(crate) struct FieldDescriptor {
    pub key: &'static str,
    pub category: SettingCategory,
    pub apply: ApplyFn,
}

// Validator flags. A blank HTML form field must never wipe a working value,
// so identity and credential fields reject the empty string, and the broker
// port rejects zero.
const NON_EMPTY: bool = true;
const ANY_STRING: bool = false;
const NON_ZERO: bool = true;
const ANY_PORT: bool = false;

pub(crate) const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor {
        key: "deviceName",
        category: SettingCategory::Base,
        apply: |s, v| merge_string(&mut s.device_name, v, NON_EMPTY),
    },
    FieldDescriptor {
        key: "mdnsName",
        category: SettingCategory::Base,
        apply: |s, v| merge_string(&mut s.mdns_name, v, NON_EMPTY),
    },
    FieldDescriptor {
        key: "mqttReceiveTopic",
        category: SettingCategory::Mqtt,
        apply: |s, v| merge_string(&mut s.mqtt_receive_topic, v, ANY_STRING),
    },
    FieldDescriptor {
        key: "mqttSendTopic",
        category: SettingCategory::Mqtt,
        apply: |s, v| merge_string(&mut s.mqtt_send_topic, v, ANY_STRING),
    },
    FieldDescriptor {
        key: "mqttOtaTopic",
        category: SettingCategory::Mqtt,
        apply: |s, v| merge_string(&mut s.mqtt_ota_topic, v, ANY_STRING),
    },
    FieldDescriptor {
        key: "mqttBroker",
        category: SettingCategory::Mqtt,
        apply: |s, v| merge_string(&mut s.mqtt_broker, v, NON_EMPTY),
    },
    FieldDescriptor {
        key: "mqttBrokerPort",
        category: SettingCategory::Mqtt,
        apply: |s, v| merge_u16(&mut s.mqtt_broker_port, v, NON_ZERO),
    },
    FieldDescriptor {
        key: "mqttUser",
        category: SettingCategory::Mqtt,
        apply: |s, v| merge_string(&mut s.mqtt_user, v, ANY_STRING),
    },
    FieldDescriptor {
        key: "mqttPassword",
        category: SettingCategory::Mqtt,
        apply: |s, v| merge_string(&mut s.mqtt_password, v, NON_EMPTY),
    },
    FieldDescriptor {
        key: "mqttRetain",
        category: SettingCategory::Mqtt,
        apply: |s, v| merge_bool(&mut s.mqtt_retain, v),
    },
    FieldDescriptor {
        key: "rfReceiverPin",
        category: SettingCategory::RfConfig,
        apply: |s, v| merge_u8(&mut s.rf_receiver_pin, v),
    },
    FieldDescriptor {
        key: "rfTransmitterPin",
        category: SettingCategory::RfConfig,
        apply: |s, v| merge_u8(&mut s.rf_transmitter_pin, v),
    },
    FieldDescriptor {
        key: "rfEchoMessages",
        category: SettingCategory::RfEcho,
        apply: |s, v| merge_bool(&mut s.rf_echo_messages, v),
    },
    FieldDescriptor {
        key: "rfProtocols",
        category: SettingCategory::RfProtocol,
        apply: |s, v| merge_protocols(&mut s.rf_protocols, v),
    },
    FieldDescriptor {
        key: "otaUrl",
        category: SettingCategory::Ota,
        apply: |s, v| merge_string(&mut s.ota_url, v, ANY_STRING),
    },
    FieldDescriptor {
        key: "serialLogLevel",
        category: SettingCategory::Logging,
        apply: |s, v| merge_level(&mut s.serial_log_level, v),
    },
    FieldDescriptor {
        key: "webLogLevel",
        category: SettingCategory::Logging,
        apply: |s, v| merge_level(&mut s.web_log_level, v),
    },
    FieldDescriptor {
        key: "syslogLevel",
        category: SettingCategory::Syslog,
        apply: |s, v| merge_level(&mut s.syslog_level, v),
    },
    FieldDescriptor {
        key: "syslogHost",
        category: SettingCategory::Syslog,
        apply: |s, v| merge_string(&mut s.syslog_host, v, ANY_STRING),
    },
    FieldDescriptor {
        key: "syslogPort",
        category: SettingCategory::Syslog,
        apply: |s, v| merge_u16(&mut s.syslog_port, v, ANY_PORT),
    },
    FieldDescriptor {
        key: "configPassword",
        category: SettingCategory::WebConfig,
        apply: |s, v| merge_string(&mut s.config_password, v, NON_EMPTY),
    },
];

fn merge_string(slot: &mut String, value: &Value, require_non_empty: bool) -> bool {
    let Some(incoming) = value.as_str() else {
        return false;
    };
    if require_non_empty && incoming.is_empty() {
        return false;
    }
    if slot == incoming {
        return false;
    }
    *slot = incoming.to_owned();
    true
}

fn merge_bool(slot: &mut bool, value: &Value) -> bool {
    let Some(incoming) = value.as_bool() else {
        return false;
    };
    if *slot == incoming {
        return false;
    }
    *slot = incoming;
    true
}

fn merge_u16(slot: &mut u16, value: &Value, require_non_zero: bool) -> bool {
    let Some(incoming) = value.as_u64().and_then(|n| u16::try_from(n).ok()) else {
        return false;
    };
    if require_non_zero && incoming == 0 {
        return false;
    }
    if *slot == incoming {
        return false;
    }
    *slot = incoming;
    true
}

fn merge_u8(slot: &mut u8, value: &Value) -> bool {
    let Some(incoming) = value.as_u64().and_then(|n| u8::try_from(n).ok()) else {
        return false;
    };
    if *slot == incoming {
        return false;
    }
    *slot = incoming;
    true
}

fn merge_level(slot: &mut LogLevel, value: &Value) -> bool {
    let Ok(incoming) = LogLevel::deserialize(value) else {
        return false;
    };
    if *slot == incoming {
        return false;
    }
    *slot = incoming;
    true
}

/// The protocol list is compared at document-subset granularity: the
/// incoming array is re-encoded compactly and matched byte-for-byte against
/// the stored text.
fn merge_protocols(slot: &mut String, value: &Value) -> bool {
    if !value.is_array() {
        return false;
    }
    let encoded = value.to_string();
    if *slot == encoded {
        return false;
    }
    *slot = encoded;
    true
}
