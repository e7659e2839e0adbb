use std::fmt;

/// A named group of configuration fields that change and are acted upon
/// together.
///
/// Every field in [`SettingsValues`](crate::SettingsValues) belongs to exactly
/// one category; the assignment lives in the field table and never changes at
/// runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SettingCategory {
    /// Device identity (device name, mDNS name).
    Base,
    /// Broker connection (host, port, credentials, topics).
    Mqtt,
    /// Radio pin assignment.
    RfConfig,
    /// Echo-mode flag.
    RfEcho,
    /// Enabled protocol list.
    RfProtocol,
    /// Update URL.
    Ota,
    /// Serial / web verbosity levels.
    Logging,
    /// Admin password for the config interface.
    WebConfig,
    /// Remote log sink.
    Syslog,
}

impl SettingCategory {
    /// Number of categories; the bitset below must stay representable in a
    /// `u16`.
    pub const COUNT: usize = 9;

    fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// A fixed-width bitset indexed by [`SettingCategory`].
///
/// Default-constructs to all-zero; `all()` is used for the unconditional
/// "fire everything" dispatch at boot.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct CategorySet(u16);

impl CategorySet {
    /// The empty set (no category marked).
    pub fn empty() -> Self {
        Self::default()
    }

    /// The set with every category marked.
    pub fn all() -> Self {
        Self((1 << SettingCategory::COUNT) - 1)
    }

    /// Mark or clear a single category.
    pub fn set(&mut self, category: SettingCategory, value: bool) {
        if value {
            self.0 |= category.bit();
        } else {
            self.0 &= !category.bit();
        }
    }

    /// Whether a single category is marked.
    pub fn test(self, category: SettingCategory) -> bool {
        self.0 & category.bit() != 0
    }

    /// Whether this set shares any category with `other`.
    pub fn intersects(self, other: CategorySet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Builder-style insertion, convenient for subscription sets.
    pub fn with(mut self, category: SettingCategory) -> Self {
        self.set(category, true);
        self
    }
}

impl From<SettingCategory> for CategorySet {
    fn from(category: SettingCategory) -> Self {
        Self::empty().with(category)
    }
}

impl fmt::Debug for CategorySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(SettingCategory, &str); SettingCategory::COUNT] = [
            (SettingCategory::Base, "Base"),
            (SettingCategory::Mqtt, "Mqtt"),
            (SettingCategory::RfConfig, "RfConfig"),
            (SettingCategory::RfEcho, "RfEcho"),
            (SettingCategory::RfProtocol, "RfProtocol"),
            (SettingCategory::Ota, "Ota"),
            (SettingCategory::Logging, "Logging"),
            (SettingCategory::WebConfig, "WebConfig"),
            (SettingCategory::Syslog, "Syslog"),
        ];
        let mut set = f.debug_set();
        for (category, name) in NAMES {
            if self.test(category) {
                set.entry(&name);
            }
        }
        set.finish()
    }
}
