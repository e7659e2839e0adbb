//! Settings store with categorized change notification.
//!
//! The store owns every configuration field, applies incremental updates
//! from JSON documents field-by-field with per-field validators, computes
//! which change-categories were actually affected, and dispatches to
//! registered listeners only for those categories. Persistence goes through
//! a [`BlobStore`] holding one named text document.
//!
//! Typical lifecycle:
//! - construct [`Settings`] with a blob store and register change handlers
//! - [`Settings::load`] merges the persisted blob (if any) and fires every
//!   listener once so all subsystems initialize, blob or not
//! - runtime updates go through [`Settings::apply_update`], which fires only
//!   the listeners whose categories changed
//! - [`Settings::save`] persists the current state

mod category;
mod codec;
mod errors;
mod fields;
mod listeners;
mod storage;
mod store;
mod values;

pub use category::{CategorySet, SettingCategory};
pub use errors::SettingsError;
pub use listeners::SettingsCallback;
pub use storage::{BlobStore, FsBlobStore, MemoryBlobStore, BLOB_TERMINATOR, SETTINGS_BLOB};
pub use store::Settings;
pub use values::{LogLevel, SettingsValues};
