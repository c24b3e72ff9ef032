//! Stable unique keys for widget instances.
//!
//! Every mounted widget owns one key for its whole lifetime. Element ids for
//! the widget's parts (trigger, panel, search input, rows) are derived from
//! it, so two dropdowns created on the same source line never collide.
//!
//! ```ignore
//! let key = InstanceKey::new("dropdown");
//! let trigger_id = key.derive("trigger");   // "dropdown:src/app.rs:12:9:<uuid>_trigger"
//! let fixed = InstanceKey::explicit("country-picker");
//! assert_eq!(fixed.derive("search"), "country-picker_search");
//! ```

use std::sync::Arc;
use uuid::Uuid;

/// Identity of one mounted dropdown
///
/// Generated keys look like `{prefix}:{file}:{line}:{col}:{uuid}`; explicit
/// keys are used verbatim.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct InstanceKey {
    key: Arc<str>,
    file: &'static str,
    line: u32,
    column: u32,
}

impl InstanceKey {
    /// Generated key; the uuid suffix keeps keys from one call site apart
    #[track_caller]
    pub fn new(prefix: &'static str) -> Self {
        let site = std::panic::Location::caller();
        let (file, line, column) = (site.file(), site.line(), site.column());
        let nonce = Uuid::new_v4();
        Self {
            key: format!("{prefix}:{file}:{line}:{column}:{}", nonce.as_simple()).into(),
            file,
            line,
            column,
        }
    }

    /// Caller-chosen key, for element ids that must not change between runs
    pub fn explicit(key: impl Into<String>) -> Self {
        Self {
            key: key.into().into(),
            file: "",
            line: 0,
            column: 0,
        }
    }

    pub fn get(&self) -> &str {
        &self.key
    }

    /// `{key}_{suffix}`, the id scheme for a dropdown's parts
    pub fn derive(&self, suffix: &str) -> String {
        format!("{}_{}", self.key, suffix)
    }

    /// Call site of a generated key; `("", 0, 0)` for explicit keys
    pub fn location(&self) -> (&'static str, u32, u32) {
        (self.file, self.line, self.column)
    }
}

impl std::fmt::Debug for InstanceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InstanceKey({})", self.key)
    }
}

impl std::fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key)
    }
}
