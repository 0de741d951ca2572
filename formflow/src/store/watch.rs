//! Change subscriptions on the value bag.

use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;

/// Callback receiving `(new, old)`. `old` is `None` for the immediate call.
pub type WatchCallback = Arc<dyn Fn(&Value, Option<&Value>) + Send + Sync>;

/// What a watcher observes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WatchTarget {
    /// A single field.
    Field(String),
    /// The whole value bag.
    All,
}

impl WatchTarget {
    /// Creates a field target.
    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    fn default_deep(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl From<&str> for WatchTarget {
    fn from(name: &str) -> Self {
        if name == "*" {
            Self::All
        } else {
            Self::Field(name.to_string())
        }
    }
}

impl From<String> for WatchTarget {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl fmt::Display for WatchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => write!(f, "{name}"),
            Self::All => write!(f, "*"),
        }
    }
}

/// Watcher options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchOptions {
    /// Compare by deep equality. Defaults to `false` for a field and `true`
    /// for the whole bag.
    pub deep: Option<bool>,
    /// Fire once right away with the current value.
    pub immediate: bool,
}

impl WatchOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets deep comparison.
    #[must_use]
    pub fn with_deep(mut self, deep: bool) -> Self {
        self.deep = Some(deep);
        self
    }

    /// Sets immediate firing.
    #[must_use]
    pub fn with_immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }
}

struct Watcher {
    id: u64,
    deep: bool,
    callback: WatchCallback,
}

impl Watcher {
    fn should_fire(&self, target: &WatchTarget, old: &Value, new: &Value) -> bool {
        if self.deep {
            return old != new;
        }
        match target {
            // the whole-bag view is rebuilt on every write
            WatchTarget::All => true,
            WatchTarget::Field(_) => old != new || new.is_array() || new.is_object(),
        }
    }
}

/// Registry holding at most one watcher per target.
#[derive(Default)]
pub struct WatchRegistry {
    watchers: Mutex<HashMap<WatchTarget, Watcher>>,
    next_id: AtomicU64,
}

impl fmt::Debug for WatchRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchRegistry")
            .field("active", &self.active_count())
            .finish()
    }
}

impl WatchRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a watcher, replacing the one already on `target`.
    pub(crate) fn install(
        self: &Arc<Self>,
        target: WatchTarget,
        options: WatchOptions,
        callback: WatchCallback,
    ) -> WatchHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let deep = options.deep.unwrap_or_else(|| target.default_deep());

        let replaced = self
            .watchers
            .lock()
            .insert(target.clone(), Watcher { id, deep, callback })
            .is_some();
        if replaced {
            debug!(target = %target, "Replaced existing watcher");
        }

        WatchHandle {
            target,
            id,
            registry: Arc::downgrade(self),
        }
    }

    fn remove(&self, target: &WatchTarget, id: u64) -> bool {
        let mut watchers = self.watchers.lock();
        if watchers.get(target).is_some_and(|w| w.id == id) {
            watchers.remove(target);
            return true;
        }
        false
    }

    /// Returns true if a watcher is active on `target`.
    #[must_use]
    pub fn is_watching(&self, target: &WatchTarget) -> bool {
        self.watchers.lock().contains_key(target)
    }

    /// Returns the number of active watchers.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.watchers.lock().len()
    }

    /// Returns true if a whole-bag watcher is installed.
    #[must_use]
    pub fn has_all_watcher(&self) -> bool {
        self.is_watching(&WatchTarget::All)
    }

    /// Notifies the watcher on `target` if its firing condition holds.
    ///
    /// The callback runs after the registry lock is released.
    pub fn notify(&self, target: &WatchTarget, old: &Value, new: &Value) {
        let callback = {
            let watchers = self.watchers.lock();
            watchers
                .get(target)
                .filter(|w| w.should_fire(target, old, new))
                .map(|w| Arc::clone(&w.callback))
        };
        if let Some(callback) = callback {
            callback(new, Some(old));
        }
    }
}

/// Handle returned by `watch`; dropping it keeps the watcher installed.
#[derive(Debug)]
#[must_use = "dropping the handle leaves the watcher active; call `unsubscribe` to stop it"]
pub struct WatchHandle {
    target: WatchTarget,
    id: u64,
    registry: Weak<WatchRegistry>,
}

impl WatchHandle {
    /// The watched target.
    pub fn target(&self) -> &WatchTarget {
        &self.target
    }

    /// Removes the watcher if it is still the active one for its target.
    ///
    /// Returns false if it was already replaced or removed.
    pub fn unsubscribe(self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.remove(&self.target, self.id))
    }
}
