//! Memory - thread-safe table of live objects addressed by opaque handle
//!
//! HTTP requests are stateless, but the objects a test driver works with
//! (documents, listeners, mutable containers) are not. Memory bridges the
//! two: any value the serializer cannot render textually is stored here and
//! crosses the wire as a handle string (`"@" + counter`). Later requests
//! resolve the handle back into the live value.
//!
//! # Architecture
//!
//! - A `RwLock<HashMap>` maps handle strings to stored values
//! - An `AtomicU64` issues handle numbers; it is never reused and never
//!   reset, so a handle number identifies at most one value per process
//! - `flush()` removes every entry between test runs but leaves the counter
//!   alone - handles stay globally unique for the life of the process
//!
//! Locks are held only for the duration of a single table operation, never
//! across a handler invocation.
//!
//! # Usage
//!
//! ```
//! use testkit_bridge::memory::Memory;
//! use testkit_bridge::value::Value;
//!
//! let memory = Memory::new();
//!
//! let handle = memory.add(Value::from("hello"));
//! assert_eq!(memory.get(&handle).unwrap(), Value::from("hello"));
//!
//! memory.remove(&handle);
//! assert!(memory.get(&handle).is_err());
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::error::{BridgeError, Result};
use crate::value::Value;

/// Thread-safe handle table shared by all in-flight requests.
pub struct Memory {
    /// All live entries, keyed by full handle string
    entries: RwLock<HashMap<String, Value>>,
    /// Next handle number to issue (monotonic, never reset)
    next_id: AtomicU64,
    /// Optional suffix appended to every handle, e.g. a host tag in
    /// multi-tenant deployments. Opaque to the protocol.
    scope: Option<String>,
}

impl Memory {
    /// Create an unscoped handle table. Handles look like `@1`, `@2`, ...
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            scope: None,
        }
    }

    /// Create a scoped handle table. Handles look like `@1_<scope>`.
    pub fn with_scope(scope: impl Into<String>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            scope: Some(scope.into()),
        }
    }

    /// Store a value and return a fresh handle for it.
    ///
    /// Never fails and never returns a previously issued handle. Storing
    /// the same value twice yields two distinct handles - Memory does not
    /// deduplicate.
    pub fn add(&self, value: Value) -> String {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let handle = match &self.scope {
            Some(scope) => format!("@{}_{}", id, scope),
            None => format!("@{}", id),
        };

        let mut entries = self.entries.write().unwrap();
        entries.insert(handle.clone(), value);

        handle
    }

    /// Resolve a handle to a clone of the stored value.
    pub fn get(&self, handle: &str) -> Result<Value> {
        let entries = self.entries.read().unwrap();
        entries
            .get(handle)
            .cloned()
            .ok_or_else(|| BridgeError::HandleNotFound(handle.to_string()))
    }

    /// Remove a handle. Removing an unknown or already-removed handle is a
    /// no-op: drivers release eagerly and sometimes twice.
    pub fn remove(&self, handle: &str) {
        let mut entries = self.entries.write().unwrap();
        entries.remove(handle);
    }

    /// Remove every entry. Used to reset harness state between test runs.
    ///
    /// The handle counter is NOT reset: handles issued after a flush never
    /// collide with handles issued before it.
    pub fn flush(&self) {
        let mut entries = self.entries.write().unwrap();
        entries.clear();
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    // ========================================================================
    // Allocation
    // ========================================================================

    #[test]
    fn test_add_returns_sequential_handles() {
        let memory = Memory::new();

        assert_eq!(memory.add(Value::from("a")), "@1");
        assert_eq!(memory.add(Value::from("b")), "@2");
        assert_eq!(memory.add(Value::from("c")), "@3");
    }

    #[test]
    fn test_add_same_value_twice_yields_distinct_handles() {
        let memory = Memory::new();
        let obj = Value::object("shared".to_string());

        let h1 = memory.add(obj.clone());
        let h2 = memory.add(obj);

        assert_ne!(h1, h2);
    }

    #[test]
    fn test_scoped_handles_carry_suffix() {
        let memory = Memory::with_scope("10.0.0.5");

        assert_eq!(memory.add(Value::Null), "@1_10.0.0.5");
        assert_eq!(memory.add(Value::Null), "@2_10.0.0.5");
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    #[test]
    fn test_get_returns_stored_value() {
        let memory = Memory::new();

        let handle = memory.add(Value::from("hello"));
        assert_eq!(memory.get(&handle).unwrap(), Value::from("hello"));
    }

    #[test]
    fn test_get_unknown_handle_fails() {
        let memory = Memory::new();

        let result = memory.get("@99");
        assert!(matches!(result, Err(BridgeError::HandleNotFound(_))));
    }

    #[test]
    fn test_get_after_remove_fails() {
        let memory = Memory::new();

        let handle = memory.add(Value::Int(7));
        memory.remove(&handle);

        assert!(matches!(
            memory.get(&handle),
            Err(BridgeError::HandleNotFound(_))
        ));
    }

    #[test]
    fn test_object_resolves_to_same_allocation() {
        let memory = Memory::new();
        let obj = Value::object("live".to_string());

        let handle = memory.add(obj.clone());
        // Identity, not structural, equality
        assert_eq!(memory.get(&handle).unwrap(), obj);
    }

    // ========================================================================
    // Release Semantics
    // ========================================================================

    #[test]
    fn test_remove_is_idempotent() {
        let memory = Memory::new();

        let handle = memory.add(Value::Int(1));
        memory.remove(&handle);
        memory.remove(&handle); // second release must not panic or error
        memory.remove("@does-not-exist");
    }

    // ========================================================================
    // Flush Semantics
    // ========================================================================

    #[test]
    fn test_flush_removes_all_entries() {
        let memory = Memory::new();

        let h1 = memory.add(Value::Int(1));
        let h2 = memory.add(Value::Int(2));
        memory.flush();

        assert!(memory.is_empty());
        assert!(memory.get(&h1).is_err());
        assert!(memory.get(&h2).is_err());
    }

    #[test]
    fn test_flush_does_not_reset_counter() {
        let memory = Memory::new();

        let before = memory.add(Value::Int(1));
        memory.flush();
        let after = memory.add(Value::Int(2));

        assert_eq!(before, "@1");
        assert_eq!(after, "@2"); // continues the sequence, no collision
    }

    // ========================================================================
    // Concurrency
    // ========================================================================

    #[test]
    fn test_concurrent_adds_yield_distinct_handles() {
        let memory = Arc::new(Memory::new());
        let mut handles = vec![];

        for _ in 0..8 {
            let m = Arc::clone(&memory);
            handles.push(thread::spawn(move || {
                (0..100)
                    .map(|i| m.add(Value::Int(i)))
                    .collect::<Vec<String>>()
            }));
        }

        let mut all: Vec<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();

        let issued = all.len();
        all.sort();
        all.dedup();

        assert_eq!(all.len(), issued, "no handle may be issued twice");
        assert_eq!(memory.len(), issued, "no insert may be lost");
    }
}
