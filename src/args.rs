//! Args - the decoded argument bag handed to an operation
//!
//! Built per-request by the dispatcher from the raw wire strings, consumed
//! by exactly one operation invocation, then discarded. Accessors are typed
//! and strict: a missing key or a value of the wrong variant is an
//! operation-level error, reported back to the driver as a failed request.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, bail};

use crate::value::Value;

/// String-keyed bag of decoded values for a single invocation.
#[derive(Debug, Default)]
pub struct Args {
    values: HashMap<String, Value>,
}

impl Args {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    pub fn from_map(values: HashMap<String, Value>) -> Self {
        Self { values }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Raw access. Most handlers want the typed accessors below.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn require(&self, name: &str) -> anyhow::Result<&Value> {
        self.values
            .get(name)
            .ok_or_else(|| anyhow!("missing argument '{}'", name))
    }

    pub fn get_str(&self, name: &str) -> anyhow::Result<&str> {
        match self.require(name)? {
            Value::String(s) => Ok(s),
            other => bail!(
                "argument '{}' must be a string, got {}",
                name,
                other.type_name()
            ),
        }
    }

    pub fn get_bool(&self, name: &str) -> anyhow::Result<bool> {
        match self.require(name)? {
            Value::Bool(v) => Ok(*v),
            other => bail!(
                "argument '{}' must be a bool, got {}",
                name,
                other.type_name()
            ),
        }
    }

    pub fn get_i32(&self, name: &str) -> anyhow::Result<i32> {
        match self.require(name)? {
            Value::Int(v) => Ok(*v),
            other => bail!(
                "argument '{}' must be an int, got {}",
                name,
                other.type_name()
            ),
        }
    }

    /// Accepts both `L`- and `I`-tagged numbers: drivers routinely send
    /// small longs with the int tag.
    pub fn get_i64(&self, name: &str) -> anyhow::Result<i64> {
        match self.require(name)? {
            Value::Long(v) => Ok(*v),
            Value::Int(v) => Ok(i64::from(*v)),
            other => bail!(
                "argument '{}' must be a long, got {}",
                name,
                other.type_name()
            ),
        }
    }

    pub fn get_f32(&self, name: &str) -> anyhow::Result<f32> {
        match self.require(name)? {
            Value::Float(v) => Ok(*v),
            other => bail!(
                "argument '{}' must be a float, got {}",
                name,
                other.type_name()
            ),
        }
    }

    /// Accepts both `D`- and `F`-tagged numbers, widening floats.
    pub fn get_f64(&self, name: &str) -> anyhow::Result<f64> {
        match self.require(name)? {
            Value::Double(v) => Ok(*v),
            Value::Float(v) => Ok(f64::from(*v)),
            other => bail!(
                "argument '{}' must be a double, got {}",
                name,
                other.type_name()
            ),
        }
    }

    pub fn get_list(&self, name: &str) -> anyhow::Result<&Vec<Value>> {
        match self.require(name)? {
            Value::List(items) => Ok(items),
            other => bail!(
                "argument '{}' must be a list, got {}",
                name,
                other.type_name()
            ),
        }
    }

    pub fn get_map(&self, name: &str) -> anyhow::Result<&HashMap<String, Value>> {
        match self.require(name)? {
            Value::Map(map) => Ok(map),
            other => bail!(
                "argument '{}' must be a map, got {}",
                name,
                other.type_name()
            ),
        }
    }

    /// Resolve a handle-addressed live object to its concrete type.
    ///
    /// Fails if the argument is not an object or holds a different type
    /// than the operation expects.
    pub fn get_object<T: std::any::Any + Send + Sync>(
        &self,
        name: &str,
    ) -> anyhow::Result<Arc<T>> {
        match self.require(name)? {
            Value::Object(obj) => Arc::clone(obj).downcast::<T>().map_err(|_| {
                anyhow!(
                    "argument '{}' holds an object of an unexpected type",
                    name
                )
            }),
            other => bail!(
                "argument '{}' must be an object handle, got {}",
                name,
                other.type_name()
            ),
        }
    }
}
