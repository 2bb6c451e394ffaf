//! `dictionary` namespace - handle-addressed mutable string-keyed map
//!
//! The driver creates a dictionary, receives its handle, mutates it across
//! any number of requests, and releases it when the test case is done.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::registry::HandlerRegistry;
use crate::value::Value;

/// The live object behind a dictionary handle.
pub type SharedDictionary = Mutex<HashMap<String, Value>>;

pub fn register(registry: &mut HandlerRegistry) {
    registry.register("dictionary", "create", |args| {
        let seed = match args.get("dictionary") {
            Some(Value::Map(map)) => map.clone(),
            _ => HashMap::new(),
        };
        Ok(Some(Value::object::<SharedDictionary>(Mutex::new(seed))))
    });

    registry.register("dictionary", "get", |args| {
        let dict = args.get_object::<SharedDictionary>("dictionary")?;
        let key = args.get_str("key")?;
        let value = dict.lock().unwrap().get(key).cloned().unwrap_or(Value::Null);
        Ok(Some(value))
    });

    registry.register("dictionary", "put", |args| {
        let dict = args.get_object::<SharedDictionary>("dictionary")?;
        let key = args.get_str("key")?;
        let value = args
            .get("value")
            .cloned()
            .unwrap_or(Value::Null);
        dict.lock().unwrap().insert(key.to_string(), value);
        Ok(None)
    });

    registry.register("dictionary", "remove", |args| {
        let dict = args.get_object::<SharedDictionary>("dictionary")?;
        let key = args.get_str("key")?;
        dict.lock().unwrap().remove(key);
        Ok(None)
    });

    registry.register("dictionary", "contains", |args| {
        let dict = args.get_object::<SharedDictionary>("dictionary")?;
        let key = args.get_str("key")?;
        let present = dict.lock().unwrap().contains_key(key);
        Ok(Some(Value::Bool(present)))
    });

    registry.register("dictionary", "count", |args| {
        let dict = args.get_object::<SharedDictionary>("dictionary")?;
        let count = dict.lock().unwrap().len();
        Ok(Some(Value::Int(count as i32)))
    });

    // Snapshot copy; later mutations of the live object do not affect it
    registry.register("dictionary", "toMap", |args| {
        let dict = args.get_object::<SharedDictionary>("dictionary")?;
        let snapshot = dict.lock().unwrap().clone();
        Ok(Some(Value::Map(snapshot)))
    });
}
