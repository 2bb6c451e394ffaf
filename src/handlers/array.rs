//! `array` namespace - handle-addressed mutable list

use std::sync::Mutex;

use anyhow::bail;

use crate::registry::HandlerRegistry;
use crate::value::Value;

/// The live object behind an array handle.
pub type SharedArray = Mutex<Vec<Value>>;

fn checked_index(index: i32, len: usize) -> anyhow::Result<usize> {
    if index < 0 || index as usize >= len {
        bail!("index {} out of bounds (length {})", index, len);
    }
    Ok(index as usize)
}

pub fn register(registry: &mut HandlerRegistry) {
    registry.register("array", "create", |args| {
        let seed = match args.get("array") {
            Some(Value::List(items)) => items.clone(),
            _ => Vec::new(),
        };
        Ok(Some(Value::object::<SharedArray>(Mutex::new(seed))))
    });

    registry.register("array", "length", |args| {
        let array = args.get_object::<SharedArray>("array")?;
        let len = array.lock().unwrap().len();
        Ok(Some(Value::Int(len as i32)))
    });

    registry.register("array", "getItem", |args| {
        let array = args.get_object::<SharedArray>("array")?;
        let index = args.get_i32("index")?;
        let items = array.lock().unwrap();
        let index = checked_index(index, items.len())?;
        Ok(Some(items[index].clone()))
    });

    registry.register("array", "addItem", |args| {
        let array = args.get_object::<SharedArray>("array")?;
        let item = args.get("item").cloned().unwrap_or(Value::Null);
        array.lock().unwrap().push(item);
        Ok(None)
    });

    registry.register("array", "setItem", |args| {
        let array = args.get_object::<SharedArray>("array")?;
        let index = args.get_i32("index")?;
        let item = args.get("item").cloned().unwrap_or(Value::Null);
        let mut items = array.lock().unwrap();
        let index = checked_index(index, items.len())?;
        items[index] = item;
        Ok(None)
    });

    registry.register("array", "removeItem", |args| {
        let array = args.get_object::<SharedArray>("array")?;
        let index = args.get_i32("index")?;
        let mut items = array.lock().unwrap();
        let index = checked_index(index, items.len())?;
        items.remove(index);
        Ok(None)
    });

    // Snapshot copy
    registry.register("array", "toList", |args| {
        let array = args.get_object::<SharedArray>("array")?;
        let snapshot = array.lock().unwrap().clone();
        Ok(Some(Value::List(snapshot)))
    });
}
