use crate::domain::model::{Category, StockItem, StockSnapshot};
use crate::utils::error::{Result, StockError};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

const IMAGE_DATA_KEY: &str = "imageData";

/// Validates the upstream document into a typed snapshot.
///
/// Only the top-level shape is fatal. Non-array categories count as missing,
/// unusable items and image entries are skipped.
pub fn parse_snapshot(document: Value) -> Result<StockSnapshot> {
    let mut root = match document {
        Value::Object(root) => root,
        other => {
            return Err(StockError::MalformedPayload {
                message: format!("expected a JSON object, got {}", type_name(&other)),
            })
        }
    };

    let mut categories = BTreeMap::new();
    for category in Category::ALL {
        match root.remove(category.key()) {
            Some(Value::Array(raw_items)) => {
                let items = raw_items
                    .into_iter()
                    .enumerate()
                    .filter_map(|(index, raw)| parse_item(category, index, raw))
                    .collect();
                categories.insert(category, items);
            }
            Some(Value::Null) | None => {}
            Some(other) => {
                tracing::warn!(
                    "Ignoring {}: expected an array, got {}",
                    category.key(),
                    type_name(&other)
                );
            }
        }
    }

    let image_data = match root.remove(IMAGE_DATA_KEY) {
        Some(Value::Object(table)) => parse_image_data(table),
        _ => HashMap::new(),
    };

    Ok(StockSnapshot {
        categories,
        image_data,
    })
}

fn parse_item(category: Category, index: usize, raw: Value) -> Option<StockItem> {
    let Value::Object(mut fields) = raw else {
        tracing::warn!("Skipping {}[{}]: not an object", category.key(), index);
        return None;
    };

    let name = match fields.remove("name") {
        Some(Value::String(name)) => name,
        _ => {
            tracing::warn!("Skipping {}[{}]: missing string name", category.key(), index);
            return None;
        }
    };

    let value = match fields.remove("value") {
        Some(Value::Number(n)) => Some(n),
        _ => None,
    };

    let image = match fields.remove("image") {
        Some(Value::String(url)) if !url.is_empty() => Some(url),
        _ => None,
    };

    Some(StockItem { name, value, image })
}

fn parse_image_data(table: Map<String, Value>) -> HashMap<String, String> {
    table
        .into_iter()
        .filter_map(|(name, url)| match url {
            Value::String(url) if !url.is_empty() => Some((name, url)),
            _ => None,
        })
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
