//! Product fields from an embedded `application/ld+json` block.

use serde_json::Value;

/// The subset of a schema.org `Product` node the record needs.
#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct ProductData {
    pub name: Option<String>,
    pub price: Option<String>,
    pub gtin13: Option<String>,
    pub description: Option<String>,
}

/// Parses a raw JSON-LD script body.
///
/// Literal line breaks are removed before parsing: shop templates emit
/// descriptions with unescaped newlines, which strict JSON rejects. Escaped
/// `\n` sequences survive and decode to real newlines.
pub(super) fn parse_product(raw: &str) -> Result<ProductData, serde_json::Error> {
    let cleaned: String = raw.chars().filter(|c| *c != '\n').collect();
    let value: Value = serde_json::from_str(&cleaned)?;
    let node = product_node(&value);

    let offer = node.and_then(|n| n.get("offers")).and_then(first_offer);

    Ok(ProductData {
        name: node.and_then(|n| n.get("name")).and_then(scalar_text),
        price: offer.and_then(|o| o.get("price")).and_then(scalar_text),
        gtin13: offer.and_then(|o| o.get("gtin13")).and_then(scalar_text),
        description: node.and_then(|n| n.get("description")).and_then(scalar_text),
    })
}

/// The node to read from: the object itself, or for a top-level array (or an
/// `@graph`) the first `Product` node, falling back to the first object.
fn product_node(value: &Value) -> Option<&Value> {
    let items = match value {
        Value::Object(map) => match map.get("@graph") {
            Some(Value::Array(items)) if !is_product(value) => items,
            _ => return Some(value),
        },
        Value::Array(items) => items,
        _ => return None,
    };

    items
        .iter()
        .find(|item| is_product(item))
        .or_else(|| items.iter().find(|item| item.is_object()))
}

fn is_product(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => t == "Product",
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some("Product")),
        _ => false,
    }
}

/// `offers` is usually an array of `Offer`s but a single object is valid too.
fn first_offer(offers: &Value) -> Option<&Value> {
    match offers {
        Value::Array(items) => items.first(),
        Value::Object(_) => Some(offers),
        _ => None,
    }
}

/// Strings as-is, numbers and booleans as their JSON text.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
