use serde_json::{Map, Value};

use crate::data_formats::PagedResponse;
use crate::errors::ValidationError;
use crate::models::{Article, ArticleStatus};

// ----------------- Inbound Validation -----------------

/// Checks a raw server object against the article schema. Unknown keys are
/// ignored; anything missing or mistyped fails the whole article.
pub fn validate_article(raw: &Value) -> Result<Article, ValidationError> {
    let object = as_object(raw)?;
    let id = integer_field(object, "id")?;
    let title = string_field(object, "title")?;
    let content = string_field(object, "content")?;
    let category = string_field(object, "category")?;
    let status = string_field(object, "status")?
        .parse::<ArticleStatus>()
        .map_err(|error| ValidationError::new("status", error.to_string()))?;
    let created_date = nullable_string_field(object, "created_date")?;
    let updated_date = nullable_string_field(object, "updated_date")?;

    Ok(Article {
        id,
        title,
        content,
        category,
        status,
        created_date,
        updated_date,
    })
}

/// Checks the paged envelope, then every item with `validate_item`. A single
/// bad item fails the whole page.
pub fn validate_paged_response<T, F>(
    raw: &Value,
    validate_item: F,
) -> Result<PagedResponse<T>, ValidationError>
where
    F: Fn(&Value) -> Result<T, ValidationError>,
{
    let object = as_object(raw)?;
    let raw_items = match object.get("items") {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(ValidationError::new("items", "expected an array")),
        None => return Err(ValidationError::new("items", "required")),
    };
    let offset = count_field(object, "offset")?;
    let limit = count_field(object, "limit")?;
    let total_count = count_field(object, "total_count")?;

    let items = raw_items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            validate_item(item).map_err(|error| error.nested(&format!("items[{}]", index)))
        })
        .collect::<Result<Vec<T>, ValidationError>>()?;

    Ok(PagedResponse {
        items,
        offset,
        limit,
        total_count,
    })
}

// ----------------- Helper Functions -----------------

fn as_object(raw: &Value) -> Result<&Map<String, Value>, ValidationError> {
    raw.as_object()
        .ok_or_else(|| ValidationError::new("", format!("expected an object, got {}", kind(raw))))
}

fn required<'a>(object: &'a Map<String, Value>, field: &str) -> Result<&'a Value, ValidationError> {
    object
        .get(field)
        .ok_or_else(|| ValidationError::new(field, "required"))
}

fn string_field(object: &Map<String, Value>, field: &str) -> Result<String, ValidationError> {
    match required(object, field)? {
        Value::String(value) => Ok(value.clone()),
        other => Err(mistyped(field, "a string", other)),
    }
}

fn integer_field(object: &Map<String, Value>, field: &str) -> Result<i64, ValidationError> {
    let value = required(object, field)?;
    value
        .as_i64()
        .ok_or_else(|| mistyped(field, "an integer", value))
}

fn count_field(object: &Map<String, Value>, field: &str) -> Result<u64, ValidationError> {
    let value = required(object, field)?;
    value
        .as_u64()
        .ok_or_else(|| mistyped(field, "a non-negative integer", value))
}

fn nullable_string_field(
    object: &Map<String, Value>,
    field: &str,
) -> Result<Option<String>, ValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(other) => Err(mistyped(field, "a string or null", other)),
    }
}

fn mistyped(field: &str, expected: &str, got: &Value) -> ValidationError {
    ValidationError::new(field, format!("expected {}, got {}", expected, kind(got)))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
