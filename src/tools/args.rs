//! Argument declarations and validation.
//!
//! A tool declares its arguments once as a `&[FieldSpec]` table. The same table
//! renders the JSON Schema published by `tools/list` and drives
//! [`validate`], so the advertised schema and the enforced one cannot drift.
//! Rules that span several fields live in the per-tool parsers.

use chrono::NaiveDate;
use serde_json::{json, Map, Value as JsonValue};

use crate::error::{McpError, Result};

/// Shape of a single argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Non-blank string
    String,
    /// Non-negative integer
    Integer,
    /// Calendar date, `YYYY-MM-DD`
    Date,
    /// Hex colour, `#RRGGBB` or `#RGB`
    Color,
    /// One of a fixed set of strings
    Enum(&'static [&'static str]),
    /// Array of non-negative integers
    IntegerArray,
    /// Array of non-blank strings
    StringArray,
}

/// Declaration of one tool argument.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Argument name
    pub name: &'static str,
    /// Expected shape
    pub ty: FieldType,
    /// Whether the argument must be present
    pub required: bool,
    /// Description shown to the agent
    pub description: &'static str,
}

impl FieldSpec {
    /// A required argument.
    pub const fn required(name: &'static str, ty: FieldType, description: &'static str) -> Self {
        Self {
            name,
            ty,
            required: true,
            description,
        }
    }

    /// An optional argument.
    pub const fn optional(name: &'static str, ty: FieldType, description: &'static str) -> Self {
        Self {
            name,
            ty,
            required: false,
            description,
        }
    }

    fn schema(&self) -> JsonValue {
        let mut schema = match self.ty {
            FieldType::String => json!({ "type": "string" }),
            FieldType::Integer => json!({ "type": "integer", "minimum": 0 }),
            FieldType::Date => json!({ "type": "string", "format": "date" }),
            FieldType::Color => json!({
                "type": "string",
                "pattern": "^#([0-9a-fA-F]{6}|[0-9a-fA-F]{3})$"
            }),
            FieldType::Enum(values) => json!({ "type": "string", "enum": values }),
            FieldType::IntegerArray => json!({
                "type": "array",
                "items": { "type": "integer", "minimum": 0 }
            }),
            FieldType::StringArray => json!({
                "type": "array",
                "items": { "type": "string" }
            }),
        };
        if let Some(obj) = schema.as_object_mut() {
            obj.insert("description".to_string(), json!(self.description));
        }
        schema
    }

    fn check(&self, value: &JsonValue) -> Result<()> {
        let name = self.name;
        match self.ty {
            FieldType::String => {
                check_string(name, value)?;
            }
            FieldType::Integer => {
                value
                    .as_u64()
                    .ok_or_else(|| McpError::invalid(name, "expected a non-negative integer"))?;
            }
            FieldType::Date => {
                parse_date(name, check_string(name, value)?)?;
            }
            FieldType::Color => {
                let color = check_string(name, value)?;
                if !is_hex_color(color) {
                    return Err(McpError::invalid(
                        name,
                        format!("'{}' is not a hex colour (#RRGGBB or #RGB)", color),
                    ));
                }
            }
            FieldType::Enum(values) => {
                let s = value
                    .as_str()
                    .ok_or_else(|| McpError::invalid(name, "expected a string"))?;
                if !values.contains(&s) {
                    return Err(McpError::invalid(
                        name,
                        format!("'{}' is not one of: {}", s, values.join(", ")),
                    ));
                }
            }
            FieldType::IntegerArray => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| McpError::invalid(name, "expected an array of integers"))?;
                if arr.iter().any(|v| v.as_u64().is_none()) {
                    return Err(McpError::invalid(name, "expected an array of non-negative integers"));
                }
            }
            FieldType::StringArray => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| McpError::invalid(name, "expected an array of strings"))?;
                for item in arr {
                    check_string(name, item)?;
                }
            }
        }
        Ok(())
    }
}

/// Render the JSON Schema for an argument table.
pub fn object_schema(fields: &[FieldSpec]) -> JsonValue {
    let mut props = Map::new();
    for field in fields {
        props.insert(field.name.to_string(), field.schema());
    }
    let required: Vec<&str> = fields.iter().filter(|f| f.required).map(|f| f.name).collect();

    json!({
        "type": "object",
        "properties": props,
        "required": required,
        "additionalProperties": false
    })
}

/// Check an argument bag against its table.
///
/// Unknown arguments are rejected. `null` counts as absent.
pub fn validate<'a>(fields: &[FieldSpec], args: &'a Map<String, JsonValue>) -> Result<Args<'a>> {
    if let Some(unknown) = args
        .keys()
        .find(|key| !fields.iter().any(|f| f.name == key.as_str()))
    {
        let expected: Vec<&str> = fields.iter().map(|f| f.name).collect();
        let reason = if expected.is_empty() {
            "this tool takes no arguments".to_string()
        } else {
            format!("unknown argument, expected one of: {}", expected.join(", "))
        };
        return Err(McpError::invalid(unknown, reason));
    }

    for field in fields {
        match args.get(field.name) {
            None | Some(JsonValue::Null) if field.required => {
                return Err(McpError::MissingArg(field.name.to_string()))
            }
            None | Some(JsonValue::Null) => {}
            Some(value) => field.check(value)?,
        }
    }
    Ok(Args { args })
}

/// A validated argument bag.
///
/// Accessors assume [`validate`] already checked types; they return `None`
/// for absent arguments.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    args: &'a Map<String, JsonValue>,
}

impl<'a> Args<'a> {
    fn get(&self, name: &str) -> Option<&'a JsonValue> {
        self.args.get(name).filter(|v| !v.is_null())
    }

    /// Whether an argument is present.
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Optional trimmed string.
    pub fn string(&self, name: &str) -> Option<String> {
        self.get(name)
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
    }

    /// Required trimmed string.
    pub fn required_string(&self, name: &str) -> Result<String> {
        self.string(name)
            .ok_or_else(|| McpError::MissingArg(name.to_string()))
    }

    /// Optional integer.
    pub fn u64(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(|v| v.as_u64())
    }

    /// Optional date.
    pub fn date(&self, name: &str) -> Result<Option<NaiveDate>> {
        match self.get(name).and_then(|v| v.as_str()) {
            Some(s) => parse_date(name, s).map(Some),
            None => Ok(None),
        }
    }

    /// Integer array, empty when absent.
    pub fn u64_list(&self, name: &str) -> Vec<u64> {
        self.get(name)
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().filter_map(|v| v.as_u64()).collect())
            .unwrap_or_default()
    }

    /// String array (trimmed), empty when absent.
    pub fn string_list(&self, name: &str) -> Vec<String> {
        self.get(name)
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str())
                    .map(|s| s.trim().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn check_string<'v>(name: &str, value: &'v JsonValue) -> Result<&'v str> {
    let s = value
        .as_str()
        .ok_or_else(|| McpError::invalid(name, "expected a string"))?;
    if s.trim().is_empty() {
        return Err(McpError::invalid(name, "must not be blank"));
    }
    Ok(s)
}

fn parse_date(name: &str, s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| McpError::invalid(name, format!("'{}' is not a date (YYYY-MM-DD)", s)))
}

fn is_hex_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => (hex.len() == 6 || hex.len() == 3) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}
