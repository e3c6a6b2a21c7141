use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use sqlx::FromRow;
use uuid::Uuid;

/// Checkout form submission. Every field is optional and unknown fields
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default, deserialize_with = "text_field")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub country: Option<String>,
    #[serde(default, alias = "address1", deserialize_with = "text_field")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub number: Option<String>,
    #[serde(default, alias = "address2", deserialize_with = "text_field")]
    pub complement: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub state: Option<String>,
    #[serde(default, alias = "postalCode", alias = "cep", deserialize_with = "text_field")]
    pub zip: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub notes: Option<String>,
    /// Only the literal JSON `true` counts.
    #[serde(default, deserialize_with = "strict_true")]
    pub ship_different: bool,
}

impl CheckoutRequest {
    /// Parse a request body. An empty body is an empty submission; anything
    /// other than a JSON object is rejected.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        match serde_json::from_slice::<Value>(bytes)? {
            value @ Value::Object(_) => serde_json::from_value(value),
            other => Err(serde::de::Error::custom(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Falsy values (`""`, `0`, `false`, null) become `None`; numbers and `true`
/// are kept as their text form. Strings are stored untouched.
fn text_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => Some(number_text(&n)),
        Some(Value::Bool(true)) => Some("true".to_string()),
        _ => None,
    })
}

/// Integral floats lose their fractional part, so `1e2` is stored as `100`.
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => f.to_string(),
        _ => n.to_string(),
    }
}

fn strict_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

/// A persisted order intake row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderIntake {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub ship_different: bool,
    pub created_at: DateTime<Utc>,
}

/// Store-generated identity of a freshly inserted row.
#[derive(Debug, Clone, FromRow)]
pub struct OrderIntakeReceipt {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Response for POST /api/checkout
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub success: bool,
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<OrderIntakeReceipt> for CheckoutResponse {
    fn from(receipt: OrderIntakeReceipt) -> Self {
        Self {
            success: true,
            id: receipt.id,
            created_at: receipt.created_at,
        }
    }
}
