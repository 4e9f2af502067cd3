//! Bouquet request and result types.
//!
//! The inbound payload comes from a browser form, so every field is taken as
//! loose JSON and coerced here: text fields accept strings, numbers and
//! `true`; the budget accepts numbers and numeric strings. Anything falsy
//! (`null`, `""`, `0`, `false`) counts as not provided.

use crate::error::GenerateError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Minimum budget, in euros, used for every generated bouquet.
pub const BUDGET_FLOOR: f64 = 35.0;

/// Raw `POST /api/generate` payload, before validation.
#[derive(Debug, Default, Deserialize)]
pub struct GenerationRequest {
    #[serde(default)]
    pub occasion: Option<Value>,
    #[serde(default)]
    pub palette: Option<Value>,
    #[serde(default)]
    pub style: Option<Value>,
    #[serde(default)]
    pub budget: Option<Value>,
    #[serde(default)]
    pub size: Option<Value>,
}

impl GenerationRequest {
    /// Parse a request body. Empty, malformed or non-object bodies yield an
    /// empty request, which then fails validation like any missing field.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// Check the required fields and normalize the rest.
    ///
    /// `style` must be present and non-empty; `budget` must be present and
    /// not `null`, although its value may still fall back to the floor.
    pub fn validate(&self) -> Result<BouquetSpec, GenerateError> {
        let style = self.style.as_ref().and_then(text_of);
        let (Some(style), Some(budget)) = (style, self.budget.as_ref()) else {
            return Err(GenerateError::MissingFields);
        };

        Ok(BouquetSpec {
            style,
            occasion: self.occasion.as_ref().and_then(text_of),
            palette: self.palette.as_ref().and_then(text_of),
            size: self.size.as_ref().and_then(text_of),
            budget: Budget::from_value(budget),
        })
    }
}

/// A validated bouquet request.
#[derive(Debug, Clone, PartialEq)]
pub struct BouquetSpec {
    pub style: String,
    pub occasion: Option<String>,
    pub palette: Option<String>,
    pub size: Option<String>,
    pub budget: Budget,
}

impl BouquetSpec {
    pub fn style_lowercase(&self) -> String {
        self.style.to_lowercase()
    }
}

/// Budget in euros, never below [`BUDGET_FLOOR`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Budget(f64);

impl Budget {
    pub fn new(amount: f64) -> Self {
        if amount.is_finite() {
            Budget(amount.max(BUDGET_FLOOR))
        } else {
            Budget(BUDGET_FLOOR)
        }
    }

    pub fn from_value(value: &Value) -> Self {
        Self::new(number_of(value).unwrap_or(BUDGET_FLOOR))
    }

    pub fn amount(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // f64's Display drops the fraction for whole numbers: 40.0 -> "40".
        write!(f, "{}", self.0)
    }
}

/// Successful generation payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationResult {
    pub text: String,
    pub image_base64: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => {
            if n.as_f64() == Some(0.0) {
                None
            } else if n.is_f64() {
                n.as_f64().map(|v| v.to_string())
            } else {
                Some(n.to_string())
            }
        }
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

fn number_of(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Value::Bool(true) => Some(1.0),
        _ => None,
    };

    number.filter(|v| v.is_finite() && *v != 0.0)
}
