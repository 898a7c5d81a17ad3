//! Declarative validator chain.
//!
//! Each resource describes its checks as a `&[Rule]`. [`run_rules`] walks the
//! list in order and stops at the first rule that rejects the payload, so a
//! request never carries more than one validation error.
//!
//! Field checks follow the loose semantics the public API has always had:
//! a missing field, `null`, `false`, `0`, `NaN` and `""` all count as
//! "missing", and numeric comparisons coerce strings and booleans.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ApiError;

/// The caller-supplied `data` object of a create/update request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Anything that is not a JSON object is an empty payload.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// String rendering of a truthy scalar field.
    pub fn text(&self, field: &str) -> Option<String> {
        self.get(field).filter(|v| truthy(v)).and_then(scalar_text)
    }

    pub fn integer(&self, field: &str) -> Option<u64> {
        self.get(field).and_then(as_integer)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Numeric coercion used by `>`/`<=` comparisons. `None` stands for NaN,
/// which makes every comparison false.
pub fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok().filter(|f| !f.is_nan())
            }
        }
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Only JSON numbers qualify; `5.0` is an integer, `"5"` is not.
pub fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
        }
        _ => false,
    }
}

pub fn as_integer(value: &Value) -> Option<u64> {
    if !is_integer(value) {
        return None;
    }
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && *f < u64::MAX as f64)
                .map(|f| f as u64)
        }),
        _ => None,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn positive(value: Option<&Value>) -> bool {
    value.and_then(to_number).is_some_and(|n| n > 0.0)
}

/// Fails only on absence or a value comparing `<= 0`. Values that do not
/// coerce to a number pass here and are left to the integer check.
fn not_non_positive(value: Option<&Value>) -> bool {
    value.is_some_and(|v| !to_number(v).is_some_and(|n| n <= 0.0))
}

/// What a single rule asserts about its field.
#[derive(Debug, Clone, Copy)]
pub enum Check {
    Truthy,
    Positive,
    Integer,
    Array,
    NonEmpty,
    /// No element's sub-field is absent or `<= 0`. Message may use `{index}`.
    EachPositive(&'static str),
    /// Every element's sub-field is an integer. Message may use `{index}`.
    EachInteger(&'static str),
    /// Truthy and one of the listed values.
    OneOf(&'static [&'static str]),
    /// A truthy field must equal the route id. Message may use `{id}` and `{route}`.
    MatchesRoute,
}

/// One predicate + message pair.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub field: &'static str,
    pub check: Check,
    pub message: &'static str,
}

impl Rule {
    pub const fn new(field: &'static str, check: Check, message: &'static str) -> Self {
        Self { field, check, message }
    }

    pub const fn truthy(field: &'static str, message: &'static str) -> Self {
        Self::new(field, Check::Truthy, message)
    }

    /// Returns the rendered rejection message, or `None` when the rule passes.
    pub fn evaluate(&self, payload: &Payload, ctx: &RuleContext) -> Option<String> {
        let value = payload.get(self.field);
        let passed = match self.check {
            Check::Truthy => value.is_some_and(truthy),
            Check::Positive => positive(value),
            Check::Integer => value.is_some_and(is_integer),
            Check::Array => value.is_some_and(Value::is_array),
            Check::NonEmpty => value
                .and_then(Value::as_array)
                .is_some_and(|items| !items.is_empty()),
            Check::EachPositive(sub) => {
                return first_offender(value, |item| not_non_positive(item.get(sub)))
                    .map(|index| self.message.replace("{index}", &index.to_string()));
            }
            Check::EachInteger(sub) => {
                return first_offender(value, |item| item.get(sub).is_some_and(is_integer))
                    .map(|index| self.message.replace("{index}", &index.to_string()));
            }
            Check::OneOf(allowed) => value
                .filter(|v| truthy(v))
                .and_then(Value::as_str)
                .is_some_and(|s| allowed.iter().any(|a| *a == s)),
            Check::MatchesRoute => match (value.filter(|v| truthy(v)), ctx.route_id) {
                (Some(id), Some(route)) if !id_matches(id, route) => {
                    let shown = scalar_text(id).unwrap_or_else(|| id.to_string());
                    return Some(
                        self.message
                            .replace("{id}", &shown)
                            .replace("{route}", &route.to_string()),
                    );
                }
                _ => true,
            },
        };
        (!passed).then(|| self.message.to_string())
    }
}

/// Index of the first element failing `ok`. Later elements are not inspected.
fn first_offender(value: Option<&Value>, ok: impl Fn(&Value) -> bool) -> Option<usize> {
    value
        .and_then(Value::as_array)?
        .iter()
        .position(|item| !ok(item))
}

fn id_matches(id: &Value, route: u64) -> bool {
    match id {
        Value::Number(_) => as_integer(id) == Some(route),
        Value::String(s) => s.trim() == route.to_string(),
        _ => false,
    }
}

/// Per-request facts rules may consult besides the payload.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext {
    pub resource: &'static str,
    pub route_id: Option<u64>,
}

impl RuleContext {
    pub fn create(resource: &'static str) -> Self {
        Self {
            resource,
            route_id: None,
        }
    }

    pub fn update(resource: &'static str, route_id: u64) -> Self {
        Self {
            resource,
            route_id: Some(route_id),
        }
    }
}

/// Runs `rules` in order; the first rejection wins and nothing after it runs.
pub fn run_rules(rules: &[Rule], payload: &Payload, ctx: &RuleContext) -> Result<(), ApiError> {
    for rule in rules {
        if let Some(message) = rule.evaluate(payload, ctx) {
            debug!(
                resource = ctx.resource,
                field = rule.field,
                check = ?rule.check,
                %message,
                "Payload rejected"
            );
            return Err(ApiError::Validation(message));
        }
    }
    Ok(())
}
