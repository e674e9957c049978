//! Server validation-error normalization.
//!
//! Recognised payloads have an `errors` member holding either a map of
//! field name to one-or-more messages, or a flat list of messages. They are
//! reshaped into [`ValidationErrors`]. Anything else is handed back
//! untouched so UI code can fall back to generic messaging.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field key used for messages that are not attached to a field.
pub const GENERAL_FIELD: &str = "general";

/// Canonical field → messages mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Returns the field → messages mapping.
    #[must_use]
    pub const fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    /// Messages for a single field.
    #[must_use]
    pub fn field(&self, name: &str) -> &[String] {
        self.fields.get(name).map_or(&[], Vec::as_slice)
    }

    /// Flattens into display lines: `"<field> <message>"`, or the bare
    /// message for [`GENERAL_FIELD`].
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.fields
            .iter()
            .flat_map(|(field, messages)| {
                messages.iter().map(move |message| {
                    if field == GENERAL_FIELD {
                        message.clone()
                    } else {
                        format!("{field} {message}")
                    }
                })
            })
            .collect()
    }

    /// Returns true if there are no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Outcome of [`normalize`].
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// The payload matched the expected shape.
    Validation(ValidationErrors),
    /// The payload was not recognised and is returned as given.
    Passthrough(Value),
}

impl Normalized {
    /// The validation errors, if the payload was recognised.
    #[must_use]
    pub const fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Passthrough(_) => None,
        }
    }
}

/// Reshapes a server error payload into canonical validation errors.
///
/// Never fails: a mismatched shape yields [`Normalized::Passthrough`]
/// carrying the original value.
#[must_use]
pub fn normalize(payload: Value) -> Normalized {
    match extract(&payload) {
        Some(fields) => Normalized::Validation(ValidationErrors { fields }),
        None => Normalized::Passthrough(payload),
    }
}

fn extract(payload: &Value) -> Option<BTreeMap<String, Vec<String>>> {
    let errors = payload.as_object()?.get("errors")?;
    match errors {
        Value::Object(map) if !map.is_empty() => map
            .iter()
            .map(|(field, messages)| Some((field.clone(), messages_of(messages)?)))
            .collect(),
        Value::Array(items) if !items.is_empty() => {
            let messages = strings(items)?;
            Some(BTreeMap::from([(GENERAL_FIELD.to_string(), messages)]))
        }
        _ => None,
    }
}

fn messages_of(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(message) => Some(vec![message.clone()]),
        Value::Array(items) if !items.is_empty() => strings(items),
        _ => None,
    }
}

fn strings(items: &[Value]) -> Option<Vec<String>> {
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn field_map_maps_one_to_one() {
        let payload = json!({
            "errors": {
                "email": ["has already been taken"],
                "password": ["is too short", "must contain a digit"]
            }
        });
        let Normalized::Validation(errors) = normalize(payload) else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.field("email"), ["has already been taken"]);
        assert_eq!(errors.field("password").len(), 2);
        assert_eq!(errors.fields().len(), 2);
    }

    #[test]
    fn single_string_message_is_accepted() {
        let payload = json!({ "errors": { "body": "can't be blank" } });
        let errors = normalize(payload);
        assert_eq!(
            errors.validation().unwrap().messages(),
            vec!["body can't be blank".to_string()]
        );
    }

    #[test]
    fn flat_list_goes_under_general() {
        let payload = json!({ "errors": ["email or password is invalid"] });
        let errors = normalize(payload);
        let errors = errors.validation().unwrap();
        assert_eq!(errors.field(GENERAL_FIELD), ["email or password is invalid"]);
        assert_eq!(errors.messages(), vec!["email or password is invalid".to_string()]);
    }

    #[test]
    fn unrelated_shapes_pass_through_unchanged() {
        let cases = [
            json!({ "detail": "Not authenticated" }),
            json!({ "errors": { "email": 42 } }),
            json!({ "errors": [] }),
            json!({ "errors": {} }),
            json!({ "errors": ["ok", 1] }),
            json!("Internal Server Error"),
            Value::Null,
        ];
        for payload in cases {
            assert_eq!(normalize(payload.clone()), Normalized::Passthrough(payload));
        }
    }
}
