use serde_json::{Map, Value};
use time::OffsetDateTime;

use super::repo::{NewShip, ShipPatch};
use crate::validation::{
    is_valid_email, parse_timestamp, FieldErrors, INVALID_INPUT, MISSING, NOT_DATETIME,
    NOT_EMAIL, NOT_NULL, NOT_STRING, UNKNOWN_FIELD,
};

const FIELDS: [&str; 3] = ["name", "email", "arrived_at"];

/// Validates a create body. Every field rule applies and `name` is required.
pub fn parse_new_ship(body: &Value) -> Result<NewShip, FieldErrors> {
    let patch = parse_fields(body, false)?;
    Ok(NewShip {
        // required in full mode, so present once validation passed
        name: patch.name.unwrap_or_default(),
        email: patch.email.flatten(),
        arrived_at: patch.arrived_at.flatten(),
    })
}

/// Validates an update body. Fields are optional but checked when present.
pub fn parse_ship_patch(body: &Value) -> Result<ShipPatch, FieldErrors> {
    parse_fields(body, true)
}

fn parse_fields(body: &Value, partial: bool) -> Result<ShipPatch, FieldErrors> {
    let mut errors = FieldErrors::new();
    let Some(obj) = body.as_object() else {
        errors.add("_schema", INVALID_INPUT);
        return Err(errors);
    };

    for key in obj.keys().filter(|k| !FIELDS.contains(&k.as_str())) {
        errors.add(key, UNKNOWN_FIELD);
    }

    let patch = ShipPatch {
        name: parse_name(obj, partial, &mut errors),
        email: parse_email(obj, &mut errors),
        arrived_at: parse_arrived_at(obj, &mut errors),
    };
    errors.into_result(patch)
}

fn parse_name(obj: &Map<String, Value>, partial: bool, errors: &mut FieldErrors) -> Option<String> {
    match obj.get("name") {
        None => {
            if !partial {
                errors.add("name", MISSING);
            }
            None
        }
        Some(Value::Null) => {
            errors.add("name", NOT_NULL);
            None
        }
        Some(Value::String(s)) if s.is_empty() => {
            errors.add("name", "Shorter than minimum length 1.");
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.add("name", NOT_STRING);
            None
        }
    }
}

fn parse_email(obj: &Map<String, Value>, errors: &mut FieldErrors) -> Option<Option<String>> {
    match obj.get("email")? {
        Value::Null => Some(None),
        Value::String(s) if is_valid_email(s) => Some(Some(s.clone())),
        Value::String(_) => {
            errors.add("email", NOT_EMAIL);
            None
        }
        _ => {
            errors.add("email", NOT_STRING);
            None
        }
    }
}

fn parse_arrived_at(
    obj: &Map<String, Value>,
    errors: &mut FieldErrors,
) -> Option<Option<OffsetDateTime>> {
    match obj.get("arrived_at")? {
        Value::Null => Some(None),
        Value::String(s) => match parse_timestamp(s) {
            Some(ts) => Some(Some(ts)),
            None => {
                errors.add("arrived_at", NOT_DATETIME);
                None
            }
        },
        _ => {
            errors.add("arrived_at", NOT_DATETIME);
            None
        }
    }
}
