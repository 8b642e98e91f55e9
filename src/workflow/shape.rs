use serde_json::Value;

/// A key counts as supplied when it is present, not null, and not a blank string.
pub fn is_present(body: &Value, key: &str) -> bool {
    match body.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

/// Check every required key, returning the error message on failure.
///
/// The message lists all required keys, not only the missing ones, so a
/// caller can fix the request in one round trip.
pub fn validate_required(body: &Value, required: &[&str]) -> Result<(), String> {
    if required.iter().all(|key| is_present(body, key)) {
        return Ok(());
    }
    Err(missing_fields_message(required))
}

pub fn missing_fields_message(required: &[&str]) -> String {
    match required {
        [single] => format!("Missing required field: {}", single),
        _ => format!("Missing required fields: {}", join_fields(required)),
    }
}

/// "a", "a and b", "a, b, and c"
fn join_fields(fields: &[&str]) -> String {
    match fields {
        [] => String::new(),
        [one] => one.to_string(),
        [a, b] => format!("{} and {}", a, b),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
    }
}
