use serde_json::Value;

/// A filled honeypot field means a bot posted the form.
pub fn is_spam(data: &Value, honeypot_field: Option<&str>) -> bool {
    let Some(field) = honeypot_field.filter(|f| !f.is_empty()) else {
        return false;
    };

    match data.get(field) {
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Null) | None => false,
        Some(_) => true,
    }
}
