use askama::Template;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use super::{Payload, SubmissionError};

pub const TITLE: &str = "Nova Submissão de Formulário";

static UPPERCASE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([A-Z])").unwrap());

struct Row {
    label: String,
    value: String,
    preformatted: bool,
}

#[derive(Template)]
#[template(path = "email/submission.html")]
struct SubmissionEmail<'a> {
    title: &'a str,
    brand: &'a str,
    rows: Vec<Row>,
}

/// Render the payload as the HTML email body. Values are escaped.
pub fn render(payload: &Payload, brand: &str) -> Result<String, SubmissionError> {
    let rows = payload
        .iter()
        .filter_map(|(key, value)| row(key, value))
        .collect();

    SubmissionEmail {
        title: TITLE,
        brand,
        rows,
    }
    .render()
    .map_err(|e| SubmissionError::from(format!("Failed to render email: {e}")))
}

/// `selectedServices` -> `Selected Services`.
pub fn label(key: &str) -> String {
    let spaced = UPPERCASE_RE.replace_all(key, " $1");
    let spaced = spaced.trim_start();

    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn row(key: &str, value: &Value) -> Option<Row> {
    let (value, preformatted) = match value {
        Value::Null => return None,
        Value::String(s) if s.is_empty() => return None,
        Value::String(s) => (s.clone(), false),
        Value::Bool(b) => (if *b { "Sim" } else { "Não" }.to_string(), false),
        Value::Number(n) => (n.to_string(), false),
        Value::Array(items) => (
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
            false,
        ),
        Value::Object(_) => (
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
            true,
        ),
    };

    Some(Row {
        label: label(key),
        value,
        preformatted,
    })
}
