pub mod budget;
pub mod contact;

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use validator::{ValidationError, ValidationErrors};

use crate::relay::Payload;

/// Which intake form a submission came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Contact,
    Budget,
}

impl FormKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormKind::Contact => "contato",
            FormKind::Budget => "orcamento",
        }
    }
}

/// A submission that passed validation and can be handed to the mail relay.
pub trait Lead {
    fn subject(&self) -> String;
    fn payload(&self) -> Payload;
}

/// Raw form data as decoded from the request body.
pub trait LeadForm: DeserializeOwned + Send + 'static {
    type Valid: Lead + Send;

    const KIND: FormKind;

    fn validated(&self) -> Result<Self::Valid, ValidationErrors>;
}

pub(crate) fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Run the derived rules and return whatever they reported, empty when all passed.
pub(crate) fn base_errors<T: validator::Validate>(form: &T) -> ValidationErrors {
    match form.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    }
}

/// `{"field": [{"code": ..., "message": ...}]}` with fields sorted by name.
pub fn error_fields(errors: &ValidationErrors) -> Value {
    let fields: BTreeMap<String, Vec<Value>> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let entries = errs
                .iter()
                .map(|e| {
                    json!({
                        "code": e.code.to_string(),
                        "message": e.message.as_ref().map(|m| m.to_string()),
                    })
                })
                .collect();
            (field.to_string(), entries)
        })
        .collect();

    json!(fields)
}

/// An explicit `null` reads the same as a missing field.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept either `["a", "b"]` or `"a,b"`. `null` is an empty list.
pub(crate) fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    let values = match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(s)) => s.split(',').map(|s| s.to_string()).collect(),
        Some(OneOrMany::Many(v)) => v,
        None => Vec::new(),
    };

    Ok(values
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}
