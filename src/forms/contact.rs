use serde::Deserialize;
use serde_json::{json, Value};
use validator::{Validate, ValidationErrors};

use super::{base_errors, field_error, null_as_empty, FormKind, Lead, LeadForm};
use crate::relay::Payload;

pub const FORM_TYPE: &str = "Contato Simples";

/// Services offered in the contact form's select box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    LandingPage,
    Traffic,
    SocialMedia,
    AiCreatives,
    Consulting,
    Other,
}

impl ServiceType {
    pub const ALL: [ServiceType; 6] = [
        ServiceType::LandingPage,
        ServiceType::Traffic,
        ServiceType::SocialMedia,
        ServiceType::AiCreatives,
        ServiceType::Consulting,
        ServiceType::Other,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.tag() == tag)
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ServiceType::LandingPage => "landing-page",
            ServiceType::Traffic => "trafego",
            ServiceType::SocialMedia => "social-media",
            ServiceType::AiCreatives => "ia-criativos",
            ServiceType::Consulting => "consultoria",
            ServiceType::Other => "outro",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    #[serde(default, alias = "nome", deserialize_with = "null_as_empty")]
    #[validate(length(
        min = 2,
        code = "too_short",
        message = "Nome deve conter pelo menos 2 caracteres."
    ))]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(email(
        code = "invalid_format",
        message = "Por favor, insira um endereço de e-mail válido."
    ))]
    pub email: String,
    #[serde(default, alias = "empresa", deserialize_with = "null_as_empty")]
    #[validate(length(min = 2, code = "required", message = "O nome da empresa é obrigatório."))]
    pub company: String,
    #[serde(default, alias = "tipoServico", deserialize_with = "null_as_empty")]
    pub service_type: String,
    #[serde(default, alias = "mensagem", deserialize_with = "null_as_empty")]
    #[validate(length(
        min = 10,
        code = "too_short",
        message = "A mensagem deve conter pelo menos 10 caracteres."
    ))]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub company: String,
    pub service_type: ServiceType,
    pub message: String,
}

/// Check every field and report all violations at once.
pub fn validate(form: &ContactForm) -> Result<ContactSubmission, ValidationErrors> {
    let mut errors = base_errors(form);

    let service_type = ServiceType::from_tag(&form.service_type);
    if service_type.is_none() {
        errors.add(
            "serviceType",
            field_error("required", "Selecione um tipo de serviço."),
        );
    }

    match service_type {
        Some(service_type) if errors.is_empty() => Ok(ContactSubmission {
            name: form.name.clone(),
            email: form.email.clone(),
            company: form.company.clone(),
            service_type,
            message: form.message.clone(),
        }),
        _ => Err(errors),
    }
}

impl From<&ContactSubmission> for ContactForm {
    fn from(submission: &ContactSubmission) -> Self {
        ContactForm {
            name: submission.name.clone(),
            email: submission.email.clone(),
            company: submission.company.clone(),
            service_type: submission.service_type.tag().to_string(),
            message: submission.message.clone(),
        }
    }
}

impl Lead for ContactSubmission {
    fn subject(&self) -> String {
        format!("Novo Contato: {} - {}", self.name, self.company)
    }

    fn payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.insert("name".into(), json!(self.name));
        payload.insert("email".into(), json!(self.email));
        payload.insert("company".into(), json!(self.company));
        payload.insert("serviceType".into(), json!(self.service_type.tag()));
        payload.insert("message".into(), json!(self.message));
        payload.insert("formType".into(), Value::String(FORM_TYPE.to_string()));
        payload
    }
}

impl LeadForm for ContactForm {
    type Valid = ContactSubmission;

    const KIND: FormKind = FormKind::Contact;

    fn validated(&self) -> Result<ContactSubmission, ValidationErrors> {
        validate(self)
    }
}
