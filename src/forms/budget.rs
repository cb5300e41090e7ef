use serde::Deserialize;
use serde_json::{json, Value};
use validator::{Validate, ValidationErrors};

use super::{base_errors, field_error, null_as_empty, one_or_many, FormKind, Lead, LeadForm};
use crate::relay::Payload;

pub const FORM_TYPE: &str = "Orçamento Complexo";

/// Service categories a budget request can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    LandingPage,
    PaidTraffic,
    SocialMedia,
    AiCreation,
}

impl Category {
    /// Payload order of the detail groups.
    pub const ALL: [Category; 4] = [
        Category::LandingPage,
        Category::SocialMedia,
        Category::PaidTraffic,
        Category::AiCreation,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "landing_page" => Some(Category::LandingPage),
            "paid_traffic" | "trafego_pago" => Some(Category::PaidTraffic),
            "social_media" => Some(Category::SocialMedia),
            "ai_creation" | "criacao_ia" => Some(Category::AiCreation),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Category::LandingPage => "landing_page",
            Category::PaidTraffic => "paid_traffic",
            Category::SocialMedia => "social_media",
            Category::AiCreation => "ai_creation",
        }
    }

    /// Key of the nested group carrying this category's details.
    pub fn group_key(&self) -> &'static str {
        match self {
            Category::LandingPage => "landingPage",
            Category::PaidTraffic => "trafegoPago",
            Category::SocialMedia => "socialMedia",
            Category::AiCreation => "criacaoIA",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BudgetForm {
    #[serde(default, alias = "nome", deserialize_with = "null_as_empty")]
    #[validate(length(
        min = 2,
        code = "too_short",
        message = "Nome deve conter pelo menos 2 caracteres."
    ))]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(email(code = "invalid_format", message = "Endereço de e-mail inválido."))]
    pub email: String,
    #[serde(default, alias = "empresa", deserialize_with = "null_as_empty")]
    #[validate(length(min = 2, code = "required", message = "Nome da empresa é obrigatório."))]
    pub company: String,
    #[serde(default, alias = "whatsapp", deserialize_with = "null_as_empty")]
    #[validate(length(
        min = 10,
        code = "too_short",
        message = "Informe um número de telefone/WhatsApp válido."
    ))]
    pub phone: String,
    #[serde(default, alias = "servicos", deserialize_with = "one_or_many")]
    pub services: Vec<String>,

    #[serde(default, alias = "lpComplexidade", deserialize_with = "null_as_empty")]
    pub complexity: String,
    #[serde(default, alias = "lpElementos", deserialize_with = "null_as_empty")]
    pub required_elements: String,
    #[serde(default, alias = "lpCoresRefs", deserialize_with = "null_as_empty")]
    pub reference_links: String,

    #[serde(default, alias = "smNicho", deserialize_with = "null_as_empty")]
    pub niche: String,
    #[serde(default, alias = "smFrequencia", deserialize_with = "null_as_empty")]
    pub frequency: String,
    #[serde(default, alias = "smObjetivos", deserialize_with = "null_as_empty")]
    pub objectives: String,

    #[serde(default, alias = "tpOrcamento", deserialize_with = "null_as_empty")]
    pub monthly_budget: String,
    #[serde(default, alias = "tpPublico", deserialize_with = "null_as_empty")]
    pub target_audience: String,
    #[serde(default, alias = "tpPlataformas", deserialize_with = "null_as_empty")]
    pub platforms: String,

    #[serde(default, alias = "iaTipoMedia", deserialize_with = "null_as_empty")]
    pub media_type: String,
    #[serde(default, alias = "iaTomDeVoz", deserialize_with = "null_as_empty")]
    pub tone_of_voice: String,
}

/// A detail field that becomes required once its category is selected.
struct Rule {
    category: Category,
    field: &'static str,
    min_len: usize,
    code: &'static str,
    message: &'static str,
    value: fn(&BudgetForm) -> &str,
}

const RULES: &[Rule] = &[
    Rule {
        category: Category::LandingPage,
        field: "complexity",
        min_len: 1,
        code: "required",
        message: "Este campo é obrigatório para Landing Pages.",
        value: |f| f.complexity.as_str(),
    },
    Rule {
        category: Category::SocialMedia,
        field: "niche",
        min_len: 2,
        code: "too_short",
        message: "Informe o nicho de atuação.",
        value: |f| f.niche.as_str(),
    },
    Rule {
        category: Category::SocialMedia,
        field: "frequency",
        min_len: 1,
        code: "required",
        message: "Selecione a frequência desejada.",
        value: |f| f.frequency.as_str(),
    },
    Rule {
        category: Category::PaidTraffic,
        field: "monthlyBudget",
        min_len: 1,
        code: "required",
        message: "Informe o orçamento estimado.",
        value: |f| f.monthly_budget.as_str(),
    },
    Rule {
        category: Category::AiCreation,
        field: "mediaType",
        min_len: 1,
        code: "required",
        message: "Informe o tipo de mídia.",
        value: |f| f.media_type.as_str(),
    },
];

#[derive(Debug, Clone, PartialEq)]
pub struct LandingPageDetails {
    pub complexity: String,
    pub required_elements: String,
    pub reference_links: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SocialMediaDetails {
    pub niche: String,
    pub frequency: String,
    pub objectives: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaidTrafficDetails {
    pub monthly_budget: String,
    pub target_audience: String,
    pub platforms: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AiCreationDetails {
    pub media_type: String,
    pub tone_of_voice: String,
}

/// A validated budget request. A details group is `Some` iff its category
/// is in `services`.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetSubmission {
    pub name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    pub services: Vec<Category>,
    pub landing_page: Option<LandingPageDetails>,
    pub social_media: Option<SocialMediaDetails>,
    pub paid_traffic: Option<PaidTrafficDetails>,
    pub ai_creation: Option<AiCreationDetails>,
}

/// Base fields are always checked; detail rules only for selected categories.
pub fn validate(form: &BudgetForm) -> Result<BudgetSubmission, ValidationErrors> {
    let mut errors = base_errors(form);

    let mut services: Vec<Category> = Vec::new();
    let mut unknown = false;
    for tag in &form.services {
        match Category::from_tag(tag) {
            Some(category) if !services.contains(&category) => services.push(category),
            Some(_) => {}
            None => unknown = true,
        }
    }

    if form.services.is_empty() {
        errors.add(
            "services",
            field_error("required", "Selecione pelo menos um serviço."),
        );
    } else if unknown {
        errors.add(
            "services",
            field_error("invalid_choice", "Serviço selecionado inválido."),
        );
    }

    for rule in RULES.iter().filter(|r| services.contains(&r.category)) {
        if (rule.value)(form).chars().count() < rule.min_len {
            errors.add(rule.field, field_error(rule.code, rule.message));
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let selected = |category| services.contains(&category);

    Ok(BudgetSubmission {
        name: form.name.clone(),
        email: form.email.clone(),
        company: form.company.clone(),
        phone: form.phone.clone(),
        landing_page: selected(Category::LandingPage).then(|| LandingPageDetails {
            complexity: form.complexity.clone(),
            required_elements: form.required_elements.clone(),
            reference_links: form.reference_links.clone(),
        }),
        social_media: selected(Category::SocialMedia).then(|| SocialMediaDetails {
            niche: form.niche.clone(),
            frequency: form.frequency.clone(),
            objectives: form.objectives.clone(),
        }),
        paid_traffic: selected(Category::PaidTraffic).then(|| PaidTrafficDetails {
            monthly_budget: form.monthly_budget.clone(),
            target_audience: form.target_audience.clone(),
            platforms: form.platforms.clone(),
        }),
        ai_creation: selected(Category::AiCreation).then(|| AiCreationDetails {
            media_type: form.media_type.clone(),
            tone_of_voice: form.tone_of_voice.clone(),
        }),
        services,
    })
}

impl From<&BudgetSubmission> for BudgetForm {
    fn from(submission: &BudgetSubmission) -> Self {
        let mut form = BudgetForm {
            name: submission.name.clone(),
            email: submission.email.clone(),
            company: submission.company.clone(),
            phone: submission.phone.clone(),
            services: submission
                .services
                .iter()
                .map(|c| c.tag().to_string())
                .collect(),
            ..BudgetForm::default()
        };

        if let Some(lp) = &submission.landing_page {
            form.complexity = lp.complexity.clone();
            form.required_elements = lp.required_elements.clone();
            form.reference_links = lp.reference_links.clone();
        }
        if let Some(sm) = &submission.social_media {
            form.niche = sm.niche.clone();
            form.frequency = sm.frequency.clone();
            form.objectives = sm.objectives.clone();
        }
        if let Some(tp) = &submission.paid_traffic {
            form.monthly_budget = tp.monthly_budget.clone();
            form.target_audience = tp.target_audience.clone();
            form.platforms = tp.platforms.clone();
        }
        if let Some(ia) = &submission.ai_creation {
            form.media_type = ia.media_type.clone();
            form.tone_of_voice = ia.tone_of_voice.clone();
        }

        form
    }
}

impl BudgetSubmission {
    fn group(&self, category: Category) -> Option<Value> {
        match category {
            Category::LandingPage => self.landing_page.as_ref().map(|d| {
                json!({
                    "complexity": d.complexity,
                    "requiredElements": d.required_elements,
                    "referenceLinks": d.reference_links,
                })
            }),
            Category::SocialMedia => self.social_media.as_ref().map(|d| {
                json!({
                    "niche": d.niche,
                    "frequency": d.frequency,
                    "objectives": d.objectives,
                })
            }),
            Category::PaidTraffic => self.paid_traffic.as_ref().map(|d| {
                json!({
                    "monthlyBudget": d.monthly_budget,
                    "targetAudience": d.target_audience,
                    "platforms": d.platforms,
                })
            }),
            Category::AiCreation => self.ai_creation.as_ref().map(|d| {
                json!({
                    "mediaType": d.media_type,
                    "toneOfVoice": d.tone_of_voice,
                })
            }),
        }
    }
}

impl Lead for BudgetSubmission {
    fn subject(&self) -> String {
        format!("Solicitação de Orçamento: {} - {}", self.name, self.company)
    }

    fn payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.insert("formType".into(), Value::String(FORM_TYPE.to_string()));
        payload.insert("name".into(), json!(self.name));
        payload.insert("email".into(), json!(self.email));
        payload.insert("company".into(), json!(self.company));
        payload.insert("phone".into(), json!(self.phone));
        payload.insert(
            "selectedServices".into(),
            json!(self.services.iter().map(|c| c.tag()).collect::<Vec<_>>()),
        );

        for category in Category::ALL {
            if let Some(group) = self.group(category) {
                payload.insert(category.group_key().into(), group);
            }
        }

        payload
    }
}

impl LeadForm for BudgetForm {
    type Valid = BudgetSubmission;

    const KIND: FormKind = FormKind::Budget;

    fn validated(&self) -> Result<BudgetSubmission, ValidationErrors> {
        validate(self)
    }
}
