mod common;

use reqwest::StatusCode;
use serde_json::json;

use leadrelay::error::RELAY_FAILURE_NOTICE;

fn contact_data() -> serde_json::Value {
    json!({
        "name": "Ana Silva",
        "email": "ana@acme.com",
        "company": "Acme",
        "serviceType": "landing-page",
        "message": "Precisamos de uma landing page nova",
    })
}

fn budget_base() -> serde_json::Value {
    json!({
        "name": "Ana Silva",
        "email": "ana@acme.com",
        "company": "Acme",
        "phone": "11999990000",
    })
}

// ── Health ──────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_ok() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-content-type-options"], "nosniff");
    assert_eq!(resp.headers()["x-frame-options"], "DENY");
    assert_eq!(resp.text().await.unwrap(), "ok");
}

// ── Contact form ────────────────────────────────────────────────

#[tokio::test]
async fn contact_submission_is_forwarded() {
    let app = common::spawn_app().await;

    let (body, status) = app.submit_json("contato", &contact_data()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "sent");
    assert!(body["submission_id"].is_string());
    assert_eq!(body["relay"]["id"], "msg_1");

    let requests = app.relay.requests();
    assert_eq!(requests.len(), 1);
    let sent = &requests[0];
    assert_eq!(sent["to"], common::RELAY_TO);
    assert_eq!(sent["key"], common::RELAY_KEY);
    assert_eq!(sent["subject"], "Novo Contato: Ana Silva - Acme");

    let html = sent["html"].as_str().unwrap();
    assert!(html.contains("Contato Simples"));
    assert!(html.contains("Ana Silva"));
    assert!(html.contains("Service Type"));
    assert!(html.contains("landing-page"));
}

#[tokio::test]
async fn contact_invalid_email_is_rejected_without_sending() {
    let app = common::spawn_app().await;

    let mut data = contact_data();
    data["email"] = json!("not-an-email");

    let (body, status) = app.submit_json("contato", &data).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Validation failed");

    let fields = body["fields"].as_object().unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields["email"][0]["code"], "invalid_format");

    assert!(app.relay.requests().is_empty());
}

#[tokio::test]
async fn contact_accepts_portuguese_form_fields() {
    let app = common::spawn_app().await;

    let (body, status) = app
        .submit_form(
            "contato",
            &[
                ("nome", "Bruno Costa"),
                ("email", "bruno@loja.com.br"),
                ("empresa", "Loja do Bruno"),
                ("tipoServico", "trafego"),
                ("mensagem", "Quero escalar minhas vendas online"),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::OK, "unexpected body: {body}");
    assert_eq!(
        app.relay.requests()[0]["subject"],
        "Novo Contato: Bruno Costa - Loja do Bruno"
    );
}

#[tokio::test]
async fn contact_reports_every_invalid_field() {
    let app = common::spawn_app().await;

    let (body, status) = app.submit_json("contato", &json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let mut fields: Vec<&String> = body["fields"].as_object().unwrap().keys().collect();
    fields.sort();
    assert_eq!(fields, ["company", "email", "message", "name", "serviceType"]);
}

// ── Budget form ─────────────────────────────────────────────────

#[tokio::test]
async fn budget_social_media_only_skips_landing_page() {
    let app = common::spawn_app().await;

    let mut data = budget_base();
    data["services"] = json!(["social_media"]);
    data["niche"] = json!("Odontologia");
    data["frequency"] = json!("3x");
    data["complexity"] = json!("");

    let (body, status) = app.submit_json("orcamento", &data).await;
    assert_eq!(status, StatusCode::OK, "unexpected body: {body}");

    let requests = app.relay.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0]["subject"],
        "Solicitação de Orçamento: Ana Silva - Acme"
    );

    let html = requests[0]["html"].as_str().unwrap();
    assert!(html.contains("Social Media"));
    assert!(html.contains("Odontologia"));
    assert!(!html.contains("Landing Page"));
    assert!(!html.contains("Trafego Pago"));
}

#[tokio::test]
async fn budget_missing_monthly_budget_is_the_only_error() {
    let app = common::spawn_app().await;

    let mut data = budget_base();
    data["services"] = json!(["trafego_pago"]);
    data["monthlyBudget"] = json!("");

    let (body, status) = app.submit_json("orcamento", &data).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let fields = body["fields"].as_object().unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields["monthlyBudget"][0]["code"], "required");
    assert!(app.relay.requests().is_empty());
}

#[tokio::test]
async fn budget_checkbox_group_from_form_post() {
    let app = common::spawn_app().await;

    let (body, status) = app
        .submit_form(
            "orcamento",
            &[
                ("nome", "Ana Silva"),
                ("email", "ana@acme.com"),
                ("empresa", "Acme"),
                ("whatsapp", "(11) 99999-0000"),
                ("servicos", "landing_page"),
                ("servicos", "criacao_ia"),
                ("lpComplexidade", "business"),
                ("iaTipoMedia", "Vídeos com Avatar"),
                ("smNicho", "ignored"),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::OK, "unexpected body: {body}");

    let html = app.relay.requests()[0]["html"].as_str().unwrap().to_string();
    assert!(html.contains("landing_page, ai_creation"));
    assert!(html.contains("Landing Page"));
    assert!(html.contains("Criacao I A"));
    assert!(!html.contains("ignored"));
}

#[tokio::test]
async fn budget_without_services_is_rejected() {
    let app = common::spawn_app().await;

    let (body, status) = app.submit_json("orcamento", &budget_base()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"]["services"][0]["code"], "required");
}

// ── Relay failures ──────────────────────────────────────────────

#[tokio::test]
async fn relay_failure_returns_generic_notice() {
    let relay = common::spawn_relay(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "quota exceeded" }),
    )
    .await;
    let config = common::test_config(&relay);
    let app = common::spawn_app_with(config, relay).await;

    let (body, status) = app.submit_json("contato", &contact_data()).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], RELAY_FAILURE_NOTICE);

    // No automatic retry
    assert_eq!(app.relay.requests().len(), 1);
}

// ── Intake guards ───────────────────────────────────────────────

#[tokio::test]
async fn honeypot_silently_accepts_spam() {
    let app = common::spawn_app().await;

    let mut data = contact_data();
    data["website"] = json!("http://spam.example");

    let (body, status) = app.submit_json("contato", &data).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(app.relay.requests().is_empty());
}

#[tokio::test]
async fn rate_limit_blocks_excess_submissions() {
    let relay = common::spawn_relay(StatusCode::OK, json!({ "success": true })).await;
    let mut config = common::test_config(&relay);
    config.rate_limit = 2;
    let app = common::spawn_app_with(config, relay).await;

    for _ in 0..2 {
        let (_, status) = app.submit_json("contato", &contact_data()).await;
        assert_eq!(status, StatusCode::OK);
    }

    let resp = app
        .client
        .post(app.url("/api/v1/forms/contato"))
        .json(&contact_data())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key("retry-after"));

    // The budget form has its own allowance
    let mut data = budget_base();
    data["services"] = json!(["ai_creation"]);
    data["mediaType"] = json!("Imagens");
    let (_, status) = app.submit_json("orcamento", &data).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(app.relay.requests().len(), 3);
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .post(app.url("/api/v1/forms/contato"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let (_, status) = app
        .submit_json("contato", &json!({ "name": 42, "email": "ana@acme.com" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(app.relay.requests().is_empty());
}
