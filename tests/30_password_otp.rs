mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use hostelconnect_functions::email::OTP_SUBJECT;

#[tokio::test]
async fn sends_the_rendered_email_through_the_send_email_function() -> Result<()> {
    let app = common::spawn_app().await?;
    app.downstream.respond_with(
        "/rest/v1/profiles",
        200,
        json!({ "first_name": "Asha", "last_name": "K" }),
    );
    let client = reqwest::Client::new();

    let res = client
        .post(format!(
            "{}/functions/v1/send-password-reset-otp",
            app.base_url
        ))
        .json(&json!({ "email": "Asha@Example.com", "otp": "482913" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.json::<Value>().await?,
        json!({ "success": true, "message": "OTP sent successfully" })
    );

    // Lookup runs against the lowercased address.
    let lookup = app
        .downstream
        .first_matching("/rest/v1/profiles")
        .expect("profile lookup must happen");
    assert!(lookup
        .query
        .as_deref()
        .unwrap_or_default()
        .contains("email=eq.asha%40example.com"));

    // The message itself goes to the address as given.
    let email = app
        .downstream
        .first_matching("/functions/v1/send-email")
        .expect("send-email must be invoked");
    assert_eq!(email.json["to"], "Asha@Example.com");
    assert_eq!(email.json["subject"], OTP_SUBJECT);
    let html = email.json["html"].as_str().expect("html body");
    assert!(html.contains("Hello Asha,"));
    assert!(html.contains("482913"));
    Ok(())
}

#[tokio::test]
async fn missing_profile_falls_back_to_a_generic_greeting() -> Result<()> {
    let app = common::spawn_app().await?;
    // PostgREST answers 406 when the single-object read matches no row.
    app.downstream.respond_with(
        "/rest/v1/profiles",
        406,
        json!({ "message": "JSON object requested, multiple (or no) rows returned" }),
    );
    let client = reqwest::Client::new();

    let res = client
        .post(format!(
            "{}/functions/v1/send-password-reset-otp",
            app.base_url
        ))
        .json(&json!({ "email": "nobody@example.com", "otp": "000111" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);

    let email = app
        .downstream
        .first_matching("/functions/v1/send-email")
        .expect("send-email must be invoked");
    assert!(email.json["html"]
        .as_str()
        .expect("html body")
        .contains("Hello User,"));
    Ok(())
}

#[tokio::test]
async fn send_email_failure_surfaces_the_upstream_message() -> Result<()> {
    let app = common::spawn_app().await?;
    app.downstream.respond_with(
        "/functions/v1/send-email",
        500,
        json!({ "error": "smtp unavailable" }),
    );
    let client = reqwest::Client::new();

    let res = client
        .post(format!(
            "{}/functions/v1/send-password-reset-otp",
            app.base_url
        ))
        .json(&json!({ "email": "a@b.c", "otp": "123456" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = res.json::<Value>().await?;
    assert!(body["error"]
        .as_str()
        .expect("error must be a string")
        .contains("smtp unavailable"));
    Ok(())
}

#[tokio::test]
async fn preflight_gets_the_fixed_cors_header_set() -> Result<()> {
    let app = common::spawn_app().await?;
    let client = reqwest::Client::new();

    let res = client
        .request(
            reqwest::Method::OPTIONS,
            format!("{}/functions/v1/send-password-reset-otp", app.base_url),
        )
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "authorization, content-type")
        .send()
        .await?;

    assert!(res.status().is_success());
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    let allow_headers = res
        .headers()
        .get("access-control-allow-headers")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_lowercase();
    assert!(allow_headers.contains("authorization"));
    assert!(allow_headers.contains("content-type"));
    Ok(())
}

#[tokio::test]
async fn cors_origin_is_echoed_on_the_post_response_too() -> Result<()> {
    let app = common::spawn_app().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!(
            "{}/functions/v1/send-password-reset-otp",
            app.base_url
        ))
        .header("Origin", "http://localhost:5173")
        .json(&json!({ "email": "a@b.c", "otp": "123456" }))
        .send()
        .await?;

    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    Ok(())
}
