mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use uuid::Uuid;

#[tokio::test]
async fn root_and_health_are_public() -> Result<()> {
    let app = common::test_app();

    let (status, body) = common::send(&app, Method::GET, "/", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Roster API");

    let (status, body) = common::send(&app, Method::GET, "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    Ok(())
}

#[tokio::test]
async fn resource_routes_require_a_token() -> Result<()> {
    let app = common::test_app();

    let (status, body) = common::send(&app, Method::GET, "/trainees", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = common::send(&app, Method::GET, "/programs", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected() -> Result<()> {
    let app = common::test_app();

    let (status, _) = common::send(
        &app,
        Method::GET,
        "/trainees",
        Some("Token token=abcdef"),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn garbage_token_is_rejected_with_the_error_envelope() -> Result<()> {
    let app = common::test_app();

    let (status, body) = common::send(
        &app,
        Method::GET,
        "/trainees",
        Some("Bearer notarealtoken"),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "UNAUTHORIZED");

    Ok(())
}

#[tokio::test]
async fn valid_token_reaches_the_handler() -> Result<()> {
    let app = common::test_app();
    let auth = common::bearer(Uuid::new_v4(), "caleb@example.com");

    let (status, body) = common::send(&app, Method::GET, "/trainees", Some(&auth), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["trainees"].as_array().unwrap().is_empty());

    Ok(())
}
