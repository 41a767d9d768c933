use axum::http::StatusCode;
use blobgate::{BlobStore, Role, StoreError, WriteAck};

use crate::AppTest;

#[tokio::test]
async fn read_missing_blob_is_not_found() -> anyhow::Result<()> {
    let app = AppTest::new()?;
    app.get_file("ghost").await.assert_status_not_found();
    Ok(())
}

#[tokio::test]
async fn write_read_round_trip_keeps_content_type() -> anyhow::Result<()> {
    let app = AppTest::new()?;
    let admin = app.token_for("root", Role::Admin);

    let resp = app
        .put_file("report", br#"{"x":1}"#, "application/json", Some(&admin))
        .await;
    resp.assert_status(StatusCode::CREATED);
    let ack: WriteAck = resp.json();
    assert_eq!(ack.key, "report.json");

    let resp = app.get_file("report").await;
    resp.assert_status_ok();
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/json"
    );
    assert_eq!(resp.as_bytes().as_ref(), br#"{"x":1}"#);
    Ok(())
}

#[tokio::test]
async fn suffixed_and_bare_names_hit_the_same_key() -> anyhow::Result<()> {
    let app = AppTest::new()?;
    let admin = app.token_for("root", Role::Admin);

    app.put_file("report.json", b"1", "application/json", Some(&admin))
        .await
        .assert_status(StatusCode::CREATED);
    app.get_file("report").await.assert_status_ok();
    Ok(())
}

#[tokio::test]
async fn write_without_token_is_unauthenticated() -> anyhow::Result<()> {
    let app = AppTest::new()?;
    app.put_file("a", b"1", "application/json", None)
        .await
        .assert_status_unauthorized();

    // store untouched
    assert!(matches!(
        app.blobs.get("a.json").await,
        Err(StoreError::NotFound)
    ));
    Ok(())
}

#[tokio::test]
async fn presented_but_invalid_token_is_forbidden() -> anyhow::Result<()> {
    let app = AppTest::new()?;

    // garbage in the Bearer slot
    app.put_file("a", b"1", "application/json", Some("not-a-jwt"))
        .await
        .assert_status_forbidden();

    // properly formed token signed with the wrong secret
    let foreign = {
        let claims = blobgate::Claims::new("root", Role::Admin, 15);
        blobgate::issue_token(&claims, &"some-other-signing-secret".into())?
    };
    app.put_file("a", b"1", "application/json", Some(&foreign))
        .await
        .assert_status_forbidden();

    // expired token, well past the verifier's leeway
    let expired = {
        let claims = blobgate::Claims::new("root", Role::Admin, -120);
        blobgate::issue_token(&claims, &crate::TEST_SECRET.into())?
    };
    app.put_file("a", b"1", "application/json", Some(&expired))
        .await
        .assert_status_forbidden();

    // absent credential stays a 401
    app.put_file("a", b"1", "application/json", None)
        .await
        .assert_status_unauthorized();

    assert!(matches!(
        app.blobs.get("a.json").await,
        Err(StoreError::NotFound)
    ));
    Ok(())
}

#[tokio::test]
async fn dev_token_is_forbidden_and_store_unchanged() -> anyhow::Result<()> {
    let app = AppTest::new()?;
    let dev = app.token_for("intern", Role::Dev);

    app.put_file("a", b"1", "application/json", Some(&dev))
        .await
        .assert_status_forbidden();
    app.delete_file("a", Some(&dev)).await.assert_status_forbidden();

    assert!(matches!(
        app.blobs.get("a.json").await,
        Err(StoreError::NotFound)
    ));
    Ok(())
}

#[tokio::test]
async fn post_is_update_only() -> anyhow::Result<()> {
    let app = AppTest::new()?;
    let admin = app.token_for("root", Role::Admin);

    // no such key yet
    app.post_file("a", b"2", "application/json", Some(&admin))
        .await
        .assert_status_not_found();

    app.put_file("a", b"1", "application/json", Some(&admin))
        .await
        .assert_status(StatusCode::CREATED);
    app.post_file("a", b"2", "application/json", Some(&admin))
        .await
        .assert_status_ok();

    let resp = app.get_file("a").await;
    assert_eq!(resp.as_bytes().as_ref(), b"2");
    Ok(())
}

#[tokio::test]
async fn delete_then_read_is_not_found() -> anyhow::Result<()> {
    let app = AppTest::new()?;
    let admin = app.token_for("root", Role::Admin);

    app.put_file("a", b"1", "application/json", Some(&admin))
        .await
        .assert_status(StatusCode::CREATED);
    app.delete_file("a", Some(&admin)).await.assert_status_ok();
    app.get_file("a").await.assert_status_not_found();

    // deleting an absent key is a 404, not a silent success
    app.delete_file("a", Some(&admin))
        .await
        .assert_status_not_found();
    Ok(())
}

#[tokio::test]
async fn empty_name_is_bad_request() -> anyhow::Result<()> {
    let app = AppTest::new()?;
    let admin = app.token_for("root", Role::Admin);

    app.get_file("").await.assert_status_bad_request();
    app.put_file("", b"1", "application/json", Some(&admin))
        .await
        .assert_status_bad_request();
    Ok(())
}

#[tokio::test]
async fn put_without_content_type_defaults_to_json() -> anyhow::Result<()> {
    let app = AppTest::new()?;
    let admin = app.token_for("root", Role::Admin);

    app.put_file_untyped("a", b"{}", &admin)
        .await
        .assert_status(StatusCode::CREATED);
    let blob = app.blobs.get("a.json").await?;
    assert_eq!(blob.content_type, "application/json");
    Ok(())
}

#[tokio::test]
async fn unmatched_route_gets_json_not_found() -> anyhow::Result<()> {
    let app = AppTest::new()?;
    let resp = app.get_raw("/api/nope").await;
    resp.assert_status_not_found();
    let body: serde_json::Value = resp.json();
    assert_eq!(body["msg"], "no route handler found");
    assert_eq!(body["path"], "/api/nope");
    assert_eq!(body["method"], "GET");
    Ok(())
}
