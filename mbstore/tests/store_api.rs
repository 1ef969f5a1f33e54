//! Tests d'intégration du client du backend de stockage (serveur mocké).

use mbstore::{AdminSession, StoreClient, StoreError};
use mockito::Matcher;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Row {
    id: String,
    title: String,
}

#[tokio::test]
async fn select_all_returns_rows_in_order() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v1/music_meta")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "*".into()),
            Matcher::UrlEncoded("order".into(), "created_at.desc".into()),
        ]))
        .with_status(200)
        .with_body(r#"[{"id":"2","title":"B"},{"id":"1","title":"A"}]"#)
        .create_async()
        .await;

    let client = StoreClient::new(server.url(), "anon", None)?;
    let rows: Vec<Row> = client.select_all("music_meta", Some("created_at")).await?;

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, "2");
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn select_all_falls_back_to_anon_key() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;

    let privileged = server
        .mock("GET", "/rest/v1/music_meta")
        .match_header("apikey", "service")
        .with_status(500)
        .with_body(r#"{"message":"internal"}"#)
        .create_async()
        .await;

    let anon = server
        .mock("GET", "/rest/v1/music_meta")
        .match_header("apikey", "anon")
        .with_status(200)
        .with_body(r#"[{"id":"1","title":"A"}]"#)
        .create_async()
        .await;

    let client = StoreClient::new(server.url(), "anon", Some("service".to_string()))?;
    let rows: Vec<Row> = client.select_all("music_meta", None).await?;

    assert_eq!(rows.len(), 1);
    privileged.assert_async().await;
    anon.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn insert_returns_created_representation() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/rest/v1/music_meta")
        .match_header("Prefer", "return=representation")
        .match_body(Matcher::Json(serde_json::json!({
            "id": "9",
            "title": "New track"
        })))
        .with_status(201)
        .with_body(r#"[{"id":"9","title":"New track"}]"#)
        .create_async()
        .await;

    let client = StoreClient::new(server.url(), "anon", None)?;
    let row = Row {
        id: "9".into(),
        title: "New track".into(),
    };
    let created: Vec<Row> = client.insert("music_meta", &row).await?;

    assert_eq!(created, vec![row]);
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn delete_by_id_filters_on_id_column() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/rest/v1/music_meta")
        .match_query(Matcher::UrlEncoded("id".into(), "eq.42".into()))
        .with_status(204)
        .create_async()
        .await;

    let client = StoreClient::new(server.url(), "anon", None)?;
    client.delete_by_id("music_meta", "42").await?;

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn storage_remove_sends_prefixes() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/storage/v1/object/songs")
        .match_body(Matcher::Json(serde_json::json!({
            "prefixes": ["ambient.mp3"]
        })))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let client = StoreClient::new(server.url(), "anon", None)?;
    client.remove_song("ambient.mp3").await?;

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn storage_download_returns_bytes() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/storage/v1/object/songs/ambient.mp3")
        .with_status(200)
        .with_body(b"ID3audio".as_slice())
        .create_async()
        .await;

    let client = StoreClient::new(server.url(), "anon", None)?;
    let bytes = client.download_song("ambient.mp3").await?;

    assert_eq!(bytes, b"ID3audio");
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn sign_in_maps_bad_credentials_to_unauthorized() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/auth/v1/token")
        .match_query(Matcher::UrlEncoded("grant_type".into(), "password".into()))
        .with_status(400)
        .with_body(r#"{"error_description":"Invalid login credentials"}"#)
        .create_async()
        .await;

    let client = StoreClient::new(server.url(), "anon", None)?;
    let err = client.sign_in("who@example.com", "wrong").await.unwrap_err();

    assert!(matches!(err, StoreError::Unauthorized(_)));
    Ok(())
}

#[tokio::test]
async fn admin_session_remote_sign_in() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;

    let token = server
        .mock("POST", "/auth/v1/token")
        .match_query(Matcher::UrlEncoded("grant_type".into(), "password".into()))
        .with_status(200)
        .with_body(
            r#"{"access_token":"tok","user":{"id":"u1","email":"admin@example.com"}}"#,
        )
        .create_async()
        .await;

    let admins = server
        .mock("GET", "/rest/v1/admin_users")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "*".into()),
            Matcher::UrlEncoded("email".into(), "eq.admin@example.com".into()),
        ]))
        .with_status(200)
        .with_body(r#"[{"id":1,"email":"admin@example.com"}]"#)
        .create_async()
        .await;

    let dir = tempfile::tempdir()?;
    let client = Arc::new(StoreClient::new(server.url(), "anon", None)?);
    let session = AdminSession::new(client, None, dir.path().join("admin_session.json"));

    session.sign_in("admin@example.com", "pw").await?;
    assert!(session.is_admin().await);

    token.assert_async().await;
    admins.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn admin_session_rejects_non_admin_account() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;

    let _token = server
        .mock("POST", "/auth/v1/token")
        .with_status(200)
        .with_body(r#"{"access_token":"tok","user":{"id":"u2","email":"user@example.com"}}"#)
        .create_async()
        .await;

    let _admins = server
        .mock("GET", "/rest/v1/admin_users")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let logout = server
        .mock("POST", "/auth/v1/logout")
        .match_header("Authorization", "Bearer tok")
        .with_status(204)
        .create_async()
        .await;

    let dir = tempfile::tempdir()?;
    let client = Arc::new(StoreClient::new(server.url(), "anon", None)?);
    let session = AdminSession::new(client, None, dir.path().join("admin_session.json"));

    let err = session.sign_in("user@example.com", "pw").await.unwrap_err();
    assert!(matches!(err, StoreError::Unauthorized(_)));
    assert!(!session.is_admin().await);

    // Le token obtenu doit avoir été révoqué : pas de session partielle
    logout.assert_async().await;
    Ok(())
}
