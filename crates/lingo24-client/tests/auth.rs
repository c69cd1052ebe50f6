//! OAuth2 token exchange integration tests.

mod common;

use chrono::Utc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use common::{API_PREFIX, TestApi, blocking, token_body};
use lingo24_client::{Authenticator, Error, FileTokenStore, TokenSet, TokenStore};

fn token_endpoint() -> wiremock::MockBuilder {
    Mock::given(method("POST")).and(path(format!("{API_PREFIX}/oauth2/access")))
}

#[tokio::test(flavor = "multi_thread")]
async fn test_request_access_token_uses_server_date() {
    let api = TestApi::start().await;
    api.mount(
        token_endpoint()
            .and(query_param("client_id", "xxx"))
            .and(query_param("client_secret", "yyy"))
            .and(query_param("redirect_uri", "https://www.example.com/callback"))
            .and(query_param("grant_type", "authorization_code"))
            .and(query_param("code", "ccc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Date", "Thu, 01 Jan 2015 00:00:00 GMT")
                    .set_body_json(token_body("aaa", "bbb")),
            )
            .expect(1),
    )
    .await;

    let uri = api.uri();
    let (returned, stored) = blocking(move || {
        let auth = common::authenticator(&uri, TokenSet::default());
        let returned = auth.request_access_token("ccc").unwrap();
        (returned, auth.token_set())
    })
    .await;

    let expected = TokenSet {
        access_token: Some("aaa".into()),
        refresh_token: Some("bbb".into()),
        expires_in: Some(3600),
        expires_at: Some(1_420_070_400 + 3600),
    };
    assert_eq!(returned, expected);
    assert_eq!(stored, expected);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_huge_expires_in_saturates() {
    let api = TestApi::start().await;
    api.mount(
        token_endpoint()
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Date", "Thu, 01 Jan 2015 00:00:00 GMT")
                    .set_body_json(serde_json::json!({
                        "access_token": "a",
                        "refresh_token": "b",
                        "expires_in": i64::MAX,
                    })),
            )
            .expect(1),
    )
    .await;

    let uri = api.uri();
    let (returned, expired) = blocking(move || {
        let auth = common::authenticator(&uri, TokenSet::default());
        let returned = auth.request_access_token("ccc").unwrap();
        (returned, auth.is_access_token_expired())
    })
    .await;

    assert_eq!(returned.expires_in, Some(i64::MAX));
    assert_eq!(returned.expires_at, Some(i64::MAX));
    assert!(!expired);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_token_is_refreshed_on_demand() {
    let api = TestApi::start().await;
    api.mount(
        token_endpoint()
            .and(query_param("grant_type", "refresh_token"))
            .and(query_param("refresh_token", "bbb"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("ddd", "eee")))
            .expect(1),
    )
    .await;

    let uri = api.uri();
    let (token, stored) = blocking(move || {
        let expired = TokenSet {
            access_token: Some("aaa".into()),
            refresh_token: Some("bbb".into()),
            expires_in: Some(3600),
            expires_at: Some(Utc::now().timestamp() - 60),
        };
        let auth = common::authenticator(&uri, expired);
        assert!(auth.is_access_token_expired());
        (auth.access_token().unwrap(), auth.token_set())
    })
    .await;

    assert_eq!(token, "ddd");
    assert_eq!(stored.refresh_token.as_deref(), Some("eee"));
    let expires_at = stored.expires_at.unwrap();
    assert!((expires_at - Utc::now().timestamp() - 3600).abs() < 120);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_valid_token_needs_no_network() {
    let api = TestApi::start().await;
    api.mount(
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0),
    )
    .await;

    let uri = api.uri();
    let token = blocking(move || {
        let valid = TokenSet {
            expires_at: Some(Utc::now().timestamp() + 3600),
            ..common::tokens()
        };
        common::authenticator(&uri, valid).access_token().unwrap()
    })
    .await;

    assert_eq!(token, "aaa");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_token_exchange_failure_is_api_error() {
    let api = TestApi::start().await;
    api.mount(
        token_endpoint()
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant")),
    )
    .await;

    let uri = api.uri();
    let (err, stored) = blocking(move || {
        let auth = common::authenticator(&uri, common::tokens());
        (auth.request_access_token("bad").unwrap_err(), auth.token_set())
    })
    .await;

    assert!(err.is_api_error());
    assert_eq!(err.status_code(), Some(400));
    match &err {
        Error::Status { url, body, .. } => {
            assert!(!url.contains("yyy"), "client secret leaked into error: {url}");
            assert_eq!(body, "invalid_grant");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // the old tokens survive a failed exchange
    assert_eq!(stored, common::tokens());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tokens_persist_to_file_store() {
    let api = TestApi::start().await;
    api.mount(
        token_endpoint()
            .and(query_param("grant_type", "authorization_code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("aaa", "bbb"))),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("nested").join("tokens.json");
    let uri = api.uri();
    let reopened = blocking(move || {
        let auth = Authenticator::builder(common::credentials())
            .endpoint(common::endpoint(&uri))
            .store(FileTokenStore::open(&token_path).unwrap())
            .build()
            .unwrap();
        auth.request_access_token("ccc").unwrap();
        FileTokenStore::open(&token_path).unwrap().get()
    })
    .await;

    assert_eq!(reopened.access_token.as_deref(), Some("aaa"));
    assert_eq!(reopened.refresh_token.as_deref(), Some("bbb"));
    assert_eq!(reopened.expires_in, Some(3600));
}
