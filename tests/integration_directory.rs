mod common;

use common::{MockReply, spawn_directory, unreachable_base_url};
use rollbook::allocator::namespace;
use rollbook::rollbook_config::DirectoryConfig;
use rollbook::{AllocationError, DirectoryError, DirectoryService, HttpDirectory, SequentialIdAllocator};
use std::time::Duration;

fn directory(config: &DirectoryConfig) -> HttpDirectory {
    HttpDirectory::new(config).unwrap()
}

#[tokio::test]
async fn test_fetch_next_id_from_directory() {
    let mock = spawn_directory(MockReply::NextId("NPS-S-0042".into())).await;
    let ns = namespace("student", "nps").unwrap();

    let id = SequentialIdAllocator::default()
        .allocate_from_directory(&directory(&mock.config()), &ns)
        .await
        .unwrap();

    assert_eq!(id.to_string(), "NPS-S-0042");
    assert_eq!(id.sequence(), 42);

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/users/next-id");
    assert_eq!(requests[0].query.school_code.as_deref(), Some("NPS"));
    assert_eq!(requests[0].query.role.as_deref(), Some("student"));
    assert!(requests[0].authorization.is_none());
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let mock = spawn_directory(MockReply::NextId("NPS-T-0001".into())).await;
    let config = DirectoryConfig {
        api_token: Some("secret-token".into()),
        ..mock.config()
    };

    directory(&config)
        .next_identifier(&namespace("teacher", "NPS").unwrap())
        .await
        .unwrap();

    assert_eq!(
        mock.requests()[0].authorization.as_deref(),
        Some("Bearer secret-token")
    );
}

#[tokio::test]
async fn test_server_error_is_directory_unavailable() {
    let mock = spawn_directory(MockReply::Status(500)).await;
    let ns = namespace("admin", "NPS").unwrap();

    let result = SequentialIdAllocator::default()
        .allocate_from_directory(&directory(&mock.config()), &ns)
        .await;

    assert!(matches!(
        result,
        Err(AllocationError::DirectoryUnavailable(DirectoryError::Status(500)))
    ));
}

#[tokio::test]
async fn test_rejected_credentials_are_unauthorized() {
    for code in [401, 403] {
        let mock = spawn_directory(MockReply::Status(code)).await;
        let result = directory(&mock.config())
            .next_identifier(&namespace("student", "NPS").unwrap())
            .await;

        assert!(matches!(result, Err(DirectoryError::Unauthorized(c)) if c == code));
    }
}

#[tokio::test]
async fn test_missing_user_id_is_malformed() {
    let mock = spawn_directory(MockReply::Raw(r#"{"userId": "  "}"#.into())).await;
    let result = directory(&mock.config())
        .next_identifier(&namespace("student", "NPS").unwrap())
        .await;
    assert!(matches!(result, Err(DirectoryError::Malformed(_))));

    let mock = spawn_directory(MockReply::Raw("{}".into())).await;
    let result = directory(&mock.config())
        .next_identifier(&namespace("student", "NPS").unwrap())
        .await;
    assert!(matches!(result, Err(DirectoryError::Malformed(_))));
}

#[tokio::test]
async fn test_empty_or_invalid_body_is_malformed() {
    for body in ["", "not json", r#"{"userId": "student-7"}"#] {
        let mock = spawn_directory(MockReply::Raw(body.into())).await;
        let result = directory(&mock.config())
            .next_identifier(&namespace("student", "NPS").unwrap())
            .await;
        assert!(
            matches!(result, Err(DirectoryError::Malformed(_))),
            "body {:?} gave {:?}",
            body,
            result
        );
    }
}

#[tokio::test]
async fn test_identifier_outside_namespace_is_rejected() {
    let mock = spawn_directory(MockReply::NextId("DPS-S-0003".into())).await;
    let result = directory(&mock.config())
        .next_identifier(&namespace("student", "NPS").unwrap())
        .await;

    match result {
        Err(DirectoryError::OutsideNamespace {
            identifier,
            namespace: expected,
        }) => {
            assert_eq!(identifier, "DPS-S-0003");
            assert_eq!(expected, "NPS-S");
        }
        other => panic!("expected OutsideNamespace, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_directory_is_unavailable() {
    let config = DirectoryConfig::with_base_url(unreachable_base_url().await);
    let result = SequentialIdAllocator::default()
        .allocate_from_directory(&directory(&config), &namespace("student", "NPS").unwrap())
        .await;

    assert!(matches!(
        result,
        Err(AllocationError::DirectoryUnavailable(DirectoryError::Transport(_)))
    ));
}

#[tokio::test]
async fn test_slow_directory_times_out() {
    let mock = spawn_directory(MockReply::Delay(Duration::from_secs(5))).await;
    let config = DirectoryConfig {
        timeout: Duration::from_millis(200),
        ..mock.config()
    };

    let result = SequentialIdAllocator::default()
        .prefill_from_directory(&directory(&config), &namespace("teacher", "NPS").unwrap())
        .await;

    match result {
        Err(AllocationError::DirectoryUnavailable(DirectoryError::Transport(e))) => {
            assert!(e.is_timeout())
        }
        other => panic!("expected a timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_prefill_uses_directory_snapshot() {
    let mock = spawn_directory(MockReply::Ids(vec![
        "NPS-S-0001".into(),
        "NPS-S-0002".into(),
        "NPS-S-0005".into(),
        "NPS-T-0030".into(),
    ]))
    .await;

    let id = SequentialIdAllocator::default()
        .prefill_from_directory(
            &directory(&mock.config()),
            &namespace("student", "NPS").unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(id.to_string(), "NPS-S-0006");
    assert_eq!(mock.requests()[0].path, "/users/ids");
}

#[tokio::test]
async fn test_trailing_slash_in_base_url_is_ignored() {
    let mock = spawn_directory(MockReply::NextId("NPS-A-0002".into())).await;
    let config = DirectoryConfig::with_base_url(format!("{}/", mock.base_url));
    let http = directory(&config);

    assert_eq!(http.base_url(), mock.base_url);
    let id = http
        .next_identifier(&namespace("admin", "NPS").unwrap())
        .await
        .unwrap();
    assert_eq!(id.to_string(), "NPS-A-0002");
}

#[tokio::test]
async fn test_zero_timeout_from_environment_still_reaches_directory() {
    let mock = spawn_directory(MockReply::NextId("NPS-S-0001".into())).await;
    let base_url = mock.base_url.clone();
    let config = DirectoryConfig::from_lookup(|key| match key {
        "DIRECTORY_URL" => Some(base_url.clone()),
        "DIRECTORY_TIMEOUT_SECONDS" => Some("0".into()),
        _ => None,
    });

    let id = directory(&config)
        .next_identifier(&namespace("student", "NPS").unwrap())
        .await
        .unwrap();
    assert_eq!(id.to_string(), "NPS-S-0001");
}

#[tokio::test]
async fn test_configured_endpoint_paths_are_used() {
    let mock = spawn_directory(MockReply::Ids(vec!["NPS-T-0004".into()])).await;
    let root = mock.base_url.trim_end_matches("/api").to_string();
    let config = DirectoryConfig::from_lookup(|key| match key {
        "DIRECTORY_URL" => Some(root.clone()),
        "DIRECTORY_IDS_PATH" => Some("api/users/ids".into()),
        _ => None,
    });

    let id = SequentialIdAllocator::default()
        .prefill_from_directory(&directory(&config), &namespace("teacher", "NPS").unwrap())
        .await
        .unwrap();

    assert_eq!(id.to_string(), "NPS-T-0005");
    assert_eq!(mock.requests()[0].path, "/users/ids");
}
