use chrono::NaiveDate;
use httpmock::prelude::*;
use salon_admin::core::users::AddUserForm;
use salon_admin::domain::model::{EditUserRequest, NoticeKind, PageToken};
use salon_admin::domain::ports::UserDirectory;
use salon_admin::{AdminError, HttpUserDirectory, NoticeBoard, PagerState, UserManager};
use std::time::Duration;

fn directory(server: &MockServer) -> HttpUserDirectory {
    HttpUserDirectory::new(&server.url("/api"), Duration::from_secs(5)).unwrap()
}

fn user_list(count: usize, listed: usize) -> serde_json::Value {
    let users: Vec<serde_json::Value> = (1..=listed)
        .map(|i| {
            serde_json::json!({
                "uid": format!("uid-{i:03}"),
                "email": format!("user{i}@example.com"),
                "fullName": format!("User {i}"),
                "role": "user",
                "photo": null,
                "createdAt": "Tue, 14 Nov 2023 08:12:45 GMT",
                "dob": "17/03/1990"
            })
        })
        .collect();
    serde_json::json!({ "userList": users, "count": count })
}

#[tokio::test]
async fn test_list_users_and_page_through_them() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/users");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(user_list(200, 200));
        })
        .await;

    let list = directory(&server).list_users().await.unwrap();
    api_mock.assert_async().await;
    assert_eq!(list.count, 200);
    assert_eq!(list.user_list.len(), 200);

    let pager = PagerState::new(list.count, 10, 1).unwrap().with_page(10);
    assert_eq!(
        pager.range(),
        vec![
            PageToken::PageNumber(1),
            PageToken::Ellipsis,
            PageToken::PageNumber(9),
            PageToken::PageNumber(10),
            PageToken::PageNumber(11),
            PageToken::Ellipsis,
            PageToken::PageNumber(20),
        ]
    );
    let page = pager.slice(&list.user_list);
    assert_eq!(page.len(), 10);
    assert_eq!(page[0].uid, "uid-091");
}

#[tokio::test]
async fn test_count_can_exceed_listed_profiles() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/users");
            then.status(200).json_body(user_list(25, 12));
        })
        .await;

    let list = directory(&server).list_users().await.unwrap();
    let pager = PagerState::new(list.count, 10, 1).unwrap().with_page(3);
    assert_eq!(pager.total_pages(), 3);
    assert!(pager.slice(&list.user_list).is_empty());
}

#[tokio::test]
async fn test_list_failure_surfaces_error_field() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/users");
            then.status(500)
                .json_body(serde_json::json!({ "error": "Internal Server Error" }));
        })
        .await;

    let err = directory(&server).list_users().await.unwrap_err();
    match err {
        AdminError::RequestFailed {
            status, message, ..
        } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn test_add_user_sends_legacy_dob_and_age() {
    let server = MockServer::start_async().await;
    let add_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/users")
                .body_contains("\"dob\":\"17/03/1990\"")
                .body_contains("\"age\":\"36\"")
                .body_contains("\"fullName\":\"Ana Lima\"");
            then.status(201)
                .json_body(serde_json::json!({ "message": "User added successfully." }));
        })
        .await;

    let manager = UserManager::new(directory(&server), NoticeBoard::default());
    let form = AddUserForm {
        email: "ana@example.com".to_string(),
        password: "secret1".to_string(),
        full_name: "Ana Lima".to_string(),
        role: "user".to_string(),
        gender: "female".to_string(),
        dob: "1990-03-17".to_string(),
        phone_number: "0123".to_string(),
        photo_base64: String::new(),
    };
    let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

    manager.add_user(form, today).await.unwrap();

    add_mock.assert_async().await;
    assert_eq!(manager.notices().current(), Some(NoticeKind::Success));
}

#[tokio::test]
async fn test_edit_user_puts_to_uid_path() {
    let server = MockServer::start_async().await;
    let edit_mock = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/users/uid-007")
                .json_body_partial(r#"{"role":"admin","phoneNumber":"555"}"#);
            then.status(200)
                .json_body(serde_json::json!({ "message": "User updated successfully." }));
        })
        .await;

    let request = EditUserRequest {
        full_name: "User 7".to_string(),
        role: "admin".to_string(),
        gender: "male".to_string(),
        phone_number: "555".to_string(),
        photo_base64: String::new(),
    };
    directory(&server).edit_user("uid-007", &request).await.unwrap();
    edit_mock.assert_async().await;
}

#[tokio::test]
async fn test_failed_delete_raises_failure_notice() {
    let server = MockServer::start_async().await;
    let delete_mock = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/users/uid-404");
            then.status(500)
                .json_body(serde_json::json!({ "error": "Internal Server Error" }));
        })
        .await;

    let manager = UserManager::new(
        directory(&server),
        NoticeBoard::new(Duration::from_millis(200)),
    );
    assert!(manager.delete_user("uid-404").await.is_err());
    delete_mock.assert_async().await;
    assert_eq!(manager.notices().current(), Some(NoticeKind::Failure));

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(manager.notices().current(), None);
}
