//! Black-box contract for `/api/users` against the SQLite store.

mod common;

use axum::http::{header, Method, StatusCode};
use serde_json::json;

use common::{sub_error_fields, TestApp};

fn ivan(email: &str) -> serde_json::Value {
    json!({
        "firstName": "Ivan",
        "lastName": "Ivanov",
        "dayOfBirth": "2000-01-01",
        "email": email,
    })
}

#[tokio::test]
async fn should_return_correct_users_list_size() {
    let app = TestApp::sqlite().await;

    let response = app.get("/api/users").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["page"]["totalElements"], 20);
    assert_eq!(response.body["page"]["size"], 20);
    assert_eq!(response.body["page"]["totalPages"], 1);
    assert_eq!(response.body["page"]["number"], 0);
    assert_eq!(
        response.body["_embedded"]["users"].as_array().map(Vec::len),
        Some(20)
    );
}

#[tokio::test]
async fn should_return_user_if_exists() {
    let app = TestApp::sqlite().await;

    let response = app.get("/api/users/10").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["id"], 10);
    assert_eq!(response.body["email"], "workingemail-10@gmail.com");
    assert_eq!(response.body["_links"]["self"]["href"], "/api/users/10");
}

#[tokio::test]
async fn should_not_return_user_if_not_exists() {
    let app = TestApp::sqlite().await;

    let response = app.get("/api/users/30").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["status"], "NOT_FOUND");
    assert_eq!(
        response.body["message"],
        "User was not found for parameters {id=30}"
    );
}

#[tokio::test]
async fn should_create_new_user() {
    let app = TestApp::sqlite().await;
    let body = ivan("asdas@asdas.tr");

    let response = app.post(&body).await;

    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.body["id"].as_i64().unwrap();
    assert!(id > 20);
    assert_eq!(response.body["firstName"], body["firstName"]);
    assert_eq!(response.body["lastName"], body["lastName"]);
    assert_eq!(response.body["dayOfBirth"], body["dayOfBirth"]);
    assert_eq!(response.body["email"], body["email"]);
    assert_eq!(
        response.headers[header::LOCATION],
        format!("/api/users/{}", id).as_str()
    );
}

#[tokio::test]
async fn should_create_new_user_when_name_2_symbols() {
    let app = TestApp::sqlite().await;
    let mut body = ivan("asdas@asdas.ru");
    body["firstName"] = json!("El");

    let response = app.post(&body).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert!(response.body["id"].as_i64().unwrap() > 20);
    assert_eq!(response.body["firstName"], "El");
}

#[tokio::test]
async fn should_create_new_user_when_name_15_symbols() {
    let app = TestApp::sqlite().await;
    let mut body = ivan("alyona@asdas.ru");
    body["firstName"] = json!("Алёна-Генриэтта");

    let response = app.post(&body).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["firstName"], "Алёна-Генриэтта");
}

#[tokio::test]
async fn should_not_create_new_user_when_name_1_symbol() {
    let app = TestApp::sqlite().await;
    let mut body = ivan("alyona@asdas.ru");
    body["firstName"] = json!("I");

    let response = app.post(&body).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Validation error");
    assert_eq!(sub_error_fields(&response.body), vec!["firstName"]);
    assert_eq!(response.body["subErrors"][0]["rejectedValue"], "I");
    assert_eq!(
        response.body["subErrors"][0]["message"],
        "размер должен находиться в диапазоне от 2 до 15"
    );

    let list = app.get("/api/users").await;
    assert_eq!(list.body["page"]["size"], 20);
    assert_eq!(list.body["page"]["totalElements"], 20);
}

#[tokio::test]
async fn should_not_create_new_user_when_name_16_symbols() {
    let app = TestApp::sqlite().await;
    let mut body = ivan("alyona@asdas.ru");
    body["firstName"] = json!("Ibhjllkjhgfdddrt");

    let response = app.post(&body).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(sub_error_fields(&response.body), vec!["firstName"]);
    assert_eq!(app.total_elements().await, 20);
}

#[tokio::test]
async fn should_not_create_new_user_when_email_invalid() {
    let app = TestApp::sqlite().await;

    let response = app.post(&ivan("!*)(*&^54678jhgf")).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(sub_error_fields(&response.body), vec!["email"]);
    assert_eq!(response.body["subErrors"][0]["code"], "Email");
    assert_eq!(app.total_elements().await, 20);
}

#[tokio::test]
async fn should_not_create_new_users_when_second_body_is_empty() {
    let app = TestApp::sqlite().await;
    let body = json!({
        "firstName": "Stepan",
        "lastName": "Petrov",
        "dayOfBirth": "2005-01-05",
        "email": "blabla@asdas.ru",
    });

    assert_eq!(app.post(&body).await.status, StatusCode::CREATED);

    let empty = app.post(&json!({})).await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        sub_error_fields(&empty.body),
        vec!["firstName", "lastName", "dayOfBirth", "email"]
    );
    assert!(empty.body["subErrors"]
        .as_array()
        .unwrap()
        .iter()
        .all(|e| e["code"] == "NotNull"));

    assert_eq!(app.total_elements().await, 21);
}

#[tokio::test]
async fn should_not_create_new_user_when_email_already_exists() {
    let app = TestApp::sqlite().await;
    let existing = app.get("/api/users/5").await;
    let email = existing.body["email"].as_str().unwrap().to_string();

    let response = app.post(&ivan(&email)).await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["status"], "CONFLICT");
    assert_eq!(response.body["message"], "Database error");
    assert_eq!(app.total_elements().await, 20);
}

#[tokio::test]
async fn should_not_create_new_user_when_date_invalid_format() {
    let app = TestApp::sqlite().await;
    let mut body = ivan("kjhgh@asdas.ru");
    body["dayOfBirth"] = json!("2000.01.01");

    let response = app.post(&body).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Malformed JSON request");
    assert_eq!(app.total_elements().await, 20);
}

#[tokio::test]
async fn should_not_create_new_user_when_date_in_future() {
    let app = TestApp::sqlite().await;
    let mut body = ivan("kjhgh@asdas.ru");
    body["dayOfBirth"] = json!("3000-01-01");

    let response = app.post(&body).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(sub_error_fields(&response.body), vec!["dayOfBirth"]);
    assert_eq!(response.body["subErrors"][0]["code"], "Past");
    assert_eq!(app.total_elements().await, 20);
}

#[tokio::test]
async fn should_put_new_info_to_existing_user() {
    let app = TestApp::sqlite().await;
    let body = json!({
        "firstName": "Julia",
        "lastName": "Smith",
        "dayOfBirth": "1967-01-01",
        "email": "juli@asdas.ru",
    });

    let response = app.json(Method::PUT, "/api/users/3", &body).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["id"], 3);
    assert_eq!(response.body["firstName"], "Julia");
    assert_eq!(response.body["lastName"], "Smith");
    assert_eq!(response.body["dayOfBirth"], "1967-01-01");
    assert_eq!(response.body["email"], "juli@asdas.ru");

    let reread = app.get("/api/users/3").await;
    assert_eq!(reread.body["email"], "juli@asdas.ru");
}

#[tokio::test]
async fn should_fail_put_new_info_to_existing_user_when_some_fields_empty() {
    let app = TestApp::sqlite().await;
    let body = json!({
        "firstName": "Mari",
        "lastName": "",
        "dayOfBirth": "",
        "email": "",
    });

    let response = app.json(Method::PUT, "/api/users/2", &body).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        sub_error_fields(&response.body),
        vec!["lastName", "dayOfBirth", "email"]
    );

    let untouched = app.get("/api/users/2").await;
    assert_eq!(untouched.body["email"], "workingemail-2@gmail.com");
}

#[tokio::test]
async fn should_patch_new_info_to_existing_user() {
    let app = TestApp::sqlite().await;
    let before = app.get("/api/users/12").await;

    let response = app
        .json(
            Method::PATCH,
            "/api/users/12",
            &json!({"firstName": "Ani", "email": "ani@asdas.ru"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["id"], 12);
    assert_eq!(response.body["firstName"], "Ani");
    assert_eq!(response.body["email"], "ani@asdas.ru");
    assert_eq!(response.body["lastName"], before.body["lastName"]);
    assert_eq!(response.body["dayOfBirth"], before.body["dayOfBirth"]);
}

#[tokio::test]
async fn should_fail_patch_new_info_to_not_existing_user() {
    let app = TestApp::sqlite().await;
    let body = json!({
        "firstName": "Mari",
        "lastName": "",
        "dayOfBirth": "",
        "email": "",
    });

    let response = app.json(Method::PATCH, "/api/users/55", &body).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_delete_existing_user() {
    let app = TestApp::sqlite().await;
    assert_eq!(app.total_elements().await, 20);

    let response = app.delete("/api/users/20").await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(response.body.is_null());

    assert_eq!(app.total_elements().await, 19);
    assert_eq!(app.get("/api/users/20").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_do_nothing_when_delete_not_existing_user() {
    let app = TestApp::sqlite().await;
    assert_eq!(app.total_elements().await, 20);

    let response = app.delete("/api/users/40").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["status"], "NOT_FOUND");

    assert_eq!(app.total_elements().await, 20);
}
