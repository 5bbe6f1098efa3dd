// SPDX-License-Identifier: Apache-2.0

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use tipple_server::{build_router, AppState, ServerConfig};
use tipple_store::schema;

async fn spawn_server() -> std::net::SocketAddr {
    let conn = schema::open_memory().expect("in-memory db");
    let app = build_router(AppState::new(conn, ServerConfig::default()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

async fn send_raw(
    addr: std::net::SocketAddr,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: Option<&str>,
) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    for (k, v) in headers {
        req.push_str(&format!("{k}: {v}\r\n"));
    }
    if let Some(body) = body {
        req.push_str(&format!(
            "Content-Type: application/json\r\nContent-Length: {}\r\n",
            body.len()
        ));
    }
    req.push_str("\r\n");
    if let Some(body) = body {
        req.push_str(body);
    }
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response must have separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    (status, head.to_string(), body.to_string())
}

fn session_cookie(head: &str) -> String {
    let raw = head
        .lines()
        .find_map(|line| line.strip_prefix("set-cookie: "))
        .expect("set-cookie header present");
    let pair = raw.split(';').next().expect("cookie pair");
    assert!(pair.starts_with("tipple_session="));
    assert!(raw.contains("HttpOnly"));
    pair.to_string()
}

async fn signup(addr: std::net::SocketAddr, username: &str) -> String {
    let body = json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": "correct-horse"
    })
    .to_string();
    let (status, head, _) = send_raw(addr, "POST", "/api/signup", &[], Some(&body)).await;
    assert_eq!(status, 201);
    session_cookie(&head)
}

async fn create_cocktail(addr: std::net::SocketAddr, cookie: &str, body: &Value) -> Value {
    let (status, _, resp) = send_raw(
        addr,
        "POST",
        "/api/cocktails",
        &[("Cookie", cookie)],
        Some(&body.to_string()),
    )
    .await;
    assert_eq!(status, 201);
    serde_json::from_str(&resp).expect("cocktail json")
}

#[tokio::test]
async fn healthz_and_request_id() {
    let addr = spawn_server().await;
    let (status, head, body) = send_raw(addr, "GET", "/healthz", &[], None).await;
    assert_eq!(status, 200);
    assert!(head.contains("x-request-id: "));
    let json: Value = serde_json::from_str(&body).expect("health json");
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn signup_establishes_a_session() {
    let addr = spawn_server().await;

    let (status, _, body) = send_raw(addr, "GET", "/api/auth/status", &[], None).await;
    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).expect("status json");
    assert_eq!(json["isAuthenticated"], false);
    assert!(json["user"].is_null());

    let cookie = signup(addr, "ada").await;
    let (status, _, body) =
        send_raw(addr, "GET", "/api/auth/status", &[("Cookie", &cookie)], None).await;
    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).expect("status json");
    assert_eq!(json["isAuthenticated"], true);
    assert_eq!(json["user"]["username"], "ada");
    assert!(json["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_signup_is_a_conflict() {
    let addr = spawn_server().await;
    signup(addr, "ada").await;

    let body = json!({
        "username": "ada",
        "email": "fresh@example.com",
        "password": "pw"
    })
    .to_string();
    let (status, _, resp) = send_raw(addr, "POST", "/api/signup", &[], Some(&body)).await;
    assert_eq!(status, 422);
    let json: Value = serde_json::from_str(&resp).expect("error json");
    assert_eq!(json["error"], "Conflict");
}

#[tokio::test]
async fn login_rejects_bad_credentials_with_bare_envelope() {
    let addr = spawn_server().await;
    signup(addr, "ada").await;

    let body = json!({"username": "ada", "password": "wrong"}).to_string();
    let (status, _, resp) = send_raw(addr, "POST", "/api/login", &[], Some(&body)).await;
    assert_eq!(status, 401);
    assert_eq!(resp, "{\"error\":\"Unauthorized\"}");

    let body = json!({"username": "ada", "password": "correct-horse"}).to_string();
    let (status, head, _) = send_raw(addr, "POST", "/api/login", &[], Some(&body)).await;
    assert_eq!(status, 200);
    session_cookie(&head);
}

#[tokio::test]
async fn logout_revokes_the_session_server_side() {
    let addr = spawn_server().await;
    let cookie = signup(addr, "ada").await;

    let (status, head, _) =
        send_raw(addr, "POST", "/api/logout", &[("Cookie", &cookie)], None).await;
    assert_eq!(status, 204);
    assert!(head.contains("Max-Age=0"));

    // The old token is dead even if a client keeps replaying it.
    let (status, _, body) =
        send_raw(addr, "GET", "/api/auth/status", &[("Cookie", &cookie)], None).await;
    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).expect("status json");
    assert_eq!(json["isAuthenticated"], false);
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let addr = spawn_server().await;
    for (method, path) in [
        ("GET", "/api/profile"),
        ("POST", "/api/cocktails"),
        ("PATCH", "/api/cocktails/1"),
        ("DELETE", "/api/cocktails/1"),
        ("POST", "/api/cocktails/1/like"),
        ("POST", "/api/cocktails/1/unlike"),
        ("POST", "/api/cocktails/1/reviews"),
    ] {
        let (status, _, body) = send_raw(addr, method, path, &[], Some("{}")).await;
        assert_eq!(status, 401, "{method} {path}");
        assert_eq!(body, "{\"error\":\"Unauthorized\"}", "{method} {path}");
    }
}

#[tokio::test]
async fn cocktail_crud_round_trip() {
    let addr = spawn_server().await;
    let cookie = signup(addr, "ada").await;

    let created = create_cocktail(
        addr,
        &cookie,
        &json!({
            "name": "Negroni",
            "instructions": "Stir over ice.",
            "glass_type": "rocks",
            "ingredients": [
                {"name": "Gin", "amount": "30 ml"},
                {"name": "Campari", "amount": "30 ml"},
                {"name": "Sweet Vermouth", "amount": "30 ml"}
            ]
        }),
    )
    .await;
    let id = created["id"].as_i64().expect("cocktail id");
    assert_eq!(created["ingredients"].as_array().map(Vec::len), Some(3));
    assert_eq!(created["ingredients"][0]["ingredient"]["name"], "Gin");

    // Ingredients created through the cocktail are browsable.
    let (status, _, body) = send_raw(addr, "GET", "/api/ingredients", &[], None).await;
    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).expect("ingredients json");
    assert_eq!(json.as_array().map(Vec::len), Some(3));
    let gin_id = json[0]["id"].as_i64().expect("ingredient id");
    let (status, _, body) =
        send_raw(addr, "GET", &format!("/api/ingredients/{gin_id}"), &[], None).await;
    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).expect("ingredient json");
    assert_eq!(json["name"], "Gin");

    // List responses are scalar-only summaries.
    let (status, _, body) = send_raw(addr, "GET", "/api/cocktails", &[], None).await;
    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).expect("list json");
    assert_eq!(json.as_array().map(Vec::len), Some(1));
    assert!(json[0].get("ingredients").is_none());

    // Patch with an ingredient list replaces all links.
    let patch = json!({
        "name": "Negroni Sbagliato",
        "ingredients": [{"name": "Prosecco", "amount": "30 ml"}]
    })
    .to_string();
    let (status, _, body) = send_raw(
        addr,
        "PATCH",
        &format!("/api/cocktails/{id}"),
        &[("Cookie", &cookie)],
        Some(&patch),
    )
    .await;
    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).expect("patch json");
    assert_eq!(json["name"], "Negroni Sbagliato");
    assert_eq!(json["ingredients"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["ingredients"][0]["ingredient"]["name"], "Prosecco");

    // Patch without an ingredients key leaves links untouched.
    let patch = json!({"instructions": "Build in the glass."}).to_string();
    let (status, _, body) = send_raw(
        addr,
        "PATCH",
        &format!("/api/cocktails/{id}"),
        &[("Cookie", &cookie)],
        Some(&patch),
    )
    .await;
    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).expect("patch json");
    assert_eq!(json["ingredients"].as_array().map(Vec::len), Some(1));

    let (status, _, _) = send_raw(
        addr,
        "DELETE",
        &format!("/api/cocktails/{id}"),
        &[("Cookie", &cookie)],
        None,
    )
    .await;
    assert_eq!(status, 204);

    let (status, _, body) =
        send_raw(addr, "GET", &format!("/api/cocktails/{id}"), &[], None).await;
    assert_eq!(status, 404);
    let json: Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(json["error"], "NotFound");
}

#[tokio::test]
async fn reviews_carry_authors_but_no_back_edge() {
    let addr = spawn_server().await;
    let cookie = signup(addr, "ada").await;
    let created = create_cocktail(
        addr,
        &cookie,
        &json!({"name": "Daiquiri", "instructions": "Shake."}),
    )
    .await;
    let id = created["id"].as_i64().expect("cocktail id");

    let review = json!({"content": "Sharp and clean.", "rating": 5}).to_string();
    let (status, _, body) = send_raw(
        addr,
        "POST",
        &format!("/api/cocktails/{id}/reviews"),
        &[("Cookie", &cookie)],
        Some(&review),
    )
    .await;
    assert_eq!(status, 201);
    let json: Value = serde_json::from_str(&body).expect("review json");
    assert_eq!(json["rating"], 5);
    assert_eq!(json["user"]["username"], "ada");
    assert!(json.get("cocktail").is_none());
    assert!(json.get("cocktail_id").is_none());

    let (status, _, body) =
        send_raw(addr, "GET", &format!("/api/cocktails/{id}/reviews"), &[], None).await;
    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).expect("list json");
    assert_eq!(json.as_array().map(Vec::len), Some(1));

    let bad = json!({"content": "x", "rating": 6}).to_string();
    let (status, _, body) = send_raw(
        addr,
        "POST",
        &format!("/api/cocktails/{id}/reviews"),
        &[("Cookie", &cookie)],
        Some(&bad),
    )
    .await;
    assert_eq!(status, 422);
    let json: Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(json["error"], "ValidationError");
    assert_eq!(json["field"], "rating");
}

#[tokio::test]
async fn like_converges_and_profile_projects_liked_cocktails() {
    let addr = spawn_server().await;
    let cookie = signup(addr, "ada").await;
    let created = create_cocktail(
        addr,
        &cookie,
        &json!({"name": "Mojito", "instructions": "Muddle."}),
    )
    .await;
    let id = created["id"].as_i64().expect("cocktail id");

    for _ in 0..2 {
        let (status, _, body) = send_raw(
            addr,
            "POST",
            &format!("/api/cocktails/{id}/like"),
            &[("Cookie", &cookie)],
            None,
        )
        .await;
        assert_eq!(status, 200);
        let json: Value = serde_json::from_str(&body).expect("like json");
        assert_eq!(json["likes"], 1);
    }

    let (status, _, body) =
        send_raw(addr, "GET", "/api/profile", &[("Cookie", &cookie)], None).await;
    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).expect("profile json");
    assert_eq!(json["liked_cocktails"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["liked_cocktails"][0]["name"], "Mojito");
    assert!(json["liked_cocktails"][0].get("likes").is_none());

    let (status, _, body) = send_raw(
        addr,
        "POST",
        &format!("/api/cocktails/{id}/unlike"),
        &[("Cookie", &cookie)],
        None,
    )
    .await;
    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).expect("unlike json");
    assert_eq!(json["likes"], 0);
}
