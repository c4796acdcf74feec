use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use tinyledger_api::app::{self, AppServices};

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = app::build_app(AppServices::in_memory());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    async fn create_user(&self, first: &str, last: &str, email: &str) -> String {
        let res = self
            .post(
                "/users",
                json!({ "firstName": first, "lastName": last, "emailAddress": email }),
            )
            .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = res.json().await.unwrap();
        body["id"].as_str().unwrap().to_string()
    }

    async fn create_ledger_for(&self, name: &str, user_id: &str) -> String {
        let res = self
            .post("/ledgers", json!({ "name": name, "userId": user_id }))
            .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = res.json().await.unwrap();
        body["id"].as_str().unwrap().to_string()
    }

    async fn create_ledger(&self, name: &str) -> String {
        let user_id = self
            .create_user("Luke", "Skywalker", "luke@skywalker.com")
            .await;
        self.create_ledger_for(name, &user_id).await
    }

    async fn post_transaction(&self, ledger_id: &str, kind: &str, amount: i64) -> reqwest::Response {
        self.post(
            &format!("/ledgers/{ledger_id}/transactions"),
            json!({ "transactionType": kind, "amount": amount }),
        )
        .await
    }

    async fn balance(&self, ledger_id: &str) -> Value {
        let res = self.get(&format!("/ledgers/{ledger_id}/balance")).await;
        assert_eq!(res.status(), StatusCode::OK);
        res.json().await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    assert_eq!(srv.get("/health").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn creates_and_fetches_user() {
    let srv = TestServer::spawn().await;
    let id = srv.create_user("Obi-Wan", "Kenobi", "obi-wan@kenobi.com").await;

    let res = srv.get(&format!("/users/{id}")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["firstName"], "Obi-Wan");
    assert_eq!(body["emailAddress"], "obi-wan@kenobi.com");
}

#[tokio::test]
async fn user_validation_reports_fields() {
    let srv = TestServer::spawn().await;
    let res = srv
        .post(
            "/users",
            json!({ "firstName": "", "lastName": "Solo", "emailAddress": "not-an-email" }),
        )
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(body["message"], "Request body is invalid");
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["emailAddress", "firstName"]);
}

#[tokio::test]
async fn creates_ledger() {
    let srv = TestServer::spawn().await;
    let user_id = srv.create_user("Obi-Wan", "Kenobi", "obi-wan@kenobi.com").await;
    let id = srv.create_ledger_for("New Ledger", &user_id).await;
    assert!(Uuid::parse_str(&id).is_ok());
}

#[tokio::test]
async fn blank_ledger_name_is_bad_request() {
    let srv = TestServer::spawn().await;
    let res = srv
        .post(
            "/ledgers",
            json!({ "name": "", "userId": Uuid::now_v7().to_string() }),
        )
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["details"][0]["field"], "name");
    assert_eq!(body["details"][0]["messages"][0], "Ledger name is required");
}

#[tokio::test]
async fn ledger_for_unknown_user_is_not_found() {
    let srv = TestServer::spawn().await;
    let res = srv
        .post(
            "/ledgers",
            json!({ "name": "Test Ledger", "userId": Uuid::now_v7().to_string() }),
        )
        .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "ENTITY_NOT_FOUND");
}

#[tokio::test]
async fn lists_and_fetches_ledgers() {
    let srv = TestServer::spawn().await;
    let id = srv.create_ledger("New Ledger").await;

    let res = srv.get("/ledgers").await;
    assert_eq!(res.status(), StatusCode::OK);
    let list: Value = res.json().await.unwrap();
    assert_eq!(list[0]["id"], id.as_str());
    assert_eq!(list[0]["name"], "New Ledger");

    let res = srv.get(&format!("/ledgers/{id}")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let ledger: Value = res.json().await.unwrap();
    assert_eq!(ledger["id"], id.as_str());
    assert_eq!(ledger["name"], "New Ledger");
}

#[tokio::test]
async fn unknown_ledger_is_not_found() {
    let srv = TestServer::spawn().await;
    let id = Uuid::now_v7();

    for path in [
        format!("/ledgers/{id}"),
        format!("/ledgers/{id}/balance"),
        format!("/ledgers/{id}/transactions"),
    ] {
        assert_eq!(srv.get(&path).await.status(), StatusCode::NOT_FOUND, "{path}");
    }
    let res = srv.post_transaction(&id.to_string(), "DEPOSIT", 10).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_ids_are_bad_request() {
    let srv = TestServer::spawn().await;
    assert_eq!(
        srv.get("/ledgers/not-a-uuid").await.status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        srv.get("/ledgers?userId=not-a-uuid").await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn deposit_then_withdraw_updates_balance() {
    let srv = TestServer::spawn().await;
    let id = srv.create_ledger("New Ledger").await;

    let res = srv.post_transaction(&id, "DEPOSIT", 1000).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    assert!(created["id"].is_string());
    assert_eq!(srv.balance(&id).await["balance"], 1000);

    let res = srv.post_transaction(&id, "WITHDRAW", 300).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let balance = srv.balance(&id).await;
    assert_eq!(balance["ledgerId"], id.as_str());
    assert_eq!(balance["balance"], 700);
}

#[tokio::test]
async fn overdraft_is_bad_request_and_not_recorded() {
    let srv = TestServer::spawn().await;
    let id = srv.create_ledger("New Ledger").await;
    srv.post_transaction(&id, "DEPOSIT", 100).await;

    let res = srv.post_transaction(&id, "WITHDRAW", 300).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "INVALID_MONEY_OPERATION");
    assert_eq!(
        body["message"],
        "Insufficient funds. Balance: 100. Withdraw amount: 300"
    );

    assert_eq!(srv.balance(&id).await["balance"], 100);
    let history: Value = srv
        .get(&format!("/ledgers/{id}/transactions"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn non_positive_amounts_are_bad_request() {
    let srv = TestServer::spawn().await;
    let id = srv.create_ledger("New Ledger").await;

    for amount in [0, -1000] {
        let res = srv.post_transaction(&id, "DEPOSIT", amount).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["details"][0]["field"], "amount");
    }
}

#[tokio::test]
async fn unknown_transaction_type_is_bad_request() {
    let srv = TestServer::spawn().await;
    let id = srv.create_ledger("New Ledger").await;

    let res = srv.post_transaction(&id, "TRANSFER", 10).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let srv = TestServer::spawn().await;
    let res = srv
        .client
        .post(srv.url("/users"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn transaction_history_has_full_records() {
    let srv = TestServer::spawn().await;
    let id = srv.create_ledger("New Ledger").await;
    srv.post_transaction(&id, "DEPOSIT", 1000).await;

    let res = srv.get(&format!("/ledgers/{id}/transactions")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let history: Value = res.json().await.unwrap();
    let items = history.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["type"], "DEPOSIT");
    assert_eq!(items[0]["amount"], 1000);
    assert_eq!(items[0]["ledgerId"], id.as_str());
    assert!(items[0]["occurredAt"].is_string());
}

#[tokio::test]
async fn repeated_postings_keep_running_balance() {
    let srv = TestServer::spawn().await;
    let id = srv.create_ledger("New Ledger").await;

    for _ in 0..3 {
        assert_eq!(
            srv.post_transaction(&id, "DEPOSIT", 1000).await.status(),
            StatusCode::CREATED
        );
    }
    for _ in 0..3 {
        assert_eq!(
            srv.post_transaction(&id, "WITHDRAW", 300).await.status(),
            StatusCode::CREATED
        );
    }

    let balance = srv.balance(&id).await;
    assert_eq!(balance["ledgerId"], id.as_str());
    assert_eq!(balance["balance"], 1000 * 3 - 300 * 3);
}

#[tokio::test]
async fn withdrawing_exact_balance_reaches_zero() {
    let srv = TestServer::spawn().await;
    let id = srv.create_ledger("Test Ledger").await;
    srv.post_transaction(&id, "DEPOSIT", 1000).await;

    let res = srv.post_transaction(&id, "WITHDRAW", 1000).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(srv.balance(&id).await["balance"], 0);
}

#[tokio::test]
async fn mixed_postings_are_all_listed() {
    let srv = TestServer::spawn().await;
    let id = srv.create_ledger("Multi-transaction Ledger").await;

    for (kind, amount) in [
        ("DEPOSIT", 500),
        ("WITHDRAW", 200),
        ("DEPOSIT", 300),
        ("WITHDRAW", 150),
    ] {
        assert_eq!(
            srv.post_transaction(&id, kind, amount).await.status(),
            StatusCode::CREATED
        );
    }

    assert_eq!(srv.balance(&id).await["balance"], 450);
    let history: Value = srv
        .get(&format!("/ledgers/{id}/transactions"))
        .await
        .json()
        .await
        .unwrap();
    let kinds: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["DEPOSIT", "WITHDRAW", "DEPOSIT", "WITHDRAW"]);
}

#[tokio::test]
async fn filters_ledgers_by_user() {
    let srv = TestServer::spawn().await;
    let luke = srv.create_user("Luke", "Skywalker", "luke@example.com").await;
    let leia = srv.create_user("Leia", "Organa", "leia@example.com").await;
    let han = srv.create_user("Han", "Solo", "han@example.com").await;

    srv.create_ledger_for("Luke's Ledger 1", &luke).await;
    srv.create_ledger_for("Luke's Ledger 2", &luke).await;
    srv.create_ledger_for("Leia's Ledger", &leia).await;

    let lukes: Value = srv
        .get(&format!("/ledgers?userId={luke}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(lukes.as_array().unwrap().len(), 2);

    let hans: Value = srv
        .get(&format!("/ledgers?userId={han}"))
        .await
        .json()
        .await
        .unwrap();
    assert!(hans.as_array().unwrap().is_empty());

    let all: Value = srv.get("/ledgers").await.json().await.unwrap();
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn concurrent_deposits_over_http_are_not_lost() {
    let srv = TestServer::spawn().await;
    let id = srv.create_ledger("Busy Ledger").await;
    let url = srv.url(&format!("/ledgers/{id}/transactions"));

    let handles: Vec<_> = (0..50)
        .map(|_| {
            let client = srv.client.clone();
            let url = url.clone();
            tokio::spawn(async move {
                client
                    .post(url)
                    .json(&json!({ "transactionType": "DEPOSIT", "amount": 10 }))
                    .send()
                    .await
                    .unwrap()
                    .status()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::CREATED);
    }
    assert_eq!(srv.balance(&id).await["balance"], 500);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let srv = TestServer::spawn().await;
    let res = srv.get("/nope").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "ROUTE_NOT_FOUND");
}

#[tokio::test]
async fn undecodable_path_ids_get_json_errors() {
    let srv = TestServer::spawn().await;

    for path in ["/ledgers/%FF", "/ledgers/%FF/balance", "/users/%FF"] {
        let res = srv.get(path).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{path}");
        let content_type = res.headers()["content-type"].to_str().unwrap().to_string();
        assert!(content_type.starts_with("application/json"), "{path}");
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["code"], "BAD_REQUEST");
        assert!(body["details"].as_array().unwrap().is_empty());
    }
}

#[tokio::test]
async fn email_with_two_at_signs_is_rejected() {
    let srv = TestServer::spawn().await;
    let res = srv
        .post(
            "/users",
            json!({ "firstName": "a", "lastName": "b", "emailAddress": "a@b@c.com" }),
        )
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["details"][0]["field"], "emailAddress");
}

#[tokio::test]
async fn body_without_json_content_type_is_unsupported() {
    let srv = TestServer::spawn().await;
    let res = srv
        .client
        .post(srv.url("/users"))
        .body(r#"{"firstName":"Han","lastName":"Solo"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn missing_user_id_is_reported_per_field() {
    let srv = TestServer::spawn().await;
    let res = srv.post("/ledgers", json!({ "name": "Savings" })).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Request body is invalid");
    assert_eq!(
        body["details"],
        json!([{ "field": "userId", "messages": ["must not be null"] }])
    );
}

#[tokio::test]
async fn missing_transaction_type_is_reported_per_field() {
    let srv = TestServer::spawn().await;
    let id = srv.create_ledger("New Ledger").await;

    let res = srv
        .post(
            &format!("/ledgers/{id}/transactions"),
            json!({ "amount": 100 }),
        )
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body["details"],
        json!([{ "field": "transactionType", "messages": ["must not be null"] }])
    );
    assert_eq!(srv.balance(&id).await["balance"], 0);
}

#[tokio::test]
async fn balance_overflow_is_invalid_money_operation() {
    let srv = TestServer::spawn().await;
    let id = srv.create_ledger("New Ledger").await;

    let res = srv.post_transaction(&id, "DEPOSIT", i64::MAX).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = srv.post_transaction(&id, "DEPOSIT", i64::MAX).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "INVALID_MONEY_OPERATION");
    assert_eq!(
        body["message"],
        format!("Amount overflow: {} + {}", i64::MAX, i64::MAX)
    );
    assert_eq!(srv.balance(&id).await["balance"], i64::MAX);
}

#[tokio::test]
async fn wrong_method_on_known_route_is_method_not_allowed() {
    let srv = TestServer::spawn().await;
    let id = srv.create_ledger("New Ledger").await;

    let res = srv
        .post(&format!("/ledgers/{id}/balance"), json!({}))
        .await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "METHOD_NOT_ALLOWED");

    let res = srv.client.delete(srv.url("/users")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "METHOD_NOT_ALLOWED");
}
