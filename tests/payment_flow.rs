mod common;

use common::{app_with, create_request, ipn_request, lookup_request, send, ADMIN_KEY, IPN_URL};
use coinpay_gateway::gateways::mock::MockGateway;
use coinpay_gateway::repo::payment_store::PaymentStore;
use rust_decimal_macros::dec;

const FORM: &str = "application/x-www-form-urlencoded";

#[tokio::test]
async fn checkout_then_confirmed_notification() {
    let app = app_with(MockGateway::new("ALWAYS_SUCCESS").with_fixed_txn_id("T1"));

    let (status, body) = send(
        &app.router,
        create_request(r#"{"amount":"10.50","currency":"USDT","itemName":"Sub","email":"a@b.com"}"#),
    )
    .await;
    assert_eq!(status, 200);
    let payload: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(payload["result"]["txn_id"], "T1");
    assert!(payload["result"]["checkout_url"].is_string());
    assert_eq!(app.gateway.last_request().unwrap().ipn_url, IPN_URL);

    let before = app.store.find_by_txn_id("T1").await.unwrap().unwrap();
    assert_eq!(before.status, "pending");
    assert_eq!(before.amount, dec!(10.50));

    let ipn = b"ipn_version=1.0&ipn_type=api&merchant=merchant-1&txn_id=T1&status=complete";
    let sig = app.verifier.sign(ipn);
    let (status, body) = send(&app.router, ipn_request(ipn, FORM, Some(sig.as_str()))).await;
    assert_eq!(status, 200);
    assert_eq!(body, "OK");

    let after = app.store.find_by_txn_id("T1").await.unwrap().unwrap();
    assert_eq!(after.status, "complete");
    assert_eq!(after.id, before.id);
    assert_eq!(after.amount, before.amount);
    assert_eq!(after.currency, before.currency);
    assert_eq!(after.email, before.email);
    assert_eq!(after.created_at, before.created_at);
}

#[tokio::test]
async fn forged_notification_is_rejected() {
    let app = app_with(MockGateway::new("ALWAYS_SUCCESS").with_fixed_txn_id("T1"));
    send(&app.router, create_request(r#"{"amount":"5","email":"a@b.com"}"#)).await;

    let ipn = b"txn_id=T1&status=complete";
    let forged = coinpay_gateway::service::ipn_verifier::IpnVerifier::new("guess").sign(ipn);

    let (status, body) = send(&app.router, ipn_request(ipn, FORM, Some(forged.as_str()))).await;
    assert_eq!(status, 403);
    assert_eq!(body, "Invalid IPN");

    let (status, _) = send(&app.router, ipn_request(ipn, FORM, None)).await;
    assert_eq!(status, 403);

    let signed_other = app.verifier.sign(b"txn_id=T1&status=pending");
    let (status, _) = send(&app.router, ipn_request(ipn, FORM, Some(signed_other.as_str()))).await;
    assert_eq!(status, 403);

    assert_eq!(app.store.find_by_txn_id("T1").await.unwrap().unwrap().status, "pending");
}

#[tokio::test]
async fn signature_covers_raw_json_bytes() {
    let app = app_with(MockGateway::new("ALWAYS_SUCCESS").with_fixed_txn_id("T7"));
    send(&app.router, create_request(r#"{"amount":"1.25","email":"a@b.com"}"#)).await;

    // Spacing and key order a JSON round trip would not reproduce.
    let ipn = b"{ \"status\" : \"complete\",\n  \"transactionId\":\"T7\" }";
    let sig = app.verifier.sign(ipn).to_uppercase();
    let (status, _) = send(&app.router, ipn_request(ipn, "application/json", Some(sig.as_str()))).await;
    assert_eq!(status, 200);
    assert_eq!(app.store.find_by_txn_id("T7").await.unwrap().unwrap().status, "complete");
}

#[tokio::test]
async fn notification_for_unknown_transaction_is_acknowledged() {
    let app = app_with(MockGateway::new("ALWAYS_SUCCESS").with_fixed_txn_id("T1"));
    send(&app.router, create_request(r#"{"amount":"5","email":"a@b.com"}"#)).await;

    let ipn = b"txn_id=NEVER_SEEN&status=complete";
    let sig = app.verifier.sign(ipn);
    let (status, body) = send(&app.router, ipn_request(ipn, FORM, Some(sig.as_str()))).await;
    assert_eq!(status, 200);
    assert_eq!(body, "OK");
    assert_eq!(app.store.len().await, 1);
    assert_eq!(app.store.find_by_txn_id("T1").await.unwrap().unwrap().status, "pending");
}

#[tokio::test]
async fn verified_but_unreadable_notification_is_bad_request() {
    let app = app_with(MockGateway::new("ALWAYS_SUCCESS"));
    let ipn = b"status=complete";
    let sig = app.verifier.sign(ipn);
    let (status, _) = send(&app.router, ipn_request(ipn, FORM, Some(sig.as_str()))).await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn invalid_create_request_never_reaches_processor() {
    let app = app_with(MockGateway::new("ALWAYS_SUCCESS"));

    for body in [
        r#"{"amount":"10"}"#,
        r#"{"email":"a@b.com"}"#,
        r#"{"amount":"ten","email":"a@b.com"}"#,
        r#"{"amount":"-1","email":"a@b.com"}"#,
        r#"not json"#,
    ] {
        let (status, resp) = send(&app.router, create_request(body)).await;
        assert_eq!(status, 400, "body {body} gave {resp}");
        let v: serde_json::Value = serde_json::from_str(&resp).unwrap();
        assert_eq!(v["error"]["code"], "INVALID_REQUEST");
    }

    assert_eq!(app.gateway.calls(), 0);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn processor_failure_is_generic_server_error() {
    let app = app_with(MockGateway::new("ALWAYS_FAILURE"));

    let (status, body) = send(&app.router, create_request(r#"{"amount":"10","email":"a@b.com"}"#)).await;
    assert_eq!(status, 500);
    let v: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v["error"]["message"], "Failed to create transaction");
    assert!(!body.contains("mock decline"));
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn duplicate_processor_id_is_generic_server_error() {
    let app = app_with(MockGateway::new("ALWAYS_SUCCESS").with_fixed_txn_id("SAME"));

    let (first, _) = send(&app.router, create_request(r#"{"amount":"10","email":"a@b.com"}"#)).await;
    let (second, body) = send(&app.router, create_request(r#"{"amount":"11","email":"c@d.com"}"#)).await;
    assert_eq!(first, 200);
    assert_eq!(second, 500);
    assert!(body.contains("Failed to create transaction"));
    assert_eq!(app.store.len().await, 1);
    assert_eq!(app.store.find_by_txn_id("SAME").await.unwrap().unwrap().amount, dec!(10));
}

#[tokio::test]
async fn internal_lookup_requires_key() {
    let app = app_with(MockGateway::new("ALWAYS_SUCCESS").with_fixed_txn_id("T1"));
    send(&app.router, create_request(r#"{"amount":"10.50","email":"a@b.com"}"#)).await;

    let (status, body) = send(&app.router, lookup_request("T1", None)).await;
    assert_eq!(status, 401);
    let v: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v["error"]["code"], "UNAUTHORIZED");
    assert!(!body.contains(ADMIN_KEY));
    let (status, _) = send(&app.router, lookup_request("T1", Some("wrong"))).await;
    assert_eq!(status, 401);

    let (status, body) = send(&app.router, lookup_request("T1", Some(ADMIN_KEY))).await;
    assert_eq!(status, 200);
    let v: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v["txn_id"], "T1");
    assert_eq!(v["status"], "pending");
    assert_eq!(v["email"], "a@b.com");

    let (status, _) = send(&app.router, lookup_request("missing", Some(ADMIN_KEY))).await;
    assert_eq!(status, 404);
}
