use serde_json::json;

use crate::common::{TestApp, routes};

mod verify_by_id {
    use super::*;

    #[tokio::test]
    async fn issued_certificate_is_valid() {
        let app = TestApp::spawn().await;
        let id = app.issue_birth().await;

        let res = app.get(&routes::verify(&id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["valid"], true);
        assert_eq!(res.body["certificate_id"], id.as_str());
        assert_eq!(res.body["category"], "birth");
        assert_eq!(res.body["full_name"], "Jane Doe");
        assert_eq!(res.body["date_of_birth"], "01.02.1990");
        assert!(res.body.get("reason").is_none());
    }

    #[tokio::test]
    async fn unknown_id_is_invalid_not_error() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::verify("BC-2099-999")).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["valid"], false);
        assert_eq!(res.body["reason"], "not_found");
        assert!(res.body.get("full_name").is_none());
    }

    #[tokio::test]
    async fn malformed_id_is_invalid() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::verify("not-a-certificate")).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["valid"], false);
        assert_eq!(res.body["certificate_id"], "not-a-certificate");
    }

    #[tokio::test]
    async fn repeated_lookups_agree() {
        let app = TestApp::spawn().await;
        let id = app.issue_birth().await;

        let first = app.get(&routes::verify(&id)).await;
        let second = app.get(&routes::verify(&id)).await;

        assert_eq!(first.body, second.body);
    }
}

mod verify_payload {
    use super::*;

    #[tokio::test]
    async fn scanned_payload_is_valid() {
        let app = TestApp::spawn().await;
        let created = app.create_certificate("birth", &crate::common::jane_doe()).await;
        let payload = created.body["qr_payload"].as_str().unwrap();

        let res = app
            .post_json(routes::VERIFY_PAYLOAD, &json!({ "payload": payload }))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["valid"], true);
        assert_eq!(res.body["certificate_id"], created.body["id"]);
    }

    #[tokio::test]
    async fn edited_name_is_an_identity_mismatch() {
        let app = TestApp::spawn().await;
        let created = app.create_certificate("birth", &crate::common::jane_doe()).await;
        let forged = created.body["qr_payload"]
            .as_str()
            .unwrap()
            .replace("Name: Jane Doe", "Name: John Doe");

        let res = app
            .post_json(routes::VERIFY_PAYLOAD, &json!({ "payload": forged }))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["valid"], false);
        assert_eq!(res.body["reason"], "identity_mismatch");
    }

    #[tokio::test]
    async fn forged_integrity_tag_is_rejected() {
        let app = TestApp::spawn().await;
        let created = app.create_certificate("birth", &crate::common::jane_doe()).await;
        let payload = created.body["qr_payload"].as_str().unwrap();
        let (body, _) = payload.rsplit_once("\nIntegrity: ").unwrap();
        let forged = format!("{body}\nIntegrity: {}", "0".repeat(32));

        let res = app
            .post_json(routes::VERIFY_PAYLOAD, &json!({ "payload": forged }))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["valid"], false);
        assert_eq!(res.body["reason"], "integrity_mismatch");
    }

    #[tokio::test]
    async fn payload_for_unknown_certificate_is_not_found() {
        let app = TestApp::spawn().await;
        let payload = "Certificate ID: BC-2099-999\n\
                       Type: Birth Certificate\n\
                       Issued by: Embassy of Afghanistan Berlin\n\
                       Name: Jane Doe\n\
                       DOB: 01.02.1990\n\
                       Verify at: https://consulate.test/verify/BC-2099-999";

        let res = app
            .post_json(routes::VERIFY_PAYLOAD, &json!({ "payload": payload }))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["valid"], false);
        assert_eq!(res.body["reason"], "not_found");
    }

    #[tokio::test]
    async fn unreadable_payload_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(routes::VERIFY_PAYLOAD, &json!({ "payload": "hello world" }))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn missing_payload_field_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.post_json(routes::VERIFY_PAYLOAD, &json!({})).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_code(), "VALIDATION_ERROR");
    }
}

mod verify_page {
    use super::*;

    #[tokio::test]
    async fn valid_certificate_renders_summary() {
        let app = TestApp::spawn().await;
        let id = app.issue_birth().await;

        let res = app.get(&routes::verify_page(&id)).await;

        assert_eq!(res.status, 200);
        assert!(res.content_type.unwrap().starts_with("text/plain"));
        assert_eq!(
            res.text.lines().next().unwrap(),
            format!("Certificate {id} is VALID.")
        );
        assert!(res.text.contains("Name: Jane Doe"));
        assert!(res.text.contains("DOB: 01.02.1990"));
    }

    #[tokio::test]
    async fn unknown_certificate_is_404() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::verify_page("BC-2099-999")).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.text, "Certificate BC-2099-999 is INVALID or not found");
    }
}
