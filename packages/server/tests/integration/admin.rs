use crate::common::{ADMIN_TOKEN, FilePart, TestApp, expected_id, jane_doe, routes};

mod reset {
    use super::*;

    #[tokio::test]
    async fn requires_token() {
        let app = TestApp::spawn().await;

        let res = app.post_without_token(routes::ADMIN_RESET).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.error_code(), "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn rejects_wrong_token() {
        let app = TestApp::spawn().await;

        let res = app.post_with_token(routes::ADMIN_RESET, "guess").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.error_code(), "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn disabled_without_configured_token() {
        let app = TestApp::spawn_with(|config| config.admin.token = None).await;

        let res = app.post_with_token(routes::ADMIN_RESET, ADMIN_TOKEN).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.error_code(), "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn wipes_records_and_uploads() {
        let app = TestApp::spawn().await;
        app.issue_birth().await;
        let with_photo = app
            .create_certificate_with_files(
                "birth",
                &jane_doe(),
                vec![FilePart {
                    field: "photo",
                    filename: "portrait.png",
                    bytes: b"png".to_vec(),
                }],
            )
            .await;
        let photo_url = with_photo.body["uploads"][0]["url"]
            .as_str()
            .unwrap()
            .to_string();

        let res = app.post_with_token(routes::ADMIN_RESET, ADMIN_TOKEN).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["certificates_deleted"], 2);
        assert_eq!(res.body["uploads_deleted"], 1);

        let stats = app.get(routes::CERTIFICATE_STATS).await;
        assert_eq!(stats.body["total"], 0);
        assert_eq!(app.get(&photo_url).await.status, 404);

        let verify = app.get(&routes::verify(&expected_id("BC", 1))).await;
        assert_eq!(verify.body["valid"], false);

        // Sequence numbers start over.
        assert_eq!(app.issue_birth().await, expected_id("BC", 1));
    }

    #[tokio::test]
    async fn upload_failure_keeps_records() {
        let app = TestApp::spawn().await;
        let id = app.issue_birth().await;
        std::fs::remove_dir_all(&app.upload_dir).unwrap();

        let res = app.post_with_token(routes::ADMIN_RESET, ADMIN_TOKEN).await;

        assert_eq!(res.status, 500);
        assert_eq!(res.error_code(), "INTERNAL_ERROR");
        let verify = app.get(&routes::verify(&id)).await;
        assert_eq!(verify.body["valid"], true);
    }
}

#[tokio::test]
async fn health_check() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::HEALTH).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["status"], "ok");
}
