use consular_server::entity::certificate_upload;
use sea_orm::{EntityTrait, PaginatorTrait};

use crate::common::{FilePart, MAX_UPLOAD_SIZE, TestApp, expected_id, jane_doe, routes};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot really an image";

mod supporting_documents {
    use super::*;

    #[tokio::test]
    async fn photo_and_id_card_are_stored_and_served() {
        let app = TestApp::spawn().await;

        let res = app
            .create_certificate_with_files(
                "birth",
                &jane_doe(),
                vec![
                    FilePart {
                        field: "photo",
                        filename: "portrait.png",
                        bytes: PNG_BYTES.to_vec(),
                    },
                    FilePart {
                        field: "id_card",
                        filename: "My Tazkira.JPG",
                        bytes: b"jpeg".to_vec(),
                    },
                ],
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        let id = expected_id("BC", 1);
        let uploads = res.body["uploads"].as_array().unwrap();
        assert_eq!(uploads.len(), 2);

        let photo = uploads.iter().find(|u| u["role"] == "photo").unwrap();
        assert_eq!(photo["reference"], format!("{id}_photo_portrait.png"));
        assert_eq!(photo["filename"], "portrait.png");
        assert_eq!(photo["content_type"], "image/png");
        assert_eq!(photo["size"], PNG_BYTES.len());

        let (status, content_type, bytes) = app.get_bytes(photo["url"].as_str().unwrap()).await;
        assert_eq!(status, 200);
        assert_eq!(content_type.as_deref(), Some("image/png"));
        assert_eq!(bytes, PNG_BYTES);

        let id_card = uploads.iter().find(|u| u["role"] == "id_card").unwrap();
        assert_eq!(id_card["reference"], format!("{id}_id_card_My_Tazkira.JPG"));
        assert_eq!(id_card["content_type"], "image/jpeg");

        // Lookups include the documents too.
        let fetched = app.get(&routes::certificate(&id)).await;
        assert_eq!(fetched.body["uploads"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn disallowed_file_type_is_skipped() {
        let app = TestApp::spawn().await;

        let res = app
            .create_certificate_with_files(
                "birth",
                &jane_doe(),
                vec![FilePart {
                    field: "photo",
                    filename: "payload.exe",
                    bytes: b"MZ".to_vec(),
                }],
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["uploads"].as_array().unwrap().len(), 0);
        let rows = certificate_upload::Entity::find()
            .count(&app.db)
            .await
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn empty_file_part_is_ignored() {
        let app = TestApp::spawn().await;

        let res = app
            .create_certificate_with_files(
                "birth",
                &jane_doe(),
                vec![FilePart {
                    field: "photo",
                    filename: "",
                    bytes: Vec::new(),
                }],
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["uploads"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn oversized_file_rejects_the_form() {
        let app = TestApp::spawn().await;

        let res = app
            .create_certificate_with_files(
                "birth",
                &jane_doe(),
                vec![FilePart {
                    field: "photo",
                    filename: "huge.png",
                    bytes: vec![0u8; MAX_UPLOAD_SIZE as usize + 1],
                }],
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_code(), "VALIDATION_ERROR");

        // Nothing was issued.
        let stats = app.get(routes::CERTIFICATE_STATS).await;
        assert_eq!(stats.body["total"], 0);
    }
}

mod serve_upload {
    use super::*;

    #[tokio::test]
    async fn unknown_reference_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get("/uploads/BC-2099-999_photo_missing.png").await;

        assert_eq!(res.status, 404);
        assert_eq!(res.error_code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn path_escapes_are_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get("/uploads/..%2Ftest.db").await;

        assert_eq!(res.status, 404);
    }
}
