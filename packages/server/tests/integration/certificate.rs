use crate::common::{TestApp, expected_id, jane_doe, routes};

mod create_certificate {
    use super::*;

    #[tokio::test]
    async fn issues_birth_certificate_with_artifacts() {
        let app = TestApp::spawn().await;

        let res = app.create_certificate("birth", &jane_doe()).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.id(), expected_id("BC", 1));
        assert_eq!(res.body["category"], "birth");
        assert_eq!(res.body["document_type"], "Birth Certificate");
        assert_eq!(res.body["status"], "completed");
        assert_eq!(res.body["identity"]["full_name"], "Jane Doe");
        assert_eq!(res.body["identity"]["date_of_birth"], "01.02.1990");
        assert_eq!(res.body["fields"]["place_of_birth"], "Kabul");
        assert!(!res.body["qr_artifact"].as_str().unwrap().is_empty());
        assert!(!res.body["barcode_artifact"].as_str().unwrap().is_empty());

        let payload = res.body["qr_payload"].as_str().unwrap();
        let id = res.id();
        assert!(payload.starts_with(&format!("Certificate ID: {id}\n")));
        assert!(payload.contains("\nName: Jane Doe\n"));
        assert!(payload.contains(&format!(
            "\nVerify at: https://consulate.test/verify/{id}"
        )));
        assert!(payload.contains("\nIntegrity: "));
    }

    #[tokio::test]
    async fn sequence_is_per_category() {
        let app = TestApp::spawn().await;

        let b1 = app.create_certificate("birth", &jane_doe()).await;
        let b2 = app.create_certificate("birth", &jane_doe()).await;
        let c1 = app
            .create_certificate(
                "celibacy",
                &[
                    ("full_name", "Mohammad Hassan"),
                    ("birth_day", "3"),
                    ("birth_month", "4"),
                    ("birth_year", "1985"),
                    ("purpose", "Marriage abroad"),
                ],
            )
            .await;

        assert_eq!(b1.id(), expected_id("BC", 1));
        assert_eq!(b2.id(), expected_id("BC", 2));
        assert_eq!(c1.status, 201, "{}", c1.text);
        assert_eq!(c1.id(), expected_id("CC", 1));
        assert_eq!(c1.body["identity"]["date_of_birth"], "03.04.1985");
        assert_eq!(c1.body["document_type"], "Celibacy Certificate");
    }

    #[tokio::test]
    async fn marriage_joins_both_parties() {
        let app = TestApp::spawn().await;

        let res = app
            .create_certificate(
                "MC",
                &[
                    ("husband_family_name", "Karimi"),
                    ("husband_given_name", "Ahmad"),
                    ("husband_date_of_birth", "1988-01-01"),
                    ("wife_family_name", "Rahimi"),
                    ("wife_given_name", "Laila"),
                    ("wife_date_of_birth", "05.06.1991"),
                    ("marriage_place", "Berlin"),
                ],
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.id(), expected_id("MC", 1));
        assert_eq!(
            res.body["identity"]["full_name"],
            "Ahmad Karimi & Laila Rahimi"
        );
        assert_eq!(
            res.body["identity"]["date_of_birth"],
            "01.01.1988 & 05.06.1991"
        );
    }

    #[tokio::test]
    async fn missing_required_field_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .create_certificate(
                "birth",
                &[("given_name", "Jane"), ("date_of_birth", "01.02.1990")],
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_code(), "VALIDATION_ERROR");
        assert!(res.body["message"].as_str().unwrap().contains("family_name"));

        // A rejected form does not consume a sequence number.
        let next = app.create_certificate("birth", &jane_doe()).await;
        assert_eq!(next.id(), expected_id("BC", 1));
    }

    #[tokio::test]
    async fn malformed_date_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .create_certificate(
                "birth",
                &[
                    ("family_name", "Doe"),
                    ("given_name", "Jane"),
                    ("date_of_birth", "yesterday"),
                ],
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error_code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unknown_or_missing_category_is_rejected() {
        let app = TestApp::spawn().await;

        let unknown = app.create_certificate("death", &jane_doe()).await;
        assert_eq!(unknown.status, 400);
        assert_eq!(unknown.error_code(), "VALIDATION_ERROR");

        let form = reqwest::multipart::Form::new().text("family_name", "Doe");
        let res = app
            .client
            .post(app.url(routes::CERTIFICATES))
            .multipart(form)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 400);
    }

    #[tokio::test]
    async fn concurrent_requests_get_distinct_ids() {
        let app = TestApp::spawn().await;

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..12 {
            let client = app.client.clone();
            let url = app.url(routes::CERTIFICATES);
            tasks.spawn(async move {
                let form = crate::common::certificate_form("birth", &jane_doe(), Vec::new());
                let res = client.post(url).multipart(form).send().await.unwrap();
                assert_eq!(res.status().as_u16(), 201);
                let body: serde_json::Value = res.json().await.unwrap();
                body["id"].as_str().unwrap().to_string()
            });
        }

        let mut ids = Vec::new();
        while let Some(id) = tasks.join_next().await {
            ids.push(id.unwrap());
        }
        ids.sort();

        let expected: Vec<String> = (1..=12).map(|n| expected_id("BC", n)).collect();
        assert_eq!(ids, expected);
    }
}

mod get_certificate {
    use super::*;

    #[tokio::test]
    async fn returns_stored_record() {
        let app = TestApp::spawn().await;
        let created = app.create_certificate("birth", &jane_doe()).await;
        let id = created.id();

        let res = app.get(&routes::certificate(&id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.id(), id);
        assert_eq!(res.body["qr_payload"], created.body["qr_payload"]);
        assert_eq!(res.body["qr_artifact"], created.body["qr_artifact"]);
        assert_eq!(res.body["barcode_artifact"], created.body["barcode_artifact"]);
        assert_eq!(res.body["issued_at"], created.body["issued_at"]);
        assert_eq!(res.body["uploads"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::certificate("BC-2099-999")).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.error_code(), "NOT_FOUND");
    }
}

mod list_certificates {
    use super::*;

    async fn seed(app: &TestApp) {
        for _ in 0..3 {
            app.issue_birth().await;
        }
        let res = app
            .create_certificate(
                "celibacy",
                &[("full_name", "Mohammad Hassan"), ("date_of_birth", "1985-04-03")],
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let app = TestApp::spawn().await;
        seed(&app).await;

        let res = app.get(routes::CERTIFICATES).await;

        assert_eq!(res.status, 200);
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 4);
        assert_eq!(data[0]["id"], expected_id("CC", 1));
        assert_eq!(data[1]["id"], expected_id("BC", 3));
        assert_eq!(data[0]["full_name"], "Mohammad Hassan");
        assert_eq!(data[0]["has_qr"], true);
        assert!(data[0].get("qr_artifact").is_none());
        assert_eq!(res.body["pagination"]["total"], 4);
    }

    #[tokio::test]
    async fn filters_by_category_and_paginates() {
        let app = TestApp::spawn().await;
        seed(&app).await;

        let res = app
            .get(&format!(
                "{}?category=birth&page=2&per_page=2",
                routes::CERTIFICATES
            ))
            .await;

        assert_eq!(res.status, 200);
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["id"], expected_id("BC", 1));
        assert_eq!(res.body["pagination"]["total"], 3);
        assert_eq!(res.body["pagination"]["total_pages"], 2);
        assert_eq!(res.body["pagination"]["page"], 2);
    }

    #[tokio::test]
    async fn stats_count_each_category() {
        let app = TestApp::spawn().await;
        seed(&app).await;

        let res = app.get(routes::CERTIFICATE_STATS).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["birth"], 3);
        assert_eq!(res.body["marriage"], 0);
        assert_eq!(res.body["celibacy"], 1);
        assert_eq!(res.body["total"], 4);
    }
}
