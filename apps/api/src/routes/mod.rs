pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::assist::handlers as assist;
use crate::resume::handlers as resumes;
use crate::resume::validation::MAX_PHOTO_BYTES;
use crate::state::AppState;

/// Headroom over the photo limit for the `resume` JSON part and multipart framing.
const SAVE_BODY_LIMIT: usize = MAX_PHOTO_BYTES + 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resumes
        .route(
            "/api/v1/resumes",
            get(resumes::handle_list)
                .post(resumes::handle_save)
                .layer(DefaultBodyLimit::max(SAVE_BODY_LIMIT)),
        )
        .route("/api/v1/resumes/preview", post(resumes::handle_preview))
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get).delete(resumes::handle_delete),
        )
        .route("/api/v1/resumes/:id/print", get(resumes::handle_print))
        // AI assist
        .route("/api/v1/assist/summary", post(assist::handle_summary))
        .route(
            "/api/v1/assist/work-experience",
            post(assist::handle_work_experience),
        )
        .route("/api/v1/assist/project", post(assist::handle_project))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_state, token_for, ScriptedCompletion, TEST_JWT_SECRET};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    const BOUNDARY: &str = "resume-form-boundary";

    fn app() -> Router {
        build_router(test_state(ScriptedCompletion::replying(
            "Project Name: Tracker\nProject Link: https://example.com\nTechStack: Rust\nDescription:\n• Tracks things",
        )))
    }

    fn bearer(sub: &str) -> String {
        format!("Bearer {}", token_for(TEST_JWT_SECRET, sub))
    }

    fn multipart_body(resume_json: &str, photo: Option<(&str, &[u8])>) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"\r\n\r\n{resume_json}\r\n"
        )
        .into_bytes();
        if let Some((content_type, bytes)) = photo {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"me.png\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn save_request(sub: &str, body: Vec<u8>) -> Request<Body> {
        Request::post("/api/v1/resumes")
            .header(header::AUTHORIZATION, bearer(sub))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["service"], "resume-api");
    }

    #[tokio::test]
    async fn test_resume_routes_require_auth() {
        let response = app()
            .oneshot(Request::get("/api/v1/resumes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_save_list_print_delete_flow() {
        let app = app();

        let body = multipart_body(
            r#"{"title":"Backend","firstName":"Ada","workExperiences":[{"position":"Engineer","company":"Acme","startDate":"2022-01-01","endDate":""}]}"#,
            Some(("image/png", b"\x89PNG fake")),
        );
        let response = app.clone().oneshot(save_request("u1", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let saved = json_body(response).await;
        let id = saved["id"].as_str().unwrap().to_string();
        assert!(saved["photo"].as_str().unwrap().contains("resume_photos/u1/"));

        let response = app
            .clone()
            .oneshot(
                Request::get("/api/v1/resumes")
                    .header(header::AUTHORIZATION, bearer("u1"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let list = json_body(response).await;
        assert_eq!(list["total"], 1);

        let response = app
            .clone()
            .oneshot(
                Request::get(format!("/api/v1/resumes/{id}/print"))
                    .header(header::AUTHORIZATION, bearer("u1"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(html.to_vec()).unwrap();
        assert!(html.contains("Jan-2022 - Present"));
        assert!(html.contains("window.print()"));

        let response = app
            .clone()
            .oneshot(
                Request::delete(format!("/api/v1/resumes/{id}"))
                    .header(header::AUTHORIZATION, bearer("someone-else"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(
                Request::delete(format!("/api/v1/resumes/{id}"))
                    .header(header::AUTHORIZATION, bearer("u1"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_save_rejects_non_image_photo() {
        let body = multipart_body(r#"{"title":"x"}"#, Some(("application/pdf", b"%PDF")));
        let response = app().oneshot(save_request("u1", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = json_body(response).await;
        assert_eq!(error["error"]["fields"][0]["field"], "photo");
        assert_eq!(error["error"]["fields"][0]["message"], "Must be an image file");
    }

    #[tokio::test]
    async fn test_save_without_resume_part_is_bad_request() {
        let body = format!("--{BOUNDARY}--\r\n").into_bytes();
        let response = app().oneshot(save_request("u1", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_photo_is_reported_on_photo_field() {
        let photo = vec![0u8; SAVE_BODY_LIMIT + 1];
        let body = multipart_body(r#"{"title":"x"}"#, Some(("image/png", &photo)));
        let response = app().oneshot(save_request("u1", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = json_body(response).await;
        assert_eq!(error["error"]["fields"][0]["field"], "photo");
        assert_eq!(error["error"]["fields"][0]["message"], "File must be less than 4mb");
    }

    #[tokio::test]
    async fn test_preview_rejects_invalid_values() {
        let response = app()
            .oneshot(
                Request::post("/api/v1/resumes/preview")
                    .header(header::AUTHORIZATION, bearer("u1"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"colorHex":"red;background:url(x)","workExperiences":[{"startDate":"garbage"}]}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = json_body(response).await;
        let fields: Vec<&str> = error["error"]["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["field"].as_str().unwrap())
            .collect();
        assert!(fields.contains(&"colorHex"));
        assert!(fields.contains(&"workExperiences.0.startDate"));
    }

    #[tokio::test]
    async fn test_assist_project_returns_fields_and_missing() {
        let response = app()
            .oneshot(
                Request::post("/api/v1/assist/project")
                    .header(header::AUTHORIZATION, bearer("u1"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"description":"A tracker for job applications written in Rust"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["projectName"], "Tracker");
        assert_eq!(body["missing"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_preview_renders_posted_values() {
        let response = app()
            .oneshot(
                Request::post("/api/v1/resumes/preview")
                    .header(header::AUTHORIZATION, bearer("u1"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"firstName":"Ada","lastName":"Lovelace"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(html.to_vec()).unwrap();
        assert!(html.contains("Ada Lovelace"));
        assert!(!html.contains("window.print()"));
    }
}
