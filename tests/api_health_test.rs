//! Integration tests for the health check

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::util::ServiceExt;

    use crate::test_utils::{send, test_app};

    #[tokio::test]
    async fn it_reports_ok() {
        let (app, _dir) = test_app().await;

        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    /// Tests CORS allows local dev servers and the configured frontend
    #[tokio::test]
    async fn it_allows_known_origins() {
        let (app, _dir) = test_app().await;

        for (origin, allowed) in [
            ("http://localhost:5173", true),
            ("https://meet.example.com", true),
            ("https://evil.example.com", false),
        ] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .uri("/health")
                        .header(header::ORIGIN, origin)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                response
                    .headers()
                    .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                    .is_some(),
                allowed,
                "{}",
                origin
            );
        }
    }
}
