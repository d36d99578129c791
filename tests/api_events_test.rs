//! Integration tests for creating and reading events

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_utils::{create_test_event, send, test_app};

    /// Tests creating an event returns it with an id
    #[tokio::test]
    async fn it_creates_an_event() {
        let (app, _dir) = test_app().await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/events",
            Some(json!({
                "name": "  Offsite  ",
                "dateMode": "daysOfWeek",
                "dates": ["Wednesday", "Monday"],
                "startHour": 13,
                "endHour": 17,
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        let id = body["id"].as_str().unwrap();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        assert_eq!(body["name"], "Offsite");
        assert_eq!(body["dateMode"], "daysOfWeek");
        assert_eq!(body["dates"], json!(["Monday", "Wednesday"]));
        assert_eq!(body["startHour"], 13);
        assert_eq!(body["endHour"], 17);
        assert!(body["createdAt"].as_i64().unwrap() > 0);
    }

    /// Tests fetching an event by id
    #[tokio::test]
    async fn it_gets_an_event() {
        let (app, _dir) = test_app().await;
        let id = create_test_event(&app).await;

        let (status, body) = send(&app, "GET", &format!("/api/events/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], id.as_str());
        assert_eq!(body["dates"], json!(["2026-03-02", "2026-03-03"]));
    }

    #[tokio::test]
    async fn it_returns_not_found_for_unknown_events() {
        let (app, _dir) = test_app().await;

        let (status, body) = send(&app, "GET", "/api/events/nope1234", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Event not found");

        let (status, _) = send(&app, "GET", "/api/events/nope1234/availability", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "GET", "/api/events/nope1234/grid", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    /// Tests every kind of invalid event is a 400 with an error message
    #[tokio::test]
    async fn it_rejects_invalid_events() {
        let (app, _dir) = test_app().await;

        let invalid = [
            json!({"name": "Sync", "dateMode": "specific", "dates": ["2026-03-02"], "startHour": 10, "endHour": 10}),
            json!({"name": "Sync", "dateMode": "specific", "dates": ["2026-03-02"], "startHour": 17, "endHour": 9}),
            json!({"name": "Sync", "dateMode": "specific", "dates": [], "startHour": 9, "endHour": 10}),
            json!({"name": "   ", "dateMode": "specific", "dates": ["2026-03-02"], "startHour": 9, "endHour": 10}),
            json!({"name": "Sync", "dateMode": "specific", "dates": ["March 2nd"], "startHour": 9, "endHour": 10}),
            json!({"name": "Sync", "dateMode": "daysOfWeek", "dates": ["Funday"], "startHour": 9, "endHour": 10}),
            json!({"name": "Sync", "dateMode": "specific", "dates": ["2026-03-02"], "startHour": 9}),
            json!({"name": "Sync", "dateMode": "specific", "dates": ["2026-03-02"], "startHour": 9, "endHour": 25}),
        ];

        for body in invalid {
            let (status, resp) = send(&app, "POST", "/api/events", Some(body.clone())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
            assert!(resp["error"].as_str().is_some_and(|e| !e.is_empty()), "{}", body);
        }
    }

    #[tokio::test]
    async fn it_registers_participants_idempotently() {
        let (app, _dir) = test_app().await;
        let id = create_test_event(&app).await;
        let uri = format!("/api/events/{}/participants", id);

        let (status, first) = send(&app, "POST", &uri, Some(json!({"username": "Ann"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(first["username"], "Ann");
        assert_eq!(first["eventId"], id.as_str());

        let (status, second) = send(&app, "POST", &uri, Some(json!({"username": " Ann "}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(second["id"], first["id"]);

        let (status, _) = send(&app, "POST", &uri, Some(json!({"username": ""}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            "POST",
            "/api/events/nope1234/participants",
            Some(json!({"username": "Ann"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
