use axum::http::StatusCode;
use serde_json::json;
use shared_types::UserRole;

use crate::common::{get, post_json, signed_in, test_app};

#[tokio::test]
async fn director_schedules_an_event_everyone_sees() {
    let (app, pool, _guard) = test_app().await;
    let (director_id, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;
    let (_, parent) = signed_in(&app, &pool, "parent1", UserRole::Parent).await;

    let body = json!({
        "title": "Quran Competition",
        "description": "Annual recitation contest",
        "date": "2026-12-05T10:00:00Z",
        "endDate": "2026-12-05T14:00:00Z",
        "location": "Main hall",
    })
    .to_string();
    let (status, created) = post_json(&app, "/api/events", &body, Some(&director)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {created}");
    assert_eq!(created["createdById"].as_i64(), Some(director_id));

    let (status, resp) = get(&app, "/api/events", Some(&parent)).await;
    assert_eq!(status, StatusCode::OK);
    let events = resp.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["title"], "Quran Competition");
}

#[tokio::test]
async fn events_are_listed_by_start_time() {
    let (app, pool, _guard) = test_app().await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;

    for (title, date) in [
        ("Eid Celebration", "2027-03-20T09:00:00Z"),
        ("Parent Evening", "2026-11-12T18:00:00Z"),
    ] {
        let body = json!({ "title": title, "date": date }).to_string();
        let (status, _) = post_json(&app, "/api/events", &body, Some(&director)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, resp) = get(&app, "/api/events", Some(&director)).await;
    let titles: Vec<&str> = resp
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Parent Evening", "Eid Celebration"]);
}

#[tokio::test]
async fn teacher_cannot_create_events() {
    let (app, pool, _guard) = test_app().await;
    let (_, teacher) = signed_in(&app, &pool, "teacher1", UserRole::Teacher).await;

    let body = json!({ "title": "Field trip", "date": "2026-11-01T09:00:00Z" }).to_string();
    let (status, _) = post_json(&app, "/api/events", &body, Some(&teacher)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn event_cannot_end_before_it_starts() {
    let (app, pool, _guard) = test_app().await;
    let (_, director) = signed_in(&app, &pool, "director1", UserRole::Director).await;

    let body = json!({
        "title": "Backwards",
        "date": "2026-11-01T12:00:00Z",
        "endDate": "2026-11-01T09:00:00Z",
    })
    .to_string();
    let (status, resp) = post_json(&app, "/api/events", &body, Some(&director)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp["fieldErrors"]["end_date"].is_string(), "got {resp}");
}
