use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use taskify_api::v1::{self, NewTask, Task, TaskId, TaskPatch};
use tracing::{debug, info};

use crate::{error::AppError, store::TaskStore};

pub fn router() -> Router<Arc<TaskStore>> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/:id", put(update_task).delete(delete_task))
}

async fn list_tasks(State(store): State<Arc<TaskStore>>) -> Json<Vec<Task>> {
    Json(store.list().await)
}

async fn create_task(
    State(store): State<Arc<TaskStore>>,
    Json(new): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let task = new.into_task(TaskId::generate(), v1::today());
    store.insert(task.clone()).await?;

    info!(
        id = %task.id,
        title = %task.title,
        section = %task.section,
        "created task"
    );

    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(store): State<Arc<TaskStore>>,
    Path(id): Path<String>,
    Json(patch): Json<TaskPatch>,
) -> Result<StatusCode, AppError> {
    let id = TaskId::from(id);

    if store.update(&id, &patch).await? {
        info!(
            id = %id,
            title = ?patch.title,
            status = ?patch.status,
            "updated task"
        );
    } else {
        debug!(id = %id, "update matched no task");
    }

    Ok(StatusCode::OK)
}

async fn delete_task(
    State(store): State<Arc<TaskStore>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = TaskId::from(id);

    if store.remove(&id).await? {
        info!(id = %id, "deleted task");
    } else {
        debug!(id = %id, "delete matched no task");
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, Response},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use taskify_api::v1::{Priority, TaskStatus};
    use tower::ServiceExt;

    use super::*;

    fn test_app() -> (Router, Arc<TaskStore>) {
        let store = Arc::new(TaskStore::in_memory());
        (crate::app(store.clone()), store)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response<Body> {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        };

        app.clone().oneshot(request.unwrap()).await.unwrap()
    }

    async fn body_bytes(response: Response<Body>) -> Vec<u8> {
        response.into_body().collect().await.unwrap().to_bytes().to_vec()
    }

    async fn list(app: &Router) -> Vec<Task> {
        let response = send(app, "GET", "/tasks", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    async fn create(app: &Router, body: Value) -> Task {
        let response = send(app, "POST", "/tasks", Some(body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let (app, _) = test_app();
        assert!(list(&app).await.is_empty());
    }

    #[tokio::test]
    async fn create_with_title_only_fills_defaults() {
        let (app, _) = test_app();

        let task = create(&app, json!({ "title": "Water plants" })).await;

        assert!(!task.id.as_str().is_empty());
        assert_eq!(task.title, "Water plants");
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.section, "Inbox");
        assert_eq!(task.due, v1::today());
        assert_eq!(task.priority, Priority::Medium);
    }

    #[tokio::test]
    async fn created_task_json_uses_wire_names() {
        let (app, _) = test_app();

        let response = send(
            &app,
            "POST",
            "/tasks",
            Some(json!({ "title": "Call mom", "priority": "high", "due": "2026-12-24" })),
        )
        .await;
        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();

        assert_eq!(body["priority"], "high");
        assert_eq!(body["status"], "pending");
        assert_eq!(body["due"], "2026-12-24");
        assert!(body["id"].is_string());
    }

    #[tokio::test]
    async fn generated_ids_are_unique() {
        let (app, _) = test_app();

        let a = create(&app, json!({ "title": "a" })).await;
        let b = create(&app, json!({ "title": "a" })).await;

        assert_ne!(a.id, b.id);
        assert_eq!(list(&app).await.len(), 2);
    }

    #[tokio::test]
    async fn create_accepts_empty_title() {
        let (app, _) = test_app();

        let task = create(&app, json!({ "title": "" })).await;

        assert_eq!(task.title, "");
    }

    #[tokio::test]
    async fn create_rejects_unknown_priority() {
        let (app, store) = test_app();

        let response = send(
            &app,
            "POST",
            "/tasks",
            Some(json!({ "title": "x", "priority": "urgent" })),
        )
        .await;

        assert!(response.status().is_client_error());
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn update_changes_only_title_and_status() {
        let (app, _) = test_app();
        let task = create(
            &app,
            json!({ "title": "Draft", "section": "Projects", "priority": "low" }),
        )
        .await;

        let response = send(
            &app,
            "PUT",
            &format!("/tasks/{}", task.id),
            Some(json!({ "title": "Final", "status": "completed" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_bytes(response).await.is_empty());

        let tasks = list(&app).await;
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Final");
        assert_eq!(tasks[0].status, TaskStatus::Completed);
        assert_eq!(tasks[0].section, task.section);
        assert_eq!(tasks[0].due, task.due);
        assert_eq!(tasks[0].priority, task.priority);
    }

    #[tokio::test]
    async fn update_of_missing_task_still_succeeds() {
        let (app, _) = test_app();

        let response = send(
            &app,
            "PUT",
            "/tasks/does-not-exist",
            Some(json!({ "title": "x", "status": "completed" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(list(&app).await.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_task() {
        let (app, _) = test_app();
        let keep = create(&app, json!({ "title": "keep" })).await;
        let gone = create(&app, json!({ "title": "gone" })).await;

        let response = send(&app, "DELETE", &format!("/tasks/{}", gone.id), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        assert_eq!(list(&app).await, vec![keep]);
    }

    #[tokio::test]
    async fn delete_of_missing_task_still_succeeds() {
        let (app, _) = test_app();

        let response = send(&app, "DELETE", "/tasks/does-not-exist", None).await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn water_plants_lifecycle() {
        let (app, _) = test_app();

        let task = create(&app, json!({ "title": "Water plants" })).await;
        assert_eq!(task.status, TaskStatus::Pending);

        send(
            &app,
            "PUT",
            &format!("/tasks/{}", task.id),
            Some(json!({ "title": "Water plants", "status": "completed" })),
        )
        .await;
        let tasks = list(&app).await;
        assert_eq!(tasks[0].id, task.id);
        assert_eq!(tasks[0].status, TaskStatus::Completed);

        send(&app, "DELETE", &format!("/tasks/{}", task.id), None).await;
        assert!(list(&app).await.iter().all(|t| t.id != task.id));
    }

    #[tokio::test]
    async fn store_failure_is_a_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::open(dir.path().join("missing").join("tasks.ron")).unwrap();
        let app = crate::app(Arc::new(store));

        let response = send(&app, "POST", "/tasks", Some(json!({ "title": "x" }))).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(list(&app).await.is_empty());
    }
}
