use axum::Router;
use domain_tasks::{Pages, TaskRepository, TaskService};
use std::sync::Arc;

/// JSON and HTML routers sharing one service instance.
pub struct TaskRoutes {
    pub apis: Router,
    pub pages: Router,
}

impl TaskRoutes {
    pub fn new<R: TaskRepository + 'static>(repository: R, pages: Pages) -> Self {
        let service = Arc::new(TaskService::new(repository));

        Self {
            apis: super::routes(domain_tasks::router(service.clone())),
            pages: domain_tasks::web_router(service, pages),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::ApiDoc;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use axum_helpers::server::create_router;
    use core_config::server::ServerConfig;
    use domain_tasks::InMemoryTaskRepository;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        let routes = TaskRoutes::new(InMemoryTaskRepository::new(), Pages::new().unwrap());
        create_router::<ApiDoc>(routes.apis, routes.pages, &ServerConfig::default()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_tasks_api_is_served_under_api_v1() {
        let app = app();

        let created = app
            .clone()
            .oneshot(
                Request::post("/api/v1/tasks")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"title": "Ship", "dueDate": "2999-01-01", "status": "TODO"})
                            .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);

        let listed = app
            .oneshot(Request::get("/api/v1/tasks").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(listed.status(), StatusCode::OK);
        let body = body_json(listed).await;
        assert_eq!(body[0]["title"], "Ship");
        assert_eq!(body[0]["id"], 1);
    }

    #[tokio::test]
    async fn test_pages_are_served_at_root() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(String::from_utf8_lossy(&bytes).contains("No tasks yet."));
    }

    #[tokio::test]
    async fn test_openapi_document_lists_task_paths() {
        let response = app()
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let doc = body_json(response).await;
        assert!(doc["paths"].get("/v1/tasks/{id}").is_some());
    }
}
