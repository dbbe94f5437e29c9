#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use snaplink::application::services::LinkService;
use snaplink::domain::entities::{Link, NewLink};
use snaplink::domain::repositories::LinkRepository;
use snaplink::error::AppError;
use snaplink::infrastructure::persistence::InMemoryLinkRepository;
use snaplink::routes::build_router;
use snaplink::state::AppState;
use snaplink::utils::code_generator::{CodeGenerator, generate_code};

pub const STATIC_DIR: &str = "static";

pub fn create_test_state() -> (AppState, Arc<InMemoryLinkRepository>) {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let link_service = Arc::new(LinkService::new(repo.clone()));

    (AppState::new(link_service), repo)
}

pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(build_router(state, STATIC_DIR)).unwrap()
}

pub async fn create_test_link(repo: &InMemoryLinkRepository, code: &str, url: &str) -> Link {
    repo.create(NewLink::new(code, url)).await.unwrap()
}

/// Hands out a fixed sequence of codes, then falls back to random ones.
pub struct ScriptedGenerator {
    codes: Mutex<VecDeque<String>>,
}

impl ScriptedGenerator {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
        }
    }
}

impl CodeGenerator for ScriptedGenerator {
    fn generate(&self) -> String {
        self.codes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(generate_code)
    }
}

/// Store whose every call fails, for exercising error paths.
pub struct UnavailableRepository;

#[async_trait]
impl LinkRepository for UnavailableRepository {
    async fn exists(&self, _code: &str) -> Result<bool, AppError> {
        Err(unavailable())
    }

    async fn create(&self, _new_link: NewLink) -> Result<Link, AppError> {
        Err(unavailable())
    }

    async fn find_by_code(&self, _code: &str) -> Result<Option<Link>, AppError> {
        Err(unavailable())
    }

    async fn increment_clicks(&self, _code: &str) -> Result<Option<String>, AppError> {
        Err(unavailable())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(unavailable())
    }
}

fn unavailable() -> AppError {
    AppError::internal("Database error", serde_json::json!({}))
}
