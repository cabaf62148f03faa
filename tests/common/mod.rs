#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use repocrate::Controller;
use std::sync::Arc;
use sea_orm::{Database, DatabaseConnection, DbErr, Schema, sea_query::Table};
use sea_orm_migration::{MigrationName, MigrationTrait, MigratorTrait, SchemaManager};
use serde_json::Value;
use tower::ServiceExt;

pub mod author_entity;
pub mod book_entity;
pub mod stub_repository;

use author_entity as author;
use book_entity as book;

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

pub fn setup_test_app(db: DatabaseConnection) -> Router {
    Router::new()
        .nest(
            "/api/books",
            Controller::<book::Entity>::from_connection(db.clone()).router(),
        )
        .nest(
            "/api/authors",
            Controller::<author::Entity>::from_connection(db).router(),
        )
}

/// Book endpoints in front of a stub repository instead of a database.
pub fn setup_stub_app(repository: stub_repository::StubRepository) -> Router {
    Router::new().nest(
        "/api/books",
        Controller::<book::Entity>::new(Arc::new(repository)).router(),
    )
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Sends one request through the router; an empty body decodes to `Value::Null`.
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

/// Sends a raw, possibly malformed, JSON body.
pub async fn send_raw(app: &Router, method: &str, uri: &str, body: &str) -> StatusCode {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap().status()
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateLibraryTables)]
    }
}

pub struct CreateLibraryTables;

impl MigrationName for CreateLibraryTables {
    fn name(&self) -> &str {
        "m20240101_000001_create_library_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateLibraryTables {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());
        manager
            .create_table(schema.create_table_from_entity(author::Entity))
            .await?;
        manager
            .create_table(schema.create_table_from_entity(book::Entity))
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(book::Entity).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(author::Entity).to_owned())
            .await?;
        Ok(())
    }
}
