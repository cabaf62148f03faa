//! HTTP endpoints for one registered entity type.
//!
//! | Method   | Path                 | Success                         |
//! |----------|----------------------|---------------------------------|
//! | `GET`    | `/GetAll`            | `200` with every record         |
//! | `GET`    | `/GetAllWithIncludes`| `200` with records and relations|
//! | `GET`    | `/{id}`              | `200` with the record           |
//! | `GET`    | `/WithIncludes/{id}` | `200` with record and relations |
//! | `POST`   | `/`                  | `201` with the created record   |
//! | `PUT`    | `/{id}`              | `200` with the submitted record |
//! | `DELETE` | `/{id}`              | `200` with the removed record   |
//! | `GET`    | `/Find?key=&value=`  | `200` with matching records     |
//!
//! Relations are requested as repeated query keys: `?includes=author&includes=reviews`.
//! A missing record is `204` on reads and `404` on writes.

use axum::{
    Json, Router,
    extract::{
        OriginalUri, Path, Query, RawQuery, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::{ApiError, RepositoryError};
use crate::repository::{CrudRepository, SeaOrmRepository};
use crate::traits::Resource;
use crate::validation::Validatable;

/// Endpoint group for one `(entity, transfer object)` pair.
pub struct Controller<R: Resource> {
    repository: Arc<dyn CrudRepository<R>>,
}

impl<R: Resource> Clone for Controller<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: Resource> Controller<R> {
    pub fn new(repository: Arc<dyn CrudRepository<R>>) -> Self {
        Self { repository }
    }

    /// Controller over a [`SeaOrmRepository`] on `db`.
    #[must_use]
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self::new(Arc::new(SeaOrmRepository::<R>::new(db)))
    }

    #[must_use]
    pub fn repository(&self) -> &Arc<dyn CrudRepository<R>> {
        &self.repository
    }

    /// Routes relative to the controller's base path; mount with [`Router::nest`].
    pub fn router(self) -> Router {
        Router::new()
            .route("/GetAll", get(get_all::<R>))
            .route("/GetAllWithIncludes", get(get_all_with_includes::<R>))
            .route("/WithIncludes/{id}", get(get_by_id_with_includes::<R>))
            .route("/Find", get(find::<R>))
            .route("/", post(create::<R>))
            .route(
                "/{id}",
                get(get_by_id::<R>).put(update::<R>).delete(delete::<R>),
            )
            .with_state(self)
    }
}

#[derive(Debug, Deserialize)]
pub struct FindParams {
    pub key: String,
    pub value: Option<String>,
}

/// Collects every `includes` key of a query string, keeping their order.
#[must_use]
pub fn parse_includes(query: Option<&str>) -> Vec<String> {
    query
        .map(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .filter(|(key, _)| key == "includes")
                .map(|(_, value)| value.into_owned())
                .collect()
        })
        .unwrap_or_default()
}

fn parse_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

fn parse_target_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    let id = parse_id(path)?;
    if id.is_nil() {
        return Err(ApiError::bad_request("Identifier must not be empty"));
    }
    Ok(id)
}

fn parse_payload<R: Resource>(
    payload: Result<Json<R::Dto>, JsonRejection>,
) -> Result<R::Dto, ApiError> {
    let Json(dto) = payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    dto.validate()?;
    Ok(dto)
}

async fn get_all<R: Resource>(
    State(controller): State<Controller<R>>,
) -> Result<Response, ApiError> {
    Ok(match controller.repository.read_all().await? {
        Some(items) => Json(items).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

async fn get_all_with_includes<R: Resource>(
    State(controller): State<Controller<R>>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    let includes = parse_includes(query.as_deref());
    Ok(
        match controller
            .repository
            .read_all_with_includes(&includes)
            .await?
        {
            Some(items) => Json(items).into_response(),
            None => StatusCode::NO_CONTENT.into_response(),
        },
    )
}

async fn get_by_id<R: Resource>(
    State(controller): State<Controller<R>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = parse_id(path)?;
    Ok(match controller.repository.read_by_id(id).await? {
        Some(item) => Json(item).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

async fn get_by_id_with_includes<R: Resource>(
    State(controller): State<Controller<R>>,
    path: Result<Path<Uuid>, PathRejection>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    let id = parse_id(path)?;
    let includes = parse_includes(query.as_deref());
    Ok(
        match controller
            .repository
            .read_by_id_with_includes(id, &includes)
            .await?
        {
            Some(item) => Json(item).into_response(),
            None => StatusCode::NO_CONTENT.into_response(),
        },
    )
}

async fn create<R: Resource>(
    State(controller): State<Controller<R>>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<R::Dto>, JsonRejection>,
) -> Result<Response, ApiError> {
    let dto = parse_payload::<R>(payload)?;
    let Some(created) = controller.repository.create(dto.into()).await? else {
        return Err(ApiError::internal(format!(
            "Failed to create {}",
            R::RESOURCE_NAME_SINGULAR
        )));
    };

    let id = R::id_of(&created).map_err(RepositoryError::from)?;
    let location = format!("{}/{id}", uri.path().trim_end_matches('/'));
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    )
        .into_response())
}

async fn update<R: Resource>(
    State(controller): State<Controller<R>>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<R::Dto>, JsonRejection>,
) -> Result<Json<R::Model>, ApiError> {
    let id = parse_target_id(path)?;
    let dto = parse_payload::<R>(payload)?;

    if controller.repository.read_by_id(id).await?.is_none() {
        return Err(ApiError::not_found(R::RESOURCE_NAME_SINGULAR, id));
    }

    controller
        .repository
        .update(id, dto.into())
        .await?
        .map(Json)
        .ok_or_else(|| {
            ApiError::internal(format!("Failed to update {}", R::RESOURCE_NAME_SINGULAR))
        })
}

async fn delete<R: Resource>(
    State(controller): State<Controller<R>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<R::Model>, ApiError> {
    let id = parse_target_id(path)?;

    if controller.repository.read_by_id(id).await?.is_none() {
        return Err(ApiError::not_found(R::RESOURCE_NAME_SINGULAR, id));
    }

    controller
        .repository
        .delete(id)
        .await?
        .map(Json)
        .ok_or_else(|| {
            ApiError::internal(format!("Failed to delete {}", R::RESOURCE_NAME_SINGULAR))
        })
}

// Field lookup failures are not mapped to ApiError; they surface as a bare 500.
async fn find<R: Resource>(
    State(controller): State<Controller<R>>,
    Query(params): Query<FindParams>,
) -> Result<Json<Vec<R::Model>>, RepositoryError> {
    tracing::debug!(
        resource = R::RESOURCE_NAME_PLURAL,
        key = %params.key,
        value = ?params.value,
        "Find"
    );
    let items = controller
        .repository
        .find(&params.key, params.value.as_deref())
        .await?;
    Ok(Json(items))
}
