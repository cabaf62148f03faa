//! Named relations that read operations can eager-load on request.
//!
//! A relation is registered under the name clients pass in `includes`. Loading is
//! batched: each requested relation costs one extra query for the whole result set,
//! through Sea-ORM's [`LoaderTrait`].

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, LoaderTrait, ModelTrait, Related};
use serde::Serialize;
use serde_json::{Map, Value};
use std::{marker::PhantomData, sync::Arc};

/// Loads one relation for a batch of parent models.
///
/// The returned vector is parallel to `models`: entry `i` holds the serialized
/// related data of `models[i]`.
#[async_trait]
pub trait Include<M>: Send + Sync {
    async fn load(&self, db: &DatabaseConnection, models: &[M]) -> Result<Vec<Value>, DbErr>;
}

struct HasMany<R>(PhantomData<fn() -> R>);

struct BelongsTo<R>(PhantomData<fn() -> R>);

fn to_json<T: Serialize>(value: &T) -> Result<Value, DbErr> {
    serde_json::to_value(value).map_err(|err| DbErr::Json(err.to_string()))
}

#[async_trait]
impl<M, R> Include<M> for HasMany<R>
where
    M: ModelTrait + Sync,
    M::Entity: Related<R>,
    R: EntityTrait,
    R::Model: Serialize + Send + Sync,
{
    async fn load(&self, db: &DatabaseConnection, models: &[M]) -> Result<Vec<Value>, DbErr> {
        let related = models.load_many(R::default(), db).await?;
        related.iter().map(to_json).collect()
    }
}

#[async_trait]
impl<M, R> Include<M> for BelongsTo<R>
where
    M: ModelTrait + Sync,
    M::Entity: Related<R>,
    R: EntityTrait,
    R::Model: Serialize + Send + Sync,
{
    async fn load(&self, db: &DatabaseConnection, models: &[M]) -> Result<Vec<Value>, DbErr> {
        let related = models.load_one(R::default(), db).await?;
        related.iter().map(to_json).collect()
    }
}

/// Relation registry of one entity type.
pub struct Relations<M> {
    entries: Vec<(&'static str, Arc<dyn Include<M>>)>,
}

impl<M> Default for Relations<M> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<M: ModelTrait + Sync + 'static> Relations<M> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a one-to-many relation; it is rendered as a JSON array.
    #[must_use]
    pub fn has_many<R>(self, name: &'static str) -> Self
    where
        M::Entity: Related<R>,
        R: EntityTrait,
        R::Model: Serialize + Send + Sync,
    {
        self.with(name, HasMany::<R>(PhantomData))
    }

    /// Registers a many-to-one relation; it is rendered as an object or `null`.
    #[must_use]
    pub fn belongs_to<R>(self, name: &'static str) -> Self
    where
        M::Entity: Related<R>,
        R: EntityTrait,
        R::Model: Serialize + Send + Sync,
    {
        self.with(name, BelongsTo::<R>(PhantomData))
    }

    /// Registers a custom loader.
    #[must_use]
    pub fn with(mut self, name: &'static str, include: impl Include<M> + 'static) -> Self {
        self.entries.push((name, Arc::new(include)));
        self
    }
}

impl<M> Relations<M> {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Include<M>> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, include)| include.as_ref())
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(name, _)| *name).collect()
    }
}

/// A model together with the relations a client asked for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithRelations<M> {
    #[serde(flatten)]
    pub model: M,
    #[serde(flatten)]
    pub related: Map<String, Value>,
}

impl<M> WithRelations<M> {
    #[must_use]
    pub fn new(model: M) -> Self {
        Self {
            model,
            related: Map::new(),
        }
    }
}
