use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, IdenStatic, IntoActiveModel, Iterable, ModelTrait, QueryFilter,
};
use std::marker::PhantomData;
use uuid::Uuid;

use crate::errors::RepositoryError;
use crate::fields::{FieldRegistry, is_absent};
use crate::relations::{Relations, WithRelations};
use crate::search::build_contains_condition;
use crate::traits::{ColumnOf, Resource};

/// Data access for one entity type.
///
/// Every operation is a single round trip against the store. `None` means "no
/// such record" for the by-id operations and "no data source" for the others.
#[async_trait]
pub trait CrudRepository<R: Resource>: Send + Sync {
    /// Persists a new record and returns it as stored.
    async fn create(&self, entity: R::Model) -> Result<Option<R::Model>, RepositoryError>;

    async fn read_all(&self) -> Result<Option<Vec<R::Model>>, RepositoryError>;

    /// Reads every record and eager-loads the named relations, in the order given.
    async fn read_all_with_includes(
        &self,
        includes: &[String],
    ) -> Result<Option<Vec<WithRelations<R::Model>>>, RepositoryError>;

    async fn read_by_id(&self, id: Uuid) -> Result<Option<R::Model>, RepositoryError>;

    async fn read_by_id_with_includes(
        &self,
        id: Uuid,
        includes: &[String],
    ) -> Result<Option<WithRelations<R::Model>>, RepositoryError>;

    /// Copies every supplied column of `updated` onto the stored record.
    ///
    /// Fields holding their type's default are skipped, so they keep their stored
    /// value; the identifier is never copied. Returns `updated` itself, not the
    /// merged record.
    async fn update(
        &self,
        id: Uuid,
        updated: R::Model,
    ) -> Result<Option<R::Model>, RepositoryError>;

    /// Removes a record and returns it as it was before removal.
    async fn delete(&self, id: Uuid) -> Result<Option<R::Model>, RepositoryError>;

    /// Returns the records whose `field` contains `value` (case-sensitive).
    ///
    /// A `None` value returns every record. An unregistered field name fails with
    /// [`RepositoryError::UnknownField`] even when `value` is `None`.
    async fn find(
        &self,
        field: &str,
        value: Option<&str>,
    ) -> Result<Vec<R::Model>, RepositoryError>;
}

/// [`CrudRepository`] backed by a Sea-ORM connection.
pub struct SeaOrmRepository<R: Resource> {
    db: DatabaseConnection,
    fields: FieldRegistry<ColumnOf<R>>,
    relations: Relations<R::Model>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> SeaOrmRepository<R> {
    /// Builds the field and relation registries of `R` once.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            fields: R::fields(),
            relations: R::relations(),
            _resource: PhantomData,
        }
    }

    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<R::Model>, RepositoryError> {
        Ok(R::EntityType::find()
            .filter(R::ID_COLUMN.eq(id))
            .one(&self.db)
            .await?)
    }

    async fn attach_includes(
        &self,
        models: Vec<R::Model>,
        includes: &[String],
    ) -> Result<Vec<WithRelations<R::Model>>, RepositoryError> {
        let mut loaded = Vec::with_capacity(includes.len());
        for name in includes {
            let include =
                self.relations
                    .get(name)
                    .ok_or_else(|| RepositoryError::UnknownRelation {
                        resource: R::RESOURCE_NAME_SINGULAR,
                        relation: name.clone(),
                    })?;
            loaded.push(include.load(&self.db, &models).await?);
        }

        let mut results: Vec<WithRelations<R::Model>> =
            models.into_iter().map(WithRelations::new).collect();
        for (name, values) in includes.iter().zip(loaded) {
            for (result, value) in results.iter_mut().zip(values) {
                result.related.insert(name.clone(), value);
            }
        }
        Ok(results)
    }
}

#[async_trait]
impl<R: Resource> CrudRepository<R> for SeaOrmRepository<R> {
    async fn create(&self, entity: R::Model) -> Result<Option<R::Model>, RepositoryError> {
        let mut active = <R::ActiveModelType as ActiveModelBehavior>::new();
        for column in <ColumnOf<R>>::iter() {
            active.set(column, entity.get(column));
        }
        if is_absent(&entity.get(R::ID_COLUMN)) {
            active.set(R::ID_COLUMN, Uuid::new_v4().into());
        }

        let created = active.insert(&self.db).await?;
        tracing::debug!(
            resource = R::RESOURCE_NAME_SINGULAR,
            id = ?created.get(R::ID_COLUMN),
            "Created record"
        );
        Ok(Some(created))
    }

    async fn read_all(&self) -> Result<Option<Vec<R::Model>>, RepositoryError> {
        let models = R::EntityType::find().all(&self.db).await?;
        Ok(Some(models))
    }

    async fn read_all_with_includes(
        &self,
        includes: &[String],
    ) -> Result<Option<Vec<WithRelations<R::Model>>>, RepositoryError> {
        let models = R::EntityType::find().all(&self.db).await?;
        let results = self.attach_includes(models, includes).await?;
        Ok(Some(results))
    }

    async fn read_by_id(&self, id: Uuid) -> Result<Option<R::Model>, RepositoryError> {
        self.find_by_id(id).await
    }

    async fn read_by_id_with_includes(
        &self,
        id: Uuid,
        includes: &[String],
    ) -> Result<Option<WithRelations<R::Model>>, RepositoryError> {
        let Some(model) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let mut results = self.attach_includes(vec![model], includes).await?;
        Ok(results.pop())
    }

    async fn update(
        &self,
        id: Uuid,
        updated: R::Model,
    ) -> Result<Option<R::Model>, RepositoryError> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut active: R::ActiveModelType = existing.into_active_model();
        for column in <ColumnOf<R>>::iter() {
            if column.as_str() == R::ID_COLUMN.as_str() {
                continue;
            }
            let value = updated.get(column);
            if is_absent(&value) {
                continue;
            }
            active.set(column, value);
        }

        if active.is_changed() {
            active.update(&self.db).await?;
            tracing::debug!(resource = R::RESOURCE_NAME_SINGULAR, %id, "Updated record");
        } else {
            tracing::debug!(resource = R::RESOURCE_NAME_SINGULAR, %id, "Update supplied no fields");
        }
        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<R::Model>, RepositoryError> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        R::EntityType::delete_many()
            .filter(R::ID_COLUMN.eq(id))
            .exec(&self.db)
            .await?;
        tracing::debug!(resource = R::RESOURCE_NAME_SINGULAR, %id, "Deleted record");
        Ok(Some(existing))
    }

    async fn find(
        &self,
        field: &str,
        value: Option<&str>,
    ) -> Result<Vec<R::Model>, RepositoryError> {
        let column = self
            .fields
            .get(field)
            .ok_or_else(|| RepositoryError::UnknownField {
                resource: R::RESOURCE_NAME_SINGULAR,
                field: field.to_owned(),
            })?;

        let mut query = R::EntityType::find();
        if let Some(value) = value {
            query = query.filter(build_contains_condition(
                column,
                value,
                self.db.get_database_backend(),
            ));
        }
        Ok(query.all(&self.db).await?)
    }
}
