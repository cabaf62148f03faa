use async_trait::async_trait;
use repocrate::{CrudRepository, RepositoryError, WithRelations};
use sea_orm::DbErr;
use uuid::Uuid;

use super::book_entity as book;

/// In-memory book store whose operations produce nothing, or fail.
///
/// Lookups by id always find a record, so update and delete get past their
/// existence check and reach the operation itself.
#[derive(Clone, Copy)]
pub enum StubRepository {
    Empty,
    Failing,
}

impl StubRepository {
    fn outcome<T>(self, empty: T) -> Result<T, RepositoryError> {
        match self {
            Self::Empty => Ok(empty),
            Self::Failing => Err(DbErr::Custom("connection reset by peer".to_string()).into()),
        }
    }
}

fn stored(id: Uuid) -> book::Model {
    book::Model {
        id,
        title: "Stored".to_string(),
        ..Default::default()
    }
}

#[async_trait]
impl CrudRepository<book::Entity> for StubRepository {
    async fn create(&self, _entity: book::Model) -> Result<Option<book::Model>, RepositoryError> {
        self.outcome(None)
    }

    async fn read_all(&self) -> Result<Option<Vec<book::Model>>, RepositoryError> {
        self.outcome(None)
    }

    async fn read_all_with_includes(
        &self,
        _includes: &[String],
    ) -> Result<Option<Vec<WithRelations<book::Model>>>, RepositoryError> {
        self.outcome(None)
    }

    async fn read_by_id(&self, id: Uuid) -> Result<Option<book::Model>, RepositoryError> {
        self.outcome(Some(stored(id)))
    }

    async fn read_by_id_with_includes(
        &self,
        id: Uuid,
        _includes: &[String],
    ) -> Result<Option<WithRelations<book::Model>>, RepositoryError> {
        self.outcome(Some(WithRelations::new(stored(id))))
    }

    async fn update(
        &self,
        _id: Uuid,
        _updated: book::Model,
    ) -> Result<Option<book::Model>, RepositoryError> {
        self.outcome(None)
    }

    async fn delete(&self, _id: Uuid) -> Result<Option<book::Model>, RepositoryError> {
        self.outcome(None)
    }

    async fn find(
        &self,
        _field: &str,
        _value: Option<&str>,
    ) -> Result<Vec<book::Model>, RepositoryError> {
        self.outcome(Vec::new())
    }
}
