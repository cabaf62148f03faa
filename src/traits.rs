use crate::fields::FieldRegistry;
use crate::relations::Relations;
use crate::validation::Validatable;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DbErr, EntityTrait, FromQueryResult, IntoActiveModel,
    ModelTrait, sea_query::ValueType,
};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

pub type ColumnOf<R> = <<R as Resource>::EntityType as EntityTrait>::Column;

/// Registration of one entity type with the generic repository and controller.
///
/// Implement it once per entity; [`SeaOrmRepository`](crate::SeaOrmRepository) and
/// [`Controller`](crate::Controller) derive everything else from it.
pub trait Resource: Sized + Send + Sync + 'static {
    type EntityType: EntityTrait<Model = Self::Model> + Sync;
    type Model: ModelTrait<Entity = Self::EntityType>
        + FromQueryResult
        + IntoActiveModel<Self::ActiveModelType>
        + Serialize
        + Clone
        + Send
        + Sync;
    type ActiveModelType: ActiveModelTrait<Entity = Self::EntityType>
        + ActiveModelBehavior
        + Send
        + Sync;
    /// Wire shape accepted by create and update. Fields it does not carry must be
    /// left at their `Default` value on the converted model.
    type Dto: DeserializeOwned + Validatable + Into<Self::Model> + Send + 'static;

    const ID_COLUMN: ColumnOf<Self>;
    const RESOURCE_NAME_SINGULAR: &'static str;
    const RESOURCE_NAME_PLURAL: &'static str;

    /// Fields `find` can search, by public name.
    #[must_use]
    fn fields() -> FieldRegistry<ColumnOf<Self>> {
        FieldRegistry::from_columns()
    }

    /// Relations clients may request through `includes`.
    #[must_use]
    fn relations() -> Relations<Self::Model> {
        Relations::new()
    }

    /// Reads the identifier of a model.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::Type` if the identifier column does not hold a UUID.
    fn id_of(model: &Self::Model) -> Result<Uuid, DbErr> {
        <Uuid as ValueType>::try_from(model.get(Self::ID_COLUMN)).map_err(|_| {
            DbErr::Type(format!(
                "{} identifier is not a UUID",
                Self::RESOURCE_NAME_SINGULAR
            ))
        })
    }
}
