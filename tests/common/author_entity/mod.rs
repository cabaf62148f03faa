use repocrate::{Relations, Resource, Validatable, ValidationErrors};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "authors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::book_entity::Entity")]
    Books,
}

impl Related<super::book_entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Books.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AuthorDto {
    pub name: String,
}

impl Validatable for AuthorDto {
    fn validate(&self) -> Result<(), ValidationErrors> {
        ValidationErrors::new()
            .required("name", &self.name)
            .finish()
    }
}

impl From<AuthorDto> for Model {
    fn from(dto: AuthorDto) -> Self {
        Self {
            name: dto.name,
            ..Default::default()
        }
    }
}

impl Resource for Entity {
    type EntityType = Self;
    type Model = Model;
    type ActiveModelType = ActiveModel;
    type Dto = AuthorDto;

    const ID_COLUMN: Column = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "author";
    const RESOURCE_NAME_PLURAL: &'static str = "authors";

    fn relations() -> Relations<Model> {
        Relations::new().has_many::<super::book_entity::Entity>("books")
    }
}
