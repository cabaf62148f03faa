use repocrate::{Relations, Resource, Validatable, ValidationErrors};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub year: i32,
    #[sea_orm(nullable)]
    pub summary: Option<String>,
    #[sea_orm(nullable)]
    pub author_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::author_entity::Entity",
        from = "Column::AuthorId",
        to = "super::author_entity::Column::Id"
    )]
    Author,
}

impl Related<super::author_entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BookDto {
    pub title: String,
    pub year: i32,
    pub summary: Option<String>,
    pub author_id: Option<Uuid>,
}

impl Validatable for BookDto {
    fn validate(&self) -> Result<(), ValidationErrors> {
        ValidationErrors::new()
            .required("title", &self.title)
            .max_chars("title", &self.title, 200)
            .within("year", self.year, 0..=2100)
            .finish()
    }
}

impl From<BookDto> for Model {
    fn from(dto: BookDto) -> Self {
        Self {
            title: dto.title,
            year: dto.year,
            summary: dto.summary,
            author_id: dto.author_id,
            ..Default::default()
        }
    }
}

impl Resource for Entity {
    type EntityType = Self;
    type Model = Model;
    type ActiveModelType = ActiveModel;
    type Dto = BookDto;

    const ID_COLUMN: Column = Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "book";
    const RESOURCE_NAME_PLURAL: &'static str = "books";

    fn relations() -> Relations<Model> {
        Relations::new().belongs_to::<super::author_entity::Entity>("author")
    }
}
