//! Library API with books and their authors
//!
//! ```bash
//! cargo run --example library
//! ```
//!
//! Then try:
//! - `curl -X POST localhost:3000/authors -H 'content-type: application/json' -d '{"name":"Frank Herbert"}'`
//! - `curl localhost:3000/books/GetAllWithIncludes?includes=author`
//! - `curl 'localhost:3000/authors/Find?key=name&value=Herbert'`

use axum::Router;
use repocrate::{
    Controller, Relations, Resource, Validatable, ValidationErrors,
    config::{Settings, connect},
};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Schema};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod author {
    use super::{Relations, Resource, Validatable, ValidationErrors};
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
        #[sea_orm(has_many = "super::book::Entity")]
        Books,
    }

    impl Related<super::book::Entity> for Entity {
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
            Relations::new().has_many::<super::book::Entity>("books")
        }
    }
}

mod book {
    use super::{Relations, Resource, Validatable, ValidationErrors};
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
        pub author_id: Option<Uuid>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::author::Entity",
            from = "Column::AuthorId",
            to = "super::author::Column::Id"
        )]
        Author,
    }

    impl Related<super::author::Entity> for Entity {
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
            Relations::new().belongs_to::<super::author::Entity>("author")
        }
    }
}

async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut authors = schema.create_table_from_entity(author::Entity);
    let mut books = schema.create_table_from_entity(book::Entity);
    authors.if_not_exists();
    books.if_not_exists();
    db.execute(backend.build(&authors)).await?;
    db.execute(backend.build(&books)).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,repocrate=debug,tower_http=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env();
    let db = connect(&settings).await?;
    create_tables(&db).await?;

    let app = Router::new()
        .nest(
            "/books",
            Controller::<book::Entity>::from_connection(db.clone()).router(),
        )
        .nest(
            "/authors",
            Controller::<author::Entity>::from_connection(db).router(),
        )
        .layer(TraceLayer::new_for_http());

    let address = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Library API listening on http://{address}");
    axum::serve(listener, app).await?;
    Ok(())
}
