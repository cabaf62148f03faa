//! Register a Sea-ORM entity once and get a generic repository plus an Axum
//! endpoint group (list, get, create, update, delete, field search, eager-loaded
//! relations) for it.
//!
//! ```rust,ignore
//! impl Resource for book::Entity {
//!     type EntityType = Self;
//!     type Model = book::Model;
//!     type ActiveModelType = book::ActiveModel;
//!     type Dto = BookDto;
//!
//!     const ID_COLUMN: book::Column = book::Column::Id;
//!     const RESOURCE_NAME_SINGULAR: &'static str = "book";
//!     const RESOURCE_NAME_PLURAL: &'static str = "books";
//! }
//!
//! let app = Router::new().nest("/api/books", Controller::<book::Entity>::from_connection(db).router());
//! ```

pub mod config;
pub mod controller;
pub mod errors;
pub mod fields;
pub mod relations;
pub mod repository;
pub mod search;
pub mod traits;
pub mod validation;

pub use controller::Controller;
pub use errors::{ApiError, RepositoryError};
pub use relations::{Relations, WithRelations};
pub use repository::{CrudRepository, SeaOrmRepository};
pub use traits::Resource;
pub use validation::{Validatable, ValidationError, ValidationErrors};
