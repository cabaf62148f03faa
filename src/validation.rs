//! Payload rules checked before a create or update reaches the repository.
//!
//! A transfer object implements [`Validatable`] by chaining rule checks on a
//! [`ValidationErrors`] and calling [`ValidationErrors::finish`]. The controller
//! answers a failed payload with `400` and the list of broken rules.
//!
//! ```rust,ignore
//! impl Validatable for BookDto {
//!     fn validate(&self) -> Result<(), ValidationErrors> {
//!         ValidationErrors::new()
//!             .required("title", &self.title)
//!             .max_chars("title", &self.title, 200)
//!             .within("year", self.year, 0..=2100)
//!             .finish()
//!     }
//! }
//! ```

use serde::Serialize;
use std::{fmt, ops::RangeInclusive};

/// One broken rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every rule a payload broke, in the order they were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a rule broken by a check the builder methods do not cover.
    #[must_use]
    pub fn reject(mut self, field: &str, message: impl Into<String>) -> Self {
        self.errors.push(ValidationError::new(field, message));
        self
    }

    /// The text must contain something other than whitespace.
    #[must_use]
    pub fn required(self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.reject(field, "is required")
        } else {
            self
        }
    }

    #[must_use]
    pub fn max_chars(self, field: &str, value: &str, max: usize) -> Self {
        if value.chars().count() > max {
            self.reject(field, format!("must be at most {max} characters"))
        } else {
            self
        }
    }

    #[must_use]
    pub fn within<T: PartialOrd + fmt::Display>(
        self,
        field: &str,
        value: T,
        bounds: RangeInclusive<T>,
    ) -> Self {
        if bounds.contains(&value) {
            self
        } else {
            let message = format!("must be between {} and {}", bounds.start(), bounds.end());
            self.reject(field, message)
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// # Errors
    ///
    /// Returns the collected rules when at least one was broken.
    pub fn finish(self) -> Result<(), Self> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rules = self.errors.iter();
        if let Some(first) = rules.next() {
            write!(f, "{first}")?;
        }
        for rule in rules {
            write!(f, "; {rule}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// A payload accepted by create and update.
pub trait Validatable {
    /// # Errors
    ///
    /// Returns every rule the payload breaks.
    fn validate(&self) -> Result<(), ValidationErrors>;
}
