use chrono::NaiveDate;
use validator::ValidationErrors;

use super::validation::{self, FIRST_NAME, LAST_NAME};
use super::UserFields;
use crate::domain::{DomainError, DomainResult};

/// Full user body, as sent to `POST` and `PUT`.
///
/// Every field is optional at this stage so that a missing field is
/// reported as a violation instead of a parse error.
#[derive(Debug, Clone, Default)]
pub struct CreateUserDto {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub day_of_birth: Option<NaiveDate>,
    pub email: Option<String>,
}

impl CreateUserDto {
    /// Collect every violation against `today` as the reference date.
    pub fn validate_at(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        validation::check_name(&mut errors, FIRST_NAME, self.first_name.as_deref());
        validation::check_name(&mut errors, LAST_NAME, self.last_name.as_deref());
        validation::check_day_of_birth(&mut errors, self.day_of_birth, today);
        validation::check_email(&mut errors, self.email.as_deref());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and unwrap into [`UserFields`].
    pub fn into_fields(self, today: NaiveDate) -> DomainResult<UserFields> {
        self.validate_at(today)
            .map_err(|e| DomainError::Validation(validation::violations(&e)))?;

        match (self.first_name, self.last_name, self.day_of_birth, self.email) {
            (Some(first_name), Some(last_name), Some(day_of_birth), Some(email)) => Ok(UserFields {
                first_name,
                last_name,
                day_of_birth,
                email,
            }),
            _ => Err(DomainError::MalformedInput("incomplete user body".into())),
        }
    }
}

impl From<UserFields> for CreateUserDto {
    fn from(f: UserFields) -> Self {
        Self {
            first_name: Some(f.first_name),
            last_name: Some(f.last_name),
            day_of_birth: Some(f.day_of_birth),
            email: Some(f.email),
        }
    }
}
