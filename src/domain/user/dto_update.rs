use chrono::NaiveDate;

use super::{CreateUserDto, User};

/// Partial user body, as sent to `PATCH`. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserDto {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub day_of_birth: Option<NaiveDate>,
    pub email: Option<String>,
}

impl UpdateUserDto {
    /// Overlay the supplied fields on `current`.
    pub fn merge_onto(self, current: &User) -> CreateUserDto {
        CreateUserDto {
            first_name: Some(self.first_name.unwrap_or_else(|| current.first_name.clone())),
            last_name: Some(self.last_name.unwrap_or_else(|| current.last_name.clone())),
            day_of_birth: Some(self.day_of_birth.unwrap_or(current.day_of_birth)),
            email: Some(self.email.unwrap_or_else(|| current.email.clone())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.day_of_birth.is_none()
            && self.email.is_none()
    }
}
