use chrono::NaiveDate;

/// Name of the unique index over `users.email`.
pub const USERS_EMAIL_INDEX: &str = "uk_users_email";

/// User model
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub day_of_birth: NaiveDate,
    pub email: String,
}

/// The writable part of a user, already validated.
///
/// Repositories only ever receive this type, so they can assume every
/// field rule holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserFields {
    pub first_name: String,
    pub last_name: String,
    pub day_of_birth: NaiveDate,
    pub email: String,
}

impl UserFields {
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            day_of_birth: self.day_of_birth,
            email: self.email,
        }
    }
}

impl From<User> for UserFields {
    fn from(u: User) -> Self {
        Self {
            first_name: u.first_name,
            last_name: u.last_name,
            day_of_birth: u.day_of_birth,
            email: u.email,
        }
    }
}
