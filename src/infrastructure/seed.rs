//! Fixture users loaded into an empty store and restored on reset.

use chrono::NaiveDate;

use crate::domain::User;

const SEED: [(&str, &str, (i32, u32, u32)); 20] = [
    ("Anna", "Smirnova", (1985, 3, 12)),
    ("Boris", "Ivanov", (1979, 11, 2)),
    ("Clara", "Petrova", (1992, 7, 23)),
    ("Dmitry", "Sokolov", (1988, 1, 30)),
    ("Elena", "Kuznetsova", (1995, 5, 5)),
    ("Fedor", "Popov", (1970, 9, 17)),
    ("Galina", "Vasilieva", (1983, 12, 1)),
    ("Igor", "Morozov", (1990, 4, 8)),
    ("Julia", "Novikova", (1999, 2, 14)),
    ("Konstantin", "Volkov", (1976, 6, 21)),
    ("Larisa", "Fedorova", (1987, 10, 10)),
    ("Mikhail", "Alekseev", (1993, 8, 3)),
    ("Nadezhda", "Lebedeva", (1981, 3, 27)),
    ("Oleg", "Semenov", (1974, 12, 31)),
    ("Polina", "Egorova", (2001, 1, 19)),
    ("Roman", "Pavlov", (1968, 7, 7)),
    ("Svetlana", "Kozlova", (1996, 11, 11)),
    ("Timur", "Stepanov", (1989, 5, 25)),
    ("Uliana", "Nikolaeva", (2003, 9, 9)),
    ("Viktor", "Orlov", (1984, 2, 28)),
];

/// Number of users in the seed; ids run from 1 to this value.
pub const SEED_SIZE: i64 = SEED.len() as i64;

pub fn seed_email(id: i64) -> String {
    format!("workingemail-{}@gmail.com", id)
}

pub fn seed_users() -> Vec<User> {
    SEED.iter()
        .zip(1..)
        .filter_map(|(&(first, last, (y, m, d)), id)| {
            Some(User {
                id,
                first_name: first.to_string(),
                last_name: last.to_string(),
                day_of_birth: NaiveDate::from_ymd_opt(y, m, d)?,
                email: seed_email(id),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_complete_and_ordered() {
        let users = seed_users();
        assert_eq!(users.len() as i64, SEED_SIZE);
        assert_eq!(users[9].id, 10);
        assert_eq!(users[9].email, "workingemail-10@gmail.com");
    }

    #[test]
    fn seed_passes_field_validation() {
        let today = chrono::Utc::now().date_naive();
        for user in seed_users() {
            let dto = crate::domain::CreateUserDto::from(crate::domain::UserFields::from(user));
            assert!(dto.validate_at(today).is_ok());
        }
    }
}
