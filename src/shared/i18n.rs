//! Localized validation messages.
//!
//! Messages follow the wording of the Hibernate Validator bundles so that
//! clients written against a Spring backend see the same text.

use serde::{Deserialize, Serialize};

use crate::domain::Constraint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ru,
    En,
}

impl Locale {
    /// Pick the first supported language from an `Accept-Language` value.
    pub fn from_accept_language(header: &str) -> Option<Self> {
        header
            .split(',')
            .filter_map(|part| part.split(';').next())
            .map(|tag| tag.trim().to_ascii_lowercase())
            .find_map(|tag| match tag.split('-').next() {
                Some("ru") => Some(Self::Ru),
                Some("en") => Some(Self::En),
                _ => None,
            })
    }

    pub fn message(&self, constraint: &Constraint) -> String {
        match (self, constraint) {
            (Self::Ru, Constraint::NotNull) => "не должно равняться null".to_string(),
            (Self::Ru, Constraint::Size { min, max }) => {
                format!("размер должен находиться в диапазоне от {} до {}", min, max)
            }
            (Self::Ru, Constraint::Email) => {
                "должно иметь формат адреса электронной почты".to_string()
            }
            (Self::Ru, Constraint::Past) => "должно содержать прошедшую дату".to_string(),
            (Self::En, Constraint::NotNull) => "must not be null".to_string(),
            (Self::En, Constraint::Size { min, max }) => {
                format!("size must be between {} and {}", min, max)
            }
            (Self::En, Constraint::Email) => "must be a well-formed email address".to_string(),
            (Self::En, Constraint::Past) => "must be a past date".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_language_prefers_first_supported_tag() {
        assert_eq!(Locale::from_accept_language("de-DE, en-US;q=0.8, ru;q=0.5"), Some(Locale::En));
        assert_eq!(Locale::from_accept_language("ru-RU"), Some(Locale::Ru));
        assert_eq!(Locale::from_accept_language("fr"), None);
    }

    #[test]
    fn size_message_includes_bounds() {
        let size = Constraint::Size { min: 2, max: 15 };
        assert_eq!(
            Locale::Ru.message(&size),
            "размер должен находиться в диапазоне от 2 до 15"
        );
        assert_eq!(Locale::En.message(&size), "size must be between 2 and 15");
    }
}
