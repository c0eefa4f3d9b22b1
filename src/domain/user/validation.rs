//! Field rules for users, expressed as `validator` errors.
//!
//! Codes are the stable constraint names from [`Constraint::code`]; the
//! rejected value and bounds travel as error params so the HTTP layer can
//! render a localized message later.

use std::borrow::Cow;

use chrono::NaiveDate;
use validator::{ValidateEmail, ValidationError, ValidationErrors};

use crate::domain::{Constraint, FieldViolation};

pub const FIRST_NAME: NameRule = NameRule {
    field: "firstName",
    min: 2,
    max: 15,
};
pub const LAST_NAME: NameRule = NameRule {
    field: "lastName",
    min: 2,
    max: 30,
};
pub const DAY_OF_BIRTH: &str = "dayOfBirth";
pub const EMAIL: &str = "email";

/// Declaration order, used to report violations deterministically.
const FIELD_ORDER: [&str; 4] = [FIRST_NAME.field, LAST_NAME.field, DAY_OF_BIRTH, EMAIL];

#[derive(Debug, Clone, Copy)]
pub struct NameRule {
    pub field: &'static str,
    pub min: u64,
    pub max: u64,
}

fn error(constraint: Constraint, value: &impl serde::Serialize) -> ValidationError {
    let mut err = ValidationError::new(constraint.code());
    err.add_param(Cow::from("value"), value);
    if let Constraint::Size { min, max } = constraint {
        err.add_param(Cow::from("min"), &min);
        err.add_param(Cow::from("max"), &max);
    }
    err
}

pub fn check_name(errors: &mut ValidationErrors, rule: NameRule, value: Option<&str>) {
    let Some(value) = value else {
        errors.add(rule.field, error(Constraint::NotNull, &serde_json::Value::Null));
        return;
    };
    let len = value.chars().count() as u64;
    if len < rule.min || len > rule.max {
        let size = Constraint::Size {
            min: rule.min,
            max: rule.max,
        };
        errors.add(rule.field, error(size, &value));
    }
}

pub fn check_day_of_birth(errors: &mut ValidationErrors, value: Option<NaiveDate>, today: NaiveDate) {
    match value {
        None => errors.add(DAY_OF_BIRTH, error(Constraint::NotNull, &serde_json::Value::Null)),
        Some(date) if date >= today => errors.add(DAY_OF_BIRTH, error(Constraint::Past, &date)),
        Some(_) => {}
    }
}

pub fn check_email(errors: &mut ValidationErrors, value: Option<&str>) {
    match value {
        None => errors.add(EMAIL, error(Constraint::NotNull, &serde_json::Value::Null)),
        Some(email) if !email.validate_email() => errors.add(EMAIL, error(Constraint::Email, &email)),
        Some(_) => {}
    }
}

fn constraint_of(err: &ValidationError) -> Option<Constraint> {
    let bound = |name: &str| err.params.get(name).and_then(|v| v.as_u64());
    match err.code.as_ref() {
        "NotNull" => Some(Constraint::NotNull),
        "Email" => Some(Constraint::Email),
        "Past" => Some(Constraint::Past),
        "Size" => Some(Constraint::Size {
            min: bound("min")?,
            max: bound("max")?,
        }),
        _ => None,
    }
}

/// Flatten `validator` errors into domain violations, ordered by field.
pub fn violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut out: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().filter_map(move |e| {
                Some(FieldViolation {
                    field: field.clone(),
                    constraint: constraint_of(e)?,
                    rejected_value: e.params.get("value").cloned().unwrap_or_default(),
                })
            })
        })
        .collect();

    out.sort_by_key(|v| {
        FIELD_ORDER
            .iter()
            .position(|f| *f == v.field)
            .unwrap_or(FIELD_ORDER.len())
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CreateUserDto;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn valid() -> CreateUserDto {
        CreateUserDto {
            first_name: Some("Ivan".into()),
            last_name: Some("Ivanov".into()),
            day_of_birth: NaiveDate::from_ymd_opt(2000, 1, 1),
            email: Some("asdas@asdas.tr".into()),
        }
    }

    fn codes(dto: &CreateUserDto) -> Vec<(String, &'static str)> {
        match dto.validate_at(today()) {
            Ok(()) => vec![],
            Err(e) => violations(&e)
                .into_iter()
                .map(|v| (v.field, v.constraint.code()))
                .collect(),
        }
    }

    #[test]
    fn valid_user_passes() {
        assert!(codes(&valid()).is_empty());
    }

    #[test]
    fn first_name_bounds_count_characters_not_bytes() {
        let mut dto = valid();
        dto.first_name = Some("Алёна-Генриэтта".into());
        assert!(codes(&dto).is_empty());

        dto.first_name = Some("El".into());
        assert!(codes(&dto).is_empty());

        dto.first_name = Some("I".into());
        assert_eq!(codes(&dto), vec![("firstName".to_string(), "Size")]);

        dto.first_name = Some("Ibhjllkjhgfdddrt".into());
        assert_eq!(codes(&dto), vec![("firstName".to_string(), "Size")]);
    }

    #[test]
    fn last_name_allows_thirty_characters() {
        let mut dto = valid();
        dto.last_name = Some("a".repeat(30));
        assert!(codes(&dto).is_empty());
        dto.last_name = Some("a".repeat(31));
        assert_eq!(codes(&dto), vec![("lastName".to_string(), "Size")]);
    }

    #[test]
    fn day_of_birth_must_be_strictly_past() {
        let mut dto = valid();
        dto.day_of_birth = Some(today());
        assert_eq!(codes(&dto), vec![("dayOfBirth".to_string(), "Past")]);

        dto.day_of_birth = today().pred_opt();
        assert!(codes(&dto).is_empty());
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut dto = valid();
        dto.email = Some("!*)(*&^54678jhgf".into());
        assert_eq!(codes(&dto), vec![("email".to_string(), "Email")]);
    }

    #[test]
    fn empty_body_reports_every_field_in_order() {
        let all = codes(&CreateUserDto::default());
        assert_eq!(
            all,
            vec![
                ("firstName".to_string(), "NotNull"),
                ("lastName".to_string(), "NotNull"),
                ("dayOfBirth".to_string(), "NotNull"),
                ("email".to_string(), "NotNull"),
            ]
        );
    }

    #[test]
    fn size_violation_keeps_bounds_and_value() {
        let mut dto = valid();
        dto.last_name = Some("X".into());
        let errors = dto.validate_at(today()).unwrap_err();
        let v = &violations(&errors)[0];
        assert_eq!(v.constraint, Constraint::Size { min: 2, max: 30 });
        assert_eq!(v.rejected_value, serde_json::json!("X"));
    }
}
