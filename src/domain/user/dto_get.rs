use std::fmt;
use std::str::FromStr;

use crate::domain::DomainError;

/// Sortable user properties, named as they appear in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    FirstName,
    LastName,
    DayOfBirth,
    Email,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::DayOfBirth => "dayOfBirth",
            Self::Email => "email",
        }
    }
}

impl FromStr for SortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "firstName" => Ok(Self::FirstName),
            "lastName" => Ok(Self::LastName),
            "dayOfBirth" => Ok(Self::DayOfBirth),
            "email" => Ok(Self::Email),
            other => Err(DomainError::MalformedInput(format!(
                "No property '{}' found for type 'User'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: Direction,
}

impl SortOrder {
    /// Parse one `sort` parameter: `field[,field...][,asc|desc]`.
    ///
    /// The trailing direction applies to every field in the same parameter.
    pub fn parse_param(value: &str) -> Result<Vec<SortOrder>, DomainError> {
        let mut parts: Vec<&str> = value
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        let direction = match parts.last().and_then(|p| Direction::parse(p)) {
            Some(d) => {
                parts.pop();
                d
            }
            None => Direction::Asc,
        };

        parts
            .into_iter()
            .map(|p| {
                Ok(SortOrder {
                    field: p.parse()?,
                    direction,
                })
            })
            .collect()
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.direction {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        };
        write!(f, "{},{}", self.field.as_str(), dir)
    }
}

/// Query for one page of users. `page` is zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetUserDto {
    pub page: u64,
    pub size: u64,
    pub sort: Vec<SortOrder>,
}

impl GetUserDto {
    pub const DEFAULT_SIZE: u64 = 20;

    /// Largest row offset a SQL backend can bind.
    pub const MAX_OFFSET: u64 = i64::MAX as u64;

    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size).min(Self::MAX_OFFSET)
    }
}

impl Default for GetUserDto {
    fn default() -> Self {
        Self {
            page: 0,
            size: Self::DEFAULT_SIZE,
            sort: Vec::new(),
        }
    }
}
