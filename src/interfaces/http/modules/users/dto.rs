//! User DTOs
//!
//! Resources are rendered HAL-style: each user carries `_links`, the
//! collection wraps users in `_embedded.users` and adds `page` metadata.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::domain::{CreateUserDto, DomainError, GetUserDto, SortOrder, UpdateUserDto, User};
use crate::shared::PaginatedResult;

pub const USERS_PATH: &str = "/api/users";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Link {
    pub href: String,
}

impl Link {
    fn to(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    pub user: Link,
}

/// User API representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[schema(value_type = String, format = Date, example = "2000-01-01")]
    pub day_of_birth: NaiveDate,
    pub email: String,
    #[serde(rename = "_links")]
    pub links: UserLinks,
}

pub fn user_href(id: i64) -> String {
    format!("{}/{}", USERS_PATH, id)
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        let href = user_href(u.id);
        Self {
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
            day_of_birth: u.day_of_birth,
            email: u.email,
            links: UserLinks {
                self_link: Link::to(href.clone()),
                user: Link::to(href),
            },
        }
    }
}

/// Body of `POST`, `PUT` and `PATCH`. Missing and `null` fields are the same.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    #[schema(example = "Ivan")]
    pub first_name: Option<String>,
    #[schema(example = "Ivanov")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "blank_date_as_none")]
    #[schema(value_type = Option<String>, format = Date, example = "2000-01-01")]
    pub day_of_birth: Option<NaiveDate>,
    #[schema(example = "ivan@example.com")]
    pub email: Option<String>,
}

/// `""` reads as an absent date; any other non-ISO text is a parse error.
fn blank_date_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| {
                serde::de::Error::custom(format!("invalid dayOfBirth '{}': {}", raw, e))
            }),
    }
}

impl From<UserRequest> for CreateUserDto {
    fn from(r: UserRequest) -> Self {
        Self {
            first_name: r.first_name,
            last_name: r.last_name,
            day_of_birth: r.day_of_birth,
            email: r.email,
        }
    }
}

impl From<UserRequest> for UpdateUserDto {
    fn from(r: UserRequest) -> Self {
        Self {
            first_name: r.first_name,
            last_name: r.last_name,
            day_of_birth: r.day_of_birth,
            email: r.email,
        }
    }
}

/// Page metadata
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// Requested page size
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    /// Zero-based page number
    pub number: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmbeddedUsers {
    pub users: Vec<UserDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CollectionLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<Link>,
}

/// Paged user collection
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserCollectionDto {
    #[serde(rename = "_embedded")]
    pub embedded: EmbeddedUsers,
    #[serde(rename = "_links")]
    pub links: CollectionLinks,
    pub page: PageMetadata,
}

fn page_href(page: u64, size: u64, sort: &[SortOrder]) -> String {
    let mut href = format!("{}?page={}&size={}", USERS_PATH, page, size);
    for order in sort {
        href.push_str("&sort=");
        href.push_str(&order.to_string());
    }
    href
}

impl UserCollectionDto {
    pub fn new(result: PaginatedResult<User>, sort: &[SortOrder]) -> Self {
        let (page, size, total_pages) = (result.page, result.size, result.total_pages);
        let link = |p: u64| Link::to(page_href(p, size, sort));

        let paged = total_pages > 1;
        let links = CollectionLinks {
            self_link: link(page),
            first: paged.then(|| link(0)),
            prev: (paged && result.has_previous()).then(|| link(page - 1)),
            next: page
                .checked_add(1)
                .filter(|_| result.has_next())
                .map(link),
            last: paged.then(|| link(total_pages - 1)),
        };

        let metadata = PageMetadata {
            size,
            total_elements: result.total,
            total_pages,
            number: page,
        };

        Self {
            embedded: EmbeddedUsers {
                users: result.items.into_iter().map(UserDto::from).collect(),
            },
            links,
            page: metadata,
        }
    }
}

/// Build a page request from raw query pairs (`page`, `size`, repeated `sort`).
///
/// Unknown parameters are ignored.
pub fn page_request_from_query(pairs: &[(String, String)]) -> Result<GetUserDto, DomainError> {
    let mut dto = GetUserDto::default();

    for (key, value) in pairs {
        match key.as_str() {
            "page" => dto.page = parse_number("page", value)?,
            "size" => dto.size = parse_number("size", value)?,
            "sort" => dto.sort.extend(SortOrder::parse_param(value)?),
            _ => {}
        }
    }

    Ok(dto)
}

/// `page` and `size` are 32-bit on the wire, which keeps `page * size`
/// well inside the signed 64-bit offset SQLite binds.
fn parse_number(name: &str, value: &str) -> Result<u64, DomainError> {
    value.trim().parse::<u32>().map(u64::from).map_err(|_| {
        DomainError::MalformedInput(format!(
            "Parameter '{}' must be an integer between 0 and {}, got '{}'",
            name,
            u32::MAX,
            value
        ))
    })
}
