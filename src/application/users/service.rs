//! User management service
//!
//! All user-related business logic lives here.
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, instrument};

use crate::domain::{
    CreateUserDto, DomainError, DomainResult, GetUserDto, UpdateUserDto, User, UserFields,
    UserRepositoryInterface, USERS_EMAIL_INDEX,
};
use crate::shared::PaginatedResult;

/// Paging limits applied to every list request.
#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: GetUserDto::DEFAULT_SIZE,
            max_page_size: 1000,
        }
    }
}

/// Reference date for the "born in the past" rule.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Orchestrates the user use-cases on top of a repository.
///
/// Generic over `R: UserRepositoryInterface` so it stays decoupled from
/// the concrete persistence layer; the default is a trait object so the
/// backend can be chosen at runtime.
pub struct UserService<R: UserRepositoryInterface + ?Sized = dyn UserRepositoryInterface> {
    repo: Arc<R>,
    config: UserServiceConfig,
    clock: Clock,
}

impl<R: UserRepositoryInterface + ?Sized> UserService<R> {
    pub fn new(repo: Arc<R>, config: UserServiceConfig) -> Self {
        Self {
            repo,
            config,
            clock: Arc::new(|| Utc::now().date_naive()),
        }
    }

    /// Replace the clock used for date validation.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &UserServiceConfig {
        &self.config
    }

    fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    async fn ensure_email_free(&self, email: &str, owner: Option<i64>) -> DomainResult<()> {
        match self.repo.get_user_by_email(email).await? {
            Some(existing) if Some(existing.id) != owner => Err(DomainError::Conflict(format!(
                "unique constraint {} violated: '{}' is already used by another user",
                USERS_EMAIL_INDEX, email
            ))),
            _ => Ok(()),
        }
    }

    // ── Queries ─────────────────────────────────────────────────

    /// List users with sorting and pagination.
    ///
    /// A zero size falls back to the default; oversize requests are clamped.
    #[instrument(name = "users.service.list_users", skip(self), fields(page = dto.page, size = dto.size))]
    pub async fn list_users(&self, mut dto: GetUserDto) -> DomainResult<PaginatedResult<User>> {
        if dto.size == 0 {
            dto.size = self.config.default_page_size;
        }
        dto.size = dto.size.min(self.config.max_page_size);

        let page = self.repo.list_users(&dto).await?;
        debug!(returned = page.items.len(), total = page.total, "Listed users");
        Ok(page)
    }

    #[instrument(name = "users.service.get_user", skip(self))]
    pub async fn get_user(&self, id: i64) -> DomainResult<User> {
        self.repo
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    // ── Commands ────────────────────────────────────────────────

    #[instrument(name = "users.service.create_user", skip(self, dto))]
    pub async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let fields = dto.into_fields(self.today())?;
        self.ensure_email_free(&fields.email, None).await?;

        let user = self.repo.create_user(fields).await?;
        info!(user_id = user.id, "User created");
        Ok(user)
    }

    /// Replace every writable field of an existing user.
    ///
    /// A valid body for a missing user is 404 even when its e-mail is taken.
    #[instrument(name = "users.service.replace_user", skip(self, dto))]
    pub async fn replace_user(&self, id: i64, dto: CreateUserDto) -> DomainResult<User> {
        let fields = dto.into_fields(self.today())?;
        self.get_user(id).await?;
        self.store(id, fields).await
    }

    /// Merge the supplied fields into an existing user.
    ///
    /// Existence is checked before validation: a bad body for a missing
    /// user reports 404, not 400.
    #[instrument(name = "users.service.patch_user", skip(self, dto))]
    pub async fn patch_user(&self, id: i64, dto: UpdateUserDto) -> DomainResult<User> {
        let current = self.get_user(id).await?;
        if dto.is_empty() {
            return Ok(current);
        }

        let fields = dto.merge_onto(&current).into_fields(self.today())?;
        self.store(id, fields).await
    }

    async fn store(&self, id: i64, fields: UserFields) -> DomainResult<User> {
        self.ensure_email_free(&fields.email, Some(id)).await?;

        let user = self
            .repo
            .update_user(id, fields)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))?;
        info!(user_id = id, "User updated");
        Ok(user)
    }

    #[instrument(name = "users.service.delete_user", skip(self))]
    pub async fn delete_user(&self, id: i64) -> DomainResult<()> {
        self.repo.delete_user(id).await?;
        info!(user_id = id, "User deleted");
        Ok(())
    }

    /// Restore the seed snapshot.
    #[instrument(name = "users.service.reset", skip(self))]
    pub async fn reset(&self) -> DomainResult<()> {
        self.repo.reset().await?;
        info!("User store reset to seed");
        Ok(())
    }

    pub async fn ping(&self) -> DomainResult<()> {
        self.repo.ping().await
    }
}
