use async_trait::async_trait;

use super::{GetUserDto, User, UserFields};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

/// Persistence port for users.
///
/// Implementations enforce e-mail uniqueness themselves and report a clash
/// as `DomainError::Conflict`, even though the service checks first.
#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    async fn list_users(&self, dto: &GetUserDto) -> DomainResult<PaginatedResult<User>>;
    async fn get_user_by_id(&self, id: i64) -> DomainResult<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    async fn create_user(&self, fields: UserFields) -> DomainResult<User>;
    async fn update_user(&self, id: i64, fields: UserFields) -> DomainResult<Option<User>>;
    async fn delete_user(&self, id: i64) -> DomainResult<()>;

    /// Drop every user and restore the seed, including the id sequence.
    async fn reset(&self) -> DomainResult<()>;
    /// Cheap liveness probe of the backing store.
    async fn ping(&self) -> DomainResult<()>;
}
