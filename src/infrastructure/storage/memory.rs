//! In-memory user repository

use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::domain::{
    Direction, DomainError, DomainResult, GetUserDto, SortField, SortOrder, User, UserFields,
    UserRepositoryInterface,
};
use crate::infrastructure::seed::{seed_users, SEED_SIZE};
use crate::shared::PaginatedResult;

/// In-memory storage for development and testing
pub struct InMemoryUserRepository {
    users: DashMap<i64, User>,
    next_id: AtomicI64,
    /// Serializes writes so the e-mail check and the insert are atomic.
    write_lock: Mutex<()>,
}

impl InMemoryUserRepository {
    /// Repository pre-filled with the seed users.
    pub fn new() -> Self {
        let repo = Self::empty();
        repo.load_seed();
        repo
    }

    pub fn empty() -> Self {
        Self {
            users: DashMap::new(),
            next_id: AtomicI64::new(1),
            write_lock: Mutex::new(()),
        }
    }

    fn load_seed(&self) {
        self.users.clear();
        for user in seed_users() {
            self.users.insert(user.id, user);
        }
        self.next_id.store(SEED_SIZE + 1, Ordering::SeqCst);
    }

    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .iter()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn compare(a: &User, b: &User, field: SortField) -> CmpOrdering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::FirstName => a.first_name.cmp(&b.first_name),
        SortField::LastName => a.last_name.cmp(&b.last_name),
        SortField::DayOfBirth => a.day_of_birth.cmp(&b.day_of_birth),
        SortField::Email => a.email.cmp(&b.email),
    }
}

fn compare_by(a: &User, b: &User, orders: &[SortOrder]) -> CmpOrdering {
    orders
        .iter()
        .map(|o| match o.direction {
            Direction::Asc => compare(a, b, o.field),
            Direction::Desc => compare(b, a, o.field),
        })
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| a.id.cmp(&b.id))
}

fn email_conflict(email: &str) -> DomainError {
    DomainError::Conflict(format!("UNIQUE constraint failed: users.email ({})", email))
}

#[async_trait]
impl UserRepositoryInterface for InMemoryUserRepository {
    async fn list_users(&self, dto: &GetUserDto) -> DomainResult<PaginatedResult<User>> {
        let mut all: Vec<User> = self.users.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| compare_by(a, b, &dto.sort));

        let total = all.len() as u64;
        let offset = usize::try_from(dto.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(dto.size).unwrap_or(usize::MAX);
        let items = all.into_iter().skip(offset).take(size).collect();

        Ok(PaginatedResult::new(items, total, dto.page, dto.size))
    }

    async fn get_user_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.value().clone()))
    }

    async fn create_user(&self, fields: UserFields) -> DomainResult<User> {
        let _guard = self.write_lock.lock().await;
        if self.email_taken(&fields.email, None) {
            return Err(email_conflict(&fields.email));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let user = fields.into_user(id);
        self.users.insert(id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: i64, fields: UserFields) -> DomainResult<Option<User>> {
        let _guard = self.write_lock.lock().await;
        if !self.users.contains_key(&id) {
            return Ok(None);
        }
        if self.email_taken(&fields.email, Some(id)) {
            return Err(email_conflict(&fields.email));
        }

        let user = fields.into_user(id);
        self.users.insert(id, user.clone());
        Ok(Some(user))
    }

    async fn delete_user(&self, id: i64) -> DomainResult<()> {
        let _guard = self.write_lock.lock().await;
        self.users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    async fn reset(&self) -> DomainResult<()> {
        let _guard = self.write_lock.lock().await;
        self.load_seed();
        Ok(())
    }

    async fn ping(&self) -> DomainResult<()> {
        Ok(())
    }
}
