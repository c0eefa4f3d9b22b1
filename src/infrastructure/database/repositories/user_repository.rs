use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DbBackend, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, Statement,
    TransactionTrait,
};
use tracing::debug;

use crate::domain::{
    Direction, DomainError, DomainResult, GetUserDto, InfraError, SortField, User, UserFields,
    UserRepositoryInterface,
};
use crate::infrastructure::database::entities::user;
use crate::infrastructure::database::migrator::seed_insert;
use crate::shared::PaginatedResult;

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        day_of_birth: model.day_of_birth,
        email: model.email,
    }
}

fn sort_column(field: SortField) -> user::Column {
    match field {
        SortField::Id => user::Column::Id,
        SortField::FirstName => user::Column::FirstName,
        SortField::LastName => user::Column::LastName,
        SortField::DayOfBirth => user::Column::DayOfBirth,
        SortField::Email => user::Column::Email,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    InfraError::Database(e).into()
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn list_users(&self, dto: &GetUserDto) -> DomainResult<PaginatedResult<User>> {
        let total = user::Entity::find().count(&self.db).await.map_err(db_err)?;

        let mut query = user::Entity::find();
        for order in &dto.sort {
            let direction = match order.direction {
                Direction::Asc => Order::Asc,
                Direction::Desc => Order::Desc,
            };
            query = query.order_by(sort_column(order.field), direction);
        }
        if !dto.sort.iter().any(|o| o.field == SortField::Id) {
            query = query.order_by_asc(user::Column::Id);
        }

        let models = query
            .offset(dto.offset())
            .limit(dto.size)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items: Vec<User> = models.into_iter().map(user_model_to_domain).collect();

        Ok(PaginatedResult::new(items, total, dto.page, dto.size))
    }

    async fn get_user_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn create_user(&self, fields: UserFields) -> DomainResult<User> {
        let new_user = user::ActiveModel {
            id: NotSet,
            first_name: Set(fields.first_name),
            last_name: Set(fields.last_name),
            day_of_birth: Set(fields.day_of_birth),
            email: Set(fields.email),
        };

        let model = new_user.insert(&self.db).await.map_err(db_err)?;
        Ok(user_model_to_domain(model))
    }

    async fn update_user(&self, id: i64, fields: UserFields) -> DomainResult<Option<User>> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = existing.into();
        active.first_name = Set(fields.first_name);
        active.last_name = Set(fields.last_name);
        active.day_of_birth = Set(fields.day_of_birth);
        active.email = Set(fields.email);

        let updated = active.update(&self.db).await.map_err(db_err)?;
        Ok(Some(user_model_to_domain(updated)))
    }

    async fn delete_user(&self, id: i64) -> DomainResult<()> {
        let result = user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::user_not_found(id));
        }

        Ok(())
    }

    async fn reset(&self) -> DomainResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let backend = txn.get_database_backend();

        let removed = user::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if backend == DbBackend::Sqlite {
            txn.execute(Statement::from_string(
                backend,
                "DELETE FROM sqlite_sequence WHERE name = 'users'",
            ))
            .await
            .map_err(db_err)?;
        }

        txn.execute(backend.build(&seed_insert()))
            .await
            .map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;

        debug!(removed = removed.rows_affected, "User table reset to seed");
        Ok(())
    }

    async fn ping(&self) -> DomainResult<()> {
        self.db.ping().await.map_err(db_err)
    }
}
