//! Insert the fixture users

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users::Users;
use crate::infrastructure::seed::seed_users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.exec_stmt(seed_insert()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let ids: Vec<i64> = seed_users().iter().map(|u| u.id).collect();
        let delete = Query::delete()
            .from_table(Users::Table)
            .and_where(Expr::col(Users::Id).is_in(ids))
            .to_owned();

        manager.exec_stmt(delete).await
    }
}

/// `INSERT` statement for every seed user, with explicit ids.
pub fn seed_insert() -> InsertStatement {
    let mut insert = Query::insert()
        .into_table(Users::Table)
        .columns([
            Users::Id,
            Users::FirstName,
            Users::LastName,
            Users::DayOfBirth,
            Users::Email,
        ])
        .to_owned();

    for user in seed_users() {
        insert.values_panic([
            user.id.into(),
            user.first_name.into(),
            user.last_name.into(),
            user.day_of_birth.into(),
            user.email.into(),
        ]);
    }

    insert
}
