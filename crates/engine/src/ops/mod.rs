use sea_orm::DatabaseConnection;

use crate::ResultEngine;

mod access;
mod actions;
mod products;
mod users;

pub use actions::Purchase;
pub use users::NewUser;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
///
/// `?` and `return` inside the block leave the block, not the caller, so the
/// rollback always runs before the error is handed back.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result: $crate::ResultEngine<_> = async { $body }.await;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = $tx.rollback().await {
                    tracing::warn!("rollback failed: {rollback_err}");
                }
                Err(err)
            }
        }
    }};
}

pub(crate) use with_tx;

#[derive(Clone, Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{Database, QueryFilter, TransactionTrait, prelude::*, sea_query::Expr};

    use super::*;
    use crate::{EngineError, NewUser, users};
    use migration::MigratorTrait;

    async fn engine_with_db() -> Engine {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        Engine::builder().database(db).build().await.unwrap()
    }

    /// Writes a balance, then fails inside the same unit of work.
    async fn credit_then_fail(engine: &Engine, user_id: i32) -> ResultEngine<()> {
        with_tx!(engine, |db_tx| {
            users::Entity::update_many()
                .col_expr(users::Column::Deposit, Expr::value(50))
                .filter(users::Column::Id.eq(user_id))
                .exec(&db_tx)
                .await?;
            Err(EngineError::InvalidInput("aborted".to_string()))
        })
    }

    #[tokio::test]
    async fn failed_unit_of_work_discards_earlier_writes() {
        let engine = engine_with_db().await;
        let buyer = engine
            .register(NewUser {
                username: "buyer@example.com".to_string(),
                password: "Test1234".to_string(),
                role: None,
            })
            .await
            .unwrap();

        let err = credit_then_fail(&engine, buyer.id).await.unwrap_err();
        assert_eq!(err, EngineError::InvalidInput("aborted".to_string()));
        assert_eq!(engine.user(buyer.id).await.unwrap().deposit, 0);

        engine.deposit(buyer.id, 10).await.unwrap();
        assert_eq!(engine.user(buyer.id).await.unwrap().deposit, 10);
    }
}
