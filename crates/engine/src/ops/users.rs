use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, SqlErr, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, Role, User, password, products, users, util};

use super::{Engine, with_tx};

/// Registration payload.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    /// Defaults to [`Role::Buyer`].
    pub role: Option<Role>,
}

impl Engine {
    /// Register a new user with a zero deposit.
    ///
    /// Fails with `Conflict` if the username is taken.
    pub async fn register(&self, new_user: NewUser) -> ResultEngine<User> {
        let username = util::validate_username(&new_user.username)?;
        if new_user.password.is_empty() {
            return Err(EngineError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }
        let role = new_user.role.unwrap_or_default();
        let hashed = password::hash_blocking(new_user.password).await?;

        let user = with_tx!(self, |db_tx| {
            let exists = users::Entity::find()
                .filter(users::Column::Username.eq(username.as_str()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::Conflict(username.clone()));
            }

            let now = Utc::now();
            let active = users::ActiveModel {
                id: ActiveValue::NotSet,
                username: ActiveValue::Set(username.clone()),
                password: ActiveValue::Set(hashed),
                deposit: ActiveValue::Set(0),
                role: ActiveValue::Set(role.as_str().to_string()),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            };
            // A concurrent registration can still win the race after the check above.
            let model = active
                .insert(&db_tx)
                .await
                .map_err(|err| match err.sql_err() {
                    Some(SqlErr::UniqueConstraintViolation(_)) => {
                        EngineError::Conflict(username.clone())
                    }
                    _ => EngineError::Database(err),
                })?;
            User::try_from(model)
        })?;

        tracing::info!(user_id = user.id, role = %user.role, "user registered");
        Ok(user)
    }

    /// Verify a username/password pair and return the matching user.
    ///
    /// Unknown users and wrong passwords fail the same way.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<User> {
        let model = with_tx!(self, |db_tx| {
            users::Entity::find()
                .filter(users::Column::Username.eq(username))
                .one(&db_tx)
                .await
                .map_err(EngineError::from)
        })?;

        let Some(model) = model else {
            return Err(EngineError::InvalidCredentials);
        };
        if !password::verify_blocking(password.to_string(), model.password.clone()).await? {
            return Err(EngineError::InvalidCredentials);
        }
        User::try_from(model)
    }

    /// Login check: the username must look like an email address before the
    /// credentials are verified.
    pub async fn login(&self, username: &str, password: &str) -> ResultEngine<User> {
        if !util::is_email_shaped(username) {
            return Err(EngineError::InvalidCredentials);
        }
        let user = self.authenticate(username, password).await?;
        tracing::debug!(user_id = user.id, "user logged in");
        Ok(user)
    }

    /// Return a fresh user snapshot from DB.
    pub async fn user(&self, user_id: i32) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, user_id).await?;
            User::try_from(model)
        })
    }

    /// Look a user up by username.
    pub async fn user_by_username(&self, username: &str) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = users::Entity::find()
                .filter(users::Column::Username.eq(username))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound(username.to_string()))?;
            User::try_from(model)
        })
    }

    /// Remove a user. A seller's products are removed with it.
    pub async fn remove_user(&self, user_id: i32) -> ResultEngine<()> {
        let removed_products = with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, user_id).await?;
            let removed = products::Entity::delete_many()
                .filter(products::Column::SellerId.eq(model.id))
                .exec(&db_tx)
                .await?
                .rows_affected;
            users::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(removed)
        })?;

        tracing::info!(user_id, removed_products, "user removed");
        Ok(())
    }
}
