use sea_orm::{DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, Role, products, users};

use super::{Engine, with_tx};

impl Engine {
    /// Return the current role of `user_id`, or `None` if the user no longer
    /// exists.
    ///
    /// The role is always read from the store, never from a caller-held copy.
    pub async fn role_of(&self, user_id: i32) -> ResultEngine<Option<Role>> {
        with_tx!(self, |db_tx| self.role_in(&db_tx, user_id).await)
    }

    pub(super) async fn find_user(
        &self,
        db: &DatabaseTransaction,
        user_id: i32,
    ) -> ResultEngine<Option<users::Model>> {
        users::Entity::find_by_id(user_id)
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn role_in(
        &self,
        db: &DatabaseTransaction,
        user_id: i32,
    ) -> ResultEngine<Option<Role>> {
        self.find_user(db, user_id)
            .await?
            .as_ref()
            .map(users::Model::role)
            .transpose()
    }

    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        user_id: i32,
    ) -> ResultEngine<users::Model> {
        self.find_user(db, user_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("user".to_string()))
    }

    /// Fails closed: an unknown user or any other role is `Unauthorized`.
    pub(super) async fn require_role(
        &self,
        db: &DatabaseTransaction,
        user_id: i32,
        required: Role,
    ) -> ResultEngine<users::Model> {
        let Some(model) = self.find_user(db, user_id).await? else {
            return Err(EngineError::Unauthorized(format!(
                "user {user_id} not exists"
            )));
        };
        if model.role()? != required {
            return Err(EngineError::Unauthorized(format!(
                "{required} role required"
            )));
        }
        Ok(model)
    }

    /// Looks up a product owned by `seller_id`.
    ///
    /// A missing product and a product owned by someone else produce the same
    /// error.
    pub(super) async fn require_owned_product(
        &self,
        db: &DatabaseTransaction,
        product_id: i32,
        seller_id: i32,
    ) -> ResultEngine<products::Model> {
        products::Entity::find_by_id(product_id)
            .filter(products::Column::SellerId.eq(seller_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFoundOrForbidden(product_id.to_string()))
    }
}
