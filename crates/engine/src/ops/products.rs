use chrono::Utc;
use sea_orm::{ActiveValue, QueryOrder, TransactionTrait, prelude::*};

use crate::{EngineError, Product, ProductFields, ResultEngine, Role, products};

use super::{Engine, with_tx};

impl Engine {
    /// Return every product, ordered by id.
    pub async fn products(&self) -> ResultEngine<Vec<Product>> {
        with_tx!(self, |db_tx| {
            let models = products::Entity::find()
                .order_by_asc(products::Column::Id)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Product::from).collect())
        })
    }

    /// Return a product snapshot from DB.
    pub async fn product(&self, product_id: i32) -> ResultEngine<Product> {
        with_tx!(self, |db_tx| {
            products::Entity::find_by_id(product_id)
                .one(&db_tx)
                .await?
                .map(Product::from)
                .ok_or_else(|| EngineError::NotFound(format!("product {product_id}")))
        })
    }

    /// Create a product owned by the calling seller.
    ///
    /// The seller id always comes from `user_id`.
    pub async fn create_product(
        &self,
        user_id: i32,
        fields: ProductFields,
    ) -> ResultEngine<Product> {
        let product = with_tx!(self, |db_tx| {
            let seller = self.require_role(&db_tx, user_id, Role::Seller).await?;
            let fields = fields.validated()?;
            let now = Utc::now();
            let active = products::ActiveModel {
                id: ActiveValue::NotSet,
                product_name: ActiveValue::Set(fields.product_name),
                cost: ActiveValue::Set(fields.cost),
                amount_available: ActiveValue::Set(fields.amount_available),
                seller_id: ActiveValue::Set(seller.id),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            };
            let model = active.insert(&db_tx).await?;
            Ok(Product::from(model))
        })?;

        tracing::info!(
            user_id,
            product_id = product.id,
            cost = product.cost,
            amount_available = product.amount_available,
            "product created"
        );
        Ok(product)
    }

    /// Replace name, cost and stock of a product owned by the calling seller.
    ///
    /// Fails with `NotFoundOrForbidden` when the product does not exist or
    /// belongs to another seller.
    pub async fn update_product(
        &self,
        user_id: i32,
        product_id: i32,
        fields: ProductFields,
    ) -> ResultEngine<Product> {
        let product = with_tx!(self, |db_tx| {
            self.require_role(&db_tx, user_id, Role::Seller).await?;
            let fields = fields.validated()?;
            let model = self
                .require_owned_product(&db_tx, product_id, user_id)
                .await?;

            let mut active: products::ActiveModel = model.into();
            active.product_name = ActiveValue::Set(fields.product_name);
            active.cost = ActiveValue::Set(fields.cost);
            active.amount_available = ActiveValue::Set(fields.amount_available);
            active.updated_at = ActiveValue::Set(Utc::now());
            let model = active.update(&db_tx).await?;
            Ok(Product::from(model))
        })?;

        tracing::info!(user_id, product_id, "product updated");
        Ok(product)
    }

    /// Delete a product owned by the calling seller. Returns the deleted row.
    pub async fn delete_product(&self, user_id: i32, product_id: i32) -> ResultEngine<Product> {
        let product = with_tx!(self, |db_tx| {
            self.require_role(&db_tx, user_id, Role::Seller).await?;
            let model = self
                .require_owned_product(&db_tx, product_id, user_id)
                .await?;

            products::Entity::delete_by_id(product_id)
                .exec(&db_tx)
                .await?;
            Ok(Product::from(model))
        })?;

        tracing::info!(user_id, product_id, "product deleted");
        Ok(product)
    }
}
