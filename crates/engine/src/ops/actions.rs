use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*, sea_query::Expr};

use crate::{Coin, EngineError, Product, ResultEngine, Role, products, users, util};

use super::{Engine, with_tx};

/// Outcome of a successful purchase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Purchase {
    /// Buyer balance left after the purchase.
    pub change: i64,
    /// `cost * quantity`.
    pub spent: i64,
    /// Product as stored after the stock decrement.
    pub product: Product,
}

impl Engine {
    /// Buy `quantity` units of a product.
    ///
    /// Checks, in order: the caller is a buyer, the product exists, enough
    /// units are in stock, the deposit covers `cost * quantity`. Stock and
    /// deposit are decremented with conditional updates, so a concurrent
    /// purchase that drained either one makes this call fail instead of
    /// going negative.
    pub async fn buy(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i64,
    ) -> ResultEngine<Purchase> {
        let purchase = with_tx!(self, |db_tx| {
            self.require_role(&db_tx, user_id, Role::Buyer).await?;
            let quantity = util::validate_quantity(quantity)?;

            let product = products::Entity::find_by_id(product_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound(format!("product {product_id}")))?;
            if product.amount_available < quantity {
                return Err(EngineError::InsufficientStock(format!(
                    "{} units of product {product_id} available, {quantity} requested",
                    product.amount_available
                )));
            }

            let spent = product.cost.checked_mul(quantity).ok_or_else(|| {
                EngineError::InvalidInput("quantity too large".to_string())
            })?;
            let buyer = self.require_user(&db_tx, user_id).await?;
            if buyer.deposit < spent {
                return Err(EngineError::InsufficientFunds(format!(
                    "deposit is {}, {spent} required",
                    buyer.deposit
                )));
            }

            let now = Utc::now();
            let stock = products::Entity::update_many()
                .col_expr(
                    products::Column::AmountAvailable,
                    Expr::col(products::Column::AmountAvailable).sub(quantity),
                )
                .col_expr(products::Column::UpdatedAt, Expr::value(now))
                .filter(products::Column::Id.eq(product_id))
                .filter(products::Column::AmountAvailable.gte(quantity))
                .exec(&db_tx)
                .await?;
            if stock.rows_affected == 0 {
                return Err(EngineError::InsufficientStock(format!(
                    "product {product_id} sold out"
                )));
            }

            let funds = users::Entity::update_many()
                .col_expr(
                    users::Column::Deposit,
                    Expr::col(users::Column::Deposit).sub(spent),
                )
                .col_expr(users::Column::UpdatedAt, Expr::value(now))
                .filter(users::Column::Id.eq(user_id))
                .filter(users::Column::Deposit.gte(spent))
                .exec(&db_tx)
                .await?;
            if funds.rows_affected == 0 {
                return Err(EngineError::InsufficientFunds(format!(
                    "deposit changed, {spent} required"
                )));
            }

            let product = products::Entity::find_by_id(product_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound(format!("product {product_id}")))?;
            let buyer = self.require_user(&db_tx, user_id).await?;

            Ok(Purchase {
                change: buyer.deposit,
                spent,
                product: product.into(),
            })
        })?;

        tracing::info!(
            user_id,
            product_id,
            quantity,
            spent = purchase.spent,
            change = purchase.change,
            "purchase committed"
        );
        Ok(purchase)
    }

    /// Insert one coin into the buyer deposit. Returns the new balance.
    ///
    /// The coin is added in place, like the decrements of [`Engine::buy`], so
    /// concurrent deposits never overwrite each other.
    pub async fn deposit(&self, user_id: i32, amount: i64) -> ResultEngine<i64> {
        let balance = with_tx!(self, |db_tx| {
            let buyer = self.require_role(&db_tx, user_id, Role::Buyer).await?;
            let coin = Coin::try_from(amount)?;
            let limit = i64::MAX - coin.value();
            if buyer.deposit > limit {
                return Err(EngineError::InvalidInput(
                    "deposit limit reached".to_string(),
                ));
            }

            let credited = users::Entity::update_many()
                .col_expr(
                    users::Column::Deposit,
                    Expr::col(users::Column::Deposit).add(coin.value()),
                )
                .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(users::Column::Id.eq(buyer.id))
                .filter(users::Column::Deposit.lte(limit))
                .exec(&db_tx)
                .await?;
            if credited.rows_affected == 0 {
                return Err(EngineError::InvalidInput(
                    "deposit limit reached".to_string(),
                ));
            }

            Ok(self.require_user(&db_tx, user_id).await?.deposit)
        })?;

        tracing::info!(user_id, amount, balance, "deposit committed");
        Ok(balance)
    }

    /// Set the buyer deposit back to zero. Calling it twice is fine.
    pub async fn reset_deposit(&self, user_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let buyer = self.require_role(&db_tx, user_id, Role::Buyer).await?;
            let active = users::ActiveModel {
                id: ActiveValue::Set(buyer.id),
                deposit: ActiveValue::Set(0),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })?;

        tracing::info!(user_id, "deposit reset");
        Ok(())
    }
}
