//! The module contains the `Product` struct and the `products` table.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::{EngineError, ResultEngine};

/// A product sold by the machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Product {
    pub id: i32,
    pub product_name: String,
    /// Price per unit in the smallest coin unit.
    pub cost: i64,
    pub amount_available: i64,
    /// Owning seller. Set from the caller identity on creation, never changed.
    pub seller_id: i32,
}

/// Caller-editable product fields.
///
/// Used both for creation and for full-replacement updates. The engine
/// validates them once the caller's role has been checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductFields {
    pub product_name: String,
    pub cost: i64,
    pub amount_available: i64,
}

impl ProductFields {
    /// Trim the name and reject empty names or negative numbers.
    pub(crate) fn validated(self) -> ResultEngine<Self> {
        let product_name = crate::util::normalize_required_name(&self.product_name, "product")?;
        if self.cost < 0 {
            return Err(EngineError::InvalidInput("cost must be >= 0".to_string()));
        }
        if self.amount_available < 0 {
            return Err(EngineError::InvalidInput(
                "amountAvailable must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            product_name,
            ..self
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub product_name: String,
    pub cost: i64,
    pub amount_available: i64,
    pub seller_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SellerId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            product_name: model.product_name,
            cost: model.cost,
            amount_available: model.amount_available,
            seller_id: model.seller_id,
        }
    }
}
