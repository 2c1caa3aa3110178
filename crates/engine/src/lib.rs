//! Vending machine engine.
//!
//! The engine owns the database and exposes the state transitions on users and
//! products: deposit, buy, reset, product CRUD, registration and removal.
//! Every transition re-reads the caller from the store, checks the role it
//! requires and runs inside a single database transaction.

pub use coin::Coin;
pub use error::EngineError;
pub use ops::{Engine, EngineBuilder, NewUser, Purchase};
pub use products::{Product, ProductFields};
pub use role::Role;
pub use users::User;

mod coin;
mod error;
mod ops;
pub mod password;
pub mod products;
mod role;
pub mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
