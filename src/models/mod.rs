pub mod center;
pub mod crop;
pub mod farm;
pub mod market_price;
pub mod producer;
pub mod route;
pub mod supply;
pub mod training;
pub mod transaction;
