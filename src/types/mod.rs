pub mod balance;
pub mod exchange;
pub mod ids;
pub mod position;
pub mod price;
pub mod quantity;
pub mod timestamp;
