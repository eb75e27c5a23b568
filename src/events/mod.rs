pub mod balance;
pub mod funding;
