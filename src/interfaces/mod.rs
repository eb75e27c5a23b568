pub mod clock;
pub mod exchange_adapter;
