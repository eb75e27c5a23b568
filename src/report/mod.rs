pub mod builder;
pub mod record;
