pub mod gateway;
pub mod pacer;
pub mod profile;
pub mod session;
