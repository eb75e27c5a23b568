pub mod equity;
