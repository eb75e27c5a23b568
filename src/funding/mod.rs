pub mod collector;
pub mod dedup;
pub mod pagination;
pub mod segmenter;
