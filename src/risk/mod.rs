pub mod valuator;
