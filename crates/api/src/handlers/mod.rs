pub mod contacts;
pub mod sync;
