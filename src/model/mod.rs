pub mod catalog;
pub mod courier;
pub mod order;
pub mod sku;
pub mod store;
pub mod warehouse;
