pub mod catalog;
pub mod categories;
pub mod error;
pub mod grouping;
pub mod http_server;
pub mod models;
pub mod pagination;
pub mod search;
pub mod settings;
pub mod store;
