pub mod catalog;
pub mod export;
pub mod feed;
pub mod import;
pub mod search;
pub mod slug;
pub mod table;
