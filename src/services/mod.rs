pub mod catalog;
pub mod debounce;
pub mod profile;
pub mod session;
pub mod storage;
pub mod store;
pub mod suggestions;
pub mod watchlist;
