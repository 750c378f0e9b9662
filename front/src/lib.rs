pub mod api;
pub mod board;
pub mod cache;
pub mod cli;
pub mod filter;

pub use api::ServiceClient;
pub use board::{Board, Draft, Editing};
pub use cache::{FileCache, MemoryCache, TaskCache};
pub use filter::{Counts, Filter, Section};
