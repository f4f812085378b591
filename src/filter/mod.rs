pub mod list_query;
pub mod pagination;

pub use list_query::{ListQuery, SqlParam};
pub use pagination::Pagination;
