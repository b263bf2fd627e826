pub mod patterns;
pub mod relative_date;
pub mod todo_parser;

pub use relative_date::resolve_relative_dates;
pub use todo_parser::parse_record;
