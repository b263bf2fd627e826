pub mod filter;
pub mod highlight;
pub mod input;
pub mod nav;
pub mod sort;
pub mod todo_ops;
