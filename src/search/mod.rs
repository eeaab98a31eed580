//! Search and sort strategies applied by the record view

pub mod matcher;
pub mod sorter;
