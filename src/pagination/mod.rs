//! Pagination module
//!
//! # Overview
//!
//! Every Recharge list endpoint returns an optional `next_cursor`. When it is
//! present the next page lives at `{base_path}?limit=250&page_info={cursor}`;
//! when it is absent or null the result set is exhausted.

mod strategies;
mod types;

pub use strategies::CursorPaginator;
pub use types::{
    extract_cursor, next_url, NextPage, PaginationState, CURSOR_FIELD, CURSOR_PARAM, PAGE_SIZE,
};

#[cfg(test)]
mod tests;
