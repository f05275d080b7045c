//! Sort Resolver: the ordering each read operation produces.

use crate::{
    query::{Sort, SortDirection},
    request::Clause,
    toy::fields,
};

/// The only value of `isAscending` that selects ascending order.
const ASCENDING_FLAG: &str = "true";

pub struct SortResolver;

impl SortResolver {
    /// List-all: newest first. Not configurable.
    pub fn list_all() -> Sort {
        Sort::new(fields::CREATED_AT, SortDirection::Desc)
    }

    /// Owner query: by price, ascending only for the literal `"true"`. Absence,
    /// `"false"` and anything else sort descending.
    pub fn owner_query(is_ascending: &Clause<String>) -> Sort {
        let direction = match is_ascending {
            Clause::Present(flag) if flag == ASCENDING_FLAG => SortDirection::Asc,
            _ => SortDirection::Desc,
        };

        Sort::new(fields::PRICE, direction)
    }

    /// Every other read keeps the store's natural order.
    pub fn unordered() -> Option<Sort> {
        None
    }
}
