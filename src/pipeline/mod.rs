//! Pure derivation functions: filter, sort, paginate and criteria normalization.
//!
//! Every function here is a selector over immutable inputs. None of them
//! fail; an unmatched query or an out-of-range page yields an empty result.

pub mod criteria;
pub mod filter;
pub mod paginate;
pub mod sort;

pub use criteria::{ensure_minimum_criteria, is_advanced_search_active, MIN_CRITERIA_ROWS};
pub use filter::{apply_advanced_filters, filter_by_query, matches_query};
pub use paginate::{clamp_page, paginate, total_pages, PageInfo};
pub use sort::{sort_results, sorted};
