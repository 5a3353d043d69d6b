//! Utilities for the command-line front end.
//!
//! - [`truncate_with_ellipsis`]: fit a cell into a column, counting wide characters
//! - [`truncate_at_word`]: the same, preferring word boundaries
//! - [`ResultColumns`]: title/authors/venue/year widths for a terminal width

mod display;

pub use display::{
    display_width, is_terminal, terminal_width, truncate_at_word, truncate_with_ellipsis,
    ResultColumns, DEFAULT_WIDTH,
};
