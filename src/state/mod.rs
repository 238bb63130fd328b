//! State module for tracking category runs
//!
//! # Components
//!
//! - `CategoryState`: where one category is in its fetch/extract/persist cycle

mod category_state;

pub use category_state::CategoryState;
