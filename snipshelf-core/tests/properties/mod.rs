//! Property-based tests for SnipShelf core library

mod category_tests;
mod snippet_tests;
mod tag_tests;
