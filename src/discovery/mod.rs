//! Discovery strategies: direct web search, profile pages and domain-pattern learning.

pub(crate) mod direct_search;
pub(crate) mod pattern;
pub(crate) mod profile;
