pub mod domain;
pub mod extract;
pub mod patterns;
