//! Domain repositories: domain models plus free functions over any `ConnectionTrait`.

pub mod accounts;
pub mod boards;
pub mod rounds;
pub mod winners;
