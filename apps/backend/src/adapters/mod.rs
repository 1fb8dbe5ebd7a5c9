//! SeaORM adapters. Functions return `DbErr`; repos map to `DomainError`.

pub mod accounts_sea;
pub mod boards_sea;
pub mod rounds_sea;
pub mod winners_sea;
