pub mod accounts;
pub mod boards;
pub mod rounds;
pub mod winners;

pub use accounts::Entity as Accounts;
pub use boards::Entity as Boards;
pub use rounds::Entity as Rounds;
pub use winners::Entity as Winners;

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// JSON array of numbers stored in `boards.numbers` and `rounds.winning_numbers`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct NumberList(pub Vec<u8>);
