// Proptest generators for number sets. Values are valid by construction.

use proptest::prelude::*;
use proptest::sample::subsequence;

use super::numbers::{BoardNumbers, WinningNumbers, FIELD_COUNTS, MAX_NUMBER, MIN_NUMBER};

fn all_numbers() -> Vec<u8> {
    (MIN_NUMBER..=MAX_NUMBER).collect()
}

pub fn board_numbers() -> impl Strategy<Value = BoardNumbers> {
    let sizes = (*FIELD_COUNTS.start() as usize)..=(*FIELD_COUNTS.end() as usize);
    subsequence(all_numbers(), sizes).prop_map(|picked| {
        BoardNumbers::new(&picked).expect("subsequence yields a valid board")
    })
}

pub fn winning_numbers() -> impl Strategy<Value = WinningNumbers> {
    subsequence(all_numbers(), 3).prop_map(|picked| {
        WinningNumbers::new(&picked).expect("subsequence yields a valid draw")
    })
}
