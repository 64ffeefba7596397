pub mod check;
pub mod suggest;

pub use check::{check, CheckArgs};
pub use suggest::{suggest, SuggestArgs};
