//! Widgets

mod tip_card;

pub use tip_card::TipCard;
