pub mod lead_card;
pub mod toast;
