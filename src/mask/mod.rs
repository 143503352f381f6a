pub mod conformer;
pub mod currency_mask;
