pub mod cart;
pub mod menu;
