pub mod actions;
pub mod crafting;
pub mod encounters;
pub mod expedition;
