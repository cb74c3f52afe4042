pub mod actions;
pub mod cards;
pub mod commands;
pub mod dates;
pub mod oncall;
pub mod templates;
