pub mod ai;
pub mod cell;
pub mod entity;
pub mod error;
pub mod grid;
pub mod interact;
pub mod rules;
