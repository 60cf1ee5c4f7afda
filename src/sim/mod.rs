pub mod event;
pub mod score;
pub mod step;
pub mod world;
