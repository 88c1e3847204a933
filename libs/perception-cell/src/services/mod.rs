pub mod perception;

pub use perception::PerceptionService;
