pub mod protection;
pub mod evaluation;
pub mod ensemble;
pub mod kill_engine;

pub use kill_engine::KillEngine;
