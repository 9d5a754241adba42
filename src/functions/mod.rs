pub mod traits;
pub mod stats;
pub mod kill;
pub mod forward;
pub mod registry;

pub use registry::{StrategyGroup, StrategyRegistry};
pub use traits::{ForwardPredictor, KillStrategy};
