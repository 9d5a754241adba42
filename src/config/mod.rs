pub mod traits;
pub mod pool;
pub mod strategies;
pub mod protection;
pub mod ensemble;
pub mod forward;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use pool::PoolConfig;
pub use strategies::StrategyConfig;
pub use protection::ProtectionConfig;
pub use ensemble::EnsembleConfig;
pub use forward::ForwardConfig;
