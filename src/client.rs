mod builder;
mod handle;
mod reuse;

pub use builder::ClientBuilder;
pub use handle::Client;
pub use reuse::{Fifo, Lifo, ReuseStrategy, StrategyFactory, StrategyRegistry};
