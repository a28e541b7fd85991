pub mod cache;
pub mod logs;
pub mod maps;

pub use cache::CacheCommands;
pub use logs::LogsCommands;
pub use maps::MapsCommands;
