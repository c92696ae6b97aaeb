pub mod config;
pub mod constants;
pub mod error;
pub mod free_list;
pub mod io;
pub mod memory;
pub mod mmu;
pub mod page_table;
pub mod shared;
pub mod translation;

// Re-export commonly used items for convenience
pub use config::MmuConfig;
pub use constants::*;
pub use error::{ConfigError, MmuError, Result};
pub use mmu::{MemoryStats, Mmu};
pub use shared::SharedMmu;
pub use translation::VirtualAddress;
