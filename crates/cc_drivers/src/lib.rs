//! Cross-process turn synchronization: shared memory, the deadline timer,
//! and the `MainDriver` turn loop (SPEC_FULL.md §4.5-§4.6, §5, §6).

pub mod config;
pub mod driver;
pub mod errors;
pub mod result;
pub mod shared_buffer;
pub mod shared_memory_main;
pub mod timer;

pub use config::MatchConfig;
pub use driver::MainDriver;
pub use errors::HostError;
pub use result::{GameResult, PlayerResult, PlayerStatus, WinType};
pub use shared_buffer::SharedBuffer;
pub use shared_memory_main::SharedMemoryMain;
pub use timer::Timer;
