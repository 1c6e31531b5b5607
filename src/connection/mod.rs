// Connection module - the single managed SQLite connection
//
// - manager: the async-facing owner and the blocking-pool bridge
// - slot: connection handle, state machine and session bookkeeping

mod manager;
mod slot;

pub use manager::ConnectionManager;
pub use slot::ConnectionState;
