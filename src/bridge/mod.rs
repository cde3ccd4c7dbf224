pub mod protocol;
pub mod script;
pub mod server;
pub mod session;

pub use protocol::{HostEvent, MessageError, PageRequest, ShellCommand};
pub use server::{serve_lines, BridgeServer};
pub use session::{LoadState, ShellSession};
