//! Native host for the `courier` upload workflow.
//!
//! ARCHITECTURE
//! ============
//! `courier` owns the workflow; this crate supplies the native pieces it is
//! generic over: a `reqwest` transport, a JSON file session store, local file
//! reading, and a console notifier. `main.rs` wires them behind `clap`
//! subcommands.

pub mod console;
pub mod files;
pub mod store;
pub mod transport;

pub use console::ConsoleNotifier;
pub use files::read_selected_file;
pub use store::FileSessionStore;
pub use transport::ReqwestTransport;
