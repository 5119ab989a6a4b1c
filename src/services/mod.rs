//! # Services Module
//!
//! The environment a vault runs in, behind swappable traits.
//!
//! ## Components
//!
//! - **Clock**: current time, system or manually driven
//! - **Ledger**: account balances, inbound deposits and outbound payouts
//! - **Events**: best-effort withdrawal notifications
//! - **Store**: JSON persistence of host state

pub mod clock;
pub mod events;
pub mod ledger;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use events::{EventSink, JsonLinesEventSink, LogEventSink, RecordingEventSink};
pub use ledger::{InMemoryLedger, Ledger};
pub use store::{HostSnapshot, VaultStore};
