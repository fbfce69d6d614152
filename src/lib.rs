//! Strictly Ledger - polling reconciliation for ledger-hosted Connect Four
//!
//! The authoritative game lives on a ledger that can only be polled. This
//! library keeps a responsive local picture of one watched game and refuses
//! local moves that the ledger would certainly reject.
//!
//! # Architecture
//!
//! - **Ledger**: reader/writer traits and a JSON gateway client
//! - **Sync**: the polling synchronizer and the [`ViewState`] it publishes
//! - **Dispatch**: outgoing moves, timeout claims and lobby actions
//! - **Config**: TOML configuration with environment fallback
//!
//! Pure board rules live in the `strictly_connect4` crate.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use strictly_ledger::{HttpLedgerClient, LedgerConfig, PollingSynchronizer};
//! use strictly_connect4::GameId;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = LedgerConfig::from_file("ledger.toml")?;
//! let client = Arc::new(HttpLedgerClient::from_config(&config)?);
//! let (mut sync, mut events) = PollingSynchronizer::from_config(client, &config);
//!
//! sync.watch(GameId::new(7)).await;
//! while let Some(event) = events.recv().await {
//!     println!("{:?}", event);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod clock;
mod config;
mod dispatch;
mod error;
pub mod ledger;
pub mod render;
pub mod sync;

// Crate-level exports - Configuration
pub use config::{ACCOUNT_ENV, LedgerConfig, MIN_TIMEOUT_SECS};

// Crate-level exports - Errors
pub use error::{ConfigError, LedgerError, LedgerErrorKind, SyncError};

// Crate-level exports - Ledger collaborators
pub use ledger::{HttpLedgerClient, LedgerReader, LedgerWriter};

// Crate-level exports - Synchronizer
pub use sync::{PollingSynchronizer, SyncEvent, SyncPhase, SyncState, ViewState};

// Crate-level exports - Outgoing actions
pub use dispatch::ActionDispatcher;
