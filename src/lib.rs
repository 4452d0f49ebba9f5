//! Tentrix puzzle engine.
//!
//! Numbered, coloured blocks fall one at a time into a fixed grid. When a
//! 4-connected group of same-coloured blocks adds up to a positive multiple of
//! ten it is removed, the columns collapse, and any group the collapse creates
//! is removed in the next step of the chain.
//!
//! The engine is a pure state machine: no terminal, no clock, no I/O. The
//! front end drives [`Session`] with commands (including the timed
//! [`Session::tick`]) and drains [`GameEvent`]s to animate.
//!
//! ```
//! use tentrixtui::{Session, SessionConfig};
//!
//! let mut session = Session::new(SessionConfig { seed: Some(7), ..SessionConfig::default() })?;
//! session.move_left();
//! session.hard_drop();
//! assert_eq!(session.stats().pieces_placed, 1);
//! # Ok::<(), tentrixtui::ConfigError>(())
//! ```

pub mod block;
pub mod chain;
pub mod config;
pub mod error;
pub mod event;
pub mod generator;
pub mod grid;
pub mod piece;
pub mod resolve;
pub mod session;

pub use block::{Block, BlockColor};
pub use chain::ChainReport;
pub use config::SessionConfig;
pub use error::{ConfigError, EngineError};
pub use event::GameEvent;
pub use grid::Grid;
pub use piece::FallingPiece;
pub use session::{Phase, Session, Stats};
