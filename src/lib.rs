//! Tiler - an image tiling board with an image bank and project files.
//!
//! This library provides the application core: a grid [`board`](crate::board)
//! of image tiles advanced in discrete cycles, an image [`bank`](crate::bank)
//! of importable sources, and versioned [`project`](crate::project)
//! persistence. A UI layer drives it by feeding [`board::BoardEvent`] batches
//! through [`app::TilerApp`] and rendering the placement index it gets back.

// Core modules
pub mod app;
pub mod bank;
pub mod board;
pub mod constants;
pub mod error;
pub mod project;

pub use app::TilerApp;
pub use bank::ImageBank;
pub use board::{Board, BoardError, BoardEvent, CycleReport, GridPosition};
pub use error::{TilerError, TilerResult};
pub use project::{ProjectDocument, ProjectError};
