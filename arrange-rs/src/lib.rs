//!
//! Scoring and acceleration engine for auto-arranging 2D polygonal items on print beds.
//!
//! The crate provides the multi-criteria objective function that ranks candidate placements,
//! the spatial-index bookkeeping that keeps it cheap, the bed-shape classifier and the
//! orchestration that turns external [`Arrangeable`](arrange::Arrangeable) objects into
//! placement jobs for a [`PlacementSolver`](arrange::PlacementSolver).
//!
//! The geometric search itself is delegated to the solver, see the `ffp` crate for a reference implementation.

/// Everything related to scoring placements and orchestrating an arrangement run
pub mod arrange;

/// Beds and the items placed on them
pub mod entities;

/// Geometric primitives and base algorithms
pub mod geometry;

/// Importing and exporting arrangement instances
pub mod io;

/// Helper functions which do not belong to any specific module
pub mod util;
