//! Named parameter system for curve fitting.
//!
//! Initial guesses are bound to parameter names in a single [`Parameters`]
//! collection instead of a bare, independently ordered value list. This
//! removes the classic curve-fitting foot-gun where a guess vector is
//! silently matched against the wrong parameter because the two orderings
//! drifted apart.
//!
//! Insertion order is still meaningful: it defines the layout of the
//! parameter vector seen by the optimizer and of the covariance matrix rows
//! and columns.

pub mod parameter;
pub mod parameters;

pub use parameter::Parameter;
pub use parameters::Parameters;
