//! Review comments and the working set they live in
//!
//! Comments are immutable records tied to a catalog coordinate. The
//! working set holds the comments listed for the active (project, device)
//! pair, tracks multi-selection for batch delete, and fences off listing
//! responses that arrive after the pair has moved on.

pub mod export;
pub mod types;
pub mod working_set;

pub use export::*;
pub use types::*;
pub use working_set::*;
