//! Script source parsers.
//!
//! This module extracts structured command metadata from loosely formatted
//! script text. It does not evaluate the script language; it only knows
//! enough structure to find a comment-based help block and a parameter
//! declaration list:
//!
//! - [`scanner`]: quote-, comment- and depth-aware character scanning with
//!   balanced-close search and top-level splitting.
//! - [`parse_help_block`]: `<# ... #>` help sections (synopsis,
//!   description, examples, `.PARAMETER` name hints).
//! - [`parse_param_block`]: `param( ... )` entries with mandatory flag,
//!   position and declared type.
//! - [`reconcile_parameters`]: merges both sources into one ordered,
//!   de-duplicated parameter list.
//!
//! Malformed input never fails: an unbalanced parameter list yields no
//! parameters and a missing help block yields empty sections.

mod help_block;
mod param_block;
mod reconcile;
pub mod scanner;

pub use help_block::parse_help_block;
pub use param_block::{normalize_type, parse_param_block, parse_param_chunk};
pub use reconcile::reconcile_parameters;
