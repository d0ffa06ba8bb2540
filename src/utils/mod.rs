//! Utility modules shared by the resolver and the rewriter.

pub mod html;
pub mod path;
pub mod plural;
