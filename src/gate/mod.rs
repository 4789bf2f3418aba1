//! Member gating module.
//!
//! This module flattens a class hierarchy into a single member view and
//! decides, per member, whether it participates in compilation:
//!
//! - Compiled members are checked and lowered into the typed IR
//! - Ignored members stay host-only; an ignored attribute may not be
//!   referenced from compiled code at all, while an ignored method is
//!   callable as an opaque boundary with its declared signature
//!
//! Members land in the ignored state either through the class-level
//! ignore set or through a per-function ignore marking.

pub mod gate;

#[cfg(test)]
mod tests;
