//! Type checking module.
//!
//! This module validates function and class bodies against their
//! resolved annotations and produces the typed IR. Every expression
//! node in the output carries its static type; calls that cross into
//! host-only code are marked opaque.

pub mod type_checker;
pub mod typed_ast;

#[cfg(test)]
mod tests;
