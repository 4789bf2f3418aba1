//! Name resolution module.
//!
//! This module maps unresolved type names to type nodes by consulting,
//! in order:
//!
//! - Lexical scopes (innermost first)
//! - The module scope of the compilation unit (user classes)
//! - The runtime's builtin type names (`int`, `number`, `torch.Tensor`)
//!
//! The first strategy that produces a binding wins; a name no strategy
//! can resolve fails with an error naming the identifier.

pub mod resolver;
