//! Annotation parser module.
//!
//! This module contains the parser that transforms a stream of
//! annotation tokens into raw type nodes with unresolved name leaves.
//! It uses a Pratt parser with NUD/LED handlers and binding powers,
//! and handles:
//!
//! - Bare and dotted type names (`int`, `torch.Tensor`)
//! - Container subscripts (`Dict[str, Optional[Tensor]]`)
//! - Comment-form signatures (`(number) -> number`)
//! - Extraction of per-binding annotations from function signatures,
//!   merging the inline and comment forms (inline wins)

pub mod annotations;
pub mod parser;
pub mod types;
