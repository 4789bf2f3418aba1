//! Lexical analysis module for type annotations.
//!
//! This module contains the lexer (tokenizer) that converts annotation
//! expressions such as `Dict[str, Optional[Tensor]]` or the comment-form
//! signature `(number) -> number` into a stream of tokens. It handles:
//!
//! - Tokenization using regex patterns
//! - Recognition of container heads, identifiers, and punctuation
//! - Token position tracking for error reporting
//! - Whitespace handling

pub mod lexer;
pub mod tokens;
