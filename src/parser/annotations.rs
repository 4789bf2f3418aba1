//! Annotation entry points.
//!
//! Annotations reach the checker through two channels: inline strings
//! attached to individual bindings, and comment-form signatures attached
//! to whole functions (`(number) -> number`). This module parses both
//! and merges them per parameter, with the inline form winning.

use std::rc::Rc;

use crate::{
    ast::ast::Function,
    ast::types::TypeNode,
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    lexer::tokens::TokenKind,
    Span,
};

use super::{
    parser::{BindingPower, Parser},
    types::parse_type,
};

/// Where an annotation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Inline,
    Comment,
}

/// A parsed annotation attached to a named binding.
#[derive(Debug, Clone)]
pub struct Annotation {
    pub binding: String,
    pub node: TypeNode,
    pub provenance: Provenance,
    pub span: Span,
}

/// A parsed comment-form signature: positional parameter types plus a
/// return type.
#[derive(Debug, Clone)]
pub struct SignatureComment {
    pub params: Vec<TypeNode>,
    pub ret: TypeNode,
}

/// Parses a single annotation expression into a raw type node.
///
/// The whole source must be consumed; trailing tokens are rejected.
pub fn parse_annotation(source: &str, file: Rc<String>) -> Result<TypeNode, Error> {
    let tokens = tokenize(source, file)?;
    let mut parser = Parser::new(tokens);

    let node = parse_type(&mut parser, BindingPower::Default)?;
    parser.expect(TokenKind::EOF)?;

    Ok(node)
}

/// Parses a comment-form signature such as `(number) -> number`.
pub fn parse_signature_comment(source: &str, file: Rc<String>) -> Result<SignatureComment, Error> {
    let tokens = tokenize(source, file)?;
    let mut parser = Parser::new(tokens);

    parser.expect(TokenKind::OpenParen)?;

    let mut params = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            params.push(parse_type(&mut parser, BindingPower::Default)?);

            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
            } else {
                break;
            }
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    parser.expect(TokenKind::Arrow)?;

    let ret = parse_type(&mut parser, BindingPower::Default)?;
    parser.expect(TokenKind::EOF)?;

    Ok(SignatureComment { params, ret })
}

/// Collects the raw per-parameter and return annotations of a function.
///
/// Inline annotations take precedence over the comment-form signature;
/// the comment form applies positionally to the remaining parameters.
/// A comment signature whose parameter count disagrees with the
/// function's parameter list is rejected.
pub fn signature_annotations(
    function: &Function,
    file: Rc<String>,
) -> Result<(Vec<Option<Annotation>>, Option<Annotation>), Error> {
    let comment = match &function.type_comment {
        Some(source) => Some(parse_signature_comment(source, file.clone())?),
        None => None,
    };

    if let Some(comment) = &comment {
        if comment.params.len() < function.params.len() {
            return Err(Error::new(
                ErrorImpl::MissingArguments {
                    expected: function.params.len(),
                    received: comment.params.len(),
                },
                function.span.clone(),
            ));
        }
        if comment.params.len() > function.params.len() {
            return Err(Error::new(
                ErrorImpl::UnexpectedArguments {
                    expected: function.params.len(),
                    received: comment.params.len(),
                },
                function.span.clone(),
            ));
        }
    }

    let mut params = vec![];
    for (index, param) in function.params.iter().enumerate() {
        let annotation = if let Some(source) = &param.annotation {
            Some(Annotation {
                binding: param.name.clone(),
                node: parse_annotation(source, file.clone())?,
                provenance: Provenance::Inline,
                span: param.span.clone(),
            })
        } else if let Some(comment) = &comment {
            Some(Annotation {
                binding: param.name.clone(),
                node: comment.params[index].clone(),
                provenance: Provenance::Comment,
                span: function.span.clone(),
            })
        } else {
            None
        };
        params.push(annotation);
    }

    let ret = if let Some(source) = &function.return_annotation {
        Some(Annotation {
            binding: String::from("return"),
            node: parse_annotation(source, file.clone())?,
            provenance: Provenance::Inline,
            span: function.span.clone(),
        })
    } else if let Some(comment) = &comment {
        Some(Annotation {
            binding: String::from("return"),
            node: comment.ret.clone(),
            provenance: Provenance::Comment,
            span: function.span.clone(),
        })
    } else {
        None
    };

    Ok((params, ret))
}
