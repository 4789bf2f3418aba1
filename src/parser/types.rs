//! Type expression parsing implementation.
//!
//! This module handles parsing of annotation expressions into raw type
//! nodes. It supports:
//!
//! - Bare and dotted names (left as Unresolved for the resolver)
//! - Container subscripts (`Optional[int]`, `Dict[str, Tensor]`)
//!
//! Subscript arity is validated immediately via the type model's
//! `container` constructor; bare container heads flow through as
//! Unresolved and are rejected during resolution.

use std::collections::HashMap;

use crate::{
    ast::types::{ContainerKind, TypeNode},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::parser::{BindingPower, Parser};

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeNode, Error>;

/// Type alias for type left denotation handler functions.
pub type TypeLEDHandler = fn(&mut Parser, TypeNode, BindingPower) -> Result<TypeNode, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Type alias for type LED lookup table.
pub type TypeLEDLookup = HashMap<TokenKind, TypeLEDHandler>;

/// Type alias for type binding power lookup table.
pub type TypeBPLookup = HashMap<TokenKind, BindingPower>;

/// Initializes the type parsing lookup tables.
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
    parser.type_nud(TokenKind::List, parse_symbol_type);
    parser.type_nud(TokenKind::Dict, parse_symbol_type);
    parser.type_nud(TokenKind::Tuple, parse_symbol_type);
    parser.type_nud(TokenKind::Optional, parse_symbol_type);
    parser.type_led(
        TokenKind::OpenBracket,
        BindingPower::Call,
        parse_subscript_type,
    );
}

/// Parses a bare or dotted type name into an Unresolved node.
pub fn parse_symbol_type(parser: &mut Parser) -> Result<TypeNode, Error> {
    let token = parser.advance().clone();
    let mut name = token.value;

    while parser.current_token_kind() == TokenKind::Dot {
        parser.advance();
        let part = parser.expect(TokenKind::Identifier)?;
        name.push('.');
        name.push_str(&part.value);
    }

    Ok(TypeNode::Unresolved(name))
}

/// Parses a container subscript applied to a container head.
///
/// An explicitly empty subscript is rejected at the closing bracket;
/// this is distinct from a bare head with no subscript at all, which
/// fails later during resolution.
pub fn parse_subscript_type(
    parser: &mut Parser,
    left: TypeNode,
    _bp: BindingPower,
) -> Result<TypeNode, Error> {
    let open = parser.expect(TokenKind::OpenBracket)?;

    let kind = match &left {
        TypeNode::Unresolved(name) => ContainerKind::from_name(name),
        _ => None,
    };
    let Some(kind) = kind else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: open.value.clone(),
            },
            open.span.clone(),
        ));
    };

    if parser.current_token_kind() == TokenKind::CloseBracket {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: parser.current_token().value.clone(),
            },
            parser.current_span(),
        ));
    }

    let mut params = vec![];
    loop {
        params.push(parse_type(parser, BindingPower::Default)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    let close = parser.expect(TokenKind::CloseBracket)?;

    let span = Span {
        start: open.span.start,
        end: close.span.end,
    };
    TypeNode::container(kind, params, &span)
}

pub fn parse_type(parser: &mut Parser, bp: BindingPower) -> Result<TypeNode, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    if !parser.get_type_nud_lookup().contains_key(&token_kind) {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: parser.current_token().value.clone(),
            },
            parser.current_span(),
        ));
    }

    let nud_fn = parser.get_type_nud_lookup()[&token_kind];
    let mut left = nud_fn(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    while *parser
        .get_type_bp_lookup()
        .get(&parser.current_token_kind())
        .unwrap_or(&BindingPower::Default)
        > bp
    {
        let token_kind = parser.current_token_kind();
        if !parser.get_type_led_lookup().contains_key(&token_kind) {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: parser.current_token().value.clone(),
                },
                parser.current_span(),
            ));
        }

        let binding_power = parser.get_type_bp_lookup()[&parser.current_token_kind()];
        let led_fn = parser.get_type_led_lookup()[&token_kind];
        left = led_fn(parser, left, binding_power)?;
    }

    Ok(left)
}
