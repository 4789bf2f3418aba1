//! Parser state for annotation expressions.
//!
//! This module contains the main Parser struct shared by the type
//! expression handlers. The parser maintains lookup tables for:
//!
//! - NUD (null denotation) handlers for type heads
//! - LED (left denotation) handlers for subscripts
//! - Binding powers for precedence

use std::collections::HashMap;

use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Span,
};

use super::types::{
    create_token_type_lookups, TypeBPLookup, TypeLEDLookup, TypeNUDLookup,
};

/// Binding powers for type expression precedence, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BindingPower {
    Default,
    Call,
    Primary,
}

/// The parser structure that maintains parsing state.
///
/// Holds the token stream, the current position, and the NUD/LED lookup
/// tables used to parse type expressions.
pub struct Parser {
    tokens: Vec<Token>,
    pos: i32,
    type_nud_lookup: TypeNUDLookup,
    type_led_lookup: TypeLEDLookup,
    type_binding_power_lookup: TypeBPLookup,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut parser = Parser {
            tokens,
            pos: 0,
            type_nud_lookup: HashMap::new(),
            type_led_lookup: HashMap::new(),
            type_binding_power_lookup: HashMap::new(),
        };
        create_token_type_lookups(&mut parser);
        parser
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos as usize]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.tokens[self.pos as usize].kind
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> &Token {
        self.pos += 1;
        &self.tokens[(self.pos - 1) as usize]
    }

    /// Expects a token of the specified kind.
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns
    /// an UnexpectedToken error at the current span.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        let token = self.current_token();
        if token.kind != expected_kind {
            Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: token.value.clone(),
                },
                token.span.clone(),
            ))
        } else {
            Ok(self.advance().clone())
        }
    }

    pub fn get_type_nud_lookup(&self) -> &TypeNUDLookup {
        &self.type_nud_lookup
    }

    pub fn get_type_led_lookup(&self) -> &TypeLEDLookup {
        &self.type_led_lookup
    }

    pub fn get_type_bp_lookup(&self) -> &TypeBPLookup {
        &self.type_binding_power_lookup
    }

    /// Registers a type left denotation handler.
    pub fn type_led(
        &mut self,
        kind: TokenKind,
        binding_power: BindingPower,
        led_fn: super::types::TypeLEDHandler,
    ) {
        self.type_binding_power_lookup.insert(kind, binding_power);
        self.type_led_lookup.insert(kind, led_fn);
    }

    /// Registers a type null denotation handler.
    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: super::types::TypeNUDHandler) {
        self.type_binding_power_lookup
            .insert(kind, BindingPower::Primary);
        self.type_nud_lookup.insert(kind, nud_fn);
    }

    pub fn current_span(&self) -> Span {
        self.current_token().span.clone()
    }
}
