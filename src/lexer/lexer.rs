use std::rc::Rc;

use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, Regex);

#[derive(Clone)]
pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

#[derive(Clone)]
pub struct Lexer {
    patterns: Vec<RegexPattern>,
    tokens: Vec<Token>,
    source: String,
    pos: i32,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Rc<String>) -> Lexer {
        Lexer {
            pos: 0,
            tokens: vec![],
            patterns: vec![
                RegexPattern {
                    regex: Regex::new("[a-zA-Z_][a-zA-Z0-9_]*").unwrap(),
                    handler: symbol_handler,
                },
                RegexPattern {
                    regex: Regex::new("\\s+").unwrap(),
                    handler: skip_handler,
                },
                RegexPattern {
                    regex: Regex::new("\\[").unwrap(),
                    handler: MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "["),
                },
                RegexPattern {
                    regex: Regex::new("\\]").unwrap(),
                    handler: MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]"),
                },
                RegexPattern {
                    regex: Regex::new("\\(").unwrap(),
                    handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "("),
                },
                RegexPattern {
                    regex: Regex::new("\\)").unwrap(),
                    handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")"),
                },
                RegexPattern {
                    regex: Regex::new("->").unwrap(),
                    handler: MK_DEFAULT_HANDLER!(TokenKind::Arrow, "->"),
                },
                RegexPattern {
                    regex: Regex::new("\\.").unwrap(),
                    handler: MK_DEFAULT_HANDLER!(TokenKind::Dot, "."),
                },
                RegexPattern {
                    regex: Regex::new(",").unwrap(),
                    handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ","),
                },
            ],
            source,
            file,
        }
    }

    pub fn advance_n(&mut self, n: i32) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn at(&self) -> char {
        self.source.as_bytes()[self.pos as usize] as char
    }

    pub fn remainder(&self) -> &str {
        &self.source[(self.pos as usize)..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos as usize >= self.source.len()
    }
}

fn skip_handler(lexer: &mut Lexer, regex: Regex) {
    let matched = regex.find(lexer.remainder()).unwrap().end();
    lexer.advance_n(matched as i32);
}

fn symbol_handler(lexer: &mut Lexer, regex: Regex) {
    let remaining = lexer.remainder().to_string();
    let value = regex.find(&remaining).unwrap();

    let span = Span {
        start: Position(lexer.pos as u32, Rc::clone(&lexer.file)),
        end: Position(
            (lexer.pos + value.len() as i32) as u32,
            Rc::clone(&lexer.file),
        ),
    };

    if let Some(kind) = RESERVED_LOOKUP.get(value.as_str()) {
        lexer.push(MK_TOKEN!(*kind, String::from(value.as_str()), span));
    } else {
        lexer.push(MK_TOKEN!(
            TokenKind::Identifier,
            String::from(value.as_str()),
            span
        ));
    }

    lexer.advance_n(value.len() as i32);
}

pub fn tokenize(source: &str, file: Rc<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source.to_string(), file);

    while !lex.at_eof() {
        let mut matched = false;

        for pattern in lex.clone().patterns.iter() {
            let match_here = pattern.regex.find(lex.remainder());

            if match_here.is_some() && match_here.unwrap().start() == 0 {
                (pattern.handler)(&mut lex, pattern.regex.clone());
                matched = true;
                break;
            }
        }

        if !matched {
            return Err(Error::new(
                ErrorImpl::UnrecognisedToken {
                    token: lex.at().to_string(),
                },
                Span {
                    start: Position(lex.pos as u32, Rc::clone(&lex.file)),
                    end: Position(lex.pos as u32 + 1, Rc::clone(&lex.file)),
                },
            ));
        }
    }

    lex.push(MK_TOKEN!(
        TokenKind::EOF,
        String::from("EOF"),
        Span {
            start: Position(lex.pos as u32, Rc::clone(&lex.file)),
            end: Position(lex.pos as u32, Rc::clone(&lex.file))
        }
    ));
    Ok(lex.tokens)
}
