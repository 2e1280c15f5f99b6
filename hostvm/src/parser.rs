use std::iter::Peekable;
use std::rc::Rc;

use crate::containers::{HashIndexedAnyContainer, StackContainer};
use crate::error::{err_parser, err_parser_wpos, RuntimeError, SourcePos};
use crate::lexer::{tokenize, Token, TokenType};
use crate::memory::MutatorView;
use crate::value::Value;

/// How deeply lists and dicts may nest inside one literal
pub const MAX_NESTING: usize = 128;

//
// A list is either
// * empty: []
// * a comma separated sequence of values, optionally with a trailing comma
//
fn parse_list<'i, I: 'i>(
    mem: &MutatorView,
    tokens: &mut Peekable<I>,
    depth: usize,
) -> Result<Value, RuntimeError>
where
    I: Iterator<Item = &'i Token>,
{
    use self::TokenType::*;

    let list = mem.alloc_list();

    loop {
        match tokens.peek() {
            Some(&&Token {
                token: CloseBracket,
                pos: _,
            }) => {
                tokens.next();
                break;
            }

            Some(_) => {
                let item = parse_value(mem, tokens, depth)?;
                list.push(mem, item)?;

                match tokens.next() {
                    Some(&Token { token: Comma, .. }) => (),
                    Some(&Token {
                        token: CloseBracket,
                        ..
                    }) => break,
                    Some(&Token { pos, .. }) => {
                        return Err(err_parser_wpos(pos, "Expected ',' or ']' in list"));
                    }
                    None => return Err(err_parser("Unexpected end of input")),
                }
            }

            None => return Err(err_parser("Unexpected end of input")),
        }
    }

    Ok(Value::from(list))
}

//
// A dict is either
// * empty: {}
// * a comma separated sequence of key: value pairs, optionally with a trailing comma
//
fn parse_dict<'i, I: 'i>(
    mem: &MutatorView,
    tokens: &mut Peekable<I>,
    depth: usize,
) -> Result<Value, RuntimeError>
where
    I: Iterator<Item = &'i Token>,
{
    use self::TokenType::*;

    let dict = mem.alloc_dict();

    loop {
        match tokens.peek() {
            Some(&&Token {
                token: CloseBrace,
                pos: _,
            }) => {
                tokens.next();
                break;
            }

            Some(&&Token { pos: key_pos, .. }) => {
                let key = parse_value(mem, tokens, depth)?;

                match tokens.next() {
                    Some(&Token { token: Colon, .. }) => (),
                    Some(&Token { pos, .. }) => {
                        return Err(err_parser_wpos(pos, "Expected ':' after dict key"));
                    }
                    None => return Err(err_parser("Unexpected end of input")),
                }

                let value = parse_value(mem, tokens, depth)?;
                dict.assoc(mem, key, value)
                    .map_err(|e| RuntimeError::with_pos(e.error_kind().clone(), key_pos))?;

                match tokens.next() {
                    Some(&Token { token: Comma, .. }) => (),
                    Some(&Token {
                        token: CloseBrace, ..
                    }) => break,
                    Some(&Token { pos, .. }) => {
                        return Err(err_parser_wpos(pos, "Expected ',' or '}' in dict"));
                    }
                    None => return Err(err_parser("Unexpected end of input")),
                }
            }

            None => return Err(err_parser("Unexpected end of input")),
        }
    }

    Ok(Value::from(dict))
}

/// Interpret a bare word: a keyword constant or a number
fn parse_symbol(pos: SourcePos, name: &str) -> Result<Value, RuntimeError> {
    match name {
        "None" => Ok(Value::Nil),
        "True" => Ok(Value::Bool(true)),
        "False" => Ok(Value::Bool(false)),
        _ => {
            let digits = name.strip_prefix(&['-', '+'][..]).unwrap_or(name);
            let is_integer = !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit());

            if let Ok(n) = name.parse::<i64>() {
                Ok(Value::Number(n))
            } else if is_integer {
                Err(err_parser_wpos(pos, "Integer literal out of range"))
            } else if let Ok(x) = name.parse::<f64>() {
                Ok(Value::Float(x))
            } else {
                Err(err_parser_wpos(pos, &format!("Unknown name '{}'", name)))
            }
        }
    }
}

//
// Parse a single value
//
// Must be a
//  * keyword constant, number or string
//  * or a list or dict
//
fn parse_value<'i, I: 'i>(
    mem: &MutatorView,
    tokens: &mut Peekable<I>,
    depth: usize,
) -> Result<Value, RuntimeError>
where
    I: Iterator<Item = &'i Token>,
{
    use self::TokenType::*;

    match tokens.next() {
        Some(&Token {
            token: OpenBracket | OpenBrace,
            pos,
        }) if depth >= MAX_NESTING => {
            Err(err_parser_wpos(pos, "Literal is nested too deeply"))
        }

        Some(&Token {
            token: OpenBracket, ..
        }) => parse_list(mem, tokens, depth + 1),

        Some(&Token {
            token: OpenBrace, ..
        }) => parse_dict(mem, tokens, depth + 1),

        Some(&Token {
            token: Symbol(ref name),
            pos,
        }) => parse_symbol(pos, name),

        Some(&Token {
            token: Text(ref string),
            ..
        }) => Ok(mem.alloc_text(string)),

        Some(&Token {
            token: CloseBracket,
            pos,
        }) => Err(err_parser_wpos(pos, "Unmatched ']'")),

        Some(&Token {
            token: CloseBrace,
            pos,
        }) => Err(err_parser_wpos(pos, "Unmatched '}'")),

        Some(&Token { token: Comma, pos }) => Err(err_parser_wpos(pos, "Unexpected ','")),

        Some(&Token { token: Colon, pos }) => Err(err_parser_wpos(pos, "Unexpected ':'")),

        None => Err(err_parser("Unexpected end of input")),
    }
}

fn parse_tokens(mem: &MutatorView, tokens: Vec<Token>) -> Result<Value, RuntimeError> {
    let mut tokenstream = tokens.iter().peekable();
    let value = parse_value(mem, &mut tokenstream, 0)?;

    match tokenstream.next() {
        Some(token) => Err(err_parser_wpos(token.pos, "Unexpected input after value")),
        None => Ok(value),
    }
}

/// Parse the given string into a runtime value
pub fn parse(mem: &MutatorView, input: &str) -> Result<Value, RuntimeError> {
    parse_tokens(mem, tokenize(input)?)
}

/// Parse the given string, which must be a list literal, into a shared list
pub fn parse_list_literal(
    mem: &MutatorView,
    input: &str,
) -> Result<Rc<crate::list::List>, RuntimeError> {
    match parse(mem, input)? {
        Value::List(list) => Ok(list),
        other => Err(err_parser(&format!(
            "Expected a list literal, found {}",
            other.type_name()
        ))),
    }
}
