/// Literal lexer implementation.
///
/// Numbers and names are both lexed as `Symbol`s; the parser decides what they mean.
use crate::error::{err_lexer, spos, RuntimeError, SourcePos};

// key characters
const OPEN_BRACKET: char = '[';
const CLOSE_BRACKET: char = ']';
const OPEN_BRACE: char = '{';
const CLOSE_BRACE: char = '}';
const COMMA: char = ',';
const COLON: char = ':';
const CR: char = '\r';
const LF: char = '\n';
const DOUBLE_QUOTE: char = '"';
const BACKSLASH: char = '\\';

#[derive(Debug, PartialEq)]
pub enum TokenType {
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    Comma,
    Colon,
    Symbol(String),
    Text(String),
}

#[derive(Debug, PartialEq)]
pub struct Token {
    pub pos: SourcePos,
    pub token: TokenType,
}

impl Token {
    fn new(pos: SourcePos, token: TokenType) -> Token {
        Token { pos, token }
    }
}

// tokenize a String
pub fn tokenize(input: &str) -> Result<Vec<Token>, RuntimeError> {
    use self::TokenType::*;

    // characters that terminate a symbol
    let terminating = [
        OPEN_BRACKET,
        CLOSE_BRACKET,
        OPEN_BRACE,
        CLOSE_BRACE,
        COMMA,
        COLON,
        DOUBLE_QUOTE,
    ];
    let is_terminating = |c: char| c.is_whitespace() || terminating.iter().any(|t| c == *t);

    // return value
    let mut tokens = Vec::new();

    // start line numbering at 1, the first character of each line being number 0
    let mut lineno = 1;
    let mut charno = 0;

    let mut chars = input.chars().peekable();

    while let Some(current) = chars.next() {
        let pos = spos(lineno, charno);
        charno += 1;

        match current {
            CR => {
                // consume \n if it follows \r
                if let Some(&LF) = chars.peek() {
                    chars.next();
                }
                lineno += 1;
                charno = 0;
            }

            LF => {
                lineno += 1;
                charno = 0;
            }

            c if c.is_whitespace() => (),

            OPEN_BRACKET => tokens.push(Token::new(pos, OpenBracket)),
            CLOSE_BRACKET => tokens.push(Token::new(pos, CloseBracket)),
            OPEN_BRACE => tokens.push(Token::new(pos, OpenBrace)),
            CLOSE_BRACE => tokens.push(Token::new(pos, CloseBrace)),
            COMMA => tokens.push(Token::new(pos, Comma)),
            COLON => tokens.push(Token::new(pos, Colon)),

            DOUBLE_QUOTE => {
                let mut text = String::new();

                loop {
                    let here = spos(lineno, charno);
                    charno += 1;

                    match chars.next() {
                        Some(DOUBLE_QUOTE) => break,

                        Some(BACKSLASH) => {
                            charno += 1;
                            match chars.next() {
                                Some('n') => text.push('\n'),
                                Some('t') => text.push('\t'),
                                Some(c) if c == DOUBLE_QUOTE || c == BACKSLASH => text.push(c),
                                Some(_) => return Err(err_lexer(here, "Unknown escape sequence")),
                                None => return Err(err_lexer(here, "Unterminated string")),
                            }
                        }

                        Some(CR) | Some(LF) | None => {
                            return Err(err_lexer(here, "Unterminated string"))
                        }

                        Some(c) => text.push(c),
                    }
                }

                tokens.push(Token::new(pos, Text(text)))
            }

            non_terminating => {
                let mut symbol = String::new();
                symbol.push(non_terminating);

                // consume symbol
                while let Some(&c) = chars.peek() {
                    if is_terminating(c) {
                        break;
                    }
                    symbol.push(c);
                    chars.next();
                    charno += 1;
                }

                tokens.push(Token::new(pos, Symbol(symbol)));
            }
        }
    }

    Ok(tokens)
}
