//! Minimal reader for Valve's KeyValues text format, enough for
//! `libraryfolders.vdf` and `registry.vdf`.

use anyhow::{bail, Context, Result};
use std::{fs, path::Path};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Object(Vec<(String, Value)>),
}

impl Value {
    /// First value stored under `key`, if this is an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(entries) => entries
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value),
            Value::Str(_) => None,
        }
    }

    /// Like [`Value::get`], ignoring ASCII case. Steam's `registry.vdf`
    /// mixes `Valve`/`valve` between clients.
    pub fn get_ignore_case(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(entries) => entries
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(key))
                .map(|(_, value)| value),
            Value::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            Value::Object(_) => None,
        }
    }
}

/// A parsed document: the root key (e.g. `libraryfolders`) and its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub key: String,
    pub value: Value,
}

pub fn read_file(path: &Path) -> Result<Document> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse(&raw).with_context(|| format!("parse {}", path.display()))
}

pub fn parse(input: &str) -> Result<Document> {
    let tokens = tokenize(input)?;
    let mut iter = tokens.into_iter().peekable();
    let key = match iter.next() {
        Some(Token::Str(key)) => key,
        Some(_) => bail!("expected root key"),
        None => bail!("empty document"),
    };
    let value = match iter.next() {
        Some(Token::Open) => Value::Object(parse_object(&mut iter)?),
        Some(Token::Str(value)) => Value::Str(value),
        Some(Token::Close) => bail!("unexpected '}}' after root key"),
        None => bail!("missing value for root key {key:?}"),
    };
    if iter.peek().is_some() {
        bail!("trailing data after root object");
    }
    Ok(Document { key, value })
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    Str(String),
    Open,
    Close,
}

fn parse_object<I>(iter: &mut std::iter::Peekable<I>) -> Result<Vec<(String, Value)>>
where
    I: Iterator<Item = Token>,
{
    let mut entries = Vec::new();
    loop {
        let key = match iter.next() {
            Some(Token::Close) => return Ok(entries),
            Some(Token::Str(key)) => key,
            Some(Token::Open) => bail!("unexpected '{{' where a key was expected"),
            None => bail!("unterminated object"),
        };
        let value = match iter.next() {
            Some(Token::Open) => Value::Object(parse_object(iter)?),
            Some(Token::Str(value)) => Value::Str(value),
            Some(Token::Close) | None => bail!("missing value for key {key:?}"),
        };
        entries.push((key, value));
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&ch) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '{' => {
                chars.next();
                tokens.push(Token::Open);
            }
            '}' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '/' => {
                chars.next();
                if chars.peek() == Some(&'/') {
                    for c in chars.by_ref() {
                        if c == '\n' {
                            break;
                        }
                    }
                } else {
                    tokens.push(Token::Str(read_bare(&mut chars, "/")));
                }
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' => match chars.next() {
                            Some('n') => value.push('\n'),
                            Some('t') => value.push('\t'),
                            Some(other) => value.push(other),
                            None => bail!("dangling escape at end of input"),
                        },
                        other => value.push(other),
                    }
                }
                if !closed {
                    bail!("unterminated string");
                }
                tokens.push(Token::Str(value));
            }
            _ => tokens.push(Token::Str(read_bare(&mut chars, ""))),
        }
    }

    Ok(tokens)
}

fn read_bare<I>(chars: &mut std::iter::Peekable<I>, prefix: &str) -> String
where
    I: Iterator<Item = char>,
{
    let mut value = prefix.to_string();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() || c == '{' || c == '}' || c == '"' {
            break;
        }
        value.push(c);
        chars.next();
    }
    value
}
