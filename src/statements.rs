use crate::error::SqlQueryError;
use std::fs;
use std::path::PathBuf;

pub const STATEMENT_SEPARATOR: char = ';';

/// Where the SQL to run comes from. A file, when given, wins over the
/// inline query.
#[derive(Clone, Debug, Default)]
pub struct StatementRequest {
    pub query: Option<String>,
    pub sql_file: Option<PathBuf>,
}

impl StatementRequest {
    pub fn load(&self) -> Result<String, SqlQueryError> {
        let text = match &self.sql_file {
            Some(path) => {
                if !path.exists() {
                    return Err(SqlQueryError::FileNotFound {
                        path: path.display().to_string(),
                    });
                }
                fs::read_to_string(path)?
            }
            None => self.query.clone().unwrap_or_default(),
        };

        if text.trim().is_empty() {
            return Err(SqlQueryError::MissingQuery);
        }
        Ok(text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionMode {
    Single,
    Multi,
}

/// A separator anywhere before the trailing terminator means a batch.
/// This is a textual check, not a parse: a `;` inside a string literal
/// also selects `Multi`.
pub fn execution_mode(sql: &str) -> ExecutionMode {
    if sql
        .trim()
        .trim_end_matches(STATEMENT_SEPARATOR)
        .contains(STATEMENT_SEPARATOR)
    {
        ExecutionMode::Multi
    } else {
        ExecutionMode::Single
    }
}

/// Drop surrounding whitespace and any trailing terminators.
pub fn strip_terminator(sql: &str) -> &str {
    sql.trim().trim_end_matches(STATEMENT_SEPARATOR).trim_end()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Lexing {
    Code,
    Quoted(char),
    LineComment,
    BlockComment,
}

/// Cut a batch into its statements, in source order. Separators inside
/// quoted strings, identifiers and comments don't split. Statements that
/// are empty or hold nothing but comments are skipped.
pub fn split_statements(sql: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut start = 0;
    let mut has_code = false;
    let mut state = Lexing::Code;
    let mut escaped = false;
    let mut chars = sql.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        match state {
            Lexing::Quoted(open) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' && open != '`' {
                    escaped = true;
                } else if c == open {
                    state = Lexing::Code;
                }
            }
            Lexing::LineComment => {
                if c == '\n' {
                    state = Lexing::Code;
                }
            }
            Lexing::BlockComment => {
                if c == '*' && chars.peek().map(|&(_, next)| next) == Some('/') {
                    chars.next();
                    state = Lexing::Code;
                }
            }
            Lexing::Code => match c {
                '#' => state = Lexing::LineComment,
                // MySQL only treats `--` as a comment when whitespace follows.
                '-' if sql[index..].starts_with("--")
                    && sql[index + 2..]
                        .chars()
                        .next()
                        .map_or(true, char::is_whitespace) =>
                {
                    chars.next();
                    state = Lexing::LineComment;
                }
                '/' if chars.peek().map(|&(_, next)| next) == Some('*') => {
                    chars.next();
                    state = Lexing::BlockComment;
                }
                STATEMENT_SEPARATOR => {
                    if has_code {
                        push_statement(&mut statements, &sql[start..index]);
                    }
                    start = index + c.len_utf8();
                    has_code = false;
                }
                '\'' | '"' | '`' => {
                    state = Lexing::Quoted(c);
                    has_code = true;
                }
                c if !c.is_whitespace() => has_code = true,
                _ => {}
            },
        }
    }
    if has_code {
        push_statement(&mut statements, &sql[start..]);
    }
    statements
}

fn push_statement<'a>(statements: &mut Vec<&'a str>, piece: &'a str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        statements.push(piece);
    }
}
