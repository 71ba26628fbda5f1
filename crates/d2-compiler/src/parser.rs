//! Source text to [`ast`](crate::ast) parser.
//!
//! A lexer-less winnow parser over [`LocatingSlice`], so every node carries
//! its byte span. Statements are separated by newlines or `;`, and `#`
//! starts a comment that runs to the end of the line.
//!
//! The public entry points are [`parse`], which recovers from malformed
//! statements and reports every syntax error in one pass, and [`parse_key`],
//! which parses a standalone key path such as the value of `near`.

use d2_core::span::{Span, Spanned};
use winnow::{
    Parser as _,
    combinator::{alt, cut_err, not, opt, peek, repeat, terminated},
    error::{AddContext, ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{any, literal, none_of, one_of, take_till, take_until, take_while},
};

use crate::{
    ast::{Edge, Key, KeyPath, Map, Node, Scalar, ScalarKind},
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
};

/// Characters that end an unquoted key segment.
const KEY_STOP: &[char] = &['.', ':', ';', '{', '}', '\n', '\r', '#', '|'];

/// Key segment terminators inside `( ... )[n]` edge references.
const PAREN_KEY_STOP: &[char] = &['.', ':', ';', '{', '}', '\n', '\r', '#', '|', ')'];

/// Characters that end an unquoted value.
const VALUE_STOP: &[char] = &[';', '\n', '\r', '{', '}', '#'];

/// Rich diagnostic information for syntax errors.
///
/// Attached to winnow errors via `.context()`; the span reported runs from
/// `start` to the position where parsing failed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SyntaxDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<SyntaxDiagnostic>>;

/// Look at the next character without consuming it.
fn peek_char(input: &mut Input<'_>) -> Option<char> {
    let next: IResult<Option<char>> = opt(peek(any)).parse_next(input);
    next.ok().flatten()
}

/// Spaces and tabs; newlines are statement separators and handled apart.
fn inline_ws(input: &mut Input<'_>) -> IResult<()> {
    take_while(0.., [' ', '\t']).void().parse_next(input)
}

/// Parse a connection operator into `(src_arrow, dst_arrow)`.
fn arrow(input: &mut Input<'_>) -> IResult<(bool, bool)> {
    alt((
        literal("<->").value((true, true)),
        literal("->").value((false, true)),
        literal("<-").value((true, false)),
        literal("--").value((false, false)),
    ))
    .parse_next(input)
}

/// Parse an escape sequence inside a quoted string, starting at the backslash.
fn escape(input: &mut Input<'_>) -> IResult<char> {
    let start = input.current_token_start();
    '\\'.parse_next(input)?;
    cut_err(one_of(['n', 't', 'r', '\\', '"', '\'']))
        .map(|c| match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            other => other,
        })
        .context(SyntaxDiagnostic {
            code: ErrorCode::E003,
            message: "invalid escape sequence",
            help: Some("valid escapes: `\\n`, `\\t`, `\\r`, `\\\\`, `\\\"`, `\\'`"),
            start,
        })
        .parse_next(input)
}

/// Parse a string delimited by `quote`, committing after the opening quote.
fn quoted<'a>(mut quote: char) -> impl FnMut(&mut Input<'a>) -> IResult<String> {
    move |input: &mut Input<'a>| {
        let start = input.current_token_start();
        quote.parse_next(input)?;
        cut_err(terminated(
            repeat(0.., alt((escape, none_of([quote, '\\', '\n'])))).fold(
                String::new,
                |mut acc, c| {
                    acc.push(c);
                    acc
                },
            ),
            quote,
        ))
        .context(SyntaxDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated string",
            help: Some("add the closing quote"),
            start,
        })
        .parse_next(input)
    }
}

/// Parse a block string: `|tag content|`, `||tag content||`, ...
///
/// The tag defaults to `md`. Content is dedented and trimmed.
fn block_string(input: &mut Input<'_>) -> IResult<(String, String)> {
    let start = input.current_token_start();
    let pipes: &str = take_while(1.., '|').parse_next(input)?;
    let tag: &str = take_while(0.., |c: char| {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+')
    })
    .parse_next(input)?;
    let body: &str = cut_err(terminated(take_until(0.., pipes), pipes))
        .context(SyntaxDiagnostic {
            code: ErrorCode::E004,
            message: "unterminated block string",
            help: Some("close the block with the same number of `|` it was opened with"),
            start,
        })
        .parse_next(input)?;
    let tag = if tag.is_empty() { "md" } else { tag };
    Ok((tag.to_string(), dedent(body)))
}

/// Remove the indentation common to all non-blank lines, then trim.
fn dedent(body: &str) -> String {
    let indent = body
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    body.lines()
        .map(|line| line.get(indent..).unwrap_or_else(|| line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Parse an unquoted key segment, stopping at `stops` or a connection operator.
///
/// Trailing whitespace is not part of the segment.
fn unquoted_segment<'a>(
    stops: &'static [char],
) -> impl FnMut(&mut Input<'a>) -> IResult<Spanned<String>> {
    move |input: &mut Input<'a>| {
        let (raw, range) = repeat::<_, _, (), _, _>(
            1..,
            (not(arrow), none_of(move |c: char| stops.contains(&c))),
        )
        .take()
        .with_span()
        .parse_next(input)?;
        let text = raw.trim_end();
        if text.is_empty() {
            return Err(ErrMode::Backtrack(ContextError::new()));
        }
        let span = Span::new(range.start..range.start + text.len());
        Ok(Spanned::new(text.to_string(), span))
    }
}

fn key_segment<'a>(stops: &'static [char]) -> impl FnMut(&mut Input<'a>) -> IResult<Spanned<String>> {
    move |input: &mut Input<'a>| {
        alt((
            quoted('"')
                .with_span()
                .map(|(text, range)| Spanned::new(text, Span::new(range))),
            quoted('\'')
                .with_span()
                .map(|(text, range)| Spanned::new(text, Span::new(range))),
            unquoted_segment(stops),
        ))
        .parse_next(input)
    }
}

/// Parse a dot-separated key path.
fn key_path<'a>(stops: &'static [char]) -> impl FnMut(&mut Input<'a>) -> IResult<KeyPath> {
    move |input: &mut Input<'a>| {
        let first = key_segment(stops).parse_next(input)?;
        let start = first.span().start();
        let mut segments = vec![first];
        loop {
            let checkpoint = input.checkpoint();
            inline_ws(input)?;
            if opt('.').parse_next(input)?.is_none() {
                input.reset(&checkpoint);
                break;
            }
            let dot = input.current_token_start() - 1;
            inline_ws(input)?;
            let segment = cut_err(key_segment(stops))
                .context(SyntaxDiagnostic {
                    code: ErrorCode::E006,
                    message: "expected a key after `.`",
                    help: None,
                    start: dot,
                })
                .parse_next(input)?;
            segments.push(segment);
        }
        let end = segments.last().map_or(start, |segment| segment.span().end());
        Ok(KeyPath {
            segments,
            span: Span::new(start..end),
        })
    }
}

/// Classify an unquoted value as null, boolean, number or plain text.
fn classify(raw: &str) -> ScalarKind {
    match raw {
        "null" => ScalarKind::Null,
        "true" => ScalarKind::Boolean(true),
        "false" => ScalarKind::Boolean(false),
        _ if is_number(raw) => ScalarKind::Number(raw.to_string()),
        _ => ScalarKind::Unquoted(raw.to_string()),
    }
}

fn is_number(raw: &str) -> bool {
    raw.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'))
        && raw.chars().any(|c| c.is_ascii_digit())
        && !raw.contains(['i', 'I', 'n', 'N'])
        && raw.parse::<f64>().is_ok()
}

fn unquoted_value(input: &mut Input<'_>) -> IResult<Scalar> {
    let (raw, range): (&str, _) = take_till(1.., |c: char| VALUE_STOP.contains(&c))
        .with_span().parse_next(input)?;
    let text = raw.trim_end();
    if text.is_empty() {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    Ok(Scalar {
        kind: classify(text),
        span: Span::new(range.start..range.start + text.len()),
    })
}

/// Parse a primary value.
fn scalar(input: &mut Input<'_>) -> IResult<Scalar> {
    alt((
        block_string
            .with_span()
            .map(|((tag, value), range)| Scalar {
                kind: ScalarKind::Block { tag, value },
                span: Span::new(range),
            }),
        quoted('"').with_span().map(|(value, range)| Scalar {
            kind: ScalarKind::DoubleQuoted(value),
            span: Span::new(range),
        }),
        quoted('\'').with_span().map(|(value, range)| Scalar {
            kind: ScalarKind::SingleQuoted(value),
            span: Span::new(range),
        }),
        unquoted_value,
    ))
    .parse_next(input)
}

/// Parse `(src -> dst)[index]` with an optional `.key` into the edge.
fn indexed_edge(input: &mut Input<'_>) -> IResult<(Edge, Spanned<usize>, Option<KeyPath>)> {
    let start = input.current_token_start();
    '('.parse_next(input)?;
    inline_ws(input)?;
    let src = key_path(PAREN_KEY_STOP).parse_next(input)?;
    inline_ws(input)?;
    let (src_arrow, dst_arrow) = arrow(input)?;
    inline_ws(input)?;
    let dst = key_path(PAREN_KEY_STOP).parse_next(input)?;
    inline_ws(input)?;
    ')'.parse_next(input)?;
    let edge = Edge {
        src,
        src_arrow,
        dst,
        dst_arrow,
        span: Span::new(start..input.current_token_start()),
    };

    '['.parse_next(input)?;
    let (index, range) = take_while(1.., |c: char| c.is_ascii_digit())
        .parse_to::<usize>()
        .with_span()
        .parse_next(input)?;
    ']'.parse_next(input)?;

    let edge_key = if opt('.').parse_next(input)?.is_some() {
        let dot = input.current_token_start() - 1;
        Some(
            cut_err(key_path(KEY_STOP))
                .context(SyntaxDiagnostic {
                    code: ErrorCode::E006,
                    message: "expected a key after `.`",
                    help: None,
                    start: dot,
                })
                .parse_next(input)?,
        )
    } else {
        None
    };

    Ok((edge, Spanned::new(index, Span::new(range)), edge_key))
}

/// Require the end of a statement: newline, `;`, `}`, a comment or EOF.
fn statement_end(input: &mut Input<'_>) -> IResult<()> {
    match peek_char(input) {
        None | Some('\n' | '\r' | ';' | '}' | '#') => Ok(()),
        Some(_) => Err(ErrMode::Cut(ContextError::new().add_context(
            input,
            &input.checkpoint(),
            SyntaxDiagnostic {
                code: ErrorCode::E002,
                message: "unexpected text after statement",
                help: Some("separate statements with a newline or `;`"),
                start: input.current_token_start(),
            },
        ))),
    }
}

/// Parser that accumulates diagnostics while building the syntax tree.
struct Parser {
    diagnostics: DiagnosticCollector,
}

impl Parser {
    fn new() -> Self {
        Self {
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// Parse statements until EOF, or until the `}` matching `open`.
    fn map(&mut self, input: &mut Input<'_>, open: Option<usize>) -> Map {
        let start = open.unwrap_or_else(|| input.current_token_start());
        let mut nodes = Vec::new();
        loop {
            self.separators(input, &mut nodes);
            match peek_char(input) {
                None => {
                    if let Some(open) = open {
                        self.diagnostics.emit(
                            Diagnostic::error("maps must be terminated with `}`")
                                .with_code(ErrorCode::E005)
                                .with_label(Span::new(open..open + 1), "map opened here")
                                .with_help("add a closing `}`"),
                        );
                    }
                    break;
                }
                Some('}') => {
                    let at = input.current_token_start();
                    input.next_token();
                    if open.is_some() {
                        break;
                    }
                    self.diagnostics.emit(
                        Diagnostic::error("unexpected `}`")
                            .with_code(ErrorCode::E002)
                            .with_label(Span::new(at..at + 1), "no map to close"),
                    );
                }
                Some(_) => match self.statement(input) {
                    Ok(key) => nodes.push(Node::Key(key)),
                    Err(err) => {
                        let error_pos = input.current_token_start();
                        let width = peek_char(input).map_or(0, char::len_utf8);
                        self.diagnostics
                            .emit(Self::convert_err_mode(err, error_pos, width));
                        Self::recover(input);
                    }
                },
            }
        }
        Map {
            nodes,
            span: Span::new(start..input.current_token_start()),
        }
    }

    /// Skip whitespace, newlines and `;`, collecting comments.
    fn separators(&mut self, input: &mut Input<'_>, nodes: &mut Vec<Node>) {
        loop {
            match peek_char(input) {
                Some(' ' | '\t' | '\r' | '\n' | ';') => {
                    input.next_token();
                }
                Some('#') => {
                    let start = input.current_token_start();
                    input.next_token();
                    let text: IResult<&str> = take_till(0.., '\n').parse_next(input);
                    let text = text.unwrap_or_default().trim_end();
                    let span = Span::new(start..input.current_token_start());
                    nodes.push(Node::Comment(Spanned::new(text.trim_start().to_string(), span)));
                }
                _ => break,
            }
        }
    }

    /// Parse one statement: a key or edge chain with an optional value.
    fn statement(&mut self, input: &mut Input<'_>) -> IResult<Key> {
        let start = input.current_token_start();
        let mut key = Key {
            key: None,
            edges: Vec::new(),
            edge_index: None,
            edge_key: None,
            primary: None,
            map: None,
            span: Span::default(),
        };

        if peek_char(input) == Some('(') {
            let checkpoint = input.checkpoint();
            match indexed_edge(input) {
                Ok((edge, index, edge_key)) => {
                    key.edges.push(edge);
                    key.edge_index = Some(index);
                    key.edge_key = edge_key;
                }
                Err(ErrMode::Backtrack(_)) => input.reset(&checkpoint),
                Err(err) => return Err(err),
            }
        }

        if key.edges.is_empty() {
            let mut src = key_path(KEY_STOP).parse_next(input)?;
            loop {
                let checkpoint = input.checkpoint();
                inline_ws(input)?;
                let Some((src_arrow, dst_arrow)) = opt(arrow).parse_next(input)? else {
                    input.reset(&checkpoint);
                    break;
                };
                let arrow_end = input.current_token_start();
                inline_ws(input)?;
                let dst = cut_err(key_path(KEY_STOP))
                    .context(SyntaxDiagnostic {
                        code: ErrorCode::E006,
                        message: "expected an edge destination",
                        help: Some("connect two keys, e.g. `a -> b`"),
                        start: arrow_end,
                    })
                    .parse_next(input)?;
                key.edges.push(Edge {
                    src: src.clone(),
                    src_arrow,
                    dst: dst.clone(),
                    dst_arrow,
                    span: src.span.union(dst.span),
                });
                src = dst;
            }
            if key.edges.is_empty() {
                key.key = Some(src);
            }
        }

        let mut end = input.current_token_start();
        inline_ws(input)?;
        if opt(':').parse_next(input)?.is_some() {
            let colon = input.current_token_start() - 1;
            end = colon + 1;
            inline_ws(input)?;
            if peek_char(input) != Some('{') {
                let primary = cut_err(scalar)
                    .context(SyntaxDiagnostic {
                        code: ErrorCode::E006,
                        message: "expected a value after `:`",
                        help: Some("give the key a value or a `{ ... }` map"),
                        start: colon,
                    })
                    .parse_next(input)?;
                end = primary.span.end();
                key.primary = Some(primary);
                inline_ws(input)?;
            }
            if peek_char(input) == Some('{') {
                let open = input.current_token_start();
                input.next_token();
                let map = self.map(input, Some(open));
                end = map.span.end();
                key.map = Some(map);
                inline_ws(input)?;
            }
        }
        key.span = Span::new(start..end);

        statement_end(input)?;
        Ok(key)
    }

    /// Skip the rest of a malformed statement.
    fn recover(input: &mut Input<'_>) {
        let _: IResult<&str> = take_till(0.., ['\n', ';', '}']).parse_next(input);
    }

    /// Convert an ErrMode and error position to a Diagnostic.
    ///
    /// Uses the first `SyntaxDiagnostic` context for code, message and help.
    /// Falls back to E002 (unexpected character) if no context is found.
    fn convert_err_mode(
        err: ErrMode<ContextError<SyntaxDiagnostic>>,
        error_pos: usize,
        width: usize,
    ) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(SyntaxDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let end = if *start == error_pos {
                error_pos + width
            } else {
                error_pos
            };
            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(Span::new(*start..end), code.description());
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            return diag;
        }

        Diagnostic::error("unexpected character")
            .with_code(ErrorCode::E002)
            .with_label(
                Span::new(error_pos..error_pos + width),
                ErrorCode::E002.description(),
            )
    }
}

/// Parse a source file into its syntax tree.
///
/// Malformed statements are skipped after reporting, so a single call
/// reports every syntax error in the file.
///
/// # Errors
///
/// Returns a [`ParseError`] holding every syntax diagnostic if any
/// statement failed to parse.
pub fn parse(source: &str) -> Result<Map, ParseError> {
    let mut input = LocatingSlice::new(source);
    let mut parser = Parser::new();
    let map = parser.map(&mut input, None);
    parser.diagnostics.finish().map(|()| map)
}

/// Parse a standalone key path, such as the value of `near`.
///
/// # Errors
///
/// Returns a [`ParseError`] if `text` is not exactly one key path.
pub fn parse_key(text: &str) -> Result<KeyPath, ParseError> {
    let mut input = LocatingSlice::new(text);
    let result = (
        inline_ws,
        key_path(KEY_STOP),
        inline_ws,
        winnow::combinator::eof,
    )
        .map(|(_, path, _, _)| path)
        .parse_next(&mut input);
    result.map_err(|err| {
        let error_pos = input.current_token_start();
        let width = peek_char(&mut input).map_or(0, char::len_utf8);
        ParseError::from(Parser::convert_err_mode(err, error_pos, width))
    })
}
