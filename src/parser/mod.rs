//! Recursive descent parser for `.blank` job descriptions
//! Converts tokens into a `JobFile`

use crate::ast::*;
use crate::lexer::{lex_checked, Lexeme, Token};
use logos::Span;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unexpected token: expected {expected}, got {got}")]
    UnexpectedToken {
        expected: String,
        got: String,
        span: Span,
    },

    #[error("unexpected end of input: expected {expected}")]
    UnexpectedEOF { expected: String, span: Span },

    #[error("invalid number")]
    InvalidNumber { span: Span },

    #[error("unknown work offset: G{number}")]
    UnknownWorkOffset { number: f64, span: Span },

    #[error("tool number {number} is not a whole number between 1 and 99")]
    InvalidToolNumber { number: f64, span: Span },

    #[error("unrecognised input '{text}'")]
    InvalidInput { text: String, span: Span },
}

impl ParseError {
    /// Byte range of the offending input
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::UnexpectedEOF { span, .. }
            | ParseError::InvalidNumber { span }
            | ParseError::UnknownWorkOffset { span, .. }
            | ParseError::InvalidToolNumber { span, .. }
            | ParseError::InvalidInput { span, .. } => span.clone(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Lex and parse a job description in one step
pub fn parse_source(source: &str) -> Result<JobFile> {
    let mut tokens = Vec::new();
    for (lexeme, span) in lex_checked(source) {
        match lexeme {
            Lexeme::Token(token) => tokens.push((token, span)),
            Lexeme::Invalid(text) => return Err(ParseError::InvalidInput { text, span }),
        }
    }
    Parser::new(tokens).parse()
}

pub struct Parser {
    tokens: Vec<(Token, Span)>,
    position: usize,
}

impl Parser {
    pub fn new(tokens: Vec<(Token, Span)>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parse the full job description
    pub fn parse(&mut self) -> Result<JobFile> {
        let mut job = JobFile::default();

        loop {
            self.skip_newlines();
            let Some(token) = self.peek().cloned() else {
                break;
            };

            match token {
                Token::Units => job.units = Some(self.parse_units()?),
                Token::Offset => job.work_offset = Some(self.parse_offset()?),
                Token::Material => {
                    self.consume(Token::Material)?;
                    job.material = Some(self.expect_string()?);
                }
                Token::Part => job.part = Some(self.parse_part()?),
                Token::Stock => {
                    self.consume(Token::Stock)?;
                    let (long, short) = self.parse_long_short()?;
                    job.stock = Some(StockDims { long, short });
                }
                Token::Parallels => {
                    self.consume(Token::Parallels)?;
                    let (long, short) = self.parse_long_short()?;
                    job.parallels = Some(Parallels { long, short });
                }
                Token::Tool => job.tool = Some(self.parse_tool()?),
                Token::Spindle => {
                    self.consume(Token::Spindle)?;
                    self.consume(Token::RPM)?;
                    job.spindle_rpm = Some(self.expect_number()?);
                }
                Token::Feed => {
                    self.consume(Token::Feed)?;
                    job.feed_rate = Some(self.expect_number()?);
                }
                Token::Depth => {
                    self.consume(Token::Depth)?;
                    job.depth_of_cut = Some(self.expect_number()?);
                }
                Token::Safe => job.safe = Some(self.parse_safe()?),
                Token::Cleanup => job.cleanup = Some(self.parse_cleanup()?),
                Token::Mirror => {
                    self.consume(Token::Mirror)?;
                    job.mirror_y = Some(self.expect_switch()?);
                }
                Token::Reapply => {
                    self.consume(Token::Reapply)?;
                    job.reapply_offset = Some(self.expect_switch()?);
                }
                Token::Debug => {
                    self.consume(Token::Debug)?;
                    job.debug = Some(self.expect_switch()?);
                }
                _ => {
                    return Err(self.unexpected("a statement keyword"));
                }
            }

            self.end_statement()?;
        }

        Ok(job)
    }

    fn parse_units(&mut self) -> Result<Units> {
        self.consume(Token::Units)?;
        match self.peek() {
            Some(Token::Metric) => { self.advance(); Ok(Units::Metric) }
            Some(Token::Imperial) => { self.advance(); Ok(Units::Imperial) }
            _ => Err(self.unexpected("'metric' or 'imperial'")),
        }
    }

    fn parse_offset(&mut self) -> Result<WorkOffset> {
        self.consume(Token::Offset)?;
        let span = self.current_span();
        let number = self.expect_number()?;
        if number.fract() != 0.0 || !(0.0..=255.0).contains(&number) {
            return Err(ParseError::UnknownWorkOffset { number, span });
        }
        WorkOffset::from_number(number as u8)
            .ok_or(ParseError::UnknownWorkOffset { number, span })
    }

    fn parse_part(&mut self) -> Result<PartDims> {
        self.consume(Token::Part)?;
        let (long, short) = self.parse_long_short()?;
        self.consume(Token::Thickness)?;
        let thickness = self.expect_number()?;
        Ok(PartDims { long, short, thickness })
    }

    fn parse_long_short(&mut self) -> Result<(f64, f64)> {
        self.consume(Token::Long)?;
        let long = self.expect_number()?;
        self.consume(Token::Short)?;
        let short = self.expect_number()?;
        Ok((long, short))
    }

    fn parse_tool(&mut self) -> Result<ToolRef> {
        self.consume(Token::Tool)?;
        let span = self.current_span();
        let number = self.expect_number()?;
        if number.fract() != 0.0 || !(1.0..=99.0).contains(&number) {
            return Err(ParseError::InvalidToolNumber { number, span });
        }

        let source = match self.peek() {
            Some(Token::Diameter) => {
                self.advance();
                ToolSource::Diameter(self.expect_number()?)
            }
            Some(Token::String(_)) => ToolSource::Library(self.expect_string()?),
            _ => return Err(self.unexpected("'dia <n>' or a quoted tool id")),
        };

        Ok(ToolRef {
            number: number as u8,
            source,
        })
    }

    fn parse_safe(&mut self) -> Result<SafeDistances> {
        self.consume(Token::Safe)?;
        self.consume(Token::Z)?;
        let z = self.expect_number()?;
        self.consume(Token::X)?;
        let x = self.expect_number()?;
        Ok(SafeDistances { z, x })
    }

    fn parse_cleanup(&mut self) -> Result<CleanupSpec> {
        self.consume(Token::Cleanup)?;
        match self.peek() {
            Some(Token::Standard) => { self.advance(); Ok(CleanupSpec::Standard) }
            Some(Token::Wide) => { self.advance(); Ok(CleanupSpec::Wide) }
            Some(Token::Fraction) => {
                self.advance();
                let fraction = self.expect_number()?;
                self.consume(Token::Min)?;
                let min = self.expect_number()?;
                self.consume(Token::Max)?;
                let max = self.expect_number()?;
                Ok(CleanupSpec::Custom { fraction, min, max })
            }
            _ => Err(self.unexpected("'standard', 'wide' or 'fraction'")),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).map(|(t, _)| t)
    }

    fn advance(&mut self) -> Option<&Token> {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        self.tokens.get(self.position - 1).map(|(t, _)| t)
    }

    fn consume(&mut self, expected: Token) -> Result<()> {
        match self.peek() {
            Some(token) if token == &expected => {
                self.advance();
                Ok(())
            }
            _ => Err(self.unexpected(&format!("{:?}", expected))),
        }
    }

    fn expect_number(&mut self) -> Result<f64> {
        match self.peek() {
            Some(Token::Number(Some(n))) => {
                let val = *n;
                self.advance();
                Ok(val)
            }
            Some(Token::Number(None)) => Err(ParseError::InvalidNumber {
                span: self.current_span(),
            }),
            _ => Err(self.unexpected("number")),
        }
    }

    fn expect_string(&mut self) -> Result<String> {
        match self.peek() {
            Some(Token::String(s)) => {
                let val = s.clone();
                self.advance();
                Ok(val)
            }
            _ => Err(self.unexpected("quoted string")),
        }
    }

    fn expect_switch(&mut self) -> Result<bool> {
        match self.peek() {
            Some(Token::On) => { self.advance(); Ok(true) }
            Some(Token::Off) => { self.advance(); Ok(false) }
            _ => Err(self.unexpected("'on' or 'off'")),
        }
    }

    /// A statement ends at a newline or at the end of input
    fn end_statement(&mut self) -> Result<()> {
        match self.peek() {
            None | Some(Token::Newline) => Ok(()),
            _ => Err(self.unexpected("end of line")),
        }
    }

    fn skip_newlines(&mut self) {
        while self.peek() == Some(&Token::Newline) {
            self.advance();
        }
    }

    fn current_span(&self) -> Span {
        match self.tokens.get(self.position) {
            Some((_, span)) => span.clone(),
            None => {
                let end = self.tokens.last().map(|(_, s)| s.end).unwrap_or(0);
                end..end
            }
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.tokens.get(self.position) {
            Some((token, span)) => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                got: format!("{:?}", token),
                span: span.clone(),
            },
            None => ParseError::UnexpectedEOF {
                expected: expected.to_string(),
                span: self.current_span(),
            },
        }
    }
}
