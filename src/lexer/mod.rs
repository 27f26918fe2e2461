use logos::Logos;

/// Tokens for `.blank` job descriptions
/// One statement per line, keywords a machinist would write on a setup sheet

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\f\r]+")] // Skip whitespace
#[logos(error = LexerError)]
pub enum Token {
    // Literals
    #[regex(r"-?\d+\.?\d*", |lex| lex.slice().parse::<f64>().ok())]
    Number(Option<f64>),

    #[regex(r#""[^"]*""#, |lex| lex.slice()[1..lex.slice().len()-1].to_string())]
    String(String),

    // Keywords - Program setup
    #[token("units")]
    Units,

    #[token("metric")]
    Metric,

    #[token("imperial")]
    Imperial,

    #[token("offset")]
    Offset,

    #[token("material")]
    Material,

    // Keywords - Workpiece
    #[token("part")]
    Part,

    #[token("stock")]
    Stock,

    #[token("parallels")]
    Parallels,

    #[token("long")]
    Long,

    #[token("short")]
    Short,

    #[token("thickness")]
    Thickness,

    // Keywords - Tool and cutting
    #[token("tool")]
    Tool,

    #[token("dia")]
    #[token("diameter")]
    Diameter,

    #[token("spindle")]
    Spindle,

    #[token("rpm")]
    RPM,

    #[token("feed")]
    #[token("feedrate")]
    Feed,

    #[token("depth")]
    Depth,

    #[token("safe")]
    Safe,

    // Keywords - Clean-up policy
    #[token("cleanup")]
    Cleanup,

    #[token("fraction")]
    Fraction,

    #[token("min")]
    Min,

    #[token("max")]
    Max,

    #[token("standard")]
    Standard,

    #[token("wide")]
    Wide,

    // Keywords - Conventions
    #[token("mirror")]
    Mirror,

    #[token("reapply")]
    Reapply,

    #[token("debug")]
    Debug,

    #[token("on")]
    On,

    #[token("off")]
    Off,

    #[token("x")]
    X,

    #[token("z")]
    Z,

    // Newlines for statement separation, a run of blank lines is one token
    #[regex(r"\n[ \t\f\r\n]*")]
    Newline,

    // Comments
    #[regex(r"//[^\n]*", logos::skip)]
    #[regex(r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/", logos::skip)]
    #[regex(r";[^\n]*", logos::skip)]
    Comment,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LexerError;

impl std::fmt::Display for LexerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lexer error")
    }
}

impl std::error::Error for LexerError {}

/// Unrecognised input, kept as a token so the parser can report it with its span
#[derive(Debug, Clone, PartialEq)]
pub enum Lexeme {
    Token(Token),
    Invalid(String),
}

/// Lex the input string into tokens
pub fn lex(input: &str) -> Vec<(Token, logos::Span)> {
    lex_checked(input)
        .into_iter()
        .filter_map(|(lexeme, span)| match lexeme {
            Lexeme::Token(token) => Some((token, span)),
            Lexeme::Invalid(_) => None,
        })
        .collect()
}

/// Lex the input, keeping unrecognised slices so they can be reported
pub fn lex_checked(input: &str) -> Vec<(Lexeme, logos::Span)> {
    let mut lexer = Token::lexer(input);
    let mut out = Vec::new();
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => out.push((Lexeme::Token(token), span)),
            Err(_) => out.push((Lexeme::Invalid(lexer.slice().to_string()), span)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_statement() {
        let input = "part long 150 short 50 thickness 20";
        let tokens: Vec<_> = lex(input).into_iter().map(|(t, _)| t).collect();

        assert_eq!(tokens, vec![
            Token::Part,
            Token::Long,
            Token::Number(Some(150.0)),
            Token::Short,
            Token::Number(Some(50.0)),
            Token::Thickness,
            Token::Number(Some(20.0)),
        ]);
    }

    #[test]
    fn test_tool_from_library() {
        let input = "tool 10 \"FM_40_5FL\"";
        let tokens: Vec<_> = lex(input).into_iter().map(|(t, _)| t).collect();

        assert_eq!(tokens, vec![
            Token::Tool,
            Token::Number(Some(10.0)),
            Token::String("FM_40_5FL".to_string()),
        ]);
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let input = "units metric ; shop default\n\n\n// note\ndepth 1.5\n";
        let tokens: Vec<_> = lex(input).into_iter().map(|(t, _)| t).collect();

        assert_eq!(tokens, vec![
            Token::Units,
            Token::Metric,
            Token::Newline,
            Token::Newline,
            Token::Depth,
            Token::Number(Some(1.5)),
            Token::Newline,
        ]);
    }

    #[test]
    fn test_invalid_input_is_kept() {
        let lexemes = lex_checked("depth @");
        assert_eq!(lexemes.len(), 2);
        assert_eq!(lexemes[1].0, Lexeme::Invalid("@".to_string()));
        assert_eq!(lexemes[1].1, 6..7);
    }
}
