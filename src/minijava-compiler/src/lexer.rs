use std::fmt;

use logos::Logos;

use crate::error::LexicalError;

/// logos 在没有匹配时给出的错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexerError {
    InvalidToken,
    /// 数字后面紧跟字母或下划线，比如 `123abc`
    MalformedNumber,
    /// `/*` 在同一行内没有对应的 `*/`
    UnterminatedComment,
}

impl Default for LexerError {
    fn default() -> Self {
        LexerError::InvalidToken
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// 数字必须是完整的单词
fn whole_number(lex: &mut logos::Lexer<TokenKind>) -> Result<(), LexerError> {
    let digits_only = lex.slice().bytes().all(|b| b.is_ascii_digit());
    let glued = lex.remainder().chars().next().is_some_and(is_word_char);
    if digits_only && !glued {
        Ok(())
    } else {
        Err(LexerError::MalformedNumber)
    }
}

/// 块注释到本行第一个 `*/` 为止
fn block_comment(lex: &mut logos::Lexer<TokenKind>) -> Result<(), LexerError> {
    let rest = lex.remainder();
    let line = &rest[..rest.find('\n').unwrap_or(rest.len())];
    match line.find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            Ok(())
        }
        None => Err(LexerError::UnterminatedComment),
    }
}

/// `System.out.println` 后面紧跟单词字符时，把整个单词吞进来，由 `tokenize` 拆开
fn println_word(lex: &mut logos::Lexer<TokenKind>) {
    let rest = lex.remainder();
    let tail = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    lex.bump(tail);
}

#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
#[logos(error = LexerError)]
pub enum TokenKind {
    // trivia
    #[regex(r"[ \t\n\r\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    Comment,

    // 块注释不跨行
    #[token("/*", block_comment)]
    BlockComment,

    // Keywords
    #[token("boolean")]
    Boolean,
    #[token("class")]
    Class,
    #[token("extends")]
    Extends,
    #[token("public")]
    Public,
    #[token("static")]
    Static,
    #[token("void")]
    Void,
    #[token("main")]
    Main,
    #[token("String")]
    StringType,
    #[token("return")]
    Return,
    #[token("int")]
    Int,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("System.out.println", println_word)]
    Println,
    #[token("length")]
    Length,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("this")]
    This,
    #[token("new")]
    New,
    #[token("null")]
    Null,

    #[regex("[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[0-9][0-9a-zA-Z_]*", whole_number)]
    IntConst,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Mul,
    #[token("&&")]
    And,
    #[token("!")]
    Not,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(">=")]
    Geq,
    #[token("<=")]
    Leq,
    #[token("==")]
    Eq,
    #[token("!=")]
    Ne,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("=")]
    Assign,
}

impl TokenKind {
    /// The category a kind is reported under; `None` for trivia.
    pub fn category(self) -> Option<Category> {
        use TokenKind::*;

        let category = match self {
            Whitespace | Comment | BlockComment => return None,
            Boolean | Class | Extends | Public | Static | Void | Main | StringType | Return
            | Int | If | Else | While | Println | Length | True | False | This | New | Null => {
                Category::Reserved
            }
            Ident => Category::Identifier,
            IntConst => Category::Number,
            Plus | Minus | Mul | And | Not | Lt | Gt | Geq | Leq | Eq | Ne => Category::Operator,
            LParen | RParen | Comma | Semicolon | Dot | LBracket | RBracket | LBrace | RBrace
            | Assign => Category::Punctuation,
        };
        Some(category)
    }
}

/// Every spelling classified as [`Category::Reserved`].
pub const RESERVED_WORDS: &[&str] = &[
    "boolean",
    "class",
    "extends",
    "public",
    "static",
    "void",
    "main",
    "String",
    "return",
    "int",
    "if",
    "else",
    "while",
    "System.out.println",
    "length",
    "true",
    "false",
    "this",
    "new",
    "null",
];

/// Token categories shared by the tokenizer and the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Reserved,
    Identifier,
    Number,
    Operator,
    Punctuation,
    /// Only ever seen through the parser's lookahead past the last token.
    Eof,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Reserved => "RESERVED",
            Category::Identifier => "IDENTIFIER",
            Category::Number => "NUMBER",
            Category::Operator => "OPERATOR",
            Category::Punctuation => "PUNCTUATION",
            Category::Eof => "EOF",
        };
        f.write_str(name)
    }
}

/// One classified lexical unit. `line` is 1-based, `column` 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub category: Category,
    pub text: String,
    pub line: isize,
    pub column: isize,
}

impl Token {
    pub fn new(category: Category, text: impl Into<String>, line: isize, column: isize) -> Self {
        Self {
            category,
            text: text.into(),
            line,
            column,
        }
    }

    /// The "past end of input" sentinel.
    pub fn eof() -> Self {
        Self::new(Category::Eof, "", -1, -1)
    }

    pub fn is(&self, category: Category, text: &str) -> bool {
        self.category == category && self.text == text
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token({}, {}, {}:{})",
            self.category, self.text, self.line, self.column
        )
    }
}

/// 把源代码切分成 token 序列，丢弃空白和注释
///
/// Stops at the first character no category matches; nothing scanned before
/// it is returned in that case.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexicalError> {
    let mut tokens = Vec::new();
    let mut line: isize = 1;
    // 当前行起始的字节偏移
    let mut line_start = 0;

    for (result, span) in TokenKind::lexer(source).spanned() {
        let column = source[line_start..span.start].chars().count() as isize;

        let kind = match result {
            Ok(kind) => kind,
            Err(error) => {
                let character = source[span.start..].chars().next().unwrap_or_default();
                tracing::debug!(?error, %character, line, column, "no token category matched");
                return Err(LexicalError {
                    character,
                    line,
                    column,
                });
            }
        };

        let text = &source[span.start..span.end];
        match kind.category() {
            Some(_) if kind == TokenKind::Println && text != "System.out.println" => {
                split_dotted(text, line, column, &mut tokens);
            }
            Some(category) => tokens.push(Token::new(category, text, line, column)),
            None => {
                // 列号从最后一个换行之后算起
                if let Some(last) = text.rfind('\n') {
                    line += text.matches('\n').count() as isize;
                    line_start = span.start + last + 1;
                }
            }
        }
    }

    tracing::debug!(count = tokens.len(), lines = line, "tokenized source");
    Ok(tokens)
}

/// `System.out.printlnX` is not the keyword: emit `System . out . printlnX`.
fn split_dotted(text: &str, line: isize, column: isize, tokens: &mut Vec<Token>) {
    let mut offset = 0;
    for (i, part) in text.split('.').enumerate() {
        if i > 0 {
            tokens.push(Token::new(Category::Punctuation, ".", line, column + offset));
            offset += 1;
        }
        tokens.push(Token::new(Category::Identifier, part, line, column + offset));
        offset += part.chars().count() as isize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logos::Logos;

    fn categories(source: &str) -> Vec<(Category, String)> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| (t.category, t.text))
            .collect()
    }

    #[test]
    fn lexer_test() {
        let source = r#"
            class Example {
                public static void main(String[] args) {
                    // comment
                    x = 10;
                    System.out.println(x);
                }
            }
        "#;

        let kinds: Vec<_> = TokenKind::lexer(source)
            .filter_map(|tok| tok.ok())
            .filter(|kind| kind.category().is_some())
            .collect();

        let expected = vec![
            TokenKind::Class,
            TokenKind::Ident,
            TokenKind::LBrace,
            TokenKind::Public,
            TokenKind::Static,
            TokenKind::Void,
            TokenKind::Main,
            TokenKind::LParen,
            TokenKind::StringType,
            TokenKind::LBracket,
            TokenKind::RBracket,
            TokenKind::Ident,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::Ident,
            TokenKind::Assign,
            TokenKind::IntConst,
            TokenKind::Semicolon,
            TokenKind::Println,
            TokenKind::LParen,
            TokenKind::Ident,
            TokenKind::RParen,
            TokenKind::Semicolon,
            TokenKind::RBrace,
            TokenKind::RBrace,
        ];

        assert_eq!(kinds, expected);
    }

    #[test]
    fn test_token_positions() {
        let code = "int x = 42;\n  y = x;";
        let tokens = tokenize(code).unwrap();

        let expected = vec![
            (1, 0, "int"),
            (1, 4, "x"),
            (1, 6, "="),
            (1, 8, "42"),
            (1, 10, ";"),
            (2, 2, "y"),
            (2, 4, "="),
            (2, 6, "x"),
            (2, 7, ";"),
        ];

        assert_eq!(tokens.len(), expected.len());
        for (i, (token, (line, column, text))) in tokens.iter().zip(expected).enumerate() {
            assert_eq!(token.text, text, "Token {} text mismatch", i);
            assert_eq!((token.line, token.column), (line, column), "Token {} position mismatch", i);
        }
    }

    #[test]
    fn keywords_are_whole_words() {
        assert_eq!(
            categories("if iffy int intx String Strings"),
            vec![
                (Category::Reserved, "if".to_string()),
                (Category::Identifier, "iffy".to_string()),
                (Category::Reserved, "int".to_string()),
                (Category::Identifier, "intx".to_string()),
                (Category::Reserved, "String".to_string()),
                (Category::Identifier, "Strings".to_string()),
            ]
        );
    }

    #[test]
    fn println_is_a_single_reserved_token() {
        assert_eq!(
            categories("System.out.println(out);"),
            vec![
                (Category::Reserved, "System.out.println".to_string()),
                (Category::Punctuation, "(".to_string()),
                (Category::Identifier, "out".to_string()),
                (Category::Punctuation, ")".to_string()),
                (Category::Punctuation, ";".to_string()),
            ]
        );
    }

    #[test]
    fn println_glued_to_word_is_identifier_chain() {
        let tokens = tokenize("System.out.printlnX(1);").unwrap();
        let summary: Vec<_> = tokens
            .iter()
            .map(|t| (t.category, t.text.as_str(), t.column))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Category::Identifier, "System", 0),
                (Category::Punctuation, ".", 6),
                (Category::Identifier, "out", 7),
                (Category::Punctuation, ".", 10),
                (Category::Identifier, "printlnX", 11),
                (Category::Punctuation, "(", 19),
                (Category::Number, "1", 20),
                (Category::Punctuation, ")", 21),
                (Category::Punctuation, ";", 22),
            ]
        );

        assert_eq!(
            categories("System.out.println1"),
            vec![
                (Category::Identifier, "System".to_string()),
                (Category::Punctuation, ".".to_string()),
                (Category::Identifier, "out".to_string()),
                (Category::Punctuation, ".".to_string()),
                (Category::Identifier, "println1".to_string()),
            ]
        );
    }

    #[test]
    fn operators_prefer_longest_spelling() {
        assert_eq!(
            categories(">= <= == != && = ! < >"),
            vec![
                (Category::Operator, ">=".to_string()),
                (Category::Operator, "<=".to_string()),
                (Category::Operator, "==".to_string()),
                (Category::Operator, "!=".to_string()),
                (Category::Operator, "&&".to_string()),
                (Category::Punctuation, "=".to_string()),
                (Category::Operator, "!".to_string()),
                (Category::Operator, "<".to_string()),
                (Category::Operator, ">".to_string()),
            ]
        );
    }

    #[test]
    fn comments_are_discarded_and_lines_tracked() {
        let source = "/* header */ a // trailing\n/**/ b /* x ** y */ c";
        let tokens = tokenize(source).unwrap();
        let positions: Vec<_> = tokens
            .iter()
            .map(|t| (t.text.as_str(), t.line, t.column))
            .collect();
        assert_eq!(positions, vec![("a", 1, 13), ("b", 2, 5), ("c", 2, 20)]);
    }

    #[test]
    fn block_comment_shapes() {
        for source in ["/* */ a", "/*a*/ a", "/***/ a", "/** doc */ a", "/* a **/ a"] {
            assert_eq!(
                categories(source),
                vec![(Category::Identifier, "a".to_string())],
                "source {:?}",
                source
            );
        }

        // 第一个 `*/` 就结束注释
        assert_eq!(
            categories("/* a */ b /* c */"),
            vec![(Category::Identifier, "b".to_string())]
        );
        assert_eq!(categories("x = 1; /** javadoc */").len(), 4);
    }

    #[test]
    fn column_counts_indentation_after_newline() {
        let tokens = tokenize("a\n    b\n\t// note\n  c").unwrap();
        let positions: Vec<_> = tokens.iter().map(|t| (t.line, t.column)).collect();
        assert_eq!(positions, vec![(1, 0), (2, 4), (4, 2)]);
    }

    #[test]
    fn block_comment_does_not_span_lines() {
        let error = tokenize("a /* one\ntwo */").unwrap_err();
        assert_eq!(error.character, '/');
        assert_eq!((error.line, error.column), (1, 2));
    }

    #[test]
    fn lex_complex_source_with_errors() {
        let source = r#"
class Main {
    public static void main(String[] a) {
        x = 1;
        y = @;
    }
}
"#;

        let error = tokenize(source).unwrap_err();
        assert_eq!(error.character, '@');
        assert_eq!((error.line, error.column), (5, 12));
        assert_eq!(error.to_string(), "unexpected character '@' at 5:12");
    }

    #[test]
    fn number_followed_by_letters_is_rejected() {
        let error = tokenize("x = 123abc;").unwrap_err();
        assert_eq!(error.character, '1');
        assert_eq!((error.line, error.column), (1, 4));

        assert_eq!(
            categories("x1 = 007;"),
            vec![
                (Category::Identifier, "x1".to_string()),
                (Category::Punctuation, "=".to_string()),
                (Category::Number, "007".to_string()),
                (Category::Punctuation, ";".to_string()),
            ]
        );
    }

    #[test]
    fn number_glued_to_unicode_letter_is_rejected_at_first_digit() {
        let error = tokenize("x = 123é;").unwrap_err();
        assert_eq!(error.character, '1');
        assert_eq!((error.line, error.column), (1, 4));
    }

    #[test]
    fn columns_count_characters_not_bytes() {
        let tokens = tokenize("/* é */ x").unwrap();
        assert_eq!(tokens[0].column, 8);
    }

    #[test]
    fn token_display_matches_dump_format() {
        let token = Token::new(Category::Reserved, "class", 1, 0);
        assert_eq!(token.to_string(), "Token(RESERVED, class, 1:0)");
        assert_eq!(Token::eof().to_string(), "Token(EOF, , -1:-1)");
    }
}
