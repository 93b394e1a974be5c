use crate::error::{Expected, Result, SyntaxError};
use crate::lexer::{Category, Token, tokenize};
use crate::tree::{Label, Node};

/// Tokenizes and parses a whole source file, returning the `PROG` tree.
pub fn parse(source: &str) -> Result<Node> {
    let tokens = tokenize(source)?;
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program()?;
    Ok(program)
}

/// Recursive-descent parser over an already tokenized source.
///
/// The only state is the cursor into `tokens`; it moves forward on each
/// successful [`Parser::consume`] and never rewinds.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Handed out by `lookahead` once the cursor is past the last token.
    eof: Token,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            eof: Token::eof(),
        }
    }

    /// Number of tokens consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the current token without consuming it.
    pub fn lookahead(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    /// Consumes the current token if it has the expected category and, when
    /// given, the exact expected text.
    pub fn consume(
        &mut self,
        category: Category,
        text: Option<&str>,
    ) -> Result<Token, SyntaxError> {
        let expected = || Expected {
            category,
            text: text.map(str::to_string),
        };

        let Some(token) = self.tokens.get(self.pos) else {
            return Err(SyntaxError::UnexpectedEndOfInput {
                expected: expected(),
            });
        };

        let text_matches = text.is_none_or(|text| token.text == text);
        if token.category != category || !text_matches {
            return Err(SyntaxError::mismatch(expected(), token));
        }

        tracing::trace!(%token, "consumed");
        self.pos += 1;
        Ok(token.clone())
    }

    fn expect(&mut self, category: Category, text: &str) -> Result<Token, SyntaxError> {
        self.consume(category, Some(text))
    }

    fn expect_reserved(&mut self, word: &str) -> Result<Token, SyntaxError> {
        self.expect(Category::Reserved, word)
    }

    fn expect_punct(&mut self, punct: &str) -> Result<Token, SyntaxError> {
        self.expect(Category::Punctuation, punct)
    }

    fn at(&self, category: Category, text: &str) -> bool {
        self.lookahead().is(category, text)
    }

    /// Program → MainClass { ClassDecl }
    pub fn parse_program(&mut self) -> Result<Node, SyntaxError> {
        let main = self.parse_main()?;

        // 只支持 main 所在的类
        let next = self.lookahead();
        if next.is(Category::Reserved, "class") {
            return Err(SyntaxError::UnsupportedClassDeclaration {
                line: next.line,
                column: next.column,
            });
        }
        if next.category != Category::Eof {
            return Err(SyntaxError::trailing(next));
        }

        tracing::debug!(tokens = self.pos, "parsed program");
        Ok(Node::internal(Label::Prog, vec![main]))
    }

    /// MainClass → 'class' Identifier '{' 'public' 'static' 'void' 'main'
    ///              '(' 'String' '[' ']' Identifier ')' '{' { Command } '}' '}'
    fn parse_main(&mut self) -> Result<Node, SyntaxError> {
        self.expect_reserved("class")?;
        let class_name = self.consume(Category::Identifier, None)?;
        self.expect_punct("{")?;

        for word in ["public", "static", "void", "main"] {
            self.expect_reserved(word)?;
        }

        // '(' 'String' '[' ']' Identifier ')'
        self.expect_punct("(")?;
        self.expect_reserved("String")?;
        self.expect_punct("[")?;
        self.expect_punct("]")?;
        let param_name = self.consume(Category::Identifier, None)?;
        self.expect_punct(")")?;

        self.expect_punct("{")?;
        let commands = self.parse_commands()?;
        self.expect_punct("}")?;
        self.expect_punct("}")?;

        Ok(Node::internal(
            Label::Main,
            vec![
                Node::leaf(Label::Class, class_name.text),
                Node::leaf(Label::Params, param_name.text),
                Node::internal(Label::Commands, commands),
            ],
        ))
    }

    /// { Command } 直到遇到 '}'
    fn parse_commands(&mut self) -> Result<Vec<Node>, SyntaxError> {
        let mut commands = Vec::new();
        while !self.at(Category::Punctuation, "}") {
            commands.push(self.parse_command()?);
        }
        Ok(commands)
    }

    /// Command → If | While | Print | Assignment | Block
    fn parse_command(&mut self) -> Result<Node, SyntaxError> {
        let token = self.lookahead();
        match (token.category, token.text.as_str()) {
            (Category::Reserved, "if") => self.parse_if(),
            (Category::Reserved, "while") => self.parse_while(),
            (Category::Reserved, "System.out.println") => self.parse_print(),
            (Category::Identifier, _) => self.parse_assignment(),
            (Category::Punctuation, "{") => self.parse_block(),
            _ => Err(SyntaxError::unexpected("command", token)),
        }
    }

    /// If → 'if' '(' Expression ')' Command [ 'else' Command ]
    fn parse_if(&mut self) -> Result<Node, SyntaxError> {
        self.expect_reserved("if")?;
        self.expect_punct("(")?;
        let condition = self.parse_expression()?;
        self.expect_punct(")")?;
        let then_branch = self.parse_command()?;

        let mut children = vec![condition, then_branch];
        if self.at(Category::Reserved, "else") {
            self.expect_reserved("else")?;
            children.push(self.parse_command()?);
        }

        Ok(Node::internal(Label::If, children))
    }

    /// While → 'while' '(' Expression ')' Command
    fn parse_while(&mut self) -> Result<Node, SyntaxError> {
        self.expect_reserved("while")?;
        self.expect_punct("(")?;
        let condition = self.parse_expression()?;
        self.expect_punct(")")?;
        let body = self.parse_command()?;

        Ok(Node::internal(Label::While, vec![condition, body]))
    }

    /// Print → 'System.out.println' '(' Expression ')' ';'
    fn parse_print(&mut self) -> Result<Node, SyntaxError> {
        self.expect_reserved("System.out.println")?;
        self.expect_punct("(")?;
        let value = self.parse_expression()?;
        self.expect_punct(")")?;
        self.expect_punct(";")?;

        Ok(Node::internal(Label::Print, vec![value]))
    }

    /// Assignment → Identifier '=' Expression ';'
    fn parse_assignment(&mut self) -> Result<Node, SyntaxError> {
        let target = self.consume(Category::Identifier, None)?;
        self.expect_punct("=")?;
        let value = self.parse_expression()?;
        self.expect_punct(";")?;

        Ok(Node::internal(
            Label::Assignment,
            vec![Node::leaf(Label::Identifier, target.text), value],
        ))
    }

    /// Block → '{' { Command } '}'
    fn parse_block(&mut self) -> Result<Node, SyntaxError> {
        self.expect_punct("{")?;
        let commands = self.parse_commands()?;
        self.expect_punct("}")?;

        Ok(Node::internal(Label::Block, commands))
    }

    /// Expression → Number | 'true' | 'false' | Identifier
    ///
    /// 只接受单个 token，运算符和括号表达式都是语法错误
    fn parse_expression(&mut self) -> Result<Node, SyntaxError> {
        let token = self.lookahead();
        let label = match (token.category, token.text.as_str()) {
            (Category::Number, _) => Label::Number,
            (Category::Reserved, "true" | "false") => Label::Boolean,
            (Category::Identifier, _) => Label::Identifier,
            _ => return Err(SyntaxError::unexpected("expression", token)),
        };

        let category = token.category;
        let token = self.consume(category, None)?;
        Ok(Node::leaf(label, token.text))
    }
}
