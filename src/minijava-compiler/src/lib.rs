//! MiniJava 编译器前端
//!
//! 包含词法分析和语法分析：源代码 → token 序列 → 语法树

/// 错误类型
pub mod error;

/// 词法分析
pub mod lexer;

/// 语法解析
pub mod parser;

/// 语法树
pub mod tree;


pub use error::{Error, LexicalError, Result, SyntaxError};
pub use lexer::{Category, Token, tokenize};
pub use parser::{Parser, parse};
pub use tree::{Label, Node};
