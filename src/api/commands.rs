use clap::{Parser, Subcommand};

use crate::models::query::{FileType, Logical, Operator};

/// 交互命令的一行输入；过滤子句按 1 起始的位置引用
#[derive(Debug, Parser)]
#[command(multicall = true)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch and list the tables offered by the backend
    Tables,
    /// Select a table (clears selected columns and filters)
    Use { table: String },
    /// Choose the projected columns; no names means all columns
    Columns { names: Vec<String> },
    /// Append an empty filter
    Add,
    /// Remove a filter
    Remove { position: usize },
    /// Set the column a filter applies to
    Column { position: usize, name: String },
    /// Set a filter's operator (=, !=, >, >=, <, <=, startswith, endswith, contains, between)
    Op { position: usize, operator: Operator },
    /// Set a scalar filter value, taken verbatim from the rest of the line
    /// (wrap it in quotes to keep leading spaces); omit it to empty the value
    Value {
        position: usize,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "TEXT")]
        words: Vec<String>,
        #[arg(skip)]
        text: String,
    },
    /// Set one side (0 or 1) of a between filter, verbatim like `value`
    Range {
        position: usize,
        index: usize,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "TEXT")]
        words: Vec<String>,
        #[arg(skip)]
        text: String,
    },
    /// Set the connective joining a filter to the previous one
    Logic { position: usize, logical: Logical },
    /// Show the current filters
    Filters,
    /// Show the operators available to a filter
    Operators { position: usize },
    /// Show the request that would be sent
    Request,
    /// Run the query and show the preview rows
    Preview,
    /// Export the query result as csv or xlsx
    Download { file_type: FileType },
    /// Remove every filter
    Clear,
    /// Leave the builder
    #[command(alias = "exit")]
    Quit,
}

impl CommandLine {
    /// clap 只负责校验位置参数；值取该行剩余的原始文本，不经分词
    pub fn parse_line(line: &str) -> Result<Self, clap::Error> {
        let mut parsed = Self::try_parse_from(line.split_whitespace())?;
        match &mut parsed.command {
            Command::Value { text, .. } => *text = raw_tail(line, 2),
            Command::Range { text, .. } => *text = raw_tail(line, 3),
            _ => {}
        }
        Ok(parsed)
    }
}

/// 跳过前 `skip` 个词及其后的分隔空白，余下部分原样返回；整体被一对引号包住时去掉引号
fn raw_tail(line: &str, skip: usize) -> String {
    let mut rest = line.trim_start();
    for _ in 0..skip {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        rest = rest[end..].trim_start();
    }
    unquote(rest).to_string()
}

fn unquote(s: &str) -> &str {
    for q in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}
