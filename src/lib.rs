mod block;
mod config;
mod error;
mod inline;
mod parser;
mod render;
mod translator;

pub use block::{Block, Inline, List, ListItem, ListKind};
pub use config::{Config, TranslatorConfig};
pub use error::{Result, TranslateError};
pub use translator::{Translate, TranslatorClient};

/// Parse markdown text into a vector of blocks.
pub fn parse(markdown: &str) -> Result<Vec<Block>> {
    parser::parse(markdown)
}

/// Translate a markdown document while preserving its structure.
///
/// Blocks are rendered in document order with one blank line between
/// consecutive blocks. Any failure aborts the whole document, so no
/// partial output is ever produced.
pub fn translate_markdown(markdown: &str, translator: &dyn Translate) -> Result<String> {
    let blocks = parse(markdown)?;
    let mut out = String::new();
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&render::render_block(block, 0, translator)?);
    }
    Ok(out)
}
