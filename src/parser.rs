use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::block::{Block, Inline, List, ListItem, ListKind};
use crate::error::{Result, TranslateError};

/// Parse markdown text into a list of blocks
pub fn parse(markdown: &str) -> Result<Vec<Block>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    let parser = Parser::new_ext(markdown, options);
    let mut blocks = Vec::new();
    let mut state = ParseState::default();

    for (event, range) in parser.into_offset_iter() {
        process_event(event, range, markdown, &mut state, &mut blocks)?;
    }

    Ok(blocks)
}

#[derive(Default)]
struct ParseState {
    // Current inline content being built
    inlines: Vec<Inline>,
    // Nested inline buffers for open emphasis/link containers
    inline_stack: Vec<Vec<Inline>>,
    // Destination url and image flag for each open link
    link_stack: Vec<(String, bool)>,

    // Current heading level (if in a heading)
    heading_level: Option<u8>,

    // Code block state
    in_code_block: bool,
    code_fenced: bool,
    code_content: String,

    // List state
    list_stack: Vec<ListBuilder>,

    // Table state
    table: Option<TableBuilder>,
}

struct ListBuilder {
    start: Option<u64>,
    bullet: Option<char>,
    items: Vec<ListItem>,
    // Blocks of the item currently being built
    current: Option<Vec<Block>>,
}

#[derive(Default)]
struct TableBuilder {
    header: Vec<Vec<Block>>,
    rows: Vec<Vec<Vec<Block>>>,
    current_row: Vec<Vec<Block>>,
    in_head: bool,
}

impl ParseState {
    /// Route a finished block into the innermost open list item, or to the
    /// top level when no list is open
    fn push_block(&mut self, block: Block, blocks: &mut Vec<Block>) {
        if let Some(list) = self.list_stack.last_mut() {
            if let Some(item) = list.current.as_mut() {
                item.push(block);
                return;
            }
        }
        blocks.push(block);
    }

    // Tight list items carry their text as bare inline events; gather any
    // pending inlines into the item's lead paragraph before a nested block
    // starts and when the item ends
    fn flush_inlines(&mut self, blocks: &mut Vec<Block>) {
        if !self.inlines.is_empty() {
            let content = std::mem::take(&mut self.inlines);
            self.push_block(Block::Paragraph { content }, blocks);
        }
    }
}

fn process_event(
    event: Event,
    range: Range<usize>,
    source: &str,
    state: &mut ParseState,
    blocks: &mut Vec<Block>,
) -> Result<()> {
    match event {
        // Headings
        Event::Start(Tag::Heading { level, .. }) => {
            state.flush_inlines(blocks);
            state.heading_level = Some(heading_level_to_u8(level));
        }
        Event::End(TagEnd::Heading(_)) => {
            if let Some(level) = state.heading_level.take() {
                let content = std::mem::take(&mut state.inlines);
                state.push_block(Block::Heading { level, content }, blocks);
            }
        }

        // Paragraphs
        Event::Start(Tag::Paragraph) => {}
        Event::End(TagEnd::Paragraph) => {
            let content = std::mem::take(&mut state.inlines);
            if !content.is_empty() {
                state.push_block(Block::Paragraph { content }, blocks);
            }
        }

        // Text content
        Event::Text(text) => {
            if state.in_code_block {
                state.code_content.push_str(&text);
            } else {
                state.inlines.push(Inline::Text(text.into_string()));
            }
        }

        // Inline code
        Event::Code(code) => {
            state.inlines.push(Inline::Code(code.into_string()));
        }

        // Emphasis; bold and italic are not told apart downstream
        Event::Start(Tag::Strong) | Event::Start(Tag::Emphasis) => {
            state.inline_stack.push(std::mem::take(&mut state.inlines));
        }
        Event::End(TagEnd::Strong) | Event::End(TagEnd::Emphasis) => {
            let content = std::mem::take(&mut state.inlines);
            if let Some(mut parent) = state.inline_stack.pop() {
                parent.push(Inline::Emphasis(content));
                state.inlines = parent;
            }
        }

        // Links and images
        Event::Start(Tag::Link { dest_url, .. }) => {
            state.link_stack.push((dest_url.into_string(), false));
            state.inline_stack.push(std::mem::take(&mut state.inlines));
        }
        Event::Start(Tag::Image { dest_url, .. }) => {
            state.link_stack.push((dest_url.into_string(), true));
            state.inline_stack.push(std::mem::take(&mut state.inlines));
        }
        Event::End(TagEnd::Link) | Event::End(TagEnd::Image) => {
            let content = std::mem::take(&mut state.inlines);
            if let Some(mut parent) = state.inline_stack.pop() {
                if let Some((url, image)) = state.link_stack.pop() {
                    parent.push(Inline::Link {
                        url,
                        image,
                        content,
                    });
                }
                state.inlines = parent;
            }
        }

        // Code blocks
        Event::Start(Tag::CodeBlock(kind)) => {
            state.flush_inlines(blocks);
            state.in_code_block = true;
            state.code_fenced = matches!(kind, CodeBlockKind::Fenced(_));
            state.code_content.clear();
        }
        Event::End(TagEnd::CodeBlock) => {
            state.in_code_block = false;
            let content = std::mem::take(&mut state.code_content);
            let fenced = state.code_fenced;
            state.push_block(Block::CodeBlock { fenced, content }, blocks);
        }

        // Lists
        Event::Start(Tag::List(start)) => {
            state.flush_inlines(blocks);
            state.list_stack.push(ListBuilder {
                start,
                bullet: None,
                items: Vec::new(),
                current: None,
            });
        }
        Event::End(TagEnd::List(_)) => {
            if let Some(list_builder) = state.list_stack.pop() {
                let kind = match list_builder.start {
                    Some(n) => ListKind::Ordered(n),
                    None => ListKind::Bullet(list_builder.bullet.unwrap_or('-')),
                };
                let list = List {
                    kind,
                    items: list_builder.items,
                };
                state.push_block(Block::List(list), blocks);
            }
        }

        Event::Start(Tag::Item) => {
            if let Some(list) = state.list_stack.last_mut() {
                if list.start.is_none() && list.bullet.is_none() {
                    // The event stream drops the marker; read it back from
                    // the source at the item's offset
                    list.bullet = source[range.start..]
                        .chars()
                        .find(|c| !matches!(c, ' ' | '\t'))
                        .filter(|c| matches!(c, '-' | '*' | '+'));
                }
                list.current = Some(Vec::new());
            }
        }
        Event::End(TagEnd::Item) => {
            state.flush_inlines(blocks);
            if let Some(list) = state.list_stack.last_mut() {
                if let Some(item_blocks) = list.current.take() {
                    list.items.push(ListItem {
                        blocks: item_blocks,
                    });
                }
            }
        }

        // Tables
        Event::Start(Tag::Table(_)) => {
            state.flush_inlines(blocks);
            state.table = Some(TableBuilder::default());
        }
        Event::End(TagEnd::Table) => {
            if let Some(table) = state.table.take() {
                state.push_block(
                    Block::Table {
                        header: table.header,
                        rows: table.rows,
                    },
                    blocks,
                );
            }
        }

        Event::Start(Tag::TableHead) => {
            if let Some(table) = state.table.as_mut() {
                table.in_head = true;
                table.current_row.clear();
            }
        }
        Event::End(TagEnd::TableHead) => {
            if let Some(table) = state.table.as_mut() {
                table.in_head = false;
                table.header = std::mem::take(&mut table.current_row);
            }
        }

        Event::Start(Tag::TableRow) => {
            if let Some(table) = state.table.as_mut() {
                table.current_row.clear();
            }
        }
        Event::End(TagEnd::TableRow) => {
            if let Some(table) = state.table.as_mut() {
                if !table.in_head {
                    let row = std::mem::take(&mut table.current_row);
                    table.rows.push(row);
                }
            }
        }

        Event::Start(Tag::TableCell) => {
            state.inlines.clear();
        }
        Event::End(TagEnd::TableCell) => {
            let content = std::mem::take(&mut state.inlines);
            if let Some(table) = state.table.as_mut() {
                let cell = if content.is_empty() {
                    Vec::new()
                } else {
                    vec![Block::Paragraph { content }]
                };
                table.current_row.push(cell);
            }
        }

        // Soft/hard breaks both surface as line breaks; they contribute no
        // text when the run is collected for translation
        Event::SoftBreak | Event::HardBreak => {
            state.inlines.push(Inline::LineBreak);
        }

        // Everything else is input we refuse rather than mangle
        Event::Start(tag) => {
            return Err(TranslateError::UnsupportedConstruct(tag_name(&tag)));
        }
        Event::End(_) => {}
        other => {
            return Err(TranslateError::UnsupportedConstruct(event_name(&other)));
        }
    }

    Ok(())
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn tag_name(tag: &Tag) -> String {
    match tag {
        Tag::BlockQuote(_) => "block quote".to_string(),
        Tag::HtmlBlock => "HTML block".to_string(),
        Tag::FootnoteDefinition(_) => "footnote definition".to_string(),
        other => format!("{:?}", other),
    }
}

fn event_name(event: &Event) -> String {
    match event {
        Event::Rule => "thematic break".to_string(),
        Event::Html(_) => "HTML block".to_string(),
        Event::InlineHtml(_) => "inline HTML".to_string(),
        Event::FootnoteReference(_) => "footnote reference".to_string(),
        Event::TaskListMarker(_) => "task list marker".to_string(),
        other => format!("{:?}", other),
    }
}
