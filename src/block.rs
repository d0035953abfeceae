/// Inline content within a paragraph, heading, or table cell
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    Emphasis(Vec<Inline>),
    Link {
        url: String,
        image: bool,
        content: Vec<Inline>,
    },
    Code(String),
    LineBreak,
}

/// A single list item; its children are full blocks, so an item can hold
/// several paragraphs, nested lists or code blocks
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub blocks: Vec<Block>,
}

/// Marker style of a list: the literal bullet character, or the starting
/// number of an ordered list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet(char),
    Ordered(u64),
}

/// A list (ordered or unordered)
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub kind: ListKind,
    pub items: Vec<ListItem>,
}

/// Block-level elements parsed from Markdown
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading {
        level: u8,
        content: Vec<Inline>,
    },
    Paragraph {
        content: Vec<Inline>,
    },
    CodeBlock {
        fenced: bool,
        content: String,
    },
    List(List),
    Table {
        // Cells are blocks (paragraphs), not bare inline runs
        header: Vec<Vec<Block>>,
        rows: Vec<Vec<Vec<Block>>>,
    },
}
