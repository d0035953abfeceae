use crate::block::{Block, Inline, List, ListKind};
use crate::error::{Result, TranslateError};
use crate::inline;
use crate::translator::Translate;

/// Render one block as markdown at the given nesting depth. The result
/// always ends with a newline.
pub fn render_block(block: &Block, nest: usize, translator: &dyn Translate) -> Result<String> {
    match block {
        Block::Heading { level, content } => {
            let mut out = indent(nest);
            for _ in 0..*level {
                out.push('#');
            }
            out.push(' ');
            out.push_str(&inline_text(content, translator)?);
            out.push('\n');
            Ok(out)
        }
        Block::Paragraph { content } => {
            let mut out = indent(nest);
            out.push_str(&inline_text(content, translator)?);
            out.push('\n');
            Ok(out)
        }
        Block::List(list) => render_list(list, nest, translator),
        Block::CodeBlock { fenced, content } => Ok(render_code(*fenced, content, nest)),
        Block::Table { header, rows } => render_table(header, rows, nest, translator),
    }
}

fn indent(nest: usize) -> String {
    "    ".repeat(nest)
}

/// Collect an inline run and either translate it or pass it through
/// verbatim, as the collector decided
fn inline_text(content: &[Inline], translator: &dyn Translate) -> Result<String> {
    let (text, translate) = inline::collect(content)?;
    if translate {
        translator.translate(&text)
    } else {
        Ok(text)
    }
}

fn render_list(list: &List, nest: usize, translator: &dyn Translate) -> Result<String> {
    let pad = indent(nest);
    let mut out = String::new();
    let mut ordinal = match list.kind {
        ListKind::Ordered(start) => start,
        ListKind::Bullet(_) => 0,
    };

    for item in &list.items {
        // An item with no content contributes nothing and takes no number
        let (lead, rest) = match item.blocks.split_first() {
            Some(parts) => parts,
            None => continue,
        };
        let content = match lead {
            Block::Paragraph { content } => content,
            _ => {
                return Err(TranslateError::UnsupportedConstruct(
                    "list item that does not start with a paragraph".to_string(),
                ));
            }
        };

        let marker = match list.kind {
            ListKind::Ordered(_) => {
                let marker = format!("{}.", ordinal);
                ordinal += 1;
                marker
            }
            ListKind::Bullet(bullet) => bullet.to_string(),
        };
        out.push_str(&pad);
        out.push_str(&marker);
        out.push(' ');
        out.push_str(&inline_text(content, translator)?);
        out.push('\n');
        out.push('\n');

        // Any further blocks in the item sit one level deeper
        for child in rest {
            out.push_str(&render_block(child, nest + 1, translator)?);
            out.push('\n');
        }
    }

    Ok(out)
}

fn render_code(fenced: bool, content: &str, nest: usize) -> String {
    let pad = indent(nest);
    let mut out = String::new();

    if fenced {
        // Four backticks so embedded ``` fences stay inert
        out.push_str(&pad);
        out.push_str("````\n");
    }
    // Un-fenced blocks keep their four-space code indent so the block
    // survives a re-parse
    let line_pad = if fenced {
        pad.clone()
    } else {
        format!("{}    ", pad)
    };
    for line in content.lines() {
        out.push_str(&line_pad);
        out.push_str(line);
        out.push('\n');
    }
    if fenced {
        out.push_str(&pad);
        out.push_str("````\n");
    }

    out
}

fn render_table(
    header: &[Vec<Block>],
    rows: &[Vec<Vec<Block>>],
    nest: usize,
    translator: &dyn Translate,
) -> Result<String> {
    let pad = indent(nest);
    let mut out = String::new();

    out.push_str(&table_row(header, &pad, translator)?);

    // The separator row is synthesized, one dash group per header cell
    let dashes: Vec<&str> = header.iter().map(|_| "--------").collect();
    out.push_str(&format!("{}| {} |\n", pad, dashes.join(" | ")));

    for row in rows {
        out.push_str(&table_row(row, &pad, translator)?);
    }

    Ok(out)
}

fn table_row(cells: &[Vec<Block>], pad: &str, translator: &dyn Translate) -> Result<String> {
    let mut rendered = Vec::with_capacity(cells.len());
    for cell in cells {
        let mut text = String::new();
        for block in cell {
            match block {
                Block::Paragraph { content } => text.push_str(&inline_text(content, translator)?),
                _ => {
                    return Err(TranslateError::UnsupportedConstruct(
                        "non-paragraph content in a table cell".to_string(),
                    ));
                }
            }
        }
        rendered.push(text);
    }
    Ok(format!("{}| {} |\n", pad, rendered.join(" | ")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::render_block;
    use crate::block::{Block, Inline, List, ListItem, ListKind};
    use crate::error::{Result, TranslateError};
    use crate::translate_markdown;
    use crate::translator::Translate;

    struct Stub {
        map: HashMap<&'static str, &'static str>,
    }

    impl Stub {
        fn new(pairs: &[(&'static str, &'static str)]) -> Self {
            Self {
                map: pairs.iter().copied().collect(),
            }
        }

        fn identity() -> Self {
            Self {
                map: HashMap::new(),
            }
        }
    }

    impl Translate for Stub {
        fn translate(&self, text: &str) -> Result<String> {
            Ok(self.map.get(text).copied().unwrap_or(text).to_string())
        }
    }

    struct Failing;

    impl Translate for Failing {
        fn translate(&self, _text: &str) -> Result<String> {
            Err(TranslateError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            })
        }
    }

    #[test]
    fn heading_and_paragraph() {
        let stub = Stub::new(&[
            ("こんにちは", "Hello"),
            ("これはテストです。", "This is a test."),
        ]);
        assert_eq!(
            translate_markdown("# こんにちは\n\nこれはテストです。\n", &stub).unwrap(),
            "# Hello\n\nThis is a test.\n"
        );
    }

    #[test]
    fn heading_keeps_its_level() {
        let stub = Stub::new(&[("三", "Three")]);
        assert_eq!(translate_markdown("### 三\n", &stub).unwrap(), "### Three\n");
    }

    #[test]
    fn sole_link_paragraph_is_untranslated() {
        // The translator must not even be called for this document
        assert_eq!(
            translate_markdown("[リンク](http://example.com)\n", &Failing).unwrap(),
            "[リンク](http://example.com)\n"
        );
    }

    #[test]
    fn sole_image_paragraph_is_untranslated() {
        assert_eq!(
            translate_markdown("![代替](img.png)\n", &Failing).unwrap(),
            "![代替](img.png)\n"
        );
    }

    #[test]
    fn sole_code_span_keeps_its_content() {
        assert_eq!(
            translate_markdown("`let x = 1;`\n", &Failing).unwrap(),
            "let x = 1;\n"
        );
    }

    #[test]
    fn unordered_list() {
        let stub = Stub::new(&[("一", "One"), ("二", "Two")]);
        assert_eq!(
            translate_markdown("- 一\n- 二\n", &stub).unwrap(),
            "- One\n\n- Two\n\n"
        );
    }

    #[test]
    fn star_bullets_are_reused() {
        assert_eq!(
            translate_markdown("* a\n* b\n", &Stub::identity()).unwrap(),
            "* a\n\n* b\n\n"
        );
    }

    #[test]
    fn ordered_list_renumbers_from_its_start() {
        let stub = Stub::new(&[("一", "One"), ("二", "Two"), ("三", "Three")]);
        assert_eq!(
            translate_markdown("3. 一\n7. 二\n9. 三\n", &stub).unwrap(),
            "3. One\n\n4. Two\n\n5. Three\n\n"
        );
    }

    #[test]
    fn empty_items_are_skipped_and_take_no_number() {
        let list = Block::List(List {
            kind: ListKind::Ordered(1),
            items: vec![
                ListItem {
                    blocks: vec![Block::Paragraph {
                        content: vec![Inline::Text("a".to_string())],
                    }],
                },
                ListItem { blocks: vec![] },
                ListItem {
                    blocks: vec![Block::Paragraph {
                        content: vec![Inline::Text("c".to_string())],
                    }],
                },
            ],
        });
        assert_eq!(
            render_block(&list, 0, &Stub::identity()).unwrap(),
            "1. a\n\n2. c\n\n"
        );
    }

    #[test]
    fn nested_list_is_indented_four_more_spaces() {
        assert_eq!(
            translate_markdown("- parent\n  - child\n", &Stub::identity()).unwrap(),
            "- parent\n\n    - child\n\n\n"
        );
    }

    #[test]
    fn item_with_a_second_paragraph() {
        assert_eq!(
            translate_markdown("- lead\n\n  body\n", &Stub::identity()).unwrap(),
            "- lead\n\n    body\n\n"
        );
    }

    #[test]
    fn item_must_start_with_a_paragraph() {
        let list = Block::List(List {
            kind: ListKind::Bullet('-'),
            items: vec![ListItem {
                blocks: vec![Block::CodeBlock {
                    fenced: true,
                    content: "x\n".to_string(),
                }],
            }],
        });
        assert!(render_block(&list, 0, &Stub::identity()).is_err());
    }

    #[test]
    fn fenced_code_is_rewrapped_and_never_translated() {
        assert_eq!(
            translate_markdown("```rust\nlet x = 1;\n```\n", &Failing).unwrap(),
            "````\nlet x = 1;\n````\n"
        );
    }

    #[test]
    fn indented_code_keeps_its_indent() {
        assert_eq!(
            translate_markdown("    let x = 1;\n", &Failing).unwrap(),
            "    let x = 1;\n"
        );
    }

    #[test]
    fn code_in_a_list_item_is_indented_one_level_deeper() {
        let list = Block::List(List {
            kind: ListKind::Bullet('-'),
            items: vec![ListItem {
                blocks: vec![
                    Block::Paragraph {
                        content: vec![Inline::Text("lead".to_string())],
                    },
                    Block::CodeBlock {
                        fenced: true,
                        content: "x = 1\n".to_string(),
                    },
                ],
            }],
        });
        assert_eq!(
            render_block(&list, 0, &Stub::identity()).unwrap(),
            "- lead\n\n    ````\n    x = 1\n    ````\n\n"
        );
    }

    #[test]
    fn table_gets_a_synthesized_separator() {
        let stub = Stub::new(&[
            ("見出し", "Head"),
            ("値", "Value"),
            ("一", "One"),
            ("二", "Two"),
        ]);
        assert_eq!(
            translate_markdown("| 見出し | 値 |\n| --- | --- |\n| 一 | 二 |\n", &stub).unwrap(),
            "| Head | Value |\n| -------- | -------- |\n| One | Two |\n"
        );
    }

    #[test]
    fn document_order_and_separation_are_preserved() {
        assert_eq!(
            translate_markdown("# Title\n\ntext\n\n- a\n- b\n", &Stub::identity()).unwrap(),
            "# Title\n\ntext\n\n- a\n\n- b\n\n"
        );
    }

    #[test]
    fn hard_breaks_join_the_run_before_translation() {
        let stub = Stub::new(&[("一二", "One Two")]);
        assert_eq!(
            translate_markdown("一  \n二\n", &stub).unwrap(),
            "One Two\n"
        );
    }

    #[test]
    fn failing_translation_aborts_the_whole_document() {
        let err = translate_markdown("fine\n\nこんにちは\n", &Failing).unwrap_err();
        match err {
            TranslateError::Api { status, .. } => assert_eq!(status, 503),
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn emphasised_link_label_aborts() {
        assert!(translate_markdown("[**bold**](http://example.com)\n", &Stub::identity()).is_err());
    }
}
