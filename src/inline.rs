use crate::block::Inline;
use crate::error::{Result, TranslateError};

/// Flatten an inline run into the text to submit for translation, plus a
/// flag saying whether translation should happen at all.
///
/// The flag defaults to true and is forced off only when the run's sole
/// child is a link or a code span; such a run carries its meaning in the
/// markup, so its original content is emitted verbatim instead.
pub fn collect(inlines: &[Inline]) -> Result<(String, bool)> {
    let sole_child = inlines.len() == 1;
    let mut text = String::new();
    let mut translate = true;

    for inline in inlines {
        match inline {
            Inline::Text(s) => text.push_str(s),
            Inline::Emphasis(children) => {
                // Emphasis markers are dropped and not reapplied on output
                text.push_str(&emphasis_text(children)?);
            }
            Inline::Link {
                url,
                image,
                content,
            } => {
                let label = link_text(content)?;
                if sole_child {
                    if *image {
                        text.push('!');
                    }
                    text.push_str(&format!("[{}]({})", label, url));
                    translate = false;
                } else {
                    text.push_str(&label);
                }
            }
            Inline::Code(s) => {
                text.push_str(s);
                if sole_child {
                    translate = false;
                }
            }
            Inline::LineBreak => {}
        }
    }

    Ok((text, translate))
}

fn emphasis_text(children: &[Inline]) -> Result<String> {
    let mut text = String::new();
    for child in children {
        match child {
            Inline::Text(s) => text.push_str(s),
            Inline::Emphasis(inner) => text.push_str(&emphasis_text(inner)?),
            // A link nested in emphasis contributes no text
            Inline::Link { .. } => {}
            other => {
                return Err(TranslateError::UnsupportedConstruct(format!(
                    "{} inside emphasis",
                    kind_name(other)
                )));
            }
        }
    }
    Ok(text)
}

fn link_text(children: &[Inline]) -> Result<String> {
    let mut text = String::new();
    for child in children {
        match child {
            Inline::Text(s) => text.push_str(s),
            other => {
                return Err(TranslateError::UnsupportedConstruct(format!(
                    "{} inside link text",
                    kind_name(other)
                )));
            }
        }
    }
    Ok(text)
}

fn kind_name(inline: &Inline) -> &'static str {
    match inline {
        Inline::Text(_) => "text",
        Inline::Emphasis(_) => "emphasis",
        Inline::Link { .. } => "link",
        Inline::Code(_) => "code span",
        Inline::LineBreak => "line break",
    }
}
