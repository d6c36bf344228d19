//! Reuters-21578 SGML extraction: one cleaned, lower-cased, whitespace-
//! tokenizable string per article.
//!
//! Tags are located by explicit scanning rather than regex captures, so a
//! block with a missing tag yields a `MalformedDocument` for that block only
//! instead of faulting the whole file.

use crate::error::Error;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^A-Za-z0-9_\s]").expect("valid regex");
    static ref DIGITS: Regex = Regex::new(r"\d+").expect("valid regex");
}

const ENTITIES: &[&str] = &["&lt;", "&gt;", "&ge;", "&le;", "&#127;", "&#3;", "&amp;", "&#;"];

/// Extract every article from one `.sgm` file, in file order. Malformed
/// blocks are skipped with a warning; they never abort the file.
pub fn extract_documents(sgml: &str) -> Vec<String> {
    let mut documents = Vec::new();
    let mut cursor = 0;
    while let Some(offset) = sgml[cursor..].find("<REUTERS") {
        let start = cursor + offset;
        let Some(end_offset) = sgml[start..].find("</REUTERS>") else {
            tracing::warn!("unterminated REUTERS block, discarding file tail");
            break;
        };
        let block = &sgml[start..start + end_offset];
        cursor = start + end_offset + "</REUTERS>".len();
        match extract_block(block) {
            Ok(text) => documents.push(text),
            Err(err) => tracing::warn!(%err, "skipping malformed document block"),
        }
    }
    documents
}

/// Extract the text of a single REUTERS block according to its TEXT type:
/// BRIEF articles carry only a TITLE, UNPROC articles carry an unprocessed
/// `&#2;...&#3;` payload, everything else has TITLE and BODY.
fn extract_block(block: &str) -> Result<String, Error> {
    let text_start = block
        .find("<TEXT")
        .ok_or_else(|| Error::malformed("missing <TEXT> tag"))?;
    let after_tag = &block[text_start..];
    let attrs_end = after_tag
        .find('>')
        .ok_or_else(|| Error::malformed("unclosed <TEXT> tag"))?;
    let attrs = &after_tag[..attrs_end];
    let inner = after_tag
        .get(attrs_end + 1..)
        .and_then(|rest| rest.find("</TEXT>").map(|end| &rest[..end]))
        .ok_or_else(|| Error::malformed("missing </TEXT> tag"))?;

    let raw = if attrs.contains("TYPE=\"BRIEF\"") {
        span(inner, "<TITLE>", "</TITLE>")?.to_string()
    } else if attrs.contains("TYPE=\"UNPROC\"") {
        span(inner, "&#2;", "&#3;")?.to_string()
    } else {
        let title = span(inner, "<TITLE>", "</TITLE>")?;
        let body = span(inner, "<BODY>", "</BODY>")?;
        format!("{title} {body}")
    };
    Ok(clean(&raw))
}

fn span<'a>(haystack: &'a str, open: &str, close: &str) -> Result<&'a str, Error> {
    let start = haystack
        .find(open)
        .ok_or_else(|| Error::malformed(format!("missing {open} tag")))?;
    let rest = &haystack[start + open.len()..];
    let end = rest
        .find(close)
        .ok_or_else(|| Error::malformed(format!("missing {close} tag")))?;
    Ok(&rest[..end])
}

/// Entity replacement, then non-word characters and digit runs to spaces,
/// then lowercase and trim.
fn clean(raw: &str) -> String {
    let mut text = raw.to_string();
    for entity in ENTITIES {
        text = text.replace(entity, " ");
    }
    let text = NON_WORD.replace_all(&text, " ");
    let text = DIGITS.replace_all(&text, " ");
    text.to_lowercase().trim().to_string()
}
