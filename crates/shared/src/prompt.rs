use sha2::{Digest, Sha256};

use crate::models::EnrichedItem;

/// Article text is shortened to this many characters for the prompt so token
/// usage stays bounded regardless of `ARTICLE_CHAR_LIMIT`.
const STORY_BODY_WIDTH: usize = 700;
const ELLIPSIS: char = '…';

/// Stable short identifier for a story: the first 16 hex characters of the
/// SHA-256 digest of the UTF-8 URL bytes. The model echoes it back so callers
/// can correlate output stories with inputs without title matching.
pub fn story_id(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(&hasher.finalize()[..8])
}

/// Whitespace-collapsing, word-boundary-aware shortening with an ellipsis
/// marker. The result never exceeds `width` characters and never ends in a
/// partial word.
pub fn shorten(text: &str, width: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= width {
        return collapsed;
    }

    let mut out = String::new();
    let mut used = 0usize;
    for word in collapsed.split(' ') {
        let word_len = word.chars().count();
        let sep = if out.is_empty() { 0 } else { 1 };
        // keep room for the ellipsis marker
        if used + sep + word_len + 1 > width {
            break;
        }
        if sep == 1 {
            out.push(' ');
        }
        out.push_str(word);
        used += sep + word_len;
    }
    out.push(ELLIPSIS);
    out
}

/// Render the single user prompt covering all selected stories. Pure and
/// deterministic: the same items and date always produce the same text.
pub fn build_prompt(items: &[EnrichedItem], date: &str) -> String {
    let mut story_blocks = Vec::with_capacity(items.len());
    for enriched in items {
        let item = &enriched.item;
        let body_short = shorten(&enriched.content, STORY_BODY_WIDTH);
        story_blocks.push(format!(
            "### STORY\n\
             Title: {}\n\
             Source: {}\n\
             URL: {}\n\
             ID: {}\n\
             Published: {}\n\
             Article:\n{}\n",
            item.title,
            item.source,
            item.url,
            story_id(&item.url),
            item.published_at,
            body_short,
        ));
    }

    format!(
        "DATE: {date}\n\n\
         You will produce a JSON object with the following structure:\n\
         {{\n  \
           \"date\": \"{date}\",\n  \
           \"executive_summary\": \"2-3 sentences summarizing the key AI developments today\",\n  \
           \"stories\": [\n    \
             {{\n      \
               \"id\": \"use the provided ID for each story\",\n      \
               \"title\": \"original title\",\n      \
               \"url\": \"original url\",\n      \
               \"published_at\": \"original published date\",\n      \
               \"source\": \"original source\",\n      \
               \"category\": \"one of: product/research/policy/culture/misc\",\n      \
               \"summary\": \"1-2 sentence summary of the story\",\n      \
               \"tags\": [\"up to 4 relevant tags\"]\n    \
             }}\n  \
           ]\n\
         }}\n\n\
         Stories:\n\n{stories}",
        date = date,
        stories = story_blocks.join("\n"),
    )
}
