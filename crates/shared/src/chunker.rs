use crate::models::Chunk;

pub const DEFAULT_CHUNK_WIDTH: usize = 2000;

/// Split text into whitespace-aligned chunks of at most `max_width`
/// characters. Words are never split mid-token; a single word longer than
/// `max_width` becomes its own over-width chunk. Concatenating the chunks
/// in index order reproduces the input up to whitespace normalization.
pub fn chunk_text(text: &str, max_width: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            chunks.push(Chunk {
                index: chunks.len(),
                text: std::mem::take(&mut current),
            });
            current.push_str(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        chunks.push(Chunk {
            index: chunks.len(),
            text: current,
        });
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn joined(chunks: &[Chunk]) -> String {
        chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_round_trip_up_to_whitespace() {
        let inputs = [
            "one two three four five",
            "spread\nacross\n\nlines\tand tabs",
            "  leading and trailing   ",
            "a b c d e f g h i j k l m n o p",
        ];
        for text in inputs {
            for width in [4, 10, 2000] {
                let chunks = chunk_text(text, width);
                assert_eq!(joined(&chunks), normalized(text), "width {width}");
            }
        }
    }

    #[test]
    fn test_chunks_respect_width() {
        let text = "alpha beta gamma delta epsilon zeta eta theta";
        let chunks = chunk_text(text, 12);
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 12, "{:?}", chunk.text);
        }
    }

    #[test]
    fn test_indices_are_ordered() {
        let chunks = chunk_text("a b c d e f", 3);
        let indices: Vec<usize> = chunks.iter().map(|c| c.index).collect();
        assert_eq!(indices, (0..chunks.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunks = chunk_text("well under the limit", 2000);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "well under the limit");
        assert_eq!(chunks[0].index, 0);
    }

    #[test]
    fn test_empty_and_blank_text_produce_no_chunks() {
        assert!(chunk_text("", 2000).is_empty());
        assert!(chunk_text("   \n\t  ", 2000).is_empty());
    }

    #[test]
    fn test_unbreakable_token_exceeds_width_alone() {
        let chunks = chunk_text("ok supercalifragilistic ok", 5);
        assert_eq!(
            chunks.iter().map(|c| c.text.as_str()).collect::<Vec<_>>(),
            vec!["ok", "supercalifragilistic", "ok"],
        );
    }

    #[test]
    fn test_two_chunk_split_at_word_boundary() {
        let chunks = chunk_text("AAA BBB CCC", 7);
        assert_eq!(
            chunks.iter().map(|c| c.text.as_str()).collect::<Vec<_>>(),
            vec!["AAA BBB", "CCC"],
        );
    }

    #[test]
    fn test_width_counts_characters_not_bytes() {
        // Four 2-byte characters per word; three words fit in 11 chars.
        let chunks = chunk_text("øøøø øøøø øøøø øøøø", 14);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "øøøø øøøø øøøø");
        assert_eq!(chunks[1].text, "øøøø");
    }
}
