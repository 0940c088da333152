use regex::Regex;
use std::sync::LazyLock;

/// Characters kept before the extension, everything past this is cut off.
pub const MAX_TITLE_LEN: usize = 125;

/// The sanitizer output when nothing usable survives: bare extension.
pub const EMPTY_TITLE: &str = ".pdf";

static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("Failed to compile filename regex"));

/// Turn a raw title candidate into a safe `Some_Title_Like_This.pdf` filename.
///
/// Runs of anything outside `[A-Za-z0-9]` collapse to a single word break,
/// each word is capitalized, words are joined with underscores. Input that
/// sanitizes to nothing yields [`EMPTY_TITLE`], which callers treat as
/// "no usable title".
pub fn sanitize_title(raw: &str, max_len: usize) -> String {
    let truncated: String = raw.chars().take(max_len).collect();
    let spaced = NON_ALNUM.replace_all(&truncated, " ");
    let words: Vec<String> = spaced.split_whitespace().map(capitalize).collect();
    format!("{}.pdf", words.join("_"))
}

/// First character uppercased, the rest lowercased (capwords semantics).
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_title() {
        assert_eq!(
            sanitize_title("Benchmarking Personal Cloud Storage", MAX_TITLE_LEN),
            "Benchmarking_Personal_Cloud_Storage.pdf"
        );
    }

    #[test]
    fn test_punctuation_collapses() {
        let messy = r##"This is* what_2 ? 1 example_  of !@#$%^&*()_+=-[]\|}{'/?..><,``~~";}   How-to -  Describe - Find / : etc"##;
        let parsed = sanitize_title(messy, MAX_TITLE_LEN);
        assert_eq!(
            parsed,
            "This_Is_What_2_1_Example_Of_How_To_Describe_Find_Etc.pdf"
        );
    }

    #[test]
    fn test_casing_is_per_word() {
        assert_eq!(sanitize_title("sOME miXED case", MAX_TITLE_LEN), "Some_Mixed_Case.pdf");
    }

    #[test]
    fn test_output_shape() {
        let inputs = ["", "  ", "%%%", "日本語", "a-b-c", "UPPER lower 42"];
        let shape = Regex::new(r"^[A-Za-z0-9_]*\.pdf$").unwrap();
        for input in inputs {
            let out = sanitize_title(input, MAX_TITLE_LEN);
            assert!(shape.is_match(&out), "bad shape for {input:?}: {out}");
        }
    }

    #[test]
    fn test_empty_input_degenerates() {
        assert_eq!(sanitize_title("", MAX_TITLE_LEN), EMPTY_TITLE);
        assert_eq!(sanitize_title("?!*&", MAX_TITLE_LEN), EMPTY_TITLE);
    }

    #[test]
    fn test_truncation() {
        let long = "word ".repeat(60);
        let out = sanitize_title(&long, MAX_TITLE_LEN);
        // 125 chars of input survive, then word-joining; never longer than cap + extension
        assert!(out.len() <= MAX_TITLE_LEN + EMPTY_TITLE.len());
        assert!(out.starts_with("Word_Word"));
    }

    #[test]
    fn test_idempotent_on_sanitized() {
        let once = sanitize_title("Some Title", MAX_TITLE_LEN);
        assert_eq!(once, "Some_Title.pdf");
        let stem = once.strip_suffix(".pdf").unwrap();
        assert_eq!(sanitize_title(stem, MAX_TITLE_LEN), once);
    }
}
