//! Paragraph chunking of source texts

/// Split on blank lines, trimming each paragraph and dropping empty ones.
/// Windows line endings are normalised first so CRLF files chunk the same.
pub fn split_paragraphs(text: &str) -> Vec<String> {
  text
    .replace("\r\n", "\n")
    .split("\n\n")
    .map(str::trim)
    .filter(|chunk| !chunk.is_empty())
    .map(str::to_string)
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_splits_on_blank_lines() {
    assert_eq!(split_paragraphs("Para A\n\nPara B"), vec!["Para A", "Para B"]);
    assert_eq!(split_paragraphs("  one\nline two \n\n\n\nthree\n"), vec!["one\nline two", "three"]);
  }

  #[test]
  fn test_crlf_matches_lf() {
    assert_eq!(split_paragraphs("Para A\r\n\r\nPara B\r\n"), split_paragraphs("Para A\n\nPara B\n"));
  }

  #[test]
  fn test_blank_text_has_no_chunks() {
    assert!(split_paragraphs("").is_empty());
    assert!(split_paragraphs(" \n\n\t\n\n ").is_empty());
  }
}
