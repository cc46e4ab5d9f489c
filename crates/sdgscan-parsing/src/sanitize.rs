/// Whether `c` is a control character that must not survive text extraction.
///
/// Covers C0 controls except tab, line feed and carriage return, plus DEL.
/// These break JSON encoders and report renderers downstream.
pub fn is_denylisted(c: char) -> bool {
    matches!(
        c,
        '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{7F}'
    )
}

/// Strip denylisted control characters from extracted PDF text.
///
/// Every other character (Unicode letters, punctuation, `\t`, `\n`, `\r`)
/// is kept in its original order.
pub fn sanitize(text: &str) -> String {
    text.chars().filter(|&c| !is_denylisted(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_denylisted() -> String {
        (0u32..=0x7F)
            .filter_map(char::from_u32)
            .filter(|&c| is_denylisted(c))
            .collect()
    }

    #[test]
    fn test_sanitize_empty() {
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_sanitize_keeps_layout_whitespace() {
        let text = "Line one\tcol\r\nLine two\n";
        assert_eq!(sanitize(text), text);
    }

    #[test]
    fn test_sanitize_removes_controls() {
        let text = "Ab\u{0}str\u{7}act\u{0B}\u{0C} body\u{1B}[0m\u{7F}.";
        assert_eq!(sanitize(text), "Abstract body[0m.");
    }

    #[test]
    fn test_sanitize_only_denylisted_yields_empty() {
        let text = all_denylisted();
        assert_eq!(text.chars().count(), 30);
        assert_eq!(sanitize(&text), "");
    }

    #[test]
    fn test_sanitize_preserves_unicode() {
        let text = "Résumé — Kata Kunci: pembangunan berkelanjutan, 持続可能性 \u{85}\u{A0}";
        assert_eq!(sanitize(text), text);
    }

    #[test]
    fn test_sanitize_idempotent() {
        let samples = [
            String::new(),
            all_denylisted(),
            "plain text".to_string(),
            format!("mixed{}\ncontent\u{1F}é", all_denylisted()),
        ];
        for s in &samples {
            let once = sanitize(s);
            assert_eq!(sanitize(&once), once);
            assert!(!once.chars().any(is_denylisted));
        }
    }

    #[test]
    fn test_is_denylisted_boundaries() {
        assert!(is_denylisted('\u{08}'));
        assert!(!is_denylisted('\t'));
        assert!(!is_denylisted('\n'));
        assert!(is_denylisted('\u{0B}'));
        assert!(is_denylisted('\u{0C}'));
        assert!(!is_denylisted('\r'));
        assert!(is_denylisted('\u{0E}'));
        assert!(is_denylisted('\u{1F}'));
        assert!(!is_denylisted(' '));
        assert!(is_denylisted('\u{7F}'));
        assert!(!is_denylisted('\u{80}'));
    }
}
