//! Writing skill: outlines, whitespace polish, word counts.

use crate::skills::analysis::truncate_at_boundary;

/// Build a section outline from the topic and key points.
pub fn build_outline(topic: &str, key_points: &[String]) -> Vec<String> {
    let mut outline = vec![format!("Introduction to {topic}")];
    outline.extend(
        key_points
            .iter()
            .take(4)
            .map(|point| format!("Key Aspect: {}", truncate_at_boundary(point, 50))),
    );
    outline.push("Implications and Future Outlook".to_string());
    outline.push("Conclusion".to_string());
    outline
}

/// Normalize whitespace without disturbing markdown structure: trailing
/// spaces removed per line, runs of blank lines collapsed to one.
pub fn polish(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0usize;

    for line in text.lines() {
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(trimmed);
        out.push('\n');
    }

    out.trim_end().to_string()
}

/// Whitespace-delimited word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_brackets_key_points_with_intro_and_conclusion() {
        let points = vec!["Storage costs fell".to_string(), "Grids modernized".to_string()];
        let outline = build_outline("renewable energy", &points);
        assert_eq!(outline.first().unwrap(), "Introduction to renewable energy");
        assert_eq!(outline.last().unwrap(), "Conclusion");
        // intro + two key aspects + outlook + conclusion
        assert_eq!(outline.len(), 5);
    }

    #[test]
    fn polish_collapses_blank_runs_but_keeps_headings() {
        let messy = "# Title  \n\n\n\nBody text here.   \n\n\nMore body.";
        let clean = polish(messy);
        assert!(clean.contains("# Title\n\nBody text here."));
        assert!(!clean.contains("\n\n\n"));
    }

    #[test]
    fn word_count_ignores_extra_whitespace() {
        assert_eq!(word_count("  one   two\nthree  "), 3);
    }
}
