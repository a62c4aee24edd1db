//! Keyword rules mapping free text onto a [`Category`].

use crate::domain::types::Category;

const PRODUCT_KEYWORDS: [&str; 2] = ["launch", "product"];
const TEAM_KEYWORDS: [&str; 2] = ["hiring", "team"];

/// Classify `text` by keyword. Product keywords win over team keywords.
pub fn classify_keywords(text: &str) -> Category {
    let normalized = text.to_lowercase();
    let mentions = |keywords: &[&str]| keywords.iter().any(|word| normalized.contains(word));

    if mentions(&PRODUCT_KEYWORDS) {
        Category::Product
    } else if mentions(&TEAM_KEYWORDS) {
        Category::Team
    } else {
        Category::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_keywords() {
        assert_eq!(classify_keywords("We LAUNCHED v2"), Category::Product);
        assert_eq!(classify_keywords("new product line"), Category::Product);
    }

    #[test]
    fn team_keywords() {
        assert_eq!(classify_keywords("We're Hiring!"), Category::Team);
        assert_eq!(classify_keywords("Join our growing team"), Category::Team);
    }

    #[test]
    fn product_rule_is_checked_first() {
        assert_eq!(
            classify_keywords("The product team is hiring"),
            Category::Product
        );
    }

    #[test]
    fn everything_else_is_other() {
        assert_eq!(classify_keywords("Notes from the weekend"), Category::Other);
        assert_eq!(classify_keywords(""), Category::Other);
    }

    #[test]
    fn keywords_match_inside_words() {
        assert_eq!(classify_keywords("relaunching the blog"), Category::Product);
        assert_eq!(classify_keywords("teamwork"), Category::Team);
    }
}
