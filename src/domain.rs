//! Topical domain definition and keyword admission filter
//!
//! [`DomainSpec`] is built once at startup from [`DomainConfig`] and shared
//! read-only by every session. [`DomainFilter`] decides whether a user turn
//! is in scope with a plain case-insensitive substring test. Matching on
//! substrings admits every mention of a topic at the cost of false
//! positives (for example, "varnost" in an unrelated sentence).

use crate::config::DomainConfig;

/// Case-insensitive keyword gate
///
/// Keywords are lowercased once on construction and otherwise kept as
/// written, surrounding spaces included. Empty entries are dropped.
///
/// # Examples
///
/// ```
/// use scopechat::domain::DomainFilter;
///
/// let filter = DomainFilter::new(["Pametni dom", "termostat"]);
/// assert!(filter.is_in_domain("Kaj je PAMETNI DOM?"));
/// assert!(!filter.is_in_domain("Kakšno je vreme jutri?"));
/// assert!(!filter.is_in_domain(""));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainFilter {
    keywords: Vec<String>,
}

impl DomainFilter {
    /// Create a filter from a keyword list
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    /// Returns `true` if any keyword occurs in `text`, ignoring case
    ///
    /// Total over all strings; empty input is never in domain.
    pub fn is_in_domain(&self, text: &str) -> bool {
        self.matched_keyword(text).is_some()
    }

    /// First keyword (in configured order) found in `text`
    pub fn matched_keyword(&self, text: &str) -> Option<&str> {
        if text.is_empty() {
            return None;
        }
        let normalized = text.to_lowercase();
        self.keywords
            .iter()
            .find(|k| normalized.contains(k.as_str()))
            .map(String::as_str)
    }

    /// Normalized keywords
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

/// Static, process-wide description of the assistant's domain
#[derive(Debug, Clone)]
pub struct DomainSpec {
    description: String,
    rules: String,
    refusal_message: String,
    filter: DomainFilter,
}

impl DomainSpec {
    /// Create a domain specification
    ///
    /// # Examples
    ///
    /// ```
    /// use scopechat::domain::DomainSpec;
    ///
    /// let domain = DomainSpec::new(
    ///     "Garden helper.",
    ///     "Answer briefly.",
    ///     ["tomato"],
    ///     "Only garden questions, please.",
    /// );
    /// assert!(domain.filter().is_in_domain("When do I plant a Tomato?"));
    /// ```
    pub fn new<I, S>(
        description: impl Into<String>,
        rules: impl Into<String>,
        keywords: I,
        refusal_message: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            description: description.into(),
            rules: rules.into(),
            refusal_message: refusal_message.into(),
            filter: DomainFilter::new(keywords),
        }
    }

    /// Build the domain specification from configuration
    pub fn from_config(config: &DomainConfig) -> Self {
        Self::new(
            config.description.trim(),
            config.rules.trim(),
            &config.keywords,
            config.refusal_message.as_str(),
        )
    }

    /// Domain description text
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Answering rules text
    pub fn rules(&self) -> &str {
        &self.rules
    }

    /// Reply given to out-of-domain questions
    pub fn refusal_message(&self) -> &str {
        &self.refusal_message
    }

    /// Keyword admission filter
    pub fn filter(&self) -> &DomainFilter {
        &self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_filter() -> DomainFilter {
        DomainFilter::new(&DomainConfig::default().keywords)
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let filter = default_filter();
        assert!(filter.is_in_domain("Kaj je pametni dom?"));
        assert!(filter.is_in_domain("KAJ JE PAMETNI DOM?"));
        assert!(filter.is_in_domain("Kako deluje TERMOSTAT"));
    }

    #[test]
    fn test_non_ascii_keywords_fold_case() {
        let filter = default_filter();
        assert!(filter.is_in_domain("PAMETNE ŽARNICE so super"));
        assert!(filter.is_in_domain("Kaj pomeni UČINKOVITOST?"));
    }

    #[test]
    fn test_unrelated_text_is_rejected() {
        let filter = default_filter();
        assert!(!filter.is_in_domain("Kakšno je vreme jutri?"));
        assert!(!filter.is_in_domain("Recept za potico"));
    }

    #[test]
    fn test_empty_text_is_rejected() {
        assert!(!default_filter().is_in_domain(""));
    }

    #[test]
    fn test_substring_match_is_permissive() {
        let filter = default_filter();
        // "varnost" triggers even in an unrelated sentence
        assert!(filter.is_in_domain("Varnost v prometu je pomembna"));
        // "ai" matches inside other words
        assert!(filter.is_in_domain("Thailand"));
    }

    #[test]
    fn test_matched_keyword_follows_configured_order() {
        let filter = DomainFilter::new(["dom", "pametni dom"]);
        assert_eq!(filter.matched_keyword("pametni dom"), Some("dom"));
        assert_eq!(filter.matched_keyword("nič"), None);
    }

    #[test]
    fn test_empty_keywords_are_dropped() {
        let filter = DomainFilter::new(["", "Chatbot"]);
        assert_eq!(filter.keywords(), &["chatbot".to_string()]);
        assert!(!filter.is_in_domain("   "));
    }

    #[test]
    fn test_keyword_surrounding_spaces_are_kept() {
        let filter = DomainFilter::new([" AI "]);
        assert_eq!(filter.keywords(), &[" ai ".to_string()]);
        assert!(!filter.is_in_domain("Thailand"));
        assert!(filter.is_in_domain("Kaj zmore AI danes?"));
    }

    #[test]
    fn test_empty_keyword_set_rejects_everything() {
        let filter = DomainFilter::new(Vec::<String>::new());
        assert!(!filter.is_in_domain("pametni dom"));
    }

    #[test]
    fn test_domain_spec_from_config_trims_text() {
        let config = DomainConfig {
            description: "\n  Desc  \n".to_string(),
            rules: "\nRules\n".to_string(),
            keywords: vec!["Tomato".to_string()],
            refusal_message: "No.".to_string(),
            fallback_message: "Later.".to_string(),
        };
        let spec = DomainSpec::from_config(&config);
        assert_eq!(spec.description(), "Desc");
        assert_eq!(spec.rules(), "Rules");
        assert_eq!(spec.refusal_message(), "No.");
        assert!(spec.filter().is_in_domain("tomato soup"));
    }
}
