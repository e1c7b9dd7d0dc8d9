use regex::Regex;
use lazy_static::lazy_static;
use sha2::{Sha256, Digest};
use base64::{Engine as _, engine::general_purpose};

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();
    static ref PH_MOBILE_REGEX: Regex = Regex::new(r"(?:\+63|\b0)9\d{2}[-\s]?\d{3}[-\s]?\d{4}\b").unwrap();
    static ref PHONE_REGEX: Regex = Regex::new(r"\b(?:\+1[-.\s]?)?\(?([0-9]{3})\)?[-.\s]?([0-9]{3})[-.\s]?([0-9]{4})\b").unwrap();
}

/// PII redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub enabled: bool,
    pub redact_emails: bool,
    pub redact_phones: bool,
    pub redact_names: bool,
    pub hash_for_correlation: bool,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            redact_emails: true,
            redact_phones: true,
            redact_names: true,
            hash_for_correlation: true,
        }
    }
}

/// PII redactor for log messages
///
/// Patient names cannot be detected by pattern, so callers register the
/// names that are in scope for the current operation.
#[derive(Debug, Clone)]
pub struct PiiRedactor {
    config: RedactionConfig,
    names: Vec<Regex>,
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config, names: Vec::new() }
    }

    /// Register a name that must never appear in clear text
    pub fn with_name(mut self, name: &str) -> Self {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return self;
        }
        if let Ok(pattern) = Regex::new(&name_pattern(trimmed)) {
            self.names.push(pattern);
        }
        self
    }

    pub fn redact(&self, text: &str) -> String {
        if !self.config.enabled {
            return text.to_string();
        }

        let mut result = text.to_string();

        if self.config.redact_names {
            for pattern in &self.names {
                result = pattern
                    .replace_all(&result, |caps: &regex::Captures| self.name_token(&caps[0]))
                    .to_string();
            }
        }

        if self.config.redact_emails {
            result = self.redact_emails(&result);
        }

        if self.config.redact_phones {
            result = self.redact_phones(&result);
        }

        result
    }

    /// Replacement token for a single name, usable as a structured log field
    pub fn redact_name(&self, name: &str) -> String {
        if !self.config.enabled || !self.config.redact_names {
            return name.to_string();
        }
        self.name_token(name.trim())
    }

    fn name_token(&self, name: &str) -> String {
        if self.config.hash_for_correlation {
            format!("PATIENT[{}]", self.hash_value(&name.to_lowercase()))
        } else {
            "PATIENT[***]".to_string()
        }
    }

    fn redact_emails(&self, text: &str) -> String {
        EMAIL_REGEX.replace_all(text, |caps: &regex::Captures| {
            let email = &caps[0];
            if self.config.hash_for_correlation {
                format!("EMAIL[{}]", self.hash_value(email))
            } else {
                let parts: Vec<&str> = email.split('@').collect();
                if parts.len() == 2 {
                    format!("{}***@{}***", &parts[0][..1.min(parts[0].len())], &parts[1][..1.min(parts[1].len())])
                } else {
                    "***@***".to_string()
                }
            }
        }).to_string()
    }

    fn redact_phones(&self, text: &str) -> String {
        let masked = PH_MOBILE_REGEX.replace_all(text, |caps: &regex::Captures| {
            if self.config.hash_for_correlation {
                format!("PHONE[{}]", self.hash_value(&caps[0]))
            } else {
                "09**-***-****".to_string()
            }
        }).to_string();

        PHONE_REGEX.replace_all(&masked, |caps: &regex::Captures| {
            if self.config.hash_for_correlation {
                format!("PHONE[{}]", self.hash_value(&caps[0]))
            } else {
                "(***) ***-****".to_string()
            }
        }).to_string()
    }

    fn hash_value(&self, value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(value.as_bytes());
        let result = hasher.finalize();
        general_purpose::STANDARD.encode(&result[..8]) // Use first 8 bytes for shorter hash
    }
}

impl Default for PiiRedactor {
    fn default() -> Self {
        Self::new(RedactionConfig::default())
    }
}

/// Case-insensitive whole-word pattern; boundaries only where the name starts or ends with a word character
fn name_pattern(name: &str) -> String {
    let is_word = |c: Option<char>| c.map_or(false, |c| c.is_alphanumeric() || c == '_');
    let start = if is_word(name.chars().next()) { r"\b" } else { "" };
    let end = if is_word(name.chars().last()) { r"\b" } else { "" };
    format!("(?i){}{}{}", start, regex::escape(name), end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> RedactionConfig {
        RedactionConfig {
            hash_for_correlation: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_email_redaction() {
        let redactor = PiiRedactor::new(plain());

        let text = "Health worker maria.santos@example.com submitted a record";
        let redacted = redactor.redact(text);
        assert!(redacted.contains("m***@e***"));
        assert!(!redacted.contains("maria.santos"));
    }

    #[test]
    fn test_ph_mobile_redaction() {
        let redactor = PiiRedactor::new(plain());

        let redacted = redactor.redact("Contact 0917-123-4567 for follow-up");
        assert!(redacted.contains("09**-***-****"));
        assert!(!redacted.contains("4567"));
    }

    #[test]
    fn test_registered_name_is_replaced_case_insensitively() {
        let redactor = PiiRedactor::new(plain()).with_name("Juan Dela Cruz");

        let redacted = redactor.redact("Assessment generated for JUAN DELA CRUZ.");
        assert_eq!(redacted, "Assessment generated for PATIENT[***].");
    }

    #[test]
    fn test_name_hash_is_stable_for_correlation() {
        let redactor = PiiRedactor::default();
        assert_eq!(redactor.redact_name("Ana Reyes"), redactor.redact_name("ana reyes "));
        assert!(redactor.redact_name("Ana Reyes").starts_with("PATIENT["));
    }

    #[test]
    fn test_disabled_redactor_passes_text_through() {
        let redactor = PiiRedactor::new(RedactionConfig {
            enabled: false,
            ..Default::default()
        })
        .with_name("Ana");
        assert_eq!(redactor.redact("Ana called 09171234567"), "Ana called 09171234567");
    }

    #[test]
    fn test_name_inside_other_words_is_kept() {
        let redactor = PiiRedactor::new(plain()).with_name("Ana");
        assert_eq!(
            redactor.redact("Ana ate a banana before the analysis"),
            "PATIENT[***] ate a banana before the analysis"
        );
    }

    #[test]
    fn test_blank_name_is_ignored() {
        let redactor = PiiRedactor::new(plain()).with_name("   ");
        assert_eq!(redactor.redact("no names here"), "no names here");
    }
}
