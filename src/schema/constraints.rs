//! Kind-scoped constraint checks over classified values.

use super::classifier::Classified;
use super::errors::Violation;
use super::types::Constraints;

impl Constraints {
    /// Checks, in order: pattern, minLength, maxLength, minimum, maximum.
    ///
    /// Only strings and numbers carry constraints; other classified values pass.
    pub fn check(&self, value: &Classified<'_>) -> Result<(), Violation> {
        match value {
            Classified::Str(text) => self.check_text(text),
            Classified::Number(n) => self.check_number(*n),
            _ => Ok(()),
        }
    }

    fn check_text(&self, text: &str) -> Result<(), Violation> {
        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(text) {
                return Err(Violation::Pattern(pattern.as_str().to_string()));
            }
        }

        // Length counts characters, not bytes.
        let len = text.chars().count();
        if let Some(min) = self.min_length {
            if len < min {
                return Err(Violation::MinLength(min));
            }
        }
        if let Some(max) = self.max_length {
            if len > max {
                return Err(Violation::MaxLength(max));
            }
        }
        Ok(())
    }

    fn check_number(&self, n: f64) -> Result<(), Violation> {
        if let Some(min) = self.minimum {
            if n < min {
                return Err(Violation::Minimum(min));
            }
        }
        if let Some(max) = self.maximum {
            if n > max {
                return Err(Violation::Maximum(max));
            }
        }
        Ok(())
    }
}
