use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wraps a customer's email or phone number so that log lines show only a
/// hint of it. Serialization is untouched; API responses carry the real value.
#[derive(Clone, Deserialize)]
pub struct Masked<T>(pub T);

impl<T: fmt::Display> Masked<T> {
    fn hint(&self) -> String {
        let raw = self.0.to_string();
        let first = raw.chars().next();
        match (first, raw.find('@')) {
            (Some(c), Some(at)) => format!("{}***{}", c, &raw[at..]),
            (_, None) if raw.chars().count() > 4 => {
                let tail: String = raw.chars().rev().take(2).collect::<Vec<_>>().into_iter().rev().collect();
                format!("***{}", tail)
            }
            _ => "***".to_string(),
        }
    }
}

impl<T: fmt::Display> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hint())
    }
}

impl<T: fmt::Display> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hint())
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_keeps_first_letter_and_domain() {
        assert_eq!(Masked("asha@example.com").to_string(), "a***@example.com");
    }

    #[test]
    fn phone_keeps_last_two_digits() {
        assert_eq!(format!("{:?}", Masked("+91 98765 43210")), "***10");
        assert_eq!(Masked("12").to_string(), "***");
    }

    #[test]
    fn serialization_is_transparent() {
        let json = serde_json::to_string(&Masked("asha@example.com")).unwrap();
        assert_eq!(json, "\"asha@example.com\"");
    }
}
