use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NewsletterId(String);

impl NewsletterId {
    pub fn parse(s: String) -> Result<NewsletterId, String> {
        let is_empty = s.is_empty();

        let is_too_long = s.graphemes(true).count() > 256;

        let contains_whitespace = s.chars().any(char::is_whitespace);

        if is_empty || is_too_long || contains_whitespace {
            Err(format!("{:?} is not a valid newsletter id", s))
        } else {
            Ok(Self(s))
        }
    }
}

impl AsRef<str> for NewsletterId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NewsletterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
