use crate::shortcode::ShortCode;
use std::fmt::Display;

/// The storage key under which a short link's redirect object lives.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Joins `prefix` and `code` as `<prefix>/<code>`.
    ///
    /// An empty prefix places the object at the bucket root.
    pub fn new(prefix: &str, code: &ShortCode) -> Self {
        let prefix = prefix.trim_matches('/');
        if prefix.is_empty() {
            Self(code.as_str().to_owned())
        } else {
            Self(format!("{}/{}", prefix, code))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_prefix_and_code() {
        let code = ShortCode::new_unchecked("mylink");
        assert_eq!(ObjectKey::new("u", &code).as_str(), "u/mylink");
        assert_eq!(ObjectKey::new("u/", &code).as_str(), "u/mylink");
        assert_eq!(ObjectKey::new("links/v1", &code).as_str(), "links/v1/mylink");
    }

    #[test]
    fn empty_prefix_is_bucket_root() {
        let code = ShortCode::new_unchecked("mylink");
        assert_eq!(ObjectKey::new("", &code).as_str(), "mylink");
    }
}
