use alloc::string::String;
use alloc::sync::Arc;

/// How the remainder of an accessor name is turned into a property name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ManglePolicy {
    /// Lower-cases the whole leading run of upper-case characters:
    /// `URLName` becomes `urlname`.
    #[default]
    Legacy,
    /// Lower-cases the first character unless the first two are both
    /// upper-case: `URL` stays `URL`, `Name` becomes `name`.
    StdBean,
}

/// Accessor naming conventions.
///
/// # Examples
///
/// ```
/// use vc_introspect::config::{ManglePolicy, NamingRules};
///
/// let rules = NamingRules::default();
/// assert_eq!(rules.getter_name("getFirstName", false).as_deref(), Some("firstName"));
/// assert_eq!(rules.getter_name("isActive", true).as_deref(), Some("active"));
/// assert_eq!(rules.getter_name("isActive", false), None);
/// assert_eq!(rules.setter_name("setURLName").as_deref(), Some("urlname"));
///
/// let rules = rules.with_mangle(ManglePolicy::StdBean);
/// assert_eq!(rules.setter_name("setURL").as_deref(), Some("URL"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamingRules {
    pub getter_prefix: Arc<str>,
    /// Only applies to getters returning `bool`.
    pub is_getter_prefix: Arc<str>,
    pub setter_prefix: Arc<str>,
    pub mangle: ManglePolicy,
}

impl Default for NamingRules {
    fn default() -> Self {
        Self {
            getter_prefix: Arc::from("get"),
            is_getter_prefix: Arc::from("is"),
            setter_prefix: Arc::from("set"),
            mangle: ManglePolicy::Legacy,
        }
    }
}

impl NamingRules {
    pub fn with_mangle(mut self, mangle: ManglePolicy) -> Self {
        self.mangle = mangle;
        self
    }

    pub fn with_prefixes(mut self, getter: &str, is_getter: &str, setter: &str) -> Self {
        self.getter_prefix = Arc::from(getter);
        self.is_getter_prefix = Arc::from(is_getter);
        self.setter_prefix = Arc::from(setter);
        self
    }

    /// Derives the property name of a getter, or `None` if `method` does not
    /// follow the getter convention.
    pub fn getter_name(&self, method: &str, returns_bool: bool) -> Option<String> {
        self.strip(method, &self.getter_prefix).or_else(|| {
            returns_bool
                .then(|| self.strip(method, &self.is_getter_prefix))
                .flatten()
        })
    }

    /// Returns `true` if `method` names a getter through the `is` prefix only.
    pub fn is_is_getter(&self, method: &str, returns_bool: bool) -> bool {
        returns_bool
            && self.strip(method, &self.getter_prefix).is_none()
            && self.strip(method, &self.is_getter_prefix).is_some()
    }

    /// Derives the property name of a setter, or `None` if `method` does not
    /// follow the setter convention.
    pub fn setter_name(&self, method: &str) -> Option<String> {
        self.strip(method, &self.setter_prefix)
    }

    fn strip(&self, method: &str, prefix: &str) -> Option<String> {
        let rest = method.strip_prefix(prefix)?;
        self.mangle(rest)
    }

    /// Decapitalizes the remainder of an accessor name.
    ///
    /// Returns `None` for an empty remainder.
    pub fn mangle(&self, basename: &str) -> Option<String> {
        let first = basename.chars().next()?;
        match self.mangle {
            ManglePolicy::Legacy => {
                let mut out = String::with_capacity(basename.len());
                let mut leading = true;
                for c in basename.chars() {
                    if leading && c.is_uppercase() {
                        out.extend(c.to_lowercase());
                    } else {
                        leading = false;
                        out.push(c);
                    }
                }
                Some(out)
            }
            ManglePolicy::StdBean => {
                let second_upper = basename.chars().nth(1).is_some_and(char::is_uppercase);
                if first.is_uppercase() && second_upper {
                    return Some(String::from(basename));
                }
                let mut out = String::with_capacity(basename.len());
                out.extend(first.to_lowercase());
                out.push_str(&basename[first.len_utf8()..]);
                Some(out)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_lowercases_leading_run() {
        let rules = NamingRules::default();
        assert_eq!(rules.mangle("X").as_deref(), Some("x"));
        assert_eq!(rules.mangle("URLName").as_deref(), Some("urlname"));
        assert_eq!(rules.mangle("already").as_deref(), Some("already"));
        assert_eq!(rules.mangle(""), None);
    }

    #[test]
    fn std_bean_keeps_acronyms() {
        let rules = NamingRules::default().with_mangle(ManglePolicy::StdBean);
        assert_eq!(rules.mangle("URL").as_deref(), Some("URL"));
        assert_eq!(rules.mangle("Name").as_deref(), Some("name"));
        assert_eq!(rules.mangle("X").as_deref(), Some("x"));
    }

    #[test]
    fn prefix_alone_is_not_an_accessor() {
        let rules = NamingRules::default();
        assert_eq!(rules.getter_name("get", false), None);
        assert_eq!(rules.setter_name("set"), None);
        assert_eq!(rules.getter_name("size", false), None);
    }

    #[test]
    fn is_prefix_requires_bool() {
        let rules = NamingRules::default();
        assert!(rules.is_is_getter("isOpen", true));
        assert!(!rules.is_is_getter("isOpen", false));
        assert!(!rules.is_is_getter("getOpen", true));
    }
}
