//! Match criteria for component lookup.

use marionette_toolkit::{Component, ComponentId, ComponentKind, ComponentTree};
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Decides whether a component is the one a lookup is after.
///
/// Matchers run on the UI thread during a lookup and must not mutate
/// anything. The showing requirement is checked by the finder, not here.
pub trait ComponentMatcher: Send + Sync {
    fn matches(&self, tree: &ComponentTree, id: ComponentId, component: &Component) -> bool;

    /// Only components currently showing on screen may match.
    fn requires_showing(&self) -> bool {
        false
    }

    /// Used in lookup error messages.
    fn description(&self) -> String;
}

impl<M: ComponentMatcher + ?Sized> ComponentMatcher for Arc<M> {
    fn matches(&self, tree: &ComponentTree, id: ComponentId, component: &Component) -> bool {
        (**self).matches(tree, id, component)
    }

    fn requires_showing(&self) -> bool {
        (**self).requires_showing()
    }

    fn description(&self) -> String {
        (**self).description()
    }
}

/// An expected name or text.
#[derive(Clone, Debug)]
pub enum TextPattern {
    Exact(String),
    /// Must match the whole value.
    Regex(Regex),
}

impl TextPattern {
    /// Compiles `pattern` anchored at both ends.
    pub fn regex(pattern: &str) -> Result<TextPattern, regex::Error> {
        Regex::new(&format!("^(?:{pattern})$")).map(TextPattern::Regex)
    }

    pub fn is_match(&self, value: &str) -> bool {
        match self {
            TextPattern::Exact(expected) => expected == value,
            TextPattern::Regex(regex) => regex.is_match(value),
        }
    }

    fn describe(&self, field: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextPattern::Exact(expected) => write!(f, "{field}='{expected}'"),
            TextPattern::Regex(regex) => {
                let pattern = regex.as_str();
                let inner = pattern
                    .strip_prefix("^(?:")
                    .and_then(|rest| rest.strip_suffix(")$"))
                    .unwrap_or(pattern);
                write!(f, "{field}~'{inner}'")
            }
        }
    }
}

impl From<&str> for TextPattern {
    fn from(value: &str) -> Self {
        TextPattern::Exact(value.to_string())
    }
}

impl From<String> for TextPattern {
    fn from(value: String) -> Self {
        TextPattern::Exact(value)
    }
}

type Predicate = Arc<dyn Fn(&Component) -> bool + Send + Sync>;

/// The standard matcher: optional kind, name, text, showing flag and custom
/// predicate, all of which must hold.
///
/// ```
/// use marionette_finder::MatchCriteria;
/// use marionette_toolkit::ComponentKind;
///
/// let criteria = MatchCriteria::new().of_kind(ComponentKind::Button).named("ok");
/// assert_eq!(criteria.to_string(), "[type=Button, name='ok', requireShowing=false]");
/// ```
#[derive(Clone, Default)]
pub struct MatchCriteria {
    kind: Option<ComponentKind>,
    name: Option<TextPattern>,
    text: Option<TextPattern>,
    showing: bool,
    predicate: Option<Predicate>,
    label: Option<String>,
}

impl MatchCriteria {
    /// Matches every component.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of_kind(mut self, kind: ComponentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn named(mut self, name: impl Into<TextPattern>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name must fully match the regular expression `pattern`.
    pub fn named_like(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.name = Some(TextPattern::regex(pattern)?);
        Ok(self)
    }

    pub fn with_text(mut self, text: impl Into<TextPattern>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Text must fully match the regular expression `pattern`.
    pub fn with_text_like(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.text = Some(TextPattern::regex(pattern)?);
        Ok(self)
    }

    pub fn showing(mut self) -> Self {
        self.showing = true;
        self
    }

    /// Adds a custom check on top of the other criteria.
    pub fn matching(
        mut self,
        predicate: impl Fn(&Component) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Replaces the generated description.
    pub fn described_as(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

fn pattern_holds(pattern: Option<&TextPattern>, value: Option<&str>) -> bool {
    match (pattern, value) {
        (None, _) => true,
        (Some(pattern), Some(value)) => pattern.is_match(value),
        (Some(_), None) => false,
    }
}

impl ComponentMatcher for MatchCriteria {
    fn matches(&self, _tree: &ComponentTree, _id: ComponentId, component: &Component) -> bool {
        self.kind.is_none_or(|kind| component.kind == kind)
            && pattern_holds(self.name.as_ref(), component.name.as_deref())
            && pattern_holds(self.text.as_ref(), component.text.as_deref())
            && self
                .predicate
                .as_ref()
                .is_none_or(|predicate| predicate(component))
    }

    fn requires_showing(&self) -> bool {
        self.showing
    }

    fn description(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MatchCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = &self.label {
            return f.write_str(label);
        }
        f.write_str("[")?;
        if let Some(kind) = self.kind {
            write!(f, "type={kind}, ")?;
        }
        if let Some(name) = &self.name {
            name.describe("name", f)?;
            f.write_str(", ")?;
        }
        if let Some(text) = &self.text {
            text.describe("text", f)?;
            f.write_str(", ")?;
        }
        if self.predicate.is_some() {
            f.write_str("custom predicate, ")?;
        }
        write!(f, "requireShowing={}]", self.showing)
    }
}

impl fmt::Debug for MatchCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MatchCriteria")
            .field(&self.to_string())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/matcher_tests.rs"]
mod tests;
