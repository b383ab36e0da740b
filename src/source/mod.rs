//! Parsed view of a source tree: files, their classes, decorators and fields.
//!
//! Classifiers only ever see these owned types, never tree-sitter nodes, so
//! they can be fed from a real checkout ([`TsProject`]) or built by hand in
//! tests ([`InMemoryIndex`]).

pub mod lang;
pub mod parse;
pub mod project;

pub use self::project::TsProject;

/// A decorator attached to a class or a class field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Last segment of the decorator's callee, e.g. `Component` for `@ng.Component()`.
    pub name: String,
    /// Full source text including the leading `@`.
    pub raw_text: String,
    /// `None` when the decorator is not a call (`@Foo`), otherwise one entry per argument.
    pub arguments: Option<Vec<String>>,
}

impl Marker {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            raw_text: format!("@{name}"),
            arguments: None,
        }
    }

    /// Builds a call-style marker; `raw_text` is reconstructed from the arguments.
    #[must_use]
    pub fn call(name: &str, arguments: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            raw_text: format!("@{name}({})", arguments.join(", ")),
            arguments: Some(arguments.iter().map(ToString::to_string).collect()),
        }
    }

    /// Matches by name, or by `@Name` appearing anywhere in the decorator text.
    #[must_use]
    pub fn is_tagged(&self, name: &str) -> bool {
        self.name == name || self.raw_text.contains(&format!("@{name}"))
    }

    #[must_use]
    pub fn first_argument(&self) -> Option<&str> {
        self.arguments.as_ref()?.first().map(String::as_str)
    }
}

/// A property declaration inside a class body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub markers: Vec<Marker>,
    pub initializer: Option<String>,
}

impl Member {
    #[must_use]
    pub fn has_marker(&self, name: &str) -> bool {
        self.markers.iter().any(|m| m.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: Option<String>,
    pub markers: Vec<Marker>,
    pub members: Vec<Member>,
}

impl ClassDecl {
    /// True if any class decorator is literally named one of `names`.
    #[must_use]
    pub fn has_marker_named(&self, names: &[&str]) -> bool {
        self.markers.iter().any(|m| names.contains(&m.name.as_str()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFile {
    /// Path as enumerated, used only for module resolution.
    pub path: String,
    pub classes: Vec<ClassDecl>,
}

/// Anything that can hand out parsed files, once per aggregation run.
pub trait SourceIndex {
    fn files(&self) -> Box<dyn Iterator<Item = SourceFile> + '_>;
}

/// A fixed list of already-parsed files.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIndex {
    files: Vec<SourceFile>,
}

impl InMemoryIndex {
    #[must_use]
    pub fn new(files: Vec<SourceFile>) -> Self {
        Self { files }
    }

    /// Parses each `(path, source)` pair as TypeScript.
    #[must_use]
    pub fn from_sources(sources: &[(&str, &str)]) -> Self {
        let files = sources
            .iter()
            .filter_map(|(path, src)| parse::parse_source(path, src))
            .collect();
        Self { files }
    }
}

impl SourceIndex for InMemoryIndex {
    fn files(&self) -> Box<dyn Iterator<Item = SourceFile> + '_> {
        Box::new(self.files.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_tagged_by_name_or_text() {
        let by_name = Marker::new("Component");
        assert!(by_name.is_tagged("Component"));

        let by_text = Marker {
            name: "Wrapped".into(),
            raw_text: "@Wrapped(@Component)".into(),
            arguments: None,
        };
        assert!(by_text.is_tagged("Component"));
        assert!(!by_text.is_tagged("Pipe"));
    }

    #[test]
    fn test_first_argument() {
        assert_eq!(Marker::new("Injectable").first_argument(), None);
        assert_eq!(Marker::call("Component", &[]).first_argument(), None);
        assert_eq!(
            Marker::call("Component", &["{ selector: 'x' }"]).first_argument(),
            Some("{ selector: 'x' }")
        );
    }
}
