use tree_sitter::Language;

/// Source dialects the client analysers understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    TypeScript,
    Tsx,
}

impl Lang {
    #[must_use]
    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext {
            "ts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = path.rsplit_once('.').map(|(_, ext)| ext)?;
        Self::from_ext(ext)
    }

    #[must_use]
    pub fn grammar(self) -> Language {
        match self {
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Class declarations at any depth; `parse_source` keeps the top-level ones.
pub const CLASS_QUERY: &str = r"
    (class_declaration) @class
    (abstract_class_declaration) @class
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ext() {
        assert_eq!(Lang::from_ext("ts"), Some(Lang::TypeScript));
        assert_eq!(Lang::from_ext("tsx"), Some(Lang::Tsx));
        assert_eq!(Lang::from_ext("rs"), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            Lang::from_path("app/core/user.service.ts"),
            Some(Lang::TypeScript)
        );
        assert_eq!(Lang::from_path("README"), None);
    }
}
