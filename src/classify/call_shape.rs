//! Minimal call-expression shape of a field initializer.
//!
//! `input.required<number>()` becomes `CallShape { callee: ["input", "required"] }`.
//! Anything that is not `path<generics>?(` at the start of the text has no shape.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallShape {
    pub callee: Vec<String>,
}

impl CallShape {
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let mut rest = text.trim_start();
        let mut callee = Vec::new();

        loop {
            let (ident, tail) = take_identifier(rest)?;
            callee.push(ident.to_string());
            rest = tail.trim_start();
            match rest.strip_prefix('.') {
                Some(after_dot) => rest = after_dot.trim_start(),
                None => break,
            }
        }

        if rest.starts_with('<') {
            rest = skip_generics(rest)?.trim_start();
        }

        rest.starts_with('(').then_some(Self { callee })
    }

    #[must_use]
    pub fn is(&self, path: &[&str]) -> bool {
        self.callee.len() == path.len() && self.callee.iter().zip(path).all(|(a, b)| a == b)
    }
}

fn take_identifier(s: &str) -> Option<(&str, &str)> {
    let mut chars = s.char_indices();
    let (_, first) = chars.next()?;
    if !(first.is_alphabetic() || first == '_' || first == '$') {
        return None;
    }
    let end = chars
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_' || *c == '$'))
        .map_or(s.len(), |(i, _)| i);
    Some((&s[..end], &s[end..]))
}

/// Skips a balanced `<...>` block; `=>` inside function types does not close it.
fn skip_generics(s: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut prev = '\0';
    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' if prev != '=' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&s[i + 1..]);
                }
            }
            '(' | ';' | '{' if depth == 0 => return None,
            _ => {}
        }
        prev = c;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn callee(text: &str) -> Option<Vec<String>> {
        CallShape::parse(text).map(|s| s.callee)
    }

    #[test]
    fn test_plain_and_member_calls() {
        assert_eq!(callee("input()"), Some(vec!["input".into()]));
        assert_eq!(
            callee("input.required()"),
            Some(vec!["input".into(), "required".into()])
        );
        assert_eq!(
            callee("viewChild . required ('ref')"),
            Some(vec!["viewChild".into(), "required".into()])
        );
    }

    #[test]
    fn test_generic_arguments() {
        let is = |text: &str, path: &[&str]| CallShape::parse(text).is_some_and(|s| s.is(path));
        assert!(is("input.required<number>()", &["input", "required"]));
        assert!(is("input<Map<string, number>>()", &["input"]));
        assert!(is("output<(v: number) => void>()", &["output"]));
        assert!(is("model<string | undefined>(undefined)", &["model"]));
    }

    #[test]
    fn test_non_calls() {
        assert_eq!(callee("input"), None);
        assert_eq!(callee("new EventEmitter<void>()").map(|c| c.len()), None);
        assert_eq!(callee("'input()'"), None);
        assert_eq!(callee("1 + input()"), None);
        assert_eq!(callee("input<string"), None);
    }

    #[test]
    fn test_is_requires_exact_path() {
        let Some(shape) = CallShape::parse("viewChildren(Foo)") else {
            panic!("expected a call shape");
        };
        assert!(shape.is(&["viewChildren"]));
        assert!(!shape.is(&["viewChild"]));
    }
}
