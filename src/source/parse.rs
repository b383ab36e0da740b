// src/source/parse.rs
use super::lang::{Lang, CLASS_QUERY};
use super::{ClassDecl, Marker, Member, SourceFile};
use tree_sitter::{Language, Node, Parser, Query, QueryCursor, Tree};

/// Parses one TypeScript file into its class/decorator/field outline.
///
/// Returns `None` only when the grammar cannot be loaded or the parser gives up;
/// files with syntax errors still yield whatever classes tree-sitter recovered.
#[must_use]
pub fn parse_source(path: &str, source: &str) -> Option<SourceFile> {
    let lang = Lang::from_path(path).unwrap_or(Lang::TypeScript);
    let grammar = lang.grammar();
    let tree = parse_tree(source, &grammar)?;
    let query = Query::new(&grammar, CLASS_QUERY).ok()?;

    let mut cursor = QueryCursor::new();
    let mut classes = Vec::new();
    for m in cursor.matches(&query, tree.root_node(), source.as_bytes()) {
        for cap in m.captures.iter().filter(|c| is_top_level(c.node)) {
            classes.push(build_class(cap.node, source));
        }
    }

    Some(SourceFile {
        path: path.to_string(),
        classes,
    })
}

/// Declared directly in the file, possibly behind `export`.
fn is_top_level(node: Node) -> bool {
    match node.parent() {
        Some(p) if p.kind() == "program" => true,
        Some(p) if p.kind() == "export_statement" => {
            p.parent().is_some_and(|g| g.kind() == "program")
        }
        _ => false,
    }
}

fn parse_tree(source: &str, grammar: &Language) -> Option<Tree> {
    let mut parser = Parser::new();
    parser.set_language(grammar).ok()?;
    parser.parse(source, None)
}

fn text<'a>(node: Node, source: &'a str) -> &'a str {
    source.get(node.byte_range()).unwrap_or("")
}

fn build_class(node: Node, source: &str) -> ClassDecl {
    let name = node
        .child_by_field_name("name")
        .map(|n| text(n, source).to_string());

    // `@Component(...) export class X` hangs the decorator on the export statement.
    let mut markers = Vec::new();
    if let Some(parent) = node.parent().filter(|p| p.kind() == "export_statement") {
        markers.extend(decorators_of(parent, source));
    }
    markers.extend(decorators_of(node, source));

    let members = node
        .child_by_field_name("body")
        .map(|body| collect_members(body, source))
        .unwrap_or_default();

    ClassDecl {
        name,
        markers,
        members,
    }
}

fn decorators_of(node: Node, source: &str) -> Vec<Marker> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() == "decorator")
        .map(|c| build_marker(c, source))
        .collect()
}

fn collect_members(body: Node, source: &str) -> Vec<Member> {
    let mut members = Vec::new();
    // Some grammar versions emit member decorators as siblings preceding the member.
    let mut pending: Vec<Marker> = Vec::new();
    let mut cursor = body.walk();

    for child in body.named_children(&mut cursor) {
        match child.kind() {
            "decorator" => pending.push(build_marker(child, source)),
            "public_field_definition" => {
                let mut markers = std::mem::take(&mut pending);
                markers.extend(decorators_of(child, source));
                members.push(Member {
                    name: child
                        .child_by_field_name("name")
                        .map(|n| text(n, source).to_string())
                        .unwrap_or_default(),
                    markers,
                    initializer: child
                        .child_by_field_name("value")
                        .map(|v| text(v, source).to_string()),
                });
            }
            "comment" => {}
            _ => pending.clear(),
        }
    }
    members
}

fn build_marker(node: Node, source: &str) -> Marker {
    let raw_text = text(node, source).to_string();
    let Some(inner) = first_non_comment(node) else {
        return Marker {
            name: String::new(),
            raw_text,
            arguments: None,
        };
    };

    let (name, arguments) = if inner.kind() == "call_expression" {
        let name = inner
            .child_by_field_name("function")
            .map(|f| callee_name(f, source))
            .unwrap_or_default();
        let args = inner
            .child_by_field_name("arguments")
            .map(|a| argument_texts(a, source))
            .unwrap_or_default();
        (name, Some(args))
    } else {
        (callee_name(inner, source), None)
    };

    Marker {
        name,
        raw_text,
        arguments,
    }
}

fn first_non_comment(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|c| c.kind() != "comment");
    found
}

/// `Component` for both `Component` and `core.Component`.
fn callee_name(node: Node, source: &str) -> String {
    if node.kind() == "member_expression" {
        if let Some(prop) = node.child_by_field_name("property") {
            return text(prop, source).to_string();
        }
    }
    let full = text(node, source);
    full.rsplit('.').next().unwrap_or(full).trim().to_string()
}

fn argument_texts(args: Node, source: &str) -> Vec<String> {
    let mut cursor = args.walk();
    args.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .map(|c| text(c, source).to_string())
        .collect()
}
