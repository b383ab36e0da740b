use super::call_shape::CallShape;
use super::Classifier;
use crate::snapshot::ReportKind;
use crate::source::{Member, SourceFile};
use crate::stats::DecoratorlessApi;

/// Function-style API a field initializer can call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalApi {
    Input,
    InputRequired,
    Output,
    Model,
    ViewChild,
    ViewChildRequired,
    ViewChildren,
    ContentChild,
    ContentChildRequired,
    ContentChildren,
}

impl SignalApi {
    const CALLEES: [(Self, &'static [&'static str]); 10] = [
        (Self::Input, &["input"]),
        (Self::InputRequired, &["input", "required"]),
        (Self::Output, &["output"]),
        (Self::Model, &["model"]),
        (Self::ViewChild, &["viewChild"]),
        (Self::ViewChildRequired, &["viewChild", "required"]),
        (Self::ViewChildren, &["viewChildren"]),
        (Self::ContentChild, &["contentChild"]),
        (Self::ContentChildRequired, &["contentChild", "required"]),
        (Self::ContentChildren, &["contentChildren"]),
    ];

    /// Callee paths are compared exactly, so at most one variant can match.
    #[must_use]
    pub fn of_initializer(text: &str) -> Option<Self> {
        let shape = CallShape::parse(text)?;
        Self::CALLEES
            .iter()
            .find(|(_, path)| shape.is(path))
            .map(|(api, _)| *api)
    }
}

/// Class-level markers that put a class in scope.
const SCOPE: &[&str] = &["Component", "Directive"];

/// Compares `input()`/`output()`/query functions against their decorator forms
/// on fields of components and directives.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecoratorlessClassifier;

impl Classifier for DecoratorlessClassifier {
    type Stats = DecoratorlessApi;

    fn report(&self) -> ReportKind {
        ReportKind::DecoratorlessApi
    }

    fn classify(&self, file: &SourceFile, stats: &mut DecoratorlessApi) {
        let members = file
            .classes
            .iter()
            .filter(|class| class.has_marker_named(SCOPE))
            .flat_map(|class| &class.members);

        for member in members {
            count_decorators(member, stats);
            if let Some(api) = member.initializer.as_deref().and_then(SignalApi::of_initializer) {
                count_function(api, stats);
            }
        }
    }
}

fn count_decorators(member: &Member, stats: &mut DecoratorlessApi) {
    if member.has_marker("Input") {
        stats.input_decorator += 1;
    }
    if member.has_marker("Output") {
        stats.output_decorator += 1;
    }
    if member.has_marker("ViewChild") {
        stats.view_child_decorator += 1;
    }
    if member.has_marker("ViewChildren") {
        stats.view_children_decorator += 1;
    }
    if member.has_marker("ContentChild") {
        stats.content_child_decorator += 1;
    }
}

fn count_function(api: SignalApi, stats: &mut DecoratorlessApi) {
    let counter = match api {
        SignalApi::Input => &mut stats.input_function,
        SignalApi::InputRequired => &mut stats.input_required,
        SignalApi::Output => &mut stats.output_function,
        SignalApi::Model => &mut stats.model_function,
        SignalApi::ViewChild => &mut stats.view_child_function,
        SignalApi::ViewChildRequired => &mut stats.view_child_required,
        SignalApi::ViewChildren => &mut stats.view_children_function,
        SignalApi::ContentChild => &mut stats.content_child_function,
        SignalApi::ContentChildRequired => &mut stats.content_child_required,
        SignalApi::ContentChildren => &mut stats.content_children_function,
    };
    *counter += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ClassDecl, Marker};
    use crate::stats::Tally;

    fn field(initializer: Option<&str>, markers: &[&str]) -> Member {
        Member {
            name: "f".into(),
            markers: markers.iter().map(|m| Marker::call(m, &[])).collect(),
            initializer: initializer.map(ToString::to_string),
        }
    }

    fn classify(class_marker: &str, members: Vec<Member>) -> DecoratorlessApi {
        let file = SourceFile {
            path: "app/core/x.ts".into(),
            classes: vec![ClassDecl {
                name: Some("X".into()),
                markers: vec![Marker::call(class_marker, &["{}"])],
                members,
            }],
        };
        let mut stats = DecoratorlessApi::default();
        DecoratorlessClassifier.classify(&file, &mut stats);
        stats
    }

    #[test]
    fn test_required_input_is_not_plain_input() {
        let stats = classify("Component", vec![field(Some("input.required<number>()"), &[])]);
        assert_eq!(stats.input_required, 1);
        assert_eq!(stats.input_function, 0);
        assert_eq!(stats.total(), 1);
    }

    #[test]
    fn test_every_function_form() {
        let initializers = [
            "input()",
            "input.required<number>()",
            "output<void>()",
            "model(0)",
            "viewChild('ref')",
            "viewChild.required(Foo)",
            "viewChildren(Foo)",
            "contentChild(Bar)",
            "contentChild.required(Bar)",
            "contentChildren(Bar)",
        ];
        let members = initializers.iter().map(|i| field(Some(*i), &[])).collect();
        let stats = classify("Directive", members);
        assert_eq!(stats.function_style(), 10);
        assert_eq!(stats.input_function, 1);
        assert_eq!(stats.view_children_function, 1);
        assert_eq!(stats.content_child_required, 1);
        assert_eq!(stats.decorator_style(), 0);
    }

    #[test]
    fn test_decorators_counted_independently_of_initializer() {
        let stats = classify(
            "Component",
            vec![
                field(None, &["Input"]),
                field(Some("new EventEmitter<string>()"), &["Output"]),
                field(None, &["ViewChild"]),
                field(None, &["ViewChildren"]),
                field(None, &["ContentChild"]),
                field(Some("input()"), &["Input"]),
            ],
        );
        assert_eq!(stats.input_decorator, 2);
        assert_eq!(stats.output_decorator, 1);
        assert_eq!(stats.view_child_decorator, 1);
        assert_eq!(stats.view_children_decorator, 1);
        assert_eq!(stats.content_child_decorator, 1);
        assert_eq!(stats.input_function, 1);
        assert_eq!(stats.total(), 7);
    }

    #[test]
    fn test_services_and_plain_classes_ignored() {
        let stats = classify("Injectable", vec![field(Some("input()"), &["Input"])]);
        assert_eq!(stats.total(), 0);
    }

    #[test]
    fn test_unrelated_initializers() {
        assert_eq!(SignalApi::of_initializer("signal(0)"), None);
        assert_eq!(SignalApi::of_initializer("model.required()"), None);
        assert_eq!(SignalApi::of_initializer("computed(() => input())"), None);
    }
}
