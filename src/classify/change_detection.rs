use super::Classifier;
use crate::snapshot::ReportKind;
use crate::source::SourceFile;
use crate::stats::ChangeDetection;

pub const ON_PUSH: &str = "ChangeDetectionStrategy.OnPush";
pub const DEFAULT: &str = "ChangeDetectionStrategy.Default";

/// Buckets `@Component` classes by the strategy named in the decorator's first
/// argument. The check is plain text containment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeDetectionClassifier;

impl Classifier for ChangeDetectionClassifier {
    type Stats = ChangeDetection;

    fn report(&self) -> ReportKind {
        ReportKind::ChangeDetection
    }

    fn classify(&self, file: &SourceFile, stats: &mut ChangeDetection) {
        let first_args = file
            .classes
            .iter()
            .flat_map(|class| &class.markers)
            .filter(|m| m.is_tagged("Component"))
            // No call, or a call without arguments: not counted anywhere.
            .filter_map(|m| m.first_argument());

        for text in first_args {
            if text.contains(ON_PUSH) {
                stats.explicit_on_push += 1;
            } else if text.contains(DEFAULT) {
                stats.explicit_default += 1;
            } else {
                stats.implicit_default += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ClassDecl, Marker};
    use crate::stats::Tally;

    fn classify(markers: Vec<Marker>) -> ChangeDetection {
        let file = SourceFile {
            path: "app/core/x.ts".into(),
            classes: vec![ClassDecl {
                markers,
                ..ClassDecl::default()
            }],
        };
        let mut stats = ChangeDetection::default();
        ChangeDetectionClassifier.classify(&file, &mut stats);
        stats
    }

    #[test]
    fn test_on_push_anywhere_in_argument_text() {
        let stats = classify(vec![Marker::call(
            "Component",
            &["{ changeDetection: ChangeDetectionStrategy.OnPush, selector: 'x' }"],
        )]);
        assert_eq!(stats.explicit_on_push, 1);
        assert_eq!(stats.total(), 1);
    }

    #[test]
    fn test_explicit_default_and_implicit() {
        let default = classify(vec![Marker::call(
            "Component",
            &["{ selector: 'x', changeDetection: ChangeDetectionStrategy.Default }"],
        )]);
        assert_eq!(default.explicit_default, 1);

        let implicit = classify(vec![Marker::call("Component", &["{ selector: 'x' }"])]);
        assert_eq!(implicit.implicit_default, 1);

        let empty_object = classify(vec![Marker::call("Component", &["{}"])]);
        assert_eq!(empty_object.implicit_default, 1);
    }

    #[test]
    fn test_zero_arguments_counts_nowhere() {
        let no_args = classify(vec![Marker::call("Component", &[])]);
        assert_eq!(no_args, ChangeDetection::default());
        assert_eq!(no_args.total(), 0);

        let not_a_call = classify(vec![Marker::new("Component")]);
        assert_eq!(not_a_call.total(), 0);
    }

    #[test]
    fn test_only_component_markers() {
        let stats = classify(vec![Marker::call(
            "Directive",
            &["{ changeDetection: ChangeDetectionStrategy.OnPush }"],
        )]);
        assert_eq!(stats.total(), 0);
    }
}
