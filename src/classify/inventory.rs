use super::Classifier;
use crate::snapshot::ReportKind;
use crate::source::{Marker, SourceFile};
use crate::stats::ComponentInventory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclarationKind {
    Component,
    Directive,
    Pipe,
    Injectable,
}

impl DeclarationKind {
    const ALL: [(Self, &'static str); 4] = [
        (Self::Component, "Component"),
        (Self::Directive, "Directive"),
        (Self::Pipe, "Pipe"),
        (Self::Injectable, "Injectable"),
    ];

    /// First kind the marker is tagged with, in declaration order.
    fn of(marker: &Marker) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|(_, name)| marker.is_tagged(name))
            .map(|(kind, _)| *kind)
    }
}

/// Counts `@Component`, `@Directive`, `@Pipe` and `@Injectable` classes.
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryClassifier;

impl Classifier for InventoryClassifier {
    type Stats = ComponentInventory;

    fn report(&self) -> ReportKind {
        ReportKind::ComponentInventory
    }

    fn classify(&self, file: &SourceFile, stats: &mut ComponentInventory) {
        let kinds = file
            .classes
            .iter()
            .flat_map(|class| &class.markers)
            .filter_map(DeclarationKind::of);

        for kind in kinds {
            match kind {
                DeclarationKind::Component => stats.components += 1,
                DeclarationKind::Directive => stats.directives += 1,
                DeclarationKind::Pipe => stats.pipes += 1,
                DeclarationKind::Injectable => stats.injectables += 1,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ClassDecl;
    use crate::stats::Tally;

    fn file_with(classes: Vec<Vec<Marker>>) -> SourceFile {
        SourceFile {
            path: "app/core/x.ts".into(),
            classes: classes
                .into_iter()
                .map(|markers| ClassDecl {
                    markers,
                    ..ClassDecl::default()
                })
                .collect(),
        }
    }

    #[test]
    fn test_counts_each_kind() {
        let file = file_with(vec![
            vec![Marker::call("Component", &["{}"])],
            vec![Marker::call("Directive", &["{}"])],
            vec![Marker::call("Pipe", &["{ name: 'p' }"])],
            vec![Marker::call("Injectable", &["{ providedIn: 'root' }"])],
            vec![Marker::new("Injectable")],
        ]);
        let mut stats = ComponentInventory::default();
        InventoryClassifier.classify(&file, &mut stats);
        assert_eq!(stats.components, 1);
        assert_eq!(stats.directives, 1);
        assert_eq!(stats.pipes, 1);
        assert_eq!(stats.injectables, 2);
        assert_eq!(stats.total(), 5);
    }

    #[test]
    fn test_multiple_markers_count_separately() {
        let file = file_with(vec![vec![
            Marker::call("Component", &["{}"]),
            Marker::call("Injectable", &[]),
        ]]);
        let mut stats = ComponentInventory::default();
        InventoryClassifier.classify(&file, &mut stats);
        assert_eq!(stats.components, 1);
        assert_eq!(stats.injectables, 1);
    }

    #[test]
    fn test_unrelated_markers_and_plain_classes_skip() {
        let file = file_with(vec![vec![Marker::new("Deprecated")], vec![]]);
        let mut stats = ComponentInventory::default();
        InventoryClassifier.classify(&file, &mut stats);
        assert_eq!(stats.total(), 0);
    }
}
