// src/classify/mod.rs
//! Pattern classifiers: pure tally functions over one parsed file.

pub mod call_shape;
pub mod change_detection;
pub mod decoratorless;
pub mod inventory;

pub use self::change_detection::ChangeDetectionClassifier;
pub use self::decoratorless::DecoratorlessClassifier;
pub use self::inventory::InventoryClassifier;

use crate::snapshot::ReportKind;
use crate::source::SourceFile;
use crate::stats::Tally;

/// Updates one module's counters from one file.
///
/// Implementations must not fail: constructs they cannot make sense of are
/// skipped without being counted.
pub trait Classifier {
    type Stats: Tally;

    fn report(&self) -> ReportKind;

    fn classify(&self, file: &SourceFile, stats: &mut Self::Stats);
}
