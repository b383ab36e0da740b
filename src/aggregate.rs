// src/aggregate.rs
//! Drives a [`SourceIndex`] through the classifiers, one module row per file.

use crate::classify::{
    ChangeDetectionClassifier, Classifier, DecoratorlessClassifier, InventoryClassifier,
};
use crate::error::Result;
use crate::git::CommitInfo;
use crate::resolve::ModuleResolver;
use crate::snapshot::SnapshotWriter;
use crate::source::{SourceFile, SourceIndex};
use crate::stats::{ChangeDetection, ComponentInventory, DecoratorlessApi, ModuleTable};
use std::path::PathBuf;

/// Runs a single classifier over every file of `index`.
#[must_use]
pub fn aggregate<C: Classifier>(
    index: &dyn SourceIndex,
    resolver: &ModuleResolver,
    classifier: &C,
) -> ModuleTable<C::Stats> {
    let mut table = ModuleTable::new(resolver.modules());
    for file in index.files() {
        if let Some(module) = resolver.resolve(&file.path) {
            tally(classifier, &file, module, &mut table);
        }
    }
    table
}

fn tally<C: Classifier>(
    classifier: &C,
    file: &SourceFile,
    module: &str,
    table: &mut ModuleTable<C::Stats>,
) {
    if let Some(row) = table.get_mut(module) {
        classifier.classify(file, row);
    }
}

/// The three client reports for one state of the source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientReports {
    pub component_inventory: ModuleTable<ComponentInventory>,
    pub change_detection: ModuleTable<ChangeDetection>,
    pub decoratorless_api: ModuleTable<DecoratorlessApi>,
    pub files_seen: usize,
    pub files_resolved: usize,
}

/// Feeds every file to all three client classifiers in one pass.
#[derive(Debug, Clone)]
pub struct ClientAggregator {
    resolver: ModuleResolver,
}

impl ClientAggregator {
    #[must_use]
    pub fn new(resolver: ModuleResolver) -> Self {
        Self { resolver }
    }

    #[must_use]
    pub fn resolver(&self) -> &ModuleResolver {
        &self.resolver
    }

    #[must_use]
    pub fn run(&self, index: &dyn SourceIndex) -> ClientReports {
        let resolver = &self.resolver;
        let modules = resolver.modules();
        let mut reports = ClientReports {
            component_inventory: ModuleTable::new(modules),
            change_detection: ModuleTable::new(modules),
            decoratorless_api: ModuleTable::new(modules),
            files_seen: 0,
            files_resolved: 0,
        };

        for file in index.files() {
            reports.files_seen += 1;
            let Some(module) = resolver.resolve(&file.path) else {
                tracing::trace!("{} belongs to no module", file.path);
                continue;
            };
            reports.files_resolved += 1;
            tally(&InventoryClassifier, &file, module, &mut reports.component_inventory);
            tally(&ChangeDetectionClassifier, &file, module, &mut reports.change_detection);
            tally(&DecoratorlessClassifier, &file, module, &mut reports.decoratorless_api);
        }

        tracing::info!(
            "Classified {} of {} files",
            reports.files_resolved,
            reports.files_seen
        );
        reports
    }
}

impl ClientReports {
    /// Writes one snapshot per report with `provenance` as metadata.
    ///
    /// # Errors
    /// Returns error on the first snapshot that cannot be written.
    pub fn write_all(
        &self,
        writer: &SnapshotWriter,
        provenance: &CommitInfo,
    ) -> Result<Vec<PathBuf>> {
        Ok(vec![
            writer.write(
                InventoryClassifier.report(),
                &self.component_inventory,
                provenance,
                None,
            )?,
            writer.write(
                ChangeDetectionClassifier.report(),
                &self.change_detection,
                provenance,
                None,
            )?,
            writer.write(
                DecoratorlessClassifier.report(),
                &self.decoratorless_api,
                provenance,
                None,
            )?,
        ])
    }
}
