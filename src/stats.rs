//! Per-module counters for the client reports.
//!
//! `total` is not a field: [`Tally::total`] derives it and [`ModuleTable`]
//! writes it next to the counters on serialization. Any `total` found when
//! reading a snapshot back is ignored.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

pub trait Tally: Default + Clone + Serialize {
    /// Sum of every constituent counter.
    fn total(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInventory {
    pub components: u64,
    pub directives: u64,
    pub pipes: u64,
    pub injectables: u64,
}

impl Tally for ComponentInventory {
    fn total(&self) -> u64 {
        self.components + self.directives + self.pipes + self.injectables
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeDetection {
    pub explicit_on_push: u64,
    pub explicit_default: u64,
    pub implicit_default: u64,
}

impl Tally for ChangeDetection {
    fn total(&self) -> u64 {
        self.explicit_on_push + self.explicit_default + self.implicit_default
    }
}

impl ChangeDetection {
    /// Share of OnPush among classified components, `None` when there are none.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn on_push_ratio(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.explicit_on_push as f64 / total as f64)
    }
}

/// Function-style vs decorator-style API usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecoratorlessApi {
    pub input_function: u64,
    pub input_required: u64,
    pub input_decorator: u64,
    pub output_function: u64,
    pub output_decorator: u64,
    pub model_function: u64,
    pub view_child_function: u64,
    pub view_child_required: u64,
    pub view_children_function: u64,
    pub view_child_decorator: u64,
    pub view_children_decorator: u64,
    pub content_child_function: u64,
    pub content_child_required: u64,
    pub content_children_function: u64,
    pub content_child_decorator: u64,
}

impl DecoratorlessApi {
    #[must_use]
    pub fn function_style(&self) -> u64 {
        self.input_function
            + self.input_required
            + self.output_function
            + self.model_function
            + self.view_child_function
            + self.view_child_required
            + self.view_children_function
            + self.content_child_function
            + self.content_child_required
            + self.content_children_function
    }

    #[must_use]
    pub fn decorator_style(&self) -> u64 {
        self.input_decorator
            + self.output_decorator
            + self.view_child_decorator
            + self.view_children_decorator
            + self.content_child_decorator
    }

    /// Migration progress in `[0, 1]`, `None` when nothing was counted.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn migration_ratio(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.function_style() as f64 / total as f64)
    }
}

impl Tally for DecoratorlessApi {
    fn total(&self) -> u64 {
        self.function_style() + self.decorator_style()
    }
}

/// Module name to stats, seeded with every configured module.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ModuleTable<S> {
    rows: BTreeMap<String, S>,
}

impl<S: Tally> ModuleTable<S> {
    /// Zeroed row for each module.
    #[must_use]
    pub fn new(modules: &[String]) -> Self {
        Self {
            rows: modules.iter().map(|m| (m.clone(), S::default())).collect(),
        }
    }

    #[must_use]
    pub fn get(&self, module: &str) -> Option<&S> {
        self.rows.get(module)
    }

    pub fn get_mut(&mut self, module: &str) -> Option<&mut S> {
        self.rows.get_mut(module)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &S)> {
        self.rows.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn modules(&self) -> Vec<&str> {
        self.rows.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of every module's total.
    #[must_use]
    pub fn grand_total(&self) -> u64 {
        self.rows.values().map(Tally::total).sum()
    }
}

#[derive(Serialize)]
struct WithTotal<'a, S> {
    #[serde(flatten)]
    counts: &'a S,
    total: u64,
}

impl<S: Tally> Serialize for ModuleTable<S> {
    fn serialize<Z: Serializer>(&self, serializer: Z) -> Result<Z::Ok, Z::Error> {
        let mut map = serializer.serialize_map(Some(self.rows.len()))?;
        for (module, stats) in &self.rows {
            map.serialize_entry(
                module,
                &WithTotal {
                    counts: stats,
                    total: stats.total(),
                },
            )?;
        }
        map.end()
    }
}
