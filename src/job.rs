use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The kind of comparison to run between two designs.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckType {
    /// Netlist-vs-netlist comparison of two schematics (SVS).
    Schematic,
    /// Geometric XOR of two layouts (LVL).
    Layout,
}

impl CheckType {
    /// The view extracted from each library when `--views` is not given.
    pub fn default_view(&self) -> &'static str {
        match self {
            CheckType::Schematic => "schematic",
            CheckType::Layout => "layout",
        }
    }
}

impl Display for CheckType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckType::Schematic => write!(f, "svs"),
            CheckType::Layout => write!(f, "lvl"),
        }
    }
}

/// One side of a comparison.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Design {
    pub library: String,
    pub cell: String,
    pub view: String,
}

/// A fully resolved comparison job.
///
/// Both designs always refer to the same cell; only the library and view differ.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    cell: String,
    libraries: [String; 2],
    views: [String; 2],
    check_type: CheckType,
}

impl JobSpec {
    /// Creates a job comparing `cell` across two libraries using the default
    /// view for `check_type`.
    pub fn new(
        check_type: CheckType,
        lib1: impl Into<String>,
        lib2: impl Into<String>,
        cell: impl Into<String>,
    ) -> Self {
        let view = check_type.default_view();
        Self {
            cell: cell.into(),
            libraries: [lib1.into(), lib2.into()],
            views: [view.to_string(), view.to_string()],
            check_type,
        }
    }

    /// Overrides the views extracted from the first and second library.
    pub fn with_views(mut self, view1: impl Into<String>, view2: impl Into<String>) -> Self {
        self.views = [view1.into(), view2.into()];
        self
    }

    #[inline]
    pub fn cell(&self) -> &str {
        &self.cell
    }

    #[inline]
    pub fn check_type(&self) -> CheckType {
        self.check_type
    }

    #[inline]
    pub fn libraries(&self) -> [&str; 2] {
        [&self.libraries[0], &self.libraries[1]]
    }

    #[inline]
    pub fn views(&self) -> [&str; 2] {
        [&self.views[0], &self.views[1]]
    }

    /// The two designs in command line order.
    pub fn designs(&self) -> [Design; 2] {
        [0, 1].map(|i| Design {
            library: self.libraries[i].clone(),
            cell: self.cell.clone(),
            view: self.views[i].clone(),
        })
    }
}
