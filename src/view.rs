/*!
 * Declarative view engine
 *
 * A view description is a small JSON document listing the items to show.
 * Items refer to models and indexes by the names they were registered under
 * in the [`ViewContext`], and to model fields by role name, so the same
 * description works with any source exposing those names.
 */

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use log::{debug, error, warn};
use serde::Deserialize;
use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Modify, Padding, Style},
};

use crate::error::{FsBrowseError, Result, ResultExt};
use crate::model::FileSystemSource;
use crate::types::ModelIndex;

/// View description compiled into the binary
pub const DEFAULT_VIEW: &str = include_str!("../resources/main.view.json");

/// Indentation of each tree level in the first column
const INDENT: &str = "  ";

fn default_depth() -> usize {
    1
}

/// Top-level view description document
#[derive(Debug, Clone, Deserialize)]
pub struct ViewDescription {
    /// Heading printed above every item
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub items: Vec<ItemDescription>,
}

impl ViewDescription {
    /// Parse a JSON view description
    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }
}

/// One visual item of a view description
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ItemDescription {
    TreeView(TreeViewDescription),
}

/// A tree bound to a model from the context
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeViewDescription {
    /// Context property holding the model
    pub model: String,
    /// Context property holding the index to show the children of
    #[serde(default)]
    pub root_index: Option<String>,
    /// Number of tree levels to show
    #[serde(default = "default_depth")]
    pub depth: usize,
    #[serde(default)]
    pub columns: Vec<ColumnDescription>,
}

/// A column showing one model role
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDescription {
    pub title: String,
    /// Role name as published by the model
    pub role: String,
}

/// Value registered in a view context
#[derive(Clone)]
enum ContextProperty {
    Model(Rc<dyn FileSystemSource>),
    Index(ModelIndex),
}

/// Named values a view description can refer to
#[derive(Clone, Default)]
pub struct ViewContext {
    properties: HashMap<String, ContextProperty>,
}

impl ViewContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model under `name`
    pub fn set_model(&mut self, name: impl Into<String>, model: Rc<dyn FileSystemSource>) {
        self.properties
            .insert(name.into(), ContextProperty::Model(model));
    }

    /// Register an index under `name`
    pub fn set_index(&mut self, name: impl Into<String>, index: ModelIndex) {
        self.properties
            .insert(name.into(), ContextProperty::Index(index));
    }

    fn model(&self, name: &str) -> Option<Rc<dyn FileSystemSource>> {
        match self.properties.get(name) {
            Some(ContextProperty::Model(model)) => Some(Rc::clone(model)),
            _ => None,
        }
    }

    fn index(&self, name: &str) -> Option<ModelIndex> {
        match self.properties.get(name) {
            Some(ContextProperty::Index(index)) => Some(*index),
            _ => None,
        }
    }
}

/// Column bound to a resolved role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub title: String,
    pub role: i32,
}

/// A tree of model entries rendered as a table
pub struct TreeView {
    title: Option<String>,
    model: Rc<dyn FileSystemSource>,
    root_index: ModelIndex,
    depth: usize,
    columns: Vec<Column>,
}

impl TreeView {
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Index whose children form the first level
    pub fn root_index(&self) -> ModelIndex {
        self.root_index
    }

    /// Cell texts, one row per visible entry in depth-first order
    pub fn rows(&self) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        self.collect_rows(&self.root_index, 0, &mut rows);
        rows
    }

    fn collect_rows(&self, parent: &ModelIndex, level: usize, rows: &mut Vec<Vec<String>>) {
        if level >= self.depth {
            return;
        }

        for row in 0..self.model.row_count(parent) {
            let index = self.model.index(row, 0, parent);
            if !index.is_valid() {
                continue;
            }

            let cells = self
                .columns
                .iter()
                .enumerate()
                .map(|(i, column)| {
                    let text = self.model.data(&index, column.role).to_string();
                    if i == 0 {
                        format!("{}{}", INDENT.repeat(level), text)
                    } else {
                        text
                    }
                })
                .collect();
            rows.push(cells);

            self.collect_rows(&index, level + 1, rows);
        }
    }

    /// Render the tree as a console table
    pub fn render(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.columns.iter().map(|column| column.title.clone()));
        for row in self.rows() {
            builder.push_record(row);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        match &self.title {
            Some(title) => format!("{}\n{}", title, table),
            None => table.to_string(),
        }
    }
}

/// Loads view descriptions against a context and keeps the created items
#[derive(Default)]
pub struct ViewEngine {
    context: ViewContext,
    root_objects: Vec<TreeView>,
}

impl ViewEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context the next loaded description is evaluated in
    pub fn root_context(&mut self) -> &mut ViewContext {
        &mut self.context
    }

    /// Items created by every successful load so far
    pub fn root_objects(&self) -> &[TreeView] {
        &self.root_objects
    }

    /// Load a description file; failures are logged
    pub fn load_file(&mut self, path: &Path) {
        if let Err(e) = read_description(path).and_then(|source| self.try_load_str(&source)) {
            error!("{}", e);
        }
    }

    /// Load a description from JSON text; failures are logged
    pub fn load_str(&mut self, source: &str) {
        if let Err(e) = self.try_load_str(source) {
            error!("{}", e);
        }
    }

    /// Load a description from JSON text.
    ///
    /// Items are created in order; the first item that cannot be created
    /// stops the load, keeping the items created before it.
    pub fn try_load_str(&mut self, source: &str) -> Result<()> {
        let description = ViewDescription::from_json(source)?;

        for item in &description.items {
            let ItemDescription::TreeView(tree) = item;
            let view = self.create_tree_view(description.title.clone(), tree)?;
            self.root_objects.push(view);
        }
        Ok(())
    }

    fn create_tree_view(
        &self,
        title: Option<String>,
        description: &TreeViewDescription,
    ) -> Result<TreeView> {
        let model = self.context.model(&description.model).ok_or_else(|| {
            FsBrowseError::View(format!(
                "TreeView: \"{}\" is not a model in the view context",
                description.model
            ))
        })?;

        let root_index = match &description.root_index {
            Some(name) => self.context.index(name).unwrap_or_else(|| {
                warn!("TreeView: root index \"{}\" is not defined", name);
                ModelIndex::invalid()
            }),
            None => ModelIndex::invalid(),
        };

        let role_names = model.role_names();
        let columns = description
            .columns
            .iter()
            .filter_map(|column| {
                let role = role_names
                    .iter()
                    .find(|(_, name)| **name == column.role)
                    .map(|(&role, _)| role);
                if role.is_none() {
                    warn!("TreeView: model has no role named \"{}\"", column.role);
                }
                role.map(|role| Column {
                    title: column.title.clone(),
                    role,
                })
            })
            .collect::<Vec<_>>();

        debug!(
            "Created TreeView on \"{}\" with {} columns",
            description.model,
            columns.len()
        );

        Ok(TreeView {
            title,
            model,
            root_index,
            depth: description.depth,
            columns,
        })
    }
}

fn read_description(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read view {}", path.display()))
}
