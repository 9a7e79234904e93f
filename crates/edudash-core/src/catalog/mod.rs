//! Screen catalog.
//!
//! Declares every admin screen: which collection it edits, which section
//! guards it, and whether it edits a single record or an ordered list.
//!
//! # Module Structure
//!
//! - `screens`: the standard dashboard screens
//! - `validators`: reusable field validators

mod screens;
pub mod validators;

use std::sync::Arc;

use crate::access::Section;
use crate::schema::RecordSchema;
use crate::session::ListSpec;

/// What a screen edits.
#[derive(Debug, Clone)]
pub enum ScreenKind {
    /// One record per id (a course, a mentor, the hero block).
    Single { schema: Arc<RecordSchema> },
    /// One ordered list per key (FAQs, a course's benefits).
    List {
        item_schema: Arc<RecordSchema>,
        id_prefix: String,
        list_field: String,
    },
}

#[derive(Debug, Clone)]
pub struct Screen {
    pub name: String,
    pub title: String,
    pub collection: String,
    pub section: Section,
    pub kind: ScreenKind,
}

impl Screen {
    pub fn single(
        name: impl Into<String>,
        title: impl Into<String>,
        section: Section,
        schema: RecordSchema,
    ) -> Self {
        let name = name.into();
        Self {
            collection: name.clone(),
            name,
            title: title.into(),
            section,
            kind: ScreenKind::Single {
                schema: Arc::new(schema),
            },
        }
    }

    pub fn list(
        name: impl Into<String>,
        title: impl Into<String>,
        section: Section,
        item_schema: RecordSchema,
        id_prefix: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            collection: name.clone(),
            name,
            title: title.into(),
            section,
            kind: ScreenKind::List {
                item_schema: Arc::new(item_schema),
                id_prefix: id_prefix.into(),
                list_field: ListSpec::DEFAULT_LIST_FIELD.to_string(),
            },
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self.kind, ScreenKind::List { .. })
    }

    /// The record schema (item schema for list screens).
    pub fn schema(&self) -> &Arc<RecordSchema> {
        match &self.kind {
            ScreenKind::Single { schema } => schema,
            ScreenKind::List { item_schema, .. } => item_schema,
        }
    }

    /// A fresh list spec for opening a session; `None` for single screens.
    pub fn list_spec(&self) -> Option<ListSpec> {
        match &self.kind {
            ScreenKind::Single { .. } => None,
            ScreenKind::List {
                item_schema,
                id_prefix,
                list_field,
            } => Some(
                ListSpec::new(item_schema.clone(), id_prefix.clone())
                    .with_list_field(list_field.clone()),
            ),
        }
    }
}

/// The set of screens the dashboard offers.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    screens: Vec<Screen>,
}

impl Catalog {
    pub fn new(screens: Vec<Screen>) -> Self {
        Self { screens }
    }

    /// The dashboard's standard screens.
    pub fn standard() -> Self {
        Self::new(screens::standard_screens())
    }

    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    pub fn screen(&self, name: &str) -> Option<&Screen> {
        self.screens.iter().find(|s| s.name == name)
    }

    pub fn by_collection(&self, collection: &str) -> Option<&Screen> {
        self.screens.iter().find(|s| s.collection == collection)
    }

    /// Section guarding a collection. Unknown collections have none and
    /// should be refused by callers.
    pub fn section_of(&self, collection: &str) -> Option<Section> {
        self.by_collection(collection).map(|s| s.section)
    }
}
