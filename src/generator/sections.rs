//! Per-block declaration buckets.

use std::collections::BTreeMap;

use crate::core::{Category, GroupKind};

/// Declaration section of the generated output.
///
/// Variant order is the flush order: later sections may name declarations
/// from earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Include,
    Define,
    Basetype,
    Handle,
    Enum,
    Group,
    Bitmask,
    FuncPointer,
    Struct,
    CommandPointer,
    Command,
}

impl Section {
    /// Sections written to `types.d`.
    pub const TYPES: [Section; 9] = [
        Section::Include,
        Section::Define,
        Section::Basetype,
        Section::Handle,
        Section::Enum,
        Section::Group,
        Section::Bitmask,
        Section::FuncPointer,
        Section::Struct,
    ];

    /// Section receiving declarations of the given category.
    pub fn for_category(category: Category) -> Section {
        match category {
            Category::Handle => Section::Handle,
            Category::Basetype => Section::Basetype,
            Category::Bitmask => Section::Bitmask,
            Category::FuncPointer => Section::FuncPointer,
            Category::Struct | Category::Union => Section::Struct,
            Category::EnumValue => Section::Enum,
            Category::EnumGroup => Section::Group,
            Category::Command => Section::Command,
        }
    }

    /// Section receiving an enumeration group.
    pub fn for_group(kind: GroupKind) -> Section {
        match kind {
            GroupKind::Enum => Section::Group,
            GroupKind::Bitmask => Section::Bitmask,
        }
    }
}

/// Declarations of the open block, grouped by section.
#[derive(Debug, Default)]
pub struct SectionBuckets {
    buckets: BTreeMap<Section, Vec<String>>,
}

impl SectionBuckets {
    /// Append a declaration to a section.
    pub fn push(&mut self, section: Section, text: impl Into<String>) {
        self.buckets.entry(section).or_default().push(text.into());
    }

    /// Declarations of one section, in insertion order.
    pub fn get(&self, section: Section) -> &[String] {
        self.buckets.get(&section).map_or(&[], Vec::as_slice)
    }

    /// Whether a section holds no declarations.
    pub fn is_empty(&self, section: Section) -> bool {
        self.get(section).is_empty()
    }
}
