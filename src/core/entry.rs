//! Registry entry types consumed by the binding generator.
//!
//! These types represent API elements after the registry has resolved them:
//! member types carry their full C qualifiers, array lengths are attached to
//! declared names and enumeration values are already computed.

use serde::Serialize;

/// Declaration category of an [`Entry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Handle,
    Basetype,
    Bitmask,
    FuncPointer,
    Struct,
    Union,
    EnumValue,
    EnumGroup,
    Command,
}

impl Category {
    /// Name of the category as used by the registry.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Handle => "handle",
            Category::Basetype => "basetype",
            Category::Bitmask => "bitmask",
            Category::FuncPointer => "funcpointer",
            Category::Struct => "struct",
            Category::Union => "union",
            Category::EnumValue => "enum",
            Category::EnumGroup => "group",
            Category::Command => "command",
        }
    }
}

/// One API element, pre-resolved by the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// `VK_DEFINE_HANDLE(Name)` or `VK_DEFINE_NON_DISPATCHABLE_HANDLE(Name)`.
    Handle { name: String, define: String },

    /// A base type. `underlying` is `None` for opaque platform types.
    Basetype {
        name: String,
        underlying: Option<String>,
    },

    /// A flags type aliasing `VkFlags` or `VkFlags64`.
    Bitmask { name: String, underlying: String },

    /// A function pointer typedef.
    FuncPointer(FuncPointer),

    /// A struct definition.
    Struct(Aggregate),

    /// A union definition.
    Union(Aggregate),

    /// A top-level constant.
    EnumValue(EnumConstant),

    /// A named group of enumerants.
    EnumGroup(EnumGroup),

    /// A command.
    Command(Command),

    /// A type declared as an alias of another type.
    Alias {
        name: String,
        target: String,
        category: Category,
    },
}

impl Entry {
    /// Get the declared name of this entry.
    pub fn name(&self) -> &str {
        match self {
            Entry::Handle { name, .. }
            | Entry::Basetype { name, .. }
            | Entry::Bitmask { name, .. }
            | Entry::Alias { name, .. } => name,
            Entry::FuncPointer(f) => &f.name,
            Entry::Struct(s) | Entry::Union(s) => &s.name,
            Entry::EnumValue(c) => &c.name,
            Entry::EnumGroup(g) => &g.name,
            Entry::Command(c) => &c.name,
        }
    }

    /// Get the declaration category of this entry.
    pub fn category(&self) -> Category {
        match self {
            Entry::Handle { .. } => Category::Handle,
            Entry::Basetype { .. } => Category::Basetype,
            Entry::Bitmask { .. } => Category::Bitmask,
            Entry::FuncPointer(_) => Category::FuncPointer,
            Entry::Struct(_) => Category::Struct,
            Entry::Union(_) => Category::Union,
            Entry::EnumValue(_) => Category::EnumValue,
            Entry::EnumGroup(_) => Category::EnumGroup,
            Entry::Command(_) => Category::Command,
            Entry::Alias { category, .. } => *category,
        }
    }
}

/// A struct member or command parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Qualified C type, e.g. `const char* const*` or `struct wl_display*`
    pub ty: String,

    /// Declared name, including bracketed array lengths such as `uuid[VK_UUID_SIZE]`
    pub name: String,

    /// Bit-field width, if the member is a bit-field
    pub bit_width: Option<u32>,

    /// Discriminator value declared by the registry for `sType` members
    pub values: Option<String>,
}

impl Member {
    /// Create a new member.
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Member {
            ty: ty.into(),
            name: name.into(),
            bit_width: None,
            values: None,
        }
    }

    /// Set the bit-field width.
    pub fn with_bit_width(mut self, width: u32) -> Self {
        self.bit_width = Some(width);
        self
    }

    /// Set the registry-declared discriminator value.
    pub fn with_values(mut self, values: impl Into<String>) -> Self {
        self.values = Some(values.into());
        self
    }
}

/// A struct or union body.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub name: String,
    pub members: Vec<Member>,
}

impl Aggregate {
    /// Create an aggregate without members.
    pub fn new(name: impl Into<String>) -> Self {
        Aggregate {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Add a member.
    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }
}

/// A function pointer typedef.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncPointer {
    pub name: String,
    pub return_type: String,
    pub params: Vec<Member>,
}

/// A command signature.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// Command name
    pub name: String,

    /// Qualified C return type
    pub return_type: String,

    /// Ordered parameters
    pub params: Vec<Member>,
}

impl Command {
    /// Create a new command with the given name and return type.
    pub fn new(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Command {
            name: name.into(),
            return_type: return_type.into(),
            params: Vec::new(),
        }
    }

    /// Add a parameter.
    pub fn with_param(mut self, param: Member) -> Self {
        self.params.push(param);
        self
    }
}

/// A top-level constant such as `VK_UUID_SIZE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumConstant {
    pub name: String,
    pub value: String,
}

/// Kind of an enumeration group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Enum,
    Bitmask,
}

/// A named group of enumerants.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumGroup {
    /// Group name, e.g. `VkResult`
    pub name: String,

    /// Plain enumeration or bit flags
    pub kind: GroupKind,

    /// Width of the underlying integer (32 or 64)
    pub bitwidth: u32,

    /// Values in declaration order, extension additions last
    pub values: Vec<EnumValue>,
}

impl EnumGroup {
    /// Create a new 32-bit group.
    pub fn new(name: impl Into<String>, kind: GroupKind) -> Self {
        EnumGroup {
            name: name.into(),
            kind,
            bitwidth: 32,
            values: Vec::new(),
        }
    }

    /// Add a value.
    pub fn with_value(mut self, value: EnumValue) -> Self {
        self.values.push(value);
        self
    }
}

/// One enumerant of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// Enumerant name
    pub name: String,

    /// Value as it should appear in source (literal or another enumerant)
    pub value: String,

    /// Resolved integer value, if the enumerant is not an alias
    pub numeric: Option<i64>,

    /// Whether the enumerant was added to the group by `extends`
    pub extends: bool,

    /// Owning extension for enumerants added by an extension
    pub extension: Option<String>,
}

impl EnumValue {
    /// Create a group-native value.
    pub fn new(name: impl Into<String>, value: impl Into<String>, numeric: Option<i64>) -> Self {
        EnumValue {
            name: name.into(),
            value: value.into(),
            numeric,
            extends: false,
            extension: None,
        }
    }

    /// Mark the value as added by `extends`, optionally from an extension.
    pub fn extended_by(mut self, extension: Option<String>) -> Self {
        self.extends = true;
        self.extension = extension;
        self
    }
}

/// Whether a block is a core version or an extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Feature,
    Extension,
}

/// A core version or extension, the unit of traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Block name, e.g. `VK_VERSION_1_0` or `VK_KHR_surface`
    pub name: String,

    /// Feature or extension
    pub kind: BlockKind,

    /// Whether declarations of this block are written
    pub emit: bool,

    /// Registry platform name (`win32`, `xlib`, ...) for platform extensions
    pub platform: Option<String>,

    /// Macro protecting the platform, e.g. `VK_USE_PLATFORM_XLIB_KHR`
    pub protect: Option<String>,
}

impl Block {
    /// Create an emitted core version block.
    pub fn feature(name: impl Into<String>) -> Self {
        Block {
            name: name.into(),
            kind: BlockKind::Feature,
            emit: true,
            platform: None,
            protect: None,
        }
    }

    /// Create an emitted extension block.
    pub fn extension(name: impl Into<String>, platform: Option<String>) -> Self {
        Block {
            name: name.into(),
            kind: BlockKind::Extension,
            emit: true,
            platform,
            protect: None,
        }
    }

    /// Set the protecting macro.
    pub fn with_protect(mut self, protect: Option<String>) -> Self {
        self.protect = protect;
        self
    }

    /// Set the emit flag.
    pub fn with_emit(mut self, emit: bool) -> Self {
        self.emit = emit;
        self
    }
}
