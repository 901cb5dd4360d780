//! @acp:module "Element Model"
//! @acp:summary "Member descriptors consumed by the generator and the scanner"
//! @acp:domain cli
//! @acp:layer model
//!
//! A compilation unit is reduced to a flat list of [`Member`] values. Each
//! member carries what the generator and scanner need: names, signature
//! pieces, modifiers, the attached doc comment and the source ranges used for
//! findings and edits.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// @acp:summary "Java access level"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    #[default]
    Package,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Package => "package",
            Visibility::Private => "private",
        }
    }
}

/// Byte range inside the unit source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceRange {
    pub offset: usize,
    pub length: usize,
}

impl SourceRange {
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// @acp:summary "Declaration modifiers"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_final: bool,
    pub is_abstract: bool,
}

/// @acp:summary "Doc comment attached to a declaration"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocComment {
    /// Raw text including delimiters
    pub text: String,
    pub range: SourceRange,
}

/// Where a declaration starts, used to insert a fresh comment above it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Byte offset of the first token (modifiers and annotations included)
    pub start: usize,
    /// Whitespace preceding the declaration on its line
    pub indent: String,
    /// Range of the member name, the location reported for findings
    pub name_range: SourceRange,
}

/// @acp:summary "Formal parameter or record component"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

impl TypeKind {
    pub fn label(&self) -> &'static str {
        match self {
            TypeKind::Class => "Class",
            TypeKind::Interface => "Interface",
            TypeKind::Enum => "Enum",
            TypeKind::Annotation => "Annotation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeElement {
    pub name: String,
    pub kind: TypeKind,
    pub modifiers: Modifiers,
    pub type_parameters: Vec<String>,
    pub doc: Option<DocComment>,
    pub declaration: Declaration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldElement {
    pub name: String,
    pub type_name: String,
    pub enclosing_type: String,
    pub modifiers: Modifiers,
    pub is_enum_constant: bool,
    pub doc: Option<DocComment>,
    pub declaration: Declaration,
}

impl FieldElement {
    /// `static final` with a constant-style name
    pub fn is_constant(&self) -> bool {
        (self.modifiers.is_static && self.modifiers.is_final)
            && crate::conventions::is_constant_name(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodElement {
    pub name: String,
    /// `None` for constructors
    pub return_type: Option<String>,
    pub is_constructor: bool,
    pub parameters: Vec<Parameter>,
    pub type_parameters: Vec<String>,
    pub thrown_types: Vec<String>,
    pub enclosing_type: String,
    pub modifiers: Modifiers,
    pub doc: Option<DocComment>,
    pub declaration: Declaration,
}

impl MethodElement {
    pub fn is_void(&self) -> bool {
        self.is_constructor || self.return_type.as_deref() == Some("void")
    }

    /// `public static void main(String[] args)`
    pub fn is_main(&self) -> bool {
        self.name == "main"
            && self.modifiers.is_static
            && self.return_type.as_deref() == Some("void")
            && self.parameters.len() == 1
            && matches!(
                self.parameters[0].type_name.replace(' ', "").as_str(),
                "String[]" | "String..." | "java.lang.String[]"
            )
    }
}

/// Standalone parameter descriptor, documented on its own when an editor
/// asks for a single `@param` text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterElement {
    pub parameter: Parameter,
    pub method_name: String,
    pub enclosing_type: String,
    pub declaration: Declaration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordElement {
    pub name: String,
    pub components: Vec<Parameter>,
    pub type_parameters: Vec<String>,
    pub modifiers: Modifiers,
    pub doc: Option<DocComment>,
    pub declaration: Declaration,
}

/// @acp:summary "Tagged member descriptor"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Member {
    Type(TypeElement),
    Field(FieldElement),
    Method(MethodElement),
    Parameter(ParameterElement),
    Record(RecordElement),
}

/// Coarse member category used by filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Type,
    Field,
    Method,
    Parameter,
    Record,
}

impl Member {
    pub fn name(&self) -> &str {
        match self {
            Member::Type(t) => &t.name,
            Member::Field(f) => &f.name,
            Member::Method(m) => &m.name,
            Member::Parameter(p) => &p.parameter.name,
            Member::Record(r) => &r.name,
        }
    }

    pub fn kind(&self) -> MemberKind {
        match self {
            Member::Type(_) => MemberKind::Type,
            Member::Field(_) => MemberKind::Field,
            Member::Method(_) => MemberKind::Method,
            Member::Parameter(_) => MemberKind::Parameter,
            Member::Record(_) => MemberKind::Record,
        }
    }

    pub fn visibility(&self) -> Visibility {
        match self {
            Member::Type(t) => t.modifiers.visibility,
            Member::Field(f) => f.modifiers.visibility,
            Member::Method(m) => m.modifiers.visibility,
            Member::Parameter(_) => Visibility::Package,
            Member::Record(r) => r.modifiers.visibility,
        }
    }

    pub fn doc(&self) -> Option<&DocComment> {
        match self {
            Member::Type(t) => t.doc.as_ref(),
            Member::Field(f) => f.doc.as_ref(),
            Member::Method(m) => m.doc.as_ref(),
            Member::Parameter(_) => None,
            Member::Record(r) => r.doc.as_ref(),
        }
    }

    pub fn declaration(&self) -> &Declaration {
        match self {
            Member::Type(t) => &t.declaration,
            Member::Field(f) => &f.declaration,
            Member::Method(m) => &m.declaration,
            Member::Parameter(p) => &p.declaration,
            Member::Record(r) => &r.declaration,
        }
    }

    /// Human readable key such as `Pool.add`
    pub fn qualified_name(&self) -> String {
        match self {
            Member::Type(t) => t.name.clone(),
            Member::Record(r) => r.name.clone(),
            Member::Field(f) => format!("{}.{}", f.enclosing_type, f.name),
            Member::Method(m) => format!("{}.{}", m.enclosing_type, m.name),
            Member::Parameter(p) => format!(
                "{}.{}#{}",
                p.enclosing_type, p.method_name, p.parameter.name
            ),
        }
    }
}

/// @acp:summary "Parsed compilation unit"
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompilationUnit {
    pub path: PathBuf,
    pub source: String,
    pub package: Option<String>,
    /// Leading comment located before the first package/import statement
    pub header: Option<DocComment>,
    /// Members in source order
    pub members: Vec<Member>,
}

impl CompilationUnit {
    /// Name of the first top-level type, falling back to the file stem
    pub fn primary_type_name(&self) -> String {
        self.members
            .iter()
            .find_map(|m| match m {
                Member::Type(t) => Some(t.name.clone()),
                Member::Record(r) => Some(r.name.clone()),
                _ => None,
            })
            .unwrap_or_else(|| {
                self.path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default()
            })
    }

    pub fn fields(&self) -> Vec<FieldElement> {
        self.members
            .iter()
            .filter_map(|m| match m {
                Member::Field(f) => Some(f.clone()),
                _ => None,
            })
            .collect()
    }
}

/// @acp:summary "Element metadata provider contract"
pub trait ElementProvider: Send + Sync {
    /// Parse one unit from already-resident source text
    fn parse_unit(&self, path: &Path, source: &str) -> Result<CompilationUnit>;

    /// Read and parse a unit from disk
    fn load_unit(&self, path: &Path) -> Result<CompilationUnit> {
        let source = std::fs::read_to_string(path)?;
        self.parse_unit(path, &source)
    }
}

/// Strip generics, array brackets, varargs and package qualifiers
pub fn simple_type_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    let base = base.trim_end_matches("...").trim_end_matches("[]").trim();
    let base = base.trim_end_matches("[]").trim();
    base.rsplit('.').next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, ret: Option<&str>, params: Vec<Parameter>) -> MethodElement {
        MethodElement {
            name: name.to_string(),
            return_type: ret.map(String::from),
            is_constructor: ret.is_none(),
            parameters: params,
            type_parameters: vec![],
            thrown_types: vec![],
            enclosing_type: "Pool".to_string(),
            modifiers: Modifiers::default(),
            doc: None,
            declaration: Declaration::default(),
        }
    }

    #[test]
    fn test_simple_type_name() {
        assert_eq!(simple_type_name("java.util.List<String>"), "List");
        assert_eq!(simple_type_name("int[]"), "int");
        assert_eq!(simple_type_name("String..."), "String");
        assert_eq!(simple_type_name("java.io.IOException"), "IOException");
        assert_eq!(simple_type_name("Map<K, V>[][]"), "Map");
    }

    #[test]
    fn test_main_detection() {
        let mut m = method("main", Some("void"), vec![Parameter::new("args", "String[]")]);
        m.modifiers.is_static = true;
        assert!(m.is_main());

        m.modifiers.is_static = false;
        assert!(!m.is_main());
    }

    #[test]
    fn test_void_and_constructor() {
        assert!(method("Pool", None, vec![]).is_void());
        assert!(method("run", Some("void"), vec![]).is_void());
        assert!(!method("size", Some("int"), vec![]).is_void());
    }

    #[test]
    fn test_qualified_name() {
        let m = Member::Method(method("add", Some("void"), vec![]));
        assert_eq!(m.qualified_name(), "Pool.add");
        assert_eq!(m.kind(), MemberKind::Method);
    }
}
