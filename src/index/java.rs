//! @acp:module "Java Source Parser"
//! @acp:summary "tree-sitter based element provider for Java compilation units"
//! @acp:domain cli
//! @acp:layer parsing
//!
//! Walks the syntax tree of one unit and flattens every type, record, field,
//! enum constant, method and constructor into a [`Member`]. Doc comments are
//! the `/** */` block or the run of `///` lines directly preceding a
//! declaration. Trees with syntax errors are still walked; only a unit that
//! yields no tree at all is a parse failure.

use std::collections::HashSet;
use std::path::Path;

use tree_sitter::{Node, Parser};

use crate::element::{
    CompilationUnit, Declaration, DocComment, ElementProvider, FieldElement, Member, MethodElement,
    Modifiers, Parameter, RecordElement, SourceRange, TypeElement, TypeKind, Visibility,
};
use crate::error::{AutodocError, Result};

/// @acp:summary "Java element provider backed by tree-sitter-java"
///
/// A `tree_sitter::Parser` is not `Sync`, so one is created per unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaSourceParser;

impl JavaSourceParser {
    pub fn new() -> Self {
        Self
    }
}

impl ElementProvider for JavaSourceParser {
    fn parse_unit(&self, path: &Path, source: &str) -> Result<CompilationUnit> {
        let parse_error = |message: String| AutodocError::Parse {
            path: path.to_path_buf(),
            message,
        };

        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .map_err(|e| parse_error(e.to_string()))?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| parse_error("parser produced no tree".to_string()))?;

        let root = tree.root_node();
        if root.has_error() {
            tracing::debug!(path = %path.display(), "syntax errors in unit, continuing");
        }

        let mut walker = UnitWalker::new(source);
        let mut package = None;
        for child in named_children(root) {
            match child.kind() {
                "package_declaration" => package = walker.package_name(child),
                _ => walker.visit(child, None, false),
            }
        }
        let header = walker.header(root);

        Ok(CompilationUnit {
            path: path.to_path_buf(),
            source: source.to_string(),
            package,
            header,
            members: walker.members,
        })
    }
}

struct UnitWalker<'s> {
    source: &'s str,
    members: Vec<Member>,
    /// Start offsets of comments attached to declarations
    doc_starts: HashSet<usize>,
}

impl<'s> UnitWalker<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            members: Vec::new(),
            doc_starts: HashSet::new(),
        }
    }

    fn raw(&self, node: Node) -> &'s str {
        self.source.get(node.start_byte()..node.end_byte()).unwrap_or("")
    }

    /// Node text with whitespace runs collapsed
    fn text(&self, node: Node) -> String {
        self.raw(node).split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn field_text(&self, node: Node, field: &str) -> Option<String> {
        node.child_by_field_name(field).map(|n| self.text(n))
    }

    fn visit(&mut self, node: Node, enclosing: Option<&str>, in_interface: bool) {
        match node.kind() {
            "class_declaration" => self.visit_type(node, TypeKind::Class),
            "interface_declaration" => self.visit_type(node, TypeKind::Interface),
            "enum_declaration" => self.visit_type(node, TypeKind::Enum),
            "annotation_type_declaration" => self.visit_type(node, TypeKind::Annotation),
            "record_declaration" => self.visit_record(node),
            "field_declaration" | "constant_declaration" => {
                if let Some(owner) = enclosing {
                    self.visit_fields(node, owner, in_interface);
                }
            }
            "method_declaration" | "constructor_declaration" | "annotation_type_element_declaration" => {
                if let Some(owner) = enclosing {
                    self.visit_method(node, owner, in_interface);
                }
            }
            _ => {}
        }
    }

    fn visit_type(&mut self, node: Node, kind: TypeKind) {
        let Some(name) = self.field_text(node, "name") else {
            return;
        };
        let in_interface = matches!(kind, TypeKind::Interface | TypeKind::Annotation);
        let element = TypeElement {
            name: name.clone(),
            kind,
            modifiers: self.modifiers(node, false),
            type_parameters: self.type_parameters(node),
            doc: self.doc_comment(node),
            declaration: self.declaration(node),
        };
        self.members.push(Member::Type(element));

        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        for child in named_children(body) {
            match child.kind() {
                "enum_constant" => self.visit_enum_constant(child, &name),
                "enum_body_declarations" => {
                    for inner in named_children(child) {
                        self.visit(inner, Some(&name), false);
                    }
                }
                _ => self.visit(child, Some(&name), in_interface),
            }
        }
    }

    fn visit_record(&mut self, node: Node) {
        let Some(name) = self.field_text(node, "name") else {
            return;
        };
        let components = node
            .child_by_field_name("parameters")
            .map(|p| self.parameters(p))
            .unwrap_or_default();
        let element = RecordElement {
            name: name.clone(),
            components,
            type_parameters: self.type_parameters(node),
            modifiers: self.modifiers(node, false),
            doc: self.doc_comment(node),
            declaration: self.declaration(node),
        };
        self.members.push(Member::Record(element));

        if let Some(body) = node.child_by_field_name("body") {
            for child in named_children(body) {
                self.visit(child, Some(&name), false);
            }
        }
    }

    fn visit_fields(&mut self, node: Node, owner: &str, in_interface: bool) {
        let mut modifiers = self.modifiers(node, in_interface);
        if in_interface {
            modifiers.is_static = true;
            modifiers.is_final = true;
        }
        let base_type = self.field_text(node, "type").unwrap_or_default();
        let doc = self.doc_comment(node);
        let declaration = self.declaration(node);

        let mut cursor = node.walk();
        let declarators: Vec<Node> = node.children_by_field_name("declarator", &mut cursor).collect();
        for declarator in declarators {
            let Some(name_node) = declarator.child_by_field_name("name") else {
                continue;
            };
            let dims = self.field_text(declarator, "dimensions").unwrap_or_default();
            self.members.push(Member::Field(FieldElement {
                name: self.text(name_node),
                type_name: format!("{}{}", base_type, dims),
                enclosing_type: owner.to_string(),
                modifiers: modifiers.clone(),
                is_enum_constant: false,
                doc: doc.clone(),
                declaration: Declaration {
                    name_range: range_of(name_node),
                    ..declaration.clone()
                },
            }));
        }
    }

    fn visit_enum_constant(&mut self, node: Node, owner: &str) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let doc = self.doc_comment(node);
        self.members.push(Member::Field(FieldElement {
            name: self.text(name_node),
            type_name: owner.to_string(),
            enclosing_type: owner.to_string(),
            modifiers: Modifiers {
                visibility: Visibility::Public,
                is_static: true,
                is_final: true,
                is_abstract: false,
            },
            is_enum_constant: true,
            doc,
            declaration: self.declaration(node),
        }));
    }

    fn visit_method(&mut self, node: Node, owner: &str, in_interface: bool) {
        let Some(name) = self.field_text(node, "name") else {
            return;
        };
        let is_constructor = node.kind() == "constructor_declaration";
        let return_type = if is_constructor {
            None
        } else {
            let base = self.field_text(node, "type").unwrap_or_else(|| "void".to_string());
            let dims = self.field_text(node, "dimensions").unwrap_or_default();
            Some(format!("{}{}", base, dims))
        };
        let parameters = node
            .child_by_field_name("parameters")
            .map(|p| self.parameters(p))
            .unwrap_or_default();
        let thrown_types = named_children(node)
            .into_iter()
            .find(|c| c.kind() == "throws")
            .map(|t| named_children(t).into_iter().map(|n| self.text(n)).collect())
            .unwrap_or_default();

        let type_parameters = self.type_parameters(node);
        let modifiers = self.modifiers(node, in_interface);
        let doc = self.doc_comment(node);
        self.members.push(Member::Method(MethodElement {
            name,
            return_type,
            is_constructor,
            parameters,
            type_parameters,
            thrown_types,
            enclosing_type: owner.to_string(),
            modifiers,
            doc,
            declaration: self.declaration(node),
        }));
    }

    fn package_name(&self, node: Node) -> Option<String> {
        named_children(node)
            .into_iter()
            .find(|c| matches!(c.kind(), "scoped_identifier" | "identifier"))
            .map(|n| self.text(n))
    }

    /// Formal parameters, varargs included, receiver parameters skipped
    fn parameters(&self, node: Node) -> Vec<Parameter> {
        let mut parameters = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "formal_parameter" => {
                    let name = self.field_text(child, "name").unwrap_or_default();
                    let base = self.field_text(child, "type").unwrap_or_default();
                    let dims = self.field_text(child, "dimensions").unwrap_or_default();
                    parameters.push(Parameter::new(name, format!("{}{}", base, dims)));
                }
                "spread_parameter" => {
                    let children = named_children(child);
                    let type_name = children
                        .iter()
                        .find(|c| c.kind() != "modifiers" && c.kind() != "variable_declarator")
                        .map(|c| self.text(*c))
                        .unwrap_or_default();
                    let name = children
                        .iter()
                        .find(|c| c.kind() == "variable_declarator")
                        .and_then(|d| self.field_text(*d, "name"))
                        .unwrap_or_default();
                    parameters.push(Parameter::new(name, format!("{}...", type_name)));
                }
                _ => {}
            }
        }
        parameters
    }

    fn type_parameters(&self, node: Node) -> Vec<String> {
        let Some(list) = node.child_by_field_name("type_parameters") else {
            return Vec::new();
        };
        named_children(list)
            .into_iter()
            .filter(|c| c.kind() == "type_parameter")
            .filter_map(|tp| {
                named_children(tp)
                    .into_iter()
                    .find(|c| matches!(c.kind(), "type_identifier" | "identifier"))
                    .map(|n| self.text(n))
            })
            .collect()
    }

    /// Declared modifiers; interface members default to public
    fn modifiers(&self, node: Node, in_interface: bool) -> Modifiers {
        let mut modifiers = Modifiers {
            visibility: if in_interface {
                Visibility::Public
            } else {
                Visibility::Package
            },
            ..Default::default()
        };
        let Some(list) = children(node).into_iter().find(|c| c.kind() == "modifiers") else {
            return modifiers;
        };
        for token in children(list) {
            match token.kind() {
                "public" => modifiers.visibility = Visibility::Public,
                "protected" => modifiers.visibility = Visibility::Protected,
                "private" => modifiers.visibility = Visibility::Private,
                "static" => modifiers.is_static = true,
                "final" => modifiers.is_final = true,
                "abstract" => modifiers.is_abstract = true,
                _ => {}
            }
        }
        modifiers
    }

    fn declaration(&self, node: Node) -> Declaration {
        let start = node.start_byte();
        let name_range = node
            .child_by_field_name("name")
            .map(range_of)
            .unwrap_or_else(|| SourceRange::new(start, 0));
        Declaration {
            start,
            indent: self.indent_at(start),
            name_range,
        }
    }

    /// Whitespace between the line start and `offset`, empty when code precedes it
    fn indent_at(&self, offset: usize) -> String {
        let before = self.source.get(..offset).unwrap_or("");
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let prefix = &before[line_start..];
        if prefix.chars().all(char::is_whitespace) {
            prefix.to_string()
        } else {
            String::new()
        }
    }

    fn doc_comment(&mut self, node: Node) -> Option<DocComment> {
        let prev = node.prev_sibling()?;
        let doc = match prev.kind() {
            "block_comment" if is_javadoc_block(self.raw(prev)) => Some(self.comment_over(prev, prev)),
            "line_comment" if self.raw(prev).starts_with("///") => {
                let first = self.line_comment_run(prev, |text| text.starts_with("///"));
                Some(self.comment_over(first, prev))
            }
            _ => None,
        }?;
        self.doc_starts.insert(doc.range.offset);
        Some(doc)
    }

    /// Earliest line comment of the contiguous run ending at `last`
    fn line_comment_run<'t>(&self, last: Node<'t>, accept: impl Fn(&str) -> bool) -> Node<'t> {
        let mut first = last;
        while let Some(prev) = first.prev_sibling() {
            let adjacent = prev.kind() == "line_comment"
                && accept(self.raw(prev))
                && prev.end_position().row + 1 >= first.start_position().row;
            if !adjacent {
                break;
            }
            first = prev;
        }
        first
    }

    fn comment_over(&self, first: Node, last: Node) -> DocComment {
        let start = first.start_byte();
        let end = last.end_byte();
        DocComment {
            text: self.source.get(start..end).unwrap_or("").to_string(),
            range: SourceRange::new(start, end - start),
        }
    }

    /// Leading comment of the unit that is not some declaration's doc comment
    fn header(&self, root: Node) -> Option<DocComment> {
        let mut cursor = root.walk();
        let first = root.children(&mut cursor).next()?;
        if self.doc_starts.contains(&first.start_byte()) {
            return None;
        }
        match first.kind() {
            "block_comment" => Some(self.comment_over(first, first)),
            "line_comment" => {
                let mut last = first;
                while let Some(next) = last.next_sibling() {
                    let adjacent = next.kind() == "line_comment"
                        && last.end_position().row + 1 >= next.start_position().row
                        && !self.doc_starts.contains(&next.start_byte());
                    if !adjacent {
                        break;
                    }
                    last = next;
                }
                Some(self.comment_over(first, last))
            }
            _ => None,
        }
    }
}

fn is_javadoc_block(text: &str) -> bool {
    text.starts_with("/**") && text != "/**/"
}

fn range_of(node: Node) -> SourceRange {
    SourceRange::new(node.start_byte(), node.end_byte() - node.start_byte())
}

fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}
