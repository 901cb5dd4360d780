//! @acp:module "Conventions"
//! @acp:summary "Java naming conventions: phrases and accessor detection"
//! @acp:domain cli
//! @acp:layer analysis
//!
//! # Conventions
//!
//! Two pieces of Java naming knowledge live here:
//! - [`naming`] turns identifiers into phrases (`numberOfQuestions` →
//!   `number of questions`)
//! - [`AccessorResolver`] recognizes getters and setters and finds the field
//!   they expose
//!
//! ## Accessor Detection
//!
//! The bean convention resolver:
//! 1. Requires a `get`, `is` or `set` prefix followed by an uppercase letter
//! 2. Decapitalizes the remainder (`getURL` stays `URL`, `getName` → `name`)
//! 3. Looks the field up in the method's enclosing type
//! 4. Checks the signature shape (no-arg getter, single-arg void setter) and
//!    that the types line up

pub mod naming;

pub use naming::{
    apply_case, is_acronym, is_constant_name, split_identifier, CaseMode, NameScope,
    PhraseConverter, PhraseOptions,
};

use crate::element::{simple_type_name, FieldElement, MethodElement};

/// @acp:summary "Kind of accessor a method is"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Getter,
    BooleanGetter,
    Setter,
}

impl AccessorKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            AccessorKind::Getter => "get",
            AccessorKind::BooleanGetter => "is",
            AccessorKind::Setter => "set",
        }
    }

    pub fn is_setter(&self) -> bool {
        matches!(self, AccessorKind::Setter)
    }
}

/// @acp:summary "A method resolved to the field it exposes"
#[derive(Debug, Clone, Copy)]
pub struct Accessor<'a> {
    pub kind: AccessorKind,
    pub field: &'a FieldElement,
}

/// Trait for accessor resolution implementations
pub trait AccessorResolver: Send + Sync {
    /// Resolve `method` against the fields of its compilation unit
    fn resolve<'a>(&self, method: &MethodElement, fields: &'a [FieldElement]) -> Option<Accessor<'a>>;
}

/// JavaBeans naming rules
#[derive(Debug, Default, Clone, Copy)]
pub struct BeanConventions;

impl BeanConventions {
    pub fn new() -> Self {
        Self
    }
}

impl AccessorResolver for BeanConventions {
    fn resolve<'a>(&self, method: &MethodElement, fields: &'a [FieldElement]) -> Option<Accessor<'a>> {
        if method.is_constructor {
            return None;
        }
        let (kind, property) = accessor_property(&method.name)?;

        let shape_ok = match kind {
            AccessorKind::Getter => method.parameters.is_empty() && !method.is_void(),
            AccessorKind::BooleanGetter => {
                method.parameters.is_empty()
                    && matches!(method.return_type.as_deref(), Some("boolean") | Some("Boolean"))
            }
            AccessorKind::Setter => method.parameters.len() == 1 && method.is_void(),
        };
        if !shape_ok {
            return None;
        }

        let candidates = fields
            .iter()
            .filter(|f| f.enclosing_type == method.enclosing_type && !f.is_enum_constant);

        let field = candidates.clone().find(|f| f.name == property).or_else(|| {
            // `isActive()` may expose a field literally named `isActive`
            if kind == AccessorKind::BooleanGetter {
                candidates.clone().find(|f| f.name == method.name)
            } else {
                candidates.clone().find(|f| f.name.eq_ignore_ascii_case(&property))
            }
        })?;

        let accessed_type = match kind {
            AccessorKind::Setter => method.parameters[0].type_name.as_str(),
            _ => method.return_type.as_deref()?,
        };
        types_match(accessed_type, &field.type_name).then_some(Accessor { kind, field })
    }
}

/// Split an accessor name into its kind and decapitalized property name
pub fn accessor_property(method_name: &str) -> Option<(AccessorKind, String)> {
    let (kind, rest) = if let Some(rest) = method_name.strip_prefix("get") {
        (AccessorKind::Getter, rest)
    } else if let Some(rest) = method_name.strip_prefix("set") {
        (AccessorKind::Setter, rest)
    } else if let Some(rest) = method_name.strip_prefix("is") {
        (AccessorKind::BooleanGetter, rest)
    } else {
        return None;
    };

    if !rest.chars().next().map(|c| c.is_uppercase()).unwrap_or(false) {
        return None;
    }
    Some((kind, decapitalize(rest)))
}

/// `Name` → `name`, but `URL` stays `URL`
pub fn decapitalize(name: &str) -> String {
    apply_case(name, CaseMode::FirstLower)
}

/// Constructor parameter that initializes a field of the same name and type
pub fn field_for_parameter<'a>(
    method: &MethodElement,
    parameter_name: &str,
    fields: &'a [FieldElement],
) -> Option<&'a FieldElement> {
    if !method.is_constructor {
        return None;
    }
    let parameter = method.parameters.iter().find(|p| p.name == parameter_name)?;
    fields.iter().find(|f| {
        f.enclosing_type == method.enclosing_type
            && f.name == parameter.name
            && types_match(&parameter.type_name, &f.type_name)
    })
}

fn types_match(a: &str, b: &str) -> bool {
    let strip = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    strip(a) == strip(b) || simple_type_name(a) == simple_type_name(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Declaration, Modifiers, Parameter};

    fn field(name: &str, type_name: &str) -> FieldElement {
        FieldElement {
            name: name.to_string(),
            type_name: type_name.to_string(),
            enclosing_type: "Quiz".to_string(),
            modifiers: Modifiers::default(),
            is_enum_constant: false,
            doc: None,
            declaration: Declaration::default(),
        }
    }

    fn method(name: &str, ret: &str, params: Vec<Parameter>) -> MethodElement {
        MethodElement {
            name: name.to_string(),
            return_type: Some(ret.to_string()),
            is_constructor: false,
            parameters: params,
            type_parameters: vec![],
            thrown_types: vec![],
            enclosing_type: "Quiz".to_string(),
            modifiers: Modifiers::default(),
            doc: None,
            declaration: Declaration::default(),
        }
    }

    #[test]
    fn test_accessor_property() {
        assert_eq!(
            accessor_property("getNumberOfQuestions"),
            Some((AccessorKind::Getter, "numberOfQuestions".to_string()))
        );
        assert_eq!(accessor_property("getURL"), Some((AccessorKind::Getter, "URL".to_string())));
        assert_eq!(accessor_property("settle"), None);
        assert_eq!(accessor_property("island"), None);
    }

    #[test]
    fn test_resolve_getter_and_setter() {
        let fields = vec![field("numberOfQuestions", "int"), field("active", "boolean")];
        let resolver = BeanConventions::new();

        let getter = method("getNumberOfQuestions", "int", vec![]);
        let accessor = resolver.resolve(&getter, &fields).unwrap();
        assert_eq!(accessor.kind, AccessorKind::Getter);
        assert_eq!(accessor.field.name, "numberOfQuestions");

        let setter = method("setNumberOfQuestions", "void", vec![Parameter::new("n", "int")]);
        assert!(resolver.resolve(&setter, &fields).unwrap().kind.is_setter());

        let is = method("isActive", "boolean", vec![]);
        assert_eq!(resolver.resolve(&is, &fields).unwrap().field.name, "active");
    }

    #[test]
    fn test_resolve_rejects_mismatches() {
        let fields = vec![field("numberOfQuestions", "int")];
        let resolver = BeanConventions::new();

        assert!(resolver.resolve(&method("getNumberOfQuestions", "String", vec![]), &fields).is_none());
        assert!(resolver.resolve(&method("getMissing", "int", vec![]), &fields).is_none());
        assert!(resolver
            .resolve(&method("setNumberOfQuestions", "int", vec![Parameter::new("n", "int")]), &fields)
            .is_none());
    }

    #[test]
    fn test_field_for_constructor_parameter() {
        let fields = vec![field("size", "int")];
        let mut ctor = method("Quiz", "void", vec![Parameter::new("size", "int")]);
        ctor.return_type = None;
        ctor.is_constructor = true;
        assert_eq!(field_for_parameter(&ctor, "size", &fields).unwrap().name, "size");
        assert!(field_for_parameter(&ctor, "other", &fields).is_none());
    }
}
