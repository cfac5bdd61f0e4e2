//! Field classification.
//!
//! Derives schema field names, descriptions and roles from described
//! members. Naming follows the accessor convention: `getX` / `isX` with no
//! parameters is a getter for field `x`, `setX` with one parameter is a
//! setter for field `x`. Any explicit name override turns the member into a
//! plain output field.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::native::{ClassInfo, MemberInfo, NativeType};

/// Suffix appended to derived input object names.
pub const INPUT_SUFFIX: &str = "_IN";

static GETTER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:get|is)(?P<name>[A-Z].*)$").expect("Invalid getter regex")
});

static SETTER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^set(?P<name>[A-Z].*)$").expect("Invalid setter regex"));

/// How a member participates in object types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// Readable property; output only, served by a property read.
    Getter,
    /// Writable property; input only.
    Setter,
    /// Any other member; output only, served by an explicit binding.
    Other,
}

/// A classified member.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    /// Schema field name.
    pub name: String,
    /// Schema field description.
    pub description: String,
    pub role: FieldRole,
    /// The member backing the field.
    pub member: Arc<MemberInfo>,
}

impl FieldInfo {
    /// Classifies one member.
    pub fn classify(member: &Arc<MemberInfo>) -> Self {
        let arity = member.params().len();
        let raw = member.name();

        let (mut name, mut role) = if arity == 0
            && let Some(caps) = GETTER_REGEX.captures(raw)
        {
            (decapitalize(&caps["name"]), FieldRole::Getter)
        } else if arity == 1
            && let Some(caps) = SETTER_REGEX.captures(raw)
        {
            (decapitalize(&caps["name"]), FieldRole::Setter)
        } else {
            (raw.to_string(), FieldRole::Other)
        };

        let meta = member.field_meta();
        if let Some(renamed) = meta.name_override() {
            name = renamed.to_string();
            role = FieldRole::Other;
        }
        let description = meta
            .description_override()
            .map_or_else(|| name.clone(), str::to_string);

        Self {
            name,
            description,
            role,
            member: Arc::clone(member),
        }
    }

    /// Native type carried by the field: the parameter type for setters,
    /// the return type otherwise.
    pub fn native_type(&self) -> NativeType {
        match self.role {
            FieldRole::Setter => self
                .member
                .params()
                .first()
                .map_or_else(|| self.member.return_type(), |p| p.native_type()),
            FieldRole::Getter | FieldRole::Other => self.member.return_type(),
        }
    }

    pub fn is_output(&self) -> bool {
        matches!(self.role, FieldRole::Getter | FieldRole::Other)
    }

    pub fn is_input(&self) -> bool {
        self.role == FieldRole::Setter
    }
}

/// Name, description and classified fields of one class in one direction.
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    pub name: String,
    pub description: String,
    fields: Vec<FieldInfo>,
}

impl ObjectInfo {
    /// Classifies `class`. `suffix` is appended to the derived name only;
    /// an explicit type name override is used as is.
    pub fn new(class: &ClassInfo, suffix: &str) -> Self {
        let meta = class.meta();
        let name = meta
            .name_override()
            .map_or_else(|| format!("{}{suffix}", class.simple_name()), str::to_string);
        let description = meta
            .description_override()
            .map_or_else(|| name.clone(), str::to_string);
        let fields = class
            .members()
            .iter()
            .filter(|m| !m.is_skipped())
            .map(FieldInfo::classify)
            .collect();

        Self {
            name,
            description,
            fields,
        }
    }

    /// Fields of the output object type, in declaration order.
    pub fn output_fields(&self) -> impl Iterator<Item = &FieldInfo> {
        self.fields.iter().filter(|f| f.is_output())
    }

    /// Fields of the input object type, in declaration order.
    pub fn input_fields(&self) -> impl Iterator<Item = &FieldInfo> {
        self.fields.iter().filter(|f| f.is_input())
    }
}

fn decapitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Inverse of the getter/setter name derivation: `age` becomes `Age`.
pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{ClassDescriptor, GraphQLObject, Member};

    #[derive(Default)]
    struct Person {
        age: i32,
        active: bool,
    }

    impl GraphQLObject for Person {
        fn describe() -> ClassDescriptor<Self> {
            ClassDescriptor::new()
                .default_constructor()
                .getter("getAge", |p: &Person| p.age)
                .setter("setAge", |p: &mut Person, age: i32| p.age = age)
                .getter("isActive", |p: &Person| p.active)
                .member(Member::method1("getOlder", "years", |p: &Person, y: i32| {
                    p.age + y
                }))
                .member(Member::method0("getSecret", |_: &Person| 42).skip())
                .member(
                    Member::method0("getNickname", |_: &Person| String::from("Bob"))
                        .rename("alias")
                        .description("Preferred name"),
                )
                .member(Member::method0("settle", |_: &Person| true))
        }
    }

    fn person() -> ObjectInfo {
        ObjectInfo::new(&Person::describe().into_info(), "")
    }

    #[test]
    fn test_getter_and_setter_classification() {
        let info = person();
        let age = info.output_fields().find(|f| f.name == "age").unwrap();
        assert_eq!(age.role, FieldRole::Getter);
        assert_eq!(age.description, "age");

        let input: Vec<_> = info.input_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(input, ["age"]);
        assert!(
            info.output_fields()
                .all(|f| f.role != FieldRole::Setter)
        );
    }

    #[test]
    fn test_is_prefix_is_getter() {
        let info = person();
        let active = info.output_fields().find(|f| f.name == "active").unwrap();
        assert_eq!(active.role, FieldRole::Getter);
        assert_eq!(active.native_type(), NativeType::named("bool"));
    }

    #[test]
    fn test_getter_pattern_with_parameters_is_other() {
        let info = person();
        let older = info.output_fields().find(|f| f.name == "getOlder").unwrap();
        assert_eq!(older.role, FieldRole::Other);
    }

    #[test]
    fn test_override_forces_other() {
        let info = person();
        let alias = info.output_fields().find(|f| f.name == "alias").unwrap();
        assert_eq!(alias.role, FieldRole::Other);
        assert_eq!(alias.description, "Preferred name");
    }

    #[test]
    fn test_skip_and_non_accessor_names() {
        let info = person();
        let names: Vec<_> = info.output_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["age", "active", "getOlder", "alias", "settle"]);
    }

    #[test]
    fn test_setter_native_type_is_parameter_type() {
        let info = person();
        let age = info.input_fields().next().unwrap();
        assert_eq!(age.native_type(), NativeType::named("i32"));
    }

    #[test]
    fn test_object_names() {
        let class = Person::describe().into_info();
        assert_eq!(ObjectInfo::new(&class, "").name, "Person");
        let input = ObjectInfo::new(&class, INPUT_SUFFIX);
        assert_eq!(input.name, "Person_IN");
        assert_eq!(input.description, "Person_IN");
    }

    struct Citizen;

    impl GraphQLObject for Citizen {
        fn describe() -> ClassDescriptor<Self> {
            ClassDescriptor::new().name("Human").description("A human")
        }
    }

    #[test]
    fn test_type_name_override_skips_suffix() {
        let class = Citizen::describe().into_info();
        for suffix in ["", INPUT_SUFFIX] {
            let info = ObjectInfo::new(&class, suffix);
            assert_eq!(info.name, "Human");
            assert_eq!(info.description, "A human");
        }
    }

    #[test]
    fn test_name_case_helpers() {
        assert_eq!(decapitalize("FirstName"), "firstName");
        assert_eq!(capitalize("firstName"), "FirstName");
        assert_eq!(capitalize(""), "");
    }
}
