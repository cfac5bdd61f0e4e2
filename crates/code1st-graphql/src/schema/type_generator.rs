//! Type resolver and object type generators.
//!
//! One [`TypeGenerator`] owns both directions (input and output) together
//! with the [`TypeRegistry`] and the arena of generated types, so the object
//! generators can recurse into the resolver without any shared ownership.
//!
//! Resolution priority is fixed: list, enum, scalar, object.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use super::fields::{FieldInfo, FieldRole, INPUT_SUFFIX, ObjectInfo};
use super::graph::{
    ArgumentDescriptor, EnumType, FieldCoordinates, FieldDescriptor, InputFieldDescriptor,
    InputObjectType, ObjectType, TypeDescriptor, TypeRef,
};
use super::registry::TypeRegistry;
use crate::error::SchemaError;
use crate::native::{ClassRef, EnumRef, LIST_TYPE, NativeType, ParamInfo, STREAM_TYPE};
use crate::resolvers::ResolverBinding;
use crate::types::ScalarKind;

/// Direction a native type is resolved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// Generates schema types from native types.
#[derive(Default)]
pub struct TypeGenerator {
    registry: TypeRegistry,
    types: IndexMap<String, TypeDescriptor>,
    /// Bindings for object fields that are not plain getters.
    bindings: HashMap<FieldCoordinates, Arc<ResolverBinding>>,
}

impl TypeGenerator {
    /// Creates a generator with an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a type used as a field result.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnsupportedType`] when no generator matches and
    /// [`SchemaError::NamingConflict`] when two native types claim one name.
    pub fn generate_output_type(&mut self, native: &NativeType) -> Result<TypeRef, SchemaError> {
        self.resolve(native, Direction::Output)
    }

    /// Resolves a type used as an argument or input field.
    ///
    /// # Errors
    ///
    /// Same as [`TypeGenerator::generate_output_type`].
    pub fn generate_input_type(&mut self, native: &NativeType) -> Result<TypeRef, SchemaError> {
        self.resolve(native, Direction::Input)
    }

    /// Resolves the return type of a subscription member.
    ///
    /// The native type must be `EventStream<T>`; only `T` is resolved, the
    /// stream wrapper has no schema representation.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnsupportedType`] for any other native type, plus the
    /// errors of [`TypeGenerator::generate_output_type`] for `T`.
    pub fn generate_subscription_type(
        &mut self,
        native: &NativeType,
    ) -> Result<TypeRef, SchemaError> {
        match native {
            NativeType::Generic { raw, args } if *raw == STREAM_TYPE => match args.as_slice() {
                [element] => self.resolve(element, Direction::Output),
                _ => Err(SchemaError::UnsupportedType(format!(
                    "{} ({STREAM_TYPE} must have exactly one type parameter)",
                    native.type_name()
                ))),
            },
            _ => Err(SchemaError::UnsupportedType(native.type_name())),
        }
    }

    /// Resolves the arguments of a member from its parameters.
    ///
    /// # Errors
    ///
    /// Same as [`TypeGenerator::generate_input_type`], plus
    /// [`SchemaError::DuplicateField`] when two parameters share a name.
    pub fn generate_arguments(
        &mut self,
        owner: &str,
        params: &[ParamInfo],
    ) -> Result<Vec<ArgumentDescriptor>, SchemaError> {
        let mut seen = HashSet::new();
        let mut arguments = Vec::with_capacity(params.len());
        for param in params {
            let meta = param.meta();
            let name = meta.name_override().unwrap_or(param.name()).to_string();
            if !seen.insert(name.clone()) {
                return Err(SchemaError::DuplicateField {
                    type_name: owner.to_string(),
                    field: name,
                });
            }
            let description = meta
                .description_override()
                .map_or_else(|| name.clone(), str::to_string);
            let type_ref = self.resolve(&param.native_type(), Direction::Input)?;
            arguments.push(ArgumentDescriptor {
                name,
                description,
                type_ref,
            });
        }
        Ok(arguments)
    }

    /// Resolves a native type in the given direction.
    ///
    /// # Errors
    ///
    /// Same as [`TypeGenerator::generate_output_type`].
    pub fn resolve(
        &mut self,
        native: &NativeType,
        direction: Direction,
    ) -> Result<TypeRef, SchemaError> {
        match native {
            NativeType::Generic { raw, args } => self.generate_list(native, raw, args, direction),
            NativeType::Enum(enum_ref) => self.generate_enum(enum_ref),
            NativeType::Named(_) => ScalarKind::for_native(native)
                .map(TypeRef::Scalar)
                .ok_or_else(|| SchemaError::UnsupportedType(native.type_name())),
            NativeType::Class(class_ref) => match direction {
                Direction::Output => self.generate_output_object(class_ref),
                Direction::Input => self.generate_input_object(class_ref),
            },
        }
    }

    fn generate_list(
        &mut self,
        native: &NativeType,
        raw: &str,
        args: &[NativeType],
        direction: Direction,
    ) -> Result<TypeRef, SchemaError> {
        if raw != LIST_TYPE {
            return Err(SchemaError::UnsupportedType(native.type_name()));
        }
        match args {
            [element] => Ok(TypeRef::list(self.resolve(element, direction)?)),
            _ => Err(SchemaError::UnsupportedType(format!(
                "{} ({LIST_TYPE} must have exactly one type parameter)",
                native.type_name()
            ))),
        }
    }

    fn generate_enum(&mut self, enum_ref: &EnumRef) -> Result<TypeRef, SchemaError> {
        let info = enum_ref.describe();
        let meta = info.meta();
        let name = meta
            .name_override()
            .map_or_else(|| info.simple_name().to_string(), str::to_string);

        if self.registry.is_defined_type(&name, enum_ref.origin())? {
            trace!(type_name = %name, "Enum already defined, emitting reference");
            return Ok(TypeRef::Reference(name));
        }

        let description = meta
            .description_override()
            .map_or_else(|| name.clone(), str::to_string);
        debug!(type_name = %name, values = info.values().len(), "Generated enum type");
        self.types.insert(
            name.clone(),
            TypeDescriptor::Enum(EnumType {
                name: name.clone(),
                description,
                values: info.values().to_vec(),
            }),
        );
        Ok(TypeRef::Defined(name))
    }

    fn generate_output_object(&mut self, class_ref: &ClassRef) -> Result<TypeRef, SchemaError> {
        let class = class_ref.describe();
        let info = ObjectInfo::new(&class, "");

        if self.registry.is_defined_type(&info.name, class_ref.origin())? {
            trace!(type_name = %info.name, "Object already defined, emitting reference");
            return Ok(TypeRef::Reference(info.name));
        }

        let mut object = ObjectType::new(&info.name, &info.description);
        for field in info.output_fields() {
            check_unique(&object.name, &field.name, object.field(&field.name).is_some())?;
            let descriptor = self.generate_output_field(&object.name, field)?;
            object.fields.push(descriptor);
        }

        debug!(
            type_name = %object.name,
            fields = object.fields.len(),
            "Generated object type"
        );
        let name = object.name.clone();
        self.types
            .insert(name.clone(), TypeDescriptor::Object(object));
        Ok(TypeRef::Defined(name))
    }

    fn generate_output_field(
        &mut self,
        owner: &str,
        field: &FieldInfo,
    ) -> Result<FieldDescriptor, SchemaError> {
        let type_ref = self.resolve(&field.native_type(), Direction::Output)?;
        let arguments = self.generate_arguments(owner, field.member.params())?;

        let accessor = if field.role == FieldRole::Getter {
            Some(Arc::clone(&field.member))
        } else {
            let binding = ResolverBinding::parent(Arc::clone(&field.member), arguments.clone());
            self.bindings
                .insert(FieldCoordinates::new(owner, &field.name), Arc::new(binding));
            None
        };

        Ok(FieldDescriptor {
            name: field.name.clone(),
            description: field.description.clone(),
            type_ref,
            arguments,
            accessor,
        })
    }

    fn generate_input_object(&mut self, class_ref: &ClassRef) -> Result<TypeRef, SchemaError> {
        let class = Arc::new(class_ref.describe());
        let info = ObjectInfo::new(&class, INPUT_SUFFIX);

        if self.registry.is_defined_type(&info.name, class_ref.origin())? {
            trace!(type_name = %info.name, "Input object already defined, emitting reference");
            return Ok(TypeRef::Reference(info.name));
        }

        let mut fields: Vec<InputFieldDescriptor> = Vec::new();
        for field in info.input_fields() {
            check_unique(
                &info.name,
                &field.name,
                fields.iter().any(|f| f.name == field.name),
            )?;
            let type_ref = self.resolve(&field.native_type(), Direction::Input)?;
            fields.push(InputFieldDescriptor {
                name: field.name.clone(),
                description: field.description.clone(),
                type_ref,
            });
        }

        debug!(
            type_name = %info.name,
            fields = fields.len(),
            "Generated input object type"
        );
        self.types.insert(
            info.name.clone(),
            TypeDescriptor::InputObject(InputObjectType {
                name: info.name.clone(),
                description: info.description,
                fields,
                class,
            }),
        );
        Ok(TypeRef::Defined(info.name))
    }

    /// Returns the registry of emitted type names.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Looks up a generated named type.
    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    /// Hands over generated types and object field bindings.
    pub(crate) fn into_parts(
        self,
    ) -> (
        IndexMap<String, TypeDescriptor>,
        HashMap<FieldCoordinates, Arc<ResolverBinding>>,
    ) {
        (self.types, self.bindings)
    }
}

fn check_unique(type_name: &str, field: &str, exists: bool) -> Result<(), SchemaError> {
    if exists {
        Err(SchemaError::DuplicateField {
            type_name: type_name.to_string(),
            field: field.to_string(),
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{
        ClassDescriptor, EnumDescriptor, EventStream, GraphQLEnum, GraphQLObject, Member, Reflect,
    };
    use crate::{reflect_enum, reflect_object};

    #[derive(Default)]
    struct Person {
        name: String,
        friends: Vec<Person>,
        mood: Option<Mood>,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Mood {
        Happy,
        Grumpy,
    }

    reflect_object!(Person);
    reflect_enum!(Mood);

    impl GraphQLObject for Person {
        fn describe() -> ClassDescriptor<Self> {
            ClassDescriptor::new()
                .default_constructor()
                .getter("getName", |p: &Person| p.name.clone())
                .setter("setName", |p: &mut Person, name: String| p.name = name)
                .getter("getFriends", |p: &Person| {
                    p.friends
                        .iter()
                        .map(|f| Person {
                            name: f.name.clone(),
                            ..Person::default()
                        })
                        .collect::<Vec<_>>()
                })
                .getter("getMood", |p: &Person| p.mood)
                .member(Member::method1("greet", "greeting", |p: &Person, g: String| {
                    format!("{g} {}", p.name)
                }))
        }
    }

    impl GraphQLEnum for Mood {
        fn describe() -> EnumDescriptor<Self> {
            EnumDescriptor::new()
                .constant(Mood::Happy, "HAPPY")
                .constant(Mood::Grumpy, "GRUMPY")
        }
    }

    mod other {
        use crate::native::{ClassDescriptor, GraphQLObject};

        pub struct Person;

        impl GraphQLObject for Person {
            fn describe() -> ClassDescriptor<Self> {
                ClassDescriptor::new()
            }
        }

        crate::reflect_object!(Person);
    }

    struct Duplicated;

    impl GraphQLObject for Duplicated {
        fn describe() -> ClassDescriptor<Self> {
            ClassDescriptor::new()
                .getter("getValue", |_: &Duplicated| 1)
                .member(Member::method0("value", |_: &Duplicated| 2))
        }
    }

    reflect_object!(Duplicated);

    #[derive(Default)]
    struct Citizen {
        temper: Option<Temper>,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Temper {
        Calm,
    }

    reflect_object!(Citizen);
    reflect_enum!(Temper);

    impl GraphQLObject for Citizen {
        fn describe() -> ClassDescriptor<Self> {
            ClassDescriptor::new()
                .name("Human")
                .description("A human")
                .default_constructor()
                .getter("getTemper", |c: &Citizen| c.temper)
                .setter("setTemper", |c: &mut Citizen, t: Option<Temper>| c.temper = t)
        }
    }

    impl GraphQLEnum for Temper {
        fn describe() -> EnumDescriptor<Self> {
            EnumDescriptor::new()
                .name("Feeling")
                .constant(Temper::Calm, "CALM")
        }
    }

    #[test]
    fn test_scalar_resolution() {
        let mut generator = TypeGenerator::new();
        assert_eq!(
            generator.generate_output_type(&i64::native_type()).unwrap(),
            TypeRef::Scalar(ScalarKind::Long)
        );
        assert_eq!(
            generator
                .generate_input_type(&<Vec<String>>::native_type())
                .unwrap(),
            TypeRef::list(TypeRef::Scalar(ScalarKind::String))
        );
        assert!(generator.registry().is_empty());
    }

    #[test]
    fn test_output_and_input_objects_are_distinct() {
        let mut generator = TypeGenerator::new();
        let output = generator
            .generate_output_type(&Person::native_type())
            .unwrap();
        let input = generator
            .generate_input_type(&Person::native_type())
            .unwrap();

        assert_eq!(output, TypeRef::Defined("Person".into()));
        assert_eq!(input, TypeRef::Defined("Person_IN".into()));
        assert!(matches!(
            generator.get("Person_IN"),
            Some(TypeDescriptor::InputObject(t)) if t.fields.len() == 1 && t.fields[0].name == "name"
        ));
    }

    #[test]
    fn test_cyclic_field_is_forward_reference() {
        let mut generator = TypeGenerator::new();
        generator
            .generate_output_type(&Person::native_type())
            .unwrap();

        let Some(TypeDescriptor::Object(person)) = generator.get("Person") else {
            panic!("Person not generated");
        };
        let friends = person.field("friends").unwrap();
        assert_eq!(
            friends.type_ref,
            TypeRef::list(TypeRef::Reference("Person".into()))
        );
        assert!(friends.accessor.is_some());
    }

    #[test]
    fn test_repeat_generation_returns_reference() {
        let mut generator = TypeGenerator::new();
        generator
            .generate_output_type(&Person::native_type())
            .unwrap();
        assert_eq!(
            generator
                .generate_output_type(&Person::native_type())
                .unwrap(),
            TypeRef::Reference("Person".into())
        );
    }

    #[test]
    fn test_enum_is_shared_between_directions() {
        let mut generator = TypeGenerator::new();
        assert_eq!(
            generator.generate_output_type(&Mood::native_type()).unwrap(),
            TypeRef::Defined("Mood".into())
        );
        assert_eq!(
            generator.generate_input_type(&Mood::native_type()).unwrap(),
            TypeRef::Reference("Mood".into())
        );
        let Some(TypeDescriptor::Enum(mood)) = generator.get("Mood") else {
            panic!("Mood not generated");
        };
        assert_eq!(mood.values.len(), 2);
        assert_eq!(mood.description, "Mood");
    }

    #[test]
    fn test_method_field_gets_parent_binding() {
        let mut generator = TypeGenerator::new();
        generator
            .generate_output_type(&Person::native_type())
            .unwrap();

        let Some(TypeDescriptor::Object(person)) = generator.get("Person") else {
            panic!("Person not generated");
        };
        let greet = person.field("greet").unwrap();
        assert!(greet.accessor.is_none());
        assert_eq!(greet.arguments[0].name, "greeting");

        let (_, bindings) = generator.into_parts();
        assert!(bindings.contains_key(&FieldCoordinates::new("Person", "greet")));
        assert!(!bindings.contains_key(&FieldCoordinates::new("Person", "name")));
    }

    #[test]
    fn test_naming_conflict() {
        let mut generator = TypeGenerator::new();
        generator
            .generate_output_type(&Person::native_type())
            .unwrap();
        let err = generator
            .generate_output_type(&other::Person::native_type())
            .unwrap_err();
        assert!(matches!(err, SchemaError::NamingConflict { .. }));
    }

    #[test]
    fn test_unsupported_types() {
        let mut generator = TypeGenerator::new();

        let raw_list = NativeType::generic(LIST_TYPE, Vec::new());
        assert!(matches!(
            generator.generate_output_type(&raw_list),
            Err(SchemaError::UnsupportedType(_))
        ));

        let map = NativeType::generic("HashMap", vec![String::native_type(), i32::native_type()]);
        assert!(matches!(
            generator.generate_input_type(&map),
            Err(SchemaError::UnsupportedType(name)) if name == "HashMap<String, i32>"
        ));

        assert!(matches!(
            generator.generate_output_type(&NativeType::named("u8")),
            Err(SchemaError::UnsupportedType(name)) if name == "u8"
        ));
    }

    #[test]
    fn test_subscription_type_unwraps_stream() {
        let mut generator = TypeGenerator::new();
        assert_eq!(
            generator
                .generate_subscription_type(&<EventStream<i32>>::native_type())
                .unwrap(),
            TypeRef::Scalar(ScalarKind::Int)
        );
        assert!(matches!(
            generator.generate_subscription_type(&i32::native_type()),
            Err(SchemaError::UnsupportedType(_))
        ));
        assert!(matches!(
            generator.generate_subscription_type(&NativeType::generic(STREAM_TYPE, Vec::new())),
            Err(SchemaError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_duplicate_field() {
        let mut generator = TypeGenerator::new();
        let err = generator
            .generate_output_type(&Duplicated::native_type())
            .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::DuplicateField { type_name, field } if type_name == "Duplicated" && field == "value"
        ));
    }

    #[test]
    fn test_class_name_override_in_both_directions() {
        let mut generator = TypeGenerator::new();
        assert_eq!(
            generator.generate_output_type(&Citizen::native_type()).unwrap(),
            TypeRef::Defined("Human".into())
        );
        assert!(matches!(
            generator.get("Human"),
            Some(TypeDescriptor::Object(t)) if t.description == "A human"
        ));

        let mut generator = TypeGenerator::new();
        assert_eq!(
            generator.generate_input_type(&Citizen::native_type()).unwrap(),
            TypeRef::Defined("Human".into())
        );
        assert!(generator.get("Human_IN").is_none());
        assert!(matches!(
            generator.get("Human"),
            Some(TypeDescriptor::InputObject(t)) if t.description == "A human" && t.fields[0].name == "temper"
        ));
    }

    #[test]
    fn test_enum_name_override() {
        let mut generator = TypeGenerator::new();
        generator
            .generate_output_type(&Citizen::native_type())
            .unwrap();

        let Some(TypeDescriptor::Object(human)) = generator.get("Human") else {
            panic!("Human not generated");
        };
        assert_eq!(
            human.field("temper").unwrap().type_ref,
            TypeRef::Defined("Feeling".into())
        );
        assert!(generator.get("Temper").is_none());
        assert!(matches!(
            generator.get("Feeling"),
            Some(TypeDescriptor::Enum(e)) if e.description == "Feeling" && e.values[0].label == "CALM"
        ));
    }
}
