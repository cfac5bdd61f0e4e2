//! Integration tests for schema generation and execution.
//!
//! These tests describe a small domain (people with moods and friends, a
//! clock and a countdown), generate the schema from controllers and run
//! real GraphQL documents against it.

use std::sync::Mutex;

use async_graphql::dynamic::Schema;
use async_graphql::{Request, Variables};
use code1st_graphql::native::{
    ClassDescriptor, EnumDescriptor, EventStream, GraphQLEnum, GraphQLObject, Member, Meta,
    OperationKind, Param,
};
use code1st_graphql::schema::TypeRef;
use code1st_graphql::{SchemaConfig, SchemaError, SchemaGenerator, reflect_enum, reflect_object};
use futures_util::StreamExt;
use serde_json::json;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

// =============================================================================
// Domain
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mood {
    Happy,
    Grumpy,
}

reflect_enum!(Mood);

impl GraphQLEnum for Mood {
    fn describe() -> EnumDescriptor<Self> {
        EnumDescriptor::new()
            .description("How a person feels")
            .constant(Mood::Happy, "HAPPY")
            .constant(Mood::Grumpy, "GRUMPY")
    }
}

#[derive(Debug, Clone, Default)]
struct Person {
    name: String,
    age: i32,
    mood: Option<Mood>,
    friends: Vec<Person>,
}

reflect_object!(Person);

impl GraphQLObject for Person {
    fn describe() -> ClassDescriptor<Self> {
        ClassDescriptor::new()
            .default_constructor()
            .getter("getName", |p: &Person| p.name.clone())
            .getter("getAge", |p: &Person| p.age)
            .getter("isAdult", |p: &Person| p.age >= 18)
            .getter("getMood", |p: &Person| p.mood)
            .getter("getFriends", |p: &Person| p.friends.clone())
            .member(Member::method1(
                "greeting",
                "salutation",
                |p: &Person, salutation: String| format!("{salutation}, {}", p.name),
            ))
            .setter("setName", |p: &mut Person, name: String| p.name = name)
            .setter("setAge", |p: &mut Person, age: i32| p.age = age)
            .setter("setMood", |p: &mut Person, mood: Option<Mood>| p.mood = mood)
            .setter("setFriends", |p: &mut Person, friends: Vec<Person>| {
                p.friends = friends;
            })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("No person named '{0}'")]
struct NotFound(String);

#[derive(Default)]
struct PeopleController {
    people: Mutex<Vec<Person>>,
}

impl PeopleController {
    fn find(&self, name: &str) -> Option<Person> {
        let people = self.people.lock().ok()?;
        people.iter().find(|p| p.name == name).cloned()
    }
}

impl GraphQLObject for PeopleController {
    fn describe() -> ClassDescriptor<Self> {
        ClassDescriptor::new()
            .member(
                Member::method0("people", |c: &PeopleController| {
                    c.people.lock().map(|people| people.to_vec()).unwrap_or_default()
                })
                .query(),
            )
            .member(
                Member::method1("person", "name", |c: &PeopleController, name: String| {
                    c.find(&name)
                })
                .query(),
            )
            .member(
                Member::method1("lookup", "names", |c: &PeopleController, names: Vec<String>| {
                    names.iter().map(|name| c.find(name)).collect::<Vec<_>>()
                })
                .query(),
            )
            .member(
                Member::method1("byMood", "mood", |c: &PeopleController, mood: Mood| {
                    c.people
                        .lock()
                        .map(|people| {
                            people
                                .iter()
                                .filter(|p| p.mood == Some(mood))
                                .cloned()
                                .collect::<Vec<_>>()
                        })
                        .unwrap_or_default()
                })
                .query(),
            )
            .member(
                Member::try_method1(
                    "personOrFail",
                    Param::new("name").description("Exact name"),
                    |c: &PeopleController, name: String| c.find(&name).ok_or(NotFound(name)),
                )
                .query_with(Meta::new().name("mustFind")),
            )
            .member(
                Member::method1("addPerson", "person", |c: &PeopleController, person: Person| {
                    if let Ok(mut people) = c.people.lock() {
                        people.push(person.clone());
                    }
                    person
                })
                .mutation_with(Meta::new().description("Stores a person")),
            )
    }
}

struct ClockController;

impl GraphQLObject for ClockController {
    fn describe() -> ClassDescriptor<Self> {
        ClassDescriptor::new()
            .member(
                Member::method0("epoch", |_: &ClockController| {
                    datetime!(2020-01-01 0:00 UTC)
                })
                .query(),
            )
            .member(
                Member::method1("later", "at", |_: &ClockController, at: OffsetDateTime| {
                    at + Duration::HOUR
                })
                .query(),
            )
            .member(
                Member::method0("population", |_: &ClockController| 8_000_000_000_i64).query(),
            )
            .member(
                Member::method1("after", "n", |_: &ClockController, n: i64| n + 1).query(),
            )
            .member(
                Member::method1("countdown", "from", |_: &ClockController, from: i32| {
                    (0..=from).rev().collect::<EventStream<i32>>()
                })
                .subscription(),
            )
    }
}

mod other {
    use code1st_graphql::native::{ClassDescriptor, GraphQLObject, Member};
    use code1st_graphql::reflect_object;

    pub struct Person;

    reflect_object!(Person);

    impl GraphQLObject for Person {
        fn describe() -> ClassDescriptor<Self> {
            ClassDescriptor::new().getter("getId", |_: &Person| 1)
        }
    }

    pub struct Directory;

    impl GraphQLObject for Directory {
        fn describe() -> ClassDescriptor<Self> {
            ClassDescriptor::new()
                .member(Member::method0("entry", |_: &Directory| Person).query())
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn generator() -> SchemaGenerator {
    let mut generator = SchemaGenerator::new();
    generator
        .add_controller("people", PeopleController::default())
        .unwrap();
    generator.add_controller("clock", ClockController).unwrap();
    generator
}

fn schema() -> Schema {
    generator().build(&SchemaConfig::default()).unwrap()
}

async fn execute(schema: &Schema, query: &str) -> serde_json::Value {
    let response = schema.execute(query).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    response.data.into_json().unwrap()
}

const ADD_ADA: &str = r#"
    mutation {
        addPerson(person: {
            name: "Ada",
            age: 36,
            mood: HAPPY,
            friends: [{ name: "Bob", age: 12, mood: GRUMPY, friends: [] }]
        }) {
            name
            age
            adult
            mood
            friends { name adult mood }
        }
    }
"#;

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_mutation_with_nested_input_object() {
    let schema = schema();
    let data = execute(&schema, ADD_ADA).await;

    assert_eq!(
        data,
        json!({
            "addPerson": {
                "name": "Ada",
                "age": 36,
                "adult": true,
                "mood": "HAPPY",
                "friends": [{ "name": "Bob", "adult": false, "mood": "GRUMPY" }]
            }
        })
    );
}

#[tokio::test]
async fn test_controller_state_and_parent_bound_fields() {
    let schema = schema();
    execute(&schema, ADD_ADA).await;

    let data = execute(
        &schema,
        r#"{ people { name greeting(salutation: "Hi") friends { greeting(salutation: "Yo") } } }"#,
    )
    .await;
    assert_eq!(
        data,
        json!({
            "people": [{
                "name": "Ada",
                "greeting": "Hi, Ada",
                "friends": [{ "greeting": "Yo, Bob" }]
            }]
        })
    );
}

#[tokio::test]
async fn test_optional_result_is_null() {
    let schema = schema();
    let data = execute(&schema, r#"{ person(name: "Nobody") { name } }"#).await;
    assert_eq!(data, json!({ "person": null }));
}

#[tokio::test]
async fn test_member_failure_surfaces_its_message() {
    let schema = schema();
    let response = schema.execute(r#"{ mustFind(name: "Zed") { name } }"#).await;

    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].message, "No person named 'Zed'");
}

#[tokio::test]
async fn test_instant_and_long_scalars() {
    let schema = schema();
    let data = execute(
        &schema,
        r#"{ epoch later(at: "2020-01-01T01:00:00+01:00") population }"#,
    )
    .await;

    assert_eq!(
        data,
        json!({
            "epoch": "2020-01-01T00:00:00Z",
            "later": "2020-01-01T01:00:00Z",
            "population": 8_000_000_000_i64
        })
    );
}

#[tokio::test]
async fn test_malformed_instant_literal_is_rejected() {
    let schema = schema();
    let response = schema.execute(r#"{ later(at: "yesterday") }"#).await;
    assert!(!response.errors.is_empty());
}

#[tokio::test]
async fn test_subscription_stream() {
    let schema = schema();
    let values: Vec<_> = schema
        .execute_stream("subscription { countdown(from: 2) }")
        .map(|response| {
            assert!(response.errors.is_empty(), "{:?}", response.errors);
            response.data.into_json().unwrap()["countdown"].clone()
        })
        .collect()
        .await;

    assert_eq!(values, [json!(2), json!(1), json!(0)]);
}

#[tokio::test]
async fn test_null_list_items_resolve_without_errors() {
    let schema = schema();
    execute(&schema, ADD_ADA).await;

    let data = execute(
        &schema,
        r#"{ lookup(names: ["Nobody", "Ada"]) { name mood greeting(salutation: "Hi") } }"#,
    )
    .await;
    assert_eq!(
        data,
        json!({
            "lookup": [
                null,
                { "name": "Ada", "mood": "HAPPY", "greeting": "Hi, Ada" }
            ]
        })
    );
}

#[tokio::test]
async fn test_input_object_and_enum_variables() {
    let schema = schema();
    let request = Request::new(
        "mutation($person: Person_IN) { addPerson(person: $person) { name mood friends { name } } }",
    )
    .variables(Variables::from_json(json!({
        "person": {
            "name": "Cy",
            "age": 50,
            "mood": "GRUMPY",
            "friends": [{ "name": "Di", "age": 9, "mood": null, "friends": [] }]
        }
    })));
    let response = schema.execute(request).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(
        response.data.into_json().unwrap(),
        json!({ "addPerson": { "name": "Cy", "mood": "GRUMPY", "friends": [{ "name": "Di" }] } })
    );

    let request = Request::new("query($mood: Mood) { byMood(mood: $mood) { name } }")
        .variables(Variables::from_json(json!({ "mood": "GRUMPY" })));
    let response = schema.execute(request).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(
        response.data.into_json().unwrap(),
        json!({ "byMood": [{ "name": "Cy" }] })
    );
}

#[tokio::test]
async fn test_custom_scalar_variables() {
    let schema = schema();
    let request = Request::new("query($at: Instant, $n: Long) { later(at: $at) after(n: $n) }")
        .variables(Variables::from_json(json!({
            "at": "2020-06-01T12:00:00-02:00",
            "n": "9000000000"
        })));
    let response = schema.execute(request).await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(
        response.data.into_json().unwrap(),
        json!({ "later": "2020-06-01T15:00:00Z", "after": 9_000_000_001_i64 })
    );
}

#[test]
fn test_generated_graph() {
    let graph = generator().generate().unwrap();

    let person = graph.object("Person").unwrap();
    let names: Vec<_> = person.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["name", "age", "adult", "mood", "friends", "greeting"]);
    assert_eq!(
        person.field("friends").unwrap().type_ref,
        TypeRef::list(TypeRef::Reference("Person".into()))
    );
    assert!(person.field("greeting").unwrap().accessor.is_none());
    assert!(graph.resolver("Person", "greeting").is_some());

    let input = graph.input_object("Person_IN").unwrap();
    let names: Vec<_> = input.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["name", "age", "mood", "friends"]);

    let mutation = graph.root(OperationKind::Mutation).unwrap();
    let add = mutation.field("addPerson").unwrap();
    assert_eq!(add.description, "Stores a person");
    assert_eq!(add.arguments[0].type_ref, TypeRef::Defined("Person_IN".into()));

    let must_find = graph.root(OperationKind::Query).unwrap().field("mustFind").unwrap();
    assert_eq!(must_find.arguments[0].description, "Exact name");
}

#[test]
fn test_sdl_contains_generated_types() {
    let sdl = schema().sdl();

    for expected in [
        "type Person {",
        "input Person_IN {",
        "enum Mood {",
        "scalar Instant",
        "scalar Long",
        "type Query {",
        "type Mutation {",
        "type Subscription {",
    ] {
        assert!(sdl.contains(expected), "missing `{expected}` in:\n{sdl}");
    }
}

#[test]
fn test_naming_conflict_across_controllers() {
    let mut generator = generator();
    let err = generator
        .add_controller("directory", other::Directory)
        .unwrap_err();

    assert!(matches!(
        err,
        SchemaError::NamingConflict { ref name, .. } if name == "Person"
    ));
    assert_eq!(err.error_code(), "NAMING_CONFLICT");
}
