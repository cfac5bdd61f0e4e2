//! Class descriptions.
//!
//! A domain class describes itself once through [`GraphQLObject::describe`]:
//! its type-level metadata, an optional no-argument constructor and the
//! ordered list of members the schema may expose. The typed builders erase
//! into [`ClassInfo`] / [`MemberInfo`], which is all the schema generator and
//! the resolvers ever see.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::types::{NativeOrigin, NativeType, Reflect, simple_name};
use super::value::{AnyObject, NativeObject, NativeValue};
use crate::error::{BoxError, ResolveError};

/// Optional `name` / `description` override attached to a type, member,
/// parameter or operation. An empty string means "not overridden".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Meta {
    name: String,
    description: String,
}

impl Meta {
    /// Metadata with no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name override.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the description override.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The name override, if one is set.
    #[must_use]
    pub fn name_override(&self) -> Option<&str> {
        (!self.name.is_empty()).then_some(self.name.as_str())
    }

    /// The description override, if one is set.
    #[must_use]
    pub fn description_override(&self) -> Option<&str> {
        (!self.description.is_empty()).then_some(self.description.as_str())
    }
}

/// Root operation a member is exposed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    /// Name of the root object type.
    #[must_use]
    pub fn root_name(self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Mutation => "Mutation",
            Self::Subscription => "Subscription",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.root_name())
    }
}

/// A member parameter: its own name plus optional overrides.
#[derive(Debug, Clone)]
pub struct Param {
    name: String,
    meta: Meta,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            meta: Meta::default(),
        }
    }

    /// Overrides the argument name.
    #[must_use]
    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.meta = self.meta.name(name);
        self
    }

    /// Overrides the argument description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.meta = self.meta.description(description);
        self
    }

    fn erase<A: Reflect>(self) -> ParamInfo {
        ParamInfo {
            name: self.name,
            meta: self.meta,
            native_type: A::native_type,
        }
    }
}

impl From<&str> for Param {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Erased parameter description.
#[derive(Clone)]
pub struct ParamInfo {
    name: String,
    meta: Meta,
    native_type: fn() -> NativeType,
}

impl ParamInfo {
    /// The parameter's own name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Declared parameter type.
    #[must_use]
    pub fn native_type(&self) -> NativeType {
        (self.native_type)()
    }
}

impl fmt::Debug for ParamInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamInfo")
            .field("name", &self.name)
            .field("meta", &self.meta)
            .field("native_type", &self.native_type())
            .finish()
    }
}

type SharedFn =
    dyn Fn(&AnyObject, Vec<NativeValue>) -> Result<NativeValue, ResolveError> + Send + Sync;
type MutableFn =
    dyn Fn(&mut AnyObject, Vec<NativeValue>) -> Result<NativeValue, ResolveError> + Send + Sync;
type ConstructorFn = dyn Fn() -> Result<Box<AnyObject>, BoxError> + Send + Sync;

/// Erased member call.
#[derive(Clone)]
pub enum Invoker {
    /// Takes the receiver by shared reference (methods, getters).
    Shared(Arc<SharedFn>),
    /// Takes the receiver by mutable reference (setters).
    Mutable(Arc<MutableFn>),
}

/// Erased member description.
pub struct MemberInfo {
    name: String,
    params: Vec<ParamInfo>,
    return_type: fn() -> NativeType,
    field: Meta,
    skip: bool,
    operations: Vec<(OperationKind, Meta)>,
    invoker: Invoker,
}

impl MemberInfo {
    /// Raw member name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn params(&self) -> &[ParamInfo] {
        &self.params
    }

    /// Declared return type.
    #[must_use]
    pub fn return_type(&self) -> NativeType {
        (self.return_type)()
    }

    /// Field-level override metadata.
    #[must_use]
    pub fn field_meta(&self) -> &Meta {
        &self.field
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.skip
    }

    /// Operation markers, in declaration order.
    #[must_use]
    pub fn operations(&self) -> &[(OperationKind, Meta)] {
        &self.operations
    }

    /// True when the member needs a mutable receiver.
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        matches!(self.invoker, Invoker::Mutable(_))
    }

    /// Invokes the member on a shared receiver.
    ///
    /// # Errors
    ///
    /// Binding errors for arity or receiver mismatches, coercion errors for
    /// arguments of the wrong shape, and [`ResolveError::Target`] when the
    /// member itself fails.
    pub fn invoke(
        &self,
        receiver: &AnyObject,
        args: Vec<NativeValue>,
    ) -> Result<NativeValue, ResolveError> {
        self.check_arity(&args)?;
        match &self.invoker {
            Invoker::Shared(call) => call(receiver, args),
            Invoker::Mutable(_) => Err(ResolveError::binding(format!(
                "Member '{}' requires a mutable receiver",
                self.name
            ))),
        }
    }

    /// Invokes the member on an exclusively owned receiver.
    ///
    /// # Errors
    ///
    /// Same as [`MemberInfo::invoke`].
    pub fn invoke_mut(
        &self,
        receiver: &mut AnyObject,
        args: Vec<NativeValue>,
    ) -> Result<NativeValue, ResolveError> {
        self.check_arity(&args)?;
        match &self.invoker {
            Invoker::Shared(call) => call(receiver, args),
            Invoker::Mutable(call) => call(receiver, args),
        }
    }

    fn check_arity(&self, args: &[NativeValue]) -> Result<(), ResolveError> {
        if args.len() == self.params.len() {
            Ok(())
        } else {
            Err(ResolveError::binding(format!(
                "Member '{}' expects {} argument(s) but got {}",
                self.name,
                self.params.len(),
                args.len()
            )))
        }
    }
}

impl fmt::Debug for MemberInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberInfo")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("return_type", &self.return_type())
            .field("field", &self.field)
            .field("skip", &self.skip)
            .field("operations", &self.operations)
            .finish_non_exhaustive()
    }
}

fn receiver<T: 'static>(object: &AnyObject) -> Result<&T, ResolveError> {
    object.downcast_ref::<T>().ok_or_else(|| {
        ResolveError::binding(format!(
            "Receiver is not an instance of '{}'",
            std::any::type_name::<T>()
        ))
    })
}

fn receiver_mut<T: 'static>(object: &mut AnyObject) -> Result<&mut T, ResolveError> {
    object.downcast_mut::<T>().ok_or_else(|| {
        ResolveError::binding(format!(
            "Receiver is not an instance of '{}'",
            std::any::type_name::<T>()
        ))
    })
}

fn next_arg<A: Reflect>(args: &mut std::vec::IntoIter<NativeValue>) -> Result<A, ResolveError> {
    A::from_native(args.next().unwrap_or(NativeValue::Null))
}

fn target<R: Reflect, E: Into<BoxError>>(result: Result<R, E>) -> Result<NativeValue, ResolveError> {
    result
        .map(Reflect::into_native)
        .map_err(|err| ResolveError::Target(err.into()))
}

/// A typed member of class `T`.
pub struct Member<T> {
    info: MemberInfo,
    _class: PhantomData<fn() -> T>,
}

impl<T: GraphQLObject> Member<T> {
    fn shared<R: Reflect>(
        name: &str,
        params: Vec<ParamInfo>,
        call: impl Fn(&T, Vec<NativeValue>) -> Result<NativeValue, ResolveError> + Send + Sync + 'static,
    ) -> Self {
        let invoker: Arc<SharedFn> =
            Arc::new(move |object: &AnyObject, args: Vec<NativeValue>| {
                call(receiver::<T>(object)?, args)
            });
        Self::with_invoker::<R>(name, params, Invoker::Shared(invoker))
    }

    fn with_invoker<R: Reflect>(name: &str, params: Vec<ParamInfo>, invoker: Invoker) -> Self {
        Self {
            info: MemberInfo {
                name: name.to_owned(),
                params,
                return_type: R::native_type,
                field: Meta::default(),
                skip: false,
                operations: Vec::new(),
                invoker,
            },
            _class: PhantomData,
        }
    }

    /// A member without parameters.
    pub fn method0<R, F>(name: &str, f: F) -> Self
    where
        R: Reflect,
        F: Fn(&T) -> R + Send + Sync + 'static,
    {
        Self::shared::<R>(name, Vec::new(), move |this, _| Ok(f(this).into_native()))
    }

    /// A fallible member without parameters.
    pub fn try_method0<R, E, F>(name: &str, f: F) -> Self
    where
        R: Reflect,
        E: Into<BoxError>,
        F: Fn(&T) -> Result<R, E> + Send + Sync + 'static,
    {
        Self::shared::<R>(name, Vec::new(), move |this, _| target(f(this)))
    }

    /// A member with one parameter.
    pub fn method1<A, R, F>(name: &str, a: impl Into<Param>, f: F) -> Self
    where
        A: Reflect,
        R: Reflect,
        F: Fn(&T, A) -> R + Send + Sync + 'static,
    {
        Self::try_method1(name, a, move |this, a| {
            Ok::<_, std::convert::Infallible>(f(this, a))
        })
    }

    /// A fallible member with one parameter.
    pub fn try_method1<A, R, E, F>(name: &str, a: impl Into<Param>, f: F) -> Self
    where
        A: Reflect,
        R: Reflect,
        E: Into<BoxError>,
        F: Fn(&T, A) -> Result<R, E> + Send + Sync + 'static,
    {
        let params = vec![a.into().erase::<A>()];
        Self::shared::<R>(name, params, move |this, args| {
            let mut args = args.into_iter();
            let a = next_arg::<A>(&mut args)?;
            target(f(this, a))
        })
    }

    /// A member with two parameters.
    pub fn method2<A, B, R, F>(name: &str, a: impl Into<Param>, b: impl Into<Param>, f: F) -> Self
    where
        A: Reflect,
        B: Reflect,
        R: Reflect,
        F: Fn(&T, A, B) -> R + Send + Sync + 'static,
    {
        Self::try_method2(name, a, b, move |this, a, b| {
            Ok::<_, std::convert::Infallible>(f(this, a, b))
        })
    }

    /// A fallible member with two parameters.
    pub fn try_method2<A, B, R, E, F>(
        name: &str,
        a: impl Into<Param>,
        b: impl Into<Param>,
        f: F,
    ) -> Self
    where
        A: Reflect,
        B: Reflect,
        R: Reflect,
        E: Into<BoxError>,
        F: Fn(&T, A, B) -> Result<R, E> + Send + Sync + 'static,
    {
        let params = vec![a.into().erase::<A>(), b.into().erase::<B>()];
        Self::shared::<R>(name, params, move |this, args| {
            let mut args = args.into_iter();
            let a = next_arg::<A>(&mut args)?;
            let b = next_arg::<B>(&mut args)?;
            target(f(this, a, b))
        })
    }

    /// A member with three parameters.
    pub fn method3<A, B, C, R, F>(
        name: &str,
        a: impl Into<Param>,
        b: impl Into<Param>,
        c: impl Into<Param>,
        f: F,
    ) -> Self
    where
        A: Reflect,
        B: Reflect,
        C: Reflect,
        R: Reflect,
        F: Fn(&T, A, B, C) -> R + Send + Sync + 'static,
    {
        Self::try_method3(name, a, b, c, move |this, a, b, c| {
            Ok::<_, std::convert::Infallible>(f(this, a, b, c))
        })
    }

    /// A fallible member with three parameters.
    pub fn try_method3<A, B, C, R, E, F>(
        name: &str,
        a: impl Into<Param>,
        b: impl Into<Param>,
        c: impl Into<Param>,
        f: F,
    ) -> Self
    where
        A: Reflect,
        B: Reflect,
        C: Reflect,
        R: Reflect,
        E: Into<BoxError>,
        F: Fn(&T, A, B, C) -> Result<R, E> + Send + Sync + 'static,
    {
        let params = vec![
            a.into().erase::<A>(),
            b.into().erase::<B>(),
            c.into().erase::<C>(),
        ];
        Self::shared::<R>(name, params, move |this, args| {
            let mut args = args.into_iter();
            let a = next_arg::<A>(&mut args)?;
            let b = next_arg::<B>(&mut args)?;
            let c = next_arg::<C>(&mut args)?;
            target(f(this, a, b, c))
        })
    }

    /// A one-parameter member that mutates its receiver.
    pub fn setter<A, F>(name: &str, f: F) -> Self
    where
        A: Reflect,
        F: Fn(&mut T, A) + Send + Sync + 'static,
    {
        Self::try_setter(name, move |this: &mut T, a| {
            f(this, a);
            Ok::<_, std::convert::Infallible>(())
        })
    }

    /// A fallible one-parameter member that mutates its receiver.
    pub fn try_setter<A, E, F>(name: &str, f: F) -> Self
    where
        A: Reflect,
        E: Into<BoxError>,
        F: Fn(&mut T, A) -> Result<(), E> + Send + Sync + 'static,
    {
        let params = vec![Param::new("value").erase::<A>()];
        let invoker: Arc<MutableFn> =
            Arc::new(move |object: &mut AnyObject, args: Vec<NativeValue>| {
                let this = receiver_mut::<T>(object)?;
                let mut args = args.into_iter();
                let a = next_arg::<A>(&mut args)?;
                target(f(this, a))
            });
        Self::with_invoker::<()>(name, params, Invoker::Mutable(invoker))
    }

    /// Exposes the member as a root query field.
    #[must_use]
    pub fn query(self) -> Self {
        self.query_with(Meta::default())
    }

    /// Exposes the member as a root query field with overrides.
    #[must_use]
    pub fn query_with(self, meta: Meta) -> Self {
        self.operation(OperationKind::Query, meta)
    }

    /// Exposes the member as a root mutation field.
    #[must_use]
    pub fn mutation(self) -> Self {
        self.mutation_with(Meta::default())
    }

    /// Exposes the member as a root mutation field with overrides.
    #[must_use]
    pub fn mutation_with(self, meta: Meta) -> Self {
        self.operation(OperationKind::Mutation, meta)
    }

    /// Exposes the member as a root subscription field.
    #[must_use]
    pub fn subscription(self) -> Self {
        self.subscription_with(Meta::default())
    }

    /// Exposes the member as a root subscription field with overrides.
    #[must_use]
    pub fn subscription_with(self, meta: Meta) -> Self {
        self.operation(OperationKind::Subscription, meta)
    }

    fn operation(mut self, kind: OperationKind, meta: Meta) -> Self {
        self.info.operations.push((kind, meta));
        self
    }

    /// Overrides the field name. Getter/setter handling no longer applies.
    #[must_use]
    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.info.field = self.info.field.name(name);
        self
    }

    /// Overrides the field description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.info.field = self.info.field.description(description);
        self
    }

    /// Hides the member from object types.
    #[must_use]
    pub fn skip(mut self) -> Self {
        self.info.skip = true;
        self
    }
}

/// Typed description of class `T`.
pub struct ClassDescriptor<T> {
    meta: Meta,
    constructor: Option<Arc<ConstructorFn>>,
    members: Vec<MemberInfo>,
    _class: PhantomData<fn() -> T>,
}

impl<T: GraphQLObject> Default for ClassDescriptor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: GraphQLObject> ClassDescriptor<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            meta: Meta::default(),
            constructor: None,
            members: Vec::new(),
            _class: PhantomData,
        }
    }

    /// Overrides the schema type name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.meta = self.meta.name(name);
        self
    }

    /// Overrides the schema type description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.meta = self.meta.description(description);
        self
    }

    /// Registers the no-argument constructor used for input objects.
    #[must_use]
    pub fn constructor(self, f: impl Fn() -> T + Send + Sync + 'static) -> Self {
        self.try_constructor(move || Ok::<_, std::convert::Infallible>(f()))
    }

    /// Registers a fallible no-argument constructor.
    #[must_use]
    pub fn try_constructor<E: Into<BoxError>>(
        mut self,
        f: impl Fn() -> Result<T, E> + Send + Sync + 'static,
    ) -> Self {
        let constructor: Arc<ConstructorFn> =
            Arc::new(move || -> Result<Box<AnyObject>, BoxError> {
                f().map(|value| Box::new(value) as Box<AnyObject>)
                    .map_err(Into::into)
            });
        self.constructor = Some(constructor);
        self
    }

    /// Uses `T::default()` as the no-argument constructor.
    #[must_use]
    pub fn default_constructor(self) -> Self
    where
        T: Default,
    {
        self.constructor(T::default)
    }

    /// Adds a member.
    #[must_use]
    pub fn member(mut self, member: Member<T>) -> Self {
        self.members.push(member.info);
        self
    }

    /// Adds a no-argument member, typically named `getX` or `isX`.
    #[must_use]
    pub fn getter<R, F>(self, name: &str, f: F) -> Self
    where
        R: Reflect,
        F: Fn(&T) -> R + Send + Sync + 'static,
    {
        self.member(Member::method0(name, f))
    }

    /// Adds a mutating one-argument member, typically named `setX`.
    #[must_use]
    pub fn setter<A, F>(self, name: &str, f: F) -> Self
    where
        A: Reflect,
        F: Fn(&mut T, A) + Send + Sync + 'static,
    {
        self.member(Member::setter(name, f))
    }

    /// Erases the description.
    #[must_use]
    pub fn into_info(self) -> ClassInfo {
        let type_name = std::any::type_name::<T>();
        ClassInfo {
            origin: NativeOrigin::of::<T>(),
            type_name,
            simple_name: simple_name(type_name).to_owned(),
            meta: self.meta,
            constructor: self.constructor,
            members: self.members.into_iter().map(Arc::new).collect(),
        }
    }
}

/// Erased class description.
#[derive(Clone)]
pub struct ClassInfo {
    origin: NativeOrigin,
    type_name: &'static str,
    simple_name: String,
    meta: Meta,
    constructor: Option<Arc<ConstructorFn>>,
    members: Vec<Arc<MemberInfo>>,
}

impl ClassInfo {
    #[must_use]
    pub fn origin(&self) -> NativeOrigin {
        self.origin
    }

    /// Full Rust type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Type name without its module path.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    #[must_use]
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Members in declaration order.
    #[must_use]
    pub fn members(&self) -> &[Arc<MemberInfo>] {
        &self.members
    }

    /// Looks up a member by its raw name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Arc<MemberInfo>> {
        self.members.iter().find(|m| m.name() == name)
    }

    /// Creates a new instance through the no-argument constructor.
    ///
    /// # Errors
    ///
    /// [`ResolveError::Construction`] when there is no constructor or it fails.
    pub fn construct(&self) -> Result<NativeObject, ResolveError> {
        let constructor = self.constructor.as_ref().ok_or_else(|| {
            ResolveError::construction(self.type_name, "no no-argument constructor")
        })?;
        let inner = constructor()
            .map_err(|err| ResolveError::construction(self.type_name, err.to_string()))?;
        Ok(NativeObject::from_boxed(self.type_name, inner))
    }
}

impl fmt::Debug for ClassInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassInfo")
            .field("type_name", &self.type_name)
            .field("meta", &self.meta)
            .field("has_constructor", &self.constructor.is_some())
            .field("members", &self.members)
            .finish()
    }
}

/// A domain class that can appear in the schema or serve as a controller.
pub trait GraphQLObject: Sized + Send + Sync + 'static {
    /// Describes the class. Called lazily, once per schema type expansion.
    fn describe() -> ClassDescriptor<Self>;
}
