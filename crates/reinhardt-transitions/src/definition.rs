//! Route and view definitions.
//!
//! Route handlers and views are described by values rather than discovered by
//! type probing. A [`RouteDefinition`] says how to build a route instance, a
//! [`ViewDefinition`] says how to build its view, and a [`RouteSource`] is an
//! entry of a parent's child-route map that may have to be loaded first.

use crate::descriptor::RouteOptions;
use crate::region::View;
use crate::route::{RouteHandler, RouteInstance};
use futures::future::BoxFuture;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Options handed to a view factory.
pub type ViewOptions = Map<String, Value>;

/// Builds a view from its options.
pub type ViewFactory = Arc<dyn Fn(&ViewOptions) -> Arc<dyn View> + Send + Sync>;

/// Picks a view definition for a route at render time.
pub type DeferredView = Arc<dyn Fn(&RouteInstance) -> ViewDefinition + Send + Sync>;

/// How a route builds its view.
#[derive(Clone)]
pub enum ViewDefinition {
	/// Constructs the view from the route's view options.
	Factory(ViewFactory),
	/// Evaluated against the route instance when rendering.
	Deferred(DeferredView),
	/// Element tag resolved through the router's element registry.
	Tag(String),
}

impl ViewDefinition {
	/// Creates a factory definition.
	pub fn factory<F, V>(factory: F) -> Self
	where
		F: Fn(&ViewOptions) -> V + Send + Sync + 'static,
		V: View,
	{
		Self::Factory(Arc::new(move |options| Arc::new(factory(options)) as Arc<dyn View>))
	}

	/// Creates a factory definition from a function already returning shared views.
	pub fn shared<F>(factory: F) -> Self
	where
		F: Fn(&ViewOptions) -> Arc<dyn View> + Send + Sync + 'static,
	{
		Self::Factory(Arc::new(factory))
	}

	/// Creates a deferred definition.
	pub fn deferred<F>(select: F) -> Self
	where
		F: Fn(&RouteInstance) -> ViewDefinition + Send + Sync + 'static,
	{
		Self::Deferred(Arc::new(select))
	}

	/// Creates a tag definition.
	pub fn tag(tag: impl Into<String>) -> Self {
		Self::Tag(tag.into())
	}
}

impl fmt::Debug for ViewDefinition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ViewDefinition::Factory(_) => f.write_str("Factory(..)"),
			ViewDefinition::Deferred(_) => f.write_str("Deferred(..)"),
			ViewDefinition::Tag(tag) => f.debug_tuple("Tag").field(tag).finish(),
		}
	}
}

/// Builds route handlers.
pub type HandlerFactory = Arc<dyn Fn() -> Box<dyn RouteHandler> + Send + Sync>;

/// A route handler type.
#[derive(Clone)]
pub struct RouteClass {
	name: String,
	factory: HandlerFactory,
}

impl RouteClass {
	/// Route class for a handler type built with `Default`.
	pub fn of<H>() -> Self
	where
		H: RouteHandler + Default,
	{
		let full = std::any::type_name::<H>();
		let name = full.rsplit("::").next().unwrap_or(full);
		Self::new(name, H::default)
	}

	/// Route class built by `factory`.
	pub fn new<F, H>(name: impl Into<String>, factory: F) -> Self
	where
		F: Fn() -> H + Send + Sync + 'static,
		H: RouteHandler,
	{
		Self {
			name: name.into(),
			factory: Arc::new(move || Box::new(factory()) as Box<dyn RouteHandler>),
		}
	}

	/// Name of the handler type.
	pub fn name(&self) -> &str {
		&self.name
	}

	pub(crate) fn build(&self) -> Box<dyn RouteHandler> {
		(self.factory)()
	}
}

impl fmt::Debug for RouteClass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteClass").field("name", &self.name).finish()
	}
}

/// A constructable route definition.
#[derive(Clone, Debug)]
pub enum RouteDefinition {
	/// Handler type constructed without extra options.
	Class(RouteClass),
	/// Options carrying a handler type and/or a view definition.
	Options(Box<RouteOptions>),
	/// Module wrapper whose default export is the definition.
	Module(Box<RouteDefinition>),
}

impl RouteDefinition {
	/// Definition for a handler type built with `Default`.
	pub fn class<H>() -> Self
	where
		H: RouteHandler + Default,
	{
		Self::Class(RouteClass::of::<H>())
	}

	/// Definition rendering `view` with the default handler.
	pub fn component(view: ViewDefinition) -> Self {
		Self::Options(Box::new(RouteOptions::new().component(view)))
	}

	/// Wraps `default` as a module default export.
	pub fn module(default: RouteDefinition) -> Self {
		Self::Module(Box::new(default))
	}

	/// Unwraps module wrappers down to the default export.
	pub fn unwrap_module(self) -> Self {
		let mut definition = self;
		while let Self::Module(inner) = definition {
			definition = *inner;
		}
		definition
	}
}

impl From<RouteClass> for RouteDefinition {
	fn from(class: RouteClass) -> Self {
		Self::Class(class)
	}
}

impl From<RouteOptions> for RouteDefinition {
	fn from(options: RouteOptions) -> Self {
		Self::Options(Box::new(options))
	}
}

/// Future resolving to a route definition.
pub type DefinitionFuture = BoxFuture<'static, Option<RouteDefinition>>;

/// Result of invoking a child-route loader.
pub enum RouteLoad {
	/// The definition is available now.
	Ready(Option<RouteDefinition>),
	/// The definition arrives later.
	Pending(DefinitionFuture),
}

impl RouteLoad {
	/// Returns `true` when no waiting is needed.
	pub fn is_ready(&self) -> bool {
		matches!(self, RouteLoad::Ready(_))
	}

	#[cfg(test)]
	async fn into_definition(self) -> Option<RouteDefinition> {
		match self {
			RouteLoad::Ready(definition) => definition,
			RouteLoad::Pending(future) => future.await,
		}
	}
}

/// Zero-argument child-route loader.
pub type RouteLoader = Arc<dyn Fn() -> RouteLoad + Send + Sync>;

/// Entry of a child-route map.
#[derive(Clone)]
pub enum RouteSource {
	/// A definition given directly.
	Definition(RouteDefinition),
	/// A loader producing the definition.
	Loader(RouteLoader),
}

impl RouteSource {
	/// Source computed synchronously by `load`.
	pub fn loader<F>(load: F) -> Self
	where
		F: Fn() -> Option<RouteDefinition> + Send + Sync + 'static,
	{
		Self::Loader(Arc::new(move || RouteLoad::Ready(load())))
	}

	/// Source computed asynchronously by `load`.
	///
	/// # Example
	///
	/// ```
	/// use reinhardt_transitions::definition::{RouteDefinition, RouteSource, ViewDefinition};
	/// use reinhardt_transitions::region::Element;
	///
	/// let source = RouteSource::lazy(|| async {
	/// 	Some(RouteDefinition::module(RouteDefinition::component(
	/// 		ViewDefinition::factory(|_| Element::new("section")),
	/// 	)))
	/// });
	/// assert!(!source.start().is_ready());
	/// ```
	pub fn lazy<F, Fut>(load: F) -> Self
	where
		F: Fn() -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Option<RouteDefinition>> + Send + 'static,
	{
		Self::Loader(Arc::new(move || RouteLoad::Pending(Box::pin(load()))))
	}

	/// Starts loading the definition.
	pub fn start(&self) -> RouteLoad {
		match self {
			RouteSource::Definition(definition) => RouteLoad::Ready(Some(definition.clone())),
			RouteSource::Loader(load) => load(),
		}
	}
}

impl fmt::Debug for RouteSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RouteSource::Definition(definition) => {
				f.debug_tuple("Definition").field(definition).finish()
			}
			RouteSource::Loader(_) => f.write_str("Loader(..)"),
		}
	}
}

impl From<RouteDefinition> for RouteSource {
	fn from(definition: RouteDefinition) -> Self {
		Self::Definition(definition)
	}
}

impl From<RouteClass> for RouteSource {
	fn from(class: RouteClass) -> Self {
		Self::Definition(RouteDefinition::Class(class))
	}
}

/// Child-route map declared by a parent route.
pub type ChildRoutes = HashMap<String, RouteSource>;

#[cfg(test)]
mod tests {
	use super::*;
	use crate::route::BasicRoute;
	use rstest::rstest;

	#[rstest]
	fn test_class_name_is_short_type_name() {
		assert_eq!(RouteClass::of::<BasicRoute>().name(), "BasicRoute");
	}

	#[rstest]
	fn test_unwrap_nested_modules() {
		let definition = RouteDefinition::module(RouteDefinition::module(
			RouteDefinition::class::<BasicRoute>(),
		));
		assert!(matches!(
			definition.unwrap_module(),
			RouteDefinition::Class(class) if class.name() == "BasicRoute"
		));
	}

	#[rstest]
	fn test_definition_source_is_ready() {
		let source = RouteSource::from(RouteClass::of::<BasicRoute>());
		assert!(source.start().is_ready());
	}

	#[rstest]
	fn test_sync_loader_is_ready() {
		let source = RouteSource::loader(|| None);
		let load = source.start();
		assert!(load.is_ready());
		assert!(tokio_test::block_on(load.into_definition()).is_none());
	}

	#[rstest]
	fn test_lazy_loader_resolves() {
		let source = RouteSource::lazy(|| async { Some(RouteDefinition::class::<BasicRoute>()) });
		let load = source.start();
		assert!(!load.is_ready());
		let definition = tokio_test::block_on(load.into_definition());
		assert!(matches!(definition, Some(RouteDefinition::Class(_))));
	}

	#[rstest]
	fn test_tag_debug() {
		assert_eq!(format!("{:?}", ViewDefinition::tag("x-page")), r#"Tag("x-page")"#);
	}
}
