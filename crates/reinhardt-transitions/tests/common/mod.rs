//! Shared fixtures for transition integration tests.
//!
//! [`Recorder`] journals every lifecycle call as `"<hook>:<route>"` so tests
//! can assert the exact order hooks ran in.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use reinhardt_transitions::prelude::*;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

/// Ordered record of hook calls.
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&self, entry: impl Into<String>) {
		self.0.lock().push(entry.into());
	}

	pub fn entries(&self) -> Vec<String> {
		self.0.lock().clone()
	}

	/// Entries starting with `prefix`, in order.
	pub fn filtered(&self, prefix: &str) -> Vec<String> {
		self.0
			.lock()
			.iter()
			.filter(|entry| entry.starts_with(prefix))
			.cloned()
			.collect()
	}

	pub fn clear(&self) {
		self.0.lock().clear();
	}
}

/// Behavior switches for a [`Recorder`].
#[derive(Clone, Default)]
pub struct Behavior {
	pub fail_activate: bool,
	pub fail_deactivate: bool,
	pub fail_load: bool,
	pub cancel_in_activate: bool,
	pub cancel_in_deactivate: bool,
	pub redirect_to: Option<String>,
	pub activate_delay: Option<Duration>,
	pub keep_view: bool,
	pub view_tag: Option<&'static str>,
}

impl Behavior {
	pub fn view(tag: &'static str) -> Self {
		Self {
			view_tag: Some(tag),
			..Self::default()
		}
	}
}

/// Route handler journaling its lifecycle.
pub struct Recorder {
	name: String,
	journal: Journal,
	behavior: Behavior,
}

impl Recorder {
	/// Route class whose instances record into `journal`.
	pub fn class(name: &str, journal: &Journal, behavior: Behavior) -> RouteClass {
		let name = name.to_string();
		let journal = journal.clone();
		RouteClass::new("Recorder", move || Recorder {
			name: name.clone(),
			journal: journal.clone(),
			behavior: behavior.clone(),
		})
	}
}

#[async_trait]
impl RouteHandler for Recorder {
	fn initialize(&mut self, config: &RouteConfig, _options: &Map<String, Value>) {
		self.journal.push(format!("init:{}", config.name));
	}

	async fn activate(&self, route: &RouteInstance, transition: &Transition) -> anyhow::Result<()> {
		if let Some(delay) = self.behavior.activate_delay {
			tokio::time::sleep(delay).await;
		}
		self.journal.push(format!("activate:{}", route.name()));
		if self.behavior.cancel_in_activate {
			transition.cancel();
		}
		if let Some(target) = &self.behavior.redirect_to {
			transition.redirect_to(target.clone(), Params::new(), Query::new());
		}
		if self.behavior.fail_activate {
			anyhow::bail!("{} refused activation", self.name);
		}
		Ok(())
	}

	async fn deactivate(&self, route: &RouteInstance, transition: &Transition) -> anyhow::Result<()> {
		self.journal.push(format!("deactivate:{}", route.name()));
		if self.behavior.cancel_in_deactivate {
			transition.cancel();
		}
		if self.behavior.fail_deactivate {
			anyhow::bail!("{} refused deactivation", self.name);
		}
		Ok(())
	}

	fn loader(&self) -> Option<&dyn LoadHook> {
		Some(self)
	}

	fn update_view(&self, _route: &RouteInstance, _transition: &Transition) -> bool {
		self.behavior.keep_view
	}

	fn component(&self) -> Option<ViewDefinition> {
		let tag = self.behavior.view_tag?;
		let name = self.name.clone();
		Some(ViewDefinition::factory(move |_| {
			Element::new(tag).attr("data-route", name.clone()).with_outlet()
		}))
	}
}

#[async_trait]
impl LoadHook for Recorder {
	async fn load(&self, route: &RouteInstance, _transition: &Transition) -> anyhow::Result<()> {
		self.journal.push(format!("load:{}", route.name()));
		if self.behavior.fail_load {
			anyhow::bail!("{} could not load", self.name);
		}
		Ok(())
	}
}

/// Route options backed by a [`Recorder`].
pub fn recorded(name: &str, journal: &Journal, behavior: Behavior) -> RouteOptions {
	RouteOptions::new().class(Recorder::class(name, journal, behavior))
}

/// Route options rendering a `tag` element with an outlet.
pub fn page(tag: &'static str) -> RouteOptions {
	RouteOptions::new().component(ViewDefinition::factory(move |_| Element::new(tag).with_outlet()))
}

/// Builds a param or query map.
pub fn pairs(entries: &[(&str, &str)]) -> Params {
	entries
		.iter()
		.map(|(key, value)| (key.to_string(), value.to_string()))
		.collect()
}

/// Router mounted in a fresh root region.
pub fn router_with_root() -> (Router, Arc<ElementRegion>) {
	let root = Arc::new(ElementRegion::new());
	let router = Router::new(RouterSettings::default().with_log_errors(false))
		.with_root_region(root.clone());
	(router, root)
}

/// Router with a recorded chain `a > b > {c, d}`, where `d` declares `:id`.
pub fn recorded_tree(journal: &Journal, behaviors: &[(&str, Behavior)]) -> (Router, Arc<ElementRegion>) {
	let behavior = |name: &str| {
		behaviors
			.iter()
			.find(|(candidate, _)| *candidate == name)
			.map(|(_, behavior)| behavior.clone())
			.unwrap_or_default()
	};
	let (router, root) = router_with_root();
	router.map(|map| {
		map.route_with("a", recorded("a", journal, behavior("a")), |a| {
			a.route_with("b", recorded("b", journal, behavior("b")), |b| {
				b.route("c", recorded("c", journal, behavior("c")));
				b.route("d", recorded("d", journal, behavior("d")).path("d/:id"));
			});
		});
		map.route("e", recorded("e", journal, behavior("e")));
	});
	(router, root)
}
