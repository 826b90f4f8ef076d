//! Router settings.
//!
//! Settings can be built in code or read from a TOML document:
//!
//! ```toml
//! location = "hash"
//! root = "/app"
//! log_errors = true
//! max_redirects = 8
//! initial_route = "home"
//! ```

use crate::error::SettingsError;
use serde::Deserialize;

/// How generated URLs are addressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
	/// In-memory location, plain paths.
	#[default]
	Memory,
	/// History API location, plain paths.
	History,
	/// Hash based location, paths prefixed with `#`.
	Hash,
}

/// Router configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
	/// Location kind used by URL generation.
	pub location: LocationKind,
	/// Prefix for every generated URL.
	pub root: String,
	/// Log unexpected transition failures.
	pub log_errors: bool,
	/// Maximum number of redirect hops followed by one `transition_to` call.
	pub max_redirects: usize,
	/// Route entered by `Router::listen`.
	pub initial_route: Option<String>,
}

impl Default for RouterSettings {
	fn default() -> Self {
		Self {
			location: LocationKind::Memory,
			root: "/".to_string(),
			log_errors: true,
			max_redirects: 16,
			initial_route: None,
		}
	}
}

impl RouterSettings {
	/// Parses settings from a TOML document. Missing keys use defaults.
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		let settings: Self = toml::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Sets the URL root.
	pub fn with_root(mut self, root: impl Into<String>) -> Self {
		self.root = root.into();
		self
	}

	/// Sets the location kind.
	pub fn with_location(mut self, location: LocationKind) -> Self {
		self.location = location;
		self
	}

	/// Enables or disables error logging.
	pub fn with_log_errors(mut self, log_errors: bool) -> Self {
		self.log_errors = log_errors;
		self
	}

	/// Sets the redirect limit.
	pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
		self.max_redirects = max_redirects;
		self
	}

	/// Sets the route entered on `listen`.
	pub fn with_initial_route(mut self, name: impl Into<String>) -> Self {
		self.initial_route = Some(name.into());
		self
	}

	fn validate(&self) -> Result<(), SettingsError> {
		if !self.root.starts_with('/') {
			return Err(SettingsError::InvalidValue {
				key: "root".to_string(),
				message: format!("must start with '/', got '{}'", self.root),
			});
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_defaults() {
		let settings = RouterSettings::default();
		assert_eq!(settings.location, LocationKind::Memory);
		assert_eq!(settings.root, "/");
		assert!(settings.log_errors);
		assert_eq!(settings.max_redirects, 16);
		assert!(settings.initial_route.is_none());
	}

	#[rstest]
	fn test_from_toml_partial() {
		let settings = RouterSettings::from_toml_str(
			r#"
			location = "hash"
			initial_route = "home"
			"#,
		)
		.unwrap();
		assert_eq!(settings.location, LocationKind::Hash);
		assert_eq!(settings.initial_route.as_deref(), Some("home"));
		assert_eq!(settings.root, "/");
	}

	#[rstest]
	fn test_from_toml_rejects_relative_root() {
		let result = RouterSettings::from_toml_str(r#"root = "app""#);
		assert!(matches!(result, Err(SettingsError::InvalidValue { .. })));
	}

	#[rstest]
	fn test_from_toml_rejects_unknown_location() {
		let result = RouterSettings::from_toml_str(r#"location = "nowhere""#);
		assert!(matches!(result, Err(SettingsError::Parse(_))));
	}
}
