//! Settings stored as one JSON document and addressed by dotted key paths,
//! e.g. `graph.universe_radius`.

use log::warn;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
	root: Value,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			root: Value::Object(Map::new()),
		}
	}
}

impl Settings {
	/// Wrap an existing document. A non-object root is replaced by an empty one.
	pub fn from_value(root: Value) -> Self {
		if root.is_object() {
			Self { root }
		} else {
			warn!("settings root is not an object, starting empty");
			Self::default()
		}
	}

	pub fn from_json(text: &str) -> Result<Self> {
		Ok(Self::from_value(serde_json::from_str(text)?))
	}

	pub fn to_json(&self) -> String {
		self.root.to_string()
	}

	pub fn as_value(&self) -> &Value {
		&self.root
	}

	pub fn get(&self, path: &str) -> Option<&Value> {
		if path.is_empty() {
			return None;
		}
		path.split('.').try_fold(&self.root, |value, key| value.get(key))
	}

	/// Typed lookup; missing or mistyped values fall back to `default`.
	pub fn get_or<T: DeserializeOwned>(&self, path: &str, default: T) -> T {
		match self.get(path) {
			Some(value) => T::deserialize(value).unwrap_or_else(|e| {
				warn!("setting `{}` has the wrong shape: {}", path, e);
				default
			}),
			None => default,
		}
	}

	/// Store `value` at `path`, creating intermediate objects as needed.
	pub fn set(&mut self, path: &str, value: Value) -> Result<()> {
		let keys: Vec<&str> = path.split('.').collect();
		if keys.iter().any(|k| k.is_empty()) {
			return Err(Error::InvalidPath(path.to_string()));
		}
		let (last, parents) = keys.split_last().ok_or_else(|| Error::InvalidPath(path.to_string()))?;
		let mut cursor = &mut self.root;
		for key in parents {
			let Some(map) = cursor.as_object_mut() else {
				return Err(Error::InvalidPath(path.to_string()));
			};
			cursor = map
				.entry(key.to_string())
				.or_insert_with(|| Value::Object(Map::new()));
		}
		match cursor {
			Value::Object(map) => {
				map.insert(last.to_string(), value);
				Ok(())
			}
			_ => Err(Error::InvalidPath(path.to_string())),
		}
	}
}
