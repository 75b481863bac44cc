//! Where notes and settings come from.

use log::debug;
use web_sys::Storage;

use crate::error::{Error, Result};
use crate::graph::Note;
use crate::settings::Settings;

/// Source of the authoritative note collection.
pub trait NoteStore {
	fn get_all_notes(&self) -> Result<Vec<Note>>;
}

/// Notes held in memory; used for demos and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryNoteStore {
	notes: Vec<Note>,
}

impl MemoryNoteStore {
	pub fn new(notes: Vec<Note>) -> Self {
		Self { notes }
	}

	/// Insert or replace a note by id.
	pub fn upsert(&mut self, note: Note) {
		match self.notes.iter_mut().find(|n| n.id == note.id) {
			Some(existing) => *existing = note,
			None => self.notes.push(note),
		}
	}

	pub fn remove(&mut self, id: &str) -> Option<Note> {
		let idx = self.notes.iter().position(|n| n.id == id)?;
		Some(self.notes.remove(idx))
	}
}

impl NoteStore for MemoryNoteStore {
	fn get_all_notes(&self) -> Result<Vec<Note>> {
		Ok(self.notes.clone())
	}
}

/// Notes and settings persisted in `window.localStorage`.
pub struct BrowserNoteStore {
	notes_key: String,
	settings_key: String,
}

impl Default for BrowserNoteStore {
	fn default() -> Self {
		Self {
			notes_key: "notes".into(),
			settings_key: "settings".into(),
		}
	}
}

impl BrowserNoteStore {
	fn storage(&self) -> Result<Storage> {
		web_sys::window()
			.ok_or_else(|| Error::Store("no window".into()))?
			.local_storage()
			.map_err(|e| Error::Store(format!("{:?}", e)))?
			.ok_or_else(|| Error::Store("localStorage disabled".into()))
	}

	fn read(&self, key: &str) -> Result<Option<String>> {
		self.storage()?
			.get_item(key)
			.map_err(|e| Error::Store(format!("{:?}", e)))
	}

	fn write(&self, key: &str, value: &str) -> Result<()> {
		self.storage()?
			.set_item(key, value)
			.map_err(|e| Error::Store(format!("{:?}", e)))
	}

	pub fn save_notes(&self, notes: &[Note]) -> Result<()> {
		self.write(&self.notes_key, &serde_json::to_string(notes)?)
	}

	pub fn load_settings(&self) -> Result<Settings> {
		match self.read(&self.settings_key)? {
			Some(text) => Settings::from_json(&text),
			None => Ok(Settings::default()),
		}
	}

	pub fn save_settings(&self, settings: &Settings) -> Result<()> {
		self.write(&self.settings_key, &settings.to_json())
	}
}

impl NoteStore for BrowserNoteStore {
	fn get_all_notes(&self) -> Result<Vec<Note>> {
		let Some(text) = self.read(&self.notes_key)? else {
			debug!("no stored notes under `{}`", self.notes_key);
			return Ok(Vec::new());
		};
		Ok(serde_json::from_str(&text)?)
	}
}
