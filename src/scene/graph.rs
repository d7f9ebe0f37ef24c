use crate::{
    foundation::color::Rgba8,
    foundation::error::{EditorError, EditorResult},
    scene::object::{AttributeDelta, SceneObject},
};

/// Stable identity handle for an object inside one [`Scene`].
///
/// Ids are handed out in increasing order and never reused by the same scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Access the raw counter value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Current selection: nothing, one object, or a group acting as one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    /// Nothing selected.
    #[default]
    None,
    /// A single active object.
    Single(ObjectId),
    /// Several objects selected together, in stacking order.
    Group(Vec<ObjectId>),
}

impl Selection {
    /// Selected ids (empty for [`Selection::None`]).
    pub fn ids(&self) -> &[ObjectId] {
        match self {
            Self::None => &[],
            Self::Single(id) => std::slice::from_ref(id),
            Self::Group(ids) => ids,
        }
    }

    /// `true` when nothing is selected.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// `true` when `id` is part of the selection.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.ids().contains(&id)
    }

    fn from_ids(mut ids: Vec<ObjectId>) -> Self {
        match ids.len() {
            0 => Self::None,
            1 => Self::Single(ids.remove(0)),
            _ => Self::Group(ids),
        }
    }
}

/// Canvas-level settings persisted with every snapshot.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CanvasSettings {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// CSS color painted behind every object.
    #[serde(default = "default_background")]
    pub background: String,
}

fn default_background() -> String {
    "rgb(255,255,255)".to_string()
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            background: default_background(),
        }
    }
}

impl CanvasSettings {
    /// Validate dimensions and background color.
    pub fn validate(&self) -> EditorResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(EditorError::validation("canvas width/height must be > 0"));
        }
        Rgba8::parse(&self.background)?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Entry {
    id: ObjectId,
    object: SceneObject,
}

/// Ordered collection of placed objects with a selection and a render-dirty flag.
///
/// Index 0 is the back-most object; the last object is drawn on top. The selection only ever
/// references current members: every removal path prunes it.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    canvas: CanvasSettings,
    entries: Vec<Entry>,
    selection: Selection,
    next_id: u64,
    dirty: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(CanvasSettings::default())
    }
}

impl Scene {
    /// Create an empty scene.
    pub fn new(canvas: CanvasSettings) -> Self {
        Self {
            canvas,
            entries: Vec::new(),
            selection: Selection::None,
            next_id: 1,
            dirty: true,
        }
    }

    /// Build a scene from objects in back-to-front order, with nothing selected.
    pub(crate) fn from_objects(canvas: CanvasSettings, objects: Vec<SceneObject>) -> Self {
        let mut scene = Self::new(canvas);
        for object in objects {
            let id = scene.alloc_id();
            scene.entries.push(Entry { id, object });
        }
        scene
    }

    /// Canvas settings.
    pub fn canvas(&self) -> &CanvasSettings {
        &self.canvas
    }

    /// Replace canvas settings after validating them.
    pub fn set_canvas(&mut self, canvas: CanvasSettings) -> EditorResult<()> {
        canvas.validate()?;
        self.canvas = canvas;
        self.dirty = true;
        Ok(())
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the scene holds no objects.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids in stacking order (back to front).
    pub fn ids(&self) -> Vec<ObjectId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    /// Objects in stacking order (back to front).
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.entries.iter().map(|e| (e.id, &e.object))
    }

    /// Look up an object.
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.object)
    }

    /// Mutable access to an object; marks the scene dirty.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        let entry = self.entries.iter_mut().find(|e| e.id == id)?;
        self.dirty = true;
        Some(&mut entry.object)
    }

    /// Stacking index of `id` (0 is back-most).
    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Whether `id` refers to a current member.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    /// Append `object` on top of the stack and make it the active object.
    pub fn add(&mut self, object: SceneObject) -> ObjectId {
        let id = self.alloc_id();
        tracing::debug!(%id, kind = %object.kind(), "add object");
        self.entries.push(Entry { id, object });
        self.selection = Selection::Single(id);
        self.dirty = true;
        id
    }

    /// Append every object on top of the stack, in order, and select them together.
    ///
    /// A single object ends up as a plain single selection.
    pub fn add_group(&mut self, objects: Vec<SceneObject>) -> Vec<ObjectId> {
        let mut ids = Vec::with_capacity(objects.len());
        for object in objects {
            let id = self.alloc_id();
            self.entries.push(Entry { id, object });
            ids.push(id);
        }
        tracing::debug!(count = ids.len(), "add object group");
        self.selection = Selection::from_ids(ids.clone());
        self.dirty = true;
        ids
    }

    /// Remove `id` if present. Unknown ids are ignored.
    ///
    /// Removing the active object clears the selection; removing a group member drops it from
    /// the group. Removing any other object leaves the selection alone.
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let idx = self.index_of(id)?;
        let entry = self.entries.remove(idx);
        if self.selection.contains(id) {
            let remaining: Vec<ObjectId> = self
                .selection
                .ids()
                .iter()
                .copied()
                .filter(|&sel| sel != id)
                .collect();
            self.selection = match self.selection {
                Selection::Single(_) => Selection::None,
                _ => Selection::from_ids(remaining),
            };
        }
        tracing::debug!(%id, "remove object");
        self.dirty = true;
        Some(entry.object)
    }

    /// Remove every selected object and return their ids. Empty when nothing is selected.
    pub fn remove_active(&mut self) -> Vec<ObjectId> {
        let ids = self.selection.ids().to_vec();
        for &id in &ids {
            self.remove(id);
        }
        self.selection = Selection::None;
        ids
    }

    /// Drop every object and the selection. Canvas settings are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.selection = Selection::None;
        self.dirty = true;
    }

    /// Current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The single active object, if the selection is exactly one object.
    pub fn active(&self) -> Option<ObjectId> {
        match self.selection {
            Selection::Single(id) => Some(id),
            _ => None,
        }
    }

    /// The single active object's value.
    pub fn active_object(&self) -> Option<&SceneObject> {
        self.active().and_then(|id| self.get(id))
    }

    /// Select one object, or clear the selection with `None`.
    pub fn set_active(&mut self, id: Option<ObjectId>) -> EditorResult<()> {
        match id {
            Some(id) => {
                self.require(id)?;
                self.selection = Selection::Single(id);
            }
            None => self.selection = Selection::None,
        }
        self.dirty = true;
        Ok(())
    }

    /// Select several objects as a group. Duplicates are ignored; members are kept in stacking
    /// order.
    pub fn set_active_group(&mut self, ids: &[ObjectId]) -> EditorResult<()> {
        for &id in ids {
            self.require(id)?;
        }
        let members: Vec<ObjectId> = self
            .entries
            .iter()
            .map(|e| e.id)
            .filter(|id| ids.contains(id))
            .collect();
        self.selection = Selection::from_ids(members);
        self.dirty = true;
        Ok(())
    }

    /// Move `id` to stacking position `index`, clamped to `[0, len-1]`.
    pub fn move_to(&mut self, id: ObjectId, index: usize) -> EditorResult<()> {
        let from = self.require(id)?;
        let entry = self.entries.remove(from);
        let to = index.min(self.entries.len());
        self.entries.insert(to, entry);
        tracing::debug!(%id, from, to, "reorder object");
        self.dirty = true;
        Ok(())
    }

    /// Move `id` to the top of the stack.
    pub fn move_to_front(&mut self, id: ObjectId) -> EditorResult<()> {
        self.move_to(id, usize::MAX)
    }

    /// Move `id` to the bottom of the stack.
    pub fn move_to_back(&mut self, id: ObjectId) -> EditorResult<()> {
        self.move_to(id, 0)
    }

    /// Move `id` one step towards the top.
    pub fn bring_forward(&mut self, id: ObjectId) -> EditorResult<()> {
        let idx = self.require(id)?;
        self.move_to(id, idx.saturating_add(1))
    }

    /// Move `id` one step towards the bottom.
    pub fn send_backward(&mut self, id: ObjectId) -> EditorResult<()> {
        let idx = self.require(id)?;
        self.move_to(id, idx.saturating_sub(1))
    }

    /// Move every selected object to the top, keeping their relative order.
    pub fn move_selection_to_front(&mut self) -> EditorResult<()> {
        let (picked, mut rest) = self.split_selected()?;
        rest.extend(picked);
        self.entries = rest;
        self.dirty = true;
        Ok(())
    }

    /// Move every selected object to the bottom, keeping their relative order.
    pub fn move_selection_to_back(&mut self) -> EditorResult<()> {
        let (mut picked, rest) = self.split_selected()?;
        picked.extend(rest);
        self.entries = picked;
        self.dirty = true;
        Ok(())
    }

    /// Apply `delta` to every selected object.
    pub fn apply_to_active(&mut self, delta: &AttributeDelta) -> EditorResult<()> {
        if self.selection.is_empty() {
            return Err(EditorError::NoSelection);
        }
        delta.validate()?;
        let ids = self.selection.ids().to_vec();
        for entry in self.entries.iter_mut().filter(|e| ids.contains(&e.id)) {
            delta.apply(&mut entry.object);
        }
        self.dirty = true;
        Ok(())
    }

    /// Whether a redraw is pending.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Request a redraw.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Read and clear the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Whether any video surface is currently playing (and so needs every frame redrawn).
    pub fn has_playing_video(&self) -> bool {
        self.entries.iter().any(|e| e.object.is_playing_video())
    }

    fn alloc_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    fn require(&self, id: ObjectId) -> EditorResult<usize> {
        self.index_of(id)
            .ok_or_else(|| EditorError::not_found(format!("object {id}")))
    }

    fn split_selected(&mut self) -> EditorResult<(Vec<Entry>, Vec<Entry>)> {
        if self.selection.is_empty() {
            return Err(EditorError::NoSelection);
        }
        let ids = self.selection.ids().to_vec();
        Ok(std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| ids.contains(&e.id)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
