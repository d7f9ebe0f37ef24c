use crate::{
    foundation::core::{Point, Rect, Vec2},
    foundation::error::{EditorError, EditorResult},
    scene::graph::{ObjectId, Scene, Selection},
    scene::object::SceneObject,
};

/// Value captured by [`Clipboard::copy`].
#[derive(Clone, Debug, PartialEq)]
pub enum Held {
    Single(SceneObject),
    /// Group members in stacking order, back to front.
    Group(Vec<SceneObject>),
}

impl Held {
    pub fn objects(&self) -> &[SceneObject] {
        match self {
            Self::Single(obj) => std::slice::from_ref(obj),
            Self::Group(objs) => objs,
        }
    }
}

/// Single-slot clipboard.
///
/// Pastes cascade: each one lands `offset` further from the copied position than the previous
/// one. The held objects are never modified; only the remembered position advances.
#[derive(Clone, Debug, Default)]
pub struct Clipboard {
    held: Option<Held>,
    /// Position of the single object, or the group's top-left corner, at copy time.
    origin: Point,
    /// Where the last paste landed (starts at `origin`).
    position: Point,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_none()
    }

    pub fn held(&self) -> Option<&Held> {
        self.held.as_ref()
    }

    /// Remembered paste position, if anything is held.
    pub fn position(&self) -> Option<Point> {
        self.held.as_ref().map(|_| self.position)
    }

    pub fn clear(&mut self) {
        self.held = None;
    }

    /// Clone the current selection, replacing whatever was held.
    pub fn copy(&mut self, scene: &Scene) -> EditorResult<()> {
        let (held, origin) = match scene.selection() {
            Selection::None => return Err(EditorError::NoSelection),
            Selection::Single(id) => {
                let obj = scene
                    .get(*id)
                    .ok_or_else(|| EditorError::not_found(format!("object {id}")))?
                    .clone();
                let origin = obj.transform.position();
                (Held::Single(obj), origin)
            }
            Selection::Group(ids) => {
                let members: Vec<SceneObject> = scene
                    .objects()
                    .filter(|(id, _)| ids.contains(id))
                    .map(|(_, obj)| obj.clone())
                    .collect();
                let origin = group_corner(&members);
                (Held::Group(members), origin)
            }
        };
        tracing::debug!(count = held.objects().len(), "copy to clipboard");
        self.held = Some(held);
        self.origin = origin;
        self.position = origin;
        Ok(())
    }

    /// Insert a shifted copy of the held value and select it. Returns the new ids.
    pub fn paste(&mut self, scene: &mut Scene, offset: Vec2) -> EditorResult<Vec<ObjectId>> {
        let held = self.held.as_ref().ok_or(EditorError::Empty)?;
        let next = self.position + offset;
        let shift = next - self.origin;

        let mut copies: Vec<SceneObject> = held.objects().to_vec();
        for obj in &mut copies {
            obj.transform.translate(shift);
            obj.evented = true;
        }

        let ids = match held {
            Held::Single(_) => copies.into_iter().map(|obj| scene.add(obj)).collect(),
            Held::Group(_) => scene.add_group(copies),
        };
        self.position = next;
        tracing::debug!(count = ids.len(), x = next.x, y = next.y, "paste from clipboard");
        Ok(ids)
    }
}

fn group_corner(members: &[SceneObject]) -> Point {
    members
        .iter()
        .map(|obj| obj.transform.bounds())
        .reduce(|a: Rect, b| a.union(b))
        .map(|r| r.origin())
        .unwrap_or(Point::ORIGIN)
}

#[cfg(test)]
#[path = "../../tests/unit/editor/clipboard.rs"]
mod tests;
