use crate::{
    foundation::error::{EditorError, EditorResult},
    scene::graph::{CanvasSettings, Scene},
    scene::object::SceneObject,
};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

/// Serialized form of a whole scene.
///
/// Objects are stored back to front. Selection and ids are not stored: a restored scene hands out
/// fresh ids and starts with nothing selected.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub canvas: CanvasSettings,
    pub objects: Vec<SceneObject>,
}

impl Snapshot {
    /// Serialize to the JSON text payload.
    pub fn to_json(&self) -> EditorResult<String> {
        serde_json::to_string(self)
            .map_err(|e| EditorError::Other(anyhow::Error::new(e).context("serialize snapshot")))
    }

    /// Parse a JSON text payload. Media data URLs are decoded here.
    pub fn from_json(text: &str) -> EditorResult<Self> {
        serde_json::from_str(text).map_err(|e| EditorError::malformed(format!("parse JSON: {e}")))
    }

    /// Check every record without building a scene.
    pub fn validate(&self) -> EditorResult<()> {
        if self.version != SNAPSHOT_VERSION {
            return Err(EditorError::malformed(format!(
                "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
                self.version
            )));
        }
        self.canvas
            .validate()
            .map_err(|e| EditorError::malformed(format!("canvas: {e}")))?;
        for (idx, obj) in self.objects.iter().enumerate() {
            obj.validate()
                .map_err(|e| EditorError::malformed(format!("object {idx}: {e}")))?;
        }
        Ok(())
    }
}

/// Capture every object, in order, plus the canvas settings. Pure.
pub fn dump(scene: &Scene) -> Snapshot {
    Snapshot {
        version: SNAPSHOT_VERSION,
        canvas: scene.canvas().clone(),
        objects: scene.objects().map(|(_, obj)| obj.clone()).collect(),
    }
}

/// Rebuild a scene from `snapshot`. Nothing is built unless every record validates.
#[tracing::instrument(skip(snapshot), fields(objects = snapshot.objects.len()))]
pub fn restore(snapshot: &Snapshot) -> EditorResult<Scene> {
    snapshot.validate()?;
    Ok(Scene::from_objects(
        snapshot.canvas.clone(),
        snapshot.objects.clone(),
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/persist/snapshot.rs"]
mod tests;
