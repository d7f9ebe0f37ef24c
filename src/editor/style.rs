use crate::{
    foundation::color::Rgba8,
    foundation::error::{EditorError, EditorResult},
    scene::graph::{ObjectId, Scene},
    scene::object::{AttributeDelta, FontWeight},
};

/// Outcome of completing a font-family change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontChange {
    /// The family was applied to the objects selected when the change was requested.
    Applied,
    /// A newer change was requested in the meantime; this one was discarded.
    Superseded,
}

/// Font-family change in flight, issued by [`FontGenerations::begin`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingFontChange {
    generation: u64,
    family: String,
    targets: Vec<ObjectId>,
}

impl PendingFontChange {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// Objects selected when the change was requested.
    pub fn targets(&self) -> &[ObjectId] {
        &self.targets
    }
}

/// Generation counter guarding font-family changes against out-of-order completions.
///
/// Only the most recently issued change may apply; any older completion is reported as
/// [`FontChange::Superseded`] and has no effect, whether its load succeeded or not.
#[derive(Clone, Debug, Default)]
pub struct FontGenerations {
    latest: u64,
}

impl FontGenerations {
    pub fn latest(&self) -> u64 {
        self.latest
    }

    /// Issue a new generation targeting the current selection.
    pub fn begin(&mut self, scene: &Scene, family: &str) -> EditorResult<PendingFontChange> {
        if scene.selection().is_empty() {
            return Err(EditorError::NoSelection);
        }
        if family.trim().is_empty() {
            return Err(EditorError::validation("font family must be non-empty"));
        }
        self.latest += 1;
        Ok(PendingFontChange {
            generation: self.latest,
            family: family.to_string(),
            targets: scene.selection().ids().to_vec(),
        })
    }

    /// Finish `pending` with the loader's outcome.
    pub fn complete(
        &self,
        scene: &mut Scene,
        pending: PendingFontChange,
        outcome: Result<(), String>,
    ) -> EditorResult<FontChange> {
        if pending.generation != self.latest {
            tracing::debug!(
                generation = pending.generation,
                latest = self.latest,
                family = %pending.family,
                "stale font change discarded"
            );
            return Ok(FontChange::Superseded);
        }
        if let Err(reason) = outcome {
            return Err(EditorError::font_load(pending.family, reason));
        }

        let mut applied = 0usize;
        for &id in &pending.targets {
            if let Some(text) = scene.get_mut(id).and_then(|obj| obj.as_text_mut()) {
                text.font_family = pending.family.clone();
                applied += 1;
            }
        }
        tracing::debug!(family = %pending.family, applied, "font family applied");
        Ok(FontChange::Applied)
    }
}

/// Set the fill of every selected text object. Accepts any color [`Rgba8::parse`] accepts.
pub fn set_fill_color(scene: &mut Scene, color: &str) -> EditorResult<()> {
    if scene.selection().is_empty() {
        return Err(EditorError::NoSelection);
    }
    Rgba8::parse(color)?;
    scene.apply_to_active(&AttributeDelta {
        fill: Some(color.trim().to_string()),
        ..AttributeDelta::default()
    })
}

pub fn set_font_weight(scene: &mut Scene, bold: bool) -> EditorResult<()> {
    scene.apply_to_active(&AttributeDelta {
        font_weight: Some(FontWeight::from_bold(bold)),
        ..AttributeDelta::default()
    })
}

pub fn set_font_size(scene: &mut Scene, size: f64) -> EditorResult<()> {
    scene.apply_to_active(&AttributeDelta {
        font_size: Some(size),
        ..AttributeDelta::default()
    })
}

#[cfg(test)]
#[path = "../../tests/unit/editor/style.rs"]
mod tests;
