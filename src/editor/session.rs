use crate::{
    assets::decode::MediaBackend,
    assets::fonts::FontLoader,
    assets::media::MediaBlob,
    config::EditorConfig,
    editor::clipboard::Clipboard,
    editor::import::{self, TextBoxOptions},
    editor::style::{self, FontChange, FontGenerations, PendingFontChange},
    foundation::core::Point,
    foundation::error::{EditorError, EditorResult},
    persist::snapshot::{self, Snapshot},
    persist::store::SnapshotStore,
    render::backend::{RasterRenderer, RenderEngine},
    render::export::ExportFormat,
    scene::graph::{ObjectId, Scene},
};

/// One editing session: the scene, its clipboard and settings.
///
/// Every user-facing editor action is a method here. Sessions are independent; nothing is shared
/// between two `Editor` values.
#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    scene: Scene,
    clipboard: Clipboard,
    fonts: FontGenerations,
}

impl Default for Editor {
    fn default() -> Self {
        Self::from_valid_config(EditorConfig::default())
    }
}

impl Editor {
    /// Start a session. Fails with `Validation` if `config` does not pass
    /// [`EditorConfig::validate`].
    pub fn new(config: EditorConfig) -> EditorResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: EditorConfig) -> Self {
        let scene = Scene::new(config.canvas.clone());
        Self {
            config,
            scene,
            clipboard: Clipboard::new(),
            fonts: FontGenerations::default(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Direct scene access for hosts that drive transforms (drag, resize, rotate) themselves.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    // Import

    pub async fn import_media<B: MediaBackend + ?Sized>(
        &mut self,
        backend: &B,
        blob: MediaBlob,
    ) -> EditorResult<ObjectId> {
        import::import_media(&mut self.scene, backend, blob, &self.config).await
    }

    pub async fn import_image<B: MediaBackend + ?Sized>(
        &mut self,
        backend: &B,
        bytes: Vec<u8>,
    ) -> EditorResult<ObjectId> {
        let at = self.config.image_position;
        import::import_image(&mut self.scene, backend, bytes, at).await
    }

    /// Import a video centred on `anchor`, or on the configured anchor when `None`.
    pub async fn import_video<B: MediaBackend + ?Sized>(
        &mut self,
        backend: &B,
        bytes: Vec<u8>,
        mime: &str,
        anchor: Option<Point>,
    ) -> EditorResult<ObjectId> {
        let anchor = anchor.unwrap_or(self.config.video_anchor);
        import::import_video(&mut self.scene, backend, bytes, mime, anchor).await
    }

    /// Add a text box with `text`, or the configured default text.
    pub fn add_text(&mut self, text: Option<&str>, mut opts: TextBoxOptions) -> ObjectId {
        if let Some(text) = text {
            opts.text = Some(text.to_string());
        }
        import::add_text_box(&mut self.scene, &self.config.text_box, opts)
    }

    // Selection and ordering

    /// Select one object, or clear the selection with `None`.
    pub fn select(&mut self, id: Option<ObjectId>) -> EditorResult<()> {
        self.scene.set_active(id)?;
        if self.config.raise_on_select
            && let Some(id) = id
        {
            self.scene.move_to_front(id)?;
        }
        Ok(())
    }

    pub fn select_group(&mut self, ids: &[ObjectId]) -> EditorResult<()> {
        self.scene.set_active_group(ids)?;
        if self.config.raise_on_select && !ids.is_empty() {
            self.scene.move_selection_to_front()?;
        }
        Ok(())
    }

    /// Remove the selected objects. Returns their ids (empty when nothing was selected).
    pub fn remove_active(&mut self) -> Vec<ObjectId> {
        self.scene.remove_active()
    }

    /// One step towards the top for every selected object. Members already packed against the
    /// top stay put, so the group's relative order never changes.
    pub fn bring_forward(&mut self) -> EditorResult<()> {
        let mut limit = self.scene.len();
        for id in self.selected_front_to_back()? {
            let idx = self.stacking_index(id)?;
            if idx + 1 < limit {
                self.scene.bring_forward(id)?;
                limit = idx + 1;
            } else {
                limit = idx;
            }
        }
        Ok(())
    }

    /// One step towards the bottom for every selected object.
    pub fn send_backward(&mut self) -> EditorResult<()> {
        let mut ids = self.selected_front_to_back()?;
        ids.reverse();
        let mut floor = 0;
        for id in ids {
            let idx = self.stacking_index(id)?;
            if idx > floor {
                self.scene.send_backward(id)?;
                floor = idx;
            } else {
                floor = idx + 1;
            }
        }
        Ok(())
    }

    pub fn move_to_front(&mut self) -> EditorResult<()> {
        self.scene.move_selection_to_front()
    }

    pub fn move_to_back(&mut self) -> EditorResult<()> {
        self.scene.move_selection_to_back()
    }

    fn stacking_index(&self, id: ObjectId) -> EditorResult<usize> {
        self.scene
            .index_of(id)
            .ok_or_else(|| EditorError::not_found(format!("object {id}")))
    }

    fn selected_front_to_back(&self) -> EditorResult<Vec<ObjectId>> {
        let selection = self.scene.selection();
        if selection.is_empty() {
            return Err(EditorError::NoSelection);
        }
        let mut ids: Vec<ObjectId> = self
            .scene
            .ids()
            .into_iter()
            .filter(|id| selection.contains(*id))
            .collect();
        ids.reverse();
        Ok(ids)
    }

    // Clipboard

    pub fn copy(&mut self) -> EditorResult<()> {
        self.clipboard.copy(&self.scene)
    }

    pub fn paste(&mut self) -> EditorResult<Vec<ObjectId>> {
        self.clipboard.paste(&mut self.scene, self.config.paste_offset)
    }

    // Style

    /// Load `family` if needed, then apply it to the objects selected at call time.
    #[tracing::instrument(skip(self, loader))]
    pub async fn set_font_family<L: FontLoader + ?Sized>(
        &mut self,
        loader: &L,
        family: &str,
    ) -> EditorResult<FontChange> {
        let pending = self.begin_font_change(family)?;
        let outcome = if self.config.is_builtin_font(family) {
            Ok(())
        } else {
            loader.load(family).await
        };
        self.complete_font_change(pending, outcome)
    }

    /// Start a font-family change. Any change started earlier becomes stale.
    pub fn begin_font_change(&mut self, family: &str) -> EditorResult<PendingFontChange> {
        self.fonts.begin(&self.scene, family)
    }

    /// Finish a change started by [`Editor::begin_font_change`] with the loader's outcome.
    pub fn complete_font_change(
        &mut self,
        pending: PendingFontChange,
        outcome: Result<(), String>,
    ) -> EditorResult<FontChange> {
        let res = self.fonts.complete(&mut self.scene, pending, outcome);
        if let Err(e) = &res {
            tracing::warn!(error = %e, "font change failed");
        }
        res
    }

    pub fn set_fill_color(&mut self, color: &str) -> EditorResult<()> {
        style::set_fill_color(&mut self.scene, color)
    }

    pub fn set_font_weight(&mut self, bold: bool) -> EditorResult<()> {
        style::set_font_weight(&mut self.scene, bold)
    }

    pub fn set_font_size(&mut self, size: f64) -> EditorResult<()> {
        style::set_font_size(&mut self.scene, size)
    }

    // Persistence

    pub fn dump(&self) -> Snapshot {
        snapshot::dump(&self.scene)
    }

    /// Replace the scene with `snapshot`. On error the current scene is kept as is.
    pub fn restore(&mut self, snap: &Snapshot) -> EditorResult<()> {
        match snapshot::restore(snap) {
            Ok(scene) => {
                self.scene = scene;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "restore rejected");
                Err(e)
            }
        }
    }

    /// Write the current scene to the configured slot.
    #[tracing::instrument(skip(self, store), fields(slot = %self.config.snapshot_slot))]
    pub fn dump_to<S: SnapshotStore + ?Sized>(&self, store: &mut S) -> EditorResult<()> {
        let text = self.dump().to_json()?;
        store.write(&self.config.snapshot_slot, &text)
    }

    /// Replace the scene with the configured slot's snapshot.
    #[tracing::instrument(skip(self, store), fields(slot = %self.config.snapshot_slot))]
    pub fn restore_from<S: SnapshotStore + ?Sized>(&mut self, store: &S) -> EditorResult<()> {
        let slot = &self.config.snapshot_slot;
        let text = store
            .read(slot)?
            .ok_or_else(|| EditorError::not_found(format!("snapshot slot '{slot}'")))?;
        let snap = Snapshot::from_json(&text).inspect_err(|e| {
            tracing::warn!(error = %e, "stored snapshot is malformed");
        })?;
        self.restore(&snap)
    }

    // Rendering

    /// One animation-frame tick: redraw when something changed or a video is playing.
    ///
    /// Returns whether a redraw happened. The dirty flag is only cleared by a successful redraw.
    pub fn tick<R: RenderEngine + ?Sized>(&mut self, renderer: &mut R) -> EditorResult<bool> {
        if !self.scene.is_dirty() && !self.scene.has_playing_video() {
            return Ok(false);
        }
        renderer.render_all(&self.scene)?;
        self.scene.take_dirty();
        Ok(true)
    }

    pub fn export_image(
        &self,
        renderer: &RasterRenderer,
        format: ExportFormat,
    ) -> EditorResult<Vec<u8>> {
        renderer.export(&self.scene, format)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/session.rs"]
mod tests;
