use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::FutureExt as _;
use futures::future::LocalBoxFuture;

/// Font loading collaborator.
///
/// `load` resolves once `family` is usable for rendering and fails with a human-readable reason
/// otherwise (missing face, network failure, timeout).
pub trait FontLoader {
    fn load<'a>(&'a self, family: &'a str) -> LocalBoxFuture<'a, Result<(), String>>;
}

/// Loader backed by the system font database plus optional extra font directories.
#[derive(Clone, Debug)]
pub struct SystemFontLoader {
    db: Arc<usvg::fontdb::Database>,
}

impl Default for SystemFontLoader {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl SystemFontLoader {
    /// Load system fonts and every `.ttf`/`.otf`/`.ttc` found directly in `font_dirs`.
    pub fn new(font_dirs: &[PathBuf]) -> Self {
        Self {
            db: build_fontdb(font_dirs),
        }
    }

    /// Shared database, reused by the renderer so loaded families render.
    pub fn database(&self) -> Arc<usvg::fontdb::Database> {
        Arc::clone(&self.db)
    }

    pub fn has_family(&self, family: &str) -> bool {
        has_family(&self.db, family)
    }
}

impl FontLoader for SystemFontLoader {
    fn load<'a>(&'a self, family: &'a str) -> LocalBoxFuture<'a, Result<(), String>> {
        let res = if self.has_family(family) {
            Ok(())
        } else {
            Err(format!("no installed face for family '{family}'"))
        };
        futures::future::ready(res).boxed_local()
    }
}

pub(crate) fn has_family(db: &usvg::fontdb::Database, family: &str) -> bool {
    db.faces().any(|face| {
        face.families
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case(family))
    })
}

pub(crate) fn build_fontdb(font_dirs: &[PathBuf]) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    for dir in font_dirs {
        load_fonts_from_dir(&mut db, dir);
    }
    tracing::debug!(faces = db.len(), "font database ready");
    Arc::new(db)
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font file");
        }
    }
}

/// Resolve named families against the database, falling back to generic families and finally
/// to any face at all so text never silently disappears.
pub(crate) fn make_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }

            families.push(usvg::fontdb::Family::Serif);
            families.push(usvg::fontdb::Family::SansSerif);

            let style = match font.style() {
                usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
                usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
                usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
            };

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style,
            };

            if let Some(id) = fontdb.query(&query) {
                return Some(id);
            }
            fontdb.faces().next().map(|f| f.id)
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
