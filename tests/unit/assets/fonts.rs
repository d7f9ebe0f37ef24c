use super::*;

#[test]
fn unknown_family_fails_to_load() {
    let loader = SystemFontLoader::new(&[]);
    let res = pollster::block_on(loader.load("No Such Family 0xDEADBEEF"));
    let reason = res.unwrap_err();
    assert!(reason.contains("No Such Family 0xDEADBEEF"));
}

#[test]
fn any_installed_family_loads() {
    let loader = SystemFontLoader::new(&[]);
    let db = loader.database();
    // Font availability depends on the host; only check consistency with the database.
    if let Some(face) = db.faces().next()
        && let Some((name, _)) = face.families.first()
    {
        assert!(loader.has_family(name));
        assert!(loader.has_family(&name.to_uppercase()));
        pollster::block_on(loader.load(name)).unwrap();
    }
}

#[test]
fn missing_font_dir_is_ignored() {
    let loader = SystemFontLoader::new(&[PathBuf::from("/definitely/not/a/font/dir")]);
    let baseline = SystemFontLoader::new(&[]);
    assert_eq!(loader.database().len(), baseline.database().len());
}
