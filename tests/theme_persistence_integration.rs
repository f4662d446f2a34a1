use findash::infrastructure::theme::{ThemeMode, ThemePersistence};

#[test]
fn missing_file_loads_as_none() {
    let dir = tempfile::tempdir().expect("temp dir");
    let persistence = ThemePersistence::with_path(dir.path().join("theme.json"));

    assert_eq!(persistence.load().unwrap(), None);
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().expect("temp dir");
    let persistence = ThemePersistence::with_path(dir.path().join("theme.json"));

    persistence.save(ThemeMode::Light).expect("save");
    assert_eq!(persistence.load().unwrap(), Some(ThemeMode::Light));

    // Written on every change: the latest write wins
    persistence.save(ThemeMode::Dark).expect("save");
    assert_eq!(persistence.load().unwrap(), Some(ThemeMode::Dark));
}

#[test]
fn corrupt_file_surfaces_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("theme.json");
    std::fs::write(&path, "not json").expect("write");

    let persistence = ThemePersistence::with_path(path);
    assert!(persistence.load().is_err());
}
