use k3d_rct_core::FirmwareKind;
use k3d_rct_profile::PrintProfile;
use tempfile::TempDir;

#[test]
fn test_save_and_load_toml_profile() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("towers.toml");

    let mut profile = PrintProfile::default().with_firmware(FirmwareKind::Klipper);
    profile.bed_x = 250.0;
    profile.bed_y = 250.0;
    profile.k_factor = 0.045;
    profile.save_to_file(&path).unwrap();

    let loaded = PrintProfile::load_from_file(&path).unwrap();
    assert_eq!(loaded, profile);
}

#[test]
fn test_json_profile_keeps_multiline_templates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("towers.json");

    let mut profile = PrintProfile::default();
    profile.start_gcode = "G28\n$G29\nM109 S$HOTTEMP".to_string();
    profile.save_to_file(&path).unwrap();

    let loaded = PrintProfile::load_from_file(&path).unwrap();
    assert_eq!(loaded.start_gcode, "G28\n$G29\nM109 S$HOTTEMP");
}

#[test]
fn test_invalid_profile_is_not_saved() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");

    let mut profile = PrintProfile::default();
    profile.segments = 1;
    let err = profile.save_to_file(&path).unwrap_err();
    assert!(err.is_profile_error());
    assert!(!path.exists());
}

#[test]
fn test_out_of_range_file_is_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hot.toml");
    std::fs::write(&path, "hotend_temperature = 500\n").unwrap();

    let err = PrintProfile::load_from_file(&path).unwrap_err();
    assert!(err.is_profile_error());
    assert!(err.to_string().contains("hotend_temperature"));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = PrintProfile::load_from_file(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, k3d_rct_core::Error::Io(_)));
}
