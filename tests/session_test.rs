use image::{Rgba, RgbaImage};
use tempfile::TempDir;

use case_studio::settings::{CameraCutoutPolicy, Settings};
use case_studio::{Design, ExportOutcome, Material, RenderError, Session, Status};

fn setup() -> (TempDir, Session) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    let designs = root.join("images/designs");
    let materials = root.join("images/materials");
    std::fs::create_dir_all(&designs).unwrap();
    std::fs::create_dir_all(&materials).unwrap();

    let mut design = RgbaImage::from_pixel(60, 60, Rgba([255, 255, 255, 255]));
    for y in 10..50 {
        for x in 10..50 {
            design.put_pixel(x, y, Rgba([0, 0, 0, 255]));
        }
    }
    design.save(designs.join("Design1.png")).unwrap();
    RgbaImage::from_pixel(8, 8, Rgba([90, 60, 30, 255]))
        .save(materials.join("Holz.png"))
        .unwrap();

    let settings = Settings {
        assets_dir: root.join("images"),
        imports_dir: root.join("imports"),
        canvas_width: 120,
        canvas_height: 120,
        camera_policy: CameraCutoutPolicy::ExplicitOnly,
        ..Settings::default()
    };
    (dir, Session::new(settings))
}

mod selection_tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle() {
        let (_dir, session) = setup();
        assert_eq!(session.status(), &Status::Idle);
        assert!(session.preview().is_none());
        assert_eq!(session.config().canvas_size, (120, 120));
    }

    #[test]
    fn test_selection_renders() {
        let (_dir, mut session) = setup();
        session.select_design(Some(Design::Design1)).unwrap();
        session.select_material(Some(Material::Holz)).unwrap();

        assert_eq!(session.status(), &Status::Rendered);
        let preview = session.preview().unwrap();
        assert_eq!(preview.dimensions(), (120, 120));
        assert_eq!(preview.get_pixel(60, 60).0, [90, 60, 30, 255]);
    }

    #[test]
    fn test_manufacturer_change_resets_model() {
        let (_dir, mut session) = setup();
        session.select_model("iPhone 13 Pro").unwrap();
        session.select_manufacturer("Google").unwrap();
        assert_eq!(session.config().manufacturer, "Google");
        assert_eq!(session.config().model, "Pixel 4");
    }

    #[test]
    fn test_failed_render_keeps_previous_preview() {
        let (_dir, mut session) = setup();
        session.select_design(Some(Design::Design1)).unwrap();
        let before = session.preview().unwrap().clone();
        let generation = session.generation();

        let err = session.select_design(Some(Design::Design2)).unwrap_err();
        assert!(matches!(err, RenderError::AssetNotFound { .. }));
        assert!(session.status().is_failure());
        assert_eq!(session.preview().unwrap().as_raw(), before.as_raw());
        assert_eq!(session.generation(), generation);
    }
}

mod custom_image_tests {
    use super::*;

    #[test]
    fn test_move_inverse_pair() {
        let (_dir, mut session) = setup();
        let original = session.config().custom_image_position;
        session.move_custom_image(10, 0).unwrap();
        assert_eq!(session.config().custom_image_position, (original.0 + 10, original.1));
        session.move_custom_image(-10, 0).unwrap();
        assert_eq!(session.config().custom_image_position, original);
    }

    #[test]
    fn test_zoom_in_and_out() {
        let (_dir, mut session) = setup();
        session.scale_custom_image(1.1).unwrap();
        session.scale_custom_image(1.1).unwrap();
        assert!((session.config().custom_image_scale - 1.21).abs() < 1e-9);
    }

    #[test]
    fn test_import_selects_image() {
        let (dir, mut session) = setup();
        let source = dir.path().join("holiday.png");
        RgbaImage::from_pixel(30, 30, Rgba([250, 250, 250, 255]))
            .save(&source)
            .unwrap();

        session.move_custom_image(5, 5).unwrap();
        let name = session.import_custom_image(&source).unwrap();

        assert_eq!(name, "holiday.png");
        assert_eq!(session.imported_images(), vec!["holiday.png".to_string()]);
        assert_eq!(session.config().custom_image.as_deref(), Some("holiday.png"));
        // A new image starts at the origin
        assert_eq!(session.config().custom_image_position, (0, 0));
        assert_eq!(session.preview().unwrap().get_pixel(0, 0).0, [250, 250, 250, 255]);
    }

    #[test]
    fn test_import_unsupported_sets_failure() {
        let (dir, mut session) = setup();
        let source = dir.path().join("notes.txt");
        std::fs::write(&source, "hello").unwrap();
        assert!(session.import_custom_image(&source).is_err());
        assert!(session.status().is_failure());
    }
}

mod export_tests {
    use super::*;

    #[test]
    fn test_export_cancelled_writes_nothing() {
        let (dir, mut session) = setup();
        session.select_design(Some(Design::Design1)).unwrap();
        let before: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();

        let outcome = session.export(None).unwrap();

        assert_eq!(outcome, ExportOutcome::Cancelled);
        let after: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(before.len(), after.len());
        assert_eq!(session.status(), &Status::Rendered);
    }

    #[test]
    fn test_export_writes_jpeg_of_current_preview() {
        let (dir, mut session) = setup();
        session.select_design(Some(Design::Design1)).unwrap();
        let path = dir.path().join("out.jpg");

        let outcome = session.export(Some(path.as_path())).unwrap();

        assert_eq!(outcome, ExportOutcome::Written);
        assert_eq!(session.status(), &Status::Exported(path.clone()));
        let written = image::open(&path).unwrap();
        assert_eq!(written.width(), 120);
        assert_eq!(written.height(), 120);
    }

    #[test]
    fn test_export_without_preview() {
        let (dir, mut session) = setup();
        let path = dir.path().join("out.jpg");
        assert!(matches!(
            session.export(Some(path.as_path())),
            Err(RenderError::NothingToExport)
        ));
        assert!(!path.exists());
    }
}
