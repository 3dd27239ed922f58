use std::sync::Arc;

use proptest::prelude::*;
use sketchpoint_lib::{
    admin::ConfigEditor,
    dashboard::{Report, Stats},
    db::Database,
    display::EntryStatus,
    error::SketchError,
    media::UploadedFile,
    models::{CanvasRect, FieldType, FieldValue, Hotspot, HotspotData, HotspotDraft, SketchConfig},
    store::{DocumentStore, MemoryStore, Repository, CONFIG_KEY},
    worker::{ConfigAvailability, DataCollector},
};

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn png() -> UploadedFile {
    UploadedFile::new("plan.png", "image/png", PNG_MAGIC.to_vec())
}

fn memory_repo() -> (Arc<MemoryStore>, Repository) {
    let store = Arc::new(MemoryStore::new());
    (store.clone(), Repository::new(store))
}

fn hotspot(id: &str, label: &str) -> Hotspot {
    Hotspot {
        id: id.to_string(),
        x: 10.0,
        y: 20.0,
        field_type: FieldType::Text,
        label: label.to_string(),
        options: None,
    }
}

#[test]
fn saving_right_after_upload_is_rejected() {
    let (_, repo) = memory_repo();
    let mut editor = ConfigEditor::new();
    editor.upload_image(png()).unwrap();

    let err = editor.save(&repo).unwrap_err();
    assert!(matches!(err, SketchError::Validation(_)));
    assert!(repo.get_config().unwrap().is_none());
}

#[test]
fn room_number_scenario_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(dir.path().join("sketchpoint.sqlite3")).unwrap();
    let repo = Repository::new(Arc::new(db));

    let mut editor = ConfigEditor::new();
    editor.upload_image(png()).unwrap();
    editor
        .begin_placement(HotspotDraft::new("Room Number", FieldType::Number))
        .unwrap();
    let placed = editor
        .place_hotspot(50.0, 50.0, CanvasRect::unit())
        .unwrap()
        .clone();
    assert_eq!((placed.x, placed.y), (50.0, 50.0));
    editor.save(&repo).unwrap();

    let mut collector = DataCollector::new();
    assert!(matches!(
        collector.load(&repo).unwrap(),
        ConfigAvailability::Loaded(_)
    ));
    collector.select_hotspot(&placed.id).unwrap();
    collector.submit_value("12", &repo).unwrap();

    let status = collector.completion_status();
    assert_eq!((status.completed, status.total), (1, 1));

    let report = Report::load(&repo).unwrap();
    let rows = report.rows();
    assert_eq!(rows[0].value, Some(FieldValue::Number(12.0)));
    assert_eq!(rows[0].status, EntryStatus::Completed);
}

#[test]
fn submitted_text_value_shows_up_in_rows() {
    let (_, repo) = memory_repo();
    repo.set_config(&SketchConfig {
        image: "data:image/png;base64,AA==".into(),
        hotspots: vec![hotspot("a", "Door"), hotspot("b", "Window")],
    })
    .unwrap();

    let mut collector = DataCollector::new();
    collector.load(&repo).unwrap();
    collector.select_hotspot("b").unwrap();
    collector.submit_value("  oak, painted ", &repo).unwrap();

    let rows = Report::load(&repo).unwrap().rows();
    assert_eq!(rows[0].status, EntryStatus::Pending);
    assert_eq!(rows[1].status, EntryStatus::Completed);
    assert_eq!(rows[1].value_text(), "  oak, painted ");
}

#[test]
fn removing_twice_matches_removing_once() {
    let mut editor = ConfigEditor::from_config(SketchConfig {
        image: "data:image/png;base64,AA==".into(),
        hotspots: vec![hotspot("2", "A"), hotspot("x", "B"), hotspot("y", "C")],
    });

    assert!(editor.remove_hotspot("2").is_some());
    let once: Vec<Hotspot> = editor.hotspots().to_vec();
    assert!(editor.remove_hotspot("2").is_none());
    assert_eq!(editor.hotspots(), once.as_slice());
    assert_eq!(once.len(), 2);
}

#[test]
fn stats_for_partially_filled_config() {
    let (_, repo) = memory_repo();
    repo.set_config(&SketchConfig {
        image: "data:image/png;base64,AA==".into(),
        hotspots: vec![hotspot("A", "A"), hotspot("B", "B")],
    })
    .unwrap();
    let mut data = HotspotData::new();
    data.insert("A", FieldValue::Text("done".into()));
    repo.set_data(&data).unwrap();

    let stats = Report::load(&repo).unwrap().stats();
    assert_eq!(
        stats,
        Stats {
            total: 2,
            completed: 1,
            pending: 1
        }
    );
}

#[test]
fn corrupt_config_behaves_like_missing() {
    let (store, repo) = memory_repo();
    store.save(CONFIG_KEY, r#"{"image": 3}"#).unwrap();

    let mut collector = DataCollector::new();
    let availability = collector.load(&repo).unwrap().clone();
    assert!(matches!(availability, ConfigAvailability::Corrupt(_)));
    assert!(collector.config().is_none());
    assert!(collector.hotspots().is_empty());

    let report = Report::load(&repo).unwrap();
    assert!(!report.has_config());
    assert_eq!(report.stats(), Stats::default());
}

proptest! {
    #[test]
    fn placed_coordinates_stay_in_range(
        click_x in -5000.0f64..5000.0,
        click_y in -5000.0f64..5000.0,
        left in -500.0f64..500.0,
        top in -500.0f64..500.0,
        width in 0.5f64..4000.0,
        height in 0.5f64..4000.0,
    ) {
        let mut editor = ConfigEditor::new();
        editor.upload_image(png()).unwrap();
        editor.begin_placement(HotspotDraft::new("P", FieldType::Text)).unwrap();
        let placed = editor
            .place_hotspot(click_x, click_y, CanvasRect::new(left, top, width, height))
            .unwrap();
        prop_assert!((0.0..=100.0).contains(&placed.x));
        prop_assert!((0.0..=100.0).contains(&placed.y));
    }

    #[test]
    fn completed_never_exceeds_total(
        filled in proptest::collection::vec(any::<bool>(), 0..12),
        orphans in 0usize..4,
    ) {
        let hotspots: Vec<Hotspot> = (0..filled.len())
            .map(|i| hotspot(&format!("h{i}"), "L"))
            .collect();
        let mut data = HotspotData::new();
        for (i, fill) in filled.iter().enumerate() {
            if *fill {
                data.insert(format!("h{i}"), FieldValue::Number(i as f64));
            }
        }
        for i in 0..orphans {
            data.insert(format!("gone{i}"), FieldValue::Text("x".into()));
        }

        let status = data.completion(&hotspots);
        prop_assert!(status.completed <= status.total);
        prop_assert_eq!(status.pending(), status.total - status.completed);
        prop_assert_eq!(data.orphaned(&hotspots), orphans);
    }
}
