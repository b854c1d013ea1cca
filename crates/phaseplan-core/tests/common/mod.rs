use jiff::Timestamp;
use phaseplan_core::{
    models::{Geometry, MapPoint},
    MissionConfig, PlannerBuilder,
};
use tempfile::TempDir;

pub const INFANTRY: &str = "SFGPUCI----K---";

/// Helper function to create a test planner
#[allow(dead_code)]
pub async fn create_test_planner() -> (TempDir, phaseplan_core::Planner) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let planner = PlannerBuilder::new()
        .with_database_path(Some(&db_path))
        .with_config(MissionConfig::default())
        .build()
        .await
        .expect("Failed to create planner");
    (temp_dir, planner)
}

#[allow(dead_code)]
pub fn ts(seconds: i64) -> Timestamp {
    Timestamp::from_second(seconds).expect("valid timestamp")
}

#[allow(dead_code)]
pub fn point(x: f64, y: f64) -> Geometry {
    Geometry::Point(MapPoint::new(x, y))
}
