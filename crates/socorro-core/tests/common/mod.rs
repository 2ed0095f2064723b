use socorro_core::WorkflowEngineBuilder;
use tempfile::TempDir;

/// Helper function to create a test engine
pub async fn create_test_engine() -> (TempDir, socorro_core::WorkflowEngine) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let engine = WorkflowEngineBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create engine");
    (temp_dir, engine)
}
