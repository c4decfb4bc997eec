//! Supervisor preload and live watching across roots.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use appreload::paths;
use appreload::reload::{Domain, Supervisor};
use appreload::{Registries, Settings};
use tempfile::TempDir;

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

fn settings_for(app: &Path) -> Settings {
    let mut settings = Settings {
        root: paths::resolve_absolute(app),
        ..Settings::default()
    };
    settings.file_watch.debounce_ms = 20;
    settings
}

async fn eventually(check: impl Fn() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test]
async fn test_preload_counts_user_and_engine_specs() {
    let temp_dir = TempDir::new().unwrap();
    let app = temp_dir.path().join("app");
    let engine = temp_dir.path().join("engine");

    write(&app.join("models/user.json"), "{}");
    write(&app.join("models/shop/order.json"), "{}");
    write(&app.join("apis/order.json"), "{}");
    write(&app.join("flows/calc.flow.json"), "{}");
    write(&app.join("flows/calc.js"), "function main() {}");
    write(&app.join("charts/broken.chart.json"), "[]");
    write(&app.join("tables/notes.txt"), "ignored");
    write(&engine.join("apis/table.json"), "{}");
    write(&engine.join("models/setting.json"), "{}");

    let mut settings = settings_for(&app);
    let engine_root = paths::resolve_absolute(&engine);
    settings.engine.root = Some(format!("fs://{}", engine_root.display()));

    let registries = Arc::new(Registries::new());
    let supervisor = Supervisor::new(registries.clone(), None, &settings);
    let report = supervisor.preload(&settings).await;

    assert_eq!(report.loaded.get(&Domain::Model), Some(&3));
    assert_eq!(report.loaded.get(&Domain::Api), Some(&2));
    // The script is not loaded on its own
    assert_eq!(report.loaded.get(&Domain::Flow), Some(&1));
    assert_eq!(report.total_loaded(), 6);
    assert_eq!(report.failed, vec!["chart: broken".to_string()]);

    assert_eq!(
        registries.models.names(),
        vec!["shop.order", "user", "xiang.setting"]
    );
    assert!(registries.apis.contains("xiang.table"));
    assert!(registries.flows.contains("calc"));
    assert!(registries.tables.is_empty());
}

#[tokio::test]
async fn test_missing_roots_are_tolerated() {
    let temp_dir = TempDir::new().unwrap();
    let app = temp_dir.path().join("app");
    write(&app.join("apis/order.json"), "{}");

    let settings = settings_for(&app);
    let supervisor = Supervisor::new(Arc::new(Registries::new()), None, &settings);

    let handles = supervisor.watch(&settings);
    assert_eq!(handles.len(), 1);

    let missing = supervisor
        .watch_domain(Domain::Model, &app.join("models"), "")
        .unwrap();
    assert!(missing.is_none());

    for handle in handles {
        handle.abort();
    }
}

#[tokio::test]
async fn test_watch_applies_live_changes() {
    let temp_dir = TempDir::new().unwrap();
    let app = temp_dir.path().join("app");
    std::fs::create_dir_all(app.join("models")).unwrap();
    std::fs::create_dir_all(app.join("flows")).unwrap();

    let settings = settings_for(&app);
    let registries = Arc::new(Registries::new());
    let supervisor = Supervisor::new(registries.clone(), None, &settings);
    let handles = supervisor.watch(&settings);
    assert_eq!(handles.len(), 2);
    tokio::time::sleep(Duration::from_millis(100)).await;

    let models = settings.root.join("models");
    write(&models.join("user.json"), r#"{"name": "User"}"#);
    assert!(eventually(|| registries.models.contains("user")).await);

    write(&models.join("user.json"), r#"{"name": "Member"}"#);
    assert!(
        eventually(|| {
            registries
                .models
                .get("user")
                .is_some_and(|m| m.label.as_deref() == Some("Member"))
        })
        .await
    );

    std::fs::remove_file(models.join("user.json")).unwrap();
    assert!(eventually(|| !registries.models.contains("user")).await);

    let flows = settings.root.join("flows");
    write(&flows.join("calc.flow.json"), "{}");
    assert!(eventually(|| registries.flows.contains("calc")).await);

    for handle in handles {
        handle.abort();
    }
}
