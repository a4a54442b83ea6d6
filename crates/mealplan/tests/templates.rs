use std::sync::Arc;

use mealcal_mealplan::{SlotState, TEMPLATE_KEY, TemplateLibrary};
use mealcal_shared::{Error, KeyValueStore, StorageError, mealplan::MealType};
use mealcal_storage::{MemoryStore, SqliteStore};
use temp_dir::TempDir;
use time::macros::date;

mod helpers;

#[tokio::test]
async fn test_save_replaces_same_name() -> anyhow::Result<()> {
    let remote = helpers::remote();
    let store = Arc::new(MemoryStore::new());
    let mut planner = helpers::setup_planner(&remote, date!(2024 - 06 - 03)).await?;
    let mut library = TemplateLibrary::load(store.clone()).await?;

    planner.assign(date!(2024 - 06 - 03), MealType::Lunch, Some("Cazuela".to_owned()));
    library.save("Semana base", &planner, date!(2024 - 06 - 03)).await?;

    planner.assign(date!(2024 - 06 - 05), MealType::Lunch, Some("Pastel de Choclo".to_owned()));
    let saved = library.save(" Semana base ", &planner, date!(2024 - 06 - 03)).await?;

    assert_eq!(library.list().len(), 1);
    assert_eq!(saved.items.len(), 2);
    assert_eq!(saved.items[1].day_offset, 2);

    let reloaded = TemplateLibrary::load(store).await?;
    assert_eq!(reloaded.list(), library.list());

    Ok(())
}

#[tokio::test]
async fn test_save_rejects_empty_name_and_week() -> anyhow::Result<()> {
    let remote = helpers::remote();
    let store = Arc::new(MemoryStore::new());
    let mut planner = helpers::setup_planner(&remote, date!(2024 - 06 - 03)).await?;
    let mut library = TemplateLibrary::load(store.clone()).await?;

    let err = library
        .save("Vacía", &planner, date!(2024 - 06 - 03))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Invalid(_)));

    planner.assign(date!(2024 - 06 - 03), MealType::Lunch, Some("Cazuela".to_owned()));
    let err = library
        .save("   ", &planner, date!(2024 - 06 - 03))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Invalid(_)));
    assert!(store.is_empty().await);

    Ok(())
}

#[tokio::test]
async fn test_quota_exceeded_keeps_previous_templates() -> anyhow::Result<()> {
    let remote = helpers::remote();
    let store = Arc::new(MemoryStore::with_quota(150));
    let mut planner = helpers::setup_planner(&remote, date!(2024 - 06 - 03)).await?;
    let mut library = TemplateLibrary::load(store.clone()).await?;

    planner.assign(date!(2024 - 06 - 03), MealType::Lunch, Some("Cazuela".to_owned()));
    library.save("A", &planner, date!(2024 - 06 - 03)).await?;

    for day in [date!(2024 - 06 - 04), date!(2024 - 06 - 05), date!(2024 - 06 - 06)] {
        planner.assign(day, MealType::Lunch, Some("Pastel de Choclo".to_owned()));
    }
    let err = library
        .save("B", &planner, date!(2024 - 06 - 03))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Storage(StorageError::QuotaExceeded { .. })
    ));
    assert_eq!(library.list().len(), 1);
    assert_eq!(TemplateLibrary::load(store).await?.list().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_delete_and_apply() -> anyhow::Result<()> {
    let remote = helpers::remote();
    let store = Arc::new(MemoryStore::new());
    let mut planner = helpers::setup_planner(&remote, date!(2024 - 06 - 03)).await?;
    let mut library = TemplateLibrary::load(store).await?;

    planner.assign(date!(2024 - 06 - 04), MealType::Lunch, Some("Cazuela".to_owned()));
    library.save("Martes", &planner, date!(2024 - 06 - 03)).await?;

    library.apply("Martes", &mut planner, date!(2024 - 06 - 17)).await?;
    assert_eq!(
        planner.slot(date!(2024 - 06 - 18), MealType::Lunch),
        SlotState::Assigned("Cazuela")
    );

    library.delete("Martes").await?;
    assert!(library.list().is_empty());

    let err = library.delete("Martes").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err = library
        .apply("Martes", &mut planner, date!(2024 - 06 - 17))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "template `Martes` not found");

    Ok(())
}

#[tokio::test]
async fn test_templates_persist_in_sqlite() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("mealcal.sqlite3");
    let url = format!("sqlite:{}", path.display());

    let remote = helpers::remote();
    let mut planner = helpers::setup_planner(&remote, date!(2024 - 06 - 03)).await?;
    planner.assign(date!(2024 - 06 - 07), MealType::Lunch, Some("Cazuela".to_owned()));

    {
        let store = Arc::new(SqliteStore::connect(&url, 1).await?);
        let mut library = TemplateLibrary::load(store).await?;
        library.save("Viernes", &planner, date!(2024 - 06 - 03)).await?;
    }

    let store = Arc::new(SqliteStore::connect(&url, 1).await?);
    let library = TemplateLibrary::load(store.clone()).await?;
    let template = library.get("Viernes").expect("template persisted");

    assert_eq!(template.items.len(), 1);
    assert_eq!(template.items[0].day_offset, 4);
    assert!(store.get(TEMPLATE_KEY).await?.is_some());

    Ok(())
}

#[tokio::test]
async fn test_corrupt_templates_are_reported() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    store.set(TEMPLATE_KEY, "{not json").await?;

    let err = TemplateLibrary::load(store).await.err().expect("corrupt entry");

    assert!(matches!(err, Error::Storage(StorageError::Corrupt { .. })));

    Ok(())
}
