use std::sync::Arc;

use mealcal_mealplan::PlannedIngredient;
use mealcal_remote::{MemoryRemote, Operation};
use mealcal_shared::{Error, RemoteError, shopping::NewShoppingItem};
use mealcal_shopping::ShoppingList;
use mealcal_storage::MemoryStore;

fn planned(name: &str, key: &str) -> PlannedIngredient {
    PlannedIngredient {
        name: name.to_owned(),
        key: key.to_owned(),
        count: 1,
    }
}

#[tokio::test]
async fn test_add_list_and_remove() -> anyhow::Result<()> {
    let remote = Arc::new(MemoryRemote::new());
    let mut list = ShoppingList::new(remote.clone());

    assert!(list.list("2024-06").await?.is_empty());

    let leche = list.add(NewShoppingItem::new(" Leche ", 1200, "2024-06")).await?;
    list.add(NewShoppingItem::new("Pan", 900, "2024-06")).await?;
    list.add(NewShoppingItem::new("Arroz", 1500, "2024-07")).await?;

    assert_eq!(leche.name, "Leche");
    assert_eq!(list.items().len(), 2);
    assert_eq!(list.estimated_total(), 2100);

    list.remove(&leche.id).await?;
    assert_eq!(list.items().len(), 1);
    assert_eq!(remote.shopping_items().await.len(), 2);

    let july = list.list("2024-07").await?;
    assert_eq!(july.len(), 1);
    assert_eq!(july[0].name, "Arroz");

    Ok(())
}

#[tokio::test]
async fn test_invalid_input_is_rejected_before_remote() -> anyhow::Result<()> {
    let remote = Arc::new(MemoryRemote::new());
    let mut list = ShoppingList::new(remote.clone());

    let err = list
        .add(NewShoppingItem::new("Leche", -5, "2024-06"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validate(_)));

    let err = list
        .add(NewShoppingItem::new("Leche", 100, "junio"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validate(_)));

    assert!(list.list("2024-13").await.is_err());
    assert_eq!(remote.calls(Operation::AddShoppingItem).await, 0);
    assert_eq!(remote.calls(Operation::FetchShoppingList).await, 0);

    Ok(())
}

#[tokio::test]
async fn test_failed_remote_keeps_local_list() -> anyhow::Result<()> {
    let remote = Arc::new(MemoryRemote::new());
    let mut list = ShoppingList::new(remote.clone());
    list.list("2024-06").await?;
    let pan = list.add(NewShoppingItem::new("Pan", 900, "2024-06")).await?;

    remote
        .fail_next(Operation::AddShoppingItem, RemoteError::network("offline"))
        .await;
    assert!(list.add(NewShoppingItem::new("Leche", 1200, "2024-06")).await.is_err());

    remote
        .fail_next(Operation::DeleteShoppingItem, RemoteError::server(500, "boom"))
        .await;
    assert!(list.remove(&pan.id).await.is_err());

    assert_eq!(list.items().len(), 1);

    let err = list.remove("missing").await.unwrap_err();
    assert_eq!(err.remote().and_then(|e| e.status()), Some(404));

    Ok(())
}

#[tokio::test]
async fn test_set_checked() -> anyhow::Result<()> {
    let remote = Arc::new(MemoryRemote::new());
    let mut list = ShoppingList::new(remote.clone());
    list.list("2024-06").await?;
    let pan = list.add(NewShoppingItem::new("Pan", 900, "2024-06")).await?;

    list.set_checked(&pan.id, true).await?;
    assert!(list.items()[0].is_checked);
    assert!(remote.shopping_items().await[0].is_checked);

    remote
        .fail_next(Operation::UpdateShoppingItem, RemoteError::timeout("slow"))
        .await;
    assert!(list.set_checked(&pan.id, false).await.is_err());
    assert!(list.items()[0].is_checked);

    Ok(())
}

#[tokio::test]
async fn test_cache_tracks_last_list() -> anyhow::Result<()> {
    let remote = Arc::new(MemoryRemote::new());
    let cache = Arc::new(MemoryStore::new());
    let mut list = ShoppingList::new(remote.clone()).with_cache(cache.clone());

    assert_eq!(list.cached("2024-06").await?, None);

    list.list("2024-06").await?;
    let pan = list.add(NewShoppingItem::new("Pan", 900, "2024-06")).await?;
    list.set_checked(&pan.id, true).await?;

    let cached = list.cached("2024-06").await?.unwrap_or_default();
    assert_eq!(cached.len(), 1);
    assert!(cached[0].is_checked);

    cache.set_unavailable(true);
    list.add(NewShoppingItem::new("Leche", 1200, "2024-06")).await?;
    assert_eq!(list.items().len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_sync_planned_adds_missing_only() -> anyhow::Result<()> {
    let remote = Arc::new(MemoryRemote::new());
    let mut list = ShoppingList::new(remote.clone());
    list.list("2024-06").await?;
    list.add(NewShoppingItem::new("CEBOLLA", 500, "2024-06")).await?;

    let ingredients = vec![
        planned("Choclo", "choclo"),
        planned("Cebolla", "cebolla"),
        planned("Zapallo", "zapallo"),
        planned("choclo ", "choclo"),
    ];

    let added = list.sync_planned(&ingredients, "2024-06").await?;
    let names: Vec<_> = added.iter().map(|item| item.name.as_str()).collect();

    assert_eq!(names, vec!["Choclo", "Zapallo"]);
    assert!(added.iter().all(|item| item.estimated_cost == 0));
    assert_eq!(list.items().len(), 3);

    let again = list.sync_planned(&ingredients, "2024-06").await?;
    assert!(again.is_empty());

    Ok(())
}
