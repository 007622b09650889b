use packlist_core::{Category, ItemPatch, NewItem, Status, TripKey};
use packlist_engine::{ItemSource, LoadOutcome};
use packlist_harness::{TestClient, TestServer};

// ============================================================================
// Single-session lifecycle: add, toggle, take, delete
// ============================================================================

#[test]
fn passport_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::new()?;
    let key = TripKey::generate();
    let mut client = TestClient::connect(&server, &key)?;

    assert_eq!(client.session.load()?, LoadOutcome::Fresh);
    assert!(client.session.items().is_empty());

    // Added with no explicit status, so it lands in Need.
    client.session.add_items(
        vec![NewItem::new("Passport", Category::Documents)?],
        ItemSource::Manual,
    )?;

    let grouped = client.session.grouped();
    assert_eq!(grouped.len(), 1);
    assert_eq!(grouped[0].category, Category::Documents);
    assert_eq!(grouped[0].subgroups.len(), 1);
    assert_eq!(grouped[0].subgroups[0].status, Status::Need);
    assert_eq!(grouped[0].subgroups[0].items[0].name, "Passport");

    // Toggling to Buy moves it out of the Need bucket.
    let id = client.id_of("Passport");
    client.session.update_item(id, ItemPatch::set_status(Status::Buy))?;
    let grouped = client.session.grouped();
    assert_eq!(grouped[0].subgroups.len(), 1);
    assert_eq!(grouped[0].subgroups[0].status, Status::Buy);
    assert_eq!(client.session.status_count(Status::Need), 0);

    // The take action parks it in Taken and drops it from the outstanding
    // counter.
    client.session.take_item(id)?;
    assert_eq!(client.status_of("Passport"), Status::Taken);
    assert_eq!(client.session.outstanding(), 0);
    assert_eq!(client.session.status_count(Status::Taken), 1);

    // The optimistic merge matches what the store has.
    client.session.load()?;
    assert_eq!(client.status_of("Passport"), Status::Taken);
    Ok(())
}

#[test]
fn taking_a_taken_item_is_a_no_op() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::new()?;
    let key = TripKey::generate();
    let mut client = TestClient::connect(&server, &key)?;
    client.session.load()?;
    client.add_manual("Boots", Category::Footwear, Status::Need)?;

    let id = client.id_of("Boots");
    client.session.take_item(id)?;
    let stamp = client.session.find_item(id).unwrap().updated_at;

    client.session.take_item(id)?;
    assert_eq!(client.session.find_item(id).unwrap().updated_at, stamp);
    Ok(())
}

#[test]
fn rename_keeps_status() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::new()?;
    let key = TripKey::generate();
    let mut client = TestClient::connect(&server, &key)?;
    client.session.load()?;
    client.add_manual("Socks", Category::Clothing, Status::Buy)?;

    let id = client.id_of("Socks");
    client.session.update_item(id, ItemPatch::rename("Wool socks")?)?;
    assert_eq!(client.status_of("Wool socks"), Status::Buy);

    client.session.load()?;
    assert_eq!(client.status_of("Wool socks"), Status::Buy);
    Ok(())
}

#[test]
fn batch_add_resynchronizes_with_concurrent_writers()
-> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::new()?;
    let key = TripKey::generate();
    let mut a = TestClient::connect(&server, &key)?;
    let mut b = TestClient::connect(&server, &key)?;
    a.session.load()?;
    b.session.load()?;

    b.add_manual("Towel", Category::Hygiene, Status::Need)?;

    // A's own add reloads, so it observes B's item without an explicit load.
    a.session.add_items(
        vec![
            NewItem::new("Passport", Category::Documents)?,
            NewItem::new("Charger", Category::Electronics)?.with_status(Status::Buy),
        ],
        ItemSource::Manual,
    )?;
    assert_eq!(a.session.items().len(), 3);
    Ok(())
}

#[test]
fn delete_item_and_delete_all() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::new()?;
    let key = TripKey::generate();
    let mut client = TestClient::connect(&server, &key)?;
    client.session.load()?;
    client.add_manual("Passport", Category::Documents, Status::Need)?;
    client.add_manual("Charger", Category::Electronics, Status::Buy)?;

    let id = client.id_of("Passport");
    client.session.delete_item(id)?;
    assert_eq!(client.session.items().len(), 1);

    // Second delete of the same id is safe.
    client.session.delete_item(id)?;
    assert_eq!(client.session.items().len(), 1);

    client.session.delete_all()?;
    assert!(client.session.items().is_empty());

    // The trip record itself survives a clear.
    assert_eq!(client.session.load()?, LoadOutcome::Fresh);
    assert!(client.session.items().is_empty());
    Ok(())
}

// ============================================================================
// Validation at the intent boundary
// ============================================================================

#[test]
fn blank_name_is_rejected_before_the_store() {
    assert!(NewItem::new("   ", Category::Other).is_err());
}

#[test]
fn empty_batch_is_a_validation_error() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::new()?;
    let key = TripKey::generate();
    let mut client = TestClient::connect(&server, &key)?;
    client.session.load()?;

    let err = client
        .session
        .add_items(Vec::new(), ItemSource::Manual)
        .unwrap_err();
    assert!(err.is_validation());
    Ok(())
}

#[test]
fn empty_patch_is_a_validation_error() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::new()?;
    let key = TripKey::generate();
    let mut client = TestClient::connect(&server, &key)?;
    client.session.load()?;
    client.add_manual("Passport", Category::Documents, Status::Need)?;

    let id = client.id_of("Passport");
    let err = client
        .session
        .update_item(id, ItemPatch::default())
        .unwrap_err();
    assert!(err.is_validation());
    Ok(())
}

// ============================================================================
// Template catalog side effects of adding items
// ============================================================================

#[test]
fn manual_add_upserts_into_catalog() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::new()?;
    let key = TripKey::generate();
    let mut client = TestClient::connect(&server, &key)?;
    client.session.load()?;

    client.add_manual("Passport", Category::Documents, Status::Need)?;

    let templates = client.session.templates()?;
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].name, "Passport");
    assert_eq!(templates[0].category, Category::Documents);
    Ok(())
}

#[test]
fn catalog_pick_does_not_write_back() -> Result<(), Box<dyn std::error::Error>> {
    let server = TestServer::new()?;
    let key = TripKey::generate();
    let mut client = TestClient::connect(&server, &key)?;
    client.session.load()?;

    client.add_from_catalog("Passport", Category::Documents, Status::Buy)?;

    assert!(client.session.templates()?.is_empty());
    assert_eq!(client.session.items().len(), 1);
    Ok(())
}
