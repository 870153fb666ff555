use levelsmith_core::db::open_db_in_memory;
use levelsmith_core::{
    Caller, CatalogRepository, DraftId, DraftRepository, DraftService, LevelError, LevelName,
    LevelPayload, NameAllocator, NewDraft, NotFoundTarget, PublicationService,
    RandomWordSource, RepoError, SqliteCatalogRepository, SqliteDraftRepository,
    SqlitePublicationRepository, SqliteUserRepository, UserRepository, WordSource,
};
use rusqlite::Connection;
use serde_json::json;

struct FixedWords(&'static str);

impl WordSource for FixedWords {
    fn phrase(&self, _word_count: usize) -> Vec<String> {
        self.0.split(' ').map(str::to_string).collect()
    }
}

fn new_caller(conn: &Connection, username: &str) -> Caller {
    let users = SqliteUserRepository::try_new(conn).unwrap();
    Caller::from_verified(users.create_user(username, None).unwrap().id)
}

#[test]
fn create_draft_assigns_name_and_empty_payload() {
    let conn = open_db_in_memory().unwrap();
    let owner = new_caller(&conn, "alice");
    let service = DraftService::new(SqliteDraftRepository::try_new(&conn).unwrap());

    let draft = service
        .create_draft(&owner, &NameAllocator::new(RandomWordSource))
        .unwrap();

    assert_eq!(draft.owner, owner.user_id());
    assert_eq!(draft.name.as_str().split(' ').count(), 4);
    assert_eq!(draft.content, LevelPayload::empty());
    assert_eq!(draft.published_id, None);

    let loaded = service.get_draft(&owner, draft.id).unwrap();
    assert_eq!(loaded, draft);
}

#[test]
fn set_content_then_get_content_roundtrips_exactly() {
    let conn = open_db_in_memory().unwrap();
    let owner = new_caller(&conn, "alice");
    let service = DraftService::new(SqliteDraftRepository::try_new(&conn).unwrap());
    let draft = service
        .create_draft(&owner, &NameAllocator::new(RandomWordSource))
        .unwrap();

    let payload = LevelPayload::new(json!({
        "rooms": 3,
        "spawn": {"x": 1.5, "y": -2},
        "tiles": [[0, 0, 1], [1, null, 0]],
        "title": "naïve ☃"
    }));
    service.set_content(&owner, draft.id, &payload).unwrap();
    assert_eq!(service.get_content(&owner, draft.id).unwrap(), payload);

    let replacement = LevelPayload::new(json!({"rooms": 1}));
    service.set_content(&owner, draft.id, &replacement).unwrap();
    assert_eq!(service.get_content(&owner, draft.id).unwrap(), replacement);
}

#[test]
fn non_owner_sees_not_found_for_every_operation() {
    let conn = open_db_in_memory().unwrap();
    let owner = new_caller(&conn, "alice");
    let intruder = new_caller(&conn, "mallory");
    let service = DraftService::new(SqliteDraftRepository::try_new(&conn).unwrap());
    let draft = service
        .create_draft(&owner, &NameAllocator::new(RandomWordSource))
        .unwrap();

    let not_found = |err: LevelError| {
        assert!(
            matches!(err, LevelError::NotFound(NotFoundTarget::Draft(id)) if id == draft.id),
            "unexpected error: {err}"
        )
    };

    not_found(service.get_content(&intruder, draft.id).unwrap_err());
    not_found(
        service
            .set_content(&intruder, draft.id, &LevelPayload::new(json!({"rooms": 9})))
            .unwrap_err(),
    );
    not_found(service.rename(&intruder, draft.id, "Mine Now").unwrap_err());
    not_found(service.delete(&intruder, draft.id).unwrap_err());

    let publication =
        PublicationService::new(SqlitePublicationRepository::try_new(&conn).unwrap());
    not_found(publication.publish(&intruder, draft.id).unwrap_err());

    let untouched = service.get_draft(&owner, draft.id).unwrap();
    assert_eq!(untouched.content, LevelPayload::empty());
    assert_eq!(untouched.name, draft.name);
    assert_eq!(untouched.published_id, None);
    assert!(service.list_drafts(&intruder).unwrap().is_empty());
}

#[test]
fn unknown_draft_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let owner = new_caller(&conn, "alice");
    let service = DraftService::new(SqliteDraftRepository::try_new(&conn).unwrap());

    let missing = DraftId::new();
    assert!(matches!(
        service.get_content(&owner, missing),
        Err(LevelError::NotFound(NotFoundTarget::Draft(id))) if id == missing
    ));
}

#[test]
fn rename_updates_name_and_rejects_blank() {
    let conn = open_db_in_memory().unwrap();
    let owner = new_caller(&conn, "alice");
    let service = DraftService::new(SqliteDraftRepository::try_new(&conn).unwrap());
    let draft = service
        .create_draft(&owner, &NameAllocator::new(RandomWordSource))
        .unwrap();

    let renamed = service.rename(&owner, draft.id, "  Castle Run  ").unwrap();
    assert_eq!(renamed.as_str(), "Castle Run");
    assert_eq!(
        service.get_draft(&owner, draft.id).unwrap().name.as_str(),
        "Castle Run"
    );

    assert!(matches!(
        service.rename(&owner, draft.id, "   "),
        Err(LevelError::InvalidName(_))
    ));
}

#[test]
fn rename_onto_sibling_name_is_allowed() {
    let conn = open_db_in_memory().unwrap();
    let owner = new_caller(&conn, "alice");
    let service = DraftService::new(SqliteDraftRepository::try_new(&conn).unwrap());
    let first = service
        .create_draft(&owner, &NameAllocator::new(FixedWords("amber fox runs far")))
        .unwrap();
    let second = service
        .create_draft(&owner, &NameAllocator::new(FixedWords("quiet owl hops home")))
        .unwrap();

    let renamed = service
        .rename(&owner, second.id, first.name.as_str())
        .unwrap();
    assert_eq!(renamed, first.name);

    let names = service
        .list_drafts(&owner)
        .unwrap()
        .into_iter()
        .map(|draft| draft.name.as_str().to_string())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Amber Fox Runs Far", "Amber Fox Runs Far"]);
}

#[test]
fn creation_still_avoids_a_name_taken_by_rename() {
    let conn = open_db_in_memory().unwrap();
    let owner = new_caller(&conn, "alice");
    let service = DraftService::new(SqliteDraftRepository::try_new(&conn).unwrap());
    let draft = service
        .create_draft(&owner, &NameAllocator::new(FixedWords("quiet owl hops home")))
        .unwrap();
    service
        .rename(&owner, draft.id, "Amber Fox Runs Far")
        .unwrap();

    let err = service
        .create_draft(
            &owner,
            &NameAllocator::new(FixedWords("amber fox runs far")).with_max_attempts(2),
        )
        .unwrap_err();
    assert!(matches!(err, LevelError::NameSpaceExhausted { attempts: 2 }));
    assert_eq!(service.list_drafts(&owner).unwrap().len(), 1);
}

#[test]
fn same_name_is_allowed_for_different_owners() {
    let conn = open_db_in_memory().unwrap();
    let alice = new_caller(&conn, "alice");
    let bob = new_caller(&conn, "bob");
    let service = DraftService::new(SqliteDraftRepository::try_new(&conn).unwrap());
    let allocator = NameAllocator::new(FixedWords("amber fox runs far"));

    let a = service.create_draft(&alice, &allocator).unwrap();
    let b = service.create_draft(&bob, &allocator).unwrap();
    assert_eq!(a.name, b.name);
}

#[test]
fn insert_draft_reports_name_taken_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let owner = new_caller(&conn, "alice");
    let repo = SqliteDraftRepository::try_new(&conn).unwrap();
    let name = LevelName::parse("Amber Fox Runs Far").unwrap();

    repo.insert_draft(&NewDraft {
        id: DraftId::new(),
        owner: owner.user_id(),
        name: name.clone(),
        content: LevelPayload::empty(),
    })
    .unwrap();

    let err = repo
        .insert_draft(&NewDraft {
            id: DraftId::new(),
            owner: owner.user_id(),
            name,
            content: LevelPayload::empty(),
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::NameTaken { owner: id } if id == owner.user_id()));
    assert_eq!(repo.list_drafts(owner.user_id()).unwrap().len(), 1);
}

#[test]
fn list_drafts_returns_owner_drafts_in_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let owner = new_caller(&conn, "alice");
    let other = new_caller(&conn, "bob");
    let service = DraftService::new(SqliteDraftRepository::try_new(&conn).unwrap());
    let allocator = NameAllocator::new(RandomWordSource);

    let first = service.create_draft(&owner, &allocator).unwrap();
    let second = service.create_draft(&owner, &allocator).unwrap();
    service.create_draft(&other, &allocator).unwrap();

    conn.execute(
        "UPDATE drafts SET created_at = 1000 WHERE id = ?1;",
        [first.id.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE drafts SET created_at = 2000 WHERE id = ?1;",
        [second.id.to_string()],
    )
    .unwrap();

    let listed = service.list_drafts(&owner).unwrap();
    let ids = listed.iter().map(|item| item.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[test]
fn deleting_published_draft_keeps_published_level() {
    let conn = open_db_in_memory().unwrap();
    let owner = new_caller(&conn, "alice");
    let drafts = DraftService::new(SqliteDraftRepository::try_new(&conn).unwrap());
    let publication =
        PublicationService::new(SqlitePublicationRepository::try_new(&conn).unwrap());
    let catalog = SqliteCatalogRepository::try_new(&conn).unwrap();

    let draft = drafts
        .create_draft(&owner, &NameAllocator::new(RandomWordSource))
        .unwrap();
    let payload = LevelPayload::new(json!({"rooms": 4}));
    drafts.set_content(&owner, draft.id, &payload).unwrap();
    let published = publication.publish(&owner, draft.id).unwrap();

    drafts.delete(&owner, draft.id).unwrap();

    assert!(matches!(
        drafts.get_draft(&owner, draft.id),
        Err(LevelError::NotFound(_))
    ));
    let orphan = catalog.get_published(published.id).unwrap().unwrap();
    assert_eq!(orphan.content, payload);
    assert_eq!(orphan.publisher, owner.user_id());
}
