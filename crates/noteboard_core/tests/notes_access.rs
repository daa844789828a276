use noteboard_core::db::{open_db, open_db_in_memory};
use noteboard_core::{
    slugify, Caller, CoreConfig, Identity, Note, NoteDraft, NoteRepository, NoteService, Reply,
    RepoError, ServiceError, SqliteNoteRepository, SqliteUserRepository, UserRepository,
};
use rusqlite::Connection;
use std::sync::{Arc, Barrier};
use std::thread;

const SLUG: &str = "note-slug";

struct Fixture {
    conn: Connection,
    config: CoreConfig,
    author: Identity,
    reader: Identity,
}

impl Fixture {
    fn new() -> Self {
        let conn = open_db_in_memory().unwrap();
        let author = Identity::new("Автор");
        let reader = Identity::new("Читатель");
        {
            let users = SqliteUserRepository::new(&conn);
            users.insert_user(&author).unwrap();
            users.insert_user(&reader).unwrap();
        }
        Self {
            conn,
            config: CoreConfig::default(),
            author,
            reader,
        }
    }

    fn with_note() -> (Self, Note) {
        let fixture = Self::new();
        let note = Note::new(fixture.author.id, SLUG, "Заголовок", "Текст");
        fixture.notes().insert_note(&note).unwrap();
        (fixture, note)
    }

    fn notes(&self) -> SqliteNoteRepository<'_> {
        SqliteNoteRepository::new(&self.conn)
    }

    fn service(&self) -> NoteService<SqliteNoteRepository<'_>> {
        NoteService::new(self.notes(), &self.config)
    }

    fn author(&self) -> Caller {
        Caller::Authenticated(self.author.clone())
    }

    fn reader(&self) -> Caller {
        Caller::Authenticated(self.reader.clone())
    }

    fn count(&self) -> u64 {
        self.notes().count_notes().unwrap()
    }
}

fn form() -> NoteDraft {
    NoteDraft::new("Новый заголовок", "Новый текст", "new-slug")
}

#[test]
fn authenticated_user_can_create_note() {
    let fixture = Fixture::new();
    let draft = form();

    let created = fixture.service().create_note(&fixture.author(), &draft).unwrap();

    assert_eq!(fixture.count(), 1);
    let stored = fixture.notes().get_note_by_slug("new-slug").unwrap().unwrap();
    assert_eq!(stored, created);
    assert_eq!(stored.title, draft.title);
    assert_eq!(stored.text, draft.text);
    assert_eq!(stored.owner, fixture.author.id);
}

#[test]
fn anonymous_user_cannot_create_note() {
    let fixture = Fixture::new();

    let err = fixture
        .service()
        .create_note(&Caller::Anonymous, &form())
        .unwrap_err();

    match err {
        ServiceError::Unauthenticated { login_url } => {
            assert_eq!(login_url, "/auth/login/?next=/add/");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(fixture.count(), 0);
}

#[test]
fn duplicate_slug_is_rejected_and_storage_is_unchanged() {
    let (fixture, note) = Fixture::with_note();
    let draft = NoteDraft::new("Другой", "Другой текст", note.slug.as_str());

    let err = fixture
        .service()
        .create_note(&fixture.author(), &draft)
        .unwrap_err();

    assert!(matches!(&err, ServiceError::SlugConflict(slug) if slug == SLUG));
    assert_eq!(err.field(), Some("slug"));
    assert_eq!(
        err.field_message().as_deref(),
        Some("note-slug - already taken, enter another value.")
    );
    assert_eq!(fixture.count(), 1);
    assert_eq!(fixture.notes().get_note_by_slug(SLUG).unwrap().unwrap(), note);
}

#[test]
fn empty_slug_is_derived_from_title() {
    let fixture = Fixture::new();
    let draft = NoteDraft::new("Новый заголовок", "Текст", "");

    let created = fixture.service().create_note(&fixture.author(), &draft).unwrap();

    assert_eq!(created.slug, slugify(&draft.title, fixture.config.slug_max_length));
    assert_eq!(created.slug, "novyij-zagolovok");
    assert_eq!(fixture.count(), 1);
}

#[test]
fn derived_slug_collision_fails_closed() {
    let fixture = Fixture::new();
    let draft = NoteDraft::new("New Title", "Текст", "");
    fixture.service().create_note(&fixture.author(), &draft).unwrap();

    let err = fixture
        .service()
        .create_note(&fixture.reader(), &draft)
        .unwrap_err();

    assert!(matches!(&err, ServiceError::SlugConflict(slug) if slug == "new-title"));
    assert_eq!(fixture.count(), 1);
}

#[test]
fn malformed_slug_is_rejected_without_write() {
    let fixture = Fixture::new();
    let draft = NoteDraft::new("Заголовок", "Текст", "not a slug!");

    let err = fixture
        .service()
        .create_note(&fixture.author(), &draft)
        .unwrap_err();

    assert!(matches!(err, ServiceError::SlugInvalid { .. }));
    assert_eq!(err.field(), Some("slug"));
    assert_eq!(fixture.count(), 0);
}

#[test]
fn author_can_edit_note() {
    let (fixture, note) = Fixture::with_note();
    let draft = form();

    let updated = fixture
        .service()
        .edit_note(&fixture.author(), &note.slug, &draft)
        .unwrap();

    let stored = fixture.notes().get_note(note.id).unwrap().unwrap();
    assert_eq!(stored, updated);
    assert_eq!(stored.title, draft.title);
    assert_eq!(stored.text, draft.text);
    assert_eq!(stored.slug, draft.slug);
    assert_eq!(stored.owner, fixture.author.id);
    assert!(fixture.notes().get_note_by_slug(SLUG).unwrap().is_none());
}

#[test]
fn edit_keeping_own_slug_is_not_a_conflict() {
    let (fixture, note) = Fixture::with_note();
    let draft = NoteDraft::new("Обновлено", "Текст", SLUG);

    let updated = fixture
        .service()
        .edit_note(&fixture.author(), &note.slug, &draft)
        .unwrap();

    assert_eq!(updated.slug, SLUG);
    assert_eq!(updated.title, "Обновлено");
}

#[test]
fn edit_with_blank_slug_rederives_from_title() {
    let (fixture, note) = Fixture::with_note();
    let draft = NoteDraft::new("New Title", "Текст", "");

    let updated = fixture
        .service()
        .edit_note(&fixture.author(), &note.slug, &draft)
        .unwrap();

    assert_eq!(updated.slug, "new-title");
    assert_eq!(updated.id, note.id);
    let stored = fixture.notes().get_note_by_slug("new-title").unwrap().unwrap();
    assert_eq!(stored, updated);
    assert!(fixture.notes().get_note_by_slug(SLUG).unwrap().is_none());
}

#[test]
fn edit_blank_slug_colliding_with_other_note_conflicts() {
    let (fixture, note) = Fixture::with_note();
    let other = Note::new(fixture.author.id, "other-title", "Other Title", "Текст");
    fixture.notes().insert_note(&other).unwrap();
    let draft = NoteDraft::new("Other Title", "Новый текст", "");

    let err = fixture
        .service()
        .edit_note(&fixture.author(), &note.slug, &draft)
        .unwrap_err();

    assert!(matches!(&err, ServiceError::SlugConflict(slug) if slug == "other-title"));
    assert_eq!(fixture.notes().get_note(note.id).unwrap().unwrap(), note);
    assert_eq!(fixture.notes().get_note(other.id).unwrap().unwrap(), other);
}

#[test]
fn edit_onto_another_notes_slug_conflicts() {
    let (fixture, note) = Fixture::with_note();
    let other = Note::new(fixture.author.id, "other-slug", "Другая", "Текст");
    fixture.notes().insert_note(&other).unwrap();
    let draft = NoteDraft::new("Заголовок", "Текст", "other-slug");

    let err = fixture
        .service()
        .edit_note(&fixture.author(), &note.slug, &draft)
        .unwrap_err();

    assert!(matches!(err, ServiceError::SlugConflict(_)));
    assert_eq!(fixture.notes().get_note(note.id).unwrap().unwrap(), note);
}

#[test]
fn other_user_cannot_edit_note() {
    let (fixture, note) = Fixture::with_note();

    let err = fixture
        .service()
        .edit_note(&fixture.reader(), &note.slug, &form())
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(fixture.notes().get_note(note.id).unwrap().unwrap(), note);
}

#[test]
fn author_can_delete_note() {
    let (fixture, note) = Fixture::with_note();

    let deleted = fixture
        .service()
        .delete_note(&fixture.author(), &note.slug)
        .unwrap();

    assert_eq!(deleted, note);
    assert_eq!(fixture.count(), 0);
    assert!(fixture.notes().get_note(note.id).unwrap().is_none());
}

#[test]
fn other_user_cannot_delete_note() {
    let (fixture, note) = Fixture::with_note();

    let err = fixture
        .service()
        .delete_note(&fixture.reader(), &note.slug)
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(fixture.count(), 1);
}

#[test]
fn foreign_note_and_missing_note_are_indistinguishable() {
    let (fixture, note) = Fixture::with_note();
    let service = fixture.service();

    let foreign = service.detail(&fixture.reader(), &note.slug).unwrap_err();
    let missing = service.detail(&fixture.reader(), "no-such-note").unwrap_err();

    assert!(foreign.is_not_found());
    assert!(missing.is_not_found());
    assert_eq!(foreign.to_string(), missing.to_string());
}

#[test]
fn notes_list_contains_only_own_notes() {
    let (fixture, note) = Fixture::with_note();
    let service = fixture.service();

    let own = service.list_own(&fixture.author()).unwrap();
    let foreign = service.list_own(&fixture.reader()).unwrap();

    assert_eq!(own, vec![note]);
    assert!(foreign.is_empty());
}

#[test]
fn owner_sees_edit_and_delete_forms() {
    let (fixture, note) = Fixture::with_note();
    let service = fixture.service();

    let draft = service.edit_form(&fixture.author(), &note.slug).unwrap();
    assert_eq!(draft, NoteDraft::new("Заголовок", "Текст", SLUG));
    assert_eq!(service.delete_form(&fixture.author(), &note.slug).unwrap(), note);
    assert_eq!(service.add_form(&fixture.author()).unwrap(), NoteDraft::default());
}

#[test]
fn anonymous_caller_is_redirected_from_every_note_page() {
    let (fixture, note) = Fixture::with_note();
    let service = fixture.service();
    let anon = Caller::Anonymous;
    let login = |path: &str| format!("/auth/login/?next={path}");

    let cases: Vec<(Result<(), ServiceError>, String)> = vec![
        (service.list_own(&anon).map(drop), login("/notes/")),
        (service.success(&anon), login("/done/")),
        (service.add_form(&anon).map(drop), login("/add/")),
        (
            service.detail(&anon, &note.slug).map(drop),
            login("/note/note-slug/"),
        ),
        (
            service.edit_form(&anon, &note.slug).map(drop),
            login("/edit/note-slug/"),
        ),
        (
            service.delete_form(&anon, &note.slug).map(drop),
            login("/delete/note-slug/"),
        ),
        (
            service.detail(&anon, "no-such-note").map(drop),
            login("/note/no-such-note/"),
        ),
    ];

    for (result, expected) in cases {
        match result {
            Err(ServiceError::Unauthenticated { login_url }) => assert_eq!(login_url, expected),
            other => panic!("expected redirect to {expected}, got {other:?}"),
        }
    }
}

#[test]
fn replies_map_to_expected_statuses() {
    let (fixture, note) = Fixture::with_note();
    let service = fixture.service();
    let done = service.success_path().to_string();

    let created: Reply<()> = Reply::from_service(
        service.create_note(&fixture.author(), &form()),
        |_| Reply::Redirect(done.clone()),
    )
    .unwrap();
    assert_eq!(created.status(), 302);
    assert_eq!(created.location(), Some("/done/"));

    let conflict: Reply<()> = Reply::from_service(
        service.create_note(&fixture.author(), &NoteDraft::new("t", "x", SLUG)),
        |_| Reply::Redirect(done.clone()),
    )
    .unwrap();
    assert_eq!(conflict.status(), 200);
    assert!(matches!(conflict, Reply::Invalid { field: "slug", .. }));

    let foreign: Reply<Note> =
        Reply::from_service(service.detail(&fixture.reader(), &note.slug), Reply::Page).unwrap();
    assert_eq!(foreign.status(), 404);

    let anonymous: Reply<Note> =
        Reply::from_service(service.detail(&Caller::Anonymous, &note.slug), Reply::Page).unwrap();
    assert_eq!(anonymous.status(), 302);
    assert_eq!(anonymous.location(), Some("/auth/login/?next=/note/note-slug/"));

    let own: Reply<Note> =
        Reply::from_service(service.detail(&fixture.author(), &note.slug), Reply::Page).unwrap();
    assert_eq!(own.status(), 200);
}

#[test]
fn concurrent_creates_with_same_slug_store_one_note() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("race.db");
    let owner = Identity::new("Автор");
    {
        let conn = open_db(&path).unwrap();
        SqliteUserRepository::new(&conn).insert_user(&owner).unwrap();
    }

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = (0..2)
        .map(|worker| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            let owner_id = owner.id;
            thread::spawn(move || {
                let conn = open_db(&path).unwrap();
                let repo = SqliteNoteRepository::new(&conn);
                let note = Note::new(owner_id, "shared-slug", format!("t{worker}"), "x");
                barrier.wait();
                repo.insert_note(&note)
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|result| matches!(result, Err(RepoError::SlugTaken(slug)) if slug == "shared-slug")));

    let conn = open_db(&path).unwrap();
    assert_eq!(SqliteNoteRepository::new(&conn).count_notes().unwrap(), 1);
}
