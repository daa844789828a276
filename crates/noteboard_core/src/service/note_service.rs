//! Note use-case service.
//!
//! # Responsibility
//! - Owner-scoped list/detail/create/edit/delete of notes.
//! - Allocate slugs on create and on slug-changing edits.
//!
//! # Invariants
//! - Anonymous callers are redirected before any lookup.
//! - A note owned by someone else is reported exactly like a missing one.
//! - A slug conflict leaves storage unchanged.

use crate::access::{retain_owned, Action};
use crate::config::CoreConfig;
use crate::model::note::{Note, NoteDraft};
use crate::model::user::Caller;
use crate::repo::note_repo::NoteRepository;
use crate::routes::RouteConfig;
use crate::service::{
    acting_user, guard, guard_page, log_failure, ResourceUnavailable, ServiceError,
};
use crate::slug::SlugAllocator;
use log::info;

pub struct NoteService<R: NoteRepository> {
    repo: R,
    allocator: SlugAllocator,
    routes: RouteConfig,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R, config: &CoreConfig) -> Self {
        Self {
            repo,
            allocator: SlugAllocator::from_config(config),
            routes: config.routes.clone(),
        }
    }

    /// Where successful create/edit/delete operations redirect to.
    pub fn success_path(&self) -> &str {
        self.routes.note_success.as_str()
    }

    /// Lists the caller's own notes.
    pub fn list_own(&self, caller: &Caller) -> Result<Vec<Note>, ServiceError> {
        guard(
            caller,
            None,
            Action::ListOwn,
            &self.routes.notes_list,
            &self.routes,
            "note_list",
        )?;
        let owner = acting_user(caller)?;
        let notes = self.repo.list_notes_by_owner(owner)?;
        Ok(retain_owned(caller, notes))
    }

    /// Shows the "done" page; authenticated callers only.
    pub fn success(&self, caller: &Caller) -> Result<(), ServiceError> {
        guard_page(caller, &self.routes.note_success, &self.routes, "note_success")
    }

    /// Empty add form; authenticated callers only.
    pub fn add_form(&self, caller: &Caller) -> Result<NoteDraft, ServiceError> {
        guard(
            caller,
            None,
            Action::Create,
            &self.routes.note_add,
            &self.routes,
            "note_add_form",
        )?;
        Ok(NoteDraft::default())
    }

    /// Owner-only detail view.
    pub fn detail(&self, caller: &Caller, slug: &str) -> Result<Note, ServiceError> {
        let path = self.routes.note_detail(slug);
        self.load_owned(caller, slug, Action::Read, &path, "note_detail")
    }

    /// Owner-only edit form prefilled from the stored note.
    pub fn edit_form(&self, caller: &Caller, slug: &str) -> Result<NoteDraft, ServiceError> {
        let path = self.routes.note_edit(slug);
        let note = self.load_owned(caller, slug, Action::Read, &path, "note_edit_form")?;
        Ok(NoteDraft::new(note.title, note.text, note.slug))
    }

    /// Owner-only delete confirmation.
    pub fn delete_form(&self, caller: &Caller, slug: &str) -> Result<Note, ServiceError> {
        let path = self.routes.note_delete(slug);
        self.load_owned(caller, slug, Action::Read, &path, "note_delete_form")
    }

    /// Creates a note owned by the caller.
    ///
    /// # Errors
    /// - `Unauthenticated` for anonymous callers.
    /// - `SlugInvalid` / `SlugConflict` for unusable or taken slugs.
    pub fn create_note(&self, caller: &Caller, draft: &NoteDraft) -> Result<Note, ServiceError> {
        guard(
            caller,
            None,
            Action::Create,
            &self.routes.note_add,
            &self.routes,
            "note_create",
        )?;
        let owner = acting_user(caller)?;
        let proposal = self.allocator.propose(&draft.slug, &draft.title)?;
        let note = Note::new(
            owner,
            proposal.slug,
            draft.title.as_str(),
            draft.text.as_str(),
        );

        let note_id = self
            .repo
            .insert_note(&note)
            .map_err(|err| log_failure("note_create", err.into()))?;
        let created = self
            .repo
            .get_note(note_id)?
            .ok_or(ServiceError::InconsistentState(
                "created note not found in read-back",
            ))?;

        info!(
            "event=note_create module=service status=ok note_id={} slug_derived={}",
            created.id, proposal.derived
        );
        Ok(created)
    }

    /// Replaces title, text and slug of the caller's note.
    ///
    /// An empty slug re-derives from the new title. The owner never changes.
    pub fn edit_note(
        &self,
        caller: &Caller,
        slug: &str,
        draft: &NoteDraft,
    ) -> Result<Note, ServiceError> {
        let path = self.routes.note_edit(slug);
        let current = self.load_owned(caller, slug, Action::Mutate, &path, "note_edit")?;
        let proposal = self.allocator.propose(&draft.slug, &draft.title)?;

        let updated = Note {
            id: current.id,
            owner: current.owner,
            slug: proposal.slug,
            title: draft.title.clone(),
            text: draft.text.clone(),
        };
        self.repo
            .update_note(&updated)
            .map_err(|err| log_failure("note_edit", err.into()))?;

        info!(
            "event=note_edit module=service status=ok note_id={} slug_changed={}",
            updated.id,
            updated.slug != current.slug
        );
        Ok(updated)
    }

    /// Deletes the caller's note and returns what was removed.
    pub fn delete_note(&self, caller: &Caller, slug: &str) -> Result<Note, ServiceError> {
        let path = self.routes.note_delete(slug);
        let note = self.load_owned(caller, slug, Action::Mutate, &path, "note_delete")?;
        self.repo
            .delete_note(note.id)
            .map_err(|err| log_failure("note_delete", err.into()))?;

        info!(
            "event=note_delete module=service status=ok note_id={}",
            note.id
        );
        Ok(note)
    }

    fn load_owned(
        &self,
        caller: &Caller,
        slug: &str,
        action: Action,
        path: &str,
        event: &'static str,
    ) -> Result<Note, ServiceError> {
        guard_page(caller, path, &self.routes, event)?;
        match self.repo.get_note_by_slug(slug)? {
            Some(note) => {
                guard(caller, Some(note.owner), action, path, &self.routes, event)?;
                Ok(note)
            }
            None => {
                info!("event={event} module=service status=denied reason=not_found");
                Err(ServiceError::Unavailable(ResourceUnavailable::NotFound))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NoteService;
    use crate::config::CoreConfig;
    use crate::model::note::{Note, NoteDraft, NoteId};
    use crate::model::user::{Caller, Identity, UserId};
    use crate::repo::note_repo::NoteRepository;
    use crate::repo::RepoResult;
    use crate::service::ServiceError;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Empty store that counts slug lookups.
    #[derive(Default)]
    struct LookupCounter {
        lookups: Rc<Cell<u32>>,
    }

    impl NoteRepository for LookupCounter {
        fn insert_note(&self, note: &Note) -> RepoResult<NoteId> {
            Ok(note.id)
        }

        fn update_note(&self, _note: &Note) -> RepoResult<()> {
            Ok(())
        }

        fn delete_note(&self, _id: NoteId) -> RepoResult<()> {
            Ok(())
        }

        fn get_note(&self, _id: NoteId) -> RepoResult<Option<Note>> {
            Ok(None)
        }

        fn get_note_by_slug(&self, _slug: &str) -> RepoResult<Option<Note>> {
            self.lookups.set(self.lookups.get() + 1);
            Ok(None)
        }

        fn list_notes_by_owner(&self, _owner: UserId) -> RepoResult<Vec<Note>> {
            Ok(Vec::new())
        }

        fn count_notes(&self) -> RepoResult<u64> {
            Ok(0)
        }
    }

    #[test]
    fn anonymous_caller_is_redirected_before_lookup() {
        let repo = LookupCounter::default();
        let lookups = Rc::clone(&repo.lookups);
        let service = NoteService::new(repo, &CoreConfig::default());
        let anon = Caller::Anonymous;
        let draft = NoteDraft::new("t", "x", "");

        let results = [
            service.detail(&anon, "slug").map(drop),
            service.edit_form(&anon, "slug").map(drop),
            service.delete_form(&anon, "slug").map(drop),
            service.edit_note(&anon, "slug", &draft).map(drop),
            service.delete_note(&anon, "slug").map(drop),
        ];

        for result in results {
            assert!(matches!(result, Err(ServiceError::Unauthenticated { .. })));
        }
        assert_eq!(lookups.get(), 0);
    }

    #[test]
    fn authenticated_caller_gets_not_found_after_lookup() {
        let repo = LookupCounter::default();
        let lookups = Rc::clone(&repo.lookups);
        let service = NoteService::new(repo, &CoreConfig::default());

        let err = service
            .detail(&Caller::from(Identity::new("author")), "missing")
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(lookups.get(), 1);
    }
}
