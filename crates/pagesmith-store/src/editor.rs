//! Editing commands over the history and the persistence gateway.

use pagesmith_gateway::{ContentApi, GatewayResult, HttpContentApi, ImageUpload, PersistenceGateway};
use pagesmith_model::{Banner, ContentDocument, ImageRef, ItemId, Section, SectionPatch};

use crate::history::HistoryStore;
use crate::reorder::MoveCommand;

/// The single entry point for changing the page.
///
/// Every command builds the next document, offers it to the history, and
/// when the history accepts it hands the new state to the gateway.
pub struct Editor<A: ContentApi = HttpContentApi> {
    history: HistoryStore,
    gateway: PersistenceGateway<A>,
}

impl<A: ContentApi> Editor<A> {
    /// Start editing from whatever the gateway loads.
    pub async fn open(gateway: PersistenceGateway<A>) -> Self {
        let seed = gateway.load().await;
        Self::new(gateway, seed)
    }

    /// Start editing from `seed`.
    pub fn new(gateway: PersistenceGateway<A>, seed: ContentDocument) -> Self {
        Self {
            history: HistoryStore::new(seed),
            gateway,
        }
    }

    pub fn current(&self) -> &ContentDocument {
        self.history.current()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn gateway(&self) -> &PersistenceGateway<A> {
        &self.gateway
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub async fn add_section(&mut self, section: Section) -> bool {
        tracing::debug!("Adding {} section {}", section.kind(), section.id);
        let next = self.current().with_section_added(section);
        self.commit(next).await
    }

    pub async fn update_section(&mut self, id: ItemId, patch: SectionPatch) -> bool {
        if self.current().section(id).is_none() {
            tracing::debug!("Ignoring update of unknown section {}", id);
            return false;
        }
        let next = self.current().with_section_updated(id, &patch);
        self.commit(next).await
    }

    pub async fn remove_section(&mut self, id: ItemId) -> bool {
        if self.current().section(id).is_none() {
            tracing::debug!("Ignoring removal of unknown section {}", id);
            return false;
        }
        let next = self.current().with_section_removed(id);
        self.commit(next).await
    }

    /// Move the section at `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is outside the section list.
    pub async fn move_section(&mut self, from: usize, to: usize) -> bool {
        self.apply_drag(MoveCommand { from, to }).await
    }

    /// Apply a move emitted by a drag session.
    pub async fn apply_drag(&mut self, command: MoveCommand) -> bool {
        let next = command.apply(self.current());
        self.commit(next).await
    }

    pub async fn update_banner(&mut self, banner: Banner) -> bool {
        let next = self.current().with_banner(banner);
        self.commit(next).await
    }

    /// Step back one state and persist it.
    pub async fn undo(&mut self) -> bool {
        if !self.history.undo() {
            return false;
        }
        self.persist_current().await;
        true
    }

    /// Step forward one state and persist it.
    pub async fn redo(&mut self) -> bool {
        if !self.history.redo() {
            return false;
        }
        self.persist_current().await;
        true
    }

    /// Upload image bytes through the gateway. On failure the caller keeps
    /// its local blob reference.
    pub async fn upload_image(&self, upload: ImageUpload) -> GatewayResult<ImageRef> {
        self.gateway.upload_image(upload).await
    }

    async fn commit(&mut self, next: ContentDocument) -> bool {
        if !self.history.set_state(next) {
            return false;
        }
        self.persist_current().await;
        true
    }

    async fn persist_current(&self) {
        let current = self.history.current_arc();
        let stored = self.gateway.save(&current).await;
        if stored != *current {
            tracing::debug!("Server returned a transformed copy of the saved page");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use pagesmith_gateway::{GatewayError, LocalCache};
    use pagesmith_model::{SectionKind, StyleSet};
    use pretty_assertions::assert_eq;
    use tokio::sync::Mutex;

    use crate::reorder::{DragSession, PointerState, Rect};

    /// Backend that records every save and can be switched off.
    #[derive(Default)]
    struct RecordingApi {
        offline: bool,
        saves: Mutex<Vec<ContentDocument>>,
    }

    #[async_trait]
    impl ContentApi for RecordingApi {
        async fn fetch_content(&self) -> GatewayResult<ContentDocument> {
            if self.offline {
                return Err(GatewayError::Network("offline".into()));
            }
            Ok(self.saves.lock().await.last().cloned().unwrap_or_default())
        }

        async fn put_content(&self, doc: &ContentDocument) -> GatewayResult<ContentDocument> {
            if self.offline {
                return Err(GatewayError::Network("offline".into()));
            }
            self.saves.lock().await.push(doc.clone());
            Ok(doc.clone())
        }

        async fn upload_image(&self, _upload: ImageUpload) -> GatewayResult<ImageRef> {
            Err(GatewayError::Network("offline".into()))
        }
    }

    fn seed() -> ContentDocument {
        ContentDocument::new(
            Banner {
                title: "T".into(),
                ..Default::default()
            },
            vec![
                Section::new(1, SectionKind::Text, "A"),
                Section::new(2, SectionKind::Text, "B"),
            ],
        )
    }

    fn editor(api: RecordingApi) -> Editor<RecordingApi> {
        let gateway = PersistenceGateway::new(api, Arc::new(LocalCache::in_memory()));
        Editor::new(gateway, seed())
    }

    fn ids(editor: &Editor<RecordingApi>) -> Vec<ItemId> {
        editor.current().sections.iter().map(|s| s.id).collect()
    }

    #[tokio::test]
    async fn move_undo_redo_scenario() {
        let mut editor = editor(RecordingApi::default());

        assert!(editor.move_section(0, 1).await);
        assert_eq!(ids(&editor), vec![2, 1]);

        assert!(editor.undo().await);
        assert_eq!(ids(&editor), vec![1, 2]);

        assert!(editor.redo().await);
        assert_eq!(ids(&editor), vec![2, 1]);
    }

    #[tokio::test]
    async fn every_accepted_mutation_is_saved() {
        let mut editor = editor(RecordingApi::default());

        editor
            .add_section(Section::new(3, SectionKind::Gallery, "C"))
            .await;
        editor
            .update_section(
                1,
                SectionPatch::styles(StyleSet {
                    text_color: Some("#333333".into()),
                    ..Default::default()
                }),
            )
            .await;
        editor.remove_section(2).await;

        let saves = editor.gateway().api().saves.lock().await.clone();
        assert_eq!(saves.len(), 3);
        assert_eq!(saves.last(), Some(editor.current()));
        assert_eq!(ids(&editor), vec![1, 3]);
    }

    #[tokio::test]
    async fn no_op_mutations_are_not_saved() {
        let mut editor = editor(RecordingApi::default());

        assert!(!editor.update_section(1, SectionPatch::title("A")).await);
        assert!(!editor.update_section(99, SectionPatch::title("Z")).await);
        assert!(!editor.remove_section(99).await);
        assert!(!editor.move_section(1, 1).await);
        assert!(!editor.update_banner((*seed().banner).clone()).await);

        assert!(editor.gateway().api().saves.lock().await.is_empty());
        assert_eq!(editor.history().len(), 1);
    }

    #[tokio::test]
    async fn offline_edits_land_in_the_cache() {
        let mut editor = editor(RecordingApi {
            offline: true,
            ..Default::default()
        });

        editor
            .update_banner(Banner {
                title: "Offline".into(),
                ..Default::default()
            })
            .await;

        let cached = editor.gateway().cached().await.unwrap();
        assert_eq!(cached.banner.title, "Offline");
        assert_eq!(&cached, editor.current());
    }

    #[tokio::test]
    async fn undo_persists_the_restored_state() {
        let mut editor = editor(RecordingApi::default());
        editor.remove_section(1).await;
        editor.undo().await;

        assert_eq!(editor.gateway().cached().await, Some(seed()));
        assert!(!editor.undo().await);
    }

    #[tokio::test]
    async fn drag_gesture_moves_sections() {
        let mut editor = editor(RecordingApi::default());
        let mut drag = DragSession::start(0);

        let pointer = PointerState {
            client_y: 180.0,
            hover_rect: Rect::new(100.0, 200.0),
        };
        let command = drag.hover(1, pointer).expect("past the midpoint");
        editor.apply_drag(command).await;

        assert_eq!(ids(&editor), vec![2, 1]);
        assert_eq!(drag.finish(), 1);
        assert_eq!(editor.history().len(), 2);
    }

    #[tokio::test]
    async fn open_seeds_from_the_gateway() {
        let cache = Arc::new(LocalCache::in_memory());
        cache
            .set_json(pagesmith_gateway::CONTENT_KEY, &seed())
            .await
            .unwrap();
        let api = RecordingApi {
            offline: true,
            ..Default::default()
        };

        let editor = Editor::open(PersistenceGateway::new(api, cache)).await;

        assert_eq!(editor.current(), &seed());
        assert!(!editor.can_undo());
        assert!(!editor.can_redo());
    }
}
