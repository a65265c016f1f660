use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{error, warn};

use crate::errors::SessionError;
use crate::models::book_model::{Book, BookUpdate, NewBook};
use crate::models::patch::Patch;
use crate::services::book_service::BookService;

/// Snapshot of the client-side library state.
#[derive(Debug, Clone, Default)]
pub struct LibraryState {
    pub books: Vec<Book>,
    pub genres: Vec<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub search_query: String,
}

/// Canonical in-memory book and genre state for one UI session.
///
/// Mutations go through the gateway first and patch the local list only
/// after server confirmation; the list is never refetched wholesale after
/// a mutation. Search-query changes schedule a debounced refetch, and each
/// list fetch carries a sequence number so a slow stale response can never
/// overwrite a newer one.
///
/// The handle is cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct LibrarySession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    service: BookService,
    state: RwLock<LibraryState>,
    fetch_seq: AtomicU64,
    pending_search: Mutex<Option<JoinHandle<()>>>,
    debounce_window: Duration,
}

impl LibrarySession {
    pub fn new(service: BookService, debounce_window: Duration) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                service,
                state: RwLock::new(LibraryState::default()),
                fetch_seq: AtomicU64::new(0),
                pending_search: Mutex::new(None),
                debounce_window,
            }),
        }
    }

    /// Initial load: one unconditional book fetch and one genre fetch,
    /// run independently. Book data is essential, genre data is cosmetic,
    /// so only the book fetch can surface an error.
    pub async fn start(&self) {
        self.refresh().await;
        self.load_genres().await;
    }

    /// Fetch the book list for the current search query. Sets `loading`
    /// for the duration and `error` on failure. If a newer fetch started
    /// while this one was in flight, its result is discarded.
    pub async fn refresh(&self) {
        let seq = self.inner.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let query = {
            let mut state = self.inner.state.write().await;
            state.loading = true;
            state.error = None;
            state.search_query.clone()
        };

        let query = query.trim().to_string();
        let filter = if query.is_empty() {
            None
        } else {
            Some(query.as_str())
        };

        let result = self.inner.service.list_books(filter).await;

        if self.inner.fetch_seq.load(Ordering::SeqCst) != seq {
            // superseded while in flight; the newer fetch owns the state
            return;
        }

        let mut state = self.inner.state.write().await;
        match result {
            Ok(books) => {
                state.books = books;
            }
            Err(e) => {
                error!("failed to fetch books: {}", e);
                state.error = Some(SessionError::ListFailed.to_string());
            }
        }
        state.loading = false;
    }

    async fn load_genres(&self) {
        match self.inner.service.list_genres().await {
            Ok(genres) => {
                self.inner.state.write().await.genres = genres;
            }
            Err(e) => {
                // deliberately swallowed: the UI works with an empty list
                warn!("failed to fetch genres: {}", e);
            }
        }
    }

    /// Record a new search query and schedule a refetch once the query has
    /// been quiet for the debounce window. A change arriving before the
    /// window elapses cancels the pending fetch and restarts the clock, so
    /// only the final value of a burst reaches the network.
    pub async fn set_search_query(&self, query: impl Into<String>) {
        {
            self.inner.state.write().await.search_query = query.into();
        }

        let mut pending = self.inner.pending_search.lock().await;
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        let session = self.clone();
        let window = self.inner.debounce_window;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            session.refresh().await;
        }));
    }

    /// Wait for a pending debounced search fetch, if any, to run to
    /// completion. One-shot callers use this to observe the result of
    /// `set_search_query` without polling.
    pub async fn flush_search(&self) {
        let handle = self.inner.pending_search.lock().await.take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    /// Create a book and append the server's canonical record to the local
    /// list. A blank name is rejected before any network call.
    pub async fn add_book(&self, book: NewBook) -> Result<Book, SessionError> {
        if book.name.trim().is_empty() {
            return Err(SessionError::BlankName);
        }

        let created = self.inner.service.create_book(&book).await.map_err(|e| {
            error!("failed to create book: {}", e);
            SessionError::AddFailed
        })?;

        let mut state = self.inner.state.write().await;
        state.books.push(created.clone());
        if let Some(genre) = &book.genre {
            Self::remember_genre(&mut state.genres, genre);
        }

        Ok(created)
    }

    /// Partially update a book and replace the matching local entry with
    /// the server's canonical record. Setting the name to blank or null is
    /// rejected before any network call.
    pub async fn update_book(&self, id: i64, update: BookUpdate) -> Result<Book, SessionError> {
        match &update.name {
            Patch::Value(name) if name.trim().is_empty() => {
                return Err(SessionError::BlankName)
            }
            Patch::Null => return Err(SessionError::BlankName),
            _ => {}
        }

        let updated = self
            .inner
            .service
            .update_book(id, &update)
            .await
            .map_err(|e| {
                error!("failed to update book {}: {}", id, e);
                SessionError::UpdateFailed
            })?;

        let mut state = self.inner.state.write().await;
        if let Some(entry) = state.books.iter_mut().find(|b| b.id == id) {
            *entry = updated.clone();
        }
        if let Patch::Value(genre) = &update.genre {
            Self::remember_genre(&mut state.genres, genre);
        }

        Ok(updated)
    }

    /// Delete a book and remove the matching local entry. On failure the
    /// list is left untouched.
    pub async fn delete_book(&self, id: i64) -> Result<(), SessionError> {
        self.inner.service.delete_book(id).await.map_err(|e| {
            error!("failed to delete book {}: {}", id, e);
            SessionError::DeleteFailed
        })?;

        self.inner.state.write().await.books.retain(|b| b.id != id);
        Ok(())
    }

    pub async fn state(&self) -> LibraryState {
        self.inner.state.read().await.clone()
    }

    fn remember_genre(genres: &mut Vec<String>, genre: &str) {
        if !genres.iter().any(|g| g == genre) {
            genres.push(genre.to_string());
        }
    }
}
