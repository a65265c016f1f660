use crate::client::ApiClient;
use crate::errors::ApiResult;
use crate::models::book_model::{Book, BookStatus, BookUpdate, NewBook};
use reqwest::multipart::{Form, Part};

const BOOKS_PATH: &str = "book";

/// Gateway translating typed book operations into HTTP requests. Every
/// call is a single round trip; there are no retries, no caching and no
/// batching, and failures propagate to the caller.
#[derive(Debug, Clone)]
pub struct BookService {
    client: ApiClient,
}

impl BookService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List books, optionally filtered by name on the server side.
    pub async fn list_books(&self, name: Option<&str>) -> ApiResult<Vec<Book>> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(name) = name {
            if !name.is_empty() {
                query.push(("name", name));
            }
        }

        let response = self.client.get(BOOKS_PATH, &query).await?;
        Ok(response.json().await?)
    }

    /// Create a book. Multipart form data is required so the optional
    /// cover image can be attached; fields that are None are omitted
    /// rather than sent empty.
    pub async fn create_book(&self, book: &NewBook) -> ApiResult<Book> {
        let form = Self::create_form(book)?;
        let response = self.client.post_multipart(BOOKS_PATH, form).await?;
        Ok(response.json().await?)
    }

    /// Partially update a book. Keys absent from the payload are not sent
    /// at all; explicit nulls are sent to clear a field.
    pub async fn update_book(&self, id: i64, update: &BookUpdate) -> ApiResult<Book> {
        let response = self
            .client
            .put_json(&format!("{BOOKS_PATH}/{id}"), update)
            .await?;
        Ok(response.json().await?)
    }

    /// Delete a book. An unknown id is a server 4xx, propagated as-is.
    pub async fn delete_book(&self, id: i64) -> ApiResult<()> {
        self.client.delete(&format!("{BOOKS_PATH}/{id}")).await?;
        Ok(())
    }

    pub async fn list_genres(&self) -> ApiResult<Vec<String>> {
        let response = self.client.get(&format!("{BOOKS_PATH}/genres"), &[]).await?;
        Ok(response.json().await?)
    }

    pub async fn list_statuses(&self) -> ApiResult<Vec<BookStatus>> {
        let response = self
            .client
            .get(&format!("{BOOKS_PATH}/statuses"), &[])
            .await?;
        Ok(response.json().await?)
    }

    fn create_form(book: &NewBook) -> ApiResult<Form> {
        let mut form = Form::new().text("name", book.name.clone());

        if let Some(genre) = &book.genre {
            form = form.text("genre", genre.clone());
        }
        if let Some(author) = &book.author {
            form = form.text("author", author.clone());
        }
        // The create endpoint names this field book_status, unlike the
        // update payload which uses status
        if let Some(status) = &book.status {
            form = form.text("book_status", status.clone());
        }
        if let Some(pages) = book.pages {
            form = form.text("pages", pages.to_string());
        }
        if let Some(year) = book.year {
            form = form.text("year", year.to_string());
        }

        if let Some(image) = &book.image {
            let mime = mime_guess::from_path(&image.file_name).first_or_octet_stream();
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(mime.essence_str())?;
            form = form.part("image", part);
        }

        Ok(form)
    }
}
