use color_eyre::Result;
use serde::Serialize;

use crate::db::{ContentFilter, ContentRow, Db, NewContent};
use crate::files::{self, FileStore};
use crate::utils;

// ---------------------------------------------------------------------------
// ContentRepository trait
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait ContentRepository: Send + Sync {
    fn insert_content(
        &self,
        content: &NewContent,
    ) -> impl std::future::Future<Output = Result<i64>> + Send;

    fn contents(
        &self,
        filter: &ContentFilter,
    ) -> impl std::future::Future<Output = Result<Vec<ContentRow>>> + Send;

    fn content_path_exists(
        &self,
        file_path: &str,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;
}

impl ContentRepository for Db {
    async fn insert_content(&self, content: &NewContent) -> Result<i64> {
        Db::insert_content(self, content).await
    }

    async fn contents(&self, filter: &ContentFilter) -> Result<Vec<ContentRow>> {
        Db::contents(self, filter).await
    }

    async fn content_path_exists(&self, file_path: &str) -> Result<bool> {
        Db::content_path_exists(self, file_path).await
    }
}

// ---------------------------------------------------------------------------
// Request and view types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Where the material of a content item comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentSource {
    /// Uploaded bytes, optionally accompanied by a link.
    Upload { file: Upload, url: Option<String> },
    Link(String),
    MetadataOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishRequest {
    pub course_id: Option<i64>,
    pub title: Option<String>,
    pub kind: String,
    pub description: String,
    pub source: ContentSource,
}

#[derive(Debug, PartialEq, Eq)]
pub enum PublishOutcome {
    Published {
        id: i64,
        title: String,
        /// Relative file path or link, whichever was recorded.
        location: String,
    },
    /// Title or course id was missing.
    MissingFields,
}

/// A content item as listed to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: i64,
    pub course_id: i64,
    pub faculty_email: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub file_path: String,
    pub url: String,
    pub created_at: String,
    pub file_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_folder: Option<String>,
}

impl ContentItem {
    fn from_row(row: ContentRow, with_folder: bool) -> Self {
        let file_path = row.file_path.filter(|path| !path.is_empty());
        let faculty_folder = if with_folder {
            file_path
                .as_deref()
                .and_then(files::split_relative)
                .map(|(dir, _)| dir.to_string())
        } else {
            None
        };

        ContentItem {
            file_url: files::file_url(file_path.as_deref()),
            faculty_folder,
            id: row.id,
            course_id: row.course_id,
            faculty_email: row.faculty_email,
            title: row.title,
            kind: row.kind.unwrap_or_default(),
            description: row.description.unwrap_or_default(),
            file_path: file_path.unwrap_or_default(),
            url: row.url.unwrap_or_default(),
            created_at: row.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// ContentService
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct ContentService<R: ContentRepository = Db> {
    repo: R,
    files: FileStore,
}

impl<R: ContentRepository> ContentService<R> {
    pub fn new(repo: R, files: FileStore) -> Self {
        Self { repo, files }
    }

    /// Record a content item for `faculty_email`, storing uploaded bytes first.
    ///
    /// When the insert fails after an upload was written, the file stays on disk
    /// unreferenced and the store error is returned.
    pub async fn publish(
        &self,
        faculty_email: &str,
        request: PublishRequest,
    ) -> Result<PublishOutcome> {
        let faculty_email = utils::normalize_email(faculty_email);

        let title = match (&request.title, &request.source) {
            (Some(title), _) if !title.trim().is_empty() => title.trim().to_string(),
            (_, ContentSource::Upload { file, .. }) if !file.file_name.trim().is_empty() => {
                file.file_name.trim().to_string()
            }
            _ => return Ok(PublishOutcome::MissingFields),
        };
        let Some(course_id) = request.course_id else {
            return Ok(PublishOutcome::MissingFields);
        };

        let (file_path, url) = match request.source {
            ContentSource::Upload { file, url } => {
                let path = self
                    .files
                    .store(&faculty_email, &file.file_name, &file.bytes)
                    .await?;
                (Some(path), url)
            }
            ContentSource::Link(url) => (None, Some(url)),
            ContentSource::MetadataOnly => (None, None),
        };

        let content = NewContent {
            course_id,
            faculty_email,
            title,
            kind: request.kind,
            description: request.description,
            file_path,
            url,
        };

        let id = match self.repo.insert_content(&content).await {
            Ok(id) => id,
            Err(e) => {
                if let Some(path) = &content.file_path {
                    tracing::warn!("content insert failed, upload {path} left unreferenced");
                }
                return Err(e);
            }
        };

        Ok(PublishOutcome::Published {
            id,
            location: content
                .file_path
                .or(content.url)
                .unwrap_or_default(),
            title: content.title,
        })
    }

    pub async fn list(&self, filter: &ContentFilter) -> Result<Vec<ContentItem>> {
        let filter = match filter {
            ContentFilter::All => ContentFilter::All,
            ContentFilter::ByFaculty(email) => {
                ContentFilter::ByFaculty(utils::normalize_email(email))
            }
        };
        let with_folder = filter == ContentFilter::All;

        Ok(self
            .repo
            .contents(&filter)
            .await?
            .into_iter()
            .map(|row| ContentItem::from_row(row, with_folder))
            .collect())
    }

    /// Bytes of an uploaded file, only when a content item references exactly
    /// `<owner_dir>/<file_name>` and the file is on disk.
    pub async fn authorized_file(&self, owner_dir: &str, file_name: &str) -> Result<Option<Vec<u8>>> {
        let relative = format!("{owner_dir}/{file_name}");
        if !self.repo.content_path_exists(&relative).await? {
            tracing::warn!("refused unreferenced file {relative}");
            return Ok(None);
        }
        self.files.resolve(&relative).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_files() -> FileStore {
        FileStore::new(std::env::temp_dir().join(format!("coursehub_content_{}", ulid::Ulid::new())))
    }

    fn request(source: ContentSource) -> PublishRequest {
        PublishRequest {
            course_id: Some(1),
            title: Some("T".to_string()),
            kind: String::new(),
            description: String::new(),
            source,
        }
    }

    fn row(file_path: Option<&str>, url: Option<&str>) -> ContentRow {
        ContentRow {
            id: 1,
            course_id: 1,
            faculty_email: "kaminee@rc.edu".to_string(),
            title: "T".to_string(),
            kind: None,
            description: None,
            file_path: file_path.map(str::to_string),
            url: url.map(str::to_string),
            created_at: "2025-01-01T00:00:00.000000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn metadata_only_content_is_recorded_without_location() {
        let mut repo = MockContentRepository::new();
        repo.expect_insert_content()
            .withf(|c| c.file_path.is_none() && c.url.is_none() && c.faculty_email == "kaminee@rc.edu")
            .returning(|_| Box::pin(async { Ok(1) }));

        let outcome = ContentService::new(repo, temp_files())
            .publish("Kaminee@RC.edu", request(ContentSource::MetadataOnly))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            PublishOutcome::Published {
                id: 1,
                title: "T".to_string(),
                location: String::new()
            }
        );
    }

    #[tokio::test]
    async fn missing_title_or_course_is_rejected() {
        let svc = ContentService::new(MockContentRepository::new(), temp_files());

        let mut no_title = request(ContentSource::Link("https://x".to_string()));
        no_title.title = None;
        assert_eq!(
            svc.publish("a@b.c", no_title).await.unwrap(),
            PublishOutcome::MissingFields
        );

        let mut no_course = request(ContentSource::MetadataOnly);
        no_course.course_id = None;
        assert_eq!(
            svc.publish("a@b.c", no_course).await.unwrap(),
            PublishOutcome::MissingFields
        );
    }

    #[tokio::test]
    async fn upload_title_defaults_to_file_name() {
        let files = temp_files();
        let mut repo = MockContentRepository::new();
        repo.expect_insert_content()
            .withf(|c| {
                c.title == "notes.pdf"
                    && c.file_path
                        .as_deref()
                        .is_some_and(|p| p.starts_with("a_at_b_c/") && p.ends_with("_notes.pdf"))
            })
            .returning(|_| Box::pin(async { Ok(7) }));

        let mut req = request(ContentSource::Upload {
            file: Upload {
                file_name: "notes.pdf".to_string(),
                bytes: b"%PDF".to_vec(),
            },
            url: None,
        });
        req.title = None;

        let outcome = ContentService::new(repo, files.clone())
            .publish("a@b.c", req)
            .await
            .unwrap();

        let PublishOutcome::Published { id, location, .. } = outcome else {
            panic!("expected published outcome");
        };
        assert_eq!(id, 7);
        assert_eq!(files.resolve(&location).await.unwrap(), Some(b"%PDF".to_vec()));
    }

    #[tokio::test]
    async fn blank_upload_title_falls_back_to_file_name() {
        let mut repo = MockContentRepository::new();
        repo.expect_insert_content()
            .withf(|c| c.title == "slides.pptx")
            .returning(|_| Box::pin(async { Ok(3) }));

        let mut req = request(ContentSource::Upload {
            file: Upload {
                file_name: "slides.pptx".to_string(),
                bytes: b"pk".to_vec(),
            },
            url: None,
        });
        req.title = Some("   ".to_string());

        let outcome = ContentService::new(repo, temp_files())
            .publish("a@b.c", req)
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            PublishOutcome::Published { ref title, .. } if title == "slides.pptx"
        ));
    }

    #[tokio::test]
    async fn store_failure_after_upload_is_reported() {
        let files = temp_files();
        let mut repo = MockContentRepository::new();
        repo.expect_insert_content()
            .returning(|_| Box::pin(async { Err(color_eyre::eyre::eyre!("disk I/O error")) }));

        let result = ContentService::new(repo, files)
            .publish(
                "a@b.c",
                request(ContentSource::Upload {
                    file: Upload {
                        file_name: "x.txt".to_string(),
                        bytes: b"x".to_vec(),
                    },
                    url: None,
                }),
            )
            .await;

        assert!(result.unwrap_err().to_string().contains("disk I/O error"));
    }

    #[tokio::test]
    async fn listing_derives_file_urls() {
        let mut repo = MockContentRepository::new();
        repo.expect_contents().returning(|_| {
            Box::pin(async {
                Ok(vec![
                    row(Some("kaminee_at_rc_edu/01J_notes.pdf"), None),
                    row(None, None),
                    row(Some(""), Some("https://example.com")),
                ])
            })
        });

        let items = ContentService::new(repo, temp_files())
            .list(&ContentFilter::All)
            .await
            .unwrap();

        assert_eq!(items[0].file_url, "/files/kaminee_at_rc_edu/01J_notes.pdf");
        assert_eq!(items[0].faculty_folder.as_deref(), Some("kaminee_at_rc_edu"));
        assert_eq!(items[1].file_url, "");
        assert_eq!(items[1].url, "");
        assert_eq!(items[2].file_url, "");
        assert_eq!(items[2].url, "https://example.com");
    }

    #[tokio::test]
    async fn faculty_listing_uses_normalized_email_and_omits_folder() {
        let mut repo = MockContentRepository::new();
        repo.expect_contents()
            .withf(|f| *f == ContentFilter::ByFaculty("kaminee@rc.edu".to_string()))
            .returning(|_| Box::pin(async { Ok(vec![row(Some("kaminee_at_rc_edu/1_a.pdf"), None)]) }));

        let items = ContentService::new(repo, temp_files())
            .list(&ContentFilter::ByFaculty(" KAMINEE@rc.edu".to_string()))
            .await
            .unwrap();

        assert_eq!(items[0].faculty_folder, None);
        assert_eq!(items[0].file_url, "/files/kaminee_at_rc_edu/1_a.pdf");
    }

    #[tokio::test]
    async fn unreferenced_files_are_not_served() {
        let files = temp_files();
        let path = files.store("a@b.c", "x.txt", b"x").await.unwrap();
        let (dir, name) = files::split_relative(&path).unwrap();

        let mut repo = MockContentRepository::new();
        repo.expect_content_path_exists()
            .returning(|_| Box::pin(async { Ok(false) }));

        let served = ContentService::new(repo, files.clone())
            .authorized_file(dir, name)
            .await
            .unwrap();

        assert_eq!(served, None);
    }
}
