use thiserror::Error as ThisError;

#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Please enter both title and content")]
    MissingTitleOrContent,
    #[error("Page {page} does not exist, there are {total} pages")]
    PageOutOfRange { page: usize, total: usize },
}
