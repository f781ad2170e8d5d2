use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("invalid page index {value:?}")]
    InvalidPage { value: String },

    #[error("unknown advanced search mode {value:?}")]
    InvalidAdvancedMode { value: String },

    #[error("value for key {key:?} is not valid UTF-8 after percent-decoding")]
    InvalidEncoding { key: String },
}

/// Violations of the organization → project → repository → ref hierarchy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BaseFilterError {
    #[error("project {project:?} requires an organization")]
    ProjectWithoutOrganization { project: String },

    #[error("repository {repository:?} requires a project")]
    RepositoryWithoutProject { repository: String },

    #[error("ref {name:?} requires a repository")]
    RefWithoutRepository { name: String },

    #[error("branch {branch:?} and tag {tag:?} are mutually exclusive")]
    BranchAndTag { branch: String, tag: String },
}

pub type Result<T> = std::result::Result<T, QueryError>;
