use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

// Closed string-tagged enum: wire name per variant plus the full variant list.
macro_rules! tagged_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(Error::Unsupported(format!(
                        "{} '{}'",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

tagged_enum!(
    /// Entity type a call acts on.
    Resource {
        Repository => "repository",
        Issue => "issue",
        PullRequest => "pullRequest",
        User => "user",
        Organization => "organization",
        Release => "release",
        Webhook => "webhook",
        Branch => "branch",
        Tag => "tag",
        Commit => "commit",
    }
);

tagged_enum!(RepositoryOp {
    Create => "create",
    Get => "get",
    Update => "update",
    Delete => "delete",
    List => "list",
    Search => "search",
    GetContents => "getContents",
    CreateFile => "createFile",
    UpdateFile => "updateFile",
    DeleteFile => "deleteFile",
});

tagged_enum!(IssueOp {
    Create => "create",
    Get => "get",
    Update => "update",
    Delete => "delete",
    List => "list",
    Search => "search",
    AddComment => "addComment",
    ListComments => "listComments",
    EditLabels => "editLabels",
    Close => "close",
    Reopen => "reopen",
});

tagged_enum!(PullRequestOp {
    Create => "create",
    Get => "get",
    Update => "update",
    Delete => "delete",
    List => "list",
    Merge => "merge",
    Close => "close",
    Reopen => "reopen",
    ListCommits => "listCommits",
    ListFiles => "listFiles",
});

tagged_enum!(UserOp {
    Get => "get",
    GetAuthenticatedUser => "getAuthenticatedUser",
    List => "list",
    Search => "search",
    GetRepositories => "getRepositories",
    GetOrganizations => "getOrganizations",
});

tagged_enum!(OrganizationOp {
    Create => "create",
    Get => "get",
    Update => "update",
    Delete => "delete",
    List => "list",
    ListMembers => "listMembers",
    ListRepositories => "listRepositories",
    ListTeams => "listTeams",
});

tagged_enum!(ReleaseOp {
    Create => "create",
    Get => "get",
    Update => "update",
    Delete => "delete",
    List => "list",
    ListAssets => "listAssets",
    UploadAsset => "uploadAsset",
});

tagged_enum!(WebhookOp {
    Create => "create",
    Get => "get",
    Update => "update",
    Delete => "delete",
    List => "list",
    Test => "test",
});

tagged_enum!(BranchOp {
    Create => "create",
    Get => "get",
    Delete => "delete",
    List => "list",
    GetProtection => "getProtection",
    UpdateProtection => "updateProtection",
});

tagged_enum!(TagOp {
    Create => "create",
    Get => "get",
    Delete => "delete",
    List => "list",
});

tagged_enum!(CommitOp {
    Get => "get",
    List => "list",
    GetStatus => "getStatus",
    CreateStatus => "createStatus",
    ListStatuses => "listStatuses",
});

impl Resource {
    /// Wire names of the operations available on this resource, in menu order.
    pub fn operations(self) -> Vec<&'static str> {
        fn names<T: Copy>(all: &[T], f: fn(T) -> &'static str) -> Vec<&'static str> {
            all.iter().map(|op| f(*op)).collect()
        }
        match self {
            Resource::Repository => names(RepositoryOp::ALL, RepositoryOp::as_str),
            Resource::Issue => names(IssueOp::ALL, IssueOp::as_str),
            Resource::PullRequest => names(PullRequestOp::ALL, PullRequestOp::as_str),
            Resource::User => names(UserOp::ALL, UserOp::as_str),
            Resource::Organization => names(OrganizationOp::ALL, OrganizationOp::as_str),
            Resource::Release => names(ReleaseOp::ALL, ReleaseOp::as_str),
            Resource::Webhook => names(WebhookOp::ALL, WebhookOp::as_str),
            Resource::Branch => names(BranchOp::ALL, BranchOp::as_str),
            Resource::Tag => names(TagOp::ALL, TagOp::as_str),
            Resource::Commit => names(CommitOp::ALL, CommitOp::as_str),
        }
    }
}

/// A resource together with one of its own operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Repository(RepositoryOp),
    Issue(IssueOp),
    PullRequest(PullRequestOp),
    User(UserOp),
    Organization(OrganizationOp),
    Release(ReleaseOp),
    Webhook(WebhookOp),
    Branch(BranchOp),
    Tag(TagOp),
    Commit(CommitOp),
}

impl Operation {
    /// Resolve the `(resource, operation)` pair selected for a run.
    pub fn parse(resource: &str, operation: &str) -> Result<Self> {
        let resource: Resource = resource.parse()?;
        let unsupported =
            |_| Error::Unsupported(format!("operation '{}' on resource '{}'", operation, resource));
        Ok(match resource {
            Resource::Repository => Operation::Repository(operation.parse().map_err(unsupported)?),
            Resource::Issue => Operation::Issue(operation.parse().map_err(unsupported)?),
            Resource::PullRequest => Operation::PullRequest(operation.parse().map_err(unsupported)?),
            Resource::User => Operation::User(operation.parse().map_err(unsupported)?),
            Resource::Organization => {
                Operation::Organization(operation.parse().map_err(unsupported)?)
            }
            Resource::Release => Operation::Release(operation.parse().map_err(unsupported)?),
            Resource::Webhook => Operation::Webhook(operation.parse().map_err(unsupported)?),
            Resource::Branch => Operation::Branch(operation.parse().map_err(unsupported)?),
            Resource::Tag => Operation::Tag(operation.parse().map_err(unsupported)?),
            Resource::Commit => Operation::Commit(operation.parse().map_err(unsupported)?),
        })
    }

    pub fn resource(&self) -> Resource {
        match self {
            Operation::Repository(_) => Resource::Repository,
            Operation::Issue(_) => Resource::Issue,
            Operation::PullRequest(_) => Resource::PullRequest,
            Operation::User(_) => Resource::User,
            Operation::Organization(_) => Resource::Organization,
            Operation::Release(_) => Resource::Release,
            Operation::Webhook(_) => Resource::Webhook,
            Operation::Branch(_) => Resource::Branch,
            Operation::Tag(_) => Resource::Tag,
            Operation::Commit(_) => Resource::Commit,
        }
    }

    /// Wire name of the operation half of the pair.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Repository(op) => op.as_str(),
            Operation::Issue(op) => op.as_str(),
            Operation::PullRequest(op) => op.as_str(),
            Operation::User(op) => op.as_str(),
            Operation::Organization(op) => op.as_str(),
            Operation::Release(op) => op.as_str(),
            Operation::Webhook(op) => op.as_str(),
            Operation::Branch(op) => op.as_str(),
            Operation::Tag(op) => op.as_str(),
            Operation::Commit(op) => op.as_str(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource(), self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One HTTP call against the API base: method, path and optional query/body.
///
/// Empty query or body maps are stored as `None` so that nothing is sent for
/// them.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub path: String,
    pub query: Option<Map<String, Value>>,
    pub body: Option<Map<String, Value>>,
}

impl RequestDescriptor {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn with_query(mut self, query: Map<String, Value>) -> Self {
        self.query = (!query.is_empty()).then_some(query);
        self
    }

    pub fn with_body(mut self, body: Map<String, Value>) -> Self {
        self.body = (!body.is_empty()).then_some(body);
        self
    }

    /// Query pairs in insertion order, with primitive values rendered as text.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let Some(query) = &self.query else {
            return Vec::new();
        };
        query
            .iter()
            .map(|(k, v)| {
                let text = match v {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (k.clone(), text)
            })
            .collect()
    }
}

/// One element of the node output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputItem {
    pub json: Value,
}

impl OutputItem {
    pub fn new(json: Value) -> Self {
        Self { json }
    }

    /// Marker for calls that returned no body.
    pub fn success() -> Self {
        Self::new(serde_json::json!({ "success": true }))
    }

    /// Marker for a failed item when the run continues on failure.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(serde_json::json!({ "error": message.into() }))
    }
}

/// Decoded response body, classified once at the HTTP boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    Many(Vec<Value>),
    One(Value),
    Empty,
}

impl ResponseShape {
    /// Falsy bodies (`null`, `false`, `0`, `""`) count as no body.
    pub fn from_body(body: Option<Value>) -> Self {
        match body {
            None | Some(Value::Null) | Some(Value::Bool(false)) => ResponseShape::Empty,
            Some(Value::String(s)) if s.is_empty() => ResponseShape::Empty,
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => ResponseShape::Empty,
            Some(Value::Array(items)) => ResponseShape::Many(items),
            Some(v) => ResponseShape::One(v),
        }
    }

    pub fn into_items(self) -> Vec<OutputItem> {
        match self {
            ResponseShape::Many(items) => items.into_iter().map(OutputItem::new).collect(),
            ResponseShape::One(v) => vec![OutputItem::new(v)],
            ResponseShape::Empty => vec![OutputItem::success()],
        }
    }
}
