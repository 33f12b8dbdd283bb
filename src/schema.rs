//! Declarative parameter schema of the node.
//!
//! This is the contract a host form renderer consumes: which fields exist,
//! their kinds and defaults, and for which resource/operation pairs each one is
//! shown. The dispatcher also reads it to fill in defaults for parameters an
//! item did not supply.

use crate::credentials;
use crate::types::{Operation, Resource};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::OnceLock;

/// Kind of input a field renders as.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    /// Single-line (or multi-line) text
    String,
    /// Password input, masked
    Password,
    Number,
    Boolean,
    /// Single selection from `options`
    Options,
    /// Multiple selection from `options`
    MultiOptions,
    /// Free-form object assembled from the `options` sub-fields
    Collection,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldOption {
    pub name: String,
    pub value: Value,
}

/// Visibility rule: the field is shown for these operations of one resource.
#[derive(Debug, Clone, Serialize)]
pub struct ShowRule {
    pub resource: Resource,
    pub operations: Vec<&'static str>,
}

impl Serialize for Resource {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

/// A single parameter definition.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterField {
    pub name: &'static str,
    pub display_name: &'static str,
    pub kind: FieldKind,
    pub default: Value,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    /// Choices for `Options`/`MultiOptions`; sub-fields for `Collection`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_fields: Vec<ParameterField>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub show: Vec<ShowRule>,
}

impl ParameterField {
    pub fn new(name: &'static str, display_name: &'static str, kind: FieldKind, default: Value) -> Self {
        Self {
            name,
            display_name,
            kind,
            default,
            required: false,
            description: None,
            options: Vec::new(),
            sub_fields: Vec::new(),
            show: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn describe(mut self, text: &'static str) -> Self {
        self.description = Some(text);
        self
    }

    pub fn choices(mut self, choices: &[(&str, &str)]) -> Self {
        self.options = choices
            .iter()
            .map(|(name, value)| FieldOption {
                name: (*name).to_string(),
                value: Value::String((*value).to_string()),
            })
            .collect();
        self
    }

    pub fn sub_field(mut self, field: ParameterField) -> Self {
        self.sub_fields.push(field);
        self
    }

    pub fn show(mut self, resource: Resource, operations: &[&'static str]) -> Self {
        self.show.push(ShowRule {
            resource,
            operations: operations.to_vec(),
        });
        self
    }

    /// Show for every operation of `resource` except the listed ones.
    pub fn show_except(self, resource: Resource, excluded: &[&str]) -> Self {
        let ops: Vec<&'static str> = resource
            .operations()
            .into_iter()
            .filter(|op| !excluded.contains(op))
            .collect();
        self.show(resource, &ops)
    }

    pub fn is_shown_for(&self, op: &Operation) -> bool {
        self.show
            .iter()
            .any(|rule| rule.resource == op.resource() && rule.operations.contains(&op.name()))
    }
}

fn text(name: &'static str, display_name: &'static str) -> ParameterField {
    ParameterField::new(name, display_name, FieldKind::String, json!(""))
}

fn number(name: &'static str, display_name: &'static str, default: i64) -> ParameterField {
    ParameterField::new(name, display_name, FieldKind::Number, json!(default))
}

fn boolean(name: &'static str, display_name: &'static str, default: bool) -> ParameterField {
    ParameterField::new(name, display_name, FieldKind::Boolean, json!(default))
}

const PAGED: &[(Resource, &[&str])] = &[
    (Resource::Repository, &["list", "search"]),
    (Resource::Issue, &["list", "search", "listComments"]),
    (Resource::PullRequest, &["list", "listCommits", "listFiles"]),
    (
        Resource::User,
        &["list", "search", "getRepositories", "getOrganizations"],
    ),
    (
        Resource::Organization,
        &["list", "listMembers", "listRepositories", "listTeams"],
    ),
    (Resource::Release, &["list", "listAssets"]),
    (Resource::Webhook, &["list"]),
    (Resource::Branch, &["list"]),
    (Resource::Tag, &["list"]),
    (Resource::Commit, &["list", "listStatuses"]),
];

const REPO_SCOPED: &[Resource] = &[
    Resource::PullRequest,
    Resource::Release,
    Resource::Webhook,
    Resource::Branch,
    Resource::Tag,
    Resource::Commit,
];

fn paged(mut field: ParameterField) -> ParameterField {
    for (resource, ops) in PAGED {
        field = field.show(*resource, ops);
    }
    field
}

fn repo_scoped(mut field: ParameterField, repository_ops: &[&'static str]) -> ParameterField {
    field = field
        .show(Resource::Repository, repository_ops)
        .show_except(Resource::Issue, &["search"]);
    for resource in REPO_SCOPED {
        field = field.show_except(*resource, &[]);
    }
    field
}

fn build_fields() -> Vec<ParameterField> {
    use Resource::*;

    vec![
        repo_scoped(
            text("owner", "Owner").required(),
            &[
                "get",
                "update",
                "delete",
                "list",
                "getContents",
                "createFile",
                "updateFile",
                "deleteFile",
            ],
        )
        .describe("Repository owner (username or organization)"),
        repo_scoped(
            text("repository", "Repository").required(),
            &[
                "get",
                "update",
                "delete",
                "getContents",
                "createFile",
                "updateFile",
                "deleteFile",
            ],
        )
        .describe("Repository name"),
        // repository
        text("name", "Repository Name")
            .required()
            .describe("Name of the repository")
            .show(Repository, &["create"]),
        text("description", "Description")
            .describe("Description of the repository or organization")
            .show(Repository, &["create"])
            .show(Organization, &["create", "update"]),
        boolean("private", "Private", false)
            .describe("Whether the repository is private")
            .show(Repository, &["create"]),
        boolean("autoInit", "Auto Init", false)
            .describe("Whether to initialize the repository with a README")
            .show(Repository, &["create"]),
        ParameterField::new("updateFields", "Update Fields", FieldKind::Collection, json!({}))
            .sub_field(text("name", "Name").describe("New name for the repository"))
            .sub_field(text("description", "Description").describe("New description for the repository"))
            .sub_field(boolean("private", "Private", false).describe("Whether the repository should be private"))
            .sub_field(text("website", "Website").describe("Repository website URL"))
            .sub_field(text("default_branch", "Default Branch").describe("Default branch name"))
            .show(Repository, &["update"]),
        text("query", "Query")
            .required()
            .describe("Search query")
            .show(Repository, &["search"])
            .show(Issue, &["search"])
            .show(User, &["search"]),
        text("filePath", "File Path")
            .required()
            .describe("Path to the file in the repository")
            .show(Repository, &["getContents", "createFile", "updateFile", "deleteFile"]),
        text("content", "Content")
            .required()
            .describe("File content (will be base64 encoded automatically)")
            .show(Repository, &["createFile", "updateFile"]),
        text("message", "Commit Message")
            .required()
            .describe("Commit message")
            .show(Repository, &["createFile", "updateFile", "deleteFile"]),
        text("sha", "SHA")
            .required()
            .describe("SHA hash of the file/commit")
            .show(Repository, &["updateFile", "deleteFile"])
            .show(Commit, &["getStatus", "createStatus", "listStatuses"]),
        text("sha", "SHA")
            .describe("SHA hash of the commit. Leave empty to fetch the latest commit from the default branch.")
            .show(Commit, &["get"]),
        text("ref", "Reference")
            .describe("Branch, tag, or commit to get contents from")
            .show(Repository, &["getContents"]),
        // issue
        number("issueNumber", "Issue Number", 0)
            .required()
            .describe("Issue number")
            .show(
                Issue,
                &["get", "update", "delete", "addComment", "listComments", "editLabels", "close", "reopen"],
            ),
        text("title", "Title")
            .required()
            .describe("Issue or pull request title")
            .show(Issue, &["create"])
            .show(PullRequest, &["create"]),
        text("body", "Body")
            .describe("Issue, pull request, or comment body")
            .show(Issue, &["create", "update", "addComment"])
            .show(PullRequest, &["create", "update"]),
        text("labels", "Labels")
            .describe("Comma-separated list of label names")
            .show(Issue, &["create", "update", "editLabels"]),
        text("assignees", "Assignees")
            .describe("Comma-separated list of usernames to assign")
            .show(Issue, &["create", "update"])
            .show(PullRequest, &["create", "update"]),
        ParameterField::new("state", "State", FieldKind::Options, json!("open"))
            .choices(&[("Open", "open"), ("Closed", "closed"), ("All", "all")])
            .describe("Filter by state")
            .show(Issue, &["list"])
            .show(PullRequest, &["list"]),
        // pull request
        number("pullRequestNumber", "Pull Request Number", 0)
            .required()
            .describe("Pull request number")
            .show_except(PullRequest, &["create", "list"]),
        text("head", "Head Branch")
            .required()
            .describe("The name of the branch where your changes are implemented")
            .show(PullRequest, &["create"]),
        text("base", "Base Branch")
            .required()
            .describe("The name of the branch you want the changes pulled into")
            .show(PullRequest, &["create"]),
        ParameterField::new("mergeMethod", "Merge Method", FieldKind::Options, json!("merge"))
            .choices(&[("Merge", "merge"), ("Rebase", "rebase"), ("Squash", "squash")])
            .describe("Merge method to use")
            .show(PullRequest, &["merge"]),
        // user / organization
        text("username", "Username")
            .required()
            .describe("Username")
            .show(User, &["get", "getRepositories", "getOrganizations"]),
        text("username", "Username")
            .required()
            .describe("Organization username")
            .show(Organization, &["create"]),
        text("organization", "Organization")
            .required()
            .describe("Organization name")
            .show_except(Organization, &["create", "list"]),
        text("fullName", "Full Name")
            .describe("Full name of the organization")
            .show(Organization, &["create", "update"]),
        // release
        number("releaseId", "Release ID", 0)
            .required()
            .describe("Release ID")
            .show_except(Release, &["create", "list"]),
        text("tagName", "Tag Name")
            .required()
            .describe("Tag name")
            .show(Release, &["create"])
            .show(Tag, &["create", "get", "delete"]),
        text("name", "Release Name")
            .describe("Release name")
            .show(Release, &["create", "update"]),
        text("body", "Body")
            .describe("Release notes")
            .show(Release, &["create", "update"]),
        boolean("draft", "Draft", false)
            .describe("Whether this is a draft release")
            .show(Release, &["create", "update"]),
        boolean("prerelease", "Prerelease", false)
            .describe("Whether this is a prerelease")
            .show(Release, &["create", "update"]),
        text("assetName", "Asset Name")
            .required()
            .describe("Name of the asset file")
            .show(Release, &["uploadAsset"]),
        text("assetFilePath", "Asset File Path")
            .required()
            .describe("Path to the asset file to upload")
            .show(Release, &["uploadAsset"]),
        // webhook
        number("webhookId", "Webhook ID", 0)
            .required()
            .describe("Webhook ID")
            .show(Webhook, &["get", "update", "delete", "test"]),
        text("webhookUrl", "Webhook URL")
            .required()
            .describe("URL to send webhook payloads to")
            .show(Webhook, &["create", "update"]),
        ParameterField::new("events", "Events", FieldKind::MultiOptions, json!(["push"]))
            .choices(&[
                ("Push", "push"),
                ("Create", "create"),
                ("Delete", "delete"),
                ("Issues", "issues"),
                ("Issue Comment", "issue_comment"),
                ("Pull Request", "pull_request"),
                ("Release", "release"),
            ])
            .describe("Events that trigger the webhook")
            .show(Webhook, &["create", "update"]),
        boolean("active", "Active", true)
            .describe("Whether the webhook is active")
            .show(Webhook, &["create", "update"]),
        // branch
        text("branchName", "Branch Name")
            .required()
            .describe("Branch name")
            .show_except(Branch, &["list"]),
        text("sourceBranch", "Source Branch")
            .required()
            .describe("Branch to create from")
            .show(Branch, &["create"]),
        ParameterField::new("protectionSettings", "Protection Settings", FieldKind::Collection, json!({}))
            .sub_field(boolean("enable_push", "Enable Push", false).describe("Whether to enable push protection"))
            .sub_field(
                boolean("enable_push_whitelist", "Enable Push Whitelist", false)
                    .describe("Whether to enable push whitelist"),
            )
            .sub_field(number("required_approvals", "Required Approvals", 1).describe("Number of required approvals"))
            .show(Branch, &["updateProtection"]),
        // tag
        text("message", "Message")
            .describe("Tag message")
            .show(Tag, &["create"]),
        text("target", "Target")
            .describe("Target commit SHA (defaults to the repository default branch)")
            .show(Tag, &["create"]),
        // commit status
        ParameterField::new("statusState", "Status State", FieldKind::Options, json!("pending"))
            .required()
            .choices(&[
                ("Pending", "pending"),
                ("Success", "success"),
                ("Error", "error"),
                ("Failure", "failure"),
            ])
            .describe("Status state")
            .show(Commit, &["createStatus"]),
        text("context", "Context")
            .describe("Status context identifier")
            .show(Commit, &["createStatus"]),
        text("description", "Description")
            .describe("Status description")
            .show(Commit, &["createStatus"]),
        text("targetUrl", "Target URL")
            .describe("Target URL for more information")
            .show(Commit, &["createStatus"]),
        // pagination
        paged(number("page", "Page", 1).describe("Page number")),
        paged(number("limit", "Limit", 50).describe("Maximum number of results to return")),
    ]
}

/// All parameter fields, in form order.
pub fn fields() -> &'static [ParameterField] {
    static FIELDS: OnceLock<Vec<ParameterField>> = OnceLock::new();
    FIELDS.get_or_init(build_fields)
}

/// The field named `name` that is shown for `op`, if any.
pub fn field_for(name: &str, op: &Operation) -> Option<&'static ParameterField> {
    fields()
        .iter()
        .find(|f| f.name == name && f.is_shown_for(op))
}

/// Default value the host would resolve for `name` under `op`.
pub fn default_for(name: &str, op: &Operation) -> Option<Value> {
    field_for(name, op).map(|f| f.default.clone())
}

fn display_name(wire: &str) -> String {
    let mut out = String::with_capacity(wire.len() + 4);
    for (i, c) in wire.chars().enumerate() {
        if i == 0 {
            out.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            out.push(' ');
            out.push(c);
        } else {
            out.push(c);
        }
    }
    out
}

/// Complete node description: resources, operations, parameter fields and
/// the credential it authenticates with.
pub fn node_description() -> Value {
    let resources: Vec<Value> = Resource::ALL
        .iter()
        .map(|r| {
            let ops = r.operations();
            let default_op = if ops.contains(&"get") { "get" } else { ops[0] };
            json!({
                "name": display_name(r.as_str()),
                "value": r.as_str(),
                "defaultOperation": default_op,
                "operations": ops
                    .iter()
                    .map(|op| json!({ "name": display_name(op), "value": op }))
                    .collect::<Vec<_>>(),
            })
        })
        .collect();
    json!({
        "displayName": "Forgejo",
        "name": "forgejo",
        "version": 1,
        "description": "Interact with Forgejo API",
        "credentials": [{ "name": credentials::CREDENTIAL_NAME, "required": true }],
        "defaultResource": Resource::Repository.as_str(),
        "resources": resources,
        "properties": fields(),
    })
}
