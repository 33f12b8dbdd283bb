//! Endpoint resolution: `(resource, operation)` plus one item's parameters to a
//! [`RequestDescriptor`].
//!
//! Each resource has its own resolver with an exhaustive `match` over that
//! resource's operations, so adding an operation without a route fails to
//! compile. Paths are built by raw interpolation; identifiers are not
//! percent-encoded and file paths keep their `/` separators.
//!
//! Body fields follow a per-field policy: optional text and comma lists are
//! left out when empty, while booleans and numbers are always sent.

use crate::error::Result;
use crate::params::Params;
use crate::types::{
    BranchOp, CommitOp, IssueOp, Operation, OrganizationOp, PullRequestOp, ReleaseOp,
    RepositoryOp, RequestDescriptor, TagOp, UserOp, WebhookOp,
};
use base64::Engine;
use serde_json::{json, Map, Value};

/// Build the request for one item.
pub fn resolve(op: Operation, p: &Params<'_>) -> Result<RequestDescriptor> {
    match op {
        Operation::Repository(op) => repository(op, p),
        Operation::Issue(op) => issue(op, p),
        Operation::PullRequest(op) => pull_request(op, p),
        Operation::User(op) => user(op, p),
        Operation::Organization(op) => organization(op, p),
        Operation::Release(op) => release(op, p),
        Operation::Webhook(op) => webhook(op, p),
        Operation::Branch(op) => branch(op, p),
        Operation::Tag(op) => tag(op, p),
        Operation::Commit(op) => commit(op, p),
    }
}

fn object(v: Value) -> Map<String, Value> {
    match v {
        Value::Object(m) => m,
        _ => Map::new(),
    }
}

fn repo_path(p: &Params<'_>) -> Result<String> {
    Ok(format!(
        "/repos/{}/{}",
        p.string("owner")?,
        p.string("repository")?
    ))
}

/// `page`/`limit` exactly as supplied for this call.
fn paging(p: &Params<'_>) -> Result<Map<String, Value>> {
    Ok(object(json!({
        "page": p.integer("page")?,
        "limit": p.integer("limit")?,
    })))
}

fn search(p: &Params<'_>) -> Result<Map<String, Value>> {
    let mut qs = object(json!({ "q": p.string("query")? }));
    qs.extend(paging(p)?);
    Ok(qs)
}

fn insert_text(body: &mut Map<String, Value>, key: &str, value: String) {
    if !value.is_empty() {
        body.insert(key.to_string(), Value::String(value));
    }
}

fn insert_list(body: &mut Map<String, Value>, key: &str, list: Option<Vec<String>>) {
    if let Some(items) = list {
        body.insert(key.to_string(), json!(items));
    }
}

fn encode_content(content: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(content.as_bytes())
}

fn repository(op: RepositoryOp, p: &Params<'_>) -> Result<RequestDescriptor> {
    Ok(match op {
        RepositoryOp::Create => RequestDescriptor::post("/user/repos").with_body(object(json!({
            "name": p.string("name")?,
            "description": p.string("description")?,
            "private": p.boolean("private")?,
            "auto_init": p.boolean("autoInit")?,
        }))),
        RepositoryOp::Get => RequestDescriptor::get(repo_path(p)?),
        RepositoryOp::Update => {
            RequestDescriptor::patch(repo_path(p)?).with_body(p.object("updateFields")?)
        }
        RepositoryOp::Delete => RequestDescriptor::delete(repo_path(p)?),
        RepositoryOp::List => {
            RequestDescriptor::get(format!("/users/{}/repos", p.string("owner")?))
                .with_query(paging(p)?)
        }
        RepositoryOp::Search => RequestDescriptor::get("/repos/search").with_query(search(p)?),
        RepositoryOp::GetContents => {
            let mut qs = Map::new();
            insert_text(&mut qs, "ref", p.string("ref")?);
            RequestDescriptor::get(contents_path(p)?).with_query(qs)
        }
        RepositoryOp::CreateFile => RequestDescriptor::post(contents_path(p)?).with_body(object(json!({
            "content": encode_content(&p.string("content")?),
            "message": p.string("message")?,
        }))),
        RepositoryOp::UpdateFile => RequestDescriptor::put(contents_path(p)?).with_body(object(json!({
            "content": encode_content(&p.string("content")?),
            "message": p.string("message")?,
            "sha": p.string("sha")?,
        }))),
        RepositoryOp::DeleteFile => RequestDescriptor::delete(contents_path(p)?).with_body(object(json!({
            "message": p.string("message")?,
            "sha": p.string("sha")?,
        }))),
    })
}

fn contents_path(p: &Params<'_>) -> Result<String> {
    Ok(format!("{}/contents/{}", repo_path(p)?, p.string("filePath")?))
}

fn issue(op: IssueOp, p: &Params<'_>) -> Result<RequestDescriptor> {
    let issue_path = || -> Result<String> {
        Ok(format!(
            "{}/issues/{}",
            repo_path(p)?,
            p.integer("issueNumber")?
        ))
    };
    Ok(match op {
        IssueOp::Create => {
            let mut body = object(json!({
                "title": p.string("title")?,
                "body": p.string("body")?,
            }));
            insert_list(&mut body, "labels", p.comma_list("labels")?);
            insert_list(&mut body, "assignees", p.comma_list("assignees")?);
            RequestDescriptor::post(format!("{}/issues", repo_path(p)?)).with_body(body)
        }
        IssueOp::Get => RequestDescriptor::get(issue_path()?),
        IssueOp::Update => {
            let mut body = Map::new();
            insert_text(&mut body, "body", p.string("body")?);
            insert_list(&mut body, "labels", p.comma_list("labels")?);
            insert_list(&mut body, "assignees", p.comma_list("assignees")?);
            RequestDescriptor::patch(issue_path()?).with_body(body)
        }
        IssueOp::Delete => RequestDescriptor::delete(issue_path()?),
        IssueOp::List => {
            let mut qs = object(json!({ "state": p.string("state")? }));
            qs.extend(paging(p)?);
            RequestDescriptor::get(format!("{}/issues", repo_path(p)?)).with_query(qs)
        }
        IssueOp::Search => RequestDescriptor::get("/repos/issues/search").with_query(search(p)?),
        IssueOp::AddComment => RequestDescriptor::post(format!("{}/comments", issue_path()?))
            .with_body(object(json!({ "body": p.string("body")? }))),
        IssueOp::ListComments => {
            RequestDescriptor::get(format!("{}/comments", issue_path()?)).with_query(paging(p)?)
        }
        IssueOp::EditLabels => {
            // Always sent, even for empty input.
            let labels = p.comma_list("labels")?.unwrap_or_else(|| vec![String::new()]);
            RequestDescriptor::put(format!("{}/labels", issue_path()?))
                .with_body(object(json!({ "labels": labels })))
        }
        IssueOp::Close => {
            RequestDescriptor::patch(issue_path()?).with_body(object(json!({ "state": "closed" })))
        }
        IssueOp::Reopen => {
            RequestDescriptor::patch(issue_path()?).with_body(object(json!({ "state": "open" })))
        }
    })
}

fn pull_request(op: PullRequestOp, p: &Params<'_>) -> Result<RequestDescriptor> {
    let pull_path = || -> Result<String> {
        Ok(format!(
            "{}/pulls/{}",
            repo_path(p)?,
            p.integer("pullRequestNumber")?
        ))
    };
    Ok(match op {
        PullRequestOp::Create => {
            let mut body = object(json!({
                "title": p.string("title")?,
                "head": p.string("head")?,
                "base": p.string("base")?,
                "body": p.string("body")?,
            }));
            insert_list(&mut body, "assignees", p.comma_list("assignees")?);
            RequestDescriptor::post(format!("{}/pulls", repo_path(p)?)).with_body(body)
        }
        PullRequestOp::Get => RequestDescriptor::get(pull_path()?),
        PullRequestOp::Update => {
            let mut body = Map::new();
            insert_text(&mut body, "body", p.string("body")?);
            insert_list(&mut body, "assignees", p.comma_list("assignees")?);
            RequestDescriptor::patch(pull_path()?).with_body(body)
        }
        PullRequestOp::Delete => RequestDescriptor::delete(pull_path()?),
        PullRequestOp::List => {
            let mut qs = object(json!({ "state": p.string("state")? }));
            qs.extend(paging(p)?);
            RequestDescriptor::get(format!("{}/pulls", repo_path(p)?)).with_query(qs)
        }
        // Forgejo names the merge style field `Do`.
        PullRequestOp::Merge => RequestDescriptor::post(format!("{}/merge", pull_path()?))
            .with_body(object(json!({ "Do": p.string("mergeMethod")? }))),
        PullRequestOp::Close => {
            RequestDescriptor::patch(pull_path()?).with_body(object(json!({ "state": "closed" })))
        }
        PullRequestOp::Reopen => {
            RequestDescriptor::patch(pull_path()?).with_body(object(json!({ "state": "open" })))
        }
        PullRequestOp::ListCommits => {
            RequestDescriptor::get(format!("{}/commits", pull_path()?)).with_query(paging(p)?)
        }
        PullRequestOp::ListFiles => {
            RequestDescriptor::get(format!("{}/files", pull_path()?)).with_query(paging(p)?)
        }
    })
}

fn user(op: UserOp, p: &Params<'_>) -> Result<RequestDescriptor> {
    Ok(match op {
        UserOp::Get => RequestDescriptor::get(format!("/users/{}", p.string("username")?)),
        UserOp::GetAuthenticatedUser => RequestDescriptor::get("/user"),
        UserOp::List => RequestDescriptor::get("/users").with_query(paging(p)?),
        UserOp::Search => RequestDescriptor::get("/users/search").with_query(search(p)?),
        UserOp::GetRepositories => {
            RequestDescriptor::get(format!("/users/{}/repos", p.string("username")?))
                .with_query(paging(p)?)
        }
        UserOp::GetOrganizations => {
            RequestDescriptor::get(format!("/users/{}/orgs", p.string("username")?))
                .with_query(paging(p)?)
        }
    })
}

fn organization(op: OrganizationOp, p: &Params<'_>) -> Result<RequestDescriptor> {
    let org_path = || -> Result<String> { Ok(format!("/orgs/{}", p.string("organization")?)) };
    Ok(match op {
        OrganizationOp::Create => RequestDescriptor::post("/orgs").with_body(object(json!({
            "username": p.string("username")?,
            "full_name": p.string("fullName")?,
            "description": p.string("description")?,
        }))),
        OrganizationOp::Get => RequestDescriptor::get(org_path()?),
        OrganizationOp::Update => {
            let mut body = Map::new();
            insert_text(&mut body, "full_name", p.string("fullName")?);
            insert_text(&mut body, "description", p.string("description")?);
            RequestDescriptor::patch(org_path()?).with_body(body)
        }
        OrganizationOp::Delete => RequestDescriptor::delete(org_path()?),
        OrganizationOp::List => RequestDescriptor::get("/orgs").with_query(paging(p)?),
        OrganizationOp::ListMembers => {
            RequestDescriptor::get(format!("{}/members", org_path()?)).with_query(paging(p)?)
        }
        // Not shared with repository.list: that one lists a user's repos.
        OrganizationOp::ListRepositories => {
            RequestDescriptor::get(format!("{}/repos", org_path()?)).with_query(paging(p)?)
        }
        OrganizationOp::ListTeams => {
            RequestDescriptor::get(format!("{}/teams", org_path()?)).with_query(paging(p)?)
        }
    })
}

fn release(op: ReleaseOp, p: &Params<'_>) -> Result<RequestDescriptor> {
    let release_path = || -> Result<String> {
        Ok(format!(
            "{}/releases/{}",
            repo_path(p)?,
            p.integer("releaseId")?
        ))
    };
    Ok(match op {
        ReleaseOp::Create => {
            RequestDescriptor::post(format!("{}/releases", repo_path(p)?)).with_body(object(json!({
                "tag_name": p.string("tagName")?,
                "name": p.string("name")?,
                "body": p.string("body")?,
                "draft": p.boolean("draft")?,
                "prerelease": p.boolean("prerelease")?,
            })))
        }
        ReleaseOp::Get => RequestDescriptor::get(release_path()?),
        ReleaseOp::Update => {
            let mut body = Map::new();
            insert_text(&mut body, "name", p.string("name")?);
            insert_text(&mut body, "body", p.string("body")?);
            body.insert("draft".into(), json!(p.boolean("draft")?));
            body.insert("prerelease".into(), json!(p.boolean("prerelease")?));
            RequestDescriptor::patch(release_path()?).with_body(body)
        }
        ReleaseOp::Delete => RequestDescriptor::delete(release_path()?),
        ReleaseOp::List => {
            RequestDescriptor::get(format!("{}/releases", repo_path(p)?)).with_query(paging(p)?)
        }
        ReleaseOp::ListAssets => {
            RequestDescriptor::get(format!("{}/assets", release_path()?)).with_query(paging(p)?)
        }
        // Only the asset name travels; the binary body is not sent.
        ReleaseOp::UploadAsset => RequestDescriptor::post(format!("{}/assets", release_path()?))
            .with_query(object(json!({ "name": p.string("assetName")? }))),
    })
}

fn hook_config(p: &Params<'_>) -> Result<Value> {
    Ok(json!({
        "url": p.string("webhookUrl")?,
        "content_type": "json",
    }))
}

fn webhook(op: WebhookOp, p: &Params<'_>) -> Result<RequestDescriptor> {
    let hook_path = || -> Result<String> {
        Ok(format!("{}/hooks/{}", repo_path(p)?, p.integer("webhookId")?))
    };
    Ok(match op {
        WebhookOp::Create => {
            RequestDescriptor::post(format!("{}/hooks", repo_path(p)?)).with_body(object(json!({
                "type": "forgejo",
                "config": hook_config(p)?,
                "events": p.string_array("events")?,
                "active": p.boolean("active")?,
            })))
        }
        WebhookOp::Get => RequestDescriptor::get(hook_path()?),
        WebhookOp::Update => RequestDescriptor::patch(hook_path()?).with_body(object(json!({
            "config": hook_config(p)?,
            "events": p.string_array("events")?,
            "active": p.boolean("active")?,
        }))),
        WebhookOp::Delete => RequestDescriptor::delete(hook_path()?),
        WebhookOp::List => {
            RequestDescriptor::get(format!("{}/hooks", repo_path(p)?)).with_query(paging(p)?)
        }
        WebhookOp::Test => RequestDescriptor::post(format!("{}/tests", hook_path()?)),
    })
}

fn branch(op: BranchOp, p: &Params<'_>) -> Result<RequestDescriptor> {
    Ok(match op {
        BranchOp::Create => {
            RequestDescriptor::post(format!("{}/branches", repo_path(p)?)).with_body(object(json!({
                "new_branch_name": p.string("branchName")?,
                "old_branch_name": p.string("sourceBranch")?,
            })))
        }
        BranchOp::Get => RequestDescriptor::get(format!(
            "{}/branches/{}",
            repo_path(p)?,
            p.string("branchName")?
        )),
        BranchOp::Delete => RequestDescriptor::delete(format!(
            "{}/branches/{}",
            repo_path(p)?,
            p.string("branchName")?
        )),
        BranchOp::List => {
            RequestDescriptor::get(format!("{}/branches", repo_path(p)?)).with_query(paging(p)?)
        }
        BranchOp::GetProtection => RequestDescriptor::get(format!(
            "{}/branch_protections/{}",
            repo_path(p)?,
            p.string("branchName")?
        )),
        BranchOp::UpdateProtection => {
            // Settings are spread after branch_name and win on key clashes.
            let mut body = object(json!({ "branch_name": p.string("branchName")? }));
            body.extend(p.object("protectionSettings")?);
            RequestDescriptor::post(format!("{}/branch_protections", repo_path(p)?)).with_body(body)
        }
    })
}

fn tag(op: TagOp, p: &Params<'_>) -> Result<RequestDescriptor> {
    Ok(match op {
        TagOp::Create => {
            // message is sent even when empty; only target is optional
            let mut body = object(json!({
                "tag_name": p.string("tagName")?,
                "message": p.string("message")?,
            }));
            insert_text(&mut body, "target", p.string("target")?);
            RequestDescriptor::post(format!("{}/tags", repo_path(p)?)).with_body(body)
        }
        TagOp::Get => RequestDescriptor::get(format!(
            "{}/tags/{}",
            repo_path(p)?,
            p.string("tagName")?
        )),
        TagOp::Delete => RequestDescriptor::delete(format!(
            "{}/tags/{}",
            repo_path(p)?,
            p.string("tagName")?
        )),
        TagOp::List => {
            RequestDescriptor::get(format!("{}/tags", repo_path(p)?)).with_query(paging(p)?)
        }
    })
}

fn commit(op: CommitOp, p: &Params<'_>) -> Result<RequestDescriptor> {
    Ok(match op {
        CommitOp::Get => {
            let sha = p.string("sha")?;
            if sha.trim().is_empty() {
                // No SHA: the latest commit, as a one-element page.
                RequestDescriptor::get(format!("{}/commits", repo_path(p)?))
                    .with_query(object(json!({ "page": 1, "limit": 1 })))
            } else {
                RequestDescriptor::get(format!("{}/git/commits/{}", repo_path(p)?, sha))
            }
        }
        CommitOp::List => {
            RequestDescriptor::get(format!("{}/commits", repo_path(p)?)).with_query(paging(p)?)
        }
        CommitOp::GetStatus => RequestDescriptor::get(format!(
            "{}/statuses/{}",
            repo_path(p)?,
            p.string("sha")?
        )),
        CommitOp::CreateStatus => {
            let mut body = object(json!({ "state": p.string("statusState")? }));
            insert_text(&mut body, "context", p.string("context")?);
            insert_text(&mut body, "description", p.string("description")?);
            insert_text(&mut body, "target_url", p.string("targetUrl")?);
            RequestDescriptor::post(format!("{}/statuses/{}", repo_path(p)?, p.string("sha")?))
                .with_body(body)
        }
        CommitOp::ListStatuses => RequestDescriptor::get(format!(
            "{}/commits/{}/statuses",
            repo_path(p)?,
            p.string("sha")?
        ))
        .with_query(paging(p)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::JsonParameters;
    use crate::types::HttpMethod;

    fn resolve_with(resource: &str, operation: &str, params: Value) -> RequestDescriptor {
        let src = JsonParameters::new(object(params), Vec::new());
        let op = Operation::parse(resource, operation).unwrap();
        resolve(op, &Params::new(&src, 0, op)).unwrap()
    }

    fn keys(m: &Option<Map<String, Value>>) -> Vec<&str> {
        m.as_ref()
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    #[test]
    fn branch_create() {
        let d = resolve_with(
            "branch",
            "create",
            json!({"owner": "testuser", "repository": "test-repo", "branchName": "feature-x", "sourceBranch": "main"}),
        );
        assert_eq!(d.method, HttpMethod::Post);
        assert_eq!(d.path, "/repos/testuser/test-repo/branches");
        assert!(d.query.is_none());
        assert_eq!(
            Value::Object(d.body.unwrap()),
            json!({"new_branch_name": "feature-x", "old_branch_name": "main"})
        );
    }

    #[test]
    fn commit_get_without_sha_lists_latest() {
        let d = resolve_with(
            "commit",
            "get",
            json!({"owner": "testuser", "repository": "test-repo", "sha": ""}),
        );
        assert_eq!(d.method, HttpMethod::Get);
        assert_eq!(d.path, "/repos/testuser/test-repo/commits");
        assert_eq!(Value::Object(d.query.unwrap()), json!({"page": 1, "limit": 1}));
        assert!(d.body.is_none());

        // whitespace counts as empty, and so does an absent sha
        let d = resolve_with("commit", "get", json!({"owner": "o", "repository": "r", "sha": "  "}));
        assert_eq!(d.path, "/repos/o/r/commits");
        let d = resolve_with("commit", "get", json!({"owner": "o", "repository": "r"}));
        assert_eq!(d.path, "/repos/o/r/commits");
    }

    #[test]
    fn commit_get_with_sha() {
        let d = resolve_with(
            "commit",
            "get",
            json!({"owner": "o", "repository": "r", "sha": "abc123"}),
        );
        assert_eq!(d.path, "/repos/o/r/git/commits/abc123");
        assert!(d.query.is_none());
    }

    #[test]
    fn pull_request_merge_uses_capitalized_do() {
        let d = resolve_with(
            "pullRequest",
            "merge",
            json!({"owner": "o", "repository": "r", "pullRequestNumber": 1, "mergeMethod": "squash"}),
        );
        assert_eq!(d.method, HttpMethod::Post);
        assert_eq!(d.path, "/repos/o/r/pulls/1/merge");
        assert_eq!(Value::Object(d.body.unwrap()), json!({"Do": "squash"}));
    }

    #[test]
    fn repository_create_body() {
        let d = resolve_with(
            "repository",
            "create",
            json!({"name": "n", "description": "", "private": false, "autoInit": true}),
        );
        assert_eq!(d.path, "/user/repos");
        assert_eq!(keys(&d.body), vec!["name", "description", "private", "auto_init"]);
        assert_eq!(d.body.unwrap()["private"], json!(false));
    }

    #[test]
    fn repository_update_sends_collection_verbatim() {
        let d = resolve_with(
            "repository",
            "update",
            json!({"owner": "o", "repository": "r", "updateFields": {"website": "https://x", "private": false}}),
        );
        assert_eq!(d.method, HttpMethod::Patch);
        assert_eq!(
            Value::Object(d.body.unwrap()),
            json!({"website": "https://x", "private": false})
        );
    }

    #[test]
    fn list_targets_differ_between_users_and_orgs() {
        let d = resolve_with("repository", "list", json!({"owner": "alice"}));
        assert_eq!(d.path, "/users/alice/repos");
        let d = resolve_with("organization", "listRepositories", json!({"organization": "acme"}));
        assert_eq!(d.path, "/orgs/acme/repos");
    }

    #[test]
    fn pagination_is_passed_through() {
        let d = resolve_with(
            "repository",
            "list",
            json!({"owner": "alice", "page": 2, "limit": 50}),
        );
        assert_eq!(Value::Object(d.query.unwrap()), json!({"page": 2, "limit": 50}));
    }

    #[test]
    fn search_query_keys() {
        let d = resolve_with("repository", "search", json!({"query": "rust"}));
        assert_eq!(d.path, "/repos/search");
        assert_eq!(keys(&d.query), vec!["q", "page", "limit"]);
        let d = resolve_with("issue", "search", json!({"query": "crash"}));
        assert_eq!(d.path, "/repos/issues/search");
        let d = resolve_with("user", "search", json!({"query": "bob"}));
        assert_eq!(d.path, "/users/search");
    }

    #[test]
    fn get_contents_ref_only_when_set() {
        let base = json!({"owner": "o", "repository": "r", "filePath": "docs/README.md"});
        let d = resolve_with("repository", "getContents", base.clone());
        assert_eq!(d.path, "/repos/o/r/contents/docs/README.md");
        assert!(d.query.is_none());

        let mut with_ref = base;
        with_ref["ref"] = json!("develop");
        let d = resolve_with("repository", "getContents", with_ref);
        assert_eq!(Value::Object(d.query.unwrap()), json!({"ref": "develop"}));
    }

    #[test]
    fn file_content_is_base64() {
        let d = resolve_with(
            "repository",
            "updateFile",
            json!({"owner": "o", "repository": "r", "filePath": "a.txt", "content": "Hello, World!", "message": "m", "sha": "s1"}),
        );
        assert_eq!(d.method, HttpMethod::Put);
        assert_eq!(
            Value::Object(d.body.unwrap()),
            json!({"content": "SGVsbG8sIFdvcmxkIQ==", "message": "m", "sha": "s1"})
        );

        let d = resolve_with(
            "repository",
            "deleteFile",
            json!({"owner": "o", "repository": "r", "filePath": "a.txt", "message": "rm", "sha": "s1"}),
        );
        assert_eq!(d.method, HttpMethod::Delete);
        assert_eq!(keys(&d.body), vec!["message", "sha"]);
    }

    #[test]
    fn issue_create_splits_lists() {
        let d = resolve_with(
            "issue",
            "create",
            json!({"owner": "o", "repository": "r", "title": "t", "body": "b", "labels": "bug, ui", "assignees": ""}),
        );
        assert_eq!(d.path, "/repos/o/r/issues");
        let body = d.body.unwrap();
        assert_eq!(body["labels"], json!(["bug", "ui"]));
        assert!(!body.contains_key("assignees"));
    }

    #[test]
    fn issue_update_omits_empty_fields() {
        let d = resolve_with(
            "issue",
            "update",
            json!({"owner": "o", "repository": "r", "issueNumber": 7, "body": "", "labels": "", "assignees": "amy"}),
        );
        assert_eq!(d.path, "/repos/o/r/issues/7");
        assert_eq!(Value::Object(d.body.unwrap()), json!({"assignees": ["amy"]}));

        let d = resolve_with(
            "issue",
            "update",
            json!({"owner": "o", "repository": "r", "issueNumber": 7}),
        );
        assert!(d.body.is_none());
    }

    #[test]
    fn issue_close_and_reopen() {
        let base = json!({"owner": "o", "repository": "r", "issueNumber": 3});
        let d = resolve_with("issue", "close", base.clone());
        assert_eq!(d.method, HttpMethod::Patch);
        assert_eq!(Value::Object(d.body.unwrap()), json!({"state": "closed"}));
        let d = resolve_with("issue", "reopen", base);
        assert_eq!(Value::Object(d.body.unwrap()), json!({"state": "open"}));
    }

    #[test]
    fn issue_list_and_comments() {
        let d = resolve_with("issue", "list", json!({"owner": "o", "repository": "r", "state": "all"}));
        assert_eq!(keys(&d.query), vec!["state", "page", "limit"]);
        let d = resolve_with(
            "issue",
            "addComment",
            json!({"owner": "o", "repository": "r", "issueNumber": 2, "body": "hi"}),
        );
        assert_eq!(d.path, "/repos/o/r/issues/2/comments");
        assert_eq!(d.method, HttpMethod::Post);
        let d = resolve_with(
            "issue",
            "editLabels",
            json!({"owner": "o", "repository": "r", "issueNumber": 2, "labels": "a,b"}),
        );
        assert_eq!(d.method, HttpMethod::Put);
        assert_eq!(d.path, "/repos/o/r/issues/2/labels");
        assert_eq!(Value::Object(d.body.unwrap()), json!({"labels": ["a", "b"]}));
    }

    #[test]
    fn pull_request_create_and_update() {
        let d = resolve_with(
            "pullRequest",
            "create",
            json!({"owner": "o", "repository": "r", "title": "t", "head": "feat", "base": "main", "body": "", "assignees": "a, b"}),
        );
        assert_eq!(d.path, "/repos/o/r/pulls");
        assert_eq!(keys(&d.body), vec!["title", "head", "base", "body", "assignees"]);

        let d = resolve_with(
            "pullRequest",
            "update",
            json!({"owner": "o", "repository": "r", "pullRequestNumber": 4, "body": "new"}),
        );
        assert_eq!(Value::Object(d.body.unwrap()), json!({"body": "new"}));

        let d = resolve_with(
            "pullRequest",
            "listFiles",
            json!({"owner": "o", "repository": "r", "pullRequestNumber": 4}),
        );
        assert_eq!(d.path, "/repos/o/r/pulls/4/files");
    }

    #[test]
    fn user_routes() {
        assert_eq!(resolve_with("user", "getAuthenticatedUser", json!({})).path, "/user");
        assert_eq!(resolve_with("user", "get", json!({"username": "bob"})).path, "/users/bob");
        assert_eq!(
            resolve_with("user", "getOrganizations", json!({"username": "bob"})).path,
            "/users/bob/orgs"
        );
        assert_eq!(resolve_with("user", "list", json!({})).path, "/users");
    }

    #[test]
    fn organization_create_and_update() {
        let d = resolve_with(
            "organization",
            "create",
            json!({"username": "acme", "fullName": "Acme Inc", "description": ""}),
        );
        assert_eq!(d.path, "/orgs");
        assert_eq!(
            Value::Object(d.body.unwrap()),
            json!({"username": "acme", "full_name": "Acme Inc", "description": ""})
        );

        let d = resolve_with(
            "organization",
            "update",
            json!({"organization": "acme", "fullName": "", "description": "new"}),
        );
        assert_eq!(d.path, "/orgs/acme");
        assert_eq!(Value::Object(d.body.unwrap()), json!({"description": "new"}));
    }

    #[test]
    fn release_booleans_always_sent() {
        let d = resolve_with(
            "release",
            "create",
            json!({"owner": "o", "repository": "r", "tagName": "v1.0.0", "name": "", "body": ""}),
        );
        assert_eq!(
            Value::Object(d.body.unwrap()),
            json!({"tag_name": "v1.0.0", "name": "", "body": "", "draft": false, "prerelease": false})
        );

        let d = resolve_with(
            "release",
            "update",
            json!({"owner": "o", "repository": "r", "releaseId": 9, "name": "", "body": "", "draft": false, "prerelease": true}),
        );
        assert_eq!(d.path, "/repos/o/r/releases/9");
        assert_eq!(
            Value::Object(d.body.unwrap()),
            json!({"draft": false, "prerelease": true})
        );
    }

    #[test]
    fn release_upload_asset_has_name_query_only() {
        let d = resolve_with(
            "release",
            "uploadAsset",
            json!({"owner": "o", "repository": "r", "releaseId": 9, "assetName": "app.tar.gz"}),
        );
        assert_eq!(d.method, HttpMethod::Post);
        assert_eq!(d.path, "/repos/o/r/releases/9/assets");
        assert_eq!(Value::Object(d.query.unwrap()), json!({"name": "app.tar.gz"}));
        assert!(d.body.is_none());
    }

    #[test]
    fn webhook_bodies() {
        let d = resolve_with(
            "webhook",
            "create",
            json!({"owner": "o", "repository": "r", "webhookUrl": "https://hook", "events": ["push", "issues"], "active": true}),
        );
        assert_eq!(d.path, "/repos/o/r/hooks");
        assert_eq!(
            Value::Object(d.body.unwrap()),
            json!({
                "type": "forgejo",
                "config": {"url": "https://hook", "content_type": "json"},
                "events": ["push", "issues"],
                "active": true
            })
        );

        let d = resolve_with(
            "webhook",
            "update",
            json!({"owner": "o", "repository": "r", "webhookId": 5, "webhookUrl": "https://hook", "active": false}),
        );
        assert_eq!(d.path, "/repos/o/r/hooks/5");
        let body = d.body.unwrap();
        assert!(!body.contains_key("type"));
        assert_eq!(body["events"], json!(["push"]));
        assert_eq!(body["active"], json!(false));

        let d = resolve_with("webhook", "test", json!({"owner": "o", "repository": "r", "webhookId": 5}));
        assert_eq!(d.path, "/repos/o/r/hooks/5/tests");
        assert!(d.body.is_none());
    }

    #[test]
    fn branch_protection_spreads_settings() {
        let d = resolve_with(
            "branch",
            "updateProtection",
            json!({"owner": "o", "repository": "r", "branchName": "main", "protectionSettings": {"enable_push": false, "required_approvals": 0}}),
        );
        assert_eq!(d.path, "/repos/o/r/branch_protections");
        assert_eq!(
            Value::Object(d.body.unwrap()),
            json!({"branch_name": "main", "enable_push": false, "required_approvals": 0})
        );
        let d = resolve_with(
            "branch",
            "getProtection",
            json!({"owner": "o", "repository": "r", "branchName": "main"}),
        );
        assert_eq!(d.path, "/repos/o/r/branch_protections/main");
    }

    #[test]
    fn tag_create_target_optional_message_kept() {
        let d = resolve_with(
            "tag",
            "create",
            json!({"owner": "o", "repository": "r", "tagName": "v1", "message": "", "target": ""}),
        );
        assert_eq!(
            Value::Object(d.body.unwrap()),
            json!({"tag_name": "v1", "message": ""})
        );
        let d = resolve_with(
            "tag",
            "create",
            json!({"owner": "o", "repository": "r", "tagName": "v1", "message": "m", "target": "abc"}),
        );
        assert_eq!(keys(&d.body), vec!["tag_name", "message", "target"]);
    }

    #[test]
    fn commit_status_routes() {
        let d = resolve_with(
            "commit",
            "createStatus",
            json!({"owner": "o", "repository": "r", "sha": "abc", "statusState": "success", "context": "ci", "description": "", "targetUrl": "https://ci"}),
        );
        assert_eq!(d.path, "/repos/o/r/statuses/abc");
        assert_eq!(
            Value::Object(d.body.unwrap()),
            json!({"state": "success", "context": "ci", "target_url": "https://ci"})
        );
        let d = resolve_with("commit", "listStatuses", json!({"owner": "o", "repository": "r", "sha": "abc"}));
        assert_eq!(d.path, "/repos/o/r/commits/abc/statuses");
        assert_eq!(keys(&d.query), vec!["page", "limit"]);
    }

    fn full_parameter_set() -> JsonParameters {
        let mut node = object(json!({
            "owner": "o", "repository": "r", "organization": "acme", "username": "u",
            "issueNumber": 7, "pullRequestNumber": 8, "releaseId": 9, "webhookId": 10,
            "branchName": "main", "sourceBranch": "dev", "tagName": "v1", "sha": "abc"
        }));
        node.extend(object(json!({
            "filePath": "docs/a.md", "content": "c", "message": "m", "ref": "dev",
            "title": "t", "body": "b", "labels": "x", "assignees": "y",
            "head": "feat", "base": "main", "state": "open", "mergeMethod": "merge"
        })));
        node.extend(object(json!({
            "name": "n", "description": "d", "fullName": "F", "query": "q",
            "private": false, "autoInit": false, "draft": false, "prerelease": false,
            "assetName": "a.zip", "webhookUrl": "https://hook", "events": ["push"]
        })));
        node.extend(object(json!({
            "active": true, "target": "main", "statusState": "success",
            "context": "ci", "targetUrl": "https://ci", "page": 1, "limit": 50,
            "updateFields": {"website": "https://w"},
            "protectionSettings": {"enable_push": true}
        })));
        JsonParameters::new(node, Vec::new())
    }

    #[test]
    fn route_table() {
        use crate::types::Resource;
        use HttpMethod::{Delete as D, Get as G, Patch as PA, Post as P, Put as PU};

        const PG: &[&str] = &["page", "limit"];
        const NONE: &[&str] = &[];
        let rows: &[(&str, &str, HttpMethod, &str, &[&str], &[&str])] = &[
            ("repository", "create", P, "/user/repos", NONE, &["name", "description", "private", "auto_init"]),
            ("repository", "get", G, "/repos/o/r", NONE, NONE),
            ("repository", "update", PA, "/repos/o/r", NONE, &["website"]),
            ("repository", "delete", D, "/repos/o/r", NONE, NONE),
            ("repository", "list", G, "/users/o/repos", PG, NONE),
            ("repository", "search", G, "/repos/search", &["q", "page", "limit"], NONE),
            ("repository", "getContents", G, "/repos/o/r/contents/docs/a.md", &["ref"], NONE),
            ("repository", "createFile", P, "/repos/o/r/contents/docs/a.md", NONE, &["content", "message"]),
            ("repository", "updateFile", PU, "/repos/o/r/contents/docs/a.md", NONE, &["content", "message", "sha"]),
            ("repository", "deleteFile", D, "/repos/o/r/contents/docs/a.md", NONE, &["message", "sha"]),
            ("issue", "create", P, "/repos/o/r/issues", NONE, &["title", "body", "labels", "assignees"]),
            ("issue", "get", G, "/repos/o/r/issues/7", NONE, NONE),
            ("issue", "update", PA, "/repos/o/r/issues/7", NONE, &["body", "labels", "assignees"]),
            ("issue", "delete", D, "/repos/o/r/issues/7", NONE, NONE),
            ("issue", "list", G, "/repos/o/r/issues", &["state", "page", "limit"], NONE),
            ("issue", "search", G, "/repos/issues/search", &["q", "page", "limit"], NONE),
            ("issue", "addComment", P, "/repos/o/r/issues/7/comments", NONE, &["body"]),
            ("issue", "listComments", G, "/repos/o/r/issues/7/comments", PG, NONE),
            ("issue", "editLabels", PU, "/repos/o/r/issues/7/labels", NONE, &["labels"]),
            ("issue", "close", PA, "/repos/o/r/issues/7", NONE, &["state"]),
            ("issue", "reopen", PA, "/repos/o/r/issues/7", NONE, &["state"]),
            ("pullRequest", "create", P, "/repos/o/r/pulls", NONE, &["title", "head", "base", "body", "assignees"]),
            ("pullRequest", "get", G, "/repos/o/r/pulls/8", NONE, NONE),
            ("pullRequest", "update", PA, "/repos/o/r/pulls/8", NONE, &["body", "assignees"]),
            ("pullRequest", "delete", D, "/repos/o/r/pulls/8", NONE, NONE),
            ("pullRequest", "list", G, "/repos/o/r/pulls", &["state", "page", "limit"], NONE),
            ("pullRequest", "merge", P, "/repos/o/r/pulls/8/merge", NONE, &["Do"]),
            ("pullRequest", "close", PA, "/repos/o/r/pulls/8", NONE, &["state"]),
            ("pullRequest", "reopen", PA, "/repos/o/r/pulls/8", NONE, &["state"]),
            ("pullRequest", "listCommits", G, "/repos/o/r/pulls/8/commits", PG, NONE),
            ("pullRequest", "listFiles", G, "/repos/o/r/pulls/8/files", PG, NONE),
            ("user", "get", G, "/users/u", NONE, NONE),
            ("user", "getAuthenticatedUser", G, "/user", NONE, NONE),
            ("user", "list", G, "/users", PG, NONE),
            ("user", "search", G, "/users/search", &["q", "page", "limit"], NONE),
            ("user", "getRepositories", G, "/users/u/repos", PG, NONE),
            ("user", "getOrganizations", G, "/users/u/orgs", PG, NONE),
            ("organization", "create", P, "/orgs", NONE, &["username", "full_name", "description"]),
            ("organization", "get", G, "/orgs/acme", NONE, NONE),
            ("organization", "update", PA, "/orgs/acme", NONE, &["full_name", "description"]),
            ("organization", "delete", D, "/orgs/acme", NONE, NONE),
            ("organization", "list", G, "/orgs", PG, NONE),
            ("organization", "listMembers", G, "/orgs/acme/members", PG, NONE),
            ("organization", "listRepositories", G, "/orgs/acme/repos", PG, NONE),
            ("organization", "listTeams", G, "/orgs/acme/teams", PG, NONE),
            ("release", "create", P, "/repos/o/r/releases", NONE, &["tag_name", "name", "body", "draft", "prerelease"]),
            ("release", "get", G, "/repos/o/r/releases/9", NONE, NONE),
            ("release", "update", PA, "/repos/o/r/releases/9", NONE, &["name", "body", "draft", "prerelease"]),
            ("release", "delete", D, "/repos/o/r/releases/9", NONE, NONE),
            ("release", "list", G, "/repos/o/r/releases", PG, NONE),
            ("release", "listAssets", G, "/repos/o/r/releases/9/assets", PG, NONE),
            ("release", "uploadAsset", P, "/repos/o/r/releases/9/assets", &["name"], NONE),
            ("webhook", "create", P, "/repos/o/r/hooks", NONE, &["type", "config", "events", "active"]),
            ("webhook", "get", G, "/repos/o/r/hooks/10", NONE, NONE),
            ("webhook", "update", PA, "/repos/o/r/hooks/10", NONE, &["config", "events", "active"]),
            ("webhook", "delete", D, "/repos/o/r/hooks/10", NONE, NONE),
            ("webhook", "list", G, "/repos/o/r/hooks", PG, NONE),
            ("webhook", "test", P, "/repos/o/r/hooks/10/tests", NONE, NONE),
            ("branch", "create", P, "/repos/o/r/branches", NONE, &["new_branch_name", "old_branch_name"]),
            ("branch", "get", G, "/repos/o/r/branches/main", NONE, NONE),
            ("branch", "delete", D, "/repos/o/r/branches/main", NONE, NONE),
            ("branch", "list", G, "/repos/o/r/branches", PG, NONE),
            ("branch", "getProtection", G, "/repos/o/r/branch_protections/main", NONE, NONE),
            ("branch", "updateProtection", P, "/repos/o/r/branch_protections", NONE, &["branch_name", "enable_push"]),
            ("tag", "create", P, "/repos/o/r/tags", NONE, &["tag_name", "message", "target"]),
            ("tag", "get", G, "/repos/o/r/tags/v1", NONE, NONE),
            ("tag", "delete", D, "/repos/o/r/tags/v1", NONE, NONE),
            ("tag", "list", G, "/repos/o/r/tags", PG, NONE),
            ("commit", "get", G, "/repos/o/r/git/commits/abc", NONE, NONE),
            ("commit", "list", G, "/repos/o/r/commits", PG, NONE),
            ("commit", "getStatus", G, "/repos/o/r/statuses/abc", NONE, NONE),
            ("commit", "createStatus", P, "/repos/o/r/statuses/abc", NONE, &["state", "context", "description", "target_url"]),
            ("commit", "listStatuses", G, "/repos/o/r/commits/abc/statuses", PG, NONE),
        ];

        let total: usize = Resource::ALL.iter().map(|r| r.operations().len()).sum();
        assert_eq!(rows.len(), total);

        let src = full_parameter_set();
        for (resource, operation, method, path, query, body) in rows {
            let op = Operation::parse(resource, operation).unwrap();
            let d = resolve(op, &Params::new(&src, 0, op)).unwrap();
            assert_eq!(d.method, *method, "{}", op);
            assert_eq!(d.path, *path, "{}", op);
            assert_eq!(keys(&d.query), query.to_vec(), "{} query", op);
            assert_eq!(keys(&d.body), body.to_vec(), "{} body", op);
        }
        for r in Resource::ALL {
            for name in r.operations() {
                assert!(
                    rows.iter().any(|row| row.0 == r.as_str() && row.1 == name),
                    "{}.{} has no route row",
                    r,
                    name
                );
            }
        }
    }

    #[test]
    fn every_pair_resolves_with_schema_defaults() {
        use crate::types::Resource;
        for r in Resource::ALL {
            for name in r.operations() {
                let op = Operation::parse(r.as_str(), name).unwrap();
                let src = JsonParameters::default();
                let res = resolve(op, &Params::new(&src, 0, op));
                assert!(res.is_ok(), "{} failed: {:?}", op, res.err());
            }
        }
    }
}
