//! [`RemoteStore`] over the service's session-cookie JSON endpoints.

use log::{debug, info};
use reqwest::blocking::{Client as HttpClient, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, COOKIE, REFERER, USER_AGENT};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

use super::ops::{Transfer, WriteOp};
use super::session::Session;
use super::RemoteStore;
use crate::config::ClientConfig;
use crate::error::{JianguoError, Result};
use crate::events::{Cursor, EventPage};
use crate::model::{
    AppPassword, Entry, Event, FileVersion, NewRoot, RootMetadata, RootRef, ShareInfo,
    ShareListing, StorageRoot,
};

const BROWSER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/75.0.3770.100 Safari/537.36";
const EMPTY_CONTENT_URI: &str = "/static/others/empty.txt";

/// Blocking HTTP client bound to one session.
#[derive(Debug)]
pub struct HttpStore {
    http: HttpClient,
    host: Url,
    session: Session,
}

#[derive(Deserialize)]
struct RootList {
    #[serde(default)]
    sandboxes: Vec<StorageRoot>,
}

#[derive(Deserialize)]
struct Listing {
    #[serde(default)]
    contents: Vec<Entry>,
}

#[derive(Deserialize)]
struct EventsResponse {
    #[serde(default)]
    events: Vec<Event>,
    #[serde(default)]
    marker: Option<Value>,
}

#[derive(Deserialize)]
struct ShareList {
    #[serde(default)]
    objects: Vec<ShareListing>,
}

#[derive(Deserialize)]
struct JobTicket {
    uuid: String,
}

#[derive(Deserialize)]
struct JobState {
    state: String,
}

#[derive(Deserialize)]
struct Link {
    url: String,
}

/// Endpoint and form body for one [`WriteOp`].
#[derive(Debug, PartialEq)]
pub(crate) struct WriteRequest {
    pub endpoint: &'static str,
    pub form: Vec<(String, String)>,
    /// Progress endpoint to poll with the returned job uuid, for asynchronous writes.
    pub progress: Option<&'static str>,
}

/// Booleans in form bodies use the service's capitalised spelling.
fn flag(value: bool) -> String {
    let text = if value { "True" } else { "False" };
    text.to_string()
}

/// A JSON value in the service's literal syntax for ACL members.
fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        Value::Bool(b) => flag(*b),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}

/// `'a@x.com': 3, 'b@x.com': 1`
fn member_list(users: &Map<String, Value>) -> String {
    users
        .iter()
        .map(|(user, level)| format!("'{user}': {}", literal(level)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn group_list(groups: &[Value]) -> String {
    groups.iter().map(literal).collect::<Vec<_>>().join(", ")
}

fn pair(key: impl Into<String>, value: impl Into<String>) -> (String, String) {
    (key.into(), value.into())
}

pub(crate) fn encode_write(op: &WriteOp) -> WriteRequest {
    let (endpoint, form, progress) = match op {
        WriteOp::CreateFile { path } => (
            "/d/ajax/fileops/create",
            vec![pair("path", path), pair("content_uri", EMPTY_CONTENT_URI)],
            None,
        ),
        WriteOp::CreateDir { path } => ("/d/ajax/dirops/create", vec![pair("path", path)], None),
        WriteOp::Delete { path, rev, is_dir } => (
            if *is_dir {
                "/d/ajax/dirops/delete"
            } else {
                "/d/ajax/fileops/delete"
            },
            vec![pair(path, rev)],
            None,
        ),
        WriteOp::Purge { path, version } => (
            "/d/ajax/purge",
            vec![pair(path, format!("{version} FILE"))],
            None,
        ),
        WriteOp::Restore { path } => (
            "/d/ajax/restoreDel",
            vec![pair(path, "")],
            Some("/d/ajax/restoreProgress"),
        ),
        WriteOp::Rename {
            path,
            new_name,
            is_dir,
            rev,
        } => (
            "/d/ajax/rename",
            vec![
                pair("path", path),
                pair("type", if *is_dir { "directory" } else { "file" }),
                pair("destName", new_name),
                pair("version", rev),
            ],
            None,
        ),
        WriteOp::Transfer {
            mode,
            source,
            source_path,
            dest_dir,
        } => (
            match mode {
                Transfer::Move => "/d/ajax/submitMove",
                Transfer::Copy => "/d/ajax/submitCopy",
            },
            vec![
                pair("srcSndId", &source.id),
                pair("srcSndMagic", &source.magic),
                pair("srcPath", source_path),
                pair("dstDir", dest_dir),
            ],
            Some("/d/ajax/moveProgress"),
        ),
        WriteOp::RestoreVersion { path, version } => (
            "/d/ajax/fileops/restore",
            vec![pair("path", path), pair("version", version)],
            None,
        ),
        WriteOp::Publish { share } => (
            "/d/ajax/dirops/pub",
            vec![
                pair("path", &share.path),
                pair("acl_list", &share.acl_list),
                pair("acl", share.acl.to_string()),
                pair("disable_download", flag(share.download_disabled)),
                pair("version", &share.version),
                pair("enable_upload", flag(share.enable_upload)),
                pair("enable_watermark", flag(share.enable_watermark)),
                pair("enable_comment", flag(share.enable_comment)),
            ],
            None,
        ),
        WriteOp::RevokeShare { path, is_dir } => {
            let kind = if *is_dir { "directory" } else { "file" };
            (
                "/d/ajax/pubops/revoke",
                vec![pair(format!("{path}|{kind}"), "dummy")],
                None,
            )
        }
        WriteOp::DeleteRoot => ("/d/ajax/sandbox/delete", Vec::new(), None),
        WriteOp::RestoreRoot => ("/d/ajax/sandbox/restore", Vec::new(), None),
        WriteOp::UpdateRoot { metadata } => {
            let acl = metadata.acls.first().cloned().unwrap_or_default();
            (
                "/d/ajax/sandbox/updateMetaData",
                vec![
                    pair("name", &metadata.name),
                    pair("do_not_sync", flag(metadata.do_not_sync)),
                    pair("desc", &metadata.description),
                    pair("acl_path", &acl.path),
                    pair("id", &metadata.id),
                    pair("magic", &metadata.magic),
                    pair("acl_signed", acl.acl.signed.to_string()),
                    pair("acl_users", member_list(&acl.acl.users)),
                    pair("acl_groups", group_list(&acl.acl.groups)),
                ],
                None,
            )
        }
        WriteOp::CreateShortcut { dest_path } => (
            "/d/ajax/fileops/createShortcut",
            vec![pair("destPath", dest_path)],
            None,
        ),
        WriteOp::Undo(directive) => (
            "/d/ajax/fileops/undoEvents",
            vec![
                pair("optype", directive.op_type.as_str()),
                pair("path", &directive.path),
                pair("deleted", flag(directive.deleted)),
                pair("dir", flag(directive.dir)),
                pair("version", &directive.version),
            ],
            None,
        ),
    };

    WriteRequest {
        endpoint,
        form,
        progress,
    }
}

/// `prefix` followed by the percent-encoded segments of `sub_path`.
pub(crate) fn entry_url(host: &Url, prefix: &str, sub_path: &str) -> Result<Url> {
    let mut url = host
        .join(prefix)
        .map_err(|e| JianguoError::Config(format!("invalid endpoint {prefix}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| JianguoError::Config(format!("host {host} cannot carry a path")))?
        .extend(sub_path.split('/').filter(|s| !s.is_empty()));
    Ok(url)
}

fn join_path(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name)
}

fn root_query(root: &RootRef) -> [(&'static str, &str); 2] {
    [("sndId", root.id.as_str()), ("sndMagic", root.magic.as_str())]
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    Ok(serde_json::from_str(body)?)
}

/// A list sent either bare or under one of `keys` of an object.
fn decode_list<T: DeserializeOwned>(body: &str, keys: &[&str]) -> Result<Vec<T>> {
    let value: Value = serde_json::from_str(body)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut object) => match keys.iter().find_map(|k| object.remove(*k)) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(JianguoError::from))
        .collect()
}

impl HttpStore {
    /// Build a store around an existing session without contacting the service.
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self> {
        let host = Url::parse(&config.host_url)
            .map_err(|e| JianguoError::Config(format!("invalid host_url {}: {e}", config.host_url)))?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("zh-CN,zh;q=0.8,en-US;q=0.3,en;q=0.2"),
        );
        let referer = HeaderValue::from_str(host.as_str())
            .map_err(|e| JianguoError::Config(format!("invalid referer: {e}")))?;
        headers.insert(REFERER, referer);

        let http = HttpClient::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            host,
            session,
        })
    }

    /// Build a store from `config.session_cookie` and validate the session.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let cookie = config
            .session_cookie
            .as_deref()
            .ok_or_else(|| JianguoError::Config("session_cookie is not set".to_string()))?;
        Self::login_by_cookie(config, cookie)
    }

    /// Adopt a pre-established session cookie and check that the service accepts it.
    pub fn login_by_cookie(config: &ClientConfig, cookie: &str) -> Result<Self> {
        let session = Session::new(cookie);
        if session.is_empty() {
            return Err(JianguoError::Config("session cookie is empty".to_string()));
        }

        let store = Self::new(config, session)?;
        store.user_info()?;
        info!("Session accepted by {}", store.host);
        Ok(store)
    }

    /// Raw account information.
    pub fn user_info(&self) -> Result<Value> {
        let body = self.get("/d/ajax/userop/getUserInfo", &[])?;
        decode(&body)
    }

    /// End the session. The store is consumed so the cookie cannot be reused.
    pub fn logout(self) -> Result<()> {
        self.get("/logout", &[])?;
        info!("Logged out of {}", self.host);
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.host
            .join(path)
            .map_err(|e| JianguoError::Config(format!("invalid endpoint {path}: {e}")))
    }

    fn cookie_header(&self) -> Result<HeaderValue> {
        HeaderValue::from_str(self.session.cookie())
            .map_err(|e| JianguoError::Config(format!("session cookie is not a valid header: {e}")))
    }

    fn send_get(&self, url: Url, query: &[(&str, &str)]) -> Result<Response> {
        debug!("GET {}", url.path());
        Ok(self
            .http
            .get(url)
            .header(COOKIE, self.cookie_header()?)
            .query(query)
            .send()?)
    }

    fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<String> {
        let url = self.endpoint(path)?;
        Self::read(self.send_get(url, query)?, path)
    }

    fn get_url(&self, url: Url, query: &[(&str, &str)]) -> Result<String> {
        let path = url.path().to_string();
        Self::read(self.send_get(url, query)?, &path)
    }

    fn read(response: Response, what: &str) -> Result<String> {
        let status = response.status();
        if !status.is_success() {
            return Err(JianguoError::Transport(format!("{what} returned HTTP {status}")));
        }
        Ok(response.text()?)
    }

    fn post_form(
        &self,
        path: &str,
        query: &[(&str, &str)],
        form: &[(String, String)],
    ) -> Result<Response> {
        let url = self.endpoint(path)?;
        debug!("POST {}", url.path());
        Ok(self
            .http
            .post(url)
            .header(COOKIE, self.cookie_header()?)
            .query(query)
            .form(form)
            .send()?)
    }

    /// Absolute download URL issued by the service.
    fn link_url(&self, root: &RootRef, path: &str, version: Option<&str>) -> Result<Url> {
        let mut query = root_query(root).to_vec();
        query.push(("path", path));
        if let Some(version) = version {
            query.push(("ver", version));
        }

        let body = self.get("/d/ajax/dlink", &query)?;
        let link: Link = decode(&body)?;
        self.endpoint(&link.url)
    }

    /// Confirm an asynchronous job reached `SUCCESS`.
    fn await_job(&self, progress: &str, ticket_body: &str, operation: &str) -> Result<()> {
        let ticket: JobTicket = decode(ticket_body)?;
        let body = self.get(progress, &[("uuid", ticket.uuid.as_str())])?;
        let job: JobState = decode(&body)?;

        if job.state == "SUCCESS" {
            Ok(())
        } else {
            Err(JianguoError::OperationFailed {
                operation: operation.to_string(),
                state: job.state,
            })
        }
    }
}

impl RemoteStore for HttpStore {
    fn list_storage_roots(&self, include_deleted: bool) -> Result<Vec<StorageRoot>> {
        if include_deleted {
            let body = self.get("/d/ajax/sandbox/listTrash", &[])?;
            let list: RootList = decode(&body)?;
            Ok(list
                .sandboxes
                .into_iter()
                .map(|mut root| {
                    root.deleted = true;
                    root
                })
                .collect())
        } else {
            let body = self.get("/d/ajax/userop/getUserInfo", &[])?;
            let list: RootList = decode(&body)?;
            Ok(list.sandboxes)
        }
    }

    fn list_entries(
        &self,
        root: &RootRef,
        sub_path: &str,
        include_deleted: bool,
    ) -> Result<Vec<Entry>> {
        let prefix = if include_deleted {
            "/d/ajax/listTrashDir"
        } else {
            "/d/ajax/browse"
        };
        let url = entry_url(&self.host, prefix, sub_path)?;
        let listing: Listing = decode(&self.get_url(url, &root_query(root))?)?;

        Ok(listing
            .contents
            .into_iter()
            .map(|mut entry| {
                if entry.path.is_empty() {
                    entry.path = join_path(sub_path, &entry.name);
                }
                entry.is_deleted |= include_deleted;
                entry
            })
            .collect())
    }

    fn fetch_event_page(&self, root: &RootRef, cursor: &Cursor) -> Result<EventPage> {
        let mut query = root_query(root).to_vec();
        if let Some(marker) = cursor.marker() {
            query.push(("marker", marker));
        }

        let body = self.get("/d/ajax/getEvents", &query)?;
        let page: EventsResponse = decode(&body)?;
        Ok(EventPage::new(
            page.events,
            Cursor::from_marker(page.marker.as_ref()),
        ))
    }

    fn submit_write(&self, root: &RootRef, op: &WriteOp) -> Result<()> {
        let request = encode_write(op);
        let response = self.post_form(request.endpoint, &root_query(root), &request.form)?;

        if response.status() == StatusCode::CONFLICT {
            return Err(JianguoError::StaleRevision {
                path: op.path().unwrap_or_default().to_string(),
                expected: op.revision().unwrap_or_default().to_string(),
                current: None,
            });
        }
        let body = Self::read(response, request.endpoint)?;

        if let Some(progress) = request.progress {
            self.await_job(progress, &body, op.label())?;
        }
        debug!("{} on root {} accepted", op.label(), root.id);
        Ok(())
    }

    fn get_share(&self, root: &RootRef, path: &str) -> Result<Option<ShareInfo>> {
        let [id, magic] = root_query(root);
        let url = self.endpoint("/d/ajax/pubInfo")?;
        let response = self.send_get(url, &[("path", path), id, magic])?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = Self::read(response, "/d/ajax/pubInfo")?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        let share: Option<ShareInfo> = decode(&body)?;
        Ok(share.map(|mut share| {
            if share.path.is_empty() {
                share.path = path.to_string();
            }
            share
        }))
    }

    fn list_shares(&self, root: &RootRef) -> Result<Vec<ShareListing>> {
        let body = self.get("/d/ajax/pubops/list/", &root_query(root))?;
        let list: ShareList = decode(&body)?;
        Ok(list.objects)
    }

    fn create_storage_root(&self, new_root: &NewRoot) -> Result<StorageRoot> {
        let bit = |b: bool| (if b { "1" } else { "0" }).to_string();
        let form = vec![
            pair("acl_anonymous", bit(new_root.acl_anonymous)),
            pair("acl_signed", bit(new_root.acl_signed)),
            pair("desc", &new_root.description),
            pair("do_not_sync", new_root.do_not_sync.to_string()),
            pair("name", &new_root.name),
        ];

        let response = self.post_form("/d/ajax/sandbox/create", &[], &form)?;
        let body = Self::read(response, "/d/ajax/sandbox/create")?;
        let root: StorageRoot = decode(&body)?;
        info!("Created storage root {:?} ({})", root.name, root.id);
        Ok(root)
    }

    fn download_link(&self, root: &RootRef, path: &str, version: Option<&str>) -> Result<String> {
        Ok(self.link_url(root, path, version)?.to_string())
    }

    fn read_file(&self, root: &RootRef, path: &str) -> Result<String> {
        let url = self.link_url(root, path, None)?;
        self.get_url(url, &[])
    }

    fn list_versions(&self, root: &RootRef, path: &str) -> Result<Vec<FileVersion>> {
        let url = entry_url(&self.host, "/d/ajax/versions", path)?;
        let body = self.get_url(url, &root_query(root))?;
        decode_list(&body, &["versions", "list"])
    }

    fn root_metadata(&self, root: &RootRef) -> Result<RootMetadata> {
        let [id, magic] = root_query(root);
        let body = self.get("/d/ajax/sandbox/metaData", &[("path", "/"), id, magic])?;
        decode(&body)
    }

    fn list_app_passwords(&self) -> Result<Vec<AppPassword>> {
        let body = self.get("/d/ajax/userop/getAsps", &[])?;
        decode_list(&body, &["asps", "aspList"])
    }

    fn generate_app_password(&self, name: &str) -> Result<AppPassword> {
        let form = [pair("asp_name", name)];
        let response = self.post_form("/d/ajax/userop/generateAsp", &[], &form)?;
        let body = Self::read(response, "/d/ajax/userop/generateAsp")?;

        let mut password: AppPassword = decode(&body)?;
        if password.name.is_empty() {
            password.name = name.to_string();
        }
        info!("Generated application password {name:?}");
        Ok(password)
    }

    fn revoke_app_password(&self, name: &str) -> Result<()> {
        let form = [pair("asp_name", name)];
        let response = self.post_form("/d/ajax/userop/revokeAsp", &[], &form)?;
        Self::read(response, "/d/ajax/userop/revokeAsp")?;
        info!("Revoked application password {name:?}");
        Ok(())
    }
}
