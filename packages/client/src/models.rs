//! XML records exchanged with the server.
//!
//! Attributes are mapped with quick-xml's `@` prefix convention, element
//! text with `$text`. Response envelopes are `<tsResponse>` documents and
//! request envelopes are `<tsRequest>` documents; each carries exactly the
//! child element its endpoint uses.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-reported failure, decoded from `<tsResponse><error .../></tsResponse>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerError {
    #[serde(rename = "@code", default)]
    pub code: String,

    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub detail: String,
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.code, self.summary, self.detail)
    }
}

impl std::error::Error for ServerError {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "tsResponse")]
pub struct ErrorResponse {
    pub error: ServerError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(rename = "@pageNumber", default)]
    pub page_number: u32,

    #[serde(rename = "@pageSize", default)]
    pub page_size: u32,

    #[serde(rename = "@totalAvailable", default)]
    pub total_available: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    #[serde(rename = "@id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(rename = "@name", default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(rename = "@contentUrl", default)]
    pub content_url: String,

    #[serde(rename = "@adminMode", default, skip_serializing_if = "Option::is_none")]
    pub admin_mode: Option<String>,

    #[serde(rename = "@userQuota", default, skip_serializing_if = "Option::is_none")]
    pub user_quota: Option<String>,

    #[serde(rename = "@storageQuota", default, skip_serializing_if = "Option::is_none")]
    pub storage_quota: Option<String>,

    #[serde(rename = "@state", default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(
        rename = "@statusReason",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub status_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<SiteUsage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteUsage {
    #[serde(rename = "@numUsers", default)]
    pub num_users: u32,

    #[serde(rename = "@storage", default)]
    pub storage: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sites {
    #[serde(rename = "site", default)]
    pub sites: Vec<Site>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "@id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(rename = "@name", default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(rename = "@siteRole", default, skip_serializing_if = "Option::is_none")]
    pub site_role: Option<String>,

    #[serde(rename = "@lastLogin", default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,

    #[serde(
        rename = "@externalAuthUserId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub external_auth_user_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    #[serde(rename = "@id", default)]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "@id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(rename = "@name", default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(
        rename = "@description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    #[serde(
        rename = "@parentProjectId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_project_id: Option<String>,

    #[serde(
        rename = "@contentPermissions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub content_permissions: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
}

impl Project {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projects {
    #[serde(rename = "project", default)]
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(rename = "@label", default)]
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tags {
    #[serde(rename = "tag", default)]
    pub tags: Vec<Tag>,
}

/// Embedded connection credentials sent when publishing a datasource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionCredentials {
    #[serde(rename = "@name", default)]
    pub name: String,

    #[serde(rename = "@password", default)]
    pub password: String,

    #[serde(rename = "@embed", default)]
    pub embed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datasource {
    #[serde(rename = "@id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(rename = "@name", default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(rename = "@contentUrl", default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,

    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(rename = "@createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(rename = "@updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(rename = "@isCertified", default, skip_serializing_if = "Option::is_none")]
    pub is_certified: Option<bool>,

    #[serde(
        rename = "connectionCredentials",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub connection_credentials: Option<ConnectionCredentials>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<Project>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
}

impl Datasource {
    /// Id of the project holding this datasource, empty when unknown.
    pub fn project_id(&self) -> &str {
        self.project.as_ref().map(|p| p.id.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datasources {
    #[serde(rename = "datasource", default)]
    pub datasources: Vec<Datasource>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVersion {
    #[serde(rename = "@build", default)]
    pub build: String,

    #[serde(rename = "$text", default)]
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    #[serde(rename = "productVersion", default)]
    pub product_version: ProductVersion,

    #[serde(rename = "restApiVersion", default)]
    pub rest_api_version: String,
}

/// Sign-in credentials; on the way back the server fills in the token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "@name", default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(rename = "@password", default, skip_serializing_if = "String::is_empty")]
    pub password: String,

    #[serde(rename = "@token", default, skip_serializing_if = "String::is_empty")]
    pub token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<Site>,

    /// On requests this is the user to impersonate; on responses the signed-in user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "tsRequest")]
pub struct SigninRequest {
    pub credentials: Credentials,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "tsRequest")]
pub struct CreateProjectRequest {
    pub project: Project,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "tsRequest")]
pub struct DatasourceCreateRequest {
    pub datasource: Datasource,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "tsResponse")]
pub struct AuthResponse {
    pub credentials: Credentials,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "tsResponse")]
pub struct ServerInfoResponse {
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "tsResponse")]
pub struct QuerySitesResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,

    #[serde(default)]
    pub sites: Sites,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "tsResponse")]
pub struct QuerySiteResponse {
    pub site: Site,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "tsResponse")]
pub struct QueryUserOnSiteResponse {
    pub user: User,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "tsResponse")]
pub struct QueryProjectsResponse {
    #[serde(default)]
    pub pagination: Pagination,

    #[serde(default)]
    pub projects: Projects,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "tsResponse")]
pub struct CreateProjectResponse {
    pub project: Project,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "tsResponse")]
pub struct QueryDatasourcesResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,

    #[serde(default)]
    pub datasources: Datasources,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "tsResponse")]
pub struct DatasourceResponse {
    pub datasource: Datasource,
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::de::from_str;
    use quick_xml::se::to_string;

    #[test]
    fn signin_request_serializes_attributes() {
        let request = SigninRequest {
            credentials: Credentials {
                name: "admin".to_string(),
                password: "secret".to_string(),
                site: Some(Site {
                    content_url: String::new(),
                    ..Default::default()
                }),
                ..Default::default()
            },
        };

        let xml = to_string(&request).unwrap();
        assert!(xml.starts_with("<tsRequest>"));
        assert!(xml.contains(r#"name="admin""#));
        assert!(xml.contains(r#"password="secret""#));
        assert!(xml.contains(r#"<site contentUrl=""/>"#));
        assert!(!xml.contains("token"));
        assert!(!xml.contains("<user"));
    }

    #[test]
    fn auth_response_decodes_token() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<tsResponse xmlns="http://tableau.com/api"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
    xsi:schemaLocation="http://tableau.com/api http://tableau.com/api/ts-api-2.0.xsd">
  <credentials token="12ab34cd56ef78ab90cd12ef34ab56cd">
    <site id="9a8b7c6d-5e4f-3a2b-1c0d-9e8f7a6b5c4d" contentUrl="Marketing"/>
    <user id="9f9e9d9c-8b8a-8f8e-7d7c-7b7a6f6d6e6b"/>
  </credentials>
</tsResponse>"#;

        let response: AuthResponse = from_str(xml).unwrap();
        assert_eq!(response.credentials.token, "12ab34cd56ef78ab90cd12ef34ab56cd");
        let site = response.credentials.site.unwrap();
        assert_eq!(site.content_url, "Marketing");
        assert_eq!(site.id, "9a8b7c6d-5e4f-3a2b-1c0d-9e8f7a6b5c4d");
    }

    #[test]
    fn error_envelope_decodes() {
        let xml = r#"<tsResponse xmlns="http://tableau.com/api">
  <error code="401002">
    <summary>Unauthorized Access</summary>
    <detail>Invalid authentication credentials were provided.</detail>
  </error>
</tsResponse>"#;

        let response: ErrorResponse = from_str(xml).unwrap();
        assert_eq!(response.error.code, "401002");
        assert_eq!(response.error.summary, "Unauthorized Access");
        assert!(response.error.to_string().contains("401002"));
    }

    #[test]
    fn projects_page_decodes_pagination_and_items() {
        let xml = r#"<tsResponse>
  <pagination pageNumber="1" pageSize="100" totalAvailable="2"/>
  <projects>
    <project id="p1" name="default" description="The default project" contentPermissions="ManagedByOwner">
      <owner id="u1"/>
    </project>
    <project id="p2" name="Finance" parentProjectId="p1"/>
  </projects>
</tsResponse>"#;

        let response: QueryProjectsResponse = from_str(xml).unwrap();
        assert_eq!(response.pagination.total_available, 2);
        assert_eq!(response.projects.projects.len(), 2);
        assert_eq!(
            response.projects.projects[0].owner,
            Some(Owner {
                id: "u1".to_string()
            })
        );
        assert_eq!(
            response.projects.projects[1].parent_project_id.as_deref(),
            Some("p1")
        );
    }

    #[test]
    fn empty_projects_element_decodes_to_empty_list() {
        let xml = r#"<tsResponse><pagination pageNumber="1" pageSize="100" totalAvailable="0"/><projects/></tsResponse>"#;
        let response: QueryProjectsResponse = from_str(xml).unwrap();
        assert!(response.projects.projects.is_empty());
    }

    #[test]
    fn server_info_decodes_text_and_build() {
        let xml = r#"<tsResponse>
  <serverInfo>
    <productVersion build="20201.20.0427.1803">2020.1.1</productVersion>
    <restApiVersion>3.7</restApiVersion>
  </serverInfo>
</tsResponse>"#;

        let response: ServerInfoResponse = from_str(xml).unwrap();
        assert_eq!(response.server_info.product_version.version, "2020.1.1");
        assert_eq!(response.server_info.product_version.build, "20201.20.0427.1803");
        assert_eq!(response.server_info.rest_api_version, "3.7");
    }

    #[test]
    fn datasource_record_survives_server_echo() {
        let original = DatasourceResponse {
            datasource: Datasource {
                id: "ds-1".to_string(),
                name: "Sales".to_string(),
                content_url: Some("sales".to_string()),
                kind: Some("sqlserver".to_string()),
                is_certified: Some(true),
                project: Some(Project {
                    id: "p1".to_string(),
                    name: "default".to_string(),
                    ..Default::default()
                }),
                owner: Some(Owner {
                    id: "u1".to_string(),
                }),
                tags: Some(Tags {
                    tags: vec![Tag {
                        label: "gold".to_string(),
                    }],
                }),
                ..Default::default()
            },
        };

        let xml = to_string(&original).unwrap();
        let echoed: DatasourceResponse = from_str(&xml).unwrap();
        assert_eq!(echoed, original);
        assert_eq!(echoed.datasource.project_id(), "p1");
    }

    #[test]
    fn create_project_request_omits_empty_id() {
        let request = CreateProjectRequest {
            project: Project {
                name: "Finance".to_string(),
                description: Some("Quarterly numbers".to_string()),
                ..Default::default()
            },
        };
        let xml = to_string(&request).unwrap();
        assert!(xml.contains(r#"name="Finance""#));
        assert!(xml.contains(r#"description="Quarterly numbers""#));
        assert!(!xml.contains("id="));
    }
}
