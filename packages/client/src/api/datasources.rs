use url::form_urlencoded;

use crate::archive;
use crate::engine::CONTENT_TYPE_HEADER;
use crate::error::Error;
use crate::models::{
    Datasource, DatasourceCreateRequest, DatasourceResponse, QueryDatasourcesResponse,
};
use crate::multipart;
use crate::types::ApiRequest;

use super::{to_xml, TableauClient};

/// Largest page the server will return; datasource queries are not paged.
const DATASOURCE_PAGE_SIZE: u32 = 1000;

/// File format of a published datasource document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasourceFileType {
    /// Plain XML definition
    Tds,
    /// Zip package holding a `.tds`
    Tdsx,
}

impl DatasourceFileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasourceFileType::Tds => "tds",
            DatasourceFileType::Tdsx => "tdsx",
        }
    }
}

impl TableauClient {
    /// Datasources on a site, optionally filtered server-side by exact name.
    pub fn query_datasources(
        &self,
        site_id: &str,
        datasource_name: Option<&str>,
    ) -> Result<Vec<Datasource>, Error> {
        let mut url = self.url(&format!(
            "sites/{}/datasources?pageSize={}",
            site_id, DATASOURCE_PAGE_SIZE
        ));
        if let Some(name) = datasource_name.filter(|name| !name.is_empty()) {
            let escaped: String = form_urlencoded::byte_serialize(name.as_bytes()).collect();
            url.push_str(&format!("&filter=name:eq:{}", escaped));
        }

        let response: QueryDatasourcesResponse = self.engine.execute_xml(ApiRequest::get(url))?;
        if self.config.debug {
            tracing::debug!(
                site_id,
                count = response.datasources.datasources.len(),
                "found datasources"
            );
        }
        Ok(response.datasources.datasources)
    }

    /// Download a datasource definition as XML text.
    ///
    /// Packaged (`.tdsx`) downloads are unzipped; anything that is not a
    /// single-entry zip is taken to already be the plain `.tds` XML.
    pub fn datasource_content(&self, site_id: &str, datasource_id: &str) -> Result<String, Error> {
        let url = self.url(&format!(
            "sites/{}/datasources/{}/content?includeExtract=false",
            site_id, datasource_id
        ));
        let body = self.engine.execute(ApiRequest::get(url))?;
        Ok(archive::document_text(&body))
    }

    /// XML of the datasource named `datasource_name` in the given project.
    ///
    /// Site, project and name together are assumed unique. Returns `None`
    /// when no datasource matches.
    pub fn get_datasource_content_xml(
        &self,
        site_id: &str,
        project_id: &str,
        datasource_name: &str,
    ) -> Result<Option<String>, Error> {
        let datasources = self.query_datasources(site_id, Some(datasource_name))?;

        let Some(datasource) = datasources
            .iter()
            .find(|d| d.project_id() == project_id && d.name == datasource_name)
        else {
            if self.config.debug {
                tracing::debug!(
                    site_id,
                    project_id,
                    datasource_name,
                    "no matching datasource"
                );
            }
            return Ok(None);
        };

        self.datasource_content(site_id, &datasource.id).map(Some)
    }

    pub fn publish_tds(
        &self,
        site_id: &str,
        metadata: &Datasource,
        tds: &str,
        overwrite: bool,
    ) -> Result<Datasource, Error> {
        self.publish_datasource(
            site_id,
            metadata,
            tds.as_bytes(),
            DatasourceFileType::Tds,
            overwrite,
        )
    }

    /// Publish a datasource document with `metadata` as its request payload.
    pub fn publish_datasource(
        &self,
        site_id: &str,
        metadata: &Datasource,
        document: &[u8],
        file_type: DatasourceFileType,
        overwrite: bool,
    ) -> Result<Datasource, Error> {
        let url = self.url(&format!(
            "sites/{}/datasources?datasourceType={}&overwrite={}",
            site_id,
            file_type.as_str(),
            overwrite
        ));

        let request_xml = to_xml(&DatasourceCreateRequest {
            datasource: metadata.clone(),
        })?;
        let filename = format!("{}.{}", metadata.name, file_type.as_str());
        let boundary = &self.config.boundary;
        let payload = multipart::publish_body(boundary, &request_xml, &filename, document);

        let request = ApiRequest::post(url)
            .with_header(CONTENT_TYPE_HEADER, multipart::content_type(boundary))
            .with_payload(payload);
        let response: DatasourceResponse = self.engine.execute_xml(request)?;
        Ok(response.datasource)
    }

    pub fn delete_datasource(&self, site_id: &str, datasource_id: &str) -> Result<(), Error> {
        self.delete(self.url(&format!(
            "sites/{}/datasources/{}",
            site_id, datasource_id
        )))
    }
}
