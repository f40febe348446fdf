use crate::error::Error;
use crate::models::{QuerySiteResponse, QuerySitesResponse, Site};
use crate::types::ApiRequest;

use super::TableauClient;

/// Derive a site's content URL from its display name.
pub fn convert_site_name_to_content_url(site_name: &str) -> String {
    site_name.replace(' ', "")
}

impl TableauClient {
    pub fn query_sites(&self) -> Result<Vec<Site>, Error> {
        let response: QuerySitesResponse =
            self.engine.execute_xml(ApiRequest::get(self.url("sites/")))?;
        Ok(response.sites.sites)
    }

    pub fn query_site(&self, site_id: &str, include_storage: bool) -> Result<Site, Error> {
        let mut url = self.url(&format!("sites/{}", site_id));
        if include_storage {
            url.push_str("?includeStorage=true");
        }
        self.execute_query_site(url)
    }

    pub fn query_site_by_name(&self, name: &str, include_storage: bool) -> Result<Site, Error> {
        self.query_site_by_key("name", name, include_storage)
    }

    pub fn query_site_by_content_url(
        &self,
        content_url: &str,
        include_storage: bool,
    ) -> Result<Site, Error> {
        self.query_site_by_key("contentUrl", content_url, include_storage)
    }

    pub fn get_site_id(&self, site_name: &str) -> Result<String, Error> {
        Ok(self.query_site_by_name(site_name, false)?.id)
    }

    /// Look a site up by display name.
    ///
    /// The default site is found by name; any other site by the content URL
    /// derived from its name.
    pub fn get_site(&self, site_name: &str) -> Result<Site, Error> {
        if site_name == self.config.default_site_name {
            return self.query_site_by_name(site_name, false);
        }
        let content_url = convert_site_name_to_content_url(site_name);
        self.query_site_by_content_url(&content_url, false)
    }

    pub fn delete_site(&self, site_id: &str) -> Result<(), Error> {
        self.delete(self.url(&format!("sites/{}", site_id)))
    }

    pub fn delete_site_by_name(&self, name: &str) -> Result<(), Error> {
        self.delete_site_by_key("name", name)
    }

    pub fn delete_site_by_content_url(&self, content_url: &str) -> Result<(), Error> {
        self.delete_site_by_key("contentUrl", content_url)
    }

    fn query_site_by_key(&self, key: &str, value: &str, include_storage: bool) -> Result<Site, Error> {
        let mut url = self.url(&format!("sites/{}?key={}", value, key));
        if include_storage {
            url.push_str("&includeStorage=true");
        }
        self.execute_query_site(url)
    }

    fn execute_query_site(&self, url: String) -> Result<Site, Error> {
        let response: QuerySiteResponse = self.engine.execute_xml(ApiRequest::get(url))?;
        Ok(response.site)
    }

    fn delete_site_by_key(&self, key: &str, value: &str) -> Result<(), Error> {
        self.delete(self.url(&format!("sites/{}?key={}", value, key)))
    }
}
