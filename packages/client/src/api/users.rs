use crate::error::Error;
use crate::models::{QueryUserOnSiteResponse, User};
use crate::types::ApiRequest;

use super::TableauClient;

impl TableauClient {
    pub fn query_user_on_site(&self, site_id: &str, user_id: &str) -> Result<User, Error> {
        let url = self.url(&format!("sites/{}/users/{}", site_id, user_id));
        let response: QueryUserOnSiteResponse = self.engine.execute_xml(ApiRequest::get(url))?;
        Ok(response.user)
    }
}
