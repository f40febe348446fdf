use crate::engine::{APPLICATION_XML, CONTENT_TYPE_HEADER};
use crate::error::Error;
use crate::models::{
    AuthResponse, Credentials, ServerInfo, ServerInfoResponse, SigninRequest, Site, User,
};
use crate::types::ApiRequest;

use super::{to_xml, xml_post, TableauClient};

/// `serverinfo` only exists from this API version on.
const SERVER_INFO_API_VERSION: &str = "2.4";

impl TableauClient {
    /// Sign in and keep the session token for later calls.
    ///
    /// When `content_url` names the configured default site and
    /// `omit_default_site_name` is set, the site is sent as an empty
    /// content URL, which is how the server addresses the default site.
    pub fn sign_in(
        &mut self,
        username: &str,
        password: &str,
        content_url: &str,
        user_id_to_impersonate: Option<&str>,
    ) -> Result<Credentials, Error> {
        let site_name = if self.config.omit_default_site_name
            && content_url == self.config.default_site_name
        {
            ""
        } else {
            content_url
        };

        let request = SigninRequest {
            credentials: Credentials {
                name: username.to_string(),
                password: password.to_string(),
                site: Some(Site {
                    content_url: site_name.to_string(),
                    ..Default::default()
                }),
                user: user_id_to_impersonate
                    .filter(|id| !id.is_empty())
                    .map(|id| User {
                        id: id.to_string(),
                        ..Default::default()
                    }),
                ..Default::default()
            },
        };

        let url = self.url("auth/signin");
        let response: AuthResponse = self.engine.execute_xml(xml_post(url, to_xml(&request)?))?;
        self.engine.set_auth_token(response.credentials.token.clone());

        Ok(response.credentials)
    }

    /// Invalidate the session on the server. The local token is left as is.
    pub fn sign_out(&self) -> Result<(), Error> {
        let request = ApiRequest::post(self.url("auth/signout"))
            .with_header(CONTENT_TYPE_HEADER, APPLICATION_XML);
        self.engine.execute(request)?;
        Ok(())
    }

    pub fn server_info(&self) -> Result<ServerInfo, Error> {
        let url = format!(
            "{}/api/{}/serverinfo",
            self.config.server, SERVER_INFO_API_VERSION
        );
        let response: ServerInfoResponse = self.engine.execute_xml(ApiRequest::get(url))?;
        Ok(response.server_info)
    }
}
