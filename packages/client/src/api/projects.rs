use crate::error::Error;
use crate::models::{CreateProjectRequest, CreateProjectResponse, Project, QueryProjectsResponse};
use crate::types::ApiRequest;

use super::{to_xml, xml_post, TableauClient};

/// Projects requested per page.
pub const PAGE_SIZE: u32 = 100;

impl TableauClient {
    /// Every project on the site, fetched a page at a time.
    ///
    /// The total is re-read from each page because projects may be created
    /// or deleted while paging. Paging stops once the collected count reaches
    /// the latest total, or when a page comes back empty.
    pub fn query_projects(&self, site_id: &str) -> Result<Vec<Project>, Error> {
        let mut projects = Vec::new();
        let mut total_available = 1usize;
        let mut page_number = 1;

        while projects.len() < total_available {
            let response = self.query_projects_by_page(site_id, page_number)?;
            let fetched = response.projects.projects.len();
            projects.extend(response.projects.projects);
            total_available = response.pagination.total_available as usize;

            tracing::trace!(
                site_id,
                page_number,
                fetched,
                total_available,
                "fetched project page"
            );

            if fetched == 0 {
                break;
            }
            page_number += 1;
        }

        Ok(projects)
    }

    pub fn query_projects_by_page(
        &self,
        site_id: &str,
        page_number: u32,
    ) -> Result<QueryProjectsResponse, Error> {
        let url = self.url(&format!(
            "sites/{}/projects?pageSize={}&pageNumber={}",
            site_id, PAGE_SIZE, page_number
        ));
        self.engine.execute_xml(ApiRequest::get(url))
    }

    pub fn get_project_by_name(&self, site_id: &str, name: &str) -> Result<Project, Error> {
        self.query_projects(site_id)?
            .into_iter()
            .find(|project| project.name == name)
            .ok_or_else(|| Error::ProjectNotFound {
                key: format!("Named '{}'", name),
            })
    }

    pub fn get_project_by_id(&self, site_id: &str, id: &str) -> Result<Project, Error> {
        self.query_projects(site_id)?
            .into_iter()
            .find(|project| project.id == id)
            .ok_or_else(|| Error::ProjectNotFound {
                key: format!("with ID '{}'", id),
            })
    }

    pub fn create_project(&self, site_id: &str, project: Project) -> Result<Project, Error> {
        let url = self.url(&format!("sites/{}/projects", site_id));
        let payload = to_xml(&CreateProjectRequest { project })?;
        let response: CreateProjectResponse = self.engine.execute_xml(xml_post(url, payload))?;
        Ok(response.project)
    }

    pub fn delete_project(&self, site_id: &str, project_id: &str) -> Result<(), Error> {
        self.delete(self.url(&format!("sites/{}/projects/{}", site_id, project_id)))
    }
}
